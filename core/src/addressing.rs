//! A1-style cell and range addressing.
//!
//! Cell coordinates are zero-based `(row, col)` pairs internally; the A1
//! rendering is the only place the one-based row numbering appears.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[SHMERGE_ADDR_001] malformed A1 address: '{input}'")]
pub struct AddressParseError {
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[SHMERGE_ADDR_002] malformed range: '{input}'")]
pub struct RangeParseError {
    pub input: String,
}

/// Convert zero-based (row, col) indices to an A1 address string.
pub fn index_to_address(row: u32, col: u32) -> String {
    let mut label = String::new();
    let mut c = col;
    loop {
        label.insert(0, (b'A' + (c % 26) as u8) as char);
        if c < 26 {
            break;
        }
        c = c / 26 - 1;
    }
    label.push_str(&(row + 1).to_string());
    label
}

/// Parse an A1 address into zero-based (row, col) indices.
/// Returns `None` for malformed addresses.
pub fn address_to_index(a1: &str) -> Option<(u32, u32)> {
    let first_digit = a1.find(|ch: char| ch.is_ascii_digit())?;
    let (letters, digits) = a1.split_at(first_digit);
    if letters.is_empty() || digits.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let v = (ch.to_ascii_uppercase() as u8 - b'A' + 1) as u32;
        col = col.checked_mul(26)?.checked_add(v)?;
    }

    let mut row: u32 = 0;
    for ch in digits.chars() {
        if !ch.is_ascii_digit() {
            return None;
        }
        row = row.checked_mul(10)?.checked_add((ch as u8 - b'0') as u32)?;
    }

    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

/// A zero-based cell coordinate, parseable from A1 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    pub fn from_indices(row: u32, col: u32) -> CellAddress {
        CellAddress { row, col }
    }

    pub fn to_a1(&self) -> String {
        index_to_address(self.row, self.col)
    }
}

impl FromStr for CellAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = address_to_index(s).ok_or_else(|| AddressParseError {
            input: s.to_string(),
        })?;
        Ok(CellAddress { row, col })
    }
}

impl std::fmt::Display for CellAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl Serialize for CellAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_a1())
    }
}

impl<'de> Deserialize<'de> for CellAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let a1 = String::deserialize(deserializer)?;
        CellAddress::from_str(&a1).map_err(|e| DeError::custom(e.to_string()))
    }
}

/// An inclusive rectangular span of cells, zero-based.
///
/// Parses from A1 span text (`"A2:D10"`); a bare cell address (`"C2"`)
/// denotes a single-cell range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeRef {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl RangeRef {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> RangeRef {
        RangeRef {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    pub fn nrows(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn ncols(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    pub fn to_a1(&self) -> String {
        if self.start_row == self.end_row && self.start_col == self.end_col {
            index_to_address(self.start_row, self.start_col)
        } else {
            format!(
                "{}:{}",
                index_to_address(self.start_row, self.start_col),
                index_to_address(self.end_row, self.end_col)
            )
        }
    }
}

impl FromStr for RangeRef {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RangeParseError {
            input: s.to_string(),
        };

        let (start, end) = match s.split_once(':') {
            Some((a, b)) => {
                let start: CellAddress = a.parse().map_err(|_| malformed())?;
                let end: CellAddress = b.parse().map_err(|_| malformed())?;
                (start, end)
            }
            None => {
                let cell: CellAddress = s.parse().map_err(|_| malformed())?;
                (cell, cell)
            }
        };

        if end.row < start.row || end.col < start.col {
            return Err(malformed());
        }

        Ok(RangeRef {
            start_row: start.row,
            start_col: start.col,
            end_row: end.row,
            end_col: end.col,
        })
    }
}

impl std::fmt::Display for RangeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl Serialize for RangeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_a1())
    }
}

impl<'de> Deserialize<'de> for RangeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        RangeRef::from_str(&text).map_err(|e| DeError::custom(e.to_string()))
    }
}
