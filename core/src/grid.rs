//! Dense rectangular value grids.
//!
//! A [`Grid`] is the unit the merge engine operates on: a fixed `rows × cols`
//! rectangle of [`CellValue`]s extracted from one region of one document.
//! Grids are value types; cloning yields an independent copy, so a base grid
//! can serve as an immutable comparison baseline while a working clone
//! receives resolved values.

use crate::value::CellValue;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[SHMERGE_GRID_001] ragged rows: row {row} has {found} columns, expected {expected}")]
pub struct GridShapeError {
    pub row: usize,
    pub found: usize,
    pub expected: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    nrows: u32,
    ncols: u32,
    cells: Vec<CellValue>,
}

impl Grid {
    /// An all-empty grid of the given dimensions.
    pub fn new(nrows: u32, ncols: u32) -> Grid {
        Grid {
            nrows,
            ncols,
            cells: vec![CellValue::Empty; (nrows as usize) * (ncols as usize)],
        }
    }

    /// Build a grid from row vectors. All rows must have equal length.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Result<Grid, GridShapeError> {
        let nrows = rows.len() as u32;
        let ncols = rows.first().map_or(0, |r| r.len()) as u32;

        let mut cells = Vec::with_capacity((nrows as usize) * (ncols as usize));
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != ncols as usize {
                return Err(GridShapeError {
                    row: i,
                    found: row.len(),
                    expected: ncols as usize,
                });
            }
            cells.extend(row);
        }

        Ok(Grid {
            nrows,
            ncols,
            cells,
        })
    }

    pub fn nrows(&self) -> u32 {
        self.nrows
    }

    pub fn ncols(&self) -> u32 {
        self.ncols
    }

    pub fn get(&self, row: u32, col: u32) -> &CellValue {
        debug_assert!(
            row < self.nrows && col < self.ncols,
            "cell coordinates must lie within the grid bounds"
        );
        &self.cells[(row as usize) * (self.ncols as usize) + col as usize]
    }

    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        debug_assert!(
            row < self.nrows && col < self.ncols,
            "cell coordinates must lie within the grid bounds"
        );
        self.cells[(row as usize) * (self.ncols as usize) + col as usize] = value;
    }

    /// Canonical string rendering of the cell, `""` for empty.
    pub fn render_at(&self, row: u32, col: u32) -> String {
        self.get(row, col).to_string()
    }

    pub fn row(&self, row: u32) -> &[CellValue] {
        let start = (row as usize) * (self.ncols as usize);
        &self.cells[start..start + self.ncols as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.cells.chunks(self.ncols.max(1) as usize)
    }

    /// Grow to at least the given dimensions, preserving existing values.
    /// Shrinking never happens; smaller bounds are ignored.
    pub fn grow(&mut self, nrows: u32, ncols: u32) {
        let new_rows = self.nrows.max(nrows);
        let new_cols = self.ncols.max(ncols);
        if new_rows == self.nrows && new_cols == self.ncols {
            return;
        }

        let mut grown = Grid::new(new_rows, new_cols);
        for r in 0..self.nrows {
            for c in 0..self.ncols {
                grown.set(r, c, self.get(r, c).clone());
            }
        }
        *self = grown;
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.nrows as usize))?;
        for row in self.rows().take(self.nrows as usize) {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<CellValue>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(|e| DeError::custom(e.to_string()))
    }
}
