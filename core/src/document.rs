//! Document model shared by the store implementations.
//!
//! A [`Document`] is a named collection of sheets, each carrying a grid and
//! any named regions defined on it. Store implementations serve rectangular
//! reads and writes out of this model; the merge engine itself only ever sees
//! [`Grid`]s and [`NamedRegion`] metadata through the store trait.

use crate::addressing::RangeRef;
use crate::grid::Grid;
use crate::value::CellValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub sheets: Vec<SheetData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    pub name: String,
    pub grid: Grid,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub named_regions: Vec<NamedRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    pub range: RangeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Document {
    pub fn sheet(&self, name: &str) -> Option<&SheetData> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut SheetData> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }
}

impl SheetData {
    pub fn new(name: impl Into<String>, grid: Grid) -> SheetData {
        SheetData {
            name: name.into(),
            grid,
            named_regions: Vec::new(),
        }
    }

    pub fn with_named_region(mut self, region: NamedRegion) -> SheetData {
        self.named_regions.push(region);
        self
    }

    pub fn named_region(&self, name: &str) -> Option<&NamedRegion> {
        self.named_regions.iter().find(|r| r.name == name)
    }

    /// Read one cell; positions beyond the stored grid read as empty,
    /// matching how a spreadsheet treats its unused area.
    pub fn cell_at(&self, row: u32, col: u32) -> CellValue {
        if row < self.grid.nrows() && col < self.grid.ncols() {
            self.grid.get(row, col).clone()
        } else {
            CellValue::Empty
        }
    }

    /// Materialize the requested rectangle, empty-filling beyond the stored
    /// bounds.
    pub fn read_range(&self, range: &RangeRef) -> Grid {
        let mut out = Grid::new(range.nrows(), range.ncols());
        for r in 0..range.nrows() {
            for c in 0..range.ncols() {
                let value = self.cell_at(range.start_row + r, range.start_col + c);
                if !value.is_empty() {
                    out.set(r, c, value);
                }
            }
        }
        out
    }

    /// Write a grid into the rectangle, growing the stored grid if the range
    /// extends past its current bounds. The grid's dimensions must match the
    /// range's.
    pub fn write_range(&mut self, range: &RangeRef, grid: &Grid) {
        debug_assert!(
            grid.nrows() == range.nrows() && grid.ncols() == range.ncols(),
            "grid dimensions must match the target range"
        );
        self.grid.grow(range.end_row + 1, range.end_col + 1);
        for r in 0..grid.nrows() {
            for c in 0..grid.ncols() {
                self.grid
                    .set(range.start_row + r, range.start_col + c, grid.get(r, c).clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> SheetData {
        SheetData::new(
            "Data",
            Grid::from_rows(vec![
                vec![CellValue::text("a"), CellValue::text("b")],
                vec![CellValue::text("c"), CellValue::text("d")],
            ])
            .unwrap(),
        )
    }

    #[test]
    fn read_range_pads_beyond_bounds() {
        let s = sheet();
        let out = s.read_range(&RangeRef::new(0, 0, 2, 2));
        assert_eq!(out.nrows(), 3);
        assert_eq!(out.ncols(), 3);
        assert_eq!(out.render_at(0, 0), "a");
        assert_eq!(out.render_at(2, 2), "");
    }

    #[test]
    fn write_range_grows_sheet() {
        let mut s = sheet();
        let patch = Grid::from_rows(vec![vec![CellValue::text("x"), CellValue::text("y")]]).unwrap();
        s.write_range(&RangeRef::new(3, 1, 3, 2), &patch);
        assert_eq!(s.grid.nrows(), 4);
        assert_eq!(s.grid.ncols(), 3);
        assert_eq!(s.cell_at(3, 1), CellValue::text("x"));
        assert_eq!(s.cell_at(3, 2), CellValue::text("y"));
        assert_eq!(s.cell_at(0, 0), CellValue::text("a"));
    }

    #[test]
    fn named_region_lookup() {
        let s = sheet().with_named_region(NamedRegion {
            name: "MERGE_AREA".to_string(),
            range: "A1:B2".parse().unwrap(),
            annotation: Some("{\"id_column_offset\":0}".to_string()),
        });
        assert!(s.named_region("MERGE_AREA").is_some());
        assert!(s.named_region("OTHER").is_none());
    }
}
