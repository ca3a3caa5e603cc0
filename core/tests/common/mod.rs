//! Shared fixtures for the merge integration tests.
//!
//! Documents follow the default discovery protocol: a `MergeIndex` sheet
//! whose A column lists mergeable sheet names from A2 down to a `#END`
//! sentinel, and data sheets carrying a `MERGE_AREA` named region.

#![allow(dead_code)]

use sheet_merge::{CellValue, Document, Grid, MemoryStore, NamedRegion, SheetData};

pub fn grid(rows: &[&[&str]]) -> Grid {
    Grid::from_rows(
        rows.iter()
            .map(|r| r.iter().map(|s| CellValue::from_rendered(s)).collect())
            .collect(),
    )
    .expect("rectangular fixture grid")
}

/// A `MergeIndex` sheet listing the given sheet names, sentinel-terminated.
pub fn index_sheet(names: &[&str]) -> SheetData {
    let mut rows: Vec<&[&str]> = vec![&["Sheets"]];
    for name in names {
        rows.push(std::slice::from_ref(name));
    }
    rows.push(&["#END"]);
    SheetData::new("MergeIndex", grid(&rows))
}

/// A data sheet whose `MERGE_AREA` named region covers `range`.
pub fn data_sheet(
    name: &str,
    range: &str,
    annotation: Option<&str>,
    rows: &[&[&str]],
) -> SheetData {
    SheetData::new(name, grid(rows)).with_named_region(NamedRegion {
        name: "MERGE_AREA".to_string(),
        range: range.parse().expect("valid fixture range"),
        annotation: annotation.map(str::to_string),
    })
}

/// Base document with one mergeable `Data` sheet.
pub fn base_doc(annotation: Option<&str>, range: &str, rows: &[&[&str]]) -> Document {
    Document {
        sheets: vec![
            index_sheet(&["Data"]),
            data_sheet("Data", range, annotation, rows),
        ],
    }
}

/// Update-source document carrying only a `Data` sheet.
pub fn source_doc(annotation: Option<&str>, range: &str, rows: &[&[&str]]) -> Document {
    Document {
        sheets: vec![data_sheet("Data", range, annotation, rows)],
    }
}

/// Store holding a base document plus named update sources; the base is the
/// active document.
pub fn store_with(base: Document, sources: &[(&str, Document)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert_document("base", base);
    for (name, doc) in sources {
        store.insert_document(*name, doc.clone());
    }
    store
}

pub fn rendered_rows(grid: &Grid) -> Vec<Vec<String>> {
    (0..grid.nrows())
        .map(|r| (0..grid.ncols()).map(|c| grid.render_at(r, c)).collect())
        .collect()
}
