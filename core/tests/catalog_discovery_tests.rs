//! Region discovery over the merge index, including the companion-column
//! fallback for sheets without a reserved named region.

mod common;

use common::{data_sheet, grid, index_sheet};
use sheet_merge::{
    CatalogError, Document, MemoryStore, MergeConfig, SheetData, TabularStore, discover_regions,
};

fn store_with_base(base: Document) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert_document("base", base);
    store
}

#[test]
fn named_region_is_authoritative() {
    let base = Document {
        sheets: vec![
            index_sheet(&["Data"]),
            data_sheet(
                "Data",
                "B2:D9",
                Some(r#"{"id_column_offset":1}"#),
                &[&["x"]],
            ),
        ],
    };
    let store = store_with_base(base);
    let doc = store.active_document().unwrap();

    let catalog = discover_regions(&store, doc, &MergeConfig::default()).unwrap();
    assert_eq!(catalog.len(), 1);

    let entry = catalog.iter().next().unwrap();
    assert_eq!(entry.region.sheet, "Data");
    assert_eq!(entry.region.range.to_a1(), "B2:D9");
    assert_eq!(
        entry.config.as_ref().unwrap().id_column_offset,
        Some(1)
    );
}

#[test]
fn companion_columns_resolve_unnamed_sheets() {
    // Left 1, right 2, header row 1, bottom row 3: the usable rectangle is
    // rows 2..=3 of columns A..=B.
    let base = Document {
        sheets: vec![
            SheetData::new(
                "MergeIndex",
                grid(&[
                    &["Sheets", "Left", "Right", "Header", "Bottom"],
                    &["Data", "1", "2", "1", "3"],
                    &["Data", "1", "2", "4", "6"],
                    &["#END", "", "", "", ""],
                ]),
            ),
            SheetData::new("Data", grid(&[&["id", "val"]])),
        ],
    };
    let store = store_with_base(base);
    let doc = store.active_document().unwrap();

    let catalog = discover_regions(&store, doc, &MergeConfig::default()).unwrap();
    assert_eq!(catalog.len(), 2);

    let entries: Vec<_> = catalog.iter().collect();
    assert_eq!(entries[0].region.range.to_a1(), "A2:B3");
    assert_eq!(entries[1].region.range.to_a1(), "A5:B6");
    assert!(entries[0].config.is_none());
    assert!(entries[1].config.is_none());

    assert_eq!(catalog.for_sheet("Data").count(), 2);
    assert_eq!(catalog.for_sheet("Other").count(), 0);
}

#[test]
fn non_numeric_companion_values_are_unresolvable() {
    let base = Document {
        sheets: vec![
            SheetData::new(
                "MergeIndex",
                grid(&[
                    &["Sheets", "Left", "Right", "Header", "Bottom"],
                    &["Data", "one", "2", "1", "3"],
                    &["#END", "", "", "", ""],
                ]),
            ),
            SheetData::new("Data", grid(&[&["id", "val"]])),
        ],
    };
    let store = store_with_base(base);
    let doc = store.active_document().unwrap();

    let err = discover_regions(&store, doc, &MergeConfig::default()).unwrap_err();
    assert!(matches!(err, CatalogError::RegionUnresolvable { .. }));
    assert_eq!(err.code(), "SHMERGE_CATALOG_004");
}

#[test]
fn inverted_companion_bounds_are_unresolvable() {
    let base = Document {
        sheets: vec![
            SheetData::new(
                "MergeIndex",
                grid(&[
                    &["Sheets", "Left", "Right", "Header", "Bottom"],
                    &["Data", "3", "2", "1", "5"],
                    &["#END", "", "", "", ""],
                ]),
            ),
            SheetData::new("Data", grid(&[&["id", "val"]])),
        ],
    };
    let store = store_with_base(base);
    let doc = store.active_document().unwrap();

    let err = discover_regions(&store, doc, &MergeConfig::default()).unwrap_err();
    assert!(matches!(err, CatalogError::RegionUnresolvable { .. }));
}

#[test]
fn discovery_preserves_index_order() {
    let base = Document {
        sheets: vec![
            index_sheet(&["Second", "First"]),
            data_sheet("Second", "A1:A1", None, &[&["s"]]),
            data_sheet("First", "A1:A1", None, &[&["f"]]),
        ],
    };
    let store = store_with_base(base);
    let doc = store.active_document().unwrap();

    let catalog = discover_regions(&store, doc, &MergeConfig::default()).unwrap();
    let sheets: Vec<&str> = catalog.iter().map(|e| e.region.sheet.as_str()).collect();
    assert_eq!(sheets, vec!["Second", "First"]);
}

#[test]
fn blank_index_rows_are_skipped() {
    let base = Document {
        sheets: vec![
            SheetData::new(
                "MergeIndex",
                grid(&[&["Sheets"], &[""], &["Data"], &[""], &["#END"]]),
            ),
            data_sheet("Data", "A1:A1", None, &[&["x"]]),
        ],
    };
    let store = store_with_base(base);
    let doc = store.active_document().unwrap();

    let catalog = discover_regions(&store, doc, &MergeConfig::default()).unwrap();
    assert_eq!(catalog.len(), 1);
}
