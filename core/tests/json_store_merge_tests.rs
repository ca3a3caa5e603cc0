//! Merge sessions driven through the file-backed JSON store.

use sheet_merge::{
    CellValue, Document, Grid, JsonStore, NamedRegion, SheetData, TabularStore, merge_files,
};
use std::fs;
use std::path::Path;

fn grid(rows: &[&[&str]]) -> Grid {
    Grid::from_rows(
        rows.iter()
            .map(|r| r.iter().map(|s| CellValue::from_rendered(s)).collect())
            .collect(),
    )
    .expect("rectangular fixture grid")
}

fn base_document() -> Document {
    Document {
        sheets: vec![
            SheetData::new("MergeIndex", grid(&[&["Sheets"], &["Data"], &["#END"]])),
            SheetData::new("Data", grid(&[&["id", "val"], &["1", "x"], &["2", "y"]]))
                .with_named_region(NamedRegion {
                    name: "MERGE_AREA".to_string(),
                    range: "A1:B3".parse().unwrap(),
                    annotation: Some(r#"{"id_column_offset":0}"#.to_string()),
                }),
        ],
    }
}

fn source_document(rows: &[&[&str]]) -> Document {
    Document {
        sheets: vec![SheetData::new("Data", grid(rows)).with_named_region(NamedRegion {
            name: "MERGE_AREA".to_string(),
            range: "A1:B3".parse().unwrap(),
            annotation: Some(r#"{"id_column_offset":0}"#.to_string()),
        })],
    }
}

fn write_doc(path: &Path, doc: &Document) {
    fs::write(path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
}

#[test]
fn merge_persists_to_disk_and_leaves_a_backup() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.json");
    let source_path = dir.path().join("edited.json");

    write_doc(&base_path, &base_document());
    write_doc(
        &source_path,
        &source_document(&[&["id", "val"], &["1", "z"], &["3", "w"]]),
    );

    let mut store = JsonStore::open_base(&base_path).unwrap();
    let report = merge_files(
        &mut store,
        &[source_path.to_string_lossy().into_owned()],
    )
    .unwrap();

    assert!(report.conflicts.is_empty());
    assert_eq!(report.cells_changed, 1);

    // The merged value survives a fresh load from disk.
    let reread = JsonStore::open_base(&base_path).unwrap();
    let doc = reread.active_document().unwrap();
    assert_eq!(
        reread.read_cell(doc, "Data", 1, 1).unwrap(),
        CellValue::text("z")
    );
    assert_eq!(
        reread.read_cell(doc, "Data", 2, 1).unwrap(),
        CellValue::text("y")
    );

    // The backup holds the pre-merge state.
    let backup_path = report.backup_path.unwrap();
    let backup = JsonStore::open_base(&backup_path).unwrap();
    let backup_doc = backup.active_document().unwrap();
    assert_eq!(
        backup.read_cell(backup_doc, "Data", 1, 1).unwrap(),
        CellValue::text("x")
    );
}

#[test]
fn update_sources_are_never_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.json");
    let source_path = dir.path().join("edited.json");

    write_doc(&base_path, &base_document());
    let source = source_document(&[&["id", "val"], &["1", "z"], &["2", "y"]]);
    write_doc(&source_path, &source);
    let before = fs::read_to_string(&source_path).unwrap();

    let mut store = JsonStore::open_base(&base_path).unwrap();
    merge_files(
        &mut store,
        &[source_path.to_string_lossy().into_owned()],
    )
    .unwrap();

    assert_eq!(fs::read_to_string(&source_path).unwrap(), before);
}

#[test]
fn missing_source_file_is_a_store_error() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.json");
    write_doc(&base_path, &base_document());

    let mut store = JsonStore::open_base(&base_path).unwrap();
    let missing = dir.path().join("nope.json").to_string_lossy().into_owned();
    let err = merge_files(&mut store, &[missing]).unwrap_err();
    assert_eq!(err.code(), "SHMERGE_STORE_001");
}
