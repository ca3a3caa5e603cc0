//! Register a custom merge function and drive a merge against the in-memory
//! store, no files required.

use sheet_merge::{
    CellValue, Document, Grid, MemoryStore, MergeConfig, MergeFnError, MergeFnRegistry,
    MergeSession, NamedRegion, SheetData, TabularStore,
};
use std::sync::Arc;

fn text_grid(rows: &[&[&str]]) -> Grid {
    Grid::from_rows(
        rows.iter()
            .map(|r| r.iter().map(|s| CellValue::from_rendered(s)).collect())
            .collect(),
    )
    .expect("rectangular grid")
}

fn data_sheet(rows: &[&[&str]]) -> SheetData {
    SheetData::new("Data", text_grid(rows)).with_named_region(NamedRegion {
        name: "MERGE_AREA".to_string(),
        range: "A1:B2".parse().unwrap(),
        annotation: Some(r#"{"merge_fn":"sum_numbers"}"#.to_string()),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = MemoryStore::new();
    store.insert_document(
        "base",
        Document {
            sheets: vec![
                SheetData::new("MergeIndex", text_grid(&[&["Sheets"], &["Data"], &["#END"]])),
                data_sheet(&[&["item", "count"], &["widgets", "10"]]),
            ],
        },
    );
    store.insert_document(
        "warehouse_a",
        Document {
            sheets: vec![data_sheet(&[&["item", "count"], &["widgets", "25"]])],
        },
    );
    store.insert_document(
        "warehouse_b",
        Document {
            sheets: vec![data_sheet(&[&["item", "count"], &["widgets", "17"]])],
        },
    );

    // Conflicting counts are summed instead of reported.
    let mut registry = MergeFnRegistry::builtin();
    registry.register(
        "sum_numbers",
        Arc::new(|_base: &str, candidates: &[String]| {
            let mut total = 0i64;
            for candidate in candidates {
                total += candidate.trim().parse::<i64>().map_err(|_| {
                    MergeFnError::Failed {
                        message: format!("'{}' is not a number", candidate),
                    }
                })?;
            }
            Ok(total.to_string())
        }),
    );

    let session = MergeSession::new(MergeConfig::default(), registry);
    let report = session.run(
        &mut store,
        &["warehouse_a".to_string(), "warehouse_b".to_string()],
    )?;

    let base = store.active_document().expect("base is active");
    let doc = store.document(base).expect("base exists");
    println!(
        "merged count: {}",
        doc.sheet("Data").expect("Data sheet").cell_at(1, 1)
    );
    println!("conflicts: {}", report.conflicts.len());

    Ok(())
}
