//! Sheet Merge: reconcile edited copies of a tabular document.
//!
//! This crate provides functionality for:
//! - Discovering mergeable regions from a base document's merge index
//! - Aligning update-source rows to the base by identifier column
//! - Collecting cell-level differences across any number of update sources
//! - Resolving differences by policy (unanimous adoption, pluggable merge
//!   functions, conflict markers) with full provenance
//! - Reading and writing documents through a pluggable store trait, with
//!   in-memory and JSON-file implementations included
//!
//! # Quick Start
//!
//! ```
//! use sheet_merge::{
//!     CellValue, Document, Grid, MemoryStore, NamedRegion, SheetData, merge_files,
//! };
//!
//! fn text_grid(rows: &[&[&str]]) -> Grid {
//!     Grid::from_rows(
//!         rows.iter()
//!             .map(|r| r.iter().map(|s| CellValue::from_rendered(s)).collect())
//!             .collect(),
//!     )
//!     .unwrap()
//! }
//!
//! fn data_sheet(rows: &[&[&str]]) -> SheetData {
//!     SheetData::new("Data", text_grid(rows)).with_named_region(NamedRegion {
//!         name: "MERGE_AREA".to_string(),
//!         range: "A1:B2".parse().unwrap(),
//!         annotation: None,
//!     })
//! }
//!
//! let mut store = MemoryStore::new();
//! store.insert_document(
//!     "base",
//!     Document {
//!         sheets: vec![
//!             SheetData::new("MergeIndex", text_grid(&[&["Sheets"], &["Data"], &["#END"]])),
//!             data_sheet(&[&["id", "val"], &["1", "x"]]),
//!         ],
//!     },
//! );
//! store.insert_document(
//!     "edited",
//!     Document {
//!         sheets: vec![data_sheet(&[&["id", "val"], &["1", "y"]])],
//!     },
//! );
//!
//! let report = merge_files(&mut store, &["edited".to_string()]).unwrap();
//! assert!(report.conflicts.is_empty());
//! ```

mod addressing;
mod align;
mod catalog;
mod collect;
mod config;
mod document;
pub mod error_codes;
mod grid;
mod json_store;
mod memory_store;
mod report;
mod resolve;
mod session;
mod store;
mod value;

pub use addressing::{
    AddressParseError, CellAddress, RangeParseError, RangeRef, address_to_index, index_to_address,
};
pub use align::align_by_id;
pub use catalog::{
    CatalogEntry, CatalogError, Region, RegionCatalog, RegionConfig, discover_regions,
    parse_region_config,
};
pub use collect::{CellKey, DiffEntry, DiffMap, collect_diffs};
pub use config::{ConfigError, MergeConfig, MergeConfigBuilder};
pub use document::{Document, NamedRegion, SheetData};
pub use grid::{Grid, GridShapeError};
pub use json_store::JsonStore;
pub use memory_store::MemoryStore;
pub use report::{ConflictRecord, MergeReport, serialize_report};
pub use resolve::{
    CONFLICT_HEADER, MergeFn, MergeFnError, MergeFnRegistry, resolve_region,
};
pub use session::{MergeError, MergeSession, merge_files};
pub use store::{DocId, StoreError, TabularStore};
pub use value::CellValue;
