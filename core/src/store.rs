//! Tabular store adapter contract.
//!
//! The merge engine never touches a document representation directly; it
//! reads and writes rectangular value grids and named-region metadata through
//! this trait. Two implementations ship with the crate: [`MemoryStore`] for
//! tests and embedding, and [`JsonStore`] for documents persisted as JSON
//! files on disk.
//!
//! A merge session requires exclusive (`&mut`) access to its store for the
//! whole run; that borrow is the per-document lock that serializes sessions
//! against the same base document.
//!
//! [`MemoryStore`]: crate::memory_store::MemoryStore
//! [`JsonStore`]: crate::json_store::JsonStore

use crate::addressing::RangeRef;
use crate::document::NamedRegion;
use crate::error_codes;
use crate::grid::Grid;
use crate::value::CellValue;
use thiserror::Error;

/// Opaque handle to a document held by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocId(pub(crate) u32);

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("[SHMERGE_STORE_001] document not found: {path}")]
    DocumentNotFound { path: String },

    #[error("[SHMERGE_STORE_002] invalid document handle")]
    InvalidHandle,

    #[error("[SHMERGE_STORE_003] document '{path}' is closed")]
    DocumentClosed { path: String },

    #[error("[SHMERGE_STORE_004] sheet '{sheet}' not found")]
    SheetNotFound { sheet: String },

    #[error(
        "[SHMERGE_STORE_005] grid is {grid_rows}x{grid_cols} but target range {range} is {range_rows}x{range_cols}"
    )]
    RangeMismatch {
        range: String,
        range_rows: u32,
        range_cols: u32,
        grid_rows: u32,
        grid_cols: u32,
    },

    #[error("[SHMERGE_STORE_006] io error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[SHMERGE_STORE_007] malformed document {path}: {message}")]
    MalformedDocument { path: String, message: String },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DocumentNotFound { .. } => error_codes::STORE_DOCUMENT_NOT_FOUND,
            StoreError::InvalidHandle => error_codes::STORE_INVALID_HANDLE,
            StoreError::DocumentClosed { .. } => error_codes::STORE_DOCUMENT_CLOSED,
            StoreError::SheetNotFound { .. } => error_codes::STORE_SHEET_NOT_FOUND,
            StoreError::RangeMismatch { .. } => error_codes::STORE_RANGE_MISMATCH,
            StoreError::Io { .. } => error_codes::STORE_IO,
            StoreError::MalformedDocument { .. } => error_codes::STORE_MALFORMED_DOCUMENT,
        }
    }
}

/// Provider of named rectangular value grids.
///
/// Contract notes:
/// - `read_grid` materializes the requested rectangle, empty-filling any part
///   that lies beyond the sheet's stored bounds.
/// - `write_grid` requires the grid's dimensions to equal the range's.
/// - `close_source(_, false)` must discard any in-memory changes to the
///   source; update sources are never persisted by a merge.
/// - `backup_document` snapshots the document under a timestamped name and
///   returns that name; it must be called before any mutation to be of use.
pub trait TabularStore {
    fn active_document(&self) -> Option<DocId>;

    fn open_source(&mut self, path: &str) -> Result<DocId, StoreError>;

    fn close_source(&mut self, doc: DocId, persist: bool) -> Result<(), StoreError>;

    fn sheet_exists(&self, doc: DocId, sheet: &str) -> Result<bool, StoreError>;

    fn named_region(
        &self,
        doc: DocId,
        sheet: &str,
        name: &str,
    ) -> Result<Option<NamedRegion>, StoreError>;

    fn read_cell(&self, doc: DocId, sheet: &str, row: u32, col: u32)
        -> Result<CellValue, StoreError>;

    fn read_grid(&self, doc: DocId, sheet: &str, range: &RangeRef) -> Result<Grid, StoreError>;

    fn write_grid(
        &mut self,
        doc: DocId,
        sheet: &str,
        range: &RangeRef,
        grid: &Grid,
    ) -> Result<(), StoreError>;

    fn save_document(&mut self, doc: DocId) -> Result<(), StoreError>;

    fn backup_document(&mut self, doc: DocId) -> Result<String, StoreError>;
}

pub(crate) fn check_range_matches(range: &RangeRef, grid: &Grid) -> Result<(), StoreError> {
    if grid.nrows() != range.nrows() || grid.ncols() != range.ncols() {
        return Err(StoreError::RangeMismatch {
            range: range.to_a1(),
            range_rows: range.nrows(),
            range_cols: range.ncols(),
            grid_rows: grid.nrows(),
            grid_cols: grid.ncols(),
        });
    }
    Ok(())
}

/// Timestamp suffix for backup names, `yyyyMMddHHmmss` in local time.
pub(crate) fn backup_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
}
