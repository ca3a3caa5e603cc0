//! Stable machine-readable error codes.
//!
//! Every user-facing error message carries one of these bracketed codes so
//! scripts can match on failures without parsing prose. Codes are append-only;
//! renumbering an existing code is a breaking change.

pub const ADDR_MALFORMED: &str = "SHMERGE_ADDR_001";
pub const RANGE_MALFORMED: &str = "SHMERGE_ADDR_002";

pub const GRID_RAGGED_ROWS: &str = "SHMERGE_GRID_001";

pub const CONFIG_EMPTY_FIELD: &str = "SHMERGE_CONFIG_001";
pub const CONFIG_NON_POSITIVE_LIMIT: &str = "SHMERGE_CONFIG_002";

pub const STORE_DOCUMENT_NOT_FOUND: &str = "SHMERGE_STORE_001";
pub const STORE_INVALID_HANDLE: &str = "SHMERGE_STORE_002";
pub const STORE_DOCUMENT_CLOSED: &str = "SHMERGE_STORE_003";
pub const STORE_SHEET_NOT_FOUND: &str = "SHMERGE_STORE_004";
pub const STORE_RANGE_MISMATCH: &str = "SHMERGE_STORE_005";
pub const STORE_IO: &str = "SHMERGE_STORE_006";
pub const STORE_MALFORMED_DOCUMENT: &str = "SHMERGE_STORE_007";

pub const CATALOG_INDEX_SHEET_NOT_FOUND: &str = "SHMERGE_CATALOG_001";
pub const CATALOG_SENTINEL_NOT_FOUND: &str = "SHMERGE_CATALOG_002";
pub const CATALOG_SHEET_NOT_FOUND: &str = "SHMERGE_CATALOG_003";
pub const CATALOG_REGION_UNRESOLVABLE: &str = "SHMERGE_CATALOG_004";

pub const FN_NOT_AN_INTEGER_LIST: &str = "SHMERGE_FN_001";
pub const FN_NO_CANDIDATES: &str = "SHMERGE_FN_002";
pub const FN_FAILED: &str = "SHMERGE_FN_003";

pub const MERGE_NO_ACTIVE_DOCUMENT: &str = "SHMERGE_MERGE_001";
pub const MERGE_NO_UPDATE_SOURCES: &str = "SHMERGE_MERGE_002";
pub const MERGE_UNKNOWN_MERGE_FN: &str = "SHMERGE_MERGE_003";
pub const MERGE_DIMENSION_MISMATCH: &str = "SHMERGE_MERGE_004";
