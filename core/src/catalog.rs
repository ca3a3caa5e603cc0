//! Region catalog discovery.
//!
//! The base document carries a merge index: a column of sheet names starting
//! at a configured origin and terminated by a sentinel value. Each listed
//! sheet contributes one mergeable region, resolved either from a reserved
//! named region on that sheet (whose annotation holds the region's
//! [`RegionConfig`]) or from four companion columns recorded next to the name
//! cell in the index.

use crate::addressing::{RangeRef, index_to_address};
use crate::config::MergeConfig;
use crate::error_codes;
use crate::store::{DocId, StoreError, TabularStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

/// A mergeable rectangular span within one sheet, fixed for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub sheet: String,
    pub range: RangeRef,
}

/// Per-region merge behavior, parsed from the named region's annotation.
///
/// Offsets are zero-based and relative to the region's first column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionConfig {
    pub id_column_offset: Option<u32>,
    pub ignore_column_offsets: BTreeSet<u32>,
    pub merge_fn: Option<String>,
}

/// Parse annotation text into a [`RegionConfig`].
///
/// Malformed text degrades to `None`; a broken annotation must never abort
/// discovery.
pub fn parse_region_config(text: &str) -> Option<RegionConfig> {
    match serde_json::from_str::<RegionConfig>(text) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(error = %e, "malformed region annotation; treating region as unconfigured");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub region: Region,
    pub config: Option<RegionConfig>,
}

/// Regions in discovery order. A sheet listed more than once in the index
/// holds more than one entry.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RegionCatalog {
    entries: Vec<CatalogEntry>,
}

impl RegionCatalog {
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn for_sheet<'a>(&'a self, sheet: &'a str) -> impl Iterator<Item = &'a CatalogEntry> {
        self.entries.iter().filter(move |e| e.region.sheet == sheet)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("[SHMERGE_CATALOG_001] index sheet '{sheet}' not found in the base document")]
    IndexSheetNotFound { sheet: String },

    #[error(
        "[SHMERGE_CATALOG_002] sentinel '{sentinel}' not found within {scanned} rows below {origin}"
    )]
    SentinelNotFound {
        sentinel: String,
        scanned: u32,
        origin: String,
    },

    #[error("[SHMERGE_CATALOG_003] sheet '{sheet}' listed in the merge index does not exist")]
    SheetNotFound { sheet: String },

    #[error("[SHMERGE_CATALOG_004] region for sheet '{sheet}' cannot be resolved: {reason}")]
    RegionUnresolvable { sheet: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::IndexSheetNotFound { .. } => error_codes::CATALOG_INDEX_SHEET_NOT_FOUND,
            CatalogError::SentinelNotFound { .. } => error_codes::CATALOG_SENTINEL_NOT_FOUND,
            CatalogError::SheetNotFound { .. } => error_codes::CATALOG_SHEET_NOT_FOUND,
            CatalogError::RegionUnresolvable { .. } => error_codes::CATALOG_REGION_UNRESOLVABLE,
            CatalogError::Store(e) => e.code(),
        }
    }
}

/// Scan the base document's merge index and build the region catalog.
pub fn discover_regions(
    store: &dyn TabularStore,
    doc: DocId,
    config: &MergeConfig,
) -> Result<RegionCatalog, CatalogError> {
    if !store.sheet_exists(doc, &config.index_sheet)? {
        return Err(CatalogError::IndexSheetNotFound {
            sheet: config.index_sheet.clone(),
        });
    }

    let origin = config.index_origin;
    let mut catalog = RegionCatalog::default();
    let mut sentinel_found = false;

    for offset in 0..config.max_index_scan {
        let row = origin.row + offset;
        let value = store.read_cell(doc, &config.index_sheet, row, origin.col)?;
        let text = value.to_string();

        if text == config.sentinel {
            sentinel_found = true;
            break;
        }
        if text.is_empty() {
            continue;
        }
        if config.is_ignored_sheet(&text) {
            debug!(sheet = %text, "skipping ignored sheet");
            continue;
        }

        if !store.sheet_exists(doc, &text)? {
            return Err(CatalogError::SheetNotFound { sheet: text });
        }

        let entry = match store.named_region(doc, &text, &config.region_name)? {
            Some(named) => {
                let region_config = named.annotation.as_deref().and_then(parse_region_config);
                CatalogEntry {
                    region: Region {
                        sheet: text,
                        range: named.range,
                    },
                    config: region_config,
                }
            }
            None => {
                let range = range_from_companion_columns(store, doc, config, row, &text)?;
                CatalogEntry {
                    region: Region { sheet: text, range },
                    config: None,
                }
            }
        };

        debug!(
            sheet = %entry.region.sheet,
            range = %entry.region.range,
            configured = entry.config.is_some(),
            "discovered region"
        );
        catalog.entries.push(entry);
    }

    if !sentinel_found {
        return Err(CatalogError::SentinelNotFound {
            sentinel: config.sentinel.clone(),
            scanned: config.max_index_scan,
            origin: origin.to_a1(),
        });
    }

    Ok(catalog)
}

/// Resolve a region from the four companion columns beside the name cell:
/// 1-based left column, right column, header row, and bottom row. The usable
/// rectangle spans the rows strictly below the header down to the bottom row.
fn range_from_companion_columns(
    store: &dyn TabularStore,
    doc: DocId,
    config: &MergeConfig,
    index_row: u32,
    sheet: &str,
) -> Result<RangeRef, CatalogError> {
    let mut bounds = [0u32; 4];
    let labels = ["left column", "right column", "header row", "bottom row"];

    for (i, label) in labels.iter().enumerate() {
        let col = config.index_origin.col + 1 + i as u32;
        let cell = store.read_cell(doc, &config.index_sheet, index_row, col)?;
        let text = cell.to_string();
        bounds[i] = text
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| CatalogError::RegionUnresolvable {
                sheet: sheet.to_string(),
                reason: format!(
                    "{} at {} is '{}', expected a positive integer",
                    label,
                    index_to_address(index_row, col),
                    text
                ),
            })?;
    }

    let [left, right, header_row, bottom_row] = bounds;
    if right < left {
        return Err(CatalogError::RegionUnresolvable {
            sheet: sheet.to_string(),
            reason: format!("right column {} is left of left column {}", right, left),
        });
    }
    if bottom_row <= header_row {
        return Err(CatalogError::RegionUnresolvable {
            sheet: sheet.to_string(),
            reason: format!(
                "bottom row {} does not lie below header row {}",
                bottom_row, header_row
            ),
        });
    }

    // 1-based inclusive bounds; the first usable row is the one after the
    // header.
    Ok(RangeRef::new(
        header_row,
        left - 1,
        bottom_row - 1,
        right - 1,
    ))
}
