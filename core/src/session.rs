//! Merge session orchestration.
//!
//! A [`MergeSession`] is constructed per invocation and owns the sequencing:
//! build the region catalog once, then for each region in discovery order
//! scan every update source (open, read, align, collect diffs, close without
//! persisting), resolve the region, and bulk-write the result. A region's
//! resolution never waits on the next region's scanning, and no write for a
//! region begins before its diffs across all sources are complete.
//!
//! The session takes `&mut` access to its store for the whole run; callers
//! wanting to merge into the same base document concurrently must serialize
//! on that borrow.

use crate::align::align_by_id;
use crate::catalog::{
    CatalogEntry, CatalogError, Region, RegionCatalog, discover_regions, parse_region_config,
};
use crate::collect::{DiffMap, collect_diffs};
use crate::config::MergeConfig;
use crate::error_codes;
use crate::grid::Grid;
use crate::report::MergeReport;
use crate::resolve::{MergeFn, MergeFnRegistry, resolve_region};
use crate::store::{DocId, StoreError, TabularStore};
use thiserror::Error;
use tracing::{debug, info, info_span};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MergeError {
    #[error("[SHMERGE_MERGE_001] no active base document")]
    NoActiveDocument,

    #[error("[SHMERGE_MERGE_002] no update sources supplied")]
    NoUpdateSources,

    #[error("[SHMERGE_MERGE_003] region {sheet}!{range} names unknown merge function '{name}'")]
    UnknownMergeFn {
        sheet: String,
        range: String,
        name: String,
    },

    #[error(
        "[SHMERGE_MERGE_004] source '{source}' grid for {sheet}!{range} is \
         {update_rows}x{update_cols} but the base grid is {base_rows}x{base_cols}"
    )]
    DimensionMismatch {
        source: String,
        sheet: String,
        range: String,
        base_rows: u32,
        base_cols: u32,
        update_rows: u32,
        update_cols: u32,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MergeError {
    pub fn code(&self) -> &'static str {
        match self {
            MergeError::NoActiveDocument => error_codes::MERGE_NO_ACTIVE_DOCUMENT,
            MergeError::NoUpdateSources => error_codes::MERGE_NO_UPDATE_SOURCES,
            MergeError::UnknownMergeFn { .. } => error_codes::MERGE_UNKNOWN_MERGE_FN,
            MergeError::DimensionMismatch { .. } => error_codes::MERGE_DIMENSION_MISMATCH,
            MergeError::Catalog(e) => e.code(),
            MergeError::Store(e) => e.code(),
        }
    }
}

/// One merge invocation: configuration plus the merge-function registry the
/// catalog's `merge_fn` annotations resolve against.
#[derive(Debug)]
pub struct MergeSession {
    config: MergeConfig,
    registry: MergeFnRegistry,
}

impl Default for MergeSession {
    fn default() -> Self {
        MergeSession::new(MergeConfig::default(), MergeFnRegistry::builtin())
    }
}

impl MergeSession {
    pub fn new(config: MergeConfig, registry: MergeFnRegistry) -> MergeSession {
        MergeSession { config, registry }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Run the merge: fold every update source into the base document and
    /// report unresolved conflicts.
    ///
    /// Sources are scanned in the given order, which fixes provenance indices
    /// and first-seen ordering inside conflict markers. Fatal errors abort
    /// before the base document is saved; the pre-mutation backup is taken
    /// only after the catalog and every configured merge-function name have
    /// validated.
    pub fn run(
        &self,
        store: &mut dyn TabularStore,
        source_paths: &[String],
    ) -> Result<MergeReport, MergeError> {
        let base = store.active_document().ok_or(MergeError::NoActiveDocument)?;
        if source_paths.is_empty() {
            return Err(MergeError::NoUpdateSources);
        }

        let catalog = {
            let _span = info_span!("catalog").entered();
            discover_regions(store, base, &self.config)?
        };
        info!(regions = catalog.len(), sources = source_paths.len(), "catalog built");

        let merge_fns = self.resolve_merge_fns(&catalog)?;

        let backup_path = store.backup_document(base)?;
        debug!(backup = %backup_path, "base document backed up");

        let mut report = MergeReport {
            backup_path: Some(backup_path),
            sources_applied: source_paths.len(),
            ..MergeReport::default()
        };

        for (entry, merge_fn) in catalog.iter().zip(&merge_fns) {
            let region = &entry.region;
            let _span =
                info_span!("region", sheet = %region.sheet, range = %region.range).entered();

            let base_grid = store.read_grid(base, &region.sheet, &region.range)?;
            let mut diffs = DiffMap::new();

            {
                let _span = info_span!("scan").entered();
                for (i, path) in source_paths.iter().enumerate() {
                    self.scan_source(store, entry, &base_grid, i + 1, path, &mut diffs)?;
                }
            }

            let (resolved, conflicts) = {
                let _span = info_span!("resolve").entered();
                resolve_region(region, &base_grid, &diffs, merge_fn.as_ref())
            };
            debug!(
                cells_changed = diffs.len(),
                conflicts = conflicts.len(),
                "region resolved"
            );

            {
                let _span = info_span!("write").entered();
                store.write_grid(base, &region.sheet, &region.range, &resolved)?;
            }

            report.cells_changed += diffs.len();
            report.conflicts.extend(conflicts);
            report.regions_merged += 1;
        }

        store.save_document(base)?;
        info!(
            regions = report.regions_merged,
            cells = report.cells_changed,
            conflicts = report.conflicts.len(),
            "merge session complete"
        );

        Ok(report)
    }

    /// Resolve every configured merge-function name up front so an unknown
    /// identifier fails the session before the backup is taken or anything
    /// is written.
    fn resolve_merge_fns(
        &self,
        catalog: &RegionCatalog,
    ) -> Result<Vec<Option<MergeFn>>, MergeError> {
        catalog
            .iter()
            .map(|entry| {
                let Some(name) = entry.config.as_ref().and_then(|c| c.merge_fn.as_deref()) else {
                    return Ok(None);
                };
                match self.registry.get(name) {
                    Some(f) => Ok(Some(f.clone())),
                    None => Err(MergeError::UnknownMergeFn {
                        sheet: entry.region.sheet.clone(),
                        range: entry.region.range.to_a1(),
                        name: name.to_string(),
                    }),
                }
            })
            .collect()
    }

    /// Scan one update source for one region: open, read its copy of the
    /// region, align, collect diffs. The source is closed without persisting
    /// on every exit path, success or failure.
    fn scan_source(
        &self,
        store: &mut dyn TabularStore,
        entry: &CatalogEntry,
        base_grid: &Grid,
        source_number: usize,
        path: &str,
        diffs: &mut DiffMap,
    ) -> Result<(), MergeError> {
        let src = store.open_source(path)?;
        let scanned = self.scan_open_source(store, entry, base_grid, source_number, path, src, diffs);
        let closed = store.close_source(src, false);
        scanned?;
        closed.map_err(MergeError::from)
    }

    fn scan_open_source(
        &self,
        store: &mut dyn TabularStore,
        entry: &CatalogEntry,
        base_grid: &Grid,
        source_number: usize,
        path: &str,
        src: DocId,
        diffs: &mut DiffMap,
    ) -> Result<(), MergeError> {
        let region = &entry.region;
        if !store.sheet_exists(src, &region.sheet)? {
            // Not an error: this source simply contributes nothing here.
            debug!(source = path, sheet = %region.sheet, "source lacks sheet, skipping region");
            return Ok(());
        }

        // The source's own named region, when present, supplies both the
        // rectangle to read and the config that gates id alignment.
        let named = store.named_region(src, &region.sheet, &self.config.region_name)?;
        let (update_range, update_config) = match &named {
            Some(named) => (
                named.range,
                named.annotation.as_deref().and_then(parse_region_config),
            ),
            None => (region.range, None),
        };

        let update_grid = store.read_grid(src, &region.sheet, &update_range)?;

        let aligned = match align_by_id(
            base_grid,
            entry.config.as_ref(),
            &update_grid,
            update_config.as_ref(),
        ) {
            Some(aligned) => aligned,
            None => {
                if update_grid.nrows() != base_grid.nrows()
                    || update_grid.ncols() != base_grid.ncols()
                {
                    return Err(dimension_mismatch(region, path, base_grid, &update_grid));
                }
                update_grid
            }
        };

        collect_diffs(region, source_number, base_grid, &aligned, diffs);
        Ok(())
    }
}

fn dimension_mismatch(region: &Region, path: &str, base: &Grid, update: &Grid) -> MergeError {
    MergeError::DimensionMismatch {
        source: path.to_string(),
        sheet: region.sheet.clone(),
        range: region.range.to_a1(),
        base_rows: base.nrows(),
        base_cols: base.ncols(),
        update_rows: update.nrows(),
        update_cols: update.ncols(),
    }
}

/// Merge the given update sources into the store's active base document with
/// default configuration and the built-in merge functions.
pub fn merge_files(
    store: &mut dyn TabularStore,
    source_paths: &[String],
) -> Result<MergeReport, MergeError> {
    MergeSession::default().run(store, source_paths)
}
