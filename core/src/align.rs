//! Identifier-based row alignment.
//!
//! Update sources may have reordered, inserted, or removed rows relative to
//! the base. When both the base region and the update source's region carry
//! an identifier column, rows are matched by rendered identifier instead of
//! by position: the aligned grid is a clone of the base with each id-matched
//! row overwritten from the update source.
//!
//! Policy for the awkward cases:
//! - a base row whose id is empty or absent from the update stays untouched;
//! - ids present only in the update source are dropped (no schema growth);
//! - a duplicated id within one update source resolves to its last
//!   occurrence.

use crate::catalog::RegionConfig;
use crate::grid::Grid;
use rustc_hash::FxHashMap;

/// Lookup from rendered identifier to the row index carrying it.
///
/// Rows whose identifier cell renders empty are excluded. Duplicate
/// identifiers overwrite, so the last occurrence wins.
#[derive(Debug, Default)]
pub(crate) struct IdIndex {
    rows: FxHashMap<String, u32>,
}

impl IdIndex {
    pub(crate) fn build(grid: &Grid, id_col: u32) -> IdIndex {
        let mut rows = FxHashMap::default();
        for r in 0..grid.nrows() {
            let id = grid.render_at(r, id_col);
            if id.is_empty() {
                continue;
            }
            rows.insert(id, r);
        }
        IdIndex { rows }
    }

    pub(crate) fn lookup(&self, id: &str) -> Option<u32> {
        self.rows.get(id).copied()
    }
}

/// Align an update grid to the base grid by identifier.
///
/// Returns `None` when alignment is not applicable — the base region has no
/// configured id column, the update source has none, or a configured offset
/// lies outside its grid — signaling the caller to fall back to positional
/// comparison.
pub fn align_by_id(
    base: &Grid,
    base_config: Option<&RegionConfig>,
    update: &Grid,
    update_config: Option<&RegionConfig>,
) -> Option<Grid> {
    let base_id_col = base_config?.id_column_offset?;
    let update_config = update_config?;
    let update_id_col = update_config.id_column_offset?;

    if base_id_col >= base.ncols() || update_id_col >= update.ncols() {
        return None;
    }

    let index = IdIndex::build(update, update_id_col);
    let mut aligned = base.clone();
    let copy_cols = base.ncols().min(update.ncols());

    for r in 0..base.nrows() {
        let id = base.render_at(r, base_id_col);
        if id.is_empty() {
            continue;
        }
        let Some(update_row) = index.lookup(&id) else {
            continue;
        };
        for c in 0..copy_cols {
            if update_config.ignore_column_offsets.contains(&c) {
                continue;
            }
            aligned.set(r, c, update.get(update_row, c).clone());
        }
    }

    Some(aligned)
}
