//! Cell-level diff collection across update sources.
//!
//! Comparison happens on canonical string renderings; an empty or missing
//! cell renders as `""`. Differing values accumulate per cell with
//! provenance: the 1-based index of the source that first introduced each
//! distinct value. A later source contributing an already-seen value adds
//! nothing — provenance identifies first introducers, not every agreeing
//! source.

use crate::addressing::index_to_address;
use crate::catalog::Region;
use crate::grid::Grid;
use rustc_hash::FxHashMap;

/// Absolute coordinate of one differing cell inside a region's base grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub sheet: String,
    pub row: u32,
    pub col: u32,
}

impl CellKey {
    pub fn to_a1(&self) -> String {
        index_to_address(self.row, self.col)
    }
}

/// Distinct differing values for one cell, in first-seen order, with a
/// parallel provenance line per value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffEntry {
    pub values: Vec<String>,
    pub provenance: Vec<String>,
}

impl DiffEntry {
    fn record(&mut self, source_number: usize, value: String) {
        if self.values.contains(&value) {
            return;
        }
        self.provenance.push(format!("{}: {}", source_number, value));
        self.values.push(value);
    }
}

/// Insertion-ordered map from [`CellKey`] to [`DiffEntry`].
///
/// Iteration follows first-insertion order, which downstream consumers rely
/// on for deterministic conflict reports.
#[derive(Debug, Default)]
pub struct DiffMap {
    order: Vec<CellKey>,
    entries: FxHashMap<CellKey, DiffEntry>,
}

impl DiffMap {
    pub fn new() -> DiffMap {
        DiffMap::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, key: &CellKey) -> Option<&DiffEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &DiffEntry)> {
        self.order.iter().map(move |k| {
            let entry = self
                .entries
                .get(k)
                .expect("ordering vector only holds inserted keys");
            (k, entry)
        })
    }

    fn get_or_insert(&mut self, key: CellKey) -> &mut DiffEntry {
        use std::collections::hash_map::Entry;
        match self.entries.entry(key) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(v) => {
                self.order.push(v.key().clone());
                v.insert(DiffEntry::default())
            }
        }
    }
}

/// Compare the base grid against one source's aligned grid, accumulating
/// differing values into `diffs`. `source_number` is 1-based caller-supplied
/// order, which fixes provenance indices.
pub fn collect_diffs(
    region: &Region,
    source_number: usize,
    base: &Grid,
    aligned: &Grid,
    diffs: &mut DiffMap,
) {
    debug_assert!(
        base.nrows() == aligned.nrows() && base.ncols() == aligned.ncols(),
        "aligned grid must match the base grid's dimensions"
    );

    for r in 0..base.nrows() {
        for c in 0..base.ncols() {
            let base_text = base.render_at(r, c);
            let update_text = aligned.render_at(r, c);
            if base_text == update_text {
                continue;
            }

            let key = CellKey {
                sheet: region.sheet.clone(),
                row: region.range.start_row + r,
                col: region.range.start_col + c,
            };
            diffs.get_or_insert(key).record(source_number, update_text);
        }
    }
}
