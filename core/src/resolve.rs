//! Conflict resolution policy and the merge-function registry.
//!
//! Per differing cell: a single distinct candidate is adopted outright; two
//! or more candidates go through the region's merge function if one is
//! configured, and otherwise become a conflict marker embedding the base
//! value and every candidate's provenance. Merge-function failures downgrade
//! to recorded conflicts; they never abort a session.

use crate::catalog::Region;
use crate::collect::{DiffEntry, DiffMap};
use crate::error_codes;
use crate::grid::Grid;
use crate::report::ConflictRecord;
use crate::value::CellValue;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Header line of a synthesized conflict marker.
pub const CONFLICT_HEADER: &str = "conflict";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MergeFnError {
    #[error("[SHMERGE_FN_001] candidate value '{value}' is not a comma-separated integer list")]
    NotAnIntegerList { value: String },

    #[error("[SHMERGE_FN_002] no candidate values supplied")]
    NoCandidates,

    #[error("[SHMERGE_FN_003] {message}")]
    Failed { message: String },
}

impl MergeFnError {
    pub fn code(&self) -> &'static str {
        match self {
            MergeFnError::NotAnIntegerList { .. } => error_codes::FN_NOT_AN_INTEGER_LIST,
            MergeFnError::NoCandidates => error_codes::FN_NO_CANDIDATES,
            MergeFnError::Failed { .. } => error_codes::FN_FAILED,
        }
    }
}

/// A pluggable resolution function: `(base value, distinct candidates)` to a
/// resolved value, or an error meaning "could not merge".
pub type MergeFn = Arc<dyn Fn(&str, &[String]) -> Result<String, MergeFnError> + Send + Sync>;

/// Registry mapping resolution-function identifiers to typed function
/// values, populated at startup. A region annotation naming an identifier
/// not present here is a config-time error, caught before anything is
/// written.
#[derive(Clone, Default)]
pub struct MergeFnRegistry {
    fns: FxHashMap<String, MergeFn>,
}

impl std::fmt::Debug for MergeFnRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeFnRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl MergeFnRegistry {
    pub fn empty() -> MergeFnRegistry {
        MergeFnRegistry::default()
    }

    /// Registry preloaded with the built-in functions: `merge_int_list`,
    /// `first_value`, and `concat_values`.
    pub fn builtin() -> MergeFnRegistry {
        let mut registry = MergeFnRegistry::default();
        registry.register("merge_int_list", Arc::new(merge_int_list));
        registry.register("first_value", Arc::new(first_value));
        registry.register("concat_values", Arc::new(concat_values));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, f: MergeFn) {
        self.fns.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<&MergeFn> {
        self.fns.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Union of all candidates parsed as comma-separated integer lists,
/// deduplicated, sorted ascending, rendered `"a, b, c"`.
fn merge_int_list(_base: &str, candidates: &[String]) -> Result<String, MergeFnError> {
    let mut merged: BTreeSet<i64> = BTreeSet::new();
    for candidate in candidates {
        for part in candidate.split(',') {
            let token = part.trim();
            if token.is_empty() {
                continue;
            }
            let n: i64 = token.parse().map_err(|_| MergeFnError::NotAnIntegerList {
                value: candidate.clone(),
            })?;
            merged.insert(n);
        }
    }

    let rendered: Vec<String> = merged.iter().map(|n| n.to_string()).collect();
    Ok(rendered.join(", "))
}

/// Adopt the first distinct candidate.
fn first_value(_base: &str, candidates: &[String]) -> Result<String, MergeFnError> {
    candidates.first().cloned().ok_or(MergeFnError::NoCandidates)
}

/// Join all distinct candidates with commas.
fn concat_values(_base: &str, candidates: &[String]) -> Result<String, MergeFnError> {
    Ok(candidates.join(","))
}

/// Synthesize the marker text placed into an unresolved cell: a header line,
/// the base value, then one provenance line per distinct candidate in
/// first-seen order.
fn conflict_marker(base_text: &str, entry: &DiffEntry) -> String {
    let mut lines = Vec::with_capacity(entry.provenance.len() + 2);
    lines.push(CONFLICT_HEADER.to_string());
    lines.push(format!("base: {}", base_text));
    lines.extend(entry.provenance.iter().cloned());
    lines.join("\n")
}

/// Apply resolution policy over one region's accumulated diffs.
///
/// Returns the final grid (a working copy of the base with resolved values
/// applied) and the conflict records produced, in diff-map insertion order.
pub fn resolve_region(
    region: &Region,
    base: &Grid,
    diffs: &DiffMap,
    merge_fn: Option<&MergeFn>,
) -> (Grid, Vec<ConflictRecord>) {
    let mut resolved = base.clone();
    let mut conflicts = Vec::new();

    for (key, entry) in diffs.iter() {
        let row = key.row - region.range.start_row;
        let col = key.col - region.range.start_col;

        match entry.values.as_slice() {
            [] => {}
            [only] => resolved.set(row, col, CellValue::from_rendered(only)),
            candidates => {
                let base_text = base.render_at(row, col);
                let merged = match merge_fn {
                    Some(f) => match f(&base_text, &entry.values) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            debug!(cell = %key.to_a1(), error = %e, "merge function failed");
                            None
                        }
                    },
                    None => None,
                };

                match merged {
                    Some(value) => resolved.set(row, col, CellValue::from_rendered(&value)),
                    None => {
                        let marker = conflict_marker(&base_text, entry);
                        resolved.set(row, col, CellValue::Text(marker));
                        conflicts.push(ConflictRecord {
                            sheet: key.sheet.clone(),
                            cell: key.to_a1(),
                            message: format!(
                                "unresolved conflict at {}!{}: {} candidate values",
                                key.sheet,
                                key.to_a1(),
                                candidates.len()
                            ),
                        });
                    }
                }
            }
        }
    }

    (resolved, conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect_diffs;

    fn region() -> Region {
        Region {
            sheet: "Data".to_string(),
            range: "A1:B2".parse().unwrap(),
        }
    }

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|s| CellValue::from_rendered(s)).collect())
                .collect(),
        )
        .expect("rectangular test grid")
    }

    fn diffs_for(base: &Grid, updates: &[Grid]) -> DiffMap {
        let mut diffs = DiffMap::new();
        for (i, update) in updates.iter().enumerate() {
            collect_diffs(&region(), i + 1, base, update, &mut diffs);
        }
        diffs
    }

    #[test]
    fn no_diffs_returns_base_unchanged() {
        let base = grid(&[&["a", "b"], &["c", "d"]]);
        let (resolved, conflicts) = resolve_region(&region(), &base, &DiffMap::new(), None);
        assert_eq!(resolved, base);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn single_distinct_value_adopted_unconditionally() {
        let base = grid(&[&["x", "b"], &["c", "d"]]);
        let update = grid(&[&["z", "b"], &["c", "d"]]);
        let diffs = diffs_for(&base, &[update.clone(), update]);

        let (resolved, conflicts) = resolve_region(&region(), &base, &diffs, None);
        assert_eq!(resolved.render_at(0, 0), "z");
        assert!(conflicts.is_empty());
    }

    #[test]
    fn two_candidates_without_merge_fn_become_marker() {
        let base = grid(&[&["100", ""], &["", ""]]);
        let first = grid(&[&["200", ""], &["", ""]]);
        let second = grid(&[&["300", ""], &["", ""]]);
        let diffs = diffs_for(&base, &[first, second]);

        let (resolved, conflicts) = resolve_region(&region(), &base, &diffs, None);
        let marker = resolved.render_at(0, 0);
        assert!(marker.starts_with(CONFLICT_HEADER));
        assert!(marker.contains("base: 100"));
        assert!(marker.contains("1: 200"));
        assert!(marker.contains("2: 300"));

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].sheet, "Data");
        assert_eq!(conflicts[0].cell, "A1");
    }

    #[test]
    fn merge_fn_resolves_multi_candidate_cells() {
        let base = grid(&[&["1, 2", ""], &["", ""]]);
        let first = grid(&[&["1, 2, 3", ""], &["", ""]]);
        let second = grid(&[&["4, 2", ""], &["", ""]]);
        let diffs = diffs_for(&base, &[first, second]);

        let registry = MergeFnRegistry::builtin();
        let f = registry.get("merge_int_list").cloned().unwrap();
        let (resolved, conflicts) = resolve_region(&region(), &base, &diffs, Some(&f));
        assert_eq!(resolved.render_at(0, 0), "1, 2, 3, 4");
        assert!(conflicts.is_empty());
    }

    #[test]
    fn failing_merge_fn_downgrades_to_conflict() {
        let base = grid(&[&["100", ""], &["", ""]]);
        let first = grid(&[&["not-a-list", ""], &["", ""]]);
        let second = grid(&[&["300", ""], &["", ""]]);
        let diffs = diffs_for(&base, &[first, second]);

        let registry = MergeFnRegistry::builtin();
        let f = registry.get("merge_int_list").cloned().unwrap();
        let (resolved, conflicts) = resolve_region(&region(), &base, &diffs, Some(&f));
        assert!(resolved.render_at(0, 0).starts_with(CONFLICT_HEADER));
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn builtin_merge_int_list_unions_and_sorts() {
        let out = merge_int_list("", &["3, 4, 5, 6, 7".to_string(), "8, 9, 10".to_string()])
            .unwrap();
        assert_eq!(out, "3, 4, 5, 6, 7, 8, 9, 10");

        let deduped = merge_int_list("", &["5, 1".to_string(), "1, 9".to_string()]).unwrap();
        assert_eq!(deduped, "1, 5, 9");

        let err = merge_int_list("", &["1, x".to_string()]).unwrap_err();
        assert!(matches!(err, MergeFnError::NotAnIntegerList { .. }));
    }

    #[test]
    fn builtin_first_and_concat() {
        let candidates = vec!["a".to_string(), "b".to_string()];
        assert_eq!(first_value("", &candidates).unwrap(), "a");
        assert_eq!(concat_values("", &candidates).unwrap(), "a,b");
        assert!(matches!(
            first_value("", &[]).unwrap_err(),
            MergeFnError::NoCandidates
        ));
    }

    #[test]
    fn registry_lists_builtins() {
        let registry = MergeFnRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec!["concat_values", "first_value", "merge_int_list"]
        );
        assert!(registry.get("nope").is_none());
    }
}
