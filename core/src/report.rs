//! Merge reports and conflict records.

use serde::{Deserialize, Serialize};

/// One unresolved conflict, recorded when automatic resolution fails for a
/// cell. Records are append-only and never mutated after emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub sheet: String,
    pub cell: String,
    pub message: String,
}

/// Outcome of one merge session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeReport {
    pub conflicts: Vec<ConflictRecord>,
    pub regions_merged: usize,
    pub sources_applied: usize,
    /// Cells that differed from the base in at least one source.
    pub cells_changed: usize,
    pub backup_path: Option<String>,
}

impl MergeReport {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

pub fn serialize_report(report: &MergeReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
