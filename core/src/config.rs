//! Configuration for the merge engine.
//!
//! `MergeConfig` centralizes the index-discovery protocol knobs so the
//! scanning constants are not scattered through the catalog builder.

use crate::addressing::CellAddress;
use crate::error_codes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Sheet in the base document holding the merge index.
    pub index_sheet: String,
    /// First cell of the index's sheet-name column.
    pub index_origin: CellAddress,
    /// Terminal value ending the index scan (exact, case-sensitive).
    pub sentinel: String,
    /// Upper bound on scanned index rows before the missing sentinel is
    /// treated as fatal.
    pub max_index_scan: u32,
    /// Sheet names excluded from discovery, compared case-insensitively.
    pub ignored_sheets: Vec<String>,
    /// Reserved named-region name marking a sheet's mergeable area.
    pub region_name: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            index_sheet: "MergeIndex".to_string(),
            index_origin: CellAddress::from_indices(1, 0),
            sentinel: "#END".to_string(),
            max_index_scan: 1_000,
            ignored_sheets: Vec::new(),
            region_name: "MERGE_AREA".to_string(),
        }
    }
}

impl MergeConfig {
    pub fn builder() -> MergeConfigBuilder {
        MergeConfigBuilder {
            inner: MergeConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_empty(&self.index_sheet, "index_sheet")?;
        ensure_non_empty(&self.sentinel, "sentinel")?;
        ensure_non_empty(&self.region_name, "region_name")?;
        if self.max_index_scan == 0 {
            return Err(ConfigError::NonPositiveLimit {
                field: "max_index_scan",
            });
        }
        Ok(())
    }

    pub(crate) fn is_ignored_sheet(&self, name: &str) -> bool {
        self.ignored_sheets
            .iter()
            .any(|s| s.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("[SHMERGE_CONFIG_001] {field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("[SHMERGE_CONFIG_002] {field} must be greater than zero")]
    NonPositiveLimit { field: &'static str },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::EmptyField { .. } => error_codes::CONFIG_EMPTY_FIELD,
            ConfigError::NonPositiveLimit { .. } => error_codes::CONFIG_NON_POSITIVE_LIMIT,
        }
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyField { field });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct MergeConfigBuilder {
    inner: MergeConfig,
}

impl MergeConfigBuilder {
    pub fn new() -> Self {
        MergeConfig::builder()
    }

    pub fn index_sheet(mut self, value: impl Into<String>) -> Self {
        self.inner.index_sheet = value.into();
        self
    }

    pub fn index_origin(mut self, value: CellAddress) -> Self {
        self.inner.index_origin = value;
        self
    }

    pub fn sentinel(mut self, value: impl Into<String>) -> Self {
        self.inner.sentinel = value.into();
        self
    }

    pub fn max_index_scan(mut self, value: u32) -> Self {
        self.inner.max_index_scan = value;
        self
    }

    pub fn ignored_sheets(mut self, value: Vec<String>) -> Self {
        self.inner.ignored_sheets = value;
        self
    }

    pub fn region_name(mut self, value: impl Into<String>) -> Self {
        self.inner.region_name = value.into();
        self
    }

    pub fn build(self) -> Result<MergeConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_index_protocol() {
        let cfg = MergeConfig::default();
        assert_eq!(cfg.index_sheet, "MergeIndex");
        assert_eq!(cfg.index_origin.to_a1(), "A2");
        assert_eq!(cfg.sentinel, "#END");
        assert_eq!(cfg.max_index_scan, 1_000);
        assert_eq!(cfg.region_name, "MERGE_AREA");
    }

    #[test]
    fn serde_round_trip_preserves_defaults() {
        let cfg = MergeConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize default config");
        let parsed: MergeConfig = serde_json::from_str(&json).expect("deserialize default config");
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn builder_rejects_empty_sentinel() {
        let err = MergeConfig::builder()
            .sentinel("")
            .build()
            .expect_err("builder should reject an empty sentinel");
        assert!(matches!(err, ConfigError::EmptyField { field: "sentinel" }));
    }

    #[test]
    fn builder_rejects_zero_scan_bound() {
        let err = MergeConfig::builder()
            .max_index_scan(0)
            .build()
            .expect_err("builder should reject a zero scan bound");
        assert_eq!(err.code(), "SHMERGE_CONFIG_002");
    }

    #[test]
    fn ignore_list_is_case_insensitive() {
        let cfg = MergeConfig::builder()
            .ignored_sheets(vec!["Notes".to_string()])
            .build()
            .unwrap();
        assert!(cfg.is_ignored_sheet("notes"));
        assert!(cfg.is_ignored_sheet("NOTES"));
        assert!(!cfg.is_ignored_sheet("Data"));
    }
}
