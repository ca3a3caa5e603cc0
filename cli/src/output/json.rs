use anyhow::Result;
use serde_json::json;
use sheet_merge::{MergeReport, RegionCatalog, serialize_report};
use std::io::Write;

pub fn write_merge_report<W: Write>(w: &mut W, report: &MergeReport) -> Result<()> {
    writeln!(w, "{}", serialize_report(report)?)?;
    Ok(())
}

pub fn write_catalog<W: Write>(w: &mut W, catalog: &RegionCatalog) -> Result<()> {
    let entries: Vec<serde_json::Value> = catalog
        .iter()
        .map(|entry| {
            json!({
                "sheet": entry.region.sheet,
                "range": entry.region.range.to_a1(),
                "config": entry.config,
            })
        })
        .collect();
    writeln!(w, "{}", serde_json::to_string_pretty(&json!({ "regions": entries }))?)?;
    Ok(())
}
