use anyhow::Result;
use sheet_merge::{MergeReport, RegionCatalog};
use std::io::Write;

pub fn write_merge_report<W: Write>(w: &mut W, report: &MergeReport, quiet: bool) -> Result<()> {
    if report.conflicts.is_empty() {
        if !quiet {
            writeln!(w, "Merged clean.")?;
        }
    } else {
        writeln!(w, "Unresolved conflicts:")?;
        for conflict in &report.conflicts {
            writeln!(w, "  {}", conflict.message)?;
        }
    }

    if !quiet {
        writeln!(w)?;
        writeln!(w, "Regions merged:  {}", report.regions_merged)?;
        writeln!(w, "Sources applied: {}", report.sources_applied)?;
        writeln!(w, "Cells changed:   {}", report.cells_changed)?;
        if let Some(backup) = &report.backup_path {
            writeln!(w, "Backup:          {}", backup)?;
        }
    }

    Ok(())
}

pub fn write_catalog<W: Write>(w: &mut W, catalog: &RegionCatalog) -> Result<()> {
    if catalog.is_empty() {
        writeln!(w, "No mergeable regions.")?;
        return Ok(());
    }

    for entry in catalog.iter() {
        let mut notes = Vec::new();
        if let Some(config) = &entry.config {
            if let Some(id_col) = config.id_column_offset {
                notes.push(format!("id column {}", id_col));
            }
            if !config.ignore_column_offsets.is_empty() {
                let cols: Vec<String> = config
                    .ignore_column_offsets
                    .iter()
                    .map(|c| c.to_string())
                    .collect();
                notes.push(format!("ignores {}", cols.join(",")));
            }
            if let Some(name) = &config.merge_fn {
                notes.push(format!("merge_fn {}", name));
            }
        }

        if notes.is_empty() {
            writeln!(w, "{}!{}", entry.region.sheet, entry.region.range)?;
        } else {
            writeln!(
                w,
                "{}!{} ({})",
                entry.region.sheet,
                entry.region.range,
                notes.join(", ")
            )?;
        }
    }

    Ok(())
}
