use crate::OutputFormat;
use crate::commands::load_config;
use crate::output::{json, text};
use anyhow::{Context, Result};
use sheet_merge::{JsonStore, TabularStore, discover_regions};
use std::io::{self, Write};
use std::process::ExitCode;

pub fn run(base_path: &str, format: OutputFormat, config_path: Option<&str>) -> Result<ExitCode> {
    let config = load_config(config_path)?;

    let store = JsonStore::open_base(base_path)
        .with_context(|| format!("Failed to open base document: {}", base_path))?;
    let doc = store
        .active_document()
        .context("base document did not open as active")?;

    let catalog = discover_regions(&store, doc, &config)
        .with_context(|| format!("Region discovery in {} failed", base_path))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Text => text::write_catalog(&mut handle, &catalog)?,
        OutputFormat::Json => json::write_catalog(&mut handle, &catalog)?,
    }
    handle.flush()?;

    Ok(ExitCode::SUCCESS)
}
