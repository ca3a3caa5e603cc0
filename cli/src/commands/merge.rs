use crate::OutputFormat;
use crate::commands::load_config;
use crate::output::{json, text};
use anyhow::{Context, Result};
use sheet_merge::{JsonStore, MergeFnRegistry, MergeSession};
use std::io::{self, Write};
use std::process::ExitCode;

pub fn run(
    base_path: &str,
    source_paths: &[String],
    format: OutputFormat,
    config_path: Option<&str>,
    quiet: bool,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;

    let mut store = JsonStore::open_base(base_path)
        .with_context(|| format!("Failed to open base document: {}", base_path))?;

    let session = MergeSession::new(config, MergeFnRegistry::builtin());
    let report = session
        .run(&mut store, source_paths)
        .with_context(|| format!("Merge into {} failed", base_path))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Text => text::write_merge_report(&mut handle, &report, quiet)?,
        OutputFormat::Json => json::write_merge_report(&mut handle, &report)?,
    }
    handle.flush()?;

    Ok(if report.has_conflicts() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
