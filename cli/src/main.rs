mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sheet-merge")]
#[command(about = "Merge edited copies of a tabular document into a base copy")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Merge update sources into a base document")]
    Merge {
        #[arg(help = "Path to the base document (JSON)")]
        base: String,
        #[arg(required = true, help = "Paths to update-source documents, in merge order")]
        sources: Vec<String>,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, value_name = "PATH", help = "Merge configuration JSON file")]
        config: Option<String>,
        #[arg(long, short, help = "Quiet mode: only list unresolved conflicts")]
        quiet: bool,
    },
    #[command(about = "Show the regions a base document's merge index describes")]
    Catalog {
        #[arg(help = "Path to the base document (JSON)")]
        base: String,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, value_name = "PATH", help = "Merge configuration JSON file")]
        config: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Merge {
            base,
            sources,
            format,
            config,
            quiet,
        } => commands::merge::run(&base, &sources, format, config.as_deref(), quiet),
        Commands::Catalog {
            base,
            format,
            config,
        } => commands::catalog::run(&base, format, config.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
