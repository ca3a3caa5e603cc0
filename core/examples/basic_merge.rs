use sheet_merge::{JsonStore, merge_files};

fn usage() -> ! {
    eprintln!("Usage: basic_merge <BASE.json> <SOURCE.json>...");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let base_path = args.next().unwrap_or_else(|| usage());
    let sources: Vec<String> = args.collect();
    if sources.is_empty() {
        usage();
    }

    let mut store = JsonStore::open_base(&base_path)?;
    let report = merge_files(&mut store, &sources)?;

    println!("regions merged: {}", report.regions_merged);
    println!("cells changed:  {}", report.cells_changed);
    println!("conflicts:      {}", report.conflicts.len());
    for conflict in &report.conflicts {
        println!("  {}", conflict.message);
    }
    if let Some(backup) = &report.backup_path {
        println!("backup:         {}", backup);
    }

    Ok(())
}
