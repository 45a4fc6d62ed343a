use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lineage::hierarchy::{display_value, project_hierarchy};
use lineage::ingest::DecoderRegistry;
use lineage::normalize::normalize;
use lineage::report::analyze;

#[derive(Parser, Debug)]
#[command(name = "check")]
#[command(about = "Validate a genealogy record file without starting the server")]
struct Args {
    /// Record file to check (.json or .csv)
    file: PathBuf,

    /// Print the projected display hierarchy as JSON
    #[arg(long)]
    tree: bool,
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();

    let content = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let records = DecoderRegistry::new().decode(&content, name)?;
    let outcome = analyze(normalize(&records));

    log::info!(
        "{}: {} record(s), {} diagnostic(s)",
        args.file.display(),
        outcome.persons.len(),
        outcome.errors.len()
    );
    for error in &outcome.errors {
        println!("{}", error);
    }

    if args.tree {
        let tree = project_hierarchy(&outcome.persons);
        println!("{}", serde_json::to_string_pretty(&display_value(&tree))?);
    }

    if !outcome.errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
