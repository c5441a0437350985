//! Schema Check CLI
//!
//! Normalizes a schema definition file and prints a summary: type counts per
//! category, field counts, and any duplicate-name warnings. Warnings do not
//! fail the run.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use schema_erd::{Dialect, TypeCategory};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-erd-check")]
#[command(about = "Normalize a schema definition and report its shape")]
struct Cli {
    /// Path to the schema definition file
    input: PathBuf,

    /// Input dialect: native, introspection or manifest
    #[arg(short, long, default_value = "native")]
    dialect: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let dialect: Dialect = cli
        .dialect
        .parse()
        .map_err(|msg: String| anyhow::anyhow!(msg))?;

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let schema = dialect.normalize_text(&text)?;

    let mut documents = 0usize;
    let mut objects = 0usize;
    let mut other = 0usize;
    let mut field_total = 0usize;
    for type_def in schema.types() {
        match &type_def.category {
            TypeCategory::Document => documents += 1,
            TypeCategory::Object => objects += 1,
            TypeCategory::Other(_) => other += 1,
        }
        field_total += type_def.fields.len();
    }

    println!("Types: {} total", schema.type_count());
    println!("  documents: {documents}");
    println!("  objects:   {objects}");
    println!("  other:     {other}");
    println!("Fields: {field_total}");

    if schema.warnings().is_empty() {
        println!("No warnings.");
    } else {
        println!("Warnings:");
        for warning in schema.warnings() {
            println!("  - {warning}");
        }
    }

    Ok(())
}
