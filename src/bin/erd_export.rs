//! Schema ERD Export CLI
//!
//! Converts a schema definition file to an entity-relationship graph and
//! writes it as DOT, JSON, or SVG (via GraphViz).

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use schema_erd::{convert, Dialect, StyleConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-erd-export")]
#[command(about = "Export a schema definition as an entity-relationship graph")]
struct Cli {
    /// Path to the schema definition file
    input: PathBuf,

    /// Input dialect: native, introspection or manifest
    #[arg(short, long, default_value = "native")]
    dialect: String,

    /// Output file (defaults to schema.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: dot, json or svg
    #[arg(short, long, default_value = "dot")]
    format: String,

    /// Optional TOML style file
    #[arg(short, long)]
    style: Option<PathBuf>,
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

    let style = match &cli.style {
        Some(path) => StyleConfig::load(path)
            .with_context(|| format!("failed to load style file {}", path.display()))?,
        None => StyleConfig::default(),
    };

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let graph = convert(&text, dialect)?;

    println!(
        "Graph assembled: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    match cli.format.as_str() {
        "dot" => {
            let output_path = cli.output.unwrap_or_else(|| PathBuf::from("schema.dot"));
            fs::write(&output_path, graph.to_dot(&style))?;
            println!("Exported DOT to {}", output_path.display());
        }
        "json" => {
            let output_path = cli.output.unwrap_or_else(|| PathBuf::from("schema.json"));
            fs::write(
                &output_path,
                serde_json::to_string_pretty(&graph.to_structured())?,
            )?;
            println!("Exported JSON to {}", output_path.display());
        }
        "svg" => {
            let output_path = cli.output.unwrap_or_else(|| PathBuf::from("schema.svg"));

            // Write DOT to a temp file, then let GraphViz do the rendering
            let temp_dot = output_path.with_extension("temp.dot");
            fs::write(&temp_dot, graph.to_dot(&style))?;

            let output = std::process::Command::new("dot")
                .arg("-Tsvg")
                .arg(&temp_dot)
                .arg("-o")
                .arg(&output_path)
                .output()
                .context("failed to run GraphViz 'dot'")?;

            let _ = fs::remove_file(&temp_dot);

            if !output.status.success() {
                anyhow::bail!(
                    "GraphViz conversion failed:\n{}",
                    String::from_utf8_lossy(&output.stderr)
                );
            }
            println!("Exported SVG to {}", output_path.display());
        }
        other => anyhow::bail!("invalid format '{other}' (use 'dot', 'json' or 'svg')"),
    }

    Ok(())
}
