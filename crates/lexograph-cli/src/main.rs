//! Lexograph CLI
//!
//! Command-line interface for the vocabulary publishing core:
//! - `build`: ingest a directory tree of RDF vocabulary files and write
//!   records (plain + linked-data form) and full-text index chunks into an
//!   IRI-derived output path space.
//! - `inspect`: parse and compact one source file, printing the records as
//!   JSON for debugging vocabularies.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod build;

#[derive(Parser)]
#[command(name = "lexograph")]
#[command(author, version, about = "Publish SKOS vocabularies as records and search indexes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all publishable artifacts from a directory of vocabulary files.
    Build {
        /// Directory tree of serialized RDF graph files
        #[arg(long, default_value = "data")]
        data: PathBuf,
        /// Output root for records and index chunks
        #[arg(long, default_value = "public")]
        out: PathBuf,
        /// Source file extension to pick up
        #[arg(long, default_value = "ttl")]
        extension: String,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact_json: bool,
    },

    /// Parse and compact one source file; print its records as JSON.
    Inspect {
        /// Input RDF file (.ttl, .nt)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            data,
            out,
            extension,
            compact_json,
        } => {
            let options = build::BuildOptions {
                data_dir: data,
                out_dir: out,
                extension,
                compact_json,
            };
            let summary = build::run(&options)?;
            println!(
                "{} {} source files → {} records ({} schemes, {} collections)",
                "✓".green().bold(),
                summary.source_files,
                summary.records,
                summary.schemes,
                summary.collections,
            );
            println!(
                "  {} artifacts under {}",
                summary.artifacts_written,
                options.out_dir.display().to_string().bold(),
            );
            if !summary.languages.is_empty() {
                let tags: Vec<&str> = summary.languages.iter().map(String::as_str).collect();
                println!("  languages: {}", tags.join(", "));
            }
            Ok(())
        }
        Commands::Inspect { input } => {
            let mut languages = lexograph_ingest::LanguageRegistry::new();
            let store = lexograph_ingest::parse_graph_file(&input, &mut languages)?;
            let records = lexograph_ingest::compact(&store);
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
    }
}
