//! Analyzer CLI
//!
//! Batch front-end for the engine: scans JSON files on disk, analyzes them,
//! and reports schemas, suggestions, and library statistics.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use jsonlens::config::OutputFormat;
use jsonlens::{AnalyzerConfig, AnalyzerEngine, DocumentLibrary, DocumentRepository};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "jsonlens")]
#[command(about = "Infer schemas and relationships across JSON documents")]
struct Cli {
    /// Path to a config file (defaults to analyzer.toml when present)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every JSON file under a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,
    },

    /// Compare two JSON files field by field
    Compare {
        first: PathBuf,
        second: PathBuf,
    },

    /// Print aggregate statistics for a directory
    Stats {
        /// Directory to scan
        dir: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AnalyzerConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Scan { dir } => scan(&dir, &config, true),
        Commands::Stats { dir } => scan(&dir, &config, false),
        Commands::Compare { first, second } => compare(&first, &second),
    }
}

fn scan(dir: &Path, config: &AnalyzerConfig, detailed: bool) -> anyhow::Result<()> {
    let mut library = DocumentLibrary::new();
    let mut engine = AnalyzerEngine::new();

    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let matches_extension = path
            .extension()
            .and_then(|x| x.to_str())
            .map(|x| config.input.extensions.iter().any(|ext| ext == x))
            .unwrap_or(false);
        if !matches_extension {
            continue;
        }

        match library.add_from_file(path) {
            Ok(id) => {
                let content = library.get(&id).map(|d| d.content.clone()).unwrap_or_default();
                engine.analyze_schema(&id, &content);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping file");
            }
        }
    }

    let stats = engine.library_stats(&library);

    if config.output.format == OutputFormat::Json {
        let suggestions = engine.all_optimizations();
        let report = serde_json::json!({
            "documents": library.all().iter().map(|d| {
                let schema = engine.schema_for_document(&d.id);
                serde_json::json!({
                    "id": d.id,
                    "name": d.name,
                    "fingerprint": schema.map(|s| s.fingerprint.to_string()),
                    "complexity": schema.map(|s| s.complexity),
                })
            }).collect::<Vec<_>>(),
            "suggestions": suggestions.iter().take(config.report.max_suggestions).collect::<Vec<_>>(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if detailed {
        println!("🔍 Analyzed {} document(s)", library.len());
        for document in library.all() {
            match engine.schema_for_document(&document.id) {
                Some(schema) => println!(
                    "  {:30} fingerprint={} complexity={}",
                    document.name, schema.fingerprint, schema.complexity
                ),
                None => println!("  {:30} (not analyzed)", document.name),
            }
        }

        let suggestions = engine.all_optimizations();
        if !suggestions.is_empty() {
            println!("\n💡 Suggestions (top {}):", config.report.max_suggestions);
            for suggestion in suggestions.iter().take(config.report.max_suggestions) {
                println!(
                    "  [{:?}] {} at {} (impact {:.0})",
                    suggestion.severity,
                    suggestion.description,
                    suggestion.affected_paths.join(", "),
                    suggestion.impact
                );
            }
        }
        println!();
    }

    println!("📊 Library statistics");
    println!("  Documents:     {}", stats.total_documents);
    println!(
        "  Classes:       {} / Instances: {}",
        stats.total_classes, stats.total_instances
    );
    println!("  Relations:     {}", stats.total_relations);
    println!("  Avg complexity: {:.1}", stats.average_complexity);
    println!("  Opportunities: {}", stats.total_optimization_opportunities);

    Ok(())
}

fn compare(first: &Path, second: &Path) -> anyhow::Result<()> {
    let mut library = DocumentLibrary::new();
    let mut engine = AnalyzerEngine::new();

    let first_id = library
        .add_from_file(first)
        .with_context(|| format!("failed to load {}", first.display()))?;
    let second_id = library
        .add_from_file(second)
        .with_context(|| format!("failed to load {}", second.display()))?;

    match engine.create_comparison(&library, &first_id, &second_id) {
        Some(comparison) => {
            println!("Similarity:    {:.2}", comparison.similarity);
            println!("Common fields: {}", comparison.common_fields.join(", "));
            println!("Differences:   {}", comparison.differences);
        }
        None => println!("Comparison unavailable"),
    }

    Ok(())
}
