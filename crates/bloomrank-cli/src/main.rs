#![allow(clippy::doc_markdown)]
//! `bloomrank` CLI - Bloom filter ranking experiment
//!
//! Usage:
//!   `bloomrank run little-women.txt huck-finn.txt --output results.md`
//!   `bloomrank rank frankenstein.txt "the monster" --rounds 1 --elements 120`
//!   `bloomrank canonicalize "Hello, World!"`

mod report;

use anyhow::{bail, Context, Result};
use bloomrank_core::{
    canonicalize, rank_approximate, rank_distance, rank_exact, Experiment, ExperimentConfig,
    FilterKey, ResultRecord, Rounds, SearchTerm,
};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bloomrank")]
#[command(
    author,
    version,
    about = "bloomrank - Bloom filter vs trigram ranking experiment"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./bloomrank.toml when present)
    #[arg(short, long, global = true, env = "BLOOMRANK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Report output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full parameter sweep over one or more source texts
    Run {
        /// Source text files
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Report destination ("-" for stdout)
        #[arg(short, long, default_value = "results.md")]
        output: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: ReportFormat,

        /// Sampling seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,

        /// Terms sampled per grid cell (overrides the configuration)
        #[arg(long)]
        terms: Option<usize>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Rank one source's documents for a single term, both ways
    Rank {
        /// Source text file
        source: PathBuf,

        /// Search term (canonicalized before use)
        term: String,

        /// Rounds of the approximate ranker
        #[arg(short, long, default_value = "2")]
        rounds: u8,

        /// Rounds of the exact ranker (defaults to the configured value)
        #[arg(long)]
        exact_rounds: Option<u8>,

        /// Leading trigrams per document filter
        #[arg(short, long, default_value = "120")]
        elements: usize,

        /// Ranking prefix compared
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Show the canonical form and trigrams of a text
    Canonicalize {
        /// Text to canonicalize
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config);

    match cli.command {
        Commands::Run {
            sources,
            output,
            format,
            seed,
            terms,
            no_progress,
        } => {
            let mut config = config;
            if seed.is_some() {
                config.experiment.seed = seed;
            }
            if let Some(terms) = terms {
                config.experiment.terms_per_cell = terms;
            }
            run(config, &sources, &output, format, !no_progress)?;
        }
        Commands::Rank {
            source,
            term,
            rounds,
            exact_rounds,
            elements,
            top,
        } => {
            let exact_rounds = exact_rounds.unwrap_or(config.experiment.exact_rounds);
            rank(&config, &source, &term, rounds, exact_rounds, elements, top)?;
        }
        Commands::Canonicalize { text } => {
            let canonical = canonicalize(&text);
            println!("{canonical}");
            match SearchTerm::new(&canonical) {
                Ok(term) => {
                    let trigrams: Vec<String> = term
                        .trigrams()
                        .iter()
                        .map(bloomrank_core::text::trigram_str)
                        .collect();
                    println!("{} trigrams: {}", term.len(), trigrams.join(" "));
                }
                Err(_) => println!("0 trigrams"),
            }
        }
    }

    Ok(())
}

/// Loads the configuration; an explicit path must exist.
fn load_config(path: Option<&Path>) -> Result<ExperimentConfig> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {}", path.display());
            }
            ExperimentConfig::load_from_path(path)
        }
        None => ExperimentConfig::load(),
    }
    .context("Failed to load configuration")?;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Logs go to stderr so reports can be piped from stdout.
fn init_tracing(config: &ExperimentConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_source(path: &Path) -> Result<String> {
    bloomrank_core::load_source(path)
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn create_progress_bar(total: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn run(
    config: ExperimentConfig,
    sources: &[PathBuf],
    output: &Path,
    format: ReportFormat,
    show_progress: bool,
) -> Result<()> {
    let experiment = Experiment::new(config)?;
    let pb = create_progress_bar(sources.len(), show_progress);
    let mut records: Vec<ResultRecord> = Vec::new();

    for path in sources {
        let name = source_name(path);
        pb.set_message(name.clone());
        tracing::info!(source = %name, "processing source");

        let text = read_source(path)?;
        let source_records = experiment
            .run_source(&name, &text)
            .with_context(|| format!("Experiment failed for {}", path.display()))?;
        records.extend(source_records);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let rendered = match format {
        ReportFormat::Markdown => {
            report::render_markdown(&report::summarize(&records, experiment.config()))
        }
        ReportFormat::Json => report::render_json(&records)?,
    };

    if output == Path::new("-") {
        print!("{rendered}");
    } else {
        fs::write(output, rendered)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!(
            "Wrote {} results for {} source(s) to {}",
            records.len(),
            sources.len(),
            output.display()
        );
    }

    Ok(())
}

fn rank(
    config: &ExperimentConfig,
    source: &Path,
    term: &str,
    rounds: u8,
    exact_rounds: u8,
    elements: usize,
    top: usize,
) -> Result<()> {
    let rounds = Rounds::new(rounds)?;
    let exact_rounds = Rounds::new(exact_rounds)?;
    let term = SearchTerm::from_text(term)?;

    let text = read_source(source)?;
    let chunks = bloomrank_core::chunk_source(
        &text,
        config.corpus.documents_per_source,
        config.corpus.chunk_chars,
    )?;
    let mut corpus = bloomrank_core::Corpus::from_chunks(chunks);
    corpus.ensure_min_len(elements.saturating_add(2))?;
    corpus.build_filters(&[
        FilterKey::new(rounds, elements),
        FilterKey::new(exact_rounds, elements),
    ])?;

    let documents = corpus.documents();
    let exact = rank_exact(exact_rounds, elements, &term, documents)?;
    let approx = rank_approximate(rounds, elements, &term, documents)?;
    let distance = rank_distance(&exact, &approx, top)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rank", "Exact", "Approximate"]);
    for (i, (e, a)) in exact.iter().zip(approx.iter()).take(top).enumerate() {
        table.add_row(vec![(i + 1).to_string(), e.to_string(), a.to_string()]);
    }

    println!(
        "Term '{}' ({} trigrams), k={} vs exact k={}, {} elements",
        term.source(),
        term.len(),
        rounds,
        exact_rounds,
        elements
    );
    println!("{table}");
    println!("Distance (top {top}): {distance}");

    Ok(())
}
