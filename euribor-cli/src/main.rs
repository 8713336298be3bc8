//! Euribor CLI — refresh and inspect the published rate tree.
//!
//! Commands:
//! - `update`: fetch months from euribor-rates.eu and publish them under the output directory
//! - `status`: list a year's monthly averages and when each last changed

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use euribor_core::{FileTree, HttpSource, SourceFormat};
use euribor_runner::{ItemOutcome, LogProgress, Pipeline, PipelineConfig, RunSummary, WorkSelection};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "euribor",
    about = "Euribor scraper — monthly averages published as a static file tree"
)]
struct Cli {
    /// Debug logging (overrides RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and publish rates. Defaults to the current month.
    Update {
        /// Full year to refresh (with --month: a single month of that year).
        #[arg(long)]
        year: Option<i32>,

        /// Month (1-12) to refresh. Without --year, the current year is used.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Also refresh the previous month.
        #[arg(long, default_value_t = false, conflicts_with_all = ["year", "month"])]
        previous: bool,

        /// Refresh every year from the configured start year through now.
        #[arg(long, default_value_t = false, conflicts_with_all = ["year", "month", "previous"])]
        backfill: bool,

        /// TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory. Overrides the config file.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Request timeout in seconds. Overrides the config file.
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Upstream document format. Overrides the config file.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Write the run summary as JSON to this path.
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Show published monthly averages for a year.
    Status {
        /// Year to show. Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,

        /// TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory. Overrides the config file.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Highcharts,
    Html,
}

impl From<FormatArg> for SourceFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Highcharts => SourceFormat::Highcharts,
            FormatArg::Html => SourceFormat::Html,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Update {
            year,
            month,
            previous,
            backfill,
            config,
            output_dir,
            timeout_secs,
            format,
            summary,
        } => {
            let selection = WorkSelection {
                year,
                month,
                previous,
                backfill,
            };
            let mut config = load_config(config.as_deref())?;
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(secs) = timeout_secs {
                config.source.timeout_secs = secs;
            }
            if let Some(format) = format {
                config.source.format = format.into();
            }
            config.validate()?;
            run_update(&config, selection, summary.as_deref())
        }
        Commands::Status {
            year,
            config,
            output_dir,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            run_status(&config, year.unwrap_or_else(|| Utc::now().year()))
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => Ok(PipelineConfig::from_file(path)?),
        None => Ok(PipelineConfig::default()),
    }
}

fn run_update(
    config: &PipelineConfig,
    selection: WorkSelection,
    summary_path: Option<&Path>,
) -> Result<()> {
    let now = Utc::now();
    let items = selection.work_items(now, config.backfill_start_year)?;
    info!(
        items = items.len(),
        output_dir = %config.output_dir.display(),
        format = %config.source.format,
        "starting update"
    );

    let source = HttpSource::new(config.http_source_config()).context("failed to build HTTP client")?;
    let tree = FileTree::new(&config.output_dir);
    let summary = Pipeline::new(&source, &tree, &LogProgress).run(&items, now);

    if let Some(path) = summary_path {
        let mut json = summary.to_json()?;
        json.push('\n');
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
    }

    print_summary(&summary);

    if !summary.all_succeeded() {
        for report in summary.failures() {
            if let ItemOutcome::Failed { error } = &report.outcome {
                eprintln!("Error for {}: {error}", report.target);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} target(s): {} succeeded, {} skipped, {} failed",
        summary.total, summary.succeeded, summary.skipped, summary.failed
    );
    println!(
        "Files: {} written, {} unchanged, {} removed",
        summary.written, summary.unchanged, summary.removed
    );
}

fn run_status(config: &PipelineConfig, year: i32) -> Result<()> {
    let tree = FileTree::new(&config.output_dir);
    let Some(index) = tree.load_year_index(year)? else {
        println!(
            "No yearly index for {year} under {}",
            config.output_dir.display()
        );
        return Ok(());
    };

    let published = index.values().filter(|e| e.value.is_some()).count();
    println!("Year: {year}");
    println!("Published months: {published}/12");
    println!();
    println!("{:<8} {:>8}  {:<22}", "Month", "Average", "Last modified");
    println!("{}", "-".repeat(40));
    for entry in index.values() {
        println!(
            "{:<8} {:>8}  {:<22}",
            entry.meta.full_date,
            entry.value.as_deref().unwrap_or("-"),
            entry.meta.last_modified
        );
    }

    Ok(())
}
