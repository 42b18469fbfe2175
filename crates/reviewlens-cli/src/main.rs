//! reviewlens: review analytics pipeline.
//!
//! Each stage is a subcommand run by hand, in order:
//!
//! ```text
//! reviewlens fetch --place-id <ID> --name cafe
//! reviewlens clean --name cafe
//! reviewlens merge-datasets
//! # sentiment and topic labeling run externally
//! reviewlens report
//! reviewlens overview
//! ```

mod logging;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use reviewlens_core::{chunk_size, defaults, parse_review_date, read_records, report_inputs, Overview};
use reviewlens_inference::InferenceConfig;
use reviewlens_ingest::{clean_raw_file, merge_cleaned_datasets, save_raw, SerpApiClient, SerpApiConfig};
use reviewlens_reports::{merge_reports, MergeOrder, ReportPipeline, ReportSettings};

use crate::logging::LogSettings;

#[derive(Parser)]
#[command(name = "reviewlens")]
#[command(author, version, about = "Business review analytics with LLM-written reports")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch Google Maps reviews for a place through SerpAPI
    Fetch {
        /// Google Maps place id
        #[arg(long)]
        place_id: String,

        /// Output name; reviews are saved as <raw-dir>/<name>.json
        #[arg(short, long)]
        name: String,

        #[arg(long, default_value = defaults::RAW_DIR)]
        raw_dir: PathBuf,
    },

    /// Clean a raw review file into <cleaned-dir>/<name>_cleaned.csv
    Clean {
        /// Name the raw file was saved under
        #[arg(short, long)]
        name: String,

        #[arg(long, default_value = defaults::RAW_DIR)]
        raw_dir: PathBuf,

        #[arg(long, default_value = defaults::CLEANED_DIR)]
        cleaned_dir: PathBuf,
    },

    /// Merge every *_cleaned.csv into one dataset (CSV and JSON)
    MergeDatasets {
        #[arg(long, default_value = defaults::CLEANED_DIR)]
        cleaned_dir: PathBuf,

        /// CSV output; a .json twin is written next to it
        #[arg(short, long, default_value = defaults::MERGED_DATASET_PATH)]
        output: PathBuf,
    },

    /// Generate executive summary, topic insights and recommendations
    Report {
        /// Topic-labeled dataset (CSV or JSON)
        #[arg(short, long, default_value = defaults::TOPIC_DATASET_PATH)]
        dataset: PathBuf,

        #[arg(long, default_value = defaults::REPORTS_DIR)]
        reports_dir: PathBuf,

        #[arg(long, default_value_t = defaults::EXECUTIVE_CHUNK_SIZE)]
        executive_chunk_size: usize,

        #[arg(long, default_value_t = defaults::RECOMMENDATION_CHUNK_SIZE)]
        recommendation_chunk_size: usize,

        #[arg(long, default_value_t = defaults::TOPIC_CHUNK_SIZE)]
        topic_chunk_size: usize,

        /// Delay after each successful model call, in milliseconds
        #[arg(long, default_value_t = defaults::PACING_MS)]
        pacing_ms: u64,

        /// Merge artifacts in numeric order (chunk_2 before chunk_10)
        #[arg(long)]
        natural_order: bool,
    },

    /// Rebuild the aggregate reports from existing artifacts
    MergeReports {
        #[arg(long, default_value = defaults::REPORTS_DIR)]
        reports_dir: PathBuf,

        /// Merge artifacts in numeric order (chunk_2 before chunk_10)
        #[arg(long)]
        natural_order: bool,
    },

    /// Print dataset statistics, date range and sentiment trend as JSON
    Overview {
        #[arg(short, long, default_value = defaults::TOPIC_DATASET_PATH)]
        dataset: PathBuf,
    },

    /// Resolve a review date such as "3 weeks ago" to a timestamp
    ParseDate {
        text: String,

        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn merge_order(natural: bool) -> MergeOrder {
    if natural {
        MergeOrder::Natural
    } else {
        MergeOrder::Lexical
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_settings = LogSettings::from_env();
    let _log_guard = log_settings.init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Fetch {
            place_id,
            name,
            raw_dir,
        } => cmd_fetch(&place_id, &name, &raw_dir).await,
        Commands::Clean {
            name,
            raw_dir,
            cleaned_dir,
        } => {
            let summary = clean_raw_file(&raw_dir, &cleaned_dir, &name)
                .with_context(|| format!("cleaning {}", name))?;
            println!(
                "Saved {} of {} reviews to {}",
                summary.kept_count,
                summary.raw_count,
                summary.output.display()
            );
            Ok(())
        }
        Commands::MergeDatasets {
            cleaned_dir,
            output,
        } => {
            let summary = merge_cleaned_datasets(&cleaned_dir, &output)
                .context("merging cleaned datasets")?;
            println!(
                "Merged {} reviews from {} sources into {} and {}",
                summary.record_count,
                summary.sources.len(),
                summary.csv_path.display(),
                summary.json_path.display()
            );
            Ok(())
        }
        Commands::Report {
            dataset,
            reports_dir,
            executive_chunk_size,
            recommendation_chunk_size,
            topic_chunk_size,
            pacing_ms,
            natural_order,
        } => {
            let settings = ReportSettings {
                reports_dir,
                executive_chunk_size: chunk_size(executive_chunk_size)?,
                recommendation_chunk_size: chunk_size(recommendation_chunk_size)?,
                topic_chunk_size: chunk_size(topic_chunk_size)?,
                pacing: Duration::from_millis(pacing_ms),
                merge_order: merge_order(natural_order),
            };
            cmd_report(&dataset, settings).await
        }
        Commands::MergeReports {
            reports_dir,
            natural_order,
        } => {
            let summaries = merge_reports(&reports_dir, merge_order(natural_order))
                .context("merging reports")?;
            for summary in summaries {
                println!(
                    "{} <- {} artifacts",
                    summary.output.display(),
                    summary.sources.len()
                );
            }
            Ok(())
        }
        Commands::Overview { dataset } => {
            let records = read_records(&dataset)
                .with_context(|| format!("loading {}", dataset.display()))?;
            let overview = Overview::compute(&records, Utc::now());
            println!("{}", serde_json::to_string_pretty(&overview)?);
            Ok(())
        }
        Commands::ParseDate { text, now } => {
            let resolved = parse_review_date(&text, now.unwrap_or_else(Utc::now));
            println!("{}", resolved.to_rfc3339());
            Ok(())
        }
    }
}

async fn cmd_fetch(place_id: &str, name: &str, raw_dir: &Path) -> anyhow::Result<()> {
    let config = SerpApiConfig::from_env()?;
    let client = SerpApiClient::new(config)?;

    let reviews = client
        .fetch_reviews(place_id)
        .await
        .with_context(|| format!("fetching reviews for {}", place_id))?;
    let path = save_raw(raw_dir, name, &reviews)?;

    println!("Saved {} reviews to {}", reviews.len(), path.display());
    Ok(())
}

async fn cmd_report(dataset: &Path, settings: ReportSettings) -> anyhow::Result<()> {
    // Credentials are checked before any data is touched.
    let caller = InferenceConfig::from_env()
        .context("loading model configuration")?
        .build_caller()?;

    let records =
        read_records(dataset).with_context(|| format!("loading {}", dataset.display()))?;
    let inputs = report_inputs(&records);
    info!(
        record_count = records.len(),
        report_inputs = inputs.len(),
        "Dataset ready"
    );

    let pipeline = ReportPipeline::new(caller, settings)?;
    let summary = pipeline.run(&inputs).await.context("report run failed")?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
