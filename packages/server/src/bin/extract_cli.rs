//! CLI for extracting hostnames from a scanner export on disk
//!
//! Writes the result CSV and merges the rows into the store named by
//! DATABASE_URL. Prints a one-line JSON summary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use hostname_extraction::{
    ExtractionConfig, ExtractionSummary, MergeOutcome, MissPolicy, PreparedFile,
};
use serde::Serialize;
use server_core::{config::Config, store::connect_store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "extract")]
#[command(about = "Extract hostnames from a vulnerability-scanner CSV export")]
struct Cli {
    /// Scanner CSV export to read
    input: PathBuf,

    /// Result CSV path (default: output_<filename> next to the input)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Label stored with every row (default: the input's file name)
    #[arg(long)]
    filename: Option<String>,

    /// Extraction date, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Only write the result CSV; don't touch the store
    #[arg(long)]
    no_store: bool,

    /// NetBIOS miss handling: placeholder or skip
    #[arg(long)]
    miss_policy: Option<MissPolicy>,
}

#[derive(Serialize)]
struct Summary {
    success: bool,
    filename: String,
    extraction_date: NaiveDate,
    output: PathBuf,
    rows: usize,
    extraction: ExtractionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    merge: Option<MergeOutcome>,
}

fn default_output(input: &Path, filename: &str) -> PathBuf {
    let name = format!("output_{}", filename);
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,server_core=debug,hostname_extraction=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = if cli.no_store {
        None
    } else {
        Some(Config::from_env().context("Failed to load configuration")?)
    };

    let policy = cli
        .miss_policy
        .or_else(|| config.as_ref().map(|c| c.netbios_miss_policy))
        .unwrap_or_default();
    let extraction = ExtractionConfig::new().with_netbios_misses(policy);

    let filename = cli
        .filename
        .clone()
        .unwrap_or_else(|| hostname_extraction::ingest::display_name(&cli.input));
    let date = cli.date.unwrap_or_else(hostname_extraction::today);

    let prepared = PreparedFile::from_path(&cli.input, filename.as_str(), date, &extraction)
        .with_context(|| format!("Failed to extract {}", cli.input.display()))?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input, &filename));
    let csv = prepared.to_csv()?;
    std::fs::write(&output, csv)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let merge = match config {
        Some(config) => {
            let store = connect_store(&config.database_url).await?;
            let outcome = prepared
                .merge_into(store.as_ref())
                .await
                .context("Failed to merge into record store")?;
            Some(outcome)
        }
        None => None,
    };

    let summary = Summary {
        success: true,
        filename: prepared.filename.clone(),
        extraction_date: prepared.extraction_date,
        output,
        rows: prepared.rows.len(),
        extraction: prepared.summary,
        merge,
    };
    println!("{}", serde_json::to_string(&summary)?);

    Ok(())
}
