//! `sdwa-etl` — load SDWA CSV extracts into a SQLite database.
//!
//! # Usage
//!
//! ```
//! sdwa-etl --data-dir ./data --db-path ./sdwa_georgia.db
//! sdwa-etl --replace
//! ```
//!
//! Settings may also come from `sdwa-etl.toml` (or `--config`) and from
//! `SDWA_*` environment variables; flags win.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::Parser;
use sdwa_etl::{ConfigOverrides, EtlConfig, Pipeline, output};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Load SDWA CSV data into a SQLite database")]
struct Cli {
  /// Path to an optional TOML configuration file.
  #[arg(short, long, default_value = "sdwa-etl.toml")]
  config: PathBuf,

  /// Directory containing the SDWA CSV files (default: ./data).
  #[arg(long)]
  data_dir: Option<PathBuf>,

  /// Path of the SQLite database to create (default: ./sdwa_georgia.db).
  #[arg(long)]
  db_path: Option<PathBuf>,

  /// Replace the database if it already exists.
  #[arg(long)]
  replace: bool,

  /// Records per upsert batch (default: 1000).
  #[arg(long)]
  batch_size: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  match run(Cli::parse()).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("{e:#}");
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
  let overrides = ConfigOverrides {
    data_dir:   cli.data_dir,
    db_path:    cli.db_path,
    replace:    cli.replace.then_some(true),
    batch_size: cli.batch_size,
  };
  let config = EtlConfig::load(&cli.config, overrides).context("failed to load configuration")?;

  output::prepare(&config)?;

  let db_path = config.db_path.clone();
  let summary = Pipeline::new(config).run().await.context("ETL failed")?;

  if let Err(e) = &summary.validation {
    tracing::warn!(error = %e, "data loaded but validation did not complete");
  }
  tracing::info!(
    db = %db_path.display(),
    tables = summary.loads.len(),
    missing = summary.missing_files.len(),
    "database created successfully"
  );
  Ok(())
}
