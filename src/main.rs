//! # Source Curator
//!
//! Batch curation of Legado book source collections: content filtering,
//! quality scoring, domain-diverse deduplication, optional liveness probing
//! and merging of an existing trusted set with a newly harvested one.
//!
//! ## Usage
//!
//! ```sh
//! source_curator filter
//! source_curator integrate --validate --max 1500 --domains 1000
//! ```
//!
//! ## Architecture
//!
//! Two independent load → transform → save jobs:
//! 1. **filter**: policy and structural removal with a backup and an audit log
//! 2. **integrate**: filter, clean, score, dedupe, probe, rank, back up, write

use clap::Parser;
use source_curator::config::{FilterConfig, IntegrateConfig};
use source_curator::jobs::{filter, integrate};
use std::error::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    info!(command = ?args.command, "source_curator starting up");

    let outcome = match args.command {
        Command::Filter(args) => {
            let config = FilterConfig::from(args);
            filter::run(&config).await.map(|report| {
                info!(
                    original = report.original,
                    kept = report.kept,
                    removed = report.removed,
                    "Filter finished"
                );
            })
        }
        Command::Integrate(args) => {
            let config = IntegrateConfig::from(args);
            integrate::run(&config).await.map(|report| {
                info!(
                    existing = %format!("{} -> {}", report.existing_total, report.existing_kept),
                    harvested = %format!("{} -> {}", report.harvested_total, report.harvested_kept),
                    written = report.written,
                    "Integrate finished"
                );
            })
        }
    };

    if let Err(e) = outcome {
        error!(error = %e, "Run failed");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), millis = elapsed.subsec_millis(), "Execution complete");
    Ok(())
}
