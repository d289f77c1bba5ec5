//! s3-bucket-cleaner CLI
//!
//! Deletes S3 objects older than a retention threshold.

use bc_cleaner::{CleanupStats, format_duration};
use bc_error::{ErrorCategory, classify_error};
use clap::Parser;
use tracing::{Instrument, error, info, info_span};

mod args;
mod logging;
mod run;

use args::Cli;

const APP_NAME: &str = "s3-bucket-cleaner";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    logging::init_logging(args.log_level, args.log_format)?;

    info!(name = APP_NAME, "started");

    let result = run::execute(&args)
        .instrument(info_span!("cleanup", name = APP_NAME))
        .await;

    let exit_code = match result {
        Ok(stats) => {
            report(&stats);
            0
        }
        Err(e) => {
            let category = classify_error(&e);
            match category {
                ErrorCategory::Fatal => error!(name = APP_NAME, error = %e, "unable to start"),
                ErrorCategory::Execution => {
                    error!(name = APP_NAME, error = %e, "unable to clean-up objects")
                }
            }
            category.exit_code()
        }
    };

    info!(name = APP_NAME, "finished");

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

/// Log a human-readable summary of the run.
fn report(stats: &CleanupStats) {
    let duration = stats
        .duration()
        .map(format_duration)
        .unwrap_or_else(|| "n/a".to_string());

    info!(
        name = APP_NAME,
        dry_run = stats.dry_run,
        scanned = stats.objects_scanned,
        retained = stats.objects_retained,
        undated = stats.objects_undated,
        candidates = stats.candidates,
        marked = %format_bytes(stats.bytes_marked),
        deleted = stats.deleted,
        failed = stats.failed,
        duration = %duration,
        "Cleanup completed"
    );
}

/// Render a byte count with binary units, e.g. `1.5 KiB`.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
