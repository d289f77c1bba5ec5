//! Main execution logic for the s3-bucket-cleaner CLI.

use bc_cleaner::{
    Cleaner, CleanupConfig, CleanupStats, S3Config, S3Store, SystemClock, create_s3_client,
};
use bc_error::{CleanerError, Result};
use tracing::debug;

use crate::args::Cli;

/// Build the run configuration from CLI arguments.
///
/// Fails with a configuration error when the bucket or region is missing.
pub fn build_config(args: &Cli) -> Result<(CleanupConfig, S3Config)> {
    let bucket = required(
        args.bucket.as_deref(),
        "bucket name not set from cli or environment variable BUCKET_NAME",
    )?;
    let region = required(
        args.region.as_deref(),
        "bucket region not set from cli or environment variable BUCKET_REGION",
    )?;

    let config = CleanupConfig::new(bucket)
        .with_max_age(args.max_age)
        .with_dry_run(args.dry_run);
    config.validate()?;

    let mut s3_config = S3Config::new(region);

    if let Some(endpoint) = &args.endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }

    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }

    Ok((config, s3_config))
}

/// Execute the cleanup with the provided arguments.
pub async fn execute(args: &Cli) -> Result<CleanupStats> {
    let (config, s3_config) = build_config(args)?;

    debug!(region = %s3_config.region, endpoint = ?s3_config.endpoint, "Creating S3 client");
    let client = create_s3_client(&s3_config).await?;

    let cleaner = Cleaner::new(SystemClock, S3Store::new(client));
    cleaner.run(&config).await
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CleanerError::config(message))
}
