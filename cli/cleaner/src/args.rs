//! CLI argument definitions for s3-bucket-cleaner.

use bc_cleaner::parse_max_age;
use chrono::Duration;
use clap::{Parser, ValueEnum};

/// Age-based retention cleanup for S3 buckets.
///
/// Lists every object in a bucket and deletes the ones last modified more
/// than `--max-age` ago. Use `--dry-run` to see what would be deleted.
///
/// ## Examples
///
/// Preview a 30 day retention:
///   s3-bucket-cleaner -b my-bucket -r eu-west-1 --max-age 30d --dry-run
///
/// Against LocalStack:
///   s3-bucket-cleaner -b my-bucket -r us-east-1 --endpoint http://localhost:4566
#[derive(Parser, Debug)]
#[command(name = "s3-bucket-cleaner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === S3 Configuration ===
    /// Bucket name
    #[arg(short, long, env = "BUCKET_NAME")]
    pub bucket: Option<String>,

    /// Bucket region
    #[arg(short, long, env = "BUCKET_REGION")]
    pub region: Option<String>,

    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "BUCKET_ENDPOINT")]
    pub endpoint: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    // === Retention Options ===
    /// Delete objects older than this (e.g. 90d, 2160h0m0s, 1.5h, 500ms).
    /// Units: ns, us, ms, s, m, h, d, w
    #[arg(long, default_value = "90d", value_parser = parse_max_age)]
    pub max_age: Duration,

    /// List and report only, do not delete any object
    #[arg(long)]
    pub dry_run: bool,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "auto")]
    pub log_format: LogFormat,
}

/// Log level argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    Info,
    /// Warning level
    Warn,
    /// Error level (least verbose)
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Log format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Pretty output on a terminal, JSON otherwise
    Auto,
    /// Human-readable output
    Pretty,
    /// One JSON object per line
    Json,
}
