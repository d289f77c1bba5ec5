//! bc-cleaner - age-based retention cleanup for S3 buckets.
//!
//! This crate lists every object in a bucket, ages each one against an
//! injectable [`Clock`], and deletes the objects older than a retention
//! threshold. It supports:
//!
//! - Streaming, paginated listing so large buckets are never buffered
//! - A [`Clock`] seam so tests can pin "now" to a fixed instant
//! - An [`ObjectStore`] seam with S3 and in-memory implementations
//! - Dry-run mode that reports candidates without deleting anything
//!
//! # Example
//!
//! ```ignore
//! use bc_cleaner::{Cleaner, CleanupConfig, S3Config, S3Store, SystemClock, create_s3_client};
//!
//! let s3_config = S3Config::new("eu-west-1");
//! let client = create_s3_client(&s3_config).await?;
//!
//! let cleaner = Cleaner::new(SystemClock, S3Store::new(client));
//! let config = CleanupConfig::new("my-bucket").with_dry_run(true);
//!
//! let stats = cleaner.run(&config).await?;
//! eprintln!("{} object(s) marked for deletion", stats.candidates);
//! ```

pub mod cleaner;
pub mod clock;
pub mod config;
pub mod duration;
pub mod s3;
pub mod stats;
pub mod store;

#[cfg(test)]
mod test_support;

pub use cleaner::Cleaner;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CleanupConfig, DEFAULT_MAX_AGE_DAYS};
pub use duration::{format_duration, parse_max_age};
pub use s3::{S3Config, S3Store, create_s3_client, load_sdk_config, verify_credentials};
pub use stats::CleanupStats;
pub use store::{DeleteFailure, DeleteOutcome, InMemoryStore, ObjectRecord, ObjectStore};
