//! Configuration types for a cleanup run.

use bc_error::{CleanerError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Retention threshold used when the caller does not supply one.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 90;

/// Configuration for a single cleanup run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Bucket to clean up
    pub bucket: String,

    /// Objects strictly older than this are deleted
    #[serde(rename = "max_age_secs", with = "duration_secs")]
    pub max_age: Duration,

    /// List and filter only, never delete
    pub dry_run: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
            dry_run: false,
        }
    }
}

impl CleanupConfig {
    /// Create a new CleanupConfig with the required bucket name.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the retention threshold.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check that the configuration can drive a run.
    pub fn validate(&self) -> Result<()> {
        validate(&self.bucket, self.max_age)
    }
}

pub(crate) fn validate(bucket: &str, max_age: Duration) -> Result<()> {
    if bucket.trim().is_empty() {
        return Err(CleanerError::config("bucket name must not be empty"));
    }
    if max_age < Duration::zero() {
        return Err(CleanerError::config(format!(
            "max age must not be negative, got {}s",
            max_age.num_seconds()
        )));
    }
    Ok(())
}

mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("max age out of range: {secs}s")))
    }
}
