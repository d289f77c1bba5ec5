//! The retention pipeline: list, age, select, delete.

use std::collections::HashSet;

use bc_error::Result;
use chrono::Duration;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{self, CleanupConfig};
use crate::duration::format_duration;
use crate::stats::CleanupStats;
use crate::store::{ObjectRecord, ObjectStore};

/// Deletes objects older than a retention threshold.
///
/// Generic over the clock and the object store so the same pipeline runs
/// against S3 in production and against a fixed clock and in-memory
/// store in tests.
pub struct Cleaner<C: Clock, S: ObjectStore> {
    clock: C,
    store: S,
}

impl<C: Clock, S: ObjectStore> Cleaner<C, S> {
    /// Create a new Cleaner.
    pub fn new(clock: C, store: S) -> Self {
        Self { clock, store }
    }

    /// The underlying object store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Delete every object in `bucket` older than `max_age`.
    ///
    /// Returns the number of objects the store reported as deleted. In
    /// dry-run mode, or when nothing is old enough, no delete request is
    /// issued and the result is zero.
    pub async fn clean_up(&self, bucket: &str, max_age: Duration, dry_run: bool) -> Result<usize> {
        let stats = self.execute(bucket, max_age, dry_run).await?;
        Ok(stats.deleted)
    }

    /// Run a cleanup described by `config` and return its statistics.
    pub async fn run(&self, config: &CleanupConfig) -> Result<CleanupStats> {
        self.execute(&config.bucket, config.max_age, config.dry_run).await
    }

    async fn execute(
        &self,
        bucket: &str,
        max_age: Duration,
        dry_run: bool,
    ) -> Result<CleanupStats> {
        config::validate(bucket, max_age)?;

        let mut stats = CleanupStats::new(dry_run);

        debug!(
            bucket = %bucket,
            max_age = %format_duration(max_age),
            dry_run,
            "Starting cleanup"
        );

        let candidates = self.collect_candidates(bucket, max_age, &mut stats).await?;

        if candidates.is_empty() {
            info!(bucket = %bucket, "0 object(s) found for deletion");
            stats.complete();
            return Ok(stats);
        }

        info!(
            bucket = %bucket,
            candidates = candidates.len(),
            bytes = stats.bytes_marked,
            "{} object(s) marked for deletion",
            candidates.len()
        );

        if dry_run {
            info!("dry-run mode enabled, no object will be deleted");
            stats.complete();
            return Ok(stats);
        }

        info!(bucket = %bucket, "deleting objects");
        let outcome = self.store.delete_objects(bucket, &candidates).await?;

        for failure in &outcome.failed {
            warn!(
                key = %failure.key,
                code = failure.code.as_deref().unwrap_or("unknown"),
                message = failure.message.as_deref().unwrap_or(""),
                "Object could not be deleted"
            );
        }

        stats.record_deletion(outcome.deleted_count(), outcome.failed_count());
        stats.complete();

        info!(
            bucket = %bucket,
            deleted = stats.deleted,
            failed = stats.failed,
            "{} object(s) deleted",
            stats.deleted
        );

        Ok(stats)
    }

    /// Walk every page and collect the keys older than `max_age`.
    ///
    /// A listing error discards everything collected so far.
    async fn collect_candidates(
        &self,
        bucket: &str,
        max_age: Duration,
        stats: &mut CleanupStats,
    ) -> Result<Vec<String>> {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();

        let mut pages = self.store.list_pages(bucket);

        while let Some(page) = pages.next().await {
            let page = page.inspect_err(|e| {
                warn!(bucket = %bucket, error = %e, "Error listing objects");
            })?;

            for obj in page {
                if !self.is_expired(&obj, max_age, stats) {
                    continue;
                }

                if seen.insert(obj.key.clone()) {
                    stats.record_candidate(obj.size);
                    candidates.push(obj.key);
                } else {
                    stats.objects_scanned += 1;
                    debug!(key = %obj.key, "Key listed twice, already marked");
                }
            }
        }

        Ok(candidates)
    }

    fn is_expired(&self, obj: &ObjectRecord, max_age: Duration, stats: &mut CleanupStats) -> bool {
        let Some(last_modified) = obj.last_modified else {
            warn!(key = %obj.key, "Object has no last-modified time, keeping it");
            stats.record_undated();
            return false;
        };

        let age = self.clock.since(last_modified);
        if age > max_age {
            info!(
                key = %obj.key,
                last_modified = %last_modified,
                age = %format_duration(age),
                "object marked for deletion"
            );
            true
        } else {
            debug!(key = %obj.key, age = %format_duration(age), "Retained");
            stats.record_retained();
            false
        }
    }
}
