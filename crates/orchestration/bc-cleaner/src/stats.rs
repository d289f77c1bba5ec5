//! Statistics for cleanup runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Statistics collected during a cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanupStats {
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Whether deletion was suppressed
    pub dry_run: bool,

    /// Total number of objects listed
    pub objects_scanned: usize,

    /// Objects young enough to keep
    pub objects_retained: usize,

    /// Objects kept because the backend returned no timestamp
    pub objects_undated: usize,

    /// Objects selected for deletion
    pub candidates: usize,

    /// Total bytes of the objects selected for deletion
    pub bytes_marked: u64,

    /// Objects the backend reported as deleted
    pub deleted: usize,

    /// Objects the backend failed to delete
    pub failed: usize,
}

impl CleanupStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Some(Utc::now()),
            dry_run,
            ..Default::default()
        }
    }

    /// Mark the run as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record an object selected for deletion.
    pub fn record_candidate(&mut self, size_bytes: u64) {
        self.objects_scanned += 1;
        self.candidates += 1;
        self.bytes_marked += size_bytes;
    }

    /// Record an object young enough to keep.
    pub fn record_retained(&mut self) {
        self.objects_scanned += 1;
        self.objects_retained += 1;
    }

    /// Record an object kept for lack of a timestamp.
    pub fn record_undated(&mut self) {
        self.objects_scanned += 1;
        self.objects_undated += 1;
    }

    /// Record the outcome of the delete call.
    pub fn record_deletion(&mut self, deleted: usize, failed: usize) {
        self.deleted += deleted;
        self.failed += failed;
    }

    /// Get the duration of the run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Check if any key could not be deleted.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
