//! Storage gateway abstraction.
//!
//! The cleaner needs exactly two storage operations:
//! - Paginated listing of every object in a bucket
//! - Batch deletion with per-key results
//!
//! Implementations include:
//! - [`S3Store`](crate::s3::S3Store) - AWS S3 (production)
//! - [`InMemoryStore`] - canned pages (testing/development)

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use bc_error::Result;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// One object as seen at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// The object key (full path within the bucket)
    pub key: String,

    /// Size of the object in bytes
    pub size: u64,

    /// Last modified timestamp
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectRecord {
    /// Create a record with a known modification time.
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            size: 0,
            last_modified: Some(last_modified),
        }
    }

    /// Set the object size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}

/// A key the backend refused to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFailure {
    /// The object key
    pub key: String,

    /// Backend error code (e.g. "AccessDenied")
    pub code: Option<String>,

    /// Backend error message
    pub message: Option<String>,
}

/// Per-key result of a batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Keys the backend reported as deleted
    pub deleted: Vec<String>,

    /// Keys the backend failed to delete
    pub failed: Vec<DeleteFailure>,
}

impl DeleteOutcome {
    /// Number of keys actually deleted.
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// Number of keys that could not be deleted.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Fold another outcome into this one.
    pub fn merge(&mut self, other: DeleteOutcome) {
        self.deleted.extend(other.deleted);
        self.failed.extend(other.failed);
    }
}

/// Trait for object storage backends.
///
/// # Listing
///
/// [`list_pages`](ObjectStore::list_pages) returns a lazy, finite,
/// forward-only stream. The next page is requested only when the caller
/// polls for it, so a bucket is never buffered in full. Listing is not
/// transactionally consistent: objects written or removed between pages may
/// or may not show up.
///
/// # Deletion
///
/// [`delete_objects`](ObjectStore::delete_objects) is not atomic. Keys that
/// could not be deleted are reported in [`DeleteOutcome::failed`]; an `Err`
/// means the call itself failed. Deleting a key that no longer exists counts
/// as a successful deletion.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stream every object in `bucket`, one page at a time.
    fn list_pages<'a>(&'a self, bucket: &'a str) -> BoxStream<'a, Result<Vec<ObjectRecord>>>;

    /// Delete exactly `keys` from `bucket`.
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<DeleteOutcome>;
}
