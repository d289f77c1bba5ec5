//! In-memory object store for testing and local development.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_stream::try_stream;
use async_trait::async_trait;
use bc_error::{CleanerError, Result};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tracing::debug;

use super::{DeleteFailure, DeleteOutcome, ObjectRecord, ObjectStore};

const DEFAULT_PAGE_SIZE: usize = 1000;

/// An [`ObjectStore`] holding a single bucket in memory.
///
/// Objects are served in insertion order, `page_size` at a time. Deleted
/// keys are removed, so a second run sees the bucket as the first run left
/// it. Failures can be injected to exercise error paths:
/// - listing fails when a given page is requested
/// - the delete call fails outright
/// - individual keys are refused (partial failure)
#[derive(Debug)]
pub struct InMemoryStore {
    bucket: String,
    objects: Mutex<Vec<ObjectRecord>>,
    page_size: usize,
    fail_list_at_page: Option<usize>,
    fail_delete: Option<String>,
    rejected_keys: HashSet<String>,
    pages_served: AtomicUsize,
    delete_calls: Mutex<Vec<Vec<String>>>,
}

impl InMemoryStore {
    /// Create a store for `bucket` holding `objects`.
    pub fn new(bucket: impl Into<String>, objects: impl IntoIterator<Item = ObjectRecord>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(objects.into_iter().collect()),
            page_size: DEFAULT_PAGE_SIZE,
            fail_list_at_page: None,
            fail_delete: None,
            rejected_keys: HashSet::new(),
            pages_served: AtomicUsize::new(0),
            delete_calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the number of objects per listing page (minimum 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fail listing when the zero-based page `page` is requested.
    pub fn with_list_failure_at_page(mut self, page: usize) -> Self {
        self.fail_list_at_page = Some(page);
        self
    }

    /// Fail every delete call with `message`.
    pub fn with_delete_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_delete = Some(message.into());
        self
    }

    /// Refuse to delete `key`, reporting it as a per-key failure.
    pub fn with_rejected_key(mut self, key: impl Into<String>) -> Self {
        self.rejected_keys.insert(key.into());
        self
    }

    /// Keys currently stored, in listing order.
    pub fn keys(&self) -> Vec<String> {
        self.lock_objects().iter().map(|o| o.key.clone()).collect()
    }

    /// Keys passed to each delete call so far.
    pub fn delete_calls(&self) -> Vec<Vec<String>> {
        self.delete_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of listing pages served so far.
    pub fn pages_served(&self) -> usize {
        self.pages_served.load(Ordering::Relaxed)
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, Vec<ObjectRecord>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn page_stream<'a>(
        &'a self,
        bucket: &'a str,
    ) -> impl Stream<Item = Result<Vec<ObjectRecord>>> + Send + 'a {
        try_stream! {
            self.check_bucket(bucket).map_err(CleanerError::List)?;

            let mut page_index = 0;
            loop {
                if self.fail_list_at_page == Some(page_index) {
                    Err::<(), _>(CleanerError::list(format!(
                        "injected failure listing page {page_index} of {bucket}"
                    )))?;
                }

                let page: Vec<ObjectRecord> = {
                    let objects = self.lock_objects();
                    objects
                        .iter()
                        .skip(page_index * self.page_size)
                        .take(self.page_size)
                        .cloned()
                        .collect()
                };

                if page.is_empty() {
                    break;
                }

                self.pages_served.fetch_add(1, Ordering::Relaxed);
                debug!(bucket = %bucket, page = page_index, objects = page.len(), "Serving page");

                let last_page = page.len() < self.page_size;
                yield page;

                if last_page {
                    break;
                }
                page_index += 1;
            }
        }
    }

    fn check_bucket(&self, bucket: &str) -> std::result::Result<(), String> {
        if bucket == self.bucket {
            Ok(())
        } else {
            Err(format!("NoSuchBucket: {bucket}"))
        }
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    fn list_pages<'a>(&'a self, bucket: &'a str) -> BoxStream<'a, Result<Vec<ObjectRecord>>> {
        self.page_stream(bucket).boxed()
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<DeleteOutcome> {
        self.delete_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(keys.to_vec());

        self.check_bucket(bucket).map_err(CleanerError::Delete)?;

        if let Some(message) = &self.fail_delete {
            return Err(CleanerError::delete(message.clone()));
        }

        let mut outcome = DeleteOutcome::default();
        let mut objects = self.lock_objects();

        for key in keys {
            if self.rejected_keys.contains(key) {
                outcome.failed.push(DeleteFailure {
                    key: key.clone(),
                    code: Some("AccessDenied".to_string()),
                    message: Some("Access Denied".to_string()),
                });
                continue;
            }

            // Absent keys count as deleted, matching S3 semantics.
            objects.retain(|o| &o.key != key);
            outcome.deleted.push(key.clone());
        }

        Ok(outcome)
    }
}
