//! S3-backed object store.

use async_stream::try_stream;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::delete_objects::DeleteObjectsOutput;
use aws_sdk_s3::types::{Delete, Object, ObjectIdentifier};
use bc_error::{CleanerError, Result};
use chrono::DateTime;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::store::{DeleteFailure, DeleteOutcome, ObjectRecord, ObjectStore};

/// Maximum number of keys S3 accepts in one DeleteObjects request.
pub const MAX_DELETE_BATCH: usize = 1000;

/// [`ObjectStore`] backed by the AWS S3 API.
///
/// Listing uses ListObjectsV2 with continuation tokens. Deletion uses
/// DeleteObjects in verbose mode so every deleted key is reported back;
/// batches larger than [`MAX_DELETE_BATCH`] are sent as consecutive
/// requests.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Wrap an S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn page_stream<'a>(
        &'a self,
        bucket: &'a str,
    ) -> impl Stream<Item = Result<Vec<ObjectRecord>>> + Send + 'a {
        try_stream! {
            let mut continuation_token: Option<String> = None;

            loop {
                let mut req = self.client.list_objects_v2().bucket(bucket);

                if let Some(ref token) = continuation_token {
                    req = req.continuation_token(token);
                }

                let resp = req.send().await.map_err(|e| {
                    CleanerError::list(format!(
                        "S3 list objects failed for {bucket}: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

                let page: Vec<ObjectRecord> = resp
                    .contents()
                    .iter()
                    .filter_map(object_record)
                    .collect();

                debug!(bucket = %bucket, objects = page.len(), "Listed page");
                yield page;

                // Check if there are more results
                if resp.is_truncated() == Some(true) {
                    continuation_token = resp.next_continuation_token;
                    if continuation_token.is_none() {
                        break;
                    }
                } else {
                    break;
                }
            }
        }
    }

    async fn delete_chunk(&self, bucket: &str, keys: &[String]) -> Result<DeleteOutcome> {
        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CleanerError::delete(format!("invalid delete request: {e}")))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(false)
            .build()
            .map_err(|e| CleanerError::delete(format!("invalid delete request: {e}")))?;

        let resp = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| {
                CleanerError::delete(format!(
                    "S3 delete objects failed for {bucket}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(delete_outcome(&resp))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn list_pages<'a>(&'a self, bucket: &'a str) -> BoxStream<'a, Result<Vec<ObjectRecord>>> {
        self.page_stream(bucket).boxed()
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<DeleteOutcome> {
        let mut outcome = DeleteOutcome::default();

        for chunk in keys.chunks(MAX_DELETE_BATCH) {
            match self.delete_chunk(bucket, chunk).await {
                Ok(chunk_outcome) => outcome.merge(chunk_outcome),
                Err(e) => {
                    if let (Some(first), Some(last)) =
                        (outcome.deleted.first(), outcome.deleted.last())
                    {
                        warn!(
                            bucket = %bucket,
                            deleted = outcome.deleted_count(),
                            first_key = %first,
                            last_key = %last,
                            "Delete request failed after earlier requests succeeded"
                        );
                        debug!(bucket = %bucket, keys = ?outcome.deleted, "Keys already deleted");
                    }
                    return Err(e);
                }
            }
        }

        Ok(outcome)
    }
}

/// Convert a listed S3 object, skipping entries without a key.
fn object_record(obj: &Object) -> Option<ObjectRecord> {
    let key = obj.key().filter(|k| !k.is_empty())?;

    let last_modified = obj
        .last_modified()
        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()));

    Some(ObjectRecord {
        key: key.to_string(),
        size: obj.size().unwrap_or(0).max(0) as u64,
        last_modified,
    })
}

fn delete_outcome(resp: &DeleteObjectsOutput) -> DeleteOutcome {
    DeleteOutcome {
        deleted: resp
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(str::to_string))
            .collect(),
        failed: resp
            .errors()
            .iter()
            .map(|e| DeleteFailure {
                key: e.key().unwrap_or_default().to_string(),
                code: e.code().map(str::to_string),
                message: e.message().map(str::to_string),
            })
            .collect(),
    }
}
