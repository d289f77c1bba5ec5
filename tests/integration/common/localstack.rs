//! LocalStack test context and utilities.

use aws_sdk_s3::Client as S3Client;
use bc_cleaner::S3Config;

/// LocalStack test context providing an S3 client.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.clone()))
            .endpoint_url(&endpoint)
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                "test", "test", None, None, "localstack",
            ))
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Self {
            s3: S3Client::from_conf(s3_config),
            endpoint,
            region,
        }
    }

    /// S3 configuration pointing the cleaner at LocalStack.
    pub fn s3_config(&self) -> S3Config {
        S3Config::new(&self.region)
            .with_endpoint(&self.endpoint)
            .with_credentials("test", "test", None)
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        // Try to list S3 buckets - this will fail quickly if LocalStack isn't running
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Create an S3 bucket for testing.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        // First check if bucket exists
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Upload a small text object.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: &str,
    ) -> Result<(), aws_sdk_s3::Error> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(data.as_bytes().to_vec().into())
            .content_type("text/plain")
            .send()
            .await?;
        Ok(())
    }

    /// Upload `count` objects named `{prefix}{i}`.
    pub async fn seed_objects(
        &self,
        bucket: &str,
        prefix: &str,
        count: usize,
    ) -> Result<(), aws_sdk_s3::Error> {
        for i in 0..count {
            self.put_object(bucket, &format!("{prefix}{i}"), "payload").await?;
        }
        Ok(())
    }

    /// List every key in a bucket, following continuation tokens.
    pub async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, aws_sdk_s3::Error> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.s3.list_objects_v2().bucket(bucket);
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let result = request.send().await?;
            keys.extend(
                result
                    .contents()
                    .iter()
                    .filter_map(|o| o.key().map(String::from)),
            );

            if result.is_truncated() == Some(true) {
                continuation_token = result.next_continuation_token;
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        Ok(keys)
    }

    /// Delete every object in a bucket.
    pub async fn empty_bucket(&self, bucket: &str) -> Result<(), aws_sdk_s3::Error> {
        for key in self.list_keys(bucket).await? {
            self.s3
                .delete_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await?;
        }
        Ok(())
    }
}
