//! S3 client configuration and creation.

use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::Client;
use bc_error::{CleanerError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for S3 access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region of the bucket
    pub region: String,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,

    /// Explicit AWS access key (optional)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional)
    pub secret_key: Option<String>,

    /// AWS session token for temporary credentials (optional)
    pub session_token: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,

    /// Per-operation timeout in seconds
    pub timeout_secs: u64,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: String::new(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            session_token: None,
            profile: None,
            timeout_secs: 60,
        }
    }
}

impl S3Config {
    /// Create a new S3Config for the given region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self.session_token = session_token;
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the per-operation timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Check that a region is set.
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(CleanerError::config("bucket region must not be empty"));
        }
        Ok(())
    }
}

/// Load the shared AWS configuration described by `config`.
pub async fn load_sdk_config(config: &S3Config) -> Result<SdkConfig> {
    config.validate()?;

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(config.timeout_secs))
                .build(),
        );

    // Set custom endpoint if provided (for LocalStack)
    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials = aws_sdk_s3::config::Credentials::new(
            access_key,
            secret_key,
            config.session_token.clone(),
            None,
            "s3-bucket-cleaner",
        );
        loader = loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    Ok(loader.load().await)
}

/// Resolve credentials once so a broken session fails before any listing.
pub async fn verify_credentials(sdk_config: &SdkConfig) -> Result<()> {
    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| CleanerError::Credential("no AWS credentials provider configured".into()))?;

    let credentials = provider
        .provide_credentials()
        .await
        .map_err(|e| CleanerError::Credential(format!("failed to get AWS credentials: {e}")))?;

    debug!(expires = ?credentials.expiry(), "Resolved AWS credentials");
    Ok(())
}

/// Create an S3 client from configuration, verifying credentials first.
pub async fn create_s3_client(config: &S3Config) -> Result<Client> {
    let sdk_config = load_sdk_config(config).await?;
    verify_credentials(&sdk_config).await?;

    let builder = aws_sdk_s3::config::Builder::from(&sdk_config);

    // Path-style addressing for custom endpoints (LocalStack)
    let s3_config = if config.endpoint.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };

    Ok(Client::from_conf(s3_config))
}
