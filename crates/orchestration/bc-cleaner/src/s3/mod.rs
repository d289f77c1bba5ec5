//! S3 session setup and the S3 object store.
//!
//! This module provides:
//! - Client configuration with LocalStack support
//! - Credential verification at startup
//! - [`S3Store`], the production [`ObjectStore`](crate::store::ObjectStore)

mod client;
mod store;

pub use client::{S3Config, create_s3_client, load_sdk_config, verify_credentials};
pub use store::{MAX_DELETE_BATCH, S3Store};
