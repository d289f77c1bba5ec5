//! Retention cleanup integration tests using LocalStack.
//!
//! LocalStack stamps objects with the upload time, so tests that need old
//! objects run the cleaner with a clock pinned in the future.

use crate::common::LocalStackTestContext;
use bc_cleaner::{Cleaner, CleanupConfig, FixedClock, S3Store, SystemClock, create_s3_client};
use bc_error::CleanerError;
use chrono::{Duration, Utc};

fn clock_ahead(hours: i64) -> FixedClock {
    FixedClock::new(Utc::now() + Duration::hours(hours))
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_clean_up_deletes_expired_objects() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "test-cleanup-bucket";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.empty_bucket(bucket).await.unwrap();
    ctx.seed_objects(bucket, "logs/app-", 3).await.unwrap();

    let client = create_s3_client(&ctx.s3_config()).await.unwrap();
    let cleaner = Cleaner::new(clock_ahead(2), S3Store::new(client));

    let deleted = cleaner
        .clean_up(bucket, Duration::hours(1), false)
        .await
        .unwrap();

    assert_eq!(deleted, 3);
    assert!(ctx.list_keys(bucket).await.unwrap().is_empty());

    // A second pass finds nothing left to delete
    let deleted = cleaner
        .clean_up(bucket, Duration::hours(1), false)
        .await
        .unwrap();
    assert_eq!(deleted, 0);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_dry_run_keeps_objects() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "test-dry-run-bucket";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.empty_bucket(bucket).await.unwrap();
    ctx.seed_objects(bucket, "data/", 4).await.unwrap();

    let client = create_s3_client(&ctx.s3_config()).await.unwrap();
    let cleaner = Cleaner::new(clock_ahead(2), S3Store::new(client));
    let config = CleanupConfig::new(bucket)
        .with_max_age(Duration::hours(1))
        .with_dry_run(true);

    let stats = cleaner.run(&config).await.unwrap();

    assert_eq!(stats.candidates, 4);
    assert_eq!(stats.deleted, 0);
    assert_eq!(ctx.list_keys(bucket).await.unwrap().len(), 4);

    ctx.empty_bucket(bucket).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_recent_objects_are_retained() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "test-retain-bucket";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.empty_bucket(bucket).await.unwrap();
    ctx.seed_objects(bucket, "fresh-", 2).await.unwrap();

    let client = create_s3_client(&ctx.s3_config()).await.unwrap();
    let cleaner = Cleaner::new(SystemClock, S3Store::new(client));

    let deleted = cleaner
        .clean_up(bucket, Duration::hours(1), false)
        .await
        .unwrap();

    assert_eq!(deleted, 0);
    assert_eq!(ctx.list_keys(bucket).await.unwrap().len(), 2);

    ctx.empty_bucket(bucket).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_large_candidate_set_spans_pages_and_batches() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    // More than one listing page and more than one DeleteObjects request
    let bucket = "test-large-bucket";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.empty_bucket(bucket).await.unwrap();
    ctx.seed_objects(bucket, "bulk/", 1005).await.unwrap();

    let client = create_s3_client(&ctx.s3_config()).await.unwrap();
    let cleaner = Cleaner::new(clock_ahead(2), S3Store::new(client));

    let deleted = cleaner
        .clean_up(bucket, Duration::hours(1), false)
        .await
        .unwrap();

    assert_eq!(deleted, 1005);
    assert!(ctx.list_keys(bucket).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_bucket_is_list_error() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let client = create_s3_client(&ctx.s3_config()).await.unwrap();
    let cleaner = Cleaner::new(SystemClock, S3Store::new(client));

    let result = cleaner
        .clean_up("bucket-that-does-not-exist", Duration::hours(1), false)
        .await;

    assert!(matches!(result, Err(CleanerError::List(_))));
}
