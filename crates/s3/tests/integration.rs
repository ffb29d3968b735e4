//! Integration tests for objstore-s3
//!
//! These tests require a reachable S3-compatible bucket that serves
//! virtual-hosted https URLs and honors the public-read ACL.
//!
//! Run with:
//! ```bash
//! export CRATE_KEY=... CRATE_SECRET=... CRATE_BUCKET=... CRATE_ENDPOINT=...
//! cargo test -p objstore-s3 --features integration
//! ```

#![cfg(feature = "integration")]

use objstore_core::{Removal, StoreOptions};
use objstore_s3::connect;
use tempfile::TempDir;

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set for integration tests"))
}

fn options() -> StoreOptions {
    StoreOptions::new(env("CRATE_KEY"), env("CRATE_SECRET"), env("CRATE_BUCKET"))
        .endpoint(env("CRATE_ENDPOINT"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Status of an unsigned HEAD request
async fn public_status(http: &reqwest::Client, url: &str) -> u16 {
    http.head(url)
        .send()
        .await
        .expect("HEAD request failed")
        .status()
        .as_u16()
}

#[tokio::test]
async fn test_store_and_remove_file() {
    init_tracing();

    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("node_js_logo.png");
    std::fs::write(&source, b"\x89PNG\r\n\x1a\n").unwrap();

    let client = connect(&options()).unwrap();

    let url = client.save(&source).await.unwrap();
    assert_eq!(
        url,
        format!("{}/node_js_logo.png", client.config().base_url())
    );

    // the returned URL is served publicly
    let http = reqwest::Client::new();
    assert_eq!(public_status(&http, &url).await, 200);

    let key = client.object_key(&url).unwrap();
    assert_eq!(client.transport().head_object(&key).await.unwrap(), 200);

    let removal = client.remove(Some(&url)).await.unwrap();
    assert!(matches!(removal, Removal::Removed { .. }));
    assert_eq!(removal.url(), Some(url.as_str()));

    assert_ne!(public_status(&http, &url).await, 200);
    assert_ne!(client.transport().head_object(&key).await.unwrap(), 200);
}

#[tokio::test]
async fn test_wrong_secret_is_remote_error() {
    init_tracing();

    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("denied.txt");
    std::fs::write(&source, b"nope").unwrap();

    let options = StoreOptions::new(env("CRATE_KEY"), "not-the-secret", env("CRATE_BUCKET"))
        .endpoint(env("CRATE_ENDPOINT"));
    let client = connect(&options).unwrap();

    let err = client.save(&source).await.unwrap_err();
    assert_eq!(err.status_code(), Some(403));
    assert!(err.body().is_some_and(|body| !body.is_empty()));
}
