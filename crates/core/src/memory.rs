//! In-memory transport
//!
//! Behaves like an S3 bucket kept in a map: uploads read the local file and
//! store its bytes, deletes answer 204 whether or not the key existed.
//! Useful for tests and for running without a store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::transport::{RawResponse, Transport, UploadHeaders};

/// An object held by the memory transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub acl: String,
}

/// Transport keeping objects in memory
#[derive(Debug, Default)]
pub struct MemoryTransport {
    base_url: String,
    objects: Mutex<HashMap<String, StoredObject>>,
    put_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryTransport {
    /// Create a memory transport answering with URLs under `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create a memory transport for a bucket
    pub fn for_config(config: &ResolvedConfig) -> Self {
        Self::new(config.base_url())
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Status a HEAD request for `key` would return
    pub fn head(&self, key: &str) -> u16 {
        if self.objects().contains_key(key) {
            200
        } else {
            404
        }
    }

    /// Stored object under `key`
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects().get(key).cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of upload requests received
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of delete requests received
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn put_file(
        &self,
        local_path: &Path,
        key: &str,
        headers: &UploadHeaders,
    ) -> Result<RawResponse> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        let data = tokio::fs::read(local_path).await?;

        self.objects().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: headers.content_type.clone(),
                acl: headers.acl.clone(),
            },
        );

        Ok(RawResponse::new(200, format!("{}{}", self.base_url, key)))
    }

    async fn delete_file(&self, key: &str) -> Result<RawResponse> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.objects().remove(key);

        Ok(RawResponse::new(204, format!("{}{}", self.base_url, key)))
    }
}
