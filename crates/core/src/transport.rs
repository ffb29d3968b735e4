//! Transport trait definition
//!
//! The transport performs the signed HTTP requests against the object store.
//! It is injected into the client so the S3 SDK adapter, an in-memory store
//! or a mock can be substituted without changing the client.

use std::path::Path;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::error::Result;

/// Streamed response body, delivered in chunks
pub type BodyStream = BoxStream<'static, std::io::Result<Vec<u8>>>;

/// Headers sent along with an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHeaders {
    /// MIME type of the file
    pub content_type: String,

    /// File size in bytes
    pub content_length: u64,

    /// Canned ACL for the stored object
    pub acl: String,
}

/// Raw HTTP response as returned by the transport
pub struct RawResponse {
    /// HTTP status code
    pub status_code: u16,

    /// URL the request was sent to
    pub request_url: String,

    /// Response body
    pub body: BodyStream,
}

impl RawResponse {
    /// Response with an empty body
    pub fn new(status_code: u16, request_url: impl Into<String>) -> Self {
        Self::with_chunks(status_code, request_url, Vec::new())
    }

    /// Response with a single-chunk body
    pub fn with_body(
        status_code: u16,
        request_url: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self::with_chunks(status_code, request_url, vec![body.into()])
    }

    /// Response whose body arrives as several chunks
    pub fn with_chunks(
        status_code: u16,
        request_url: impl Into<String>,
        chunks: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            status_code,
            request_url: request_url.into(),
            body: stream::iter(chunks.into_iter().map(Ok)).boxed(),
        }
    }

    /// Whether the status is in the 2xx band
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status_code)
    }
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("status_code", &self.status_code)
            .field("request_url", &self.request_url)
            .finish_non_exhaustive()
    }
}

/// Capability interface for the object store requests
///
/// Implementations return `Ok` for any HTTP response, 2xx or not; `Err` is
/// reserved for local read failures and network-level failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Upload a local file under `key`
    async fn put_file(
        &self,
        local_path: &Path,
        key: &str,
        headers: &UploadHeaders,
    ) -> Result<RawResponse>;

    /// Delete the object stored under `key`
    async fn delete_file(&self, key: &str) -> Result<RawResponse>;
}
