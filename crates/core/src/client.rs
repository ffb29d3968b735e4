//! Object store client
//!
//! Validates configuration, derives public URLs and delegates uploads and
//! deletions to an injected [`Transport`], normalizing every response through
//! [`ObjectStoreClient::query_result`].

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;

use crate::config::{ResolvedConfig, StoreOptions};
use crate::error::{Error, Result};
use crate::location;
use crate::transport::{RawResponse, Transport, UploadHeaders};

/// Function mapping a local file to its object key
pub type PathTransform = Arc<dyn Fn(&Path) -> String + Send + Sync>;

/// Normalized outcome of a transport response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// No request was made
    Skipped,
    /// 2xx response; carries the request URL
    Completed(String),
}

/// Result of a removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// No URL was given, nothing was sent
    Skipped,
    /// The object was deleted
    Removed {
        /// Public URL of the removed object
        url: String,
        /// URL the delete request was sent to
        request_url: String,
    },
}

impl Removal {
    /// Public URL of the removed object, if a removal happened
    pub fn url(&self) -> Option<&str> {
        match self {
            Removal::Skipped => None,
            Removal::Removed { url, .. } => Some(url.as_str()),
        }
    }
}

/// Client storing local files and handing back their public URLs
pub struct ObjectStoreClient<T> {
    config: ResolvedConfig,
    transport: T,
    path_transform: Option<PathTransform>,
}

impl<T: Transport> ObjectStoreClient<T> {
    /// Create a client from raw options and a transport
    ///
    /// Fails when the access key, secret key or bucket is missing.
    pub fn new(options: &StoreOptions, transport: T) -> Result<Self> {
        let config = options.resolve()?;
        Ok(Self::from_config(config, transport))
    }

    /// Create a client from an already resolved configuration
    pub fn from_config(config: ResolvedConfig, transport: T) -> Self {
        tracing::debug!(
            bucket = %config.bucket,
            endpoint = %config.endpoint,
            region = %config.region,
            acl = %config.acl,
            "Object store client configured"
        );

        Self {
            config,
            transport,
            path_transform: None,
        }
    }

    /// Use a custom function to derive object keys from local paths
    pub fn with_path_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Path) -> String + Send + Sync + 'static,
    {
        self.path_transform = Some(Arc::new(transform));
        self
    }

    /// Effective configuration
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The injected transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Public URL for an object key
    pub fn public_url(&self, key: &str) -> String {
        location::public_url(&self.config, key)
    }

    /// Object key for a public URL
    pub fn object_key(&self, url: &str) -> Result<String> {
        location::object_key(&self.config, url)
    }

    fn key_for(&self, path: &Path) -> Result<String> {
        match &self.path_transform {
            Some(transform) => Ok(transform(path)),
            None => location::default_object_key(path),
        }
    }

    /// Upload a local file and return its public URL
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let key = self.key_for(path)?;

        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )));
        }

        let headers = UploadHeaders {
            content_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            content_length: metadata.len(),
            acl: self.config.acl.clone(),
        };

        tracing::debug!(
            key = %key,
            size = %humansize::format_size(metadata.len(), humansize::BINARY),
            content_type = %headers.content_type,
            "Uploading file"
        );

        let response = self.transport.put_file(path, &key, &headers).await?;
        Self::query_result(Some(response)).await?;

        Ok(self.public_url(&key))
    }

    /// Delete the object behind a public URL
    ///
    /// A missing or empty URL is a no-op: the transport is not called.
    pub async fn remove(&self, url: Option<&str>) -> Result<Removal> {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            Self::query_result(None).await?;
            return Ok(Removal::Skipped);
        };

        let key = self.object_key(url).map_err(|source| Error::Remove {
            url: url.to_string(),
            source: Box::new(source),
        })?;
        let public_url = self.public_url(&key);
        tracing::debug!(key = %key, "Removing object");

        let outcome: Result<QueryOutcome> = async {
            let response = self.transport.delete_file(&key).await?;
            Self::query_result(Some(response)).await
        }
        .await;

        match outcome {
            Ok(QueryOutcome::Completed(request_url)) => Ok(Removal::Removed {
                url: public_url,
                request_url,
            }),
            Ok(QueryOutcome::Skipped) => Ok(Removal::Skipped),
            Err(source) => Err(Error::Remove {
                url: public_url,
                source: Box::new(source),
            }),
        }
    }

    /// Normalize a transport response
    ///
    /// `None` is the local short-circuit and reads nothing. A 2xx status
    /// completes with the request URL; anything else drains the whole body
    /// into an `Error::Remote`.
    pub async fn query_result(response: Option<RawResponse>) -> Result<QueryOutcome> {
        let Some(response) = response else {
            return Ok(QueryOutcome::Skipped);
        };

        if response.is_success() {
            return Ok(QueryOutcome::Completed(response.request_url));
        }

        let status = response.status_code;
        let mut body = Vec::new();
        let mut stream = response.body;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| Error::Transport(format!("Failed to read response body: {e}")))?;
            body.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&body).into_owned();

        tracing::warn!(status, url = %response.request_url, "Object store request failed");
        Err(Error::Remote { status, body })
    }
}
