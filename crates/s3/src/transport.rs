//! S3 transport implementation
//!
//! Wraps aws-sdk-s3 and implements the Transport trait from objstore-core.
//! Responses are reported back as raw status and body so the client can
//! normalize them; only dispatch failures become transport errors.

use std::path::Path;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_smithy_types::byte_stream::ByteStream;

use objstore_core::{
    Error, ObjectStoreClient, RawResponse, ResolvedConfig, Result, StoreOptions, Transport,
    UploadHeaders,
};

/// Status S3 answers a successful PutObject with
const PUT_OK: u16 = 200;

/// Status S3 answers a successful DeleteObject with
const DELETE_OK: u16 = 204;

/// S3 transport wrapper
pub struct S3Transport {
    inner: aws_sdk_s3::Client,
    bucket: String,
    base_url: String,
}

impl S3Transport {
    /// Create a new S3 transport from a resolved configuration
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        let endpoint = url::Url::parse(&format!("https://{}", config.endpoint))
            .map_err(|e| Error::Config(format!("Invalid endpoint {}: {e}", config.endpoint)))?;

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None, // session token
            None, // expiry
            "objstore-static-credentials",
        );

        // Virtual-hosted addressing so request URLs match the public URLs,
        // and a single attempt per request.
        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(signing_region(&config.region)))
            .endpoint_url(endpoint.as_str().trim_end_matches('/'))
            .force_path_style(false)
            .retry_config(RetryConfig::disabled())
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            base_url: config.base_url(),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    fn request_url(&self, key: &str) -> String {
        format!("{}{}", self.base_url, key)
    }

    /// Status code a HEAD request for `key` gets back
    pub async fn head_object(&self, key: &str) -> Result<u16> {
        match self
            .inner
            .head_object()
            .bucket(&self.bucket)
            .key(object_name(key))
            .send()
            .await
        {
            Ok(_) => Ok(200),
            Err(e) => match e.raw_response() {
                Some(raw) => Ok(raw.status().as_u16()),
                None => Err(Error::Transport(e.to_string())),
            },
        }
    }

    fn map_result<O, E>(
        &self,
        key: &str,
        ok_status: u16,
        result: std::result::Result<O, SdkError<E, HttpResponse>>,
    ) -> Result<RawResponse>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let request_url = self.request_url(key);
        match result {
            Ok(_) => Ok(RawResponse::new(ok_status, request_url)),
            Err(e) => match e.raw_response() {
                Some(raw) => {
                    let body = raw.body().bytes().map(<[u8]>::to_vec).unwrap_or_default();
                    Ok(RawResponse::with_body(
                        raw.status().as_u16(),
                        request_url,
                        body,
                    ))
                }
                None => Err(Error::Transport(e.to_string())),
            },
        }
    }
}

#[async_trait]
impl Transport for S3Transport {
    async fn put_file(
        &self,
        local_path: &Path,
        key: &str,
        headers: &UploadHeaders,
    ) -> Result<RawResponse> {
        let content_length = content_length(headers.content_length)?;
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;

        tracing::debug!(bucket = %self.bucket, key = %key, "PutObject");
        let result = self
            .inner
            .put_object()
            .bucket(&self.bucket)
            .key(object_name(key))
            .body(body)
            .content_type(&headers.content_type)
            .content_length(content_length)
            .acl(ObjectCannedAcl::from(headers.acl.as_str()))
            .send()
            .await;

        self.map_result(key, PUT_OK, result)
    }

    async fn delete_file(&self, key: &str) -> Result<RawResponse> {
        tracing::debug!(bucket = %self.bucket, key = %key, "DeleteObject");
        let result = self
            .inner
            .delete_object()
            .bucket(&self.bucket)
            .key(object_name(key))
            .send()
            .await;

        self.map_result(key, DELETE_OK, result)
    }
}

/// Build an object store client backed by S3
pub fn connect(options: &StoreOptions) -> Result<ObjectStoreClient<S3Transport>> {
    let config = options.resolve()?;
    let transport = S3Transport::new(&config)?;
    Ok(ObjectStoreClient::from_config(config, transport))
}

/// Region used for request signing
fn signing_region(region: &str) -> String {
    match region {
        "us-standard" => "us-east-1".to_string(),
        other => other.to_string(),
    }
}

/// Content-Length header value for the SDK
fn content_length(len: u64) -> Result<i64> {
    i64::try_from(len).map_err(|_| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("file too large to upload: {len} bytes"),
        ))
    })
}

/// S3 object name for a key; keys carry a leading slash, object names don't
fn object_name(key: &str) -> &str {
    key.strip_prefix('/').unwrap_or(key)
}
