//! Configuration handling
//!
//! `StoreOptions` is the raw, possibly incomplete configuration a caller
//! supplies, either built in code or read from a TOML file. Resolving it
//! validates the credentials and bucket and fills in the ACL, region and
//! endpoint defaults, producing an immutable `ResolvedConfig`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default canned ACL applied to uploads
const DEFAULT_ACL: &str = "public-read";

/// Default region
const DEFAULT_REGION: &str = "us-standard";

/// Endpoint of the standard region
const STANDARD_ENDPOINT: &str = "s3.amazonaws.com";

/// Raw configuration as supplied by the caller
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Access key ID
    #[serde(default, alias = "key")]
    pub access_key: Option<String>,

    /// Secret access key
    #[serde(default, alias = "secret")]
    pub secret_key: Option<String>,

    /// Bucket name
    #[serde(default)]
    pub bucket: Option<String>,

    /// Canned ACL for uploaded objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<String>,

    /// Region name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Endpoint host, used verbatim when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl StoreOptions {
    /// Create options with the three required fields
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            access_key: Some(access_key.into()),
            secret_key: Some(secret_key.into()),
            bucket: Some(bucket.into()),
            ..Default::default()
        }
    }

    pub fn acl(mut self, acl: impl Into<String>) -> Self {
        self.acl = Some(acl.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Parse options from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the options and apply defaults
    ///
    /// Pure: the same options always resolve to the same configuration.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let access_key = required(&self.access_key, "access key")?;
        let secret_key = required(&self.secret_key, "secret key")?;
        let bucket = required(&self.bucket, "bucket")?;

        let acl = non_empty(&self.acl).unwrap_or_else(default_acl);
        let region = non_empty(&self.region).unwrap_or_else(default_region);
        let endpoint = match non_empty(&self.endpoint) {
            Some(endpoint) => endpoint,
            None => default_endpoint(&region),
        };
        validate_endpoint(&endpoint)?;

        Ok(ResolvedConfig {
            access_key,
            secret_key,
            bucket,
            acl,
            region,
            endpoint,
        })
    }
}

impl std::fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreOptions")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("bucket", &self.bucket)
            .field("acl", &self.acl)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn required(value: &Option<String>, field: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| Error::Config(format!("{field} is required")))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn default_acl() -> String {
    DEFAULT_ACL.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Standard endpoint host for a region
pub fn default_endpoint(region: &str) -> String {
    match region {
        "us-standard" | "us-east-1" => STANDARD_ENDPOINT.to_string(),
        other => format!("s3-{other}.amazonaws.com"),
    }
}

/// The endpoint must be a bare host, optionally with a port
fn validate_endpoint(endpoint: &str) -> Result<()> {
    let invalid = || Error::Config(format!("endpoint must be a bare host: {endpoint}"));

    if endpoint.contains('/') || endpoint.contains('?') || endpoint.contains('#') {
        return Err(invalid());
    }
    let parsed = url::Url::parse(&format!("https://{endpoint}")).map_err(|_| invalid())?;
    if parsed.host_str().is_none() {
        return Err(invalid());
    }

    Ok(())
}

/// Effective configuration after validation and defaulting
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub acl: String,
    pub region: String,
    pub endpoint: String,
}

impl ResolvedConfig {
    /// Prefix shared by every public URL of this bucket
    pub fn base_url(&self) -> String {
        format!("https://{}.{}", self.bucket, self.endpoint)
    }
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("acl", &self.acl)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn base() -> StoreOptions {
        StoreOptions::new("foo", "bar", "baz")
    }

    #[test]
    fn test_requires_options() {
        let result = StoreOptions::default().resolve();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_requires_secret() {
        let options = StoreOptions {
            access_key: Some("foo".into()),
            ..Default::default()
        };
        let err = options.resolve().unwrap_err();
        assert!(err.to_string().contains("secret key"));
    }

    #[test]
    fn test_requires_bucket() {
        let options = StoreOptions {
            access_key: Some("foo".into()),
            secret_key: Some("bar".into()),
            ..Default::default()
        };
        let err = options.resolve().unwrap_err();
        assert!(err.to_string().contains("bucket"));
    }

    #[test]
    fn test_blank_fields_are_missing() {
        let options = StoreOptions::new("  ", "bar", "baz");
        assert!(matches!(options.resolve(), Err(Error::Config(_))));
    }

    #[test]
    fn test_defaults() {
        let config = base().resolve().unwrap();
        assert_eq!(config.acl, "public-read");
        assert_eq!(config.region, "us-standard");
        assert_eq!(config.endpoint, "s3.amazonaws.com");
        assert_eq!(config.base_url(), "https://baz.s3.amazonaws.com");
    }

    #[test]
    fn test_explicit_values_win() {
        let config = base()
            .acl("qux")
            .region("eu-west-1")
            .endpoint("minio.local:9000")
            .resolve()
            .unwrap();
        assert_eq!(config.acl, "qux");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.endpoint, "minio.local:9000");
    }

    #[test]
    fn test_endpoint_follows_region() {
        let config = base().region("eu-west-1").resolve().unwrap();
        assert_eq!(config.endpoint, "s3-eu-west-1.amazonaws.com");

        let config = base().region("us-east-1").resolve().unwrap();
        assert_eq!(config.endpoint, "s3.amazonaws.com");
    }

    #[test]
    fn test_rejects_endpoint_with_scheme() {
        let result = base().endpoint("https://s3.example.com").resolve();
        assert!(matches!(result, Err(Error::Config(_))));

        let result = base().endpoint("bad host").resolve();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = base().resolve().unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"bar\""));
    }

    #[test]
    fn test_options_debug_redacts_secret() {
        let debug = format!("{:?}", base());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"bar\""));

        let debug = format!("{:?}", StoreOptions::default());
        assert!(debug.contains("secret_key: None"));
    }

    #[test]
    fn test_from_toml_with_aliases() {
        let options = StoreOptions::from_toml_str(
            r#"
            key = "foo"
            secret = "bar"
            bucket = "baz"
            endpoint = "nyc3.digitaloceanspaces.com"
            "#,
        )
        .unwrap();
        let config = options.resolve().unwrap();
        assert_eq!(config.access_key, "foo");
        assert_eq!(config.endpoint, "nyc3.digitaloceanspaces.com");
        assert_eq!(config.acl, "public-read");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.toml");
        std::fs::write(
            &path,
            "access_key = \"a\"\nsecret_key = \"s\"\nbucket = \"b\"\nacl = \"private\"\n",
        )
        .unwrap();

        let config = StoreOptions::load(&path).unwrap().resolve().unwrap();
        assert_eq!(config.acl, "private");
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = StoreOptions::from_toml_str("bucket = ");
        assert!(matches!(result, Err(Error::TomlParse(_))));
    }
}
