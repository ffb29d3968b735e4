//! Public URL derivation
//!
//! Objects are addressed virtual-host style:
//! `https://{bucket}.{endpoint}{key}`, where the key carries its own leading
//! slash. The inverse strips that prefix again.

use std::path::Path;

use crate::config::ResolvedConfig;
use crate::error::{Error, Result};

/// Public URL for an object key
pub fn public_url(config: &ResolvedConfig, key: &str) -> String {
    format!("{}{}", config.base_url(), key)
}

/// Object key for a public URL
///
/// Accepts a URL under the bucket's base URL or a bare key starting with
/// `/`. Anything else points outside the bucket.
pub fn object_key(config: &ResolvedConfig, url: &str) -> Result<String> {
    let base = config.base_url();
    match url.strip_prefix(base.as_str()) {
        Some(key) if key.starts_with('/') => Ok(key.to_string()),
        Some(_) => Err(Error::InvalidUrl(format!("not an object of this bucket: {url}"))),
        None if url.starts_with('/') => Ok(url.to_string()),
        None => Err(Error::InvalidUrl(format!("not an object of this bucket: {url}"))),
    }
}

/// Default key for a local file: its base name with a leading slash
pub fn default_object_key(path: &Path) -> Result<String> {
    let name = path.file_name().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a file path: {}", path.display()),
        ))
    })?;

    Ok(format!("/{}", name.to_string_lossy()))
}
