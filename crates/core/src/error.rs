//! Error types for objstore-core
//!
//! One error type covers configuration, local I/O, remote responses and the
//! transport layer, so callers match on a single enum.

use thiserror::Error;

/// Result type alias for objstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for objstore operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration, raised at construction
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The object store answered with a non-2xx status
    #[error("Request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    /// URL that does not address an object of the configured bucket
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network-level failure reported by the transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// A removal failed; carries the URL that was requested
    #[error("Failed to remove {url}: {source}")]
    Remove {
        url: String,
        #[source]
        source: Box<Error>,
    },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// HTTP status of a remote failure, looking through `Remove`
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            Error::Remove { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Response body of a remote failure, looking through `Remove`
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Remote { body, .. } => Some(body),
            Error::Remove { source, .. } => source.body(),
            _ => None,
        }
    }
}
