//! objstore-core: Core library for the objstore client
//!
//! This crate provides the SDK-independent parts of objstore:
//! - Configuration validation and defaulting
//! - Public URL derivation and its inverse
//! - The Transport trait the S3 adapter implements
//! - ObjectStoreClient, which saves files and removes them by URL
//!
//! An in-memory transport is included for tests and offline use.

pub mod client;
pub mod config;
pub mod error;
pub mod location;
pub mod memory;
pub mod transport;

pub use client::{ObjectStoreClient, PathTransform, QueryOutcome, Removal};
pub use config::{ResolvedConfig, StoreOptions};
pub use error::{Error, Result};
pub use memory::MemoryTransport;
pub use transport::{BodyStream, RawResponse, Transport, UploadHeaders};
