//! objstore-s3: S3 SDK transport for objstore
//!
//! This crate provides the implementation of the Transport trait
//! using the aws-sdk-s3 crate. It is the only crate that directly
//! depends on the AWS SDK.

pub mod transport;

pub use transport::{S3Transport, connect};
