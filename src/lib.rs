//! vidvault - obfuscated video storage with thumbnail and transcode jobs
//!
//! The library crate wires the storage, repository and tool crates into a
//! [`MediaLibrary`] and runs media jobs against it. It is exposed for the
//! binary and for integration testing.

pub mod blob;
pub mod bulk;
pub mod config;
pub mod context;
pub mod logging;
pub mod queue;
pub mod thumbnail;
pub mod transcode;

pub use bulk::{BulkSummary, Selection};
pub use context::MediaLibrary;
pub use queue::TranscodeQueue;
