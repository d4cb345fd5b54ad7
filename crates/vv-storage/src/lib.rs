//! # vv-storage
//!
//! Storage layer for vidvault. All blob and document I/O goes through the
//! [`FileSystem`] trait, addressed by `/`-separated paths relative to an
//! opaque root.
//!
//! - [`LocalFileSystem`] maps paths onto a local directory.
//! - [`TransformedFileSystem`] wraps any filesystem and applies a reversible
//!   [`ByteTransform`] (by default [`XorTransform`]) to all file content, so
//!   data at rest is obfuscated.
//! - [`IndexResolvingFs`] resolves directory requests to `index.html` for
//!   HTTP serving.

pub mod fs;
pub mod http;
pub mod local;
pub mod transform;
pub mod transformed;

pub use fs::{is_not_exist, join_path, parent_dir, FileSystem, Metadata};
pub use http::IndexResolvingFs;
pub use local::LocalFileSystem;
pub use transform::{transform_bytes, ByteTransform, TransformReader, TransformWriter, XorTransform};
pub use transformed::TransformedFileSystem;

use std::path::PathBuf;
use std::sync::Arc;

/// Open the standard obfuscated local store: a [`LocalFileSystem`] at `root`
/// wrapped in an XOR transform with `key`.
pub fn open_local(root: impl Into<PathBuf>, key: u8) -> vv_core::Result<Arc<dyn FileSystem>> {
    let local = LocalFileSystem::new(root)?;
    tracing::debug!(root = %local.root().display(), "opened local storage");
    Ok(Arc::new(TransformedFileSystem::xor(local, key)))
}
