//! Adapter for serving a storage tree over HTTP.
//!
//! Directory requests resolve to the `index.html` inside them. There are no
//! directory listings: a directory without an index is reported as missing.

use std::io::{self, Read, Write};

use vv_core::{Error, Result};

use crate::fs::{is_not_exist, join_path, FileSystem, Metadata};

const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone)]
pub struct IndexResolvingFs<F> {
    inner: F,
}

impl<F: FileSystem> IndexResolvingFs<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    /// Map a request path to the file that should be served.
    pub fn resolve(&self, path: &str) -> Result<String> {
        let meta = self.inner.stat(path)?;
        if !meta.is_dir {
            return Ok(path.to_string());
        }

        let index = join_path(path, INDEX_FILE);
        match self.inner.stat(&index) {
            Ok(m) if !m.is_dir => Ok(index),
            Ok(_) => Err(no_listing(path)),
            Err(e) if is_not_exist(&e) => Err(no_listing(path)),
            Err(e) => Err(e),
        }
    }
}

fn no_listing(path: &str) -> Error {
    Error::io(
        "open",
        path,
        io::Error::new(io::ErrorKind::NotFound, "directory has no index.html"),
    )
}

impl<F: FileSystem> FileSystem for IndexResolvingFs<F> {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let target = self.resolve(path)?;
        self.inner.open(&target)
    }

    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>> {
        self.inner.create(path)
    }

    fn mkdir_all(&self, path: &str) -> Result<()> {
        self.inner.mkdir_all(path)
    }

    fn stat(&self, path: &str) -> Result<Metadata> {
        self.inner.stat(path)
    }

    fn remove(&self, path: &str) -> Result<()> {
        self.inner.remove(path)
    }
}
