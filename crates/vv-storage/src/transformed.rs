//! A filesystem wrapper that transforms every byte read or written.

use std::io::{Read, Write};

use vv_core::Result;

use crate::fs::{FileSystem, Metadata};
use crate::transform::{ByteTransform, TransformReader, TransformWriter, XorTransform};

/// Applies `T` to all file content passing through `open` and `create`.
/// Directory operations and `stat` pass through untouched.
#[derive(Debug, Clone)]
pub struct TransformedFileSystem<F, T = XorTransform> {
    inner: F,
    transform: T,
}

impl<F: FileSystem> TransformedFileSystem<F, XorTransform> {
    /// Wrap `inner` with an XOR transform using `key`.
    pub fn xor(inner: F, key: u8) -> Self {
        Self::new(inner, XorTransform::new(key))
    }
}

impl<F: FileSystem, T: ByteTransform> TransformedFileSystem<F, T> {
    pub fn new(inner: F, transform: T) -> Self {
        Self { inner, transform }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }
}

impl<F: FileSystem, T: ByteTransform> FileSystem for TransformedFileSystem<F, T> {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let reader = self.inner.open(path)?;
        Ok(Box::new(TransformReader::new(reader, self.transform.clone())))
    }

    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>> {
        let writer = self.inner.create(path)?;
        Ok(Box::new(TransformWriter::new(writer, self.transform.clone())))
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
