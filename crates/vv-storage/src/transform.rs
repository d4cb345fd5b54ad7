//! Reversible per-byte transforms and the stream adapters that apply them.

use std::io::{self, Read, Write};

/// A reversible, position-independent byte transform.
///
/// Applying the transform twice must reproduce the input, and the result for
/// a byte must not depend on where in the stream it appears: readers and
/// writers transform whatever chunk sizes the underlying I/O hands them.
pub trait ByteTransform: Clone + Send + Sync + 'static {
    /// Transform `buf` in place.
    fn apply(&self, buf: &mut [u8]);
}

/// XOR every byte with a fixed key.
///
/// Obfuscation only. This is not encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorTransform {
    key: u8,
}

impl XorTransform {
    pub fn new(key: u8) -> Self {
        Self { key }
    }

    pub fn key(&self) -> u8 {
        self.key
    }
}

impl Default for XorTransform {
    fn default() -> Self {
        Self::new(vv_core::config::DEFAULT_STORAGE_KEY)
    }
}

impl ByteTransform for XorTransform {
    fn apply(&self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b ^= self.key;
        }
    }
}

/// Return a transformed copy of `data`.
///
/// ```
/// use vv_storage::{transform_bytes, XorTransform};
///
/// let t = XorTransform::new(0x69);
/// let hidden = transform_bytes(b"dead", &t);
/// assert_eq!(hidden, vec![0x0d, 0x0c, 0x08, 0x0d]);
/// assert_eq!(transform_bytes(&hidden, &t), b"dead");
/// ```
pub fn transform_bytes<T: ByteTransform>(data: &[u8], transform: &T) -> Vec<u8> {
    let mut out = data.to_vec();
    transform.apply(&mut out);
    out
}

/// Reader that transforms every byte it yields.
pub struct TransformReader<R, T> {
    inner: R,
    transform: T,
}

impl<R: Read, T: ByteTransform> TransformReader<R, T> {
    pub fn new(inner: R, transform: T) -> Self {
        Self { inner, transform }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, T: ByteTransform> Read for TransformReader<R, T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.transform.apply(&mut buf[..n]);
        Ok(n)
    }
}

/// Writer that transforms every byte before passing it on.
///
/// The caller's slice is never modified; bytes are copied into a scratch
/// buffer that is reused across writes.
pub struct TransformWriter<W, T> {
    inner: W,
    transform: T,
    scratch: Vec<u8>,
}

impl<W: Write, T: ByteTransform> TransformWriter<W, T> {
    pub fn new(inner: W, transform: T) -> Self {
        Self {
            inner,
            transform,
            scratch: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write, T: ByteTransform> Write for TransformWriter<W, T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.scratch.clear();
        self.scratch.extend_from_slice(buf);
        self.transform.apply(&mut self.scratch);
        // A short write leaves the tail untransformed in the caller's buffer;
        // it will be handed back to us and transformed again on retry.
        self.inner.write(&self.scratch)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
