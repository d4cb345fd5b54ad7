//! The storage contract every backend and the media pipeline program against.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::SystemTime;

use vv_core::{Error, Result};

/// What `stat` reports about a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub len: u64,
    pub is_dir: bool,
    pub modified: Option<SystemTime>,
}

/// A filesystem addressed by paths relative to an opaque root.
///
/// Paths use `/` as the separator. Errors carry the operation and path that
/// failed; use [`is_not_exist`] to tell a missing path apart from every other
/// failure.
pub trait FileSystem: Send + Sync {
    /// Open a file for reading.
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>>;

    /// Create (or truncate) a file for writing.
    ///
    /// Callers must `flush` the writer to observe write errors; dropping it
    /// without flushing may lose buffered bytes silently.
    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>>;

    /// Create a directory and all missing parents.
    fn mkdir_all(&self, path: &str) -> Result<()>;

    fn stat(&self, path: &str) -> Result<Metadata>;

    /// Remove a file or an empty directory.
    fn remove(&self, path: &str) -> Result<()>;

    /// Whether `path` exists. Only "does not exist" maps to `false`; other
    /// stat failures are returned.
    fn exists(&self, path: &str) -> Result<bool> {
        match self.stat(path) {
            Ok(_) => Ok(true),
            Err(e) if is_not_exist(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create `path`, copy `reader` into it and flush. Returns bytes copied.
    fn pipe_to(&self, path: &str, reader: &mut dyn Read) -> Result<u64> {
        let mut writer = self.create(path)?;
        let copied = io::copy(reader, &mut writer).map_err(|e| Error::io("copy", path, e))?;
        writer.flush().map_err(|e| Error::io("close", path, e))?;
        Ok(copied)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for Arc<F> {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        (**self).open(path)
    }

    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>> {
        (**self).create(path)
    }

    fn mkdir_all(&self, path: &str) -> Result<()> {
        (**self).mkdir_all(path)
    }

    fn stat(&self, path: &str) -> Result<Metadata> {
        (**self).stat(path)
    }

    fn remove(&self, path: &str) -> Result<()> {
        (**self).remove(path)
    }

    fn exists(&self, path: &str) -> Result<bool> {
        (**self).exists(path)
    }

    fn pipe_to(&self, path: &str, reader: &mut dyn Read) -> Result<u64> {
        (**self).pipe_to(path, reader)
    }
}

/// Whether `err` means the path does not exist.
pub fn is_not_exist(err: &Error) -> bool {
    err.is_not_found()
}

/// Join two relative storage paths.
///
/// ```
/// use vv_storage::join_path;
///
/// assert_eq!(join_path("3", "video.mp4"), "3/video.mp4");
/// assert_eq!(join_path("", "videos.json"), "videos.json");
/// assert_eq!(join_path("3/", "thumbnail.jpg"), "3/thumbnail.jpg");
/// ```
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Directory part of a relative storage path, empty for a bare file name.
///
/// ```
/// use vv_storage::parent_dir;
///
/// assert_eq!(parent_dir("3/video.mp4"), "3");
/// assert_eq!(parent_dir("video.mp4"), "");
/// ```
pub fn parent_dir(path: &str) -> &str {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    }
}
