//! Plain on-disk filesystem rooted at a directory.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};

use vv_core::{Error, Result};

use crate::fs::{FileSystem, Metadata};

/// Local directory tree. Every relative path resolves under `root`; `..`
/// components never climb above it and absolute paths are re-rooted.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    /// Open (creating if needed) a local root directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| Error::io("mkdir", root.display().to_string(), e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a storage path to its on-disk location.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        let mut depth = 0usize;
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::ParentDir if depth > 0 => {
                    resolved.pop();
                    depth -= 1;
                }
                _ => {}
            }
        }
        resolved
    }
}

impl FileSystem for LocalFileSystem {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let file = File::open(self.resolve(path)).map_err(|e| Error::io("open", path, e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>> {
        let file = File::create(self.resolve(path)).map_err(|e| Error::io("create", path, e))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn mkdir_all(&self, path: &str) -> Result<()> {
        fs::create_dir_all(self.resolve(path)).map_err(|e| Error::io("mkdir", path, e))
    }

    fn stat(&self, path: &str) -> Result<Metadata> {
        let meta = fs::metadata(self.resolve(path)).map_err(|e| Error::io("stat", path, e))?;
        Ok(Metadata {
            len: meta.len(),
            is_dir: meta.is_dir(),
            modified: meta.modified().ok(),
        })
    }

    fn remove(&self, path: &str) -> Result<()> {
        let full = self.resolve(path);
        let meta = fs::symlink_metadata(&full).map_err(|e| Error::io("remove", path, e))?;
        let result = if meta.is_dir() {
            fs::remove_dir(&full)
        } else {
            fs::remove_file(&full)
        };
        result.map_err(|e| Error::io("remove", path, e))
    }
}
