//! Scratch directories for tool runs that need real file paths.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Error, Result};

/// A temporary directory removed when the workspace is dropped or closed,
/// whether or not the work inside it succeeded.
///
/// ```no_run
/// use vv_av::Workspace;
///
/// let ws = Workspace::new("vidvault-thumbnail-3").unwrap();
/// let input = ws.file("input");
/// // ... write input, run a tool, read ws.file("thumbnail.jpg") ...
/// ws.close();
/// ```
#[derive(Debug)]
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    /// Create a new temp dir whose name starts with `prefix`.
    pub fn new(prefix: &str) -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|e| Error::io("tempdir", std::env::temp_dir(), e))?;
        Ok(Self { temp_dir })
    }

    /// Path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path for a named file inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Remove the directory now, logging (not returning) a failure.
    pub fn close(self) {
        let path = self.temp_dir.path().to_path_buf();
        if let Err(e) = self.temp_dir.close() {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove workspace");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn files_live_inside_workspace() {
        let ws = Workspace::new("vv-test-").unwrap();
        let f = ws.file("input");
        assert!(f.starts_with(ws.path()));
        assert!(ws
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("vv-test-"));
    }

    #[test]
    fn close_removes_contents() {
        let ws = Workspace::new("vv-test-").unwrap();
        let dir = ws.path().to_path_buf();
        fs::write(ws.file("a"), b"x").unwrap();
        ws.close();
        assert!(!dir.exists());
    }

    #[test]
    fn drop_removes_directory() {
        let dir = {
            let ws = Workspace::new("vv-test-").unwrap();
            fs::write(ws.file("a"), b"x").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!dir.exists());
    }
}
