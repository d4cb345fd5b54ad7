//! Shared test harness for integration tests.
//!
//! [`TestHarness`] builds a [`MediaLibrary`] over a temp storage root, a
//! repository of the requested backend and a stand-in ffmpeg script, so the
//! media jobs run end to end without real media tools.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use vidvault::MediaLibrary;
use vv_av::ToolRegistry;
use vv_core::config::{Config, RepositoryBackend};
use vv_core::Video;
use vv_db::{JsonVideoRepository, SqliteVideoRepository, VideoRepository};

/// Copies input to output: `cat` for pipes, `cp` for files. Every call
/// appends its input argument to `calls` beside the script.
pub const COPYING_FFMPEG: &str = r#"#!/bin/sh
for last in "$@"; do :; done
printf '%s\n' "$2" >> "$(dirname "$0")/calls"
if [ "$2" = "-" ]; then exec cat; else exec cp "$2" "$last"; fi
"#;

/// Rejects piped input the way ffmpeg does for an MP4 with a trailing moov
/// atom, but copies real files.
pub const PIPE_FAILING_FFMPEG: &str = r#"#!/bin/sh
for last in "$@"; do :; done
printf '%s\n' "$2" >> "$(dirname "$0")/calls"
if [ "$2" = "-" ]; then
  cat >/dev/null 2>&1
  echo "moov atom not found" >&2
  exit 1
fi
exec cp "$2" "$last"
"#;

/// Fails on every input.
pub const FAILING_FFMPEG: &str = r#"#!/bin/sh
printf '%s\n' "$2" >> "$(dirname "$0")/calls"
cat >/dev/null 2>&1
echo "Invalid data found when processing input" >&2
exit 1
"#;

pub struct TestHarness {
    pub library: MediaLibrary,
    pub dir: TempDir,
}

impl TestHarness {
    /// JSON backend with a copying ffmpeg.
    pub fn new() -> Self {
        Self::with(RepositoryBackend::Json, COPYING_FFMPEG)
    }

    pub fn with(backend: RepositoryBackend, ffmpeg_script: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        let mut config = Config::default();
        config.storage.root_dir = dir.path().join("videos");
        config.repository.backend = backend;
        config.repository.sqlite_path = dir.path().join("vidvault.db");

        let storage = vv_storage::open_local(&config.storage.root_dir, config.storage.key)
            .expect("failed to open storage");
        let repo: Arc<dyn VideoRepository> = match backend {
            RepositoryBackend::Json => Arc::new(
                JsonVideoRepository::open(Arc::clone(&storage), &config.repository.json_file)
                    .expect("failed to open json repository"),
            ),
            RepositoryBackend::Sqlite => Arc::new(
                SqliteVideoRepository::open(&config.repository.sqlite_path, Arc::clone(&storage))
                    .expect("failed to open sqlite repository"),
            ),
        };

        let script = dir.path().join("bin").join("ffmpeg");
        fs::create_dir_all(script.parent().unwrap()).unwrap();
        fs::write(&script, ffmpeg_script).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let tools = ToolRegistry::default().with_tool("ffmpeg", &script);

        let library = MediaLibrary::from_parts(config, storage, repo, tools);
        Self { library, dir }
    }

    /// Store a video without triggering a background thumbnail.
    pub fn seed(&self, title: &str, file_name: &str, content: &[u8]) -> Video {
        let video = Video {
            title: title.to_string(),
            original_file_name: file_name.to_string(),
            ..Video::default()
        };
        self.library
            .repo
            .upload(video, &mut &content[..])
            .expect("upload failed")
    }

    /// Decoded content of a stored file.
    pub fn read_blob(&self, path: &str) -> Vec<u8> {
        let mut reader = self.library.storage.open(path).expect("open blob");
        let mut buf = Vec::new();
        std::io::Read::read_to_end(&mut reader, &mut buf).unwrap();
        buf
    }

    /// Raw on-disk bytes of a stored file.
    pub fn raw_blob(&self, path: &str) -> Vec<u8> {
        fs::read(self.library.config.storage.root_dir.join(path)).unwrap()
    }

    /// Input arguments the fake ffmpeg saw, in call order.
    pub fn ffmpeg_calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("bin").join("calls"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn script_dir(&self) -> PathBuf {
        self.dir.path().join("bin")
    }
}

/// Poll `f` until it returns `Some` or `timeout` passes.
pub fn wait_for<T>(timeout: Duration, mut f: impl FnMut() -> Option<T>) -> Option<T> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(v) = f() {
            return Some(v);
        }
        if Instant::now() >= deadline {
            return None;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

/// Workspace directories in the system temp dir whose name starts with `prefix`.
pub fn leftover_workspaces(prefix: &str) -> Vec<PathBuf> {
    fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| is_workspace(p, prefix))
                .collect()
        })
        .unwrap_or_default()
}

fn is_workspace(path: &Path, prefix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with(prefix))
        .unwrap_or(false)
}
