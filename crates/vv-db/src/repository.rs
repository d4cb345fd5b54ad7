//! The repository contract shared by both backends.

use std::io::Read;
use std::sync::Arc;

use vv_core::config::{Config, RepositoryBackend};
use vv_core::{Result, Video, VideoFilter};
use vv_storage::{join_path, FileSystem};

use crate::json::JsonVideoRepository;
use crate::sqlite::SqliteVideoRepository;

/// CRUD, filtered listing and upload over [`Video`] records.
///
/// Implementations must tolerate concurrent calls from many threads.
pub trait VideoRepository: Send + Sync {
    /// Insert an unsaved video (assigning its ID and both timestamps) or
    /// update an existing one (stamping `time_updated`). Returns the
    /// persisted record.
    ///
    /// Updating an ID that does not exist is [`vv_core::Error::NotFound`].
    fn save(&self, video: Video) -> Result<Video>;

    /// Fetch one video. Unknown and deleted IDs are `NotFound`.
    fn find_by_id(&self, id: u64) -> Result<Video>;

    /// Filter, then sort, then window. An offset past the end yields an
    /// empty list. Pass `usize::MAX` for no limit.
    fn all(&self, filter: &VideoFilter, limit: usize, offset: usize) -> Result<Vec<Video>>;

    /// Number of videos `all` would return for `filter` without a window.
    fn count(&self, filter: &VideoFilter) -> Result<usize>;

    /// Remove the video's metadata, then best-effort remove its source and
    /// thumbnail blobs. Blob removal happens even when the metadata delete
    /// fails.
    fn delete(&self, video: &Video) -> Result<()>;

    /// Storage holding the blobs this repository points at.
    fn storage(&self) -> &Arc<dyn FileSystem>;

    /// Release backend resources. Calls after `close` may fail.
    fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Store a new video and its blob.
    ///
    /// Saves the metadata first to obtain an ID, streams `blob` to
    /// `<id>/video<ext>` and saves again with `source` set. No thumbnail is
    /// generated here.
    fn upload(&self, video: Video, blob: &mut dyn Read) -> Result<Video> {
        let mut video = self.save(Video {
            id: 0,
            thumbnail: String::new(),
            source: String::new(),
            ..video
        })?;

        let dir = video.id.to_string();
        let path = join_path(&dir, &format!("video{}", video.original_extension()));

        self.storage().mkdir_all(&dir)?;
        let bytes = self.storage().pipe_to(&path, blob)?;
        tracing::info!(video_id = video.id, path = %path, bytes, "stored upload");

        video.source = path;
        self.save(video)
    }
}

/// Best-effort removal of a video's blobs. Failures are logged, never
/// returned.
pub(crate) fn remove_blobs(fs: &dyn FileSystem, video: &Video) {
    for path in [&video.source, &video.thumbnail] {
        if path.is_empty() {
            continue;
        }
        match fs.remove(path) {
            Ok(()) => tracing::debug!(video_id = video.id, path = %path, "removed blob"),
            Err(e) => {
                tracing::warn!(video_id = video.id, path = %path, error = %e, "failed to remove blob")
            }
        }
    }
}

/// Open the backend selected by configuration.
pub fn open_repository(
    config: &Config,
    storage: Arc<dyn FileSystem>,
) -> Result<Arc<dyn VideoRepository>> {
    let repo: Arc<dyn VideoRepository> = match config.repository.backend {
        RepositoryBackend::Json => Arc::new(JsonVideoRepository::open(
            storage,
            &config.repository.json_file,
        )?),
        RepositoryBackend::Sqlite => Arc::new(SqliteVideoRepository::open(
            &config.repository.sqlite_path,
            storage,
        )?),
    };

    tracing::info!(backend = ?config.repository.backend, "opened video repository");
    Ok(repo)
}
