//! Relational backend on SQLite.
//!
//! Each call is a single statement on a pooled connection; there is no
//! cross-statement transaction, so concurrent updates of one row are
//! last-write-wins. Deletes are hard row deletes.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use vv_core::video::rfc3339_or_empty;
use vv_core::{video, Error, Result, Video, VideoFilter};
use vv_storage::FileSystem;

use crate::pool::{self, DbPool, PooledConnection};
use crate::queries::videos;
use crate::repository::{remove_blobs, VideoRepository};

pub struct SqliteVideoRepository {
    pool: RwLock<Option<DbPool>>,
    storage: Arc<dyn FileSystem>,
}

impl SqliteVideoRepository {
    /// Open (creating and migrating) the database at `db_path`.
    pub fn open(db_path: &Path, storage: Arc<dyn FileSystem>) -> Result<Self> {
        let pool = pool::init_pool(db_path)?;
        tracing::info!(path = %db_path.display(), "opened SQLite video repository");
        Ok(Self::with_pool(pool, storage))
    }

    /// Use an existing pool, e.g. from [`pool::init_memory_pool`].
    pub fn with_pool(pool: DbPool, storage: Arc<dyn FileSystem>) -> Self {
        Self {
            pool: RwLock::new(Some(pool)),
            storage,
        }
    }

    fn conn(&self) -> Result<PooledConnection> {
        match self.pool.read().as_ref() {
            Some(pool) => pool::get_conn(pool),
            None => Err(Error::database("repository is closed")),
        }
    }
}

impl VideoRepository for SqliteVideoRepository {
    fn save(&self, mut video: Video) -> Result<Video> {
        let conn = self.conn()?;
        let now = video::now();
        video.time_updated = Some(now);

        if !video.exists() {
            video.time_created = Some(now);
            video.id = videos::insert_video(&conn, &video)?;
            tracing::debug!(video_id = video.id, "created video");
            return Ok(video);
        }

        let created = videos::update_video(&conn, &video)?
            .ok_or_else(|| Error::video_not_found(video.id))?;
        video.time_created = rfc3339_or_empty::parse(&created)
            .map_err(|e| Error::database(format!("bad time_created for video {}: {e}", video.id)))?;

        tracing::debug!(video_id = video.id, "updated video");
        Ok(video)
    }

    fn find_by_id(&self, id: u64) -> Result<Video> {
        let conn = self.conn()?;
        videos::get_video(&conn, id)?.ok_or_else(|| Error::video_not_found(id))
    }

    fn all(&self, filter: &VideoFilter, limit: usize, offset: usize) -> Result<Vec<Video>> {
        let conn = self.conn()?;
        videos::list_videos(&conn, filter, limit, offset)
    }

    fn count(&self, filter: &VideoFilter) -> Result<usize> {
        filter.sort()?;
        let conn = self.conn()?;
        videos::count_videos(&conn, filter)
    }

    fn delete(&self, video: &Video) -> Result<()> {
        let result = self.conn().and_then(|conn| {
            videos::delete_video(&conn, video.id)?.ok_or_else(|| Error::video_not_found(video.id))
        });

        match &result {
            Ok((source, thumbnail)) => {
                tracing::info!(video_id = video.id, "deleted video");
                let stored = Video {
                    id: video.id,
                    source: source.clone(),
                    thumbnail: thumbnail.clone(),
                    ..Video::default()
                };
                remove_blobs(self.storage.as_ref(), &stored);
            }
            Err(e) => {
                tracing::warn!(video_id = video.id, error = %e, "video metadata delete failed");
                remove_blobs(self.storage.as_ref(), video);
            }
        }

        result.map(|_| ())
    }

    fn storage(&self) -> &Arc<dyn FileSystem> {
        &self.storage
    }

    fn close(&self) -> Result<()> {
        if self.pool.write().take().is_some() {
            tracing::info!("closed SQLite video repository");
        }
        Ok(())
    }
}
