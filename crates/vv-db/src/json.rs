//! Flat-file backend: every record lives in one JSON document in storage.
//!
//! Slot `i` of the document holds the video with ID `i + 1`. Deleting a
//! video zeroes its slot; slots are never reclaimed, so IDs are never reused
//! and the document only grows.
//!
//! Locking: ID allocation has its own mutex so it never waits on a document
//! rewrite. Mutations are serialized by a write mutex held across
//! modify-then-persist. Reads only take the collection's read lock briefly
//! and are not ordered against an in-flight persist.

use std::io::{Read, Write};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use vv_core::{video, Error, Result, Video, VideoFilter};
use vv_storage::{is_not_exist, FileSystem};

use crate::repository::{remove_blobs, VideoRepository};

pub struct JsonVideoRepository {
    storage: Arc<dyn FileSystem>,
    document: String,
    videos: RwLock<Vec<Video>>,
    last_id: Mutex<u64>,
    write_lock: Mutex<()>,
}

impl JsonVideoRepository {
    /// Load `document` from `storage`. A missing or unreadable document
    /// starts an empty corpus.
    pub fn open(storage: Arc<dyn FileSystem>, document: &str) -> Result<Self> {
        let videos = load(storage.as_ref(), document);
        let last_id = videos.len() as u64;

        tracing::info!(document, slots = videos.len(), "loaded JSON video document");

        Ok(Self {
            storage,
            document: document.to_string(),
            videos: RwLock::new(videos),
            last_id: Mutex::new(last_id),
            write_lock: Mutex::new(()),
        })
    }

    /// Number of slots in the document, deleted ones included.
    pub fn slot_count(&self) -> usize {
        self.videos.read().len()
    }

    fn next_id(&self) -> u64 {
        let mut last = self.last_id.lock();
        *last += 1;
        *last
    }

    /// Rewrite the whole document. Callers hold `write_lock`.
    fn persist(&self) -> Result<()> {
        let bytes = {
            let videos = self.videos.read();
            serde_json::to_vec(&*videos)?
        };

        let mut writer = self.storage.create(&self.document)?;
        writer
            .write_all(&bytes)
            .and_then(|()| writer.flush())
            .map_err(|e| Error::io("write", self.document.clone(), e))?;

        tracing::debug!(document = %self.document, bytes = bytes.len(), "persisted video document");
        Ok(())
    }
}

fn load(storage: &dyn FileSystem, document: &str) -> Vec<Video> {
    let mut reader = match storage.open(document) {
        Ok(r) => r,
        Err(e) if is_not_exist(&e) => {
            tracing::info!(document, "no video document yet, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(document, error = %e, "failed to open video document, starting empty");
            return Vec::new();
        }
    };

    let mut raw = Vec::new();
    if let Err(e) = reader.read_to_end(&mut raw) {
        tracing::warn!(document, error = %e, "failed to read video document, starting empty");
        return Vec::new();
    }

    match serde_json::from_slice::<Option<Vec<Video>>>(&raw) {
        Ok(videos) => videos.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(document, error = %e, "failed to decode video document, starting empty");
            Vec::new()
        }
    }
}

fn slot(id: u64) -> usize {
    (id as usize).wrapping_sub(1)
}

impl VideoRepository for JsonVideoRepository {
    fn save(&self, mut video: Video) -> Result<Video> {
        let now = video::now();

        if !video.exists() {
            video.id = self.next_id();
            video.time_created = Some(now);
            video.time_updated = Some(now);

            let _guard = self.write_lock.lock();
            let idx = slot(video.id);
            {
                let mut videos = self.videos.write();
                // A later ID can be inserted before an earlier one.
                if videos.len() <= idx {
                    videos.resize(idx + 1, Video::default());
                }
                videos[idx] = video.clone();
            }
            if let Err(e) = self.persist() {
                self.videos.write()[idx] = Video::default();
                return Err(e);
            }

            tracing::debug!(video_id = video.id, "created video");
            return Ok(video);
        }

        let _guard = self.write_lock.lock();
        let previous = {
            let mut videos = self.videos.write();
            let stored = videos
                .get_mut(slot(video.id))
                .filter(|v| v.exists())
                .ok_or_else(|| Error::video_not_found(video.id))?;

            video.time_created = stored.time_created;
            video.time_updated = Some(now);
            std::mem::replace(stored, video.clone())
        };
        if let Err(e) = self.persist() {
            self.videos.write()[slot(video.id)] = previous;
            return Err(e);
        }

        tracing::debug!(video_id = video.id, "updated video");
        Ok(video)
    }

    fn find_by_id(&self, id: u64) -> Result<Video> {
        self.videos
            .read()
            .get(slot(id))
            .filter(|v| v.exists())
            .cloned()
            .ok_or_else(|| Error::video_not_found(id))
    }

    fn all(&self, filter: &VideoFilter, limit: usize, offset: usize) -> Result<Vec<Video>> {
        filter.apply(&self.videos.read(), limit, offset)
    }

    fn count(&self, filter: &VideoFilter) -> Result<usize> {
        filter.sort()?;
        Ok(filter.count(&self.videos.read()))
    }

    fn delete(&self, video: &Video) -> Result<()> {
        let result = {
            let _guard = self.write_lock.lock();
            let removed = self
                .videos
                .write()
                .get_mut(slot(video.id))
                .filter(|v| v.exists())
                .map(std::mem::take);

            match removed {
                Some(stored) => self.persist().map(|()| stored),
                None => Err(Error::video_not_found(video.id)),
            }
        };

        match &result {
            Ok(stored) => {
                tracing::info!(video_id = video.id, "deleted video");
                remove_blobs(self.storage.as_ref(), stored);
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
}
