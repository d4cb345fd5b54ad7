//! The service object every consumer of the media engine is handed.
//!
//! [`MediaLibrary`] is constructed once at startup and cloned cheaply (every
//! field is an `Arc`). It owns the storage handle, the repository chosen by
//! configuration and the discovered tools.

use std::io::Read;
use std::sync::Arc;

use vv_av::ToolRegistry;
use vv_core::config::Config;
use vv_core::{Result, Video};
use vv_db::{open_repository, VideoRepository};
use vv_storage::FileSystem;

use crate::thumbnail;

#[derive(Clone)]
pub struct MediaLibrary {
    pub config: Arc<Config>,
    pub storage: Arc<dyn FileSystem>,
    pub repo: Arc<dyn VideoRepository>,
    pub tools: Arc<ToolRegistry>,
}

impl MediaLibrary {
    /// Open storage, the configured repository backend and tool discovery.
    pub fn open(config: Config) -> Result<Self> {
        let storage = vv_storage::open_local(&config.storage.root_dir, config.storage.key)?;
        let repo = open_repository(&config, Arc::clone(&storage))?;
        let tools = ToolRegistry::discover(&config.tools);

        for warning in config.validate() {
            tracing::warn!("{warning}");
        }

        Ok(Self::from_parts(config, storage, repo, tools))
    }

    /// Assemble from already-built parts.
    pub fn from_parts(
        config: Config,
        storage: Arc<dyn FileSystem>,
        repo: Arc<dyn VideoRepository>,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            repo,
            tools: Arc::new(tools),
        }
    }

    /// Upload a video and start generating its thumbnail in the background.
    ///
    /// Returns as soon as the blob is stored; the thumbnail shows up on the
    /// record later, or never if extraction fails.
    pub fn upload(&self, video: Video, blob: &mut dyn Read) -> Result<Video> {
        let video = self.repo.upload(video, blob)?;
        thumbnail::spawn_thumbnail(self.clone(), video.id);
        Ok(video)
    }

    /// Release the repository. Call once at shutdown.
    pub fn close(&self) -> Result<()> {
        self.repo.close()
    }
}
