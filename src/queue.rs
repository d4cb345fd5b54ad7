//! Single-worker transcode queue.
//!
//! One spawned task owns the receiving end and runs transcodes strictly one
//! at a time in submission order, for as long as any [`TranscodeQueue`]
//! handle is alive. Submitting is a rendezvous: [`TranscodeQueue::submit`]
//! returns only once the worker has taken the job, so callers queue up
//! behind a busy worker instead of filling a buffer.
//!
//! Job failures are logged and dropped. Nothing is reported back to the
//! submitter, there are no retries and a hung ffmpeg blocks every later job.
//!
//! # Example
//!
//! ```rust,ignore
//! let queue = TranscodeQueue::start(library.clone());
//! queue.submit(video.id).await?;
//! ```

use anyhow::Result;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::context::MediaLibrary;
use crate::transcode::transcode_video;

/// A submitted video ID and the signal the worker fires when it takes it.
type Job = (u64, oneshot::Sender<()>);

/// Handle to the transcode worker. Cloning shares the same worker.
#[derive(Clone)]
pub struct TranscodeQueue {
    sender: mpsc::Sender<Job>,
}

impl TranscodeQueue {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(library: MediaLibrary) -> Self {
        let (sender, receiver) = mpsc::channel(1);
        tokio::spawn(process_jobs(receiver, library));
        Self { sender }
    }

    /// Hand `id` to the worker, waiting until it is ready to take it.
    ///
    /// Returns an error only if the worker has stopped.
    pub async fn submit(&self, id: u64) -> Result<()> {
        info!(video_id = id, "submitting transcode job");

        let (taken_tx, taken_rx) = oneshot::channel();
        self.sender
            .send((id, taken_tx))
            .await
            .map_err(|_| anyhow::anyhow!("Transcode queue is closed"))?;
        taken_rx
            .await
            .map_err(|_| anyhow::anyhow!("Transcode worker dropped job {id}"))?;

        Ok(())
    }

    /// [`submit`](Self::submit) for synchronous callers.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async context.
    pub fn submit_blocking(&self, id: u64) -> Result<()> {
        info!(video_id = id, "submitting transcode job");

        let (taken_tx, taken_rx) = oneshot::channel();
        self.sender
            .blocking_send((id, taken_tx))
            .map_err(|_| anyhow::anyhow!("Transcode queue is closed"))?;
        taken_rx
            .blocking_recv()
            .map_err(|_| anyhow::anyhow!("Transcode worker dropped job {id}"))?;

        Ok(())
    }
}

/// Worker loop: take a job, acknowledge it, run it to completion, repeat.
async fn process_jobs(mut receiver: mpsc::Receiver<Job>, library: MediaLibrary) {
    info!("Transcode queue worker started");

    while let Some((id, taken)) = receiver.recv().await {
        let _ = taken.send(());

        let lib = library.clone();
        match tokio::task::spawn_blocking(move || transcode_video(&lib, id)).await {
            Ok(Ok(video)) => info!(video_id = id, source = %video.source, "transcode job finished"),
            Ok(Err(e)) => warn!(video_id = id, error = %e, "transcode job failed"),
            Err(e) => error!(video_id = id, error = %e, "transcode job panicked"),
        }
    }

    info!("Transcode queue worker stopped");
}
