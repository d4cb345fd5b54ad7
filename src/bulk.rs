//! Synchronous bulk runs over one, several or all videos.

use serde::Serialize;
use vv_core::{Result, Video, VideoFilter};

use crate::context::MediaLibrary;
use crate::thumbnail::generate_thumbnail;
use crate::transcode::transcode_video;

/// Page size used when walking every video.
const PAGE_SIZE: usize = 100;

/// Which videos a bulk run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Ids(Vec<u64>),
}

/// Outcome of a bulk run.
#[derive(Debug, Default, Serialize)]
pub struct BulkSummary {
    pub succeeded: Vec<u64>,
    pub failed: Vec<(u64, String)>,
}

impl BulkSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Regenerate thumbnails one video at a time.
pub fn regenerate_thumbnails(library: &MediaLibrary, selection: &Selection) -> Result<BulkSummary> {
    run(library, selection, "thumbnail", generate_thumbnail)
}

/// Transcode videos one at a time, bypassing the queue.
pub fn transcode_videos(library: &MediaLibrary, selection: &Selection) -> Result<BulkSummary> {
    run(library, selection, "transcode", transcode_video)
}

fn run(
    library: &MediaLibrary,
    selection: &Selection,
    job: &'static str,
    f: impl Fn(&MediaLibrary, u64) -> Result<Video>,
) -> Result<BulkSummary> {
    let mut summary = BulkSummary::default();
    let mut process = |id: u64| match f(library, id) {
        Ok(_) => {
            tracing::info!(video_id = id, job, "done");
            summary.succeeded.push(id);
        }
        Err(e) => {
            tracing::warn!(video_id = id, job, error = %e, "failed");
            summary.failed.push((id, e.to_string()));
        }
    };

    match selection {
        Selection::Ids(ids) => ids.iter().copied().for_each(&mut process),
        Selection::All => {
            let filter = VideoFilter::default();
            let mut offset = 0;
            loop {
                let page = library.repo.all(&filter, PAGE_SIZE, offset)?;
                if page.is_empty() {
                    break;
                }
                offset += page.len();
                page.iter().map(|v| v.id).for_each(&mut process);
            }
        }
    }

    tracing::info!(
        job,
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "bulk run finished"
    );
    Ok(summary)
}
