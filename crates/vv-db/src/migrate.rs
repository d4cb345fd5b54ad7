//! Copy records out of a flat-file repository into another backend.

use vv_core::{Result, Video, VideoFilter};

use crate::repository::VideoRepository;

/// Re-insert every live record of `source` into `target` as a new video.
///
/// IDs and timestamps are reassigned by `target`. Blob paths are copied as
/// they are, so both repositories must share one storage root. Returns
/// `(old_id, new_id)` pairs in source order. Stops at the first failed save.
pub fn migrate_json_to(
    source: &dyn VideoRepository,
    target: &dyn VideoRepository,
) -> Result<Vec<(u64, u64)>> {
    let videos = source.all(&VideoFilter::default(), usize::MAX, 0)?;
    let mut mapping = Vec::with_capacity(videos.len());

    for video in videos {
        let old_id = video.id;
        let saved = target.save(Video { id: 0, ..video })?;
        tracing::info!(old_id, new_id = saved.id, title = %saved.title, "migrated video");
        mapping.push((old_id, saved.id));
    }

    Ok(mapping)
}
