//! Transcode job: re-encode a video's blob and point the record at the result.

use vv_av::{transcode_file, Workspace};
use vv_core::{Result, Video};
use vv_storage::{join_path, parent_dir};

use crate::blob;
use crate::context::MediaLibrary;

/// Transcode video `id` and store the derivative beside its source.
///
/// The record is fetched twice: once to find the source, and again after
/// the (slow) transcode so that only `source` is written onto the freshest
/// copy. Changes to `source` made by others in between are still
/// overwritten.
pub fn transcode_video(library: &MediaLibrary, id: u64) -> Result<Video> {
    let video = library.repo.find_by_id(id)?;
    let ffmpeg = library.tools.ffmpeg()?;
    let config = &library.config.transcode;
    let target = join_path(parent_dir(&video.source), &config.file_name);

    tracing::info!(video_id = id, source = %video.source, "transcoding video");

    let workspace = Workspace::new(&format!("vidvault-transcode-{id}-"))?;
    let result = (|| -> Result<u64> {
        let local_in = workspace.file(&format!("original-{}", blob::file_name(&video.source)));
        let local_out = workspace.file(&config.file_name);
        blob::download(library.storage.as_ref(), &video.source, &local_in)?;
        transcode_file(ffmpeg, config, &local_in, &local_out)?;
        blob::upload(library.storage.as_ref(), &local_out, &target)
    })();
    workspace.close();
    let bytes = result?;

    let mut fresh = library.repo.find_by_id(id)?;
    fresh.source = target;
    let saved = library.repo.save(fresh)?;

    tracing::info!(video_id = id, source = %saved.source, bytes, "transcode complete");
    Ok(saved)
}
