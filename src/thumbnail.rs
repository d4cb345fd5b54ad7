//! Thumbnail generation.
//!
//! The blob is first piped straight from storage through ffmpeg and back
//! into storage. Containers ffmpeg cannot read from a pipe make that fail;
//! the fallback copies the blob into a local temp dir, runs ffmpeg on real
//! files and uploads the result. The temp dir is removed either way.

use std::io::Write;
use std::path::Path;

use vv_av::{extract_frame_file, extract_frame_piped, Workspace};
use vv_core::{Error, Result, Video};
use vv_storage::{join_path, parent_dir};

use crate::blob;
use crate::context::MediaLibrary;

/// Storage path of the thumbnail for a video whose blob is at `source`.
pub fn thumbnail_path(source: &str, file_name: &str) -> String {
    join_path(parent_dir(source), file_name)
}

/// Extract a thumbnail for video `id`, store it beside the source and save
/// the record with the new thumbnail path.
///
/// Fails only if both the piped and the file strategy fail; the error then
/// carries both causes. The record is left untouched on failure.
pub fn generate_thumbnail(library: &MediaLibrary, id: u64) -> Result<Video> {
    let mut video = library.repo.find_by_id(id)?;
    if video.source.is_empty() {
        return Err(Error::internal(format!("video {id} has no source blob")));
    }

    let ffmpeg = library.tools.ffmpeg()?;
    let width = library.config.thumbnail.width;
    let target = thumbnail_path(&video.source, &library.config.thumbnail.file_name);

    if let Err(pipe_err) = thumbnail_piped(library, ffmpeg, width, &video.source, &target) {
        tracing::warn!(
            video_id = id,
            error = %pipe_err,
            "piped thumbnail failed, falling back to temp file"
        );
        if let Err(temp_err) =
            thumbnail_from_file(library, ffmpeg, width, id, &video.source, &target)
        {
            tracing::error!(video_id = id, error = %temp_err, "thumbnail fallback failed");
            return Err(Error::external(
                "ffmpeg",
                format!("pipe: {pipe_err}; temp: {temp_err}"),
            ));
        }
    }

    video.thumbnail = target;
    let video = library.repo.save(video)?;
    tracing::info!(video_id = id, thumbnail = %video.thumbnail, "generated thumbnail");
    Ok(video)
}

fn thumbnail_piped(
    library: &MediaLibrary,
    ffmpeg: &Path,
    width: u32,
    source: &str,
    target: &str,
) -> Result<()> {
    let mut input = library.storage.open(source)?;
    let mut output = library.storage.create(target)?;
    extract_frame_piped(ffmpeg, width, &mut *input, &mut *output)?;
    output.flush().map_err(|e| Error::io("close", target, e))
}

fn thumbnail_from_file(
    library: &MediaLibrary,
    ffmpeg: &Path,
    width: u32,
    id: u64,
    source: &str,
    target: &str,
) -> Result<()> {
    let workspace = Workspace::new(&format!("vidvault-thumbnail-{id}-"))?;
    let result = (|| -> Result<()> {
        let local_in = workspace.file(blob::file_name(source));
        let local_out = workspace.file(blob::file_name(target));
        blob::download(library.storage.as_ref(), source, &local_in)?;
        extract_frame_file(ffmpeg, width, &local_in, &local_out)?;
        blob::upload(library.storage.as_ref(), &local_out, target)?;
        Ok(())
    })();
    workspace.close();
    result
}

/// Generate a thumbnail in the background. Failures are logged.
///
/// Uses the blocking pool of the current tokio runtime when there is one,
/// a plain thread otherwise.
pub fn spawn_thumbnail(library: MediaLibrary, id: u64) {
    let job = move || {
        if let Err(e) = generate_thumbnail(&library, id) {
            tracing::warn!(video_id = id, error = %e, "background thumbnail failed");
        }
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(job);
        }
        Err(_) => {
            if let Err(e) = std::thread::Builder::new()
                .name(format!("thumbnail-{id}"))
                .spawn(job)
            {
                tracing::error!(video_id = id, error = %e, "failed to start thumbnail thread");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_sits_beside_source() {
        assert_eq!(thumbnail_path("4/video.mkv", "thumbnail.jpg"), "4/thumbnail.jpg");
        assert_eq!(thumbnail_path("video.mkv", "thumbnail.jpg"), "thumbnail.jpg");
    }
}
