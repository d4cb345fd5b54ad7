//! Codec normalization with ffmpeg.

use std::path::Path;

use vv_core::config::TranscodeConfig;

use crate::command::ToolCommand;
use crate::error::Result;

/// ffmpeg arguments for re-encoding `input` into `output`.
pub fn transcode_args(input: &str, output: &str, video_codec: &str, audio_codec: &str) -> Vec<String> {
    [
        "-i",
        input,
        "-vcodec",
        video_codec,
        "-acodec",
        audio_codec,
        "-strict",
        "-2",
        output,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Re-encode the file at `input` into `output` with the configured codecs.
pub fn transcode_file(
    ffmpeg: &Path,
    config: &TranscodeConfig,
    input: &Path,
    output: &Path,
) -> Result<()> {
    ToolCommand::new(ffmpeg.to_path_buf())
        .args(transcode_args(
            &input.to_string_lossy(),
            &output.to_string_lossy(),
            &config.video_codec,
            &config.audio_codec,
        ))
        .execute()?;
    Ok(())
}
