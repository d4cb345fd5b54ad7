//! Single-frame extraction with ffmpeg.
//!
//! Both modes use the same filter chain: pick a representative frame, scale
//! it to the requested width keeping the aspect ratio, emit one JPEG.
//! Input and output are either `-` (the process's stdio) or file paths.

use std::io::{Read, Write};
use std::path::Path;

use crate::command::ToolCommand;
use crate::error::Result;

/// ffmpeg arguments for extracting one frame from `input` into `output`.
///
/// ```
/// let args = vv_av::frame::frame_args("-", "-", 640);
/// assert_eq!(
///     args.join(" "),
///     "-i - -vf thumbnail,scale=640:-1 -frames:v 1 -f singlejpeg -"
/// );
/// ```
pub fn frame_args(input: &str, output: &str, width: u32) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string(),
        "-vf".to_string(),
        format!("thumbnail,scale={width}:-1"),
        "-frames:v".to_string(),
        "1".to_string(),
        "-f".to_string(),
        "singlejpeg".to_string(),
        output.to_string(),
    ]
}

/// Pipe `input` through ffmpeg and write the JPEG to `output`.
///
/// Some containers (e.g. MP4 with the index at the end) cannot be decoded
/// from a non-seekable pipe; those fail here and need
/// [`extract_frame_file`].
pub fn extract_frame_piped(
    ffmpeg: &Path,
    width: u32,
    input: &mut (dyn Read + Send),
    output: &mut dyn Write,
) -> Result<u64> {
    ToolCommand::new(ffmpeg.to_path_buf())
        .args(frame_args("-", "-", width))
        .stream(input, output)
}

/// Extract a frame from the file at `input` into the file at `output`.
pub fn extract_frame_file(ffmpeg: &Path, width: u32, input: &Path, output: &Path) -> Result<()> {
    ToolCommand::new(ffmpeg.to_path_buf())
        .args(frame_args(
            &input.to_string_lossy(),
            &output.to_string_lossy(),
            width,
        ))
        .execute()?;
    Ok(())
}
