//! Drive the ffmpeg wrappers with a stand-in shell script.
//!
//! The script copies its input to its output (`cat` for pipes, `cp` for
//! files), which is enough to check argument wiring and data flow.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use serial_test::serial;
use vv_av::{extract_frame_file, extract_frame_piped, transcode_file, Error};
use vv_core::config::TranscodeConfig;

const COPYING_FFMPEG: &str = r#"#!/bin/sh
for last in "$@"; do :; done
printf '%s\n' "$*" > "$(dirname "$0")/last-args"
if [ "$2" = "-" ]; then exec cat; else exec cp "$2" "$last"; fi
"#;

const FAILING_FFMPEG: &str = r#"#!/bin/sh
cat >/dev/null 2>&1
echo "moov atom not found" >&2
exit 1
"#;

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("ffmpeg");
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn last_args(dir: &Path) -> String {
    fs::read_to_string(dir.join("last-args")).unwrap().trim().to_string()
}

#[test]
#[serial]
fn piped_frame_streams_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let ffmpeg = write_script(dir.path(), COPYING_FFMPEG);

    let input = b"not really a video".to_vec();
    let mut out = Vec::new();
    let n = extract_frame_piped(&ffmpeg, 320, &mut input.as_slice(), &mut out).unwrap();

    assert_eq!(n, input.len() as u64);
    assert_eq!(out, input);
    assert_eq!(
        last_args(dir.path()),
        "-i - -vf thumbnail,scale=320:-1 -frames:v 1 -f singlejpeg -"
    );
}

#[test]
#[serial]
fn file_frame_uses_paths() {
    let dir = tempfile::tempdir().unwrap();
    let ffmpeg = write_script(dir.path(), COPYING_FFMPEG);
    let input = dir.path().join("input");
    let output = dir.path().join("thumbnail.jpg");
    fs::write(&input, b"frame").unwrap();

    extract_frame_file(&ffmpeg, 640, &input, &output).unwrap();

    assert_eq!(fs::read(&output).unwrap(), b"frame");
    assert!(last_args(dir.path()).starts_with(&format!("-i {}", input.display())));
}

#[test]
#[serial]
fn transcode_uses_configured_codecs() {
    let dir = tempfile::tempdir().unwrap();
    let ffmpeg = write_script(dir.path(), COPYING_FFMPEG);
    let input = dir.path().join("video.mkv");
    let output = dir.path().join("transcoded.mp4");
    fs::write(&input, b"mkv bytes").unwrap();

    let config = TranscodeConfig {
        video_codec: "libx264".into(),
        ..TranscodeConfig::default()
    };
    transcode_file(&ffmpeg, &config, &input, &output).unwrap();

    assert_eq!(fs::read(&output).unwrap(), b"mkv bytes");
    assert!(last_args(dir.path()).contains("-vcodec libx264 -acodec aac -strict -2"));
}

#[test]
#[serial]
fn failures_carry_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let ffmpeg = write_script(dir.path(), FAILING_FFMPEG);

    let mut out = Vec::new();
    let err = extract_frame_piped(&ffmpeg, 640, &mut &b"x"[..], &mut out).unwrap_err();
    assert_matches!(err, Error::ToolFailed { ref message, .. } if message.contains("moov atom"));

    let core: vv_core::Error = err.into();
    assert_matches!(core, vv_core::Error::ExternalProcess { .. });
}
