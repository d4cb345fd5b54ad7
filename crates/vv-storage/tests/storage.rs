use std::io::Read;

use assert_matches::assert_matches;
use vv_core::Error;
use vv_storage::{
    is_not_exist, open_local, FileSystem, IndexResolvingFs, LocalFileSystem,
    TransformedFileSystem,
};

fn read_all(fs: &dyn FileSystem, path: &str) -> Vec<u8> {
    let mut out = Vec::new();
    fs.open(path).unwrap().read_to_end(&mut out).unwrap();
    out
}

#[test]
fn stored_bytes_are_obfuscated_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let fs = TransformedFileSystem::xor(LocalFileSystem::new(dir.path()).unwrap(), 0x69);

    fs.pipe_to("dead.bin", &mut &b"dead"[..]).unwrap();

    let raw = std::fs::read(dir.path().join("dead.bin")).unwrap();
    assert_eq!(raw, vec![0x0d, 0x0c, 0x08, 0x0d]);
    assert_eq!(read_all(&fs, "dead.bin"), b"dead");
}

#[test]
fn round_trip_through_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let fs = open_local(dir.path(), 0x69).unwrap();

    let payload: Vec<u8> = (0..50_000u32).map(|i| (i * 7 % 256) as u8).collect();
    fs.mkdir_all("12").unwrap();
    let copied = fs.pipe_to("12/video.mp4", &mut payload.as_slice()).unwrap();

    assert_eq!(copied, payload.len() as u64);
    assert_eq!(fs.stat("12/video.mp4").unwrap().len, payload.len() as u64);
    assert_eq!(read_all(fs.as_ref(), "12/video.mp4"), payload);
}

#[test]
fn all_ff_and_empty_files_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let fs = open_local(dir.path(), 0x69).unwrap();

    fs.pipe_to("ff", &mut &[0xFFu8; 1024][..]).unwrap();
    fs.pipe_to("empty", &mut &b""[..]).unwrap();

    assert_eq!(read_all(fs.as_ref(), "ff"), vec![0xFF; 1024]);
    assert!(read_all(fs.as_ref(), "empty").is_empty());
}

#[test]
fn io_errors_name_the_operation() {
    let dir = tempfile::tempdir().unwrap();
    let fs = open_local(dir.path(), 0x69).unwrap();

    let err = fs.open("missing/video.mp4").err().unwrap();
    assert!(is_not_exist(&err));
    assert_matches!(err, Error::Io { op: "open", ref path, .. } if path == "missing/video.mp4");

    let err = fs.create("missing/video.mp4").err().unwrap();
    assert_matches!(err, Error::Io { op: "create", .. });
}

#[test]
fn directory_resolves_to_index() {
    let dir = tempfile::tempdir().unwrap();
    let fs = IndexResolvingFs::new(open_local(dir.path(), 0x69).unwrap());

    fs.mkdir_all("site").unwrap();
    fs.pipe_to("site/index.html", &mut &b"<h1>hi</h1>"[..]).unwrap();
    fs.pipe_to("site/app.js", &mut &b"js"[..]).unwrap();

    assert_eq!(fs.resolve("site").unwrap(), "site/index.html");
    assert_eq!(read_all(&fs, "site"), b"<h1>hi</h1>");
    assert_eq!(read_all(&fs, "site/app.js"), b"js");
}

#[test]
fn directory_without_index_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let fs = IndexResolvingFs::new(open_local(dir.path(), 0x69).unwrap());

    fs.mkdir_all("bare").unwrap();
    fs.pipe_to("bare/file.txt", &mut &b"x"[..]).unwrap();

    let err = fs.open("bare").err().unwrap();
    assert!(is_not_exist(&err));
}
