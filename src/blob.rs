//! Moving blobs between storage and local scratch files.
//!
//! External tools need real paths, while blobs live behind the storage
//! transform; these helpers bridge the two.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use vv_core::{Error, Result};
use vv_storage::FileSystem;

/// Copy the stored blob at `path` into the local file `local`, removing
/// the storage transform. Returns bytes copied.
pub fn download(storage: &dyn FileSystem, path: &str, local: &Path) -> Result<u64> {
    let mut reader = storage.open(path)?;
    let local_name = local.display().to_string();
    let mut file = File::create(local).map_err(|e| Error::io("create", local_name.clone(), e))?;
    let copied = io::copy(&mut reader, &mut file).map_err(|e| Error::io("copy", path, e))?;
    file.flush().map_err(|e| Error::io("close", local_name, e))?;
    Ok(copied)
}

/// Store the local file `local` at `path`. Returns bytes copied.
pub fn upload(storage: &dyn FileSystem, local: &Path, path: &str) -> Result<u64> {
    let mut file =
        File::open(local).map_err(|e| Error::io("open", local.display().to_string(), e))?;
    storage.pipe_to(path, &mut file)
}

/// Final path component of a storage path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_then_upload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = vv_storage::open_local(dir.path().join("store"), 0x69).unwrap();
        storage.pipe_to("src.bin", &mut &b"payload"[..]).unwrap();

        let local = dir.path().join("local.bin");
        assert_eq!(download(storage.as_ref(), "src.bin", &local).unwrap(), 7);
        assert_eq!(std::fs::read(&local).unwrap(), b"payload");

        upload(storage.as_ref(), &local, "copy.bin").unwrap();
        let raw = std::fs::read(dir.path().join("store/copy.bin")).unwrap();
        assert_eq!(raw, vv_storage::transform_bytes(b"payload", &vv_storage::XorTransform::new(0x69)));
    }

    #[test]
    fn file_name_of_storage_path() {
        assert_eq!(file_name("3/video.mp4"), "video.mp4");
        assert_eq!(file_name("video.mp4"), "video.mp4");
    }
}
