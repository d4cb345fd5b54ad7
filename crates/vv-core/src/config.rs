//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML. Every section
//! defaults sensibly so a completely empty file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default single-byte key for the storage transform.
pub const DEFAULT_STORAGE_KEY: u8 = 0x69;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub repository: RepositoryConfig,
    pub tools: ToolsConfig,
    pub thumbnail: ThumbnailConfig,
    pub transcode: TranscodeConfig,
}

impl Config {
    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Serialization(format!("config parse error: {e}")))
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.storage.key == 0 {
            warnings.push("storage.key is 0; stored files will not be obfuscated".into());
        }

        if self.thumbnail.width == 0 {
            warnings.push("thumbnail.width is 0; ffmpeg will reject the scale filter".into());
        }

        if self.transcode.file_name.contains('/') {
            warnings.push("transcode.file_name contains a path separator".into());
        }

        if let Some(ref path) = self.tools.ffmpeg {
            if !path.exists() {
                warnings.push(format!(
                    "tools.ffmpeg points at {} which does not exist; PATH lookup will be used",
                    path.display()
                ));
            }
        }

        warnings
    }
}

/// Where and how blobs are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Local directory all relative storage paths are rooted under.
    pub root_dir: PathBuf,
    /// Byte every stored byte is XORed with.
    pub key: u8,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("videos"),
            key: DEFAULT_STORAGE_KEY,
        }
    }
}

/// Which repository backend holds video metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryBackend {
    /// One JSON document in storage, rewritten on every mutation.
    #[default]
    Json,
    /// A SQLite table.
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub backend: RepositoryBackend,
    /// Storage-relative path of the JSON document.
    pub json_file: String,
    /// Filesystem path of the SQLite database.
    pub sqlite_path: PathBuf,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            backend: RepositoryBackend::Json,
            json_file: "videos.json".to_string(),
            sqlite_path: PathBuf::from("vidvault.db"),
        }
    }
}

/// External tool overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Explicit ffmpeg path; `PATH` is searched when unset.
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Output width in pixels; height keeps the aspect ratio.
    pub width: u32,
    /// File name written beside the source.
    pub file_name: String,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: 640,
            file_name: "thumbnail.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    pub video_codec: String,
    pub audio_codec: String,
    /// File name of the derivative written beside the source.
    pub file_name: String,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            video_codec: "h264".to_string(),
            audio_codec: "aac".to_string(),
            file_name: "transcoded.mp4".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.repository.backend, RepositoryBackend::Json);
        assert_eq!(config.repository.json_file, "videos.json");
        assert_eq!(config.thumbnail.width, 640);
        assert_eq!(config.transcode.file_name, "transcoded.mp4");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = Config::from_toml(
            r#"
            [storage]
            root_dir = "/srv/videos"
            key = 42

            [repository]
            backend = "sqlite"
            sqlite_path = "/srv/vidvault.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.root_dir, PathBuf::from("/srv/videos"));
        assert_eq!(config.storage.key, 42);
        assert_eq!(config.repository.backend, RepositoryBackend::Sqlite);
        assert_eq!(config.repository.json_file, "videos.json");
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(Config::from_toml("[storage\nkey = ").is_err());
        assert!(Config::from_toml("[repository]\nbackend = \"mongo\"").is_err());
    }

    #[test]
    fn validate_warns() {
        let mut config = Config::default();
        config.storage.key = 0;
        config.thumbnail.width = 0;
        config.tools.ffmpeg = Some(PathBuf::from("/definitely/not/here/ffmpeg"));
        assert_eq!(config.validate().len(), 3);
    }
}
