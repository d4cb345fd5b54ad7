//! The video metadata record.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A stored video and its metadata.
///
/// `id == 0` means the record has not been saved yet. Paths are relative to
/// the storage root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Relative path of the thumbnail, empty if none.
    #[serde(default)]
    pub thumbnail: String,
    /// Relative path of the primary blob.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub original_file_name: String,
    #[serde(default, with = "rfc3339_or_empty")]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default, with = "rfc3339_or_empty")]
    pub time_updated: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl Video {
    /// A record exists iff it has been assigned an ID.
    pub fn exists(&self) -> bool {
        self.id > 0
    }

    /// Whether the record carries the given tag (exact token match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Split a comma-separated tag string into trimmed, non-empty tags.
    ///
    /// ```
    /// use vv_core::Video;
    ///
    /// assert_eq!(Video::normalize_tags("foo, bar,,baz "), vec!["foo", "bar", "baz"]);
    /// assert!(Video::normalize_tags("").is_empty());
    /// ```
    pub fn normalize_tags(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Extension of the original upload including the leading dot, or empty.
    pub fn original_extension(&self) -> String {
        match self.original_file_name.rsplit_once('.') {
            Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') && !stem.ends_with('/') => {
                format!(".{ext}")
            }
            _ => String::new(),
        }
    }
}

/// Current time truncated to whole seconds, matching the RFC3339 precision
/// stored by both repository backends.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::parse_from_rfc3339(&now.to_rfc3339_opts(SecondsFormat::Secs, true))
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(now)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde helpers mapping `Option<DateTime<Utc>>` to an RFC3339 string, with
/// `None` written as `""` (zeroed slots carry empty timestamps).
pub mod rfc3339_or_empty {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse an RFC3339 string, treating the empty string as unset.
    pub fn parse(raw: &str) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
        if raw.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(raw).map(|t| Some(t.with_timezone(&Utc)))
    }

    /// Format for storage; `None` becomes `""`.
    pub fn format(value: &Option<DateTime<Utc>>) -> String {
        value
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default()
    }
}
