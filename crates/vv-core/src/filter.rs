//! Listing filter and sort semantics shared by every repository backend.
//!
//! The predicate here is the reference: the SQLite backend mirrors it in SQL
//! and the flat-file backend calls [`VideoFilter::matches`] directly.
//!
//! The three criteria are OR'ed, not AND'ed. A record with a matching tag set
//! passes even when a populated `title` criterion does not match it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Video};

/// Field a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    TimeCreated,
    TimeUpdated,
}

impl SortField {
    /// Wire / column name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::TimeCreated => "time_created",
            SortField::TimeUpdated => "time_updated",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "title" => Ok(SortField::Title),
            "time_created" => Ok(SortField::TimeCreated),
            "time_updated" => Ok(SortField::TimeUpdated),
            other => Err(Error::invalid_filter(format!(
                "unsupported sort field {other:?}"
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::invalid_filter(format!(
                "unsupported sort direction {other:?}"
            ))),
        }
    }
}

/// A validated sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    /// Compare two records under this sort.
    ///
    /// Descending applies the ascending comparison to the swapped pair
    /// instead of negating it, so `sort_by` always sees a total order. Equal
    /// keys compare `Equal` in both directions and a stable sort leaves them
    /// in storage (ID) order either way.
    pub fn compare(&self, a: &Video, b: &Video) -> Ordering {
        let ascending = |x: &Video, y: &Video| match self.field {
            SortField::Title => x.title.as_str().cmp(y.title.as_str()),
            SortField::TimeCreated => x.time_created.cmp(&y.time_created),
            SortField::TimeUpdated => x.time_updated.cmp(&y.time_updated),
        };
        match self.direction {
            SortDirection::Asc => ascending(a, b),
            SortDirection::Desc => ascending(b, a),
        }
    }
}

/// Listing filter.
///
/// Sort field and direction are kept as the raw strings a caller supplied;
/// they are validated by [`VideoFilter::sort`] so an unknown value surfaces as
/// [`Error::InvalidFilter`] at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoFilter {
    /// Case-sensitive substring of the title.
    pub title: String,
    /// Every tag listed must be present on the record.
    pub tags: Vec<String>,
    /// Loose term: title substring, or the record's tag set is exactly `{any}`.
    pub any: String,
    pub sort_field: String,
    pub sort_direction: String,
}

impl VideoFilter {
    /// Build a filter from request-style parameters.
    ///
    /// `tags` is comma separated; an empty string means no tag criterion. A
    /// sort field without a direction sorts ascending.
    pub fn from_params(
        title: &str,
        tags: &str,
        any: &str,
        sort_field: &str,
        sort_direction: &str,
    ) -> Self {
        let sort_direction = if !sort_field.is_empty() && sort_direction.is_empty() {
            SortDirection::Asc.as_str().to_string()
        } else {
            sort_direction.to_string()
        };

        Self {
            title: title.to_string(),
            tags: Video::normalize_tags(tags),
            any: any.to_string(),
            sort_field: sort_field.to_string(),
            sort_direction,
        }
    }

    /// True when no predicate criterion is set; every record passes.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.tags.is_empty() && self.any.is_empty()
    }

    /// Validate and return the requested sort, if any.
    pub fn sort(&self) -> Result<Option<Sort>> {
        if self.sort_field.is_empty() {
            return Ok(None);
        }

        let field = self.sort_field.parse()?;
        let direction = if self.sort_direction.is_empty() {
            SortDirection::Asc
        } else {
            self.sort_direction.parse()?
        };

        Ok(Some(Sort { field, direction }))
    }

    /// Reference predicate.
    pub fn matches(&self, video: &Video) -> bool {
        if self.is_empty() {
            return true;
        }

        if !self.title.is_empty() && video.title.contains(&self.title) {
            return true;
        }

        if !self.tags.is_empty() && self.tags.iter().all(|t| video.has_tag(t)) {
            return true;
        }

        if !self.any.is_empty() {
            let exact_tag_set =
                !video.tags.is_empty() && video.tags.iter().all(|t| *t == self.any);
            if video.title.contains(&self.any) || exact_tag_set {
                return true;
            }
        }

        false
    }

    /// Run this filter over an in-memory corpus: drop unsaved/deleted slots,
    /// apply the predicate, sort if requested, then window by limit/offset.
    pub fn apply(&self, videos: &[Video], limit: usize, offset: usize) -> Result<Vec<Video>> {
        let sort = self.sort()?;

        let mut selected: Vec<Video> = videos
            .iter()
            .filter(|v| v.exists() && self.matches(v))
            .cloned()
            .collect();

        if let Some(sort) = sort {
            selected.sort_by(|a, b| sort.compare(a, b));
        }

        Ok(selected.into_iter().skip(offset).take(limit).collect())
    }

    /// Number of live records passing the predicate.
    pub fn count(&self, videos: &[Video]) -> usize {
        videos
            .iter()
            .filter(|v| v.exists() && self.matches(v))
            .count()
    }
}
