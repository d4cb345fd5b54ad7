//! vv-core: shared types, errors, and configuration.
//!
//! This crate is the foundational dependency for all other vv-* crates,
//! providing the [`Video`] record, the [`VideoFilter`] query semantics shared
//! by every repository backend, a unified error type, and application
//! configuration.
//!
//! # Examples
//!
//! ```
//! use vv_core::{Video, VideoFilter};
//!
//! let video = Video {
//!     id: 1,
//!     title: "Holiday 2019".into(),
//!     tags: vec!["family".into(), "beach".into()],
//!     ..Video::default()
//! };
//!
//! let filter = VideoFilter {
//!     tags: vec!["beach".into()],
//!     ..VideoFilter::default()
//! };
//! assert!(filter.matches(&video));
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod video;

pub use error::{Error, Result};
pub use filter::{Sort, SortDirection, SortField, VideoFilter};
pub use video::Video;
