//! vv-db: video metadata persistence.
//!
//! [`VideoRepository`] is the contract; [`JsonVideoRepository`] keeps every
//! record in one JSON document in storage and [`SqliteVideoRepository`]
//! keeps them in a SQLite table (r2d2 pool, embedded migrations). Pick one
//! at startup with [`open_repository`].

pub mod json;
pub mod migrate;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod repository;
pub mod sqlite;

pub use json::JsonVideoRepository;
pub use migrate::migrate_json_to;
pub use repository::{open_repository, VideoRepository};
pub use sqlite::SqliteVideoRepository;
