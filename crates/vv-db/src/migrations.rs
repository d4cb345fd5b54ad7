//! Schema of the video database, versioned in a `schema_migrations` ledger.

use rusqlite::Connection;
use vv_core::{Error, Result};

/// V1: the videos table.
///
/// `AUTOINCREMENT` keeps IDs from being reused after a row is deleted.
/// Timestamps are RFC3339 UTC strings (empty when unset), which sort
/// chronologically as text. Tags are a JSON array of strings.
const V1_INITIAL: &str = r#"
CREATE TABLE videos (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    title              TEXT NOT NULL DEFAULT '',
    description        TEXT NOT NULL DEFAULT '',
    thumbnail          TEXT NOT NULL DEFAULT '',
    source             TEXT NOT NULL DEFAULT '',
    original_file_name TEXT NOT NULL DEFAULT '',
    time_created       TEXT NOT NULL DEFAULT '',
    time_updated       TEXT NOT NULL DEFAULT '',
    tags               TEXT NOT NULL DEFAULT '[]'
);

CREATE INDEX idx_videos_time_created ON videos(time_created);
CREATE INDEX idx_videos_time_updated ON videos(time_updated);
"#;

/// Ordered `(version, sql)` pairs. Append only.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL)];

const CREATE_LEDGER: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

fn db_err(e: rusqlite::Error) -> Error {
    Error::database(e.to_string())
}

/// Highest applied version, 0 on a fresh database.
pub fn current_version(conn: &Connection) -> Result<i64> {
    conn.execute_batch(CREATE_LEDGER).map_err(db_err)?;
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(db_err)
}

/// Bring `conn` up to the latest schema. Each migration and its ledger row
/// commit together.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let from = current_version(conn)?;

    for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > from) {
        let tx = conn.unchecked_transaction().map_err(db_err)?;
        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("schema v{version}: {e}")))?;
        tx.execute("INSERT INTO schema_migrations (version) VALUES (?1)", [version])
            .map_err(db_err)?;
        tx.commit().map_err(db_err)?;

        tracing::info!(version, "migrated video database");
    }

    Ok(())
}
