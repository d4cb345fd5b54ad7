//! r2d2 pool over the SQLite video store.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use vv_core::{Error, Result};

use crate::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Connections kept per pool.
const POOL_SIZE: u32 = 4;

/// Applied to every new file-backed connection.
const FILE_PRAGMAS: &str = "PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;";

/// Open (creating if needed) the video database at `db_path` and bring its
/// schema up to date.
pub fn init_pool(db_path: &Path) -> Result<DbPool> {
    let manager =
        SqliteConnectionManager::file(db_path).with_init(|conn| conn.execute_batch(FILE_PRAGMAS));
    let pool = build(manager)?;
    tracing::debug!(path = %db_path.display(), "opened video database");
    Ok(pool)
}

/// A migrated in-memory video database.
///
/// Every call gets its own shared-cache database, so all connections of one
/// pool see the same rows while separate pools stay isolated.
pub fn init_memory_pool() -> Result<DbPool> {
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);
    build(SqliteConnectionManager::file(format!(
        "file:vv_memdb_{n}?mode=memory&cache=shared"
    )))
}

fn build(manager: SqliteConnectionManager) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("cannot open video database: {e}")))?;

    // The first connection also keeps a memory database alive while the
    // schema is created.
    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;
    drop(conn);
    Ok(pool)
}

/// Check a connection out of `pool`.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("no database connection available: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_pools_are_isolated() {
        let a = init_memory_pool().unwrap();
        let b = init_memory_pool().unwrap();
        assert_eq!(a.max_size(), POOL_SIZE);

        get_conn(&a)
            .unwrap()
            .execute("INSERT INTO videos (title) VALUES ('only in a')", [])
            .unwrap();

        let count = |pool: &DbPool| -> i64 {
            get_conn(pool)
                .unwrap()
                .query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))
                .unwrap()
        };
        assert_eq!(count(&a), 1);
        assert_eq!(count(&b), 0);
    }

    #[test]
    fn file_pool_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_pool(&dir.path().join("vidvault.db")).unwrap();
        let conn = get_conn(&pool).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn file_pool_reopens_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vidvault.db");

        {
            let pool = init_pool(&path).unwrap();
            get_conn(&pool)
                .unwrap()
                .execute("INSERT INTO videos (title) VALUES ('kept')", [])
                .unwrap();
        }

        let pool = init_pool(&path).unwrap();
        let title: String = get_conn(&pool)
            .unwrap()
            .query_row("SELECT title FROM videos WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(title, "kept");
    }
}
