//! Video CRUD, filtered listing and counting.
//!
//! The WHERE clause built here mirrors [`VideoFilter::matches`]; the two must
//! accept exactly the same rows.

use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row};
use vv_core::video::rfc3339_or_empty;
use vv_core::{Error, Result, SortDirection, Video, VideoFilter};

/// Column list used in SELECT statements.
const COLS: &str = "id, title, description, thumbnail, source, original_file_name,
    time_created, time_updated, tags";

fn conversion_error(idx: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

fn video_from_row(row: &Row) -> rusqlite::Result<Video> {
    let id: i64 = row.get(0)?;
    let time_created: String = row.get(6)?;
    let time_updated: String = row.get(7)?;
    let tags: String = row.get(8)?;

    Ok(Video {
        id: u64::try_from(id).map_err(|e| conversion_error(0, e))?,
        title: row.get(1)?,
        description: row.get(2)?,
        thumbnail: row.get(3)?,
        source: row.get(4)?,
        original_file_name: row.get(5)?,
        time_created: rfc3339_or_empty::parse(&time_created).map_err(|e| conversion_error(6, e))?,
        time_updated: rfc3339_or_empty::parse(&time_updated).map_err(|e| conversion_error(7, e))?,
        tags: serde_json::from_str(&tags).map_err(|e| conversion_error(8, e))?,
    })
}

fn to_db_id(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| Error::video_not_found(id))
}

/// Insert a new row; the database assigns the ID. Returns the new ID.
pub fn insert_video(conn: &Connection, video: &Video) -> Result<u64> {
    let tags = serde_json::to_string(&video.tags)?;
    conn.execute(
        "INSERT INTO videos (title, description, thumbnail, source, original_file_name,
            time_created, time_updated, tags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            video.title,
            video.description,
            video.thumbnail,
            video.source,
            video.original_file_name,
            rfc3339_or_empty::format(&video.time_created),
            rfc3339_or_empty::format(&video.time_updated),
            tags,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let id = conn.last_insert_rowid();
    u64::try_from(id).map_err(|_| Error::database(format!("invalid rowid {id}")))
}

/// Update every mutable column of an existing row. `time_created` is left
/// alone. Returns the stored `time_created`, or `None` if no row matched.
pub fn update_video(conn: &Connection, video: &Video) -> Result<Option<String>> {
    let tags = serde_json::to_string(&video.tags)?;
    conn.query_row(
        "UPDATE videos SET title = ?1, description = ?2, thumbnail = ?3, source = ?4,
            original_file_name = ?5, time_updated = ?6, tags = ?7
         WHERE id = ?8
         RETURNING time_created",
        rusqlite::params![
            video.title,
            video.description,
            video.thumbnail,
            video.source,
            video.original_file_name,
            rfc3339_or_empty::format(&video.time_updated),
            tags,
            to_db_id(video.id)?,
        ],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a video by ID.
pub fn get_video(conn: &Connection, id: u64) -> Result<Option<Video>> {
    let q = format!("SELECT {COLS} FROM videos WHERE id = ?1");
    conn.query_row(&q, [to_db_id(id)?], video_from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))
}

/// Delete a video row, returning the `(source, thumbnail)` paths it held,
/// or `None` if there was no such row.
pub fn delete_video(conn: &Connection, id: u64) -> Result<Option<(String, String)>> {
    conn.query_row(
        "DELETE FROM videos WHERE id = ?1 RETURNING source, thumbnail",
        [to_db_id(id)?],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Build the WHERE clause for `filter`, pushing its parameters.
///
/// The three criteria are OR'ed. Numbered parameters let the `any` term be
/// bound once and referenced twice.
fn where_clause(filter: &VideoFilter, params: &mut Vec<Box<dyn ToSql>>) -> Result<String> {
    if filter.is_empty() {
        return Ok(String::new());
    }

    let mut terms: Vec<String> = Vec::new();

    if !filter.title.is_empty() {
        params.push(Box::new(filter.title.clone()));
        terms.push(format!("instr(title, ?{}) > 0", params.len()));
    }

    if !filter.tags.is_empty() {
        params.push(Box::new(serde_json::to_string(&filter.tags)?));
        terms.push(format!(
            "NOT EXISTS (SELECT 1 FROM json_each(?{}) AS want
                WHERE want.value NOT IN (SELECT value FROM json_each(videos.tags)))",
            params.len()
        ));
    }

    if !filter.any.is_empty() {
        params.push(Box::new(filter.any.clone()));
        let n = params.len();
        terms.push(format!(
            "(instr(title, ?{n}) > 0
              OR (json_array_length(tags) > 0
                  AND NOT EXISTS (SELECT 1 FROM json_each(videos.tags) AS t WHERE t.value <> ?{n})))"
        ));
    }

    Ok(format!(" WHERE {}", terms.join(" OR ")))
}

/// List videos matching `filter`, sorted if requested, windowed by
/// `limit`/`offset`. `usize::MAX` as the limit means unlimited.
pub fn list_videos(
    conn: &Connection,
    filter: &VideoFilter,
    limit: usize,
    offset: usize,
) -> Result<Vec<Video>> {
    let sort = filter.sort()?;

    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    let mut sql = format!("SELECT {COLS} FROM videos");
    sql.push_str(&where_clause(filter, &mut params)?);

    // Equal sort keys keep ID order in both directions.
    match sort {
        Some(sort) => {
            let dir = match sort.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            sql.push_str(&format!(" ORDER BY {} {dir}, id ASC", sort.field.as_str()));
        }
        None => sql.push_str(" ORDER BY id ASC"),
    }

    params.push(Box::new(i64::try_from(limit).unwrap_or(-1)));
    params.push(Box::new(i64::try_from(offset).unwrap_or(i64::MAX)));
    sql.push_str(&format!(
        " LIMIT ?{} OFFSET ?{}",
        params.len() - 1,
        params.len()
    ));

    let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(params_refs.as_slice(), video_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Count videos matching `filter`.
pub fn count_videos(conn: &Connection, filter: &VideoFilter) -> Result<usize> {
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    let mut sql = String::from("SELECT COUNT(*) FROM videos");
    sql.push_str(&where_clause(filter, &mut params)?);

    let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let n: i64 = conn
        .query_row(&sql, params_refs.as_slice(), |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?;
    usize::try_from(n).map_err(|_| Error::database(format!("invalid count {n}")))
}
