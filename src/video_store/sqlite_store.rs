//! SQLite-backed video store.
//!
//! Records live in `spots`, performer names in `performers`, and the
//! ordered association between them in `spot_performers`. Natural order is
//! insertion order (`spots.rowid`); updates keep a record's rowid.

use super::models::{VideoRecord, RELEASE_DATE_FORMAT};
use super::schema::VIDEO_VERSIONED_SCHEMAS;
use super::trait_def::VideoStore;
use crate::sqlite_persistence::read_schema_version;
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SELECT_SPOT_COLUMNS: &str = "SELECT rowid, id, title, director, label, release_date, \
     duration_seconds, genre, views, comments, likes FROM spots";

pub struct SqliteVideoStore {
    conn: Mutex<Connection>,
}

/// Raw `spots` row before integer range checks and date parsing.
struct SpotRow {
    rowid: i64,
    id: String,
    title: String,
    director: String,
    label: String,
    release_date: String,
    duration_seconds: i64,
    genre: String,
    views: i64,
    comments: i64,
    likes: i64,
}

impl SpotRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<SpotRow> {
        Ok(SpotRow {
            rowid: row.get(0)?,
            id: row.get(1)?,
            title: row.get(2)?,
            director: row.get(3)?,
            label: row.get(4)?,
            release_date: row.get(5)?,
            duration_seconds: row.get(6)?,
            genre: row.get(7)?,
            views: row.get(8)?,
            comments: row.get(9)?,
            likes: row.get(10)?,
        })
    }

    fn into_record(self, performers: Vec<String>) -> Result<VideoRecord> {
        let release_date = NaiveDate::parse_from_str(&self.release_date, RELEASE_DATE_FORMAT)
            .with_context(|| {
                format!(
                    "Spot {} has malformed release date '{}'",
                    self.id, self.release_date
                )
            })?;
        Ok(VideoRecord {
            release_date,
            duration_seconds: u32::try_from(self.duration_seconds)
                .with_context(|| format!("Spot {} has invalid duration", self.id))?,
            views: u64::try_from(self.views)
                .with_context(|| format!("Spot {} has invalid views", self.id))?,
            comments: u64::try_from(self.comments)
                .with_context(|| format!("Spot {} has invalid comments", self.id))?,
            likes: u64::try_from(self.likes)
                .with_context(|| format!("Spot {} has invalid likes", self.id))?,
            id: self.id,
            title: self.title,
            director: self.director,
            label: self.label,
            genre: self.genre,
            performers,
        })
    }
}

fn migrate_if_needed(conn: &Connection) -> Result<()> {
    let latest_schema = VIDEO_VERSIONED_SCHEMAS
        .last()
        .ok_or_else(|| anyhow!("No video schema defined"))?;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!(
            "Creating video db schema at version {}",
            latest_schema.version
        );
        latest_schema.create(conn)?;
        return Ok(());
    }

    match read_schema_version(conn)? {
        None => bail!("Database exists but was not created by this server"),
        Some(version) if version > latest_schema.version => bail!(
            "Database schema version {} is newer than supported version {}",
            version,
            latest_schema.version
        ),
        Some(version) => {
            debug!("Video db schema at version {}", version);
        }
    }

    latest_schema
        .validate(conn)
        .context("Video db schema validation failed")
}

impl SqliteVideoStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open video database {:?}", db_path))?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        migrate_if_needed(&conn)?;

        let spot_count: i64 = conn.query_row("SELECT COUNT(*) FROM spots", [], |r| r.get(0))?;
        info!("Opened video catalog: {} spots", spot_count);

        Ok(SqliteVideoStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Video database connection lock poisoned"))
    }

    fn spot_performers(conn: &Connection, spot_rowid: i64) -> Result<Vec<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT p.name FROM spot_performers sp \
             JOIN performers p ON p.rowid = sp.performer_rowid \
             WHERE sp.spot_rowid = ?1 ORDER BY sp.position",
        )?;
        let names = stmt
            .query_map(params![spot_rowid], |r| r.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    fn performer_rowid(conn: &Connection, name: &str) -> Result<i64> {
        conn.execute(
            "INSERT OR IGNORE INTO performers (name) VALUES (?1)",
            params![name],
        )?;
        let rowid = conn.query_row(
            "SELECT rowid FROM performers WHERE name = ?1",
            params![name],
            |r| r.get(0),
        )?;
        Ok(rowid)
    }

    fn write_spot(conn: &Connection, record: &VideoRecord) -> Result<()> {
        let existing: Option<i64> = conn
            .query_row(
                "SELECT rowid FROM spots WHERE id = ?1",
                params![&record.id],
                |r| r.get(0),
            )
            .optional()?;

        let release_date = record.release_date_text();
        let duration_seconds = i64::from(record.duration_seconds);
        let views = i64::try_from(record.views).context("views out of range")?;
        let comments = i64::try_from(record.comments).context("comments out of range")?;
        let likes = i64::try_from(record.likes).context("likes out of range")?;

        let spot_rowid = match existing {
            Some(rowid) => {
                conn.execute(
                    "UPDATE spots SET title = ?1, director = ?2, label = ?3, release_date = ?4, \
                     duration_seconds = ?5, genre = ?6, views = ?7, comments = ?8, likes = ?9 \
                     WHERE rowid = ?10",
                    params![
                        &record.title,
                        &record.director,
                        &record.label,
                        release_date,
                        duration_seconds,
                        &record.genre,
                        views,
                        comments,
                        likes,
                        rowid
                    ],
                )?;
                conn.execute(
                    "DELETE FROM spot_performers WHERE spot_rowid = ?1",
                    params![rowid],
                )?;
                rowid
            }
            None => {
                conn.execute(
                    "INSERT INTO spots (id, title, director, label, release_date, \
                     duration_seconds, genre, views, comments, likes) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        &record.id,
                        &record.title,
                        &record.director,
                        &record.label,
                        release_date,
                        duration_seconds,
                        &record.genre,
                        views,
                        comments,
                        likes
                    ],
                )?;
                conn.last_insert_rowid()
            }
        };

        for (position, name) in record.performers.iter().enumerate() {
            let performer_rowid = Self::performer_rowid(conn, name)?;
            conn.execute(
                "INSERT INTO spot_performers (spot_rowid, performer_rowid, position) \
                 VALUES (?1, ?2, ?3)",
                params![spot_rowid, performer_rowid, position as i64],
            )?;
        }
        Ok(())
    }

    /// Runs `f` inside `BEGIN IMMEDIATE`, rolling back if it fails.
    fn in_write_transaction<T>(
        conn: &Connection,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        conn.execute("BEGIN IMMEDIATE", [])?;
        match f(conn) {
            Ok(value) => {
                conn.execute("COMMIT", [])?;
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }
}

impl VideoStore for SqliteVideoStore {
    fn list_all(&self) -> Result<Vec<VideoRecord>> {
        let conn = self.lock()?;
        let rows = {
            let mut stmt = conn.prepare(&format!("{} ORDER BY rowid", SELECT_SPOT_COLUMNS))?;
            let rows = stmt
                .query_map([], SpotRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };

        rows.into_iter()
            .map(|row| {
                let performers = Self::spot_performers(&conn, row.rowid)?;
                row.into_record(performers)
            })
            .collect()
    }

    fn get(&self, id: &str) -> Result<Option<VideoRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_SPOT_COLUMNS),
                params![id],
                SpotRow::from_row,
            )
            .optional()?;
        match row {
            Some(row) => {
                let performers = Self::spot_performers(&conn, row.rowid)?;
                Ok(Some(row.into_record(performers)?))
            }
            None => Ok(None),
        }
    }

    fn put(&self, record: &VideoRecord) -> Result<()> {
        let conn = self.lock()?;
        Self::in_write_transaction(&conn, |conn| Self::write_spot(conn, record))
            .with_context(|| format!("Failed to store spot {}", record.id))
    }

    fn delete(&self, id: &str) -> Result<Option<VideoRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_SPOT_COLUMNS),
                params![id],
                SpotRow::from_row,
            )
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let performers = Self::spot_performers(&conn, row.rowid)?;
        let rowid = row.rowid;
        let record = row.into_record(performers)?;

        Self::in_write_transaction(&conn, |conn| {
            conn.execute("DELETE FROM spots WHERE rowid = ?1", params![rowid])?;
            Ok(())
        })
        .with_context(|| format!("Failed to delete spot {}", id))?;
        Ok(Some(record))
    }

    fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM spots", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
