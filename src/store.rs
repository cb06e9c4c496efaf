//! The storage module
//! Persists faces in a single relational table

use crate::error::Result;
use crate::face::Face;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS faces (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    race    INTEGER NOT NULL CHECK (race >= 0),
    emotion INTEGER NOT NULL CHECK (emotion >= 0),
    oldness INTEGER NOT NULL CHECK (oldness >= 0)
);
";

/// What the finder needs from its backing storage.
pub trait FaceStore {
    /// Creates the faces table if it does not exist yet. Safe to call twice.
    fn ensure_schema(&self) -> Result<()>;

    /// Up to `limit` stored faces, highest id first.
    fn load_recent(&self, limit: usize) -> Result<Vec<Face>>;

    /// Stores one face and returns the id storage assigned to it.
    fn insert(&mut self, race: u32, emotion: u32, oldness: u32) -> Result<u64>;

    /// Deletes every face and restarts id generation at 1.
    fn truncate_all(&mut self) -> Result<()>;
}

/// SQLite backed face table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and makes sure the table exists.
    ///
    /// Missing parent directories are created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use facefinder::SqliteStore;
    ///
    /// let store = SqliteStore::open("data/faces.db").unwrap();
    /// println!("{} faces stored", store.count().unwrap());
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = SqliteStore { conn: Connection::open(path)? };
        store.ensure_schema()?;
        debug!(path = %path.display(), "opened face store");

        Ok(store)
    }

    /// A throwaway database living only as long as the returned store.
    pub fn open_in_memory() -> Result<Self> {
        let store = SqliteStore { conn: Connection::open_in_memory()? };
        store.ensure_schema()?;

        Ok(store)
    }

    /// Number of rows currently in the faces table.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM faces", [], |row| row.get(0))?;

        Ok(count.max(0) as u64)
    }
}

impl FaceStore for SqliteStore {
    fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    fn load_recent(&self, limit: usize) -> Result<Vec<Face>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(
            "SELECT id, race, emotion, oldness FROM faces ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut faces = Vec::new();
        for row in rows {
            let (id, race, emotion, oldness) = row?;
            let id = u64::try_from(id)
                .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, id))?;
            faces.push(Face::with_id(race, emotion, oldness, id)?);
        }

        Ok(faces)
    }

    fn insert(&mut self, race: u32, emotion: u32, oldness: u32) -> Result<u64> {
        self.conn.execute(
            "INSERT INTO faces (race, emotion, oldness) VALUES (?1, ?2, ?3)",
            params![race, emotion, oldness],
        )?;

        let id = self.conn.last_insert_rowid();
        let id = u64::try_from(id)
            .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, id))?;

        Ok(id)
    }

    fn truncate_all(&mut self) -> Result<()> {
        // dropping tx without commit rolls back
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM faces", [])?;
        // sqlite_sequence holds the AUTOINCREMENT high-water mark
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'faces'", [])?;
        tx.commit()?;

        Ok(())
    }
}

#[cfg(test)]
mod store_test {
    use super::*;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        assert_eq!(store.insert(1, 200, 500).unwrap(), 1);
        assert_eq!(store.insert(55, 100, 999).unwrap(), 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_load_recent_orders_by_id_desc() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(1, 1, 1).unwrap();
        store.insert(2, 2, 2).unwrap();
        store.insert(3, 3, 3).unwrap();

        let faces = store.load_recent(10).unwrap();
        let ids: Vec<u64> = faces.iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(faces[0].race(), 3);
    }

    #[test]
    fn test_load_recent_respects_limit() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for i in 0..5 {
            store.insert(i, i, i).unwrap();
        }

        let ids: Vec<u64> = store.load_recent(2).unwrap().iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec![5, 4]);
    }

    #[test]
    fn test_load_recent_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.load_recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_truncate_resets_sequence() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(1, 1, 1).unwrap();
        store.insert(2, 2, 2).unwrap();

        store.truncate_all().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.insert(3, 3, 3).unwrap(), 1);
    }

    #[test]
    fn test_truncate_on_empty_table() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.truncate_all().unwrap();
        assert_eq!(store.insert(0, 0, 0).unwrap(), 1);
    }

    #[test]
    fn test_truncate_blocked_by_writer_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faces.db");

        let mut store = SqliteStore::open(&path).unwrap();
        store.insert(1, 1, 1).unwrap();
        store.conn.busy_timeout(std::time::Duration::from_millis(50)).unwrap();

        let other = Connection::open(&path).unwrap();
        other.execute_batch("BEGIN IMMEDIATE").unwrap();

        assert!(store.truncate_all().is_err());
        other.execute_batch("COMMIT").unwrap();

        // no transaction left open on our side
        assert!(store.conn.is_autocommit());
        assert_eq!(store.count().unwrap(), 1);

        store.truncate_all().unwrap();
        assert_eq!(store.insert(2, 2, 2).unwrap(), 1);
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(1, 1, 1).unwrap();

        store.ensure_schema().unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_open_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("faces.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.insert(7, 8, 9).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let faces = store.load_recent(10).unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!((faces[0].id(), faces[0].oldness()), (1, 9));
    }

    #[test]
    fn test_out_of_range_row_fails_on_load() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(101, 0, 0).unwrap();

        let err = store.load_recent(10).unwrap_err();
        assert!(err.is_validation());
    }
}
