use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use crate::store::RecordStore;

/// SQLite-backed record store.
///
/// Lines keep their stored order through an autoincrement `position`.
/// A full rewrite of the person collection runs in one SQL transaction.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {:?}", path))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteRecordStore {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))?;
        f(&mut conn)
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Person lines (5-field records, address carries its own delimiters)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS person_lines (
            position INTEGER PRIMARY KEY AUTOINCREMENT,
            line TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Demerit lines (append-only)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS demerit_lines (
            position INTEGER PRIMARY KEY AUTOINCREMENT,
            line TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    Ok(())
}

fn read_lines(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("SELECT line FROM {} ORDER BY position", table))?;

    let lines = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lines)
}

impl RecordStore for SqliteRecordStore {
    fn append_person(&self, line: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO person_lines (line) VALUES (?1)", params![line])
                .context("Failed to insert person line")?;
            Ok(())
        })
    }

    fn read_all_persons(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| read_lines(conn, "person_lines"))
    }

    fn write_all_persons(&self, lines: &[String]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM person_lines", [])?;
            {
                let mut stmt = tx.prepare("INSERT INTO person_lines (line) VALUES (?1)")?;
                for line in lines {
                    stmt.execute(params![line])?;
                }
            }
            tx.commit().context("Failed to commit person rewrite")?;
            debug!(lines = lines.len(), "rewrote person_lines");
            Ok(())
        })
    }

    fn append_demerit(&self, line: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO demerit_lines (line) VALUES (?1)", params![line])
                .context("Failed to insert demerit line")?;
            Ok(())
        })
    }

    fn read_all_demerits(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| read_lines(conn, "demerit_lines"))
    }
}
