//! Opening the book and committing work.
//!
//! Each mutating operation runs in its own transaction; `save` is the commit.
//! Until it returns `Ok`, nothing the operation did is durable, and callers
//! that see an error should re-query rather than trust entities they hold.

use std::path::Path;

use log::{debug, error};
use rusqlite::{Connection, Transaction};

use super::schema;
use crate::error::{BookError, BookResult};

pub fn open(path: &Path) -> BookResult<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    schema::initialize(&conn)?;
    debug!("event=store_open module=db path={}", path.display());
    Ok(conn)
}

pub fn open_in_memory() -> BookResult<Connection> {
    let conn = Connection::open_in_memory()?;
    schema::initialize(&conn)?;
    Ok(conn)
}

/// Runs `work` in a transaction and saves it. An error from `work` rolls
/// everything back.
pub fn with_transaction<T>(
    conn: &Connection,
    work: impl FnOnce(&Transaction) -> BookResult<T>,
) -> BookResult<T> {
    let tx = conn.unchecked_transaction()?;
    let value = work(&tx)?;
    save(tx)?;
    Ok(value)
}

pub fn save(tx: Transaction) -> BookResult<()> {
    tx.commit().map_err(|e| {
        error!("event=save_failed module=db error={}", e);
        BookError::Persistence(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookError;

    #[test]
    fn failed_work_rolls_back() {
        let conn = open_in_memory().unwrap();
        let result: BookResult<()> = with_transaction(&conn, |tx| {
            tx.execute(
                "INSERT INTO events (id, title, start_date) VALUES ('x', 't', '2026')",
                [],
            )?;
            Err(BookError::Other("boom".into()))
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM events", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("book.db");
        open(&path).unwrap();
        assert!(path.exists());
    }
}
