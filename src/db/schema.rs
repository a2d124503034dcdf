use rusqlite::Connection;

use crate::error::BookResult;

/// Initialize the database schema. Creates all tables if they don't exist.
pub fn initialize(conn: &Connection) -> BookResult<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS contacts (
            id TEXT PRIMARY KEY NOT NULL,
            given_name TEXT NOT NULL DEFAULT '',
            family_name TEXT NOT NULL DEFAULT '',
            position TEXT,
            external_id TEXT,
            payload BLOB NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS contacts_by_name
            ON contacts (family_name COLLATE NOCASE, given_name COLLATE NOCASE);
        CREATE INDEX IF NOT EXISTS contacts_by_external_id
            ON contacts (external_id);

        CREATE TABLE IF NOT EXISTS contact_interests (
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            kind TEXT NOT NULL CHECK (kind IN ('predefined', 'custom')),
            value TEXT NOT NULL,
            ordinal INTEGER NOT NULL,
            PRIMARY KEY (contact_id, kind, value)
        );

        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            notes TEXT,
            location TEXT,
            is_all_day INTEGER NOT NULL DEFAULT 0,
            start_date TEXT NOT NULL,
            end_date TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS events_by_start ON events (start_date);

        CREATE TABLE IF NOT EXISTS contact_events (
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            event_id TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            PRIMARY KEY (contact_id, event_id)
        );

        CREATE INDEX IF NOT EXISTS contact_events_by_event ON contact_events (event_id);
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
