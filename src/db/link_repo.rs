use rusqlite::{params, Connection};

use super::parse_id;
use crate::error::BookResult;
use crate::model::{Contact, Event, Id};

/// Returns true if a new row was written.
pub fn insert(conn: &Connection, contact_id: Id<Contact>, event_id: Id<Event>) -> BookResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO contact_events (contact_id, event_id) VALUES (?1, ?2)",
        params![contact_id.to_db(), event_id.to_db()],
    )?;
    Ok(n > 0)
}

/// Returns true if a row was removed.
pub fn delete(conn: &Connection, contact_id: Id<Contact>, event_id: Id<Event>) -> BookResult<bool> {
    let n = conn.execute(
        "DELETE FROM contact_events WHERE contact_id = ?1 AND event_id = ?2",
        params![contact_id.to_db(), event_id.to_db()],
    )?;
    Ok(n > 0)
}

pub fn delete_for_contact(conn: &Connection, contact_id: Id<Contact>) -> BookResult<usize> {
    Ok(conn.execute(
        "DELETE FROM contact_events WHERE contact_id = ?1",
        params![contact_id.to_db()],
    )?)
}

pub fn delete_for_event(conn: &Connection, event_id: Id<Event>) -> BookResult<usize> {
    Ok(conn.execute(
        "DELETE FROM contact_events WHERE event_id = ?1",
        params![event_id.to_db()],
    )?)
}

pub fn exists(conn: &Connection, contact_id: Id<Contact>, event_id: Id<Event>) -> BookResult<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM contact_events WHERE contact_id = ?1 AND event_id = ?2",
        params![contact_id.to_db(), event_id.to_db()],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

/// Linked events, earliest first.
pub fn event_ids_for_contact(conn: &Connection, contact_id: Id<Contact>) -> BookResult<Vec<Id<Event>>> {
    let mut stmt = conn.prepare(
        "SELECT ce.event_id FROM contact_events ce
         JOIN events e ON e.id = ce.event_id
         WHERE ce.contact_id = ?1
         ORDER BY e.start_date",
    )?;
    let ids = stmt
        .query_map(params![contact_id.to_db()], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    ids.iter().map(|s| parse_id(s)).collect()
}

/// Linked contacts, by family then given name.
pub fn contact_ids_for_event(conn: &Connection, event_id: Id<Event>) -> BookResult<Vec<Id<Contact>>> {
    let mut stmt = conn.prepare(
        "SELECT ce.contact_id FROM contact_events ce
         JOIN contacts c ON c.id = ce.contact_id
         WHERE ce.event_id = ?1
         ORDER BY c.family_name COLLATE NOCASE, c.given_name COLLATE NOCASE",
    )?;
    let ids = stmt
        .query_map(params![event_id.to_db()], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    ids.iter().map(|s| parse_id(s)).collect()
}

pub fn count(conn: &Connection) -> BookResult<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM contact_events", [], |row| row.get(0))?;
    Ok(n as usize)
}
