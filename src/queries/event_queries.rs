use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::contact_repo;
use crate::db::event_repo::{self, EventSortKey};
use crate::db::link_repo;
use crate::error::BookResult;
use crate::model::{Contact, Event, Id};

/// All events, earliest first.
pub fn all_events(conn: &Connection) -> BookResult<Vec<Event>> {
    event_repo::find_all(conn, EventSortKey::CHRONOLOGICAL)
}

pub fn events_sorted(conn: &Connection, sort: &[EventSortKey]) -> BookResult<Vec<Event>> {
    event_repo::find_all(conn, sort)
}

pub fn get_event(conn: &Connection, event_id: Id<Event>) -> BookResult<Option<Event>> {
    event_repo::find_by_id(conn, event_id)
}

pub fn find_by_title(conn: &Connection, query: &str) -> BookResult<Vec<Event>> {
    event_repo::find_by_title(conn, query)
}

/// Events overlapping `[from, to]`, all-day events counting their whole days.
pub fn events_between(
    conn: &Connection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> BookResult<Vec<Event>> {
    Ok(event_repo::find_starting_before(conn, to)?
        .into_iter()
        .filter(|e| e.overlaps(from, to))
        .collect())
}

/// Events not yet over at `now`, earliest first, at most `limit`.
pub fn upcoming(conn: &Connection, now: DateTime<Utc>, limit: usize) -> BookResult<Vec<Event>> {
    Ok(all_events(conn)?
        .into_iter()
        .filter(|e| e.effective_end() >= now)
        .take(limit)
        .collect())
}

/// Contacts linked to the event, by family then given name.
pub fn contacts_for_event(conn: &Connection, event_id: Id<Event>) -> BookResult<Vec<Contact>> {
    let mut contacts = Vec::new();
    for contact_id in link_repo::contact_ids_for_event(conn, event_id)? {
        if let Some(contact) = contact_repo::find_by_id(conn, contact_id)? {
            contacts.push(contact);
        }
    }
    Ok(contacts)
}
