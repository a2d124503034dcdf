use rusqlite::Connection;

use crate::db::contact_repo::{self, ContactSortKey};
use crate::db::event_repo;
use crate::error::BookResult;
use crate::model::{Contact, Event, Id, Position};

/// All contacts by family name, then given name.
pub fn all_contacts(conn: &Connection) -> BookResult<Vec<Contact>> {
    contact_repo::find_all(conn, ContactSortKey::BY_NAME)
}

pub fn contacts_sorted(conn: &Connection, sort: &[ContactSortKey]) -> BookResult<Vec<Contact>> {
    contact_repo::find_all(conn, sort)
}

pub fn get_contact(conn: &Connection, contact_id: Id<Contact>) -> BookResult<Option<Contact>> {
    contact_repo::find_by_id(conn, contact_id)
}

pub fn find_by_name(conn: &Connection, query: &str) -> BookResult<Vec<Contact>> {
    contact_repo::find_by_name(conn, query)
}

/// Contacts carrying the interest, predefined label or custom tag, ignoring case.
pub fn find_by_interest(conn: &Connection, interest: &str) -> BookResult<Vec<Contact>> {
    Ok(all_contacts(conn)?
        .into_iter()
        .filter(|c| c.has_interest(interest))
        .collect())
}

pub fn with_position(conn: &Connection, position: Position) -> BookResult<Vec<Contact>> {
    Ok(all_contacts(conn)?
        .into_iter()
        .filter(|c| c.position == position)
        .collect())
}

/// Events linked to the contact, earliest first. Unknown contacts have none.
pub fn events_for_contact(conn: &Connection, contact_id: Id<Contact>) -> BookResult<Vec<Event>> {
    let contact = match contact_repo::find_by_id(conn, contact_id)? {
        Some(c) => c,
        None => return Ok(Vec::new()),
    };

    let mut events = Vec::new();
    for event_id in &contact.event_ids {
        if let Some(event) = event_repo::find_by_id(conn, *event_id)? {
            events.push(event);
        }
    }
    Ok(events)
}
