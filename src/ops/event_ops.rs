use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::Connection;

use crate::db::{contact_repo, event_repo, link_repo, store};
use crate::error::{BookError, BookResult};
use crate::model::{linkage, Contact, Event, Id};
use crate::validation::{self, trim_optional};

pub fn add_event(
    conn: &Connection,
    title: &str,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    is_all_day: bool,
    notes: Option<&str>,
    location: Option<&str>,
) -> BookResult<Event> {
    let mut event = Event::create(title.trim().to_string(), start);
    event.end = end;
    event.is_all_day = is_all_day;
    event.notes = trim_optional(notes);
    event.location = trim_optional(location);
    event.normalize_all_day();
    validation::date_range(event.start, event.end)?;

    store::with_transaction(conn, |tx| event_repo::insert(tx, &event))?;
    debug!("event=event_added module=ops id={}", event.id);
    Ok(event)
}

/// `None` leaves a field unchanged; `Some(None)` clears an optional one.
/// The resulting range is validated before anything is written.
/// All-day events keep only the dates of their bounds.
pub fn update_event(
    conn: &Connection,
    event_id: Id<Event>,
    title: Option<&str>,
    start: Option<DateTime<Utc>>,
    end: Option<Option<DateTime<Utc>>>,
    is_all_day: Option<bool>,
    notes: Option<Option<&str>>,
    location: Option<Option<&str>>,
) -> BookResult<Event> {
    store::with_transaction(conn, |tx| {
        let mut updated = load(tx, event_id)?;

        if let Some(t) = title {
            updated.title = t.trim().to_string();
        }
        if let Some(s) = start {
            updated.start = s;
        }
        if let Some(e) = end {
            updated.end = e;
        }
        if let Some(all_day) = is_all_day {
            updated.is_all_day = all_day;
        }
        if let Some(n) = notes {
            updated.notes = trim_optional(n);
        }
        if let Some(loc) = location {
            updated.location = trim_optional(loc);
        }

        updated.normalize_all_day();
        validation::date_range(updated.start, updated.end)?;
        event_repo::update(tx, &updated)?;
        Ok(updated)
    })
}

/// Unlinks the event from all of its contacts, then deletes it. The contacts
/// stay; they are returned as they now stand, without the event.
pub fn delete_event(conn: &Connection, event_id: Id<Event>) -> BookResult<Vec<Contact>> {
    let detached = store::with_transaction(conn, |tx| {
        let mut event = load(tx, event_id)?;

        let mut contacts: Vec<Contact> = Vec::with_capacity(event.contact_ids.len());
        for contact_id in &event.contact_ids {
            if let Some(contact) = contact_repo::find_by_id(tx, *contact_id)? {
                contacts.push(contact);
            }
        }
        linkage::detach_event(&mut event, &mut contacts);

        link_repo::delete_for_event(tx, event_id)?;
        event_repo::delete(tx, event_id)?;
        Ok(contacts)
    })?;

    debug!(
        "event=event_deleted module=ops id={} detached_contacts={}",
        event_id,
        detached.len()
    );
    Ok(detached)
}

pub(crate) fn load(conn: &Connection, event_id: Id<Event>) -> BookResult<Event> {
    event_repo::find_by_id(conn, event_id)?
        .ok_or_else(|| BookError::not_found("Event", event_id))
}
