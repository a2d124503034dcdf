use log::debug;
use rusqlite::Connection;

use crate::db::{contact_repo, event_repo, link_repo, store};
use crate::error::{BookError, BookResult};
use crate::model::{linkage, Contact, ContactPayload, Event, Id, Labeled, Position, PredefinedInterest};
use crate::validation::{self, trim_optional};

pub fn add_contact(conn: &Connection, payload: ContactPayload) -> BookResult<Contact> {
    let mut payload = payload;
    payload.given_name = payload.given_name.trim().to_string();
    payload.family_name = payload.family_name.trim().to_string();

    let contact = Contact::create(payload);
    store::with_transaction(conn, |tx| contact_repo::insert(tx, &contact))?;
    debug!("event=contact_added module=ops id={}", contact.id);
    Ok(contact)
}

/// Replaces the whole payload, e.g. after re-sync from an external source.
pub fn update_payload(
    conn: &Connection,
    contact_id: Id<Contact>,
    payload: ContactPayload,
) -> BookResult<Contact> {
    edit(conn, contact_id, |contact| {
        contact.payload = payload;
        true
    })
    .map(|(contact, _)| contact)
}

pub fn rename(
    conn: &Connection,
    contact_id: Id<Contact>,
    given_name: &str,
    family_name: &str,
) -> BookResult<Contact> {
    let given = given_name.trim().to_string();
    let family = family_name.trim().to_string();
    edit(conn, contact_id, |contact| {
        contact.payload.given_name = given;
        contact.payload.family_name = family;
        true
    })
    .map(|(contact, _)| contact)
}

pub fn add_phone(
    conn: &Connection,
    contact_id: Id<Contact>,
    number: &str,
    label: Option<&str>,
) -> BookResult<Contact> {
    let valid_number = validation::non_blank(number, "phone number")?;
    let label = trim_optional(label);
    edit(conn, contact_id, |contact| {
        contact.payload.phones.push(Labeled {
            label,
            value: valid_number,
        });
        true
    })
    .map(|(contact, _)| contact)
}

pub fn add_email(
    conn: &Connection,
    contact_id: Id<Contact>,
    email: &str,
    label: Option<&str>,
) -> BookResult<Contact> {
    let valid_email = validation::non_blank(email, "email")?;
    let label = trim_optional(label);
    edit(conn, contact_id, |contact| {
        contact.payload.emails.push(Labeled {
            label,
            value: valid_email,
        });
        true
    })
    .map(|(contact, _)| contact)
}

pub fn set_position(
    conn: &Connection,
    contact_id: Id<Contact>,
    position: Position,
) -> BookResult<Contact> {
    edit(conn, contact_id, |contact| {
        let changed = contact.position != position;
        contact.position = position;
        changed
    })
    .map(|(contact, _)| contact)
}

/// Returns `Ok(false)` when the text is blank or already present.
pub fn add_custom_interest(
    conn: &Connection,
    contact_id: Id<Contact>,
    text: &str,
) -> BookResult<bool> {
    edit(conn, contact_id, |contact| contact.add_custom_interest(text)).map(|(_, added)| added)
}

pub fn remove_custom_interest(
    conn: &Connection,
    contact_id: Id<Contact>,
    text: &str,
) -> BookResult<bool> {
    edit(conn, contact_id, |contact| contact.remove_custom_interest(text))
        .map(|(_, removed)| removed)
}

pub fn add_predefined_interest(
    conn: &Connection,
    contact_id: Id<Contact>,
    interest: PredefinedInterest,
) -> BookResult<bool> {
    edit(conn, contact_id, |contact| contact.add_predefined_interest(interest))
        .map(|(_, added)| added)
}

pub fn remove_predefined_interest(
    conn: &Connection,
    contact_id: Id<Contact>,
    interest: PredefinedInterest,
) -> BookResult<bool> {
    edit(conn, contact_id, |contact| contact.remove_predefined_interest(interest))
        .map(|(_, removed)| removed)
}

/// Free-text interest as typed by a user; see `Contact::add_interest`.
pub fn add_interest(
    conn: &Connection,
    contact_id: Id<Contact>,
    text: &str,
) -> BookResult<bool> {
    edit(conn, contact_id, |contact| contact.add_interest(text)).map(|(_, added)| added)
}

pub fn remove_interest(
    conn: &Connection,
    contact_id: Id<Contact>,
    text: &str,
) -> BookResult<bool> {
    edit(conn, contact_id, |contact| contact.remove_interest(text))
        .map(|(_, removed)| removed)
}

/// Unlinks the contact from all of its events, then deletes it. The events
/// stay; they are returned as they now stand, without the contact.
pub fn delete_contact(conn: &Connection, contact_id: Id<Contact>) -> BookResult<Vec<Event>> {
    let detached = store::with_transaction(conn, |tx| {
        let mut contact = load(tx, contact_id)?;

        let mut events: Vec<Event> = Vec::with_capacity(contact.event_ids.len());
        for event_id in &contact.event_ids {
            if let Some(event) = event_repo::find_by_id(tx, *event_id)? {
                events.push(event);
            }
        }
        linkage::detach_contact(&mut contact, &mut events);

        link_repo::delete_for_contact(tx, contact_id)?;
        contact_repo::delete(tx, contact_id)?;
        Ok(events)
    })?;

    debug!(
        "event=contact_deleted module=ops id={} detached_events={}",
        contact_id,
        detached.len()
    );
    Ok(detached)
}

pub(crate) fn load(conn: &Connection, contact_id: Id<Contact>) -> BookResult<Contact> {
    contact_repo::find_by_id(conn, contact_id)?
        .ok_or_else(|| BookError::not_found("Contact", contact_id))
}

/// Loads, applies `change`, and writes back only if it reports a change.
fn edit(
    conn: &Connection,
    contact_id: Id<Contact>,
    change: impl FnOnce(&mut Contact) -> bool,
) -> BookResult<(Contact, bool)> {
    store::with_transaction(conn, |tx| {
        let mut contact = load(tx, contact_id)?;
        let changed = change(&mut contact);
        if changed {
            contact_repo::update(tx, &contact)?;
        }
        Ok((contact, changed))
    })
}
