//! Persisted contact/event linking.
//!
//! Each operation loads both entities, applies the in-memory rule from
//! `model::linkage`, and writes the single join row in one transaction, so
//! the stored association and the returned entities agree.

use log::debug;
use rusqlite::Connection;

use super::{contact_ops, event_ops};
use crate::db::{link_repo, store};
use crate::error::BookResult;
use crate::model::{linkage, Contact, Event, Id};

/// Links the pair; linking an already-linked pair changes nothing.
pub fn link_event(
    conn: &Connection,
    contact_id: Id<Contact>,
    event_id: Id<Event>,
) -> BookResult<(Contact, Event)> {
    store::with_transaction(conn, |tx| {
        let mut contact = contact_ops::load(tx, contact_id)?;
        let mut event = event_ops::load(tx, event_id)?;
        if linkage::link(&mut contact, &mut event) {
            link_repo::insert(tx, contact_id, event_id)?;
            debug!("event=linked module=ops contact={} event={}", contact_id, event_id);
        }
        Ok((contact, event))
    })
}

/// Unlinks the pair; unlinking a pair that was never linked is not an error.
pub fn unlink_event(
    conn: &Connection,
    contact_id: Id<Contact>,
    event_id: Id<Event>,
) -> BookResult<(Contact, Event)> {
    store::with_transaction(conn, |tx| {
        let mut contact = contact_ops::load(tx, contact_id)?;
        let mut event = event_ops::load(tx, event_id)?;
        if linkage::unlink(&mut contact, &mut event) {
            link_repo::delete(tx, contact_id, event_id)?;
            debug!("event=unlinked module=ops contact={} event={}", contact_id, event_id);
        }
        Ok((contact, event))
    })
}

/// Flips the link. Returns true if the pair is linked afterwards.
pub fn toggle_link(
    conn: &Connection,
    contact_id: Id<Contact>,
    event_id: Id<Event>,
) -> BookResult<bool> {
    store::with_transaction(conn, |tx| {
        let mut contact = contact_ops::load(tx, contact_id)?;
        let mut event = event_ops::load(tx, event_id)?;
        let linked = linkage::toggle(&mut contact, &mut event);
        if linked {
            link_repo::insert(tx, contact_id, event_id)?;
        } else {
            link_repo::delete(tx, contact_id, event_id)?;
        }
        Ok(linked)
    })
}

/// Makes `contact_ids` the event's exact contact set, linking and unlinking
/// as needed. Unknown contact ids fail the whole call.
pub fn set_event_contacts(
    conn: &Connection,
    event_id: Id<Event>,
    contact_ids: &[Id<Contact>],
) -> BookResult<Event> {
    store::with_transaction(conn, |tx| {
        let mut event = event_ops::load(tx, event_id)?;

        let to_remove: Vec<Id<Contact>> = event
            .contact_ids
            .iter()
            .filter(|id| !contact_ids.contains(id))
            .copied()
            .collect();
        for contact_id in to_remove {
            let mut contact = contact_ops::load(tx, contact_id)?;
            linkage::unlink(&mut contact, &mut event);
            link_repo::delete(tx, contact_id, event_id)?;
        }

        for contact_id in contact_ids {
            let mut contact = contact_ops::load(tx, *contact_id)?;
            if linkage::link(&mut contact, &mut event) {
                link_repo::insert(tx, *contact_id, event_id)?;
            }
        }
        Ok(event)
    })
}
