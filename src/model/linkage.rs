//! Contact/event link bookkeeping.
//!
//! Every function here touches both sides of the association, so after any of
//! them returns `event.id ∈ contact.event_ids` holds exactly when
//! `contact.id ∈ event.contact_ids`.

use super::contact::Contact;
use super::event::Event;

/// Links the pair. Returns true if either side changed.
pub fn link(contact: &mut Contact, event: &mut Event) -> bool {
    let mut changed = false;
    if !contact.event_ids.contains(&event.id) {
        contact.event_ids.push(event.id);
        changed = true;
    }
    if !event.contact_ids.contains(&contact.id) {
        event.contact_ids.push(contact.id);
        changed = true;
    }
    changed
}

/// Unlinks the pair. Returns true if either side changed.
pub fn unlink(contact: &mut Contact, event: &mut Event) -> bool {
    let before = contact.event_ids.len() + event.contact_ids.len();
    contact.event_ids.retain(|id| *id != event.id);
    event.contact_ids.retain(|id| *id != contact.id);
    before != contact.event_ids.len() + event.contact_ids.len()
}

/// Links if either side lacks the other, otherwise unlinks. Returns the
/// resulting linked state.
pub fn toggle(contact: &mut Contact, event: &mut Event) -> bool {
    if is_linked(contact, event) {
        unlink(contact, event);
        false
    } else {
        link(contact, event);
        true
    }
}

pub fn is_linked(contact: &Contact, event: &Event) -> bool {
    contact.event_ids.contains(&event.id) && event.contact_ids.contains(&contact.id)
}

/// Removes the contact from every given event and clears its own back-references.
pub fn detach_contact(contact: &mut Contact, events: &mut [Event]) {
    for event in events.iter_mut() {
        event.contact_ids.retain(|id| *id != contact.id);
    }
    contact.event_ids.clear();
}

/// Removes the event from every given contact and clears its own contact set.
pub fn detach_event(event: &mut Event, contacts: &mut [Contact]) {
    for contact in contacts.iter_mut() {
        contact.event_ids.retain(|id| *id != event.id);
    }
    event.contact_ids.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContactPayload;
    use chrono::Utc;

    fn pair() -> (Contact, Event) {
        (
            Contact::create(ContactPayload::named("Ada", "Lovelace")),
            Event::create("Meeting".into(), Utc::now()),
        )
    }

    #[test]
    fn link_sets_both_sides() {
        let (mut c, mut e) = pair();
        assert!(link(&mut c, &mut e));
        assert_eq!(c.event_ids, vec![e.id]);
        assert_eq!(e.contact_ids, vec![c.id]);
    }

    #[test]
    fn link_is_idempotent() {
        let (mut c, mut e) = pair();
        link(&mut c, &mut e);
        assert!(!link(&mut c, &mut e));
        assert_eq!(c.event_ids.len(), 1);
        assert_eq!(e.contact_ids.len(), 1);
    }

    #[test]
    fn link_repairs_half_link() {
        let (mut c, mut e) = pair();
        c.event_ids.push(e.id);
        assert!(link(&mut c, &mut e));
        assert!(is_linked(&c, &e));
        assert_eq!(c.event_ids.len(), 1);
    }

    #[test]
    fn unlink_clears_both_sides() {
        let (mut c, mut e) = pair();
        link(&mut c, &mut e);
        assert!(unlink(&mut c, &mut e));
        assert!(c.event_ids.is_empty());
        assert!(e.contact_ids.is_empty());
    }

    #[test]
    fn unlink_of_unlinked_pair_is_noop() {
        let (mut c, mut e) = pair();
        assert!(!unlink(&mut c, &mut e));
    }

    #[test]
    fn toggle_twice_restores_state() {
        let (mut c, mut e) = pair();
        assert!(toggle(&mut c, &mut e));
        assert!(!toggle(&mut c, &mut e));
        assert!(!is_linked(&c, &e));

        link(&mut c, &mut e);
        toggle(&mut c, &mut e);
        toggle(&mut c, &mut e);
        assert!(is_linked(&c, &e));
    }

    #[test]
    fn detach_contact_leaves_events_with_other_contacts() {
        let (mut ada, mut meeting) = pair();
        let mut grace = Contact::create(ContactPayload::named("Grace", "Hopper"));
        let mut lunch = Event::create("Lunch".into(), Utc::now());
        link(&mut ada, &mut meeting);
        link(&mut ada, &mut lunch);
        link(&mut grace, &mut lunch);

        let mut events = vec![meeting, lunch];
        detach_contact(&mut ada, &mut events);

        assert!(ada.event_ids.is_empty());
        assert!(events[0].contact_ids.is_empty());
        assert_eq!(events[1].contact_ids, vec![grace.id]);
    }

    #[test]
    fn detach_event_clears_contacts() {
        let (mut ada, mut meeting) = pair();
        link(&mut ada, &mut meeting);
        let mut contacts = vec![ada];
        detach_event(&mut meeting, &mut contacts);
        assert!(meeting.contact_ids.is_empty());
        assert!(contacts[0].event_ids.is_empty());
    }
}
