use blackbook::db::contact_repo::ContactSortKey;
use blackbook::db::event_repo::EventSortKey;
use blackbook::db::schema;
use blackbook::display;
use blackbook::model::*;
use blackbook::ops::*;
use blackbook::queries::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::Connection;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn add(conn: &Connection, given: &str, family: &str) -> Contact {
    contact_ops::add_contact(conn, ContactPayload::named(given, family)).unwrap()
}

fn add_event(conn: &Connection, title: &str, start: DateTime<Utc>, all_day: bool) -> Event {
    event_ops::add_event(conn, title, start, None, all_day, None, None).unwrap()
}

// ==========================================================================
// CONTACT QUERIES
// ==========================================================================

#[test]
fn find_by_interest_matches_predefined_and_custom() {
    let conn = schema::test_connection();
    let ada = add(&conn, "Ada", "Lovelace");
    let grace = add(&conn, "Grace", "Hopper");
    add(&conn, "Alan", "Turing");
    contact_ops::add_predefined_interest(&conn, ada.id, PredefinedInterest::Music).unwrap();
    contact_ops::add_custom_interest(&conn, grace.id, "music").unwrap();

    let found = contact_queries::find_by_interest(&conn, "MUSIC").unwrap();
    let ids: Vec<_> = found.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![grace.id, ada.id]);
}

#[test]
fn with_position_filters() {
    let conn = schema::test_connection();
    let ada = add(&conn, "Ada", "Lovelace");
    add(&conn, "Grace", "Hopper");
    contact_ops::set_position(&conn, ada.id, Position::Family).unwrap();

    let family = contact_queries::with_position(&conn, Position::Family).unwrap();
    assert_eq!(family.len(), 1);
    assert_eq!(family[0].id, ada.id);
    assert_eq!(
        contact_queries::with_position(&conn, Position::Unknown).unwrap().len(),
        1
    );
}

#[test]
fn contacts_sorted_by_position_then_name() {
    let conn = schema::test_connection();
    let ada = add(&conn, "Ada", "Lovelace");
    let grace = add(&conn, "Grace", "Hopper");
    contact_ops::set_position(&conn, ada.id, Position::Colleague).unwrap();
    contact_ops::set_position(&conn, grace.id, Position::Friend).unwrap();

    let sorted = contact_queries::contacts_sorted(
        &conn,
        &[ContactSortKey::Position, ContactSortKey::FamilyName],
    )
    .unwrap();
    assert_eq!(sorted[0].id, ada.id);
}

#[test]
fn events_for_unknown_contact_is_empty() {
    let conn = schema::test_connection();
    assert!(contact_queries::events_for_contact(&conn, Id::generate())
        .unwrap()
        .is_empty());
}

// ==========================================================================
// EVENT QUERIES
// ==========================================================================

#[test]
fn events_between_counts_whole_all_day_events() {
    let conn = schema::test_connection();
    add_event(&conn, "Holiday", at(10, 0), true);
    add_event(&conn, "Call", at(10, 9), false);
    add_event(&conn, "Later", at(12, 9), false);

    let evening = events_between(&conn, at(10, 18), at(10, 20));
    assert_eq!(evening, vec!["Holiday"]);

    let day = events_between(&conn, at(10, 0), at(11, 0));
    assert_eq!(day, vec!["Holiday", "Call"]);
}

fn events_between(conn: &Connection, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<String> {
    event_queries::events_between(conn, from, to)
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect()
}

#[test]
fn all_day_event_stays_upcoming_for_its_whole_day() {
    let conn = schema::test_connection();
    let holiday = add_event(&conn, "Holiday", at(2, 0), true);

    for hour in [0, 10, 23] {
        let found = event_queries::upcoming(&conn, at(2, hour), 10).unwrap();
        assert_eq!(found.len(), 1, "hour {hour}");
        assert_eq!(found[0].id, holiday.id);
    }
    assert!(event_queries::upcoming(&conn, at(3, 0), 10).unwrap().is_empty());
}

#[test]
fn all_day_start_is_stored_as_its_date() {
    let conn = schema::test_connection();
    let e = add_event(&conn, "Offsite", at(2, 0) + Duration::hours(15), true);
    assert_eq!(e.start, at(2, 0));

    let stored = event_queries::get_event(&conn, e.id).unwrap().unwrap();
    assert_eq!(stored.start, at(2, 0));
    assert_eq!(events_between(&conn, at(2, 20), at(2, 21)), vec!["Offsite"]);
}

#[test]
fn upcoming_skips_finished_events_and_limits() {
    let conn = schema::test_connection();
    add_event(&conn, "Past", at(1, 9), false);
    add_event(&conn, "Soon", at(5, 9), false);
    add_event(&conn, "Later", at(9, 9), false);

    let upcoming = event_queries::upcoming(&conn, at(3, 0), 1).unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].title, "Soon");
}

#[test]
fn events_sorted_newest_first() {
    let conn = schema::test_connection();
    add_event(&conn, "First", at(1, 9), false);
    add_event(&conn, "Second", at(2, 9), false);

    let sorted = event_queries::events_sorted(&conn, &[EventSortKey::StartDateDescending]).unwrap();
    assert_eq!(sorted[0].title, "Second");
}

#[test]
fn contacts_for_event_ordered_by_name() {
    let conn = schema::test_connection();
    let ada = add(&conn, "Ada", "Lovelace");
    let grace = add(&conn, "Grace", "Hopper");
    let e = add_event(&conn, "Panel", at(4, 15), false);
    link_ops::link_event(&conn, ada.id, e.id).unwrap();
    link_ops::link_event(&conn, grace.id, e.id).unwrap();

    let names: Vec<String> = event_queries::contacts_for_event(&conn, e.id)
        .unwrap()
        .iter()
        .map(display::contact_name)
        .collect();
    assert_eq!(names, vec!["Grace Hopper", "Ada Lovelace"]);
}

// ==========================================================================
// STATS
// ==========================================================================

#[test]
fn book_stats_counts_rows() {
    let conn = schema::test_connection();
    let ada = add(&conn, "Ada", "Lovelace");
    let e = event_ops::add_event(
        &conn,
        "Meeting",
        at(2, 14),
        Some(at(2, 14) + Duration::hours(1)),
        false,
        None,
        None,
    )
    .unwrap();
    link_ops::link_event(&conn, ada.id, e.id).unwrap();

    let stats = stats_queries::book_stats(&conn).unwrap();
    assert_eq!(stats.contacts, 1);
    assert_eq!(stats.events, 1);
    assert_eq!(stats.links, 1);
}
