use blackbook::db::contact_repo::ContactSortKey;
use blackbook::db::event_repo::EventSortKey;
use blackbook::db::*;
use blackbook::model::*;
use chrono::{Duration, TimeZone, Utc};

fn setup() -> rusqlite::Connection {
    schema::test_connection()
}

fn contact(given: &str, family: &str) -> Contact {
    Contact::create(ContactPayload::named(given, family))
}

fn event_at(title: &str, day: u32, hour: u32) -> Event {
    Event::create(
        title.into(),
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap(),
    )
}

// ==========================================================================
// CONTACT REPO TESTS
// ==========================================================================

#[test]
fn contact_insert_and_find() {
    let conn = setup();
    let mut ada = contact("Ada", "Lovelace");
    ada.payload = ada.payload.with_email("ada@example.com", Some("work"));
    ada.position = Position::Mentor;
    contact_repo::insert(&conn, &ada).unwrap();

    let found = contact_repo::find_by_id(&conn, ada.id).unwrap().unwrap();
    assert_eq!(found.payload, ada.payload);
    assert_eq!(found.position, Position::Mentor);
    assert!(found.event_ids.is_empty());
}

#[test]
fn contact_find_missing_returns_none() {
    let conn = setup();
    assert!(contact_repo::find_by_id(&conn, Id::generate()).unwrap().is_none());
}

#[test]
fn contact_interests_are_stored() {
    let conn = setup();
    let mut ada = contact("Ada", "Lovelace");
    ada.add_predefined_interest(PredefinedInterest::Technology);
    ada.add_predefined_interest(PredefinedInterest::Music);
    ada.add_custom_interest("poetry");
    contact_repo::insert(&conn, &ada).unwrap();

    let found = contact_repo::find_by_id(&conn, ada.id).unwrap().unwrap();
    assert_eq!(found.predefined_interests, ada.predefined_interests);
    assert_eq!(found.custom_interests, vec!["poetry".to_string()]);
}

#[test]
fn contact_update_replaces_interests() {
    let conn = setup();
    let mut ada = contact("Ada", "Lovelace");
    ada.add_custom_interest("poetry");
    contact_repo::insert(&conn, &ada).unwrap();

    ada.remove_custom_interest("poetry");
    ada.add_custom_interest("mathematics");
    ada.payload.nickname = "Enchantress of Numbers".into();
    contact_repo::update(&conn, &ada).unwrap();

    let found = contact_repo::find_by_id(&conn, ada.id).unwrap().unwrap();
    assert_eq!(found.custom_interests, vec!["mathematics".to_string()]);
    assert_eq!(found.payload.nickname, "Enchantress of Numbers");
}

#[test]
fn contact_find_all_sorts_by_family_then_given() {
    let conn = setup();
    contact_repo::insert(&conn, &contact("Grace", "Hopper")).unwrap();
    contact_repo::insert(&conn, &contact("Ada", "Lovelace")).unwrap();
    contact_repo::insert(&conn, &contact("Alan", "Hopper")).unwrap();

    let names: Vec<String> = contact_repo::find_all(&conn, ContactSortKey::BY_NAME)
        .unwrap()
        .iter()
        .map(|c| c.payload.given_name.clone())
        .collect();
    assert_eq!(names, vec!["Alan", "Grace", "Ada"]);
}

#[test]
fn contact_find_all_by_given_name() {
    let conn = setup();
    contact_repo::insert(&conn, &contact("Grace", "Hopper")).unwrap();
    contact_repo::insert(&conn, &contact("Ada", "Lovelace")).unwrap();

    let all = contact_repo::find_all(&conn, &[ContactSortKey::GivenName]).unwrap();
    assert_eq!(all[0].payload.given_name, "Ada");
}

#[test]
fn contact_find_by_name_is_case_insensitive_and_partial() {
    let conn = setup();
    contact_repo::insert(&conn, &contact("Ada", "Lovelace")).unwrap();
    contact_repo::insert(&conn, &contact("Grace", "Hopper")).unwrap();

    let found = contact_repo::find_by_name(&conn, "LOVE").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].payload.family_name, "Lovelace");

    let full = contact_repo::find_by_name(&conn, "ada lovelace").unwrap();
    assert_eq!(full.len(), 1);
}

#[test]
fn contact_find_by_name_treats_wildcards_literally() {
    let conn = setup();
    contact_repo::insert(&conn, &contact("Ada", "Lovelace")).unwrap();
    contact_repo::insert(&conn, &contact("Mary_Jane", "Watson")).unwrap();
    contact_repo::insert(&conn, &contact("Percy", "100%")).unwrap();

    let underscore = contact_repo::find_by_name(&conn, "_").unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].payload.given_name, "Mary_Jane");

    let percent = contact_repo::find_by_name(&conn, "%").unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].payload.given_name, "Percy");

    assert!(contact_repo::find_by_name(&conn, "a_a").unwrap().is_empty());
}

#[test]
fn contact_find_by_external_id() {
    let conn = setup();
    let mut ada = contact("Ada", "Lovelace");
    ada.payload.external_id = Some("urn:uuid:ada".into());
    contact_repo::insert(&conn, &ada).unwrap();

    let found = contact_repo::find_by_external_id(&conn, "urn:uuid:ada")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, ada.id);
    assert!(contact_repo::find_by_external_id(&conn, "urn:uuid:nobody")
        .unwrap()
        .is_none());
}

#[test]
fn unknown_position_label_decodes_to_fallback() {
    let conn = setup();
    let ada = contact("Ada", "Lovelace");
    contact_repo::insert(&conn, &ada).unwrap();
    conn.execute(
        "UPDATE contacts SET position = 'archenemy' WHERE id = ?1",
        [ada.id.to_db()],
    )
    .unwrap();

    let found = contact_repo::find_by_id(&conn, ada.id).unwrap().unwrap();
    assert_eq!(found.position, Position::Unknown);
}

#[test]
fn corrupt_payload_decodes_to_empty() {
    let conn = setup();
    let ada = contact("Ada", "Lovelace");
    contact_repo::insert(&conn, &ada).unwrap();
    conn.execute(
        "UPDATE contacts SET payload = x'00ff00' WHERE id = ?1",
        [ada.id.to_db()],
    )
    .unwrap();

    let before = blackbook::codec::decode_failure_count();
    let found = contact_repo::find_by_id(&conn, ada.id).unwrap().unwrap();
    assert_eq!(found.payload, ContactPayload::default());
    assert!(blackbook::codec::decode_failure_count() > before);
}

// ==========================================================================
// EVENT REPO TESTS
// ==========================================================================

#[test]
fn event_insert_and_find() {
    let conn = setup();
    let mut e = event_at("Meeting", 2, 14);
    e.end = Some(e.start + Duration::hours(1));
    e.location = Some("Library".into());
    event_repo::insert(&conn, &e).unwrap();

    let found = event_repo::find_by_id(&conn, e.id).unwrap().unwrap();
    assert_eq!(found.title, "Meeting");
    assert_eq!(found.start, e.start);
    assert_eq!(found.end, e.end);
    assert_eq!(found.location.as_deref(), Some("Library"));
    assert!(!found.is_all_day);
}

#[test]
fn event_update() {
    let conn = setup();
    let mut e = event_at("Meeting", 2, 14);
    event_repo::insert(&conn, &e).unwrap();

    e.title = "Standup".into();
    e.is_all_day = true;
    event_repo::update(&conn, &e).unwrap();

    let found = event_repo::find_by_id(&conn, e.id).unwrap().unwrap();
    assert_eq!(found.title, "Standup");
    assert!(found.is_all_day);
}

#[test]
fn event_find_all_sort_keys() {
    let conn = setup();
    event_repo::insert(&conn, &event_at("Breakfast", 5, 8)).unwrap();
    event_repo::insert(&conn, &event_at("Concert", 1, 20)).unwrap();
    event_repo::insert(&conn, &event_at("Audit", 3, 9)).unwrap();

    let titles = |sort: &[EventSortKey]| -> Vec<String> {
        event_repo::find_all(&conn, sort)
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect()
    };
    assert_eq!(titles(EventSortKey::CHRONOLOGICAL), vec!["Concert", "Audit", "Breakfast"]);
    assert_eq!(
        titles(&[EventSortKey::StartDateDescending]),
        vec!["Breakfast", "Audit", "Concert"]
    );
    assert_eq!(titles(&[EventSortKey::Title]), vec!["Audit", "Breakfast", "Concert"]);
}

#[test]
fn event_find_starting_before() {
    let conn = setup();
    event_repo::insert(&conn, &event_at("Early", 1, 9)).unwrap();
    event_repo::insert(&conn, &event_at("Late", 20, 9)).unwrap();

    let cutoff = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
    let found = event_repo::find_starting_before(&conn, cutoff).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Early");
}

#[test]
fn event_find_by_title_treats_wildcards_literally() {
    let conn = setup();
    event_repo::insert(&conn, &event_at("Standup", 2, 9)).unwrap();
    event_repo::insert(&conn, &event_at("Q3_review", 3, 9)).unwrap();
    event_repo::insert(&conn, &event_at("50% sale", 4, 9)).unwrap();

    let underscore = event_repo::find_by_title(&conn, "_").unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].title, "Q3_review");

    let percent = event_repo::find_by_title(&conn, "%").unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].title, "50% sale");

    assert_eq!(event_repo::find_by_title(&conn, "UP").unwrap().len(), 1);
}

// ==========================================================================
// LINK REPO TESTS
// ==========================================================================

#[test]
fn link_insert_is_idempotent() {
    let conn = setup();
    let ada = contact("Ada", "Lovelace");
    let e = event_at("Meeting", 2, 14);
    contact_repo::insert(&conn, &ada).unwrap();
    event_repo::insert(&conn, &e).unwrap();

    assert!(link_repo::insert(&conn, ada.id, e.id).unwrap());
    assert!(!link_repo::insert(&conn, ada.id, e.id).unwrap());
    assert_eq!(link_repo::count(&conn).unwrap(), 1);
}

#[test]
fn links_hydrate_on_both_sides() {
    let conn = setup();
    let ada = contact("Ada", "Lovelace");
    let e = event_at("Meeting", 2, 14);
    contact_repo::insert(&conn, &ada).unwrap();
    event_repo::insert(&conn, &e).unwrap();
    link_repo::insert(&conn, ada.id, e.id).unwrap();

    let c = contact_repo::find_by_id(&conn, ada.id).unwrap().unwrap();
    let ev = event_repo::find_by_id(&conn, e.id).unwrap().unwrap();
    assert_eq!(c.event_ids, vec![e.id]);
    assert_eq!(ev.contact_ids, vec![ada.id]);
}

#[test]
fn link_delete_reports_whether_removed() {
    let conn = setup();
    let ada = contact("Ada", "Lovelace");
    let e = event_at("Meeting", 2, 14);
    contact_repo::insert(&conn, &ada).unwrap();
    event_repo::insert(&conn, &e).unwrap();

    assert!(!link_repo::delete(&conn, ada.id, e.id).unwrap());
    link_repo::insert(&conn, ada.id, e.id).unwrap();
    assert!(link_repo::delete(&conn, ada.id, e.id).unwrap());
    assert!(!link_repo::exists(&conn, ada.id, e.id).unwrap());
}

#[test]
fn event_ids_for_contact_are_chronological() {
    let conn = setup();
    let ada = contact("Ada", "Lovelace");
    let later = event_at("Later", 9, 9);
    let sooner = event_at("Sooner", 1, 9);
    contact_repo::insert(&conn, &ada).unwrap();
    event_repo::insert(&conn, &later).unwrap();
    event_repo::insert(&conn, &sooner).unwrap();
    link_repo::insert(&conn, ada.id, later.id).unwrap();
    link_repo::insert(&conn, ada.id, sooner.id).unwrap();

    let ids = link_repo::event_ids_for_contact(&conn, ada.id).unwrap();
    assert_eq!(ids, vec![sooner.id, later.id]);
}

#[test]
fn deleting_contact_row_cascades_links() {
    let conn = setup();
    let ada = contact("Ada", "Lovelace");
    let e = event_at("Meeting", 2, 14);
    contact_repo::insert(&conn, &ada).unwrap();
    event_repo::insert(&conn, &e).unwrap();
    link_repo::insert(&conn, ada.id, e.id).unwrap();

    contact_repo::delete(&conn, ada.id).unwrap();
    assert_eq!(link_repo::count(&conn).unwrap(), 0);
    assert!(event_repo::find_by_id(&conn, e.id).unwrap().is_some());
}

// ==========================================================================
// STORE TESTS
// ==========================================================================

#[test]
fn store_reopens_saved_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.db");
    let ada = contact("Ada", "Lovelace");
    {
        let conn = store::open(&path).unwrap();
        store::with_transaction(&conn, |tx| contact_repo::insert(tx, &ada)).unwrap();
    }

    let conn = store::open(&path).unwrap();
    let found = contact_repo::find_by_id(&conn, ada.id).unwrap().unwrap();
    assert_eq!(found.payload.given_name, "Ada");
}
