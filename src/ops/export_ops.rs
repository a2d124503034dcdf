use std::path::Path;

use log::info;
use rusqlite::Connection;
use serde::Serialize;

use crate::codec::vcard;
use crate::db::contact_repo::{self, ContactSortKey};
use crate::db::event_repo::{self, EventSortKey};
use crate::error::BookResult;
use crate::model::{Contact, Event};

/// Every contact as one vCard document, in name order.
pub fn export_vcf(conn: &Connection) -> BookResult<Vec<u8>> {
    vcf_document(conn).map(|(bytes, _)| bytes)
}

/// Writes `export_vcf` to `path`. Returns the number of contacts written.
pub fn export_vcf_file(conn: &Connection, path: &Path) -> BookResult<usize> {
    let (bytes, count) = vcf_document(conn)?;
    std::fs::write(path, bytes)?;
    info!(
        "event=export_done module=ops format=vcf path={} contacts={}",
        path.display(),
        count
    );
    Ok(count)
}

fn vcf_document(conn: &Connection) -> BookResult<(Vec<u8>, usize)> {
    let contacts = contact_repo::find_all(conn, ContactSortKey::BY_NAME)?;
    let bytes = vcard::encode_many(contacts.iter().map(|c| &c.payload));
    Ok((bytes, contacts.len()))
}

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    contacts: &'a [Contact],
    events: &'a [Event],
}

/// Full snapshot of the book, links included, as pretty JSON.
pub fn export_json(conn: &Connection) -> BookResult<String> {
    let contacts = contact_repo::find_all(conn, ContactSortKey::BY_NAME)?;
    let events = event_repo::find_all(conn, EventSortKey::CHRONOLOGICAL)?;
    let json = serde_json::to_string_pretty(&Snapshot {
        contacts: &contacts,
        events: &events,
    })?;
    Ok(json)
}
