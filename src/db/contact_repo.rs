use chrono::Utc;
use rusqlite::{params, Connection};

use super::{like_pattern, link_repo, parse_id, time_from_db, time_to_db};
use crate::codec::labels::{decode_optional_label, decode_label, StoredLabel};
use crate::codec::vcard;
use crate::error::BookResult;
use crate::model::{Contact, Id, InterestSet, Position, PredefinedInterest};

/// Sort keys for contact listings, applied in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSortKey {
    FamilyName,
    GivenName,
    Position,
    CreatedAt,
}

impl ContactSortKey {
    /// Family name, then given name.
    pub const BY_NAME: &'static [ContactSortKey] =
        &[ContactSortKey::FamilyName, ContactSortKey::GivenName];

    fn order_term(&self) -> &'static str {
        match self {
            ContactSortKey::FamilyName => "family_name COLLATE NOCASE",
            ContactSortKey::GivenName => "given_name COLLATE NOCASE",
            ContactSortKey::Position => "position",
            ContactSortKey::CreatedAt => "created_at",
        }
    }
}

const CONTACT_COLUMNS: &str = "id, position, payload, created_at";

pub fn insert(conn: &Connection, contact: &Contact) -> BookResult<()> {
    conn.execute(
        "INSERT INTO contacts (id, given_name, family_name, position, external_id, payload, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            contact.id.to_db(),
            contact.payload.given_name,
            contact.payload.family_name,
            contact.position.to_db_str(),
            contact.payload.external_id,
            vcard::encode(&contact.payload),
            time_to_db(contact.created_at),
        ],
    )?;
    write_interests(conn, contact)
}

/// Writes every stored column and replaces the interests. Links are left
/// alone; they only change through `link_repo`.
pub fn update(conn: &Connection, contact: &Contact) -> BookResult<()> {
    conn.execute(
        "UPDATE contacts SET given_name = ?1, family_name = ?2, position = ?3, external_id = ?4,
         payload = ?5, updated_at = datetime('now')
         WHERE id = ?6",
        params![
            contact.payload.given_name,
            contact.payload.family_name,
            contact.position.to_db_str(),
            contact.payload.external_id,
            vcard::encode(&contact.payload),
            contact.id.to_db(),
        ],
    )?;
    conn.execute(
        "DELETE FROM contact_interests WHERE contact_id = ?1",
        params![contact.id.to_db()],
    )?;
    write_interests(conn, contact)
}

pub fn delete(conn: &Connection, contact_id: Id<Contact>) -> BookResult<()> {
    conn.execute(
        "DELETE FROM contacts WHERE id = ?1",
        params![contact_id.to_db()],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Contact>) -> BookResult<Option<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id.to_db()], row_to_columns);

    match result {
        Ok(columns) => Ok(Some(hydrate(conn, columns)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_external_id(conn: &Connection, external_id: &str) -> BookResult<Option<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE external_id = ?1 LIMIT 1"
    ))?;

    let result = stmt.query_row(params![external_id], row_to_columns);

    match result {
        Ok(columns) => Ok(Some(hydrate(conn, columns)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All contacts ordered by `sort`, with `id` as the final tie-breaker.
pub fn find_all(conn: &Connection, sort: &[ContactSortKey]) -> BookResult<Vec<Contact>> {
    let mut order: Vec<&str> = sort.iter().map(|k| k.order_term()).collect();
    order.push("id");
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY {}",
        order.join(", ")
    ))?;

    let rows = stmt
        .query_map([], row_to_columns)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(|columns| hydrate(conn, columns)).collect()
}

pub fn find_by_name(conn: &Connection, query: &str) -> BookResult<Vec<Contact>> {
    let pattern = like_pattern(query);
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts
         WHERE LOWER(given_name) LIKE ?1 ESCAPE '\\'
            OR LOWER(family_name) LIKE ?1 ESCAPE '\\'
            OR LOWER(given_name || ' ' || family_name) LIKE ?1 ESCAPE '\\'
         ORDER BY family_name COLLATE NOCASE, given_name COLLATE NOCASE, id"
    ))?;

    let rows = stmt
        .query_map(params![pattern], row_to_columns)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(|columns| hydrate(conn, columns)).collect()
}

pub fn count(conn: &Connection) -> BookResult<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
    Ok(n as usize)
}

type ContactColumns = (String, Option<String>, Vec<u8>, String);

fn row_to_columns(row: &rusqlite::Row) -> rusqlite::Result<ContactColumns> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn hydrate(conn: &Connection, columns: ContactColumns) -> BookResult<Contact> {
    let (id_str, position, payload, created_at) = columns;
    let id: Id<Contact> = parse_id(&id_str)?;
    let (predefined_interests, custom_interests) = find_interests(conn, id)?;

    Ok(Contact {
        id,
        position: decode_optional_label::<Position>(position.as_deref()),
        predefined_interests,
        custom_interests,
        payload: vcard::decode(&payload),
        event_ids: link_repo::event_ids_for_contact(conn, id)?,
        created_at: time_from_db(&created_at, "contacts.created_at").unwrap_or_else(Utc::now),
    })
}

fn write_interests(conn: &Connection, contact: &Contact) -> BookResult<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO contact_interests (contact_id, kind, value, ordinal)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (i, interest) in contact.predefined_interests.iter().enumerate() {
        stmt.execute(params![contact.id.to_db(), "predefined", interest.to_db_str(), i as i64])?;
    }
    for (i, interest) in contact.custom_interests.iter().enumerate() {
        stmt.execute(params![contact.id.to_db(), "custom", interest, i as i64])?;
    }
    Ok(())
}

fn find_interests(conn: &Connection, id: Id<Contact>) -> BookResult<(InterestSet, Vec<String>)> {
    let mut stmt = conn.prepare(
        "SELECT kind, value FROM contact_interests WHERE contact_id = ?1 ORDER BY kind, ordinal",
    )?;
    let rows = stmt
        .query_map(params![id.to_db()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut predefined = InterestSet::new();
    let mut custom = Vec::new();
    for (kind, value) in rows {
        if kind == "predefined" {
            predefined.insert(decode_label::<PredefinedInterest>(&value));
        } else {
            custom.push(value);
        }
    }
    Ok((predefined, custom))
}
