use std::path::Path;

use log::{info, warn};
use rusqlite::Connection;

use super::contact_ops;
use crate::codec::vcard;
use crate::db::{contact_repo, store};
use crate::error::BookResult;
use crate::model::Contact;

#[derive(Debug, Default)]
pub struct ImportStats {
    pub imported: usize,
    pub updated: usize,
    pub failed: usize,
    /// One message per failed payload, in input order.
    pub errors: Vec<String>,
}

#[derive(Debug)]
pub enum ImportOutcome {
    Created(Contact),
    /// A contact with the same external id existed; its payload was replaced.
    Updated(Contact),
}

/// Imports one contact per payload. Each payload is decoded and saved on its
/// own, so a bad one is recorded in the stats and the rest still land.
pub fn import_payloads<B: AsRef<[u8]>>(conn: &Connection, payloads: &[B]) -> ImportStats {
    let mut stats = ImportStats::default();

    for (index, blob) in payloads.iter().enumerate() {
        match import_payload(conn, blob.as_ref()) {
            Ok(ImportOutcome::Created(_)) => stats.imported += 1,
            Ok(ImportOutcome::Updated(_)) => stats.updated += 1,
            Err(e) => {
                warn!("event=import_skip module=ops index={} error={}", index, e);
                stats.failed += 1;
                stats.errors.push(format!("card {}: {}", index + 1, e));
            }
        }
    }

    info!(
        "event=import_done module=ops imported={} updated={} failed={}",
        stats.imported, stats.updated, stats.failed
    );
    stats
}

pub fn import_payload(conn: &Connection, blob: &[u8]) -> BookResult<ImportOutcome> {
    let payload = vcard::try_decode(blob)?;

    let existing = match payload.external_id.as_deref() {
        Some(external_id) => contact_repo::find_by_external_id(conn, external_id)?,
        None => None,
    };

    match existing {
        Some(contact) => {
            let updated = contact_ops::update_payload(conn, contact.id, payload)?;
            Ok(ImportOutcome::Updated(updated))
        }
        None => {
            let contact = Contact::create(payload);
            store::with_transaction(conn, |tx| contact_repo::insert(tx, &contact))?;
            Ok(ImportOutcome::Created(contact))
        }
    }
}

/// Reads a `.vcf` file and imports each card in it.
pub fn import_vcf_file(conn: &Connection, path: &Path) -> BookResult<ImportStats> {
    let text = std::fs::read_to_string(path)?;
    let cards = vcard::split_cards(&text);
    info!(
        "event=import_start module=ops path={} cards={}",
        path.display(),
        cards.len()
    );
    Ok(import_payloads(conn, &cards))
}
