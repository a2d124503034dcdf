use rusqlite::Connection;

use crate::codec;
use crate::db::{contact_repo, event_repo, link_repo};
use crate::error::BookResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookStats {
    pub contacts: usize,
    pub events: usize,
    pub links: usize,
    /// Decode fallbacks taken by this process so far.
    pub decode_failures: u64,
}

pub fn book_stats(conn: &Connection) -> BookResult<BookStats> {
    Ok(BookStats {
        contacts: contact_repo::count(conn)?,
        events: event_repo::count(conn)?,
        links: link_repo::count(conn)?,
        decode_failures: codec::decode_failure_count(),
    })
}
