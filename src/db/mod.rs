pub mod schema;
pub mod store;
pub mod contact_repo;
pub mod event_repo;
pub mod link_repo;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::codec::record_decode_failure;
use crate::error::{BookError, BookResult};
use crate::model::Id;

/// Fixed-width UTC form, so text order in SQLite matches time order.
pub(crate) fn time_to_db(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn time_from_db(s: &str, column: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            record_decode_failure(column, &format!("{s}: {e}"));
            None
        }
    }
}

/// Case-insensitive substring pattern for `LOWER(col) LIKE ?1 ESCAPE '\'`.
/// Wildcards in the query match only themselves.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::from("%");
    for c in query.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn parse_id<T>(s: &str) -> BookResult<Id<T>> {
    Id::parse(s).map_err(|e| BookError::Other(format!("Invalid UUID: {}", e)))
}
