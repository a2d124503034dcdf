use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{like_pattern, link_repo, parse_id, time_from_db, time_to_db};
use crate::error::BookResult;
use crate::model::{Event, Id};

/// Sort keys for event listings, applied in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSortKey {
    StartDate,
    StartDateDescending,
    Title,
}

impl EventSortKey {
    pub const CHRONOLOGICAL: &'static [EventSortKey] = &[EventSortKey::StartDate];

    fn order_term(&self) -> &'static str {
        match self {
            EventSortKey::StartDate => "start_date ASC",
            EventSortKey::StartDateDescending => "start_date DESC",
            EventSortKey::Title => "title COLLATE NOCASE",
        }
    }
}

const EVENT_COLUMNS: &str = "id, title, notes, location, is_all_day, start_date, end_date";

pub fn insert(conn: &Connection, event: &Event) -> BookResult<()> {
    conn.execute(
        "INSERT INTO events (id, title, notes, location, is_all_day, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.id.to_db(),
            event.title,
            event.notes,
            event.location,
            event.is_all_day as i32,
            time_to_db(event.start),
            event.end.map(time_to_db),
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, event: &Event) -> BookResult<()> {
    conn.execute(
        "UPDATE events SET title = ?1, notes = ?2, location = ?3, is_all_day = ?4,
         start_date = ?5, end_date = ?6
         WHERE id = ?7",
        params![
            event.title,
            event.notes,
            event.location,
            event.is_all_day as i32,
            time_to_db(event.start),
            event.end.map(time_to_db),
            event.id.to_db(),
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, event_id: Id<Event>) -> BookResult<()> {
    conn.execute(
        "DELETE FROM events WHERE id = ?1",
        params![event_id.to_db()],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Event>) -> BookResult<Option<Event>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id.to_db()], row_to_columns);

    match result {
        Ok(columns) => Ok(Some(hydrate(conn, columns)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All events ordered by `sort`, with `id` as the final tie-breaker.
pub fn find_all(conn: &Connection, sort: &[EventSortKey]) -> BookResult<Vec<Event>> {
    let mut order: Vec<&str> = sort.iter().map(|k| k.order_term()).collect();
    order.push("id");
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM events ORDER BY {}",
        order.join(", ")
    ))?;

    let rows = stmt
        .query_map([], row_to_columns)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(|columns| hydrate(conn, columns)).collect()
}

/// Events starting no later than `to`, earliest first. Overlap with `from`
/// depends on all-day handling, so the lower bound is applied in memory.
pub fn find_starting_before(conn: &Connection, to: DateTime<Utc>) -> BookResult<Vec<Event>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE start_date <= ?1 ORDER BY start_date, id"
    ))?;

    let rows = stmt
        .query_map(params![time_to_db(to)], row_to_columns)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(|columns| hydrate(conn, columns)).collect()
}

pub fn find_by_title(conn: &Connection, query: &str) -> BookResult<Vec<Event>> {
    let pattern = like_pattern(query);
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE LOWER(title) LIKE ?1 ESCAPE '\\'
         ORDER BY start_date, id"
    ))?;

    let rows = stmt
        .query_map(params![pattern], row_to_columns)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(|columns| hydrate(conn, columns)).collect()
}

pub fn count(conn: &Connection) -> BookResult<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
    Ok(n as usize)
}

type EventColumns = (
    String,
    String,
    Option<String>,
    Option<String>,
    i32,
    String,
    Option<String>,
);

fn row_to_columns(row: &rusqlite::Row) -> rusqlite::Result<EventColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn hydrate(conn: &Connection, columns: EventColumns) -> BookResult<Event> {
    let (id_str, title, notes, location, is_all_day, start, end) = columns;
    let id: Id<Event> = parse_id(&id_str)?;

    Ok(Event {
        id,
        title,
        notes,
        location,
        is_all_day: is_all_day != 0,
        start: time_from_db(&start, "events.start_date").unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        end: end.and_then(|e| time_from_db(&e, "events.end_date")),
        contact_ids: link_repo::contact_ids_for_event(conn, id)?,
    })
}
