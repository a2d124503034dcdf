//! Read-only strings derived from entity state for the presentation layer.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{Contact, ContactPayload, Event};

/// "Given Family", whichever parts exist, or "Untitled".
pub fn full_name(payload: &ContactPayload) -> String {
    let name = [payload.given_name.trim(), payload.family_name.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        "Untitled".to_string()
    } else {
        name
    }
}

pub fn contact_name(contact: &Contact) -> String {
    full_name(&contact.payload)
}

/// Comma-separated interests, predefined first.
pub fn interest_summary(contact: &Contact) -> String {
    contact.interest_labels().join(", ")
}

/// Human-readable time span in the given zone. All-day events show their
/// stored dates, the same in every zone.
pub fn format_date_range<Tz: TimeZone>(event: &Event, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if event.is_all_day {
        let first = event.start.date_naive();
        return match event.end.map(|e| e.date_naive()) {
            Some(last) if last != first => format!(
                "{} – {} (all day)",
                first.format("%a %b %-d, %Y"),
                last.format("%a %b %-d, %Y")
            ),
            _ => format!("{} (all day)", first.format("%a %b %-d, %Y")),
        };
    }

    let start = event.start.with_timezone(tz);
    let end = event.end.map(|e| e.with_timezone(tz));

    match end {
        None => start.format("%a %b %-d, %Y %H:%M").to_string(),
        Some(end) if end.date_naive() == start.date_naive() => format!(
            "{} – {}",
            start.format("%a %b %-d, %Y %H:%M"),
            end.format("%H:%M")
        ),
        Some(end) => format!(
            "{} – {}",
            start.format("%a %b %-d, %Y %H:%M"),
            end.format("%a %b %-d, %Y %H:%M")
        ),
    }
}

/// One-line listing: title, when, where.
pub fn event_summary<Tz: TimeZone>(event: &Event, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let title = if event.title.trim().is_empty() {
        "(untitled event)"
    } else {
        event.title.as_str()
    };
    match &event.location {
        Some(loc) => format!("{} | {} @ {}", title, format_date_range(event, tz), loc),
        None => format!("{} | {}", title, format_date_range(event, tz)),
    }
}

pub fn format_utc_date_range(event: &Event) -> String {
    format_date_range(event, &Utc)
}

pub fn is_past(event: &Event, now: DateTime<Utc>) -> bool {
    event.effective_end() < now
}
