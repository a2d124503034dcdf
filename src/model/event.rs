use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::contact::Contact;
use super::ids::Id;

/// A calendar entry that can be linked to any number of contacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Id<Event>,
    pub title: String,
    pub notes: Option<String>,
    pub location: Option<String>,
    /// When set, `start` and `end` are calendar dates held as UTC midnight,
    /// independent of the viewer's zone.
    pub is_all_day: bool,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    /// Maintained by `linkage`; never edit directly.
    pub contact_ids: Vec<Id<Contact>>,
}

impl Event {
    pub fn create(title: String, start: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            title,
            notes: None,
            location: None,
            is_all_day: false,
            start,
            end: None,
            contact_ids: Vec::new(),
        }
    }

    /// The instant the event stops occupying time. All-day events run to the
    /// end of their last day; open-ended timed events end where they start.
    pub fn effective_end(&self) -> DateTime<Utc> {
        let last = self.end.unwrap_or(self.start);
        if self.is_all_day {
            let day = last.date_naive();
            match day.succ_opt().and_then(|d| d.and_hms_opt(0, 0, 0)) {
                Some(next_midnight) => next_midnight.and_utc() - Duration::nanoseconds(1),
                None => last,
            }
        } else {
            last
        }
    }

    /// Moves `start` and `end` to UTC midnight of their dates when all-day.
    pub fn normalize_all_day(&mut self) {
        if self.is_all_day {
            self.start = utc_midnight(self.start);
            self.end = self.end.map(utc_midnight);
        }
    }

    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.start <= to && self.effective_end() >= from
    }

    pub fn has_contact(&self, contact_id: Id<Contact>) -> bool {
        self.contact_ids.contains(&contact_id)
    }
}

fn utc_midnight(t: DateTime<Utc>) -> DateTime<Utc> {
    t.date_naive().and_time(NaiveTime::MIN).and_utc()
}
