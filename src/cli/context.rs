use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rusqlite::Connection;
use std::io::{self, Write};

use crate::display;
use crate::error::BookError;
use crate::model::*;
use crate::queries::*;

pub struct CLIContext {
    pub conn: Connection,
}

/// A parsed date/time typed at the prompt.
pub struct When {
    pub at: DateTime<Utc>,
    /// True when only a date was given.
    pub date_only: bool,
}

impl CLIContext {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Read a line, trimmed.
    pub fn prompt(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).map(|s| s.trim().to_string())
    }

    pub fn confirm(&self, prompt: &str) -> bool {
        matches!(self.prompt(prompt), Some(s) if s.eq_ignore_ascii_case("y"))
    }

    /// Uses `args` if given, otherwise asks.
    pub fn arg_or_prompt(&self, args: &str, prompt: &str) -> Option<String> {
        if args.trim().is_empty() {
            self.prompt(prompt).filter(|s| !s.is_empty())
        } else {
            Some(args.trim().to_string())
        }
    }

    /// Find a contact by name query. Prints why when there is no single match.
    pub fn find_contact(&self, args: &str) -> Option<Contact> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }

        let matches = contact_queries::find_by_name(&self.conn, query).unwrap_or_default();

        match matches.len() {
            0 => {
                println!("No contact found matching '{}'", query);
                None
            }
            1 => matches.into_iter().next(),
            _ => {
                if let Some(exact) = matches
                    .iter()
                    .find(|c| display::contact_name(c).eq_ignore_ascii_case(query))
                {
                    return Some(exact.clone());
                }
                println!("Multiple matches found:");
                for c in &matches {
                    println!("  {}", display::contact_name(c));
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    /// Find an event by title query.
    pub fn find_event(&self, args: &str) -> Option<Event> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }

        let matches = event_queries::find_by_title(&self.conn, query).unwrap_or_default();

        match matches.len() {
            0 => {
                println!("No event found matching '{}'", query);
                None
            }
            1 => matches.into_iter().next(),
            _ => {
                if let Some(exact) = matches.iter().find(|e| e.title.eq_ignore_ascii_case(query)) {
                    return Some(exact.clone());
                }
                println!("Multiple matches found:");
                for e in &matches {
                    println!("  {}", display::event_summary(e, &Local));
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    /// Accepts `YYYY-MM-DD HH:MM` in local time, or a bare `YYYY-MM-DD`
    /// calendar date, which is kept as UTC midnight of that date.
    pub fn parse_when(input: &str) -> Option<When> {
        let input = input.trim();
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
            let at = Local.from_local_datetime(&naive).earliest()?;
            return Some(When {
                at: at.with_timezone(&Utc),
                date_only: false,
            });
        }
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
        Some(When {
            at: date.and_hms_opt(0, 0, 0)?.and_utc(),
            date_only: true,
        })
    }

    /// Print an error.
    pub fn print_error(&self, e: &BookError) {
        println!("Error: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_date_is_utc_midnight_of_that_date() {
        let when = CLIContext::parse_when("2026-03-02").unwrap();
        assert!(when.date_only);
        assert_eq!(when.at, Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn date_and_time_is_not_date_only() {
        let when = CLIContext::parse_when("2026-03-02 09:30").unwrap();
        assert!(!when.date_only);
    }

    #[test]
    fn nonsense_is_rejected() {
        assert!(CLIContext::parse_when("next tuesday").is_none());
    }
}
