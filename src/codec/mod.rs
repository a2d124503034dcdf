//! Storage encodings for enum labels and contact payloads.
//!
//! Decoding on the load path never fails: bad input resolves to a default,
//! is logged at `warn`, and bumps a process-wide counter so corruption stays
//! observable.

pub mod labels;
pub mod vcard;

use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;

static DECODE_FAILURES: AtomicU64 = AtomicU64::new(0);

/// Number of decode fallbacks taken since process start.
pub fn decode_failure_count() -> u64 {
    DECODE_FAILURES.load(Ordering::Relaxed)
}

pub(crate) fn record_decode_failure(what: &str, detail: &str) {
    DECODE_FAILURES.fetch_add(1, Ordering::Relaxed);
    warn!("event=decode_fallback module=codec what={} detail={}", what, detail);
}
