use super::record_decode_failure;

/// A closed enumeration persisted by stable string label rather than ordinal.
pub trait StoredLabel: Sized + Copy + 'static {
    /// Short name used in diagnostics.
    const KIND: &'static str;
    /// Value an unrecognized label decodes to.
    const FALLBACK: Self;

    fn to_db_str(&self) -> &'static str;
    fn from_db_str(s: &str) -> Option<Self>;
}

/// Decodes a stored label, falling back instead of failing.
pub fn decode_label<T: StoredLabel>(s: &str) -> T {
    match T::from_db_str(s) {
        Some(value) => value,
        None => {
            record_decode_failure(T::KIND, s);
            T::FALLBACK
        }
    }
}

/// Like `decode_label`, but a missing column is the fallback without being
/// counted as corruption.
pub fn decode_optional_label<T: StoredLabel>(s: Option<&str>) -> T {
    match s {
        Some(s) => decode_label(s),
        None => T::FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_failure_count;
    use crate::model::{Position, PredefinedInterest};

    #[test]
    fn every_position_survives_its_label() {
        for p in Position::ALL {
            assert_eq!(decode_label::<Position>(p.to_db_str()), *p);
        }
    }

    #[test]
    fn every_interest_survives_its_label() {
        for i in PredefinedInterest::ALL {
            assert_eq!(decode_label::<PredefinedInterest>(i.to_db_str()), *i);
        }
    }

    #[test]
    fn labels_are_unique() {
        let mut seen: Vec<&str> = Position::ALL.iter().map(|p| p.to_db_str()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Position::ALL.len());
    }

    #[test]
    fn unknown_position_falls_back_and_is_counted() {
        let before = decode_failure_count();
        assert_eq!(decode_label::<Position>("archenemy"), Position::Unknown);
        assert!(decode_failure_count() > before);
    }

    #[test]
    fn unknown_interest_falls_back_to_other() {
        assert_eq!(
            decode_label::<PredefinedInterest>("underwater basket weaving"),
            PredefinedInterest::Other
        );
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(decode_label::<Position>("Friend"), Position::Unknown);
    }

    #[test]
    fn missing_label_is_fallback() {
        assert_eq!(decode_optional_label::<Position>(None), Position::Unknown);
    }
}
