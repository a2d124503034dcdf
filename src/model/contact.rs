use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::ids::Id;
use super::payload::ContactPayload;
use crate::codec::labels::StoredLabel;

/// Where a contact sits in the user's life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Unknown,
    Friend,
    CloseFriend,
    Family,
    Partner,
    Colleague,
    Client,
    Mentor,
    Acquaintance,
}

impl Position {
    pub const ALL: &'static [Position] = &[
        Position::Unknown,
        Position::Friend,
        Position::CloseFriend,
        Position::Family,
        Position::Partner,
        Position::Colleague,
        Position::Client,
        Position::Mentor,
        Position::Acquaintance,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Position::Unknown => "Unknown",
            Position::Friend => "Friend",
            Position::CloseFriend => "Close Friend",
            Position::Family => "Family",
            Position::Partner => "Partner",
            Position::Colleague => "Colleague",
            Position::Client => "Client",
            Position::Mentor => "Mentor",
            Position::Acquaintance => "Acquaintance",
        }
    }
}

impl StoredLabel for Position {
    const KIND: &'static str = "position";
    const FALLBACK: Self = Position::Unknown;

    fn to_db_str(&self) -> &'static str {
        match self {
            Position::Unknown => "unknown",
            Position::Friend => "friend",
            Position::CloseFriend => "closeFriend",
            Position::Family => "family",
            Position::Partner => "partner",
            Position::Colleague => "colleague",
            Position::Client => "client",
            Position::Mentor => "mentor",
            Position::Acquaintance => "acquaintance",
        }
    }

    fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.to_db_str() == s)
    }
}

/// Interest tags offered by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredefinedInterest {
    Music,
    Sports,
    Travel,
    Food,
    Art,
    Technology,
    Books,
    Fitness,
    Gaming,
    Film,
    Outdoors,
    Other,
}

impl PredefinedInterest {
    pub const ALL: &'static [PredefinedInterest] = &[
        PredefinedInterest::Music,
        PredefinedInterest::Sports,
        PredefinedInterest::Travel,
        PredefinedInterest::Food,
        PredefinedInterest::Art,
        PredefinedInterest::Technology,
        PredefinedInterest::Books,
        PredefinedInterest::Fitness,
        PredefinedInterest::Gaming,
        PredefinedInterest::Film,
        PredefinedInterest::Outdoors,
        PredefinedInterest::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PredefinedInterest::Music => "Music",
            PredefinedInterest::Sports => "Sports",
            PredefinedInterest::Travel => "Travel",
            PredefinedInterest::Food => "Food & Drink",
            PredefinedInterest::Art => "Art",
            PredefinedInterest::Technology => "Technology",
            PredefinedInterest::Books => "Books",
            PredefinedInterest::Fitness => "Fitness",
            PredefinedInterest::Gaming => "Gaming",
            PredefinedInterest::Film => "Film & TV",
            PredefinedInterest::Outdoors => "Outdoors",
            PredefinedInterest::Other => "Other",
        }
    }

    /// Lenient lookup by stored label or display name, for user input.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|i| {
            i.to_db_str().eq_ignore_ascii_case(s) || i.display_name().eq_ignore_ascii_case(s)
        })
    }
}

impl StoredLabel for PredefinedInterest {
    const KIND: &'static str = "interest";
    const FALLBACK: Self = PredefinedInterest::Other;

    fn to_db_str(&self) -> &'static str {
        match self {
            PredefinedInterest::Music => "music",
            PredefinedInterest::Sports => "sports",
            PredefinedInterest::Travel => "travel",
            PredefinedInterest::Food => "food",
            PredefinedInterest::Art => "art",
            PredefinedInterest::Technology => "technology",
            PredefinedInterest::Books => "books",
            PredefinedInterest::Fitness => "fitness",
            PredefinedInterest::Gaming => "gaming",
            PredefinedInterest::Film => "film",
            PredefinedInterest::Outdoors => "outdoors",
            PredefinedInterest::Other => "other",
        }
    }

    fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.to_db_str() == s)
    }
}

/// Insertion-ordered set of predefined interests. Equality ignores order.
/// Serialized as a plain list; repeats in the input collapse on load.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PredefinedInterest>", into = "Vec<PredefinedInterest>")]
pub struct InterestSet(Vec<PredefinedInterest>);

impl InterestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the interest was already present.
    pub fn insert(&mut self, interest: PredefinedInterest) -> bool {
        if self.0.contains(&interest) {
            return false;
        }
        self.0.push(interest);
        true
    }

    pub fn remove(&mut self, interest: PredefinedInterest) -> bool {
        let before = self.0.len();
        self.0.retain(|i| *i != interest);
        self.0.len() != before
    }

    pub fn contains(&self, interest: PredefinedInterest) -> bool {
        self.0.contains(&interest)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredefinedInterest> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for InterestSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|i| other.0.contains(i))
    }
}

impl FromIterator<PredefinedInterest> for InterestSet {
    fn from_iter<I: IntoIterator<Item = PredefinedInterest>>(iter: I) -> Self {
        let mut set = InterestSet::new();
        for interest in iter {
            set.insert(interest);
        }
        set
    }
}

impl From<Vec<PredefinedInterest>> for InterestSet {
    fn from(interests: Vec<PredefinedInterest>) -> Self {
        interests.into_iter().collect()
    }
}

impl From<InterestSet> for Vec<PredefinedInterest> {
    fn from(set: InterestSet) -> Self {
        set.0
    }
}

/// A person in the book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: Id<Contact>,
    pub position: Position,
    pub predefined_interests: InterestSet,
    pub custom_interests: Vec<String>,
    pub payload: ContactPayload,
    /// Maintained by `linkage`; never edit directly.
    pub event_ids: Vec<Id<Event>>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn create(payload: ContactPayload) -> Self {
        Self {
            id: Id::generate(),
            position: Position::default(),
            predefined_interests: InterestSet::new(),
            custom_interests: Vec::new(),
            payload,
            event_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends a trimmed custom interest. Blank or already-present text is a no-op.
    pub fn add_custom_interest(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.custom_interests.iter().any(|i| i == trimmed) {
            return false;
        }
        self.custom_interests.push(trimmed.to_string());
        true
    }

    /// Removes the first exact match.
    pub fn remove_custom_interest(&mut self, text: &str) -> bool {
        match self.custom_interests.iter().position(|i| i == text) {
            Some(index) => {
                self.custom_interests.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn add_predefined_interest(&mut self, interest: PredefinedInterest) -> bool {
        self.predefined_interests.insert(interest)
    }

    pub fn remove_predefined_interest(&mut self, interest: PredefinedInterest) -> bool {
        self.predefined_interests.remove(interest)
    }

    /// Typed text naming a predefined interest (by label or display name)
    /// adds that tag; anything else becomes a custom interest.
    pub fn add_interest(&mut self, text: &str) -> bool {
        match PredefinedInterest::parse(text) {
            Some(interest) => self.add_predefined_interest(interest),
            None => self.add_custom_interest(text),
        }
    }

    /// Counterpart of `add_interest`: a held predefined tag matching the text
    /// goes first, otherwise the custom interest with that exact text.
    pub fn remove_interest(&mut self, text: &str) -> bool {
        let predefined = PredefinedInterest::parse(text)
            .filter(|i| self.predefined_interests.contains(*i));
        match predefined {
            Some(interest) => self.remove_predefined_interest(interest),
            None => self.remove_custom_interest(text.trim()),
        }
    }

    /// Predefined labels first, then custom tags, each in insertion order.
    pub fn interest_labels(&self) -> Vec<String> {
        self.predefined_interests
            .iter()
            .map(|i| i.display_name().to_string())
            .chain(self.custom_interests.iter().cloned())
            .collect()
    }

    pub fn has_interest(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        !needle.is_empty()
            && self
                .interest_labels()
                .iter()
                .any(|label| label.to_lowercase() == needle)
    }

    pub fn is_linked_to(&self, event_id: Id<Event>) -> bool {
        self.event_ids.contains(&event_id)
    }
}
