use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A structured postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl PostalAddress {
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.postal_code.is_empty()
            && self.country.is_empty()
    }

    /// Single-line form, skipping empty parts.
    pub fn one_line(&self) -> String {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A value with an optional label such as "work" or "home".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labeled<T> {
    pub label: Option<String>,
    pub value: T,
}

impl<T> Labeled<T> {
    pub fn new(label: Option<&str>, value: T) -> Self {
        Self {
            label: label.map(str::to_string),
            value,
        }
    }

    pub fn unlabeled(value: T) -> Self {
        Self { label: None, value }
    }
}

/// Portable identity and contact-method data wrapped by a contact.
///
/// The domain model never looks inside beyond names (for sorting and display);
/// it is persisted as one vCard blob and rehydrated as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub given_name: String,
    pub family_name: String,
    pub middle_name: String,
    pub name_prefix: String,
    pub name_suffix: String,
    pub nickname: String,
    pub organization: String,
    pub job_title: String,
    pub phones: Vec<Labeled<String>>,
    pub emails: Vec<Labeled<String>>,
    pub addresses: Vec<Labeled<PostalAddress>>,
    pub urls: Vec<Labeled<String>>,
    pub instant_messages: Vec<Labeled<String>>,
    pub birthday: Option<NaiveDate>,
    pub dates: Vec<Labeled<NaiveDate>>,
    pub relations: Vec<Labeled<String>>,
    pub note: String,
    pub photo: Option<Vec<u8>>,
    /// Identifier in the system this payload was imported from, used for re-sync.
    pub external_id: Option<String>,
}

impl ContactPayload {
    pub fn named(given_name: &str, family_name: &str) -> Self {
        Self {
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: &str, label: Option<&str>) -> Self {
        self.emails.push(Labeled::new(label, email.to_string()));
        self
    }

    pub fn with_phone(mut self, number: &str, label: Option<&str>) -> Self {
        self.phones.push(Labeled::new(label, number.to_string()));
        self
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(|e| e.value.as_str())
    }

    pub fn primary_phone(&self) -> Option<&str> {
        self.phones.first().map(|p| p.value.as_str())
    }
}
