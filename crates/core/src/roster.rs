//! Roster store: the master list of people who can be seated.
//!
//! People are either students, lecturers or technical assistants. The
//! category is a tagged enum flattened into the person record, so the JSON
//! shape is `{ "id", "name", "photoUrl", "type": "STUDENT", "nim", ... }`.

use std::collections::{HashMap, HashSet};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::PersonId;

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// Base of the generated initials avatar.
const AVATAR_BASE_URL: &str = "https://api.dicebear.com/8.x/initials/svg";

/// Bytes escaped in a URI component: everything but ASCII alphanumerics and
/// `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Initials avatar URL seeded with `name`.
pub fn initials_avatar_url(name: &str) -> String {
    format!(
        "{AVATAR_BASE_URL}?seed={}",
        utf8_percent_encode(name, URI_COMPONENT)
    )
}

/// A participant of the trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PersonRecord")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// Avatar URL. A record without one gets the initials avatar.
    pub photo_url: String,
    #[serde(flatten)]
    pub details: PersonDetails,
}

/// Wire form of [`Person`] with an optional photo.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonRecord {
    id: PersonId,
    name: String,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(flatten)]
    details: PersonDetails,
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        let photo_url = record
            .photo_url
            .unwrap_or_else(|| initials_avatar_url(&record.name));
        Self {
            id: record.id,
            name: record.name,
            photo_url,
            details: record.details,
        }
    }
}

/// Category-specific attributes, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonDetails {
    Student {
        /// Student registration number.
        nim: String,
        /// Study program and semester, e.g. `S1 MANAJEMEN (IV)`.
        program: String,
    },
    Lecturer {
        /// National educator number. Empty when unknown.
        #[serde(default)]
        nuptk: String,
        homebase: String,
    },
    Assistant {
        role: String,
    },
}

/// Category of a [`Person`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonKind {
    Student,
    Lecturer,
    Assistant,
}

impl PersonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Lecturer => "LECTURER",
            Self::Assistant => "ASSISTANT",
        }
    }
}

impl std::fmt::Display for PersonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PersonDetails {
    pub fn kind(&self) -> PersonKind {
        match self {
            Self::Student { .. } => PersonKind::Student,
            Self::Lecturer { .. } => PersonKind::Lecturer,
            Self::Assistant { .. } => PersonKind::Assistant,
        }
    }
}

impl Person {
    pub fn kind(&self) -> PersonKind {
        self.details.kind()
    }

    /// Short secondary label shown under the name: registration number for
    /// students, educator number (or `N/A`) for lecturers, role for assistants.
    pub fn secondary_label(&self) -> &str {
        match &self.details {
            PersonDetails::Student { nim, .. } => nim,
            PersonDetails::Lecturer { nuptk, .. } if nuptk.is_empty() => "N/A",
            PersonDetails::Lecturer { nuptk, .. } => nuptk,
            PersonDetails::Assistant { role } => role,
        }
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Ordered list of people with an id index.
///
/// Serializes as a plain JSON array of [`Person`].
#[derive(Debug, Clone, Default)]
pub struct Roster {
    people: Vec<Person>,
    index: HashMap<PersonId, usize>,
}

/// Head counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RosterCounts {
    pub students: usize,
    pub lecturers: usize,
    pub assistants: usize,
    pub total: usize,
}

impl Roster {
    /// Build a roster. When an id appears twice the first record wins for
    /// lookups; the duplicate stays in the list, is logged, and is reported
    /// by [`Roster::duplicate_ids`].
    pub fn new(people: Vec<Person>) -> Self {
        let mut index = HashMap::with_capacity(people.len());
        for (pos, person) in people.iter().enumerate() {
            if index.contains_key(&person.id) {
                tracing::warn!(person_id = %person.id, "Duplicate person id in roster");
                continue;
            }
            index.insert(person.id.clone(), pos);
        }
        Self { people, index }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.index.get(id).map(|&pos| &self.people[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ids carried by more than one record, in roster order.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::with_capacity(self.people.len());
        let mut duplicates = Vec::new();
        for person in &self.people {
            let id = person.id.as_str();
            if !seen.insert(id) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }

    /// Replace a person's photo URL in place.
    pub fn set_photo_url(&mut self, id: &str, photo_url: String) -> Result<(), CoreError> {
        let pos = *self.index.get(id).ok_or_else(|| CoreError::NotFound {
            entity: "Person",
            id: id.to_string(),
        })?;
        self.people[pos].photo_url = photo_url;
        Ok(())
    }

    pub fn counts(&self) -> RosterCounts {
        let mut counts = RosterCounts {
            total: self.people.len(),
            ..RosterCounts::default()
        };
        for person in &self.people {
            match person.kind() {
                PersonKind::Student => counts.students += 1,
                PersonKind::Lecturer => counts.lecturers += 1,
                PersonKind::Assistant => counts.assistants += 1,
            }
        }
        counts
    }
}

impl PartialEq for Roster {
    fn eq(&self, other: &Self) -> bool {
        self.people == other.people
    }
}

impl From<Vec<Person>> for Roster {
    fn from(people: Vec<Person>) -> Self {
        Self::new(people)
    }
}

impl Serialize for Roster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.people.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Person>::deserialize(deserializer).map(Self::new)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
