//! Roster generation from a participant extraction result.
//!
//! The extraction step (reading a scanned participant list) runs elsewhere
//! and leaves a JSON file of the shape
//!
//! ```text
//! {
//!   "students":            [{ "nim", "name", "program" }],
//!   "lecturers":           [{ "nuptk", "name", "homebase" }],
//!   "technicalAssistants": [{ "name", "role" }]
//! }
//! ```
//!
//! which is mapped into roster people here.

use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use busmanifest_core::error::SourceError;
use busmanifest_core::roster::{initials_avatar_url, Person, PersonDetails};
use busmanifest_core::sources::RosterGenerator;
use serde::Deserialize;

use crate::error::StorageError;

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedStudent {
    pub nim: String,
    pub name: String,
    pub program: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedLecturer {
    #[serde(default)]
    pub nuptk: String,
    pub name: String,
    pub homebase: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedAssistant {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRoster {
    pub students: Vec<ExtractedStudent>,
    pub lecturers: Vec<ExtractedLecturer>,
    pub technical_assistants: Vec<ExtractedAssistant>,
}

impl ExtractedRoster {
    /// Students first, then lecturers, then assistants.
    ///
    /// Ids: a student's registration number; a lecturer's educator number,
    /// or the name when it is empty; an assistant's name. Name-based ids
    /// can collide; collisions are kept and logged.
    pub fn into_people(self) -> Vec<Person> {
        let mut people = Vec::with_capacity(
            self.students.len() + self.lecturers.len() + self.technical_assistants.len(),
        );

        for s in self.students {
            people.push(Person {
                id: s.nim.clone(),
                photo_url: initials_avatar_url(&s.name),
                name: s.name,
                details: PersonDetails::Student {
                    nim: s.nim,
                    program: s.program,
                },
            });
        }

        for l in self.lecturers {
            let id = if l.nuptk.is_empty() {
                l.name.clone()
            } else {
                l.nuptk.clone()
            };
            people.push(Person {
                id,
                photo_url: initials_avatar_url(&l.name),
                name: l.name,
                details: PersonDetails::Lecturer {
                    nuptk: l.nuptk,
                    homebase: l.homebase,
                },
            });
        }

        for a in self.technical_assistants {
            people.push(Person {
                id: a.name.clone(),
                photo_url: initials_avatar_url(&a.name),
                name: a.name,
                details: PersonDetails::Assistant { role: a.role },
            });
        }

        let mut seen = HashSet::with_capacity(people.len());
        for person in &people {
            if !seen.insert(person.id.as_str()) {
                tracing::warn!(
                    person_id = %person.id,
                    kind = %person.kind(),
                    "Extracted roster repeats a person id",
                );
            }
        }

        people
    }
}

/// Generates the roster from an extraction result stored on disk.
pub struct ExtractionFileGenerator {
    path: PathBuf,
}

impl ExtractionFileGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Vec<Person>, StorageError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        let extracted: ExtractedRoster = serde_json::from_str(&text)?;
        Ok(extracted.into_people())
    }
}

#[async_trait]
impl RosterGenerator for ExtractionFileGenerator {
    async fn generate(&self) -> Result<Vec<Person>, SourceError> {
        tracing::info!(path = %self.path.display(), "Generating roster from extraction result");
        Ok(self.load().await?)
    }
}
