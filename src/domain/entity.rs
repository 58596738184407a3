//! Entities ingested from connected data sources.
//!
//! Connectors live outside this crate; they hand over already-fetched
//! records which are stored once per (profile, entity type, name).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{EntityId, ProfileId, Timestamp, ValidationError};
use crate::domain::taxonomy::QuestionSource;

/// Kind of ingested record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Contact,
    Event,
    File,
    Call,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Event => "event",
            Self::File => "file",
            Self::Call => "call",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contact" => Ok(Self::Contact),
            "event" => Ok(Self::Event),
            "file" => Ok(Self::File),
            "call" => Ok(Self::Call),
            other => Err(ValidationError::invalid_format(
                "entity_type",
                format!("unknown entity type '{}'", other),
            )),
        }
    }
}

/// Upstream connector that produced an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySource {
    Contacts,
    CallHistory,
    GoogleCalendar,
    GoogleDrive,
}

impl EntitySource {
    pub fn as_str(&self) -> &'static str {
        self.question_source().as_str()
    }

    /// The question source tag used for questions generated from this source.
    pub fn question_source(&self) -> QuestionSource {
        match self {
            Self::Contacts => QuestionSource::Contacts,
            Self::CallHistory => QuestionSource::CallHistory,
            Self::GoogleCalendar => QuestionSource::GoogleCalendar,
            Self::GoogleDrive => QuestionSource::GoogleDrive,
        }
    }
}

impl FromStr for EntitySource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contacts" => Ok(Self::Contacts),
            "call_history" => Ok(Self::CallHistory),
            "google_calendar" => Ok(Self::GoogleCalendar),
            "google_drive" => Ok(Self::GoogleDrive),
            other => Err(ValidationError::invalid_format(
                "entity_source",
                format!("unknown source '{}'", other),
            )),
        }
    }
}

/// A contact, calendar event, drive file or call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub profile_id: ProfileId,
    pub entity_type: EntityType,
    pub name: String,
    pub source: EntitySource,
    /// Identifier in the upstream system.
    pub source_id: Option<String>,
    /// When the underlying event happened or the item was last touched.
    pub occurred_at: Option<Timestamp>,
    pub metadata: serde_json::Value,
}

impl Entity {
    pub fn new(
        profile_id: ProfileId,
        entity_type: EntityType,
        name: impl Into<String>,
        source: EntitySource,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("entity.name"));
        }
        Ok(Self {
            id: EntityId::new(),
            profile_id,
            entity_type,
            name,
            source,
            source_id: None,
            occurred_at: None,
            metadata: serde_json::Value::Null,
        })
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn occurred_at(mut self, at: Timestamp) -> Self {
        self.occurred_at = Some(at);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
