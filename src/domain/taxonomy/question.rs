//! Questions and answer options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{AnswerOptionId, AspectId, DimensionId, QuestionId, ValidationError};

/// Default multiplier for questions without a stored engagement factor.
pub const DEFAULT_ENGAGEMENT_FACTOR: f64 = 1.0;

/// Presentation style of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Scale,
    Choice,
    Ranking,
    TradeOff,
    Reflection,
    Priority,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scale => "scale",
            Self::Choice => "choice",
            Self::Ranking => "ranking",
            Self::TradeOff => "trade_off",
            Self::Reflection => "reflection",
            Self::Priority => "priority",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scale" => Ok(Self::Scale),
            "choice" => Ok(Self::Choice),
            "ranking" => Ok(Self::Ranking),
            "trade_off" => Ok(Self::TradeOff),
            "reflection" => Ok(Self::Reflection),
            "priority" => Ok(Self::Priority),
            other => Err(ValidationError::invalid_format(
                "question_type",
                format!("unknown question type '{}'", other),
            )),
        }
    }
}

/// Where a question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    /// Seeded question bank.
    Static,
    /// Generated from ingested contacts.
    Contacts,
    /// Generated from ingested call history.
    CallHistory,
    /// Generated from ingested calendar events.
    GoogleCalendar,
    /// Generated from ingested drive files.
    GoogleDrive,
}

impl QuestionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Contacts => "contacts",
            Self::CallHistory => "call_history",
            Self::GoogleCalendar => "google_calendar",
            Self::GoogleDrive => "google_drive",
        }
    }
}

impl FromStr for QuestionSource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "contacts" => Ok(Self::Contacts),
            "call_history" => Ok(Self::CallHistory),
            "google_calendar" => Ok(Self::GoogleCalendar),
            "google_drive" => Ok(Self::GoogleDrive),
            other => Err(ValidationError::invalid_format(
                "question_source",
                format!("unknown source '{}'", other),
            )),
        }
    }
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: AnswerOptionId,
    pub position: u16,
    pub text: String,
    /// Aspect endorsed by choosing this option, if any.
    pub aspect_id: Option<AspectId>,
    /// Endorsement strength, typically in [-1.0, 1.0].
    pub weight: f64,
}

/// Answer option content before it has been assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionTemplate {
    pub text: String,
    pub weight: f64,
    pub aspect_id: Option<AspectId>,
}

impl OptionTemplate {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
            aspect_id: None,
        }
    }
}

/// A question from the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub question_type: QuestionType,
    pub primary_dimension_id: DimensionId,
    /// Difficulty level in 1..=5.
    pub difficulty_level: u8,
    /// Selection multiplier, ≥ 1.0 by convention.
    pub engagement_factor: f64,
    pub active: bool,
    pub source: QuestionSource,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Engagement factor with the conventional default applied to unusable values.
    pub fn effective_engagement(&self) -> f64 {
        if self.engagement_factor.is_finite() && self.engagement_factor > 0.0 {
            self.engagement_factor
        } else {
            DEFAULT_ENGAGEMENT_FACTOR
        }
    }
}

/// A question to be inserted; the store assigns ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub question_type: QuestionType,
    pub primary_dimension_id: DimensionId,
    pub difficulty_level: u8,
    pub engagement_factor: f64,
    pub source: QuestionSource,
    pub options: Vec<OptionTemplate>,
}

impl NewQuestion {
    /// Validates text, difficulty and engagement factor.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::empty_field("question.text"));
        }
        if !(1..=5).contains(&self.difficulty_level) {
            return Err(ValidationError::out_of_range(
                "difficulty_level",
                1.0,
                5.0,
                f64::from(self.difficulty_level),
            ));
        }
        if !self.engagement_factor.is_finite() || self.engagement_factor < DEFAULT_ENGAGEMENT_FACTOR {
            return Err(ValidationError::out_of_range(
                "engagement_factor",
                DEFAULT_ENGAGEMENT_FACTOR,
                f64::MAX,
                self.engagement_factor,
            ));
        }
        Ok(())
    }
}
