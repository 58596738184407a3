//! Response events and the evidence views derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    AnswerOptionId, AspectId, DimensionId, ProfileId, QuestionId, ResponseId, Timestamp,
    ValidationError,
};

/// How a response was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Explicit choice made by the user.
    Selected,
    /// Captured from an external source (call history, contacts).
    Passive,
    /// Inferred from other data.
    Derived,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selected => "selected",
            Self::Passive => "passive",
            Self::Derived => "derived",
        }
    }

    /// True for evidence the user did not type in themselves.
    pub fn is_passively_collected(&self) -> bool {
        !matches!(self, Self::Selected)
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selected" => Ok(Self::Selected),
            "passive" => Ok(Self::Passive),
            "derived" => Ok(Self::Derived),
            other => Err(ValidationError::invalid_format(
                "response_type",
                format!("unknown response type '{}'", other),
            )),
        }
    }
}

/// Immutable response record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: ResponseId,
    pub profile_id: ProfileId,
    pub question_id: QuestionId,
    pub answer_option_id: AnswerOptionId,
    pub response_type: ResponseType,
    pub created_at: Timestamp,
}

impl Response {
    /// Records an explicit selection made now.
    pub fn selected(
        profile_id: ProfileId,
        question_id: QuestionId,
        answer_option_id: AnswerOptionId,
    ) -> Self {
        Self::new(profile_id, question_id, answer_option_id, ResponseType::Selected)
    }

    pub fn new(
        profile_id: ProfileId,
        question_id: QuestionId,
        answer_option_id: AnswerOptionId,
        response_type: ResponseType,
    ) -> Self {
        Self {
            id: ResponseId::new(),
            profile_id,
            question_id,
            answer_option_id,
            response_type,
            created_at: Timestamp::now(),
        }
    }
}

/// A response joined with the answer option it points to.
///
/// `dimension_id` is the dimension of the option's aspect, which is more
/// precise than the question's primary dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEvidence {
    pub response_type: ResponseType,
    pub aspect_id: Option<AspectId>,
    pub dimension_id: Option<DimensionId>,
    pub weight: f64,
}

/// Aggregate activity counters for one profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileActivity {
    /// Responses captured as explicit selections.
    pub explicit_responses: u32,
    /// Responses captured passively or derived.
    pub passive_responses: u32,
    /// Entities ingested from external sources.
    pub ingested_entities: u32,
}

impl ProfileActivity {
    pub fn total_responses(&self) -> u32 {
        self.explicit_responses + self.passive_responses
    }

    /// All evidence items, self-reported or not.
    pub fn total_evidence(&self) -> u32 {
        self.total_responses() + self.ingested_entities
    }

    /// Evidence items collected without explicit user input.
    pub fn passive_evidence(&self) -> u32 {
        self.passive_responses + self.ingested_entities
    }

    /// Share of responses that were explicit choices; `0.0` with no responses.
    pub fn engagement_rate(&self) -> f64 {
        let total = self.total_responses();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.explicit_responses) / f64::from(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_type_roundtrips() {
        for rt in [ResponseType::Selected, ResponseType::Passive, ResponseType::Derived] {
            assert_eq!(rt.as_str().parse::<ResponseType>().unwrap(), rt);
        }
        assert!("skipped".parse::<ResponseType>().is_err());
    }

    #[test]
    fn only_selected_is_self_reported() {
        assert!(!ResponseType::Selected.is_passively_collected());
        assert!(ResponseType::Passive.is_passively_collected());
        assert!(ResponseType::Derived.is_passively_collected());
    }

    #[test]
    fn selected_constructor_sets_type() {
        let r = Response::selected(ProfileId::new(), QuestionId::new(1), AnswerOptionId::new(2));
        assert_eq!(r.response_type, ResponseType::Selected);
    }

    #[test]
    fn engagement_rate_is_zero_without_responses() {
        assert_eq!(ProfileActivity::default().engagement_rate(), 0.0);
    }

    #[test]
    fn engagement_rate_is_explicit_share() {
        let activity = ProfileActivity {
            explicit_responses: 3,
            passive_responses: 1,
            ingested_entities: 10,
        };
        assert_eq!(activity.engagement_rate(), 0.75);
        assert_eq!(activity.total_evidence(), 14);
        assert_eq!(activity.passive_evidence(), 11);
    }
}
