//! Dynamic Question Generator - turns ingested entities into questions.
//!
//! Question text is the identity of a generated question: stores upsert by
//! text, so regenerating from the same entities creates nothing new.

use std::collections::HashSet;

use crate::domain::detection::SignalAnalyzer;
use crate::domain::entity::{Entity, EntitySource, EntityType};
use crate::domain::foundation::Timestamp;
use crate::domain::taxonomy::{well_known, NewQuestion, OptionTemplate, QuestionType};

/// More recent events than this trigger a time-usage question.
pub const BUSY_CALENDAR_THRESHOLD: u32 = 5;

/// Window for the time-usage question.
pub const CALENDAR_WINDOW_DAYS: i64 = 30;

/// Stateless question generation.
pub struct DynamicQuestionGenerator;

impl DynamicQuestionGenerator {
    /// Questions for a profile's entities, deduplicated by text.
    ///
    /// Files, contacts and calls each get one question; calendar events are
    /// summarized into a single question once the trailing window is busy.
    pub fn generate(entities: &[Entity], as_of: Timestamp) -> Vec<NewQuestion> {
        let mut seen = HashSet::new();
        let mut questions = Vec::new();

        for entity in entities {
            let question = match entity.entity_type {
                EntityType::File => Self::file_question(entity),
                EntityType::Contact => Self::contact_question(entity),
                EntityType::Call => Self::call_question(entity),
                EntityType::Event => continue,
            };
            if seen.insert(question.text.clone()) {
                questions.push(question);
            }
        }

        let recent_events = SignalAnalyzer::recent_event_count(entities, CALENDAR_WINDOW_DAYS, as_of);
        if recent_events > BUSY_CALENDAR_THRESHOLD {
            let question = Self::calendar_question(recent_events);
            if seen.insert(question.text.clone()) {
                questions.push(question);
            }
        }

        questions
    }

    pub fn file_question(file: &Entity) -> NewQuestion {
        NewQuestion {
            text: format!(
                "\"{}\" was recently accessed. Is this currently a top priority for you?",
                file.name
            ),
            question_type: QuestionType::Priority,
            primary_dimension_id: well_known::WORK_STYLE,
            difficulty_level: 1,
            engagement_factor: 1.4,
            source: file.source.question_source(),
            options: vec![
                OptionTemplate::new("Top Priority", 1.0),
                OptionTemplate::new("Supporting Task", 0.6),
                OptionTemplate::new("Just Browsing", 0.2),
                OptionTemplate::new("Not Priority", 0.0),
            ],
        }
    }

    pub fn contact_question(contact: &Entity) -> NewQuestion {
        NewQuestion {
            text: format!("How important is your relationship with {}?", contact.name),
            question_type: QuestionType::Scale,
            primary_dimension_id: well_known::RELATIONSHIPS,
            difficulty_level: 1,
            engagement_factor: 1.3,
            source: contact.source.question_source(),
            options: vec![
                OptionTemplate::new("Essential", 1.0),
                OptionTemplate::new("Important", 0.7),
                OptionTemplate::new("Acquaintance", 0.4),
                OptionTemplate::new("Don't Care", 0.0),
            ],
        }
    }

    pub fn call_question(call: &Entity) -> NewQuestion {
        NewQuestion {
            text: format!(
                "You recently spoke with {}. How energized did that conversation leave you?",
                call.name
            ),
            question_type: QuestionType::Reflection,
            primary_dimension_id: well_known::SOCIAL,
            difficulty_level: 2,
            engagement_factor: 1.2,
            source: call.source.question_source(),
            options: vec![
                OptionTemplate::new("Energized", 1.0),
                OptionTemplate::new("Neutral", 0.3),
                OptionTemplate::new("Drained", -0.5),
                OptionTemplate::new("Don't Care", 0.0),
            ],
        }
    }

    pub fn calendar_question(event_count: u32) -> NewQuestion {
        NewQuestion {
            text: format!(
                "You have {} events in the last {} days. How satisfied are you with your time usage?",
                event_count, CALENDAR_WINDOW_DAYS
            ),
            question_type: QuestionType::Reflection,
            primary_dimension_id: well_known::TIME_MANAGEMENT,
            difficulty_level: 2,
            engagement_factor: 1.5,
            source: EntitySource::GoogleCalendar.question_source(),
            options: vec![
                OptionTemplate::new("Very satisfied", 1.0),
                OptionTemplate::new("Somewhat satisfied", 0.5),
                OptionTemplate::new("Overbooked", -0.5),
                OptionTemplate::new("Don't Care", 0.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ProfileId;
    use crate::domain::taxonomy::QuestionSource;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1705276800)
    }

    fn entity(entity_type: EntityType, name: &str, source: EntitySource) -> Entity {
        Entity::new(ProfileId::new(), entity_type, name, source)
            .unwrap()
            .occurred_at(now().minus_days(1))
    }

    #[test]
    fn file_question_uses_priority_options() {
        let q = DynamicQuestionGenerator::file_question(&entity(
            EntityType::File,
            "Product Roadmap 2024",
            EntitySource::GoogleDrive,
        ));
        assert_eq!(
            q.text,
            "\"Product Roadmap 2024\" was recently accessed. Is this currently a top priority for you?"
        );
        assert_eq!(q.question_type, QuestionType::Priority);
        assert_eq!(q.primary_dimension_id, well_known::WORK_STYLE);
        assert_eq!(q.engagement_factor, 1.4);
        assert_eq!(q.source, QuestionSource::GoogleDrive);
        let weights: Vec<f64> = q.options.iter().map(|o| o.weight).collect();
        assert_eq!(weights, vec![1.0, 0.6, 0.2, 0.0]);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn few_events_produce_no_calendar_question() {
        let events: Vec<_> = (0..5)
            .map(|i| entity(EntityType::Event, &format!("Sync {}", i), EntitySource::GoogleCalendar))
            .collect();
        assert!(DynamicQuestionGenerator::generate(&events, now()).is_empty());
    }

    #[test]
    fn busy_calendar_produces_one_summary_question() {
        let events: Vec<_> = (0..6)
            .map(|i| entity(EntityType::Event, &format!("Sync {}", i), EntitySource::GoogleCalendar))
            .collect();
        let questions = DynamicQuestionGenerator::generate(&events, now());
        assert_eq!(questions.len(), 1);
        assert_eq!(
            questions[0].text,
            "You have 6 events in the last 30 days. How satisfied are you with your time usage?"
        );
        assert_eq!(questions[0].primary_dimension_id, well_known::TIME_MANAGEMENT);
        assert_eq!(questions[0].engagement_factor, 1.5);
    }

    #[test]
    fn one_question_per_contact_file_and_call() {
        let entities = vec![
            entity(EntityType::Contact, "Ada", EntitySource::Contacts),
            entity(EntityType::Call, "Ada", EntitySource::CallHistory),
            entity(EntityType::File, "Budget", EntitySource::GoogleDrive),
            entity(EntityType::Contact, "Ada", EntitySource::Contacts),
        ];
        let questions = DynamicQuestionGenerator::generate(&entities, now());
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| q.validate().is_ok()));
    }
}
