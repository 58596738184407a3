//! Signal Analyzer - behavioral signals derived from evidence volume.

use super::DetectionRules;
use crate::domain::entity::{Entity, EntityType};
use crate::domain::foundation::{Confidence, ProfileId, Timestamp};
use crate::domain::pattern::{Pattern, SignalKind};
use crate::domain::response::ProfileActivity;

/// Stateless signal detection.
pub struct SignalAnalyzer;

impl SignalAnalyzer {
    /// Share of a profile's evidence that was collected passively.
    ///
    /// Returns `None` when the profile has no evidence at all.
    pub fn privacy_confidence(activity: &ProfileActivity) -> Option<Confidence> {
        let total = activity.total_evidence();
        if total == 0 {
            return None;
        }
        Some(Confidence::new(
            f64::from(activity.passive_evidence()) / f64::from(total),
        ))
    }

    /// `privacy_sensitivity_high` pattern, if there is any evidence.
    pub fn privacy_pattern(
        profile_id: ProfileId,
        activity: &ProfileActivity,
        at: Timestamp,
    ) -> Option<Pattern> {
        let confidence = Self::privacy_confidence(activity)?;
        Some(Pattern::signal(
            profile_id,
            SignalKind::PrivacySensitivityHigh,
            confidence,
            activity.total_evidence(),
            at,
        ))
    }

    /// Calendar events that happened inside the trailing window ending at `as_of`.
    pub fn recent_event_count(entities: &[Entity], window_days: i64, as_of: Timestamp) -> u32 {
        let window_start = as_of.minus_days(window_days);
        entities
            .iter()
            .filter(|e| e.entity_type == EntityType::Event)
            .filter_map(|e| e.occurred_at)
            .filter(|at| !at.is_before(&window_start) && !as_of.is_before(at))
            .count() as u32
    }

    /// `meeting_density` pattern, if any calendar event falls in the window.
    pub fn meeting_density_pattern(
        profile_id: ProfileId,
        entities: &[Entity],
        rules: &DetectionRules,
        as_of: Timestamp,
    ) -> Option<Pattern> {
        let events = Self::recent_event_count(entities, rules.meeting_window_days, as_of);
        if events == 0 {
            return None;
        }
        Some(Pattern::signal(
            profile_id,
            SignalKind::MeetingDensity,
            Confidence::from_evidence(events, rules.meeting_saturation),
            events,
            as_of,
        ))
    }

    /// Zero-confidence replacement for a signal whose evidence has gone.
    pub fn cleared(profile_id: ProfileId, signal: SignalKind, at: Timestamp) -> Pattern {
        Pattern::signal(profile_id, signal, Confidence::ZERO, 0, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::EntitySource;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1705276800)
    }

    fn event(profile: ProfileId, name: &str, days_ago: i64) -> Entity {
        Entity::new(profile, EntityType::Event, name, EntitySource::GoogleCalendar)
            .unwrap()
            .occurred_at(now().minus_days(days_ago))
    }

    #[test]
    fn no_evidence_means_no_privacy_signal() {
        assert!(SignalAnalyzer::privacy_confidence(&ProfileActivity::default()).is_none());
        assert!(
            SignalAnalyzer::privacy_pattern(ProfileId::new(), &ProfileActivity::default(), now())
                .is_none()
        );
    }

    #[test]
    fn privacy_confidence_is_passive_fraction() {
        let activity = ProfileActivity {
            explicit_responses: 5,
            passive_responses: 2,
            ingested_entities: 3,
        };
        let confidence = SignalAnalyzer::privacy_confidence(&activity).unwrap();
        assert_eq!(confidence.value(), 0.5);
    }

    #[test]
    fn privacy_confidence_rises_with_passive_share() {
        let mut previous = -1.0;
        for passive in 0..20 {
            let activity = ProfileActivity {
                explicit_responses: 10,
                passive_responses: passive,
                ingested_entities: 0,
            };
            let value = SignalAnalyzer::privacy_confidence(&activity).unwrap().value();
            assert!(value > previous);
            previous = value;
        }
    }

    #[test]
    fn privacy_pattern_records_total_evidence() {
        let activity = ProfileActivity {
            explicit_responses: 1,
            passive_responses: 0,
            ingested_entities: 3,
        };
        let pattern = SignalAnalyzer::privacy_pattern(ProfileId::new(), &activity, now()).unwrap();
        assert_eq!(pattern.evidence_count, 4);
        assert_eq!(pattern.pattern_type(), "privacy_sensitivity_high");
    }

    #[test]
    fn counts_only_recent_calendar_events() {
        let profile = ProfileId::new();
        let entities = vec![
            event(profile, "Standup", 1),
            event(profile, "Planning", 29),
            event(profile, "Offsite", 45),
            Entity::new(profile, EntityType::File, "Roadmap", EntitySource::GoogleDrive)
                .unwrap()
                .occurred_at(now()),
        ];
        assert_eq!(SignalAnalyzer::recent_event_count(&entities, 30, now()), 2);
    }

    #[test]
    fn meeting_density_saturates() {
        let profile = ProfileId::new();
        let entities: Vec<_> = (0..50)
            .map(|i| event(profile, &format!("Meeting {}", i), i % 20))
            .collect();
        let pattern = SignalAnalyzer::meeting_density_pattern(
            profile,
            &entities,
            &DetectionRules::default(),
            now(),
        )
        .unwrap();
        assert_eq!(pattern.confidence, Confidence::FULL);
        assert_eq!(pattern.evidence_count, 50);
    }

    #[test]
    fn no_events_means_no_meeting_signal() {
        assert!(SignalAnalyzer::meeting_density_pattern(
            ProfileId::new(),
            &[],
            &DetectionRules::default(),
            now()
        )
        .is_none());
    }

    #[test]
    fn cleared_signal_has_no_weight() {
        let pattern = SignalAnalyzer::cleared(ProfileId::new(), SignalKind::MeetingDensity, now());
        assert_eq!(pattern.pattern_type(), "meeting_density");
        assert_eq!(pattern.confidence.value(), 0.0);
        assert_eq!(pattern.evidence_count, 0);
        assert_eq!(pattern.impact_score, 0.0);
    }
}
