//! PatternDetector - Batch detection of aspect, synergy and signal patterns.
//!
//! Every operation recomputes from the current evidence and upserts the
//! result, so running any of them twice over unchanged data is a no-op on
//! stored values.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use crate::domain::detection::{AspectAggregator, DetectionRules, SignalAnalyzer, SynergyAnalyzer};
use crate::domain::foundation::{DomainError, ProfileId, Timestamp};
use crate::domain::pattern::{PatternKind, SignalKind};
use crate::ports::{EntityRepository, PatternRepository, ResponseReader};

/// Counts produced by one full detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetectionSummary {
    pub aspect_patterns: usize,
    pub synergies: usize,
    pub privacy_signal: bool,
    pub meeting_signal: bool,
}

impl DetectionSummary {
    /// Pattern rows written by the pass.
    pub fn patterns_written(&self) -> usize {
        self.aspect_patterns
            + self.synergies
            + usize::from(self.privacy_signal)
            + usize::from(self.meeting_signal)
    }
}

/// Turns a profile's responses and entities into stored patterns.
pub struct PatternDetector {
    responses: Arc<dyn ResponseReader>,
    patterns: Arc<dyn PatternRepository>,
    entities: Arc<dyn EntityRepository>,
    rules: DetectionRules,
}

impl PatternDetector {
    pub fn new(
        responses: Arc<dyn ResponseReader>,
        patterns: Arc<dyn PatternRepository>,
        entities: Arc<dyn EntityRepository>,
    ) -> Self {
        Self {
            responses,
            patterns,
            entities,
            rules: DetectionRules::default(),
        }
    }

    /// Replaces the default detection thresholds.
    pub fn with_rules(mut self, rules: DetectionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &DetectionRules {
        &self.rules
    }

    /// Upserts one aspect pattern per qualifying (dimension, aspect) group.
    ///
    /// Returns the number of qualifying groups; zero responses yield zero.
    pub async fn analyze_responses(&self, profile_id: &ProfileId) -> Result<usize, DomainError> {
        self.analyze_responses_at(profile_id, Timestamp::now()).await
    }

    async fn analyze_responses_at(
        &self,
        profile_id: &ProfileId,
        at: Timestamp,
    ) -> Result<usize, DomainError> {
        let evidence = self.responses.evidence_for_profile(profile_id).await?;
        let patterns = AspectAggregator::build_patterns(*profile_id, &evidence, &self.rules, at);
        if !patterns.is_empty() {
            self.patterns.upsert_batch(&patterns).await?;
        }

        debug!(
            profile_id = %profile_id,
            responses = evidence.len(),
            patterns = patterns.len(),
            "Analyzed responses"
        );
        Ok(patterns.len())
    }

    /// Upserts a synergy pattern for every aligned dimension pair.
    ///
    /// Synergies from earlier passes that no longer qualify are rewritten
    /// with their current alignment. Returns the number of qualifying pairs.
    pub async fn detect_synergies(&self, profile_id: &ProfileId) -> Result<usize, DomainError> {
        self.detect_synergies_at(profile_id, Timestamp::now()).await
    }

    async fn detect_synergies_at(
        &self,
        profile_id: &ProfileId,
        at: Timestamp,
    ) -> Result<usize, DomainError> {
        let current = self.patterns.find_by_profile(profile_id).await?;
        let synergies = SynergyAnalyzer::build_patterns(*profile_id, &current, &self.rules, at);
        if !synergies.is_empty() {
            self.patterns.upsert_batch(&synergies).await?;
        }

        let qualifying = synergies
            .iter()
            .filter(|p| p.confidence.value() >= self.rules.synergy_threshold)
            .count();
        debug!(
            profile_id = %profile_id,
            synergies = qualifying,
            weakened = synergies.len() - qualifying,
            "Detected synergies"
        );
        Ok(qualifying)
    }

    /// Writes `privacy_sensitivity_high` from the passive evidence share.
    ///
    /// Returns whether a pattern was written; nothing is written without evidence.
    pub async fn detect_privacy_patterns(&self, profile_id: &ProfileId) -> Result<bool, DomainError> {
        self.detect_privacy_patterns_at(profile_id, Timestamp::now()).await
    }

    async fn detect_privacy_patterns_at(
        &self,
        profile_id: &ProfileId,
        at: Timestamp,
    ) -> Result<bool, DomainError> {
        let activity = self.responses.activity(profile_id).await?;
        let Some(pattern) = SignalAnalyzer::privacy_pattern(*profile_id, &activity, at) else {
            return Ok(false);
        };
        self.patterns.upsert(&pattern).await?;

        debug!(
            profile_id = %profile_id,
            confidence = %pattern.confidence,
            "Detected privacy sensitivity"
        );
        Ok(true)
    }

    /// Writes `meeting_density` from recent calendar events.
    ///
    /// A stored signal is reset to zero once no event falls in the window.
    /// Returns whether a pattern was written.
    pub async fn detect_meeting_density(&self, profile_id: &ProfileId) -> Result<bool, DomainError> {
        self.detect_meeting_density_at(profile_id, Timestamp::now()).await
    }

    async fn detect_meeting_density_at(
        &self,
        profile_id: &ProfileId,
        as_of: Timestamp,
    ) -> Result<bool, DomainError> {
        let entities = self.entities.find_by_profile(profile_id).await?;
        let pattern = match SignalAnalyzer::meeting_density_pattern(
            *profile_id,
            &entities,
            &self.rules,
            as_of,
        ) {
            Some(pattern) => pattern,
            None => {
                let stored = self.patterns.find_by_profile(profile_id).await?;
                let has_signal = stored
                    .iter()
                    .any(|p| p.kind == PatternKind::Signal(SignalKind::MeetingDensity));
                if !has_signal {
                    return Ok(false);
                }
                SignalAnalyzer::cleared(*profile_id, SignalKind::MeetingDensity, as_of)
            }
        };
        self.patterns.upsert(&pattern).await?;

        debug!(
            profile_id = %profile_id,
            events = pattern.evidence_count,
            "Detected meeting density"
        );
        Ok(true)
    }

    /// Runs every detector in order: responses, synergies, privacy, meetings.
    pub async fn run_detection_pass(
        &self,
        profile_id: &ProfileId,
    ) -> Result<DetectionSummary, DomainError> {
        self.run_detection_pass_at(profile_id, Timestamp::now()).await
    }

    /// Like [`run_detection_pass`](Self::run_detection_pass) with a fixed clock.
    pub async fn run_detection_pass_at(
        &self,
        profile_id: &ProfileId,
        as_of: Timestamp,
    ) -> Result<DetectionSummary, DomainError> {
        let summary = DetectionSummary {
            aspect_patterns: self.analyze_responses_at(profile_id, as_of).await?,
            synergies: self.detect_synergies_at(profile_id, as_of).await?,
            privacy_signal: self.detect_privacy_patterns_at(profile_id, as_of).await?,
            meeting_signal: self.detect_meeting_density_at(profile_id, as_of).await?,
        };

        debug!(
            profile_id = %profile_id,
            patterns = summary.patterns_written(),
            "Detection pass complete"
        );
        Ok(summary)
    }

    /// Runs a detection pass for each profile concurrently.
    ///
    /// One profile failing does not stop the others; results come back in
    /// input order.
    pub async fn run_detection_for_all(
        &self,
        profile_ids: &[ProfileId],
    ) -> Vec<(ProfileId, Result<DetectionSummary, DomainError>)> {
        let passes = profile_ids.iter().map(|profile_id| async move {
            (*profile_id, self.run_detection_pass(profile_id).await)
        });
        join_all(passes).await
    }
}
