//! AdaptiveQuestionSelector - Picks the next batch of questions for a profile.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::selection::{QuestionScorer, ScoredQuestion, SelectionContext, SelectionPolicy};
use crate::domain::taxonomy::Question;
use crate::ports::{PatternRepository, QuestionReader, RandomSource, ResponseReader};

/// Ranks unanswered questions by coverage, weakness, engagement and a
/// random freshness draw.
pub struct AdaptiveQuestionSelector {
    questions: Arc<dyn QuestionReader>,
    responses: Arc<dyn ResponseReader>,
    patterns: Arc<dyn PatternRepository>,
    random: Arc<dyn RandomSource>,
    policy: SelectionPolicy,
}

impl AdaptiveQuestionSelector {
    pub fn new(
        questions: Arc<dyn QuestionReader>,
        responses: Arc<dyn ResponseReader>,
        patterns: Arc<dyn PatternRepository>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            questions,
            responses,
            patterns,
            random,
            policy: SelectionPolicy::default(),
        }
    }

    /// Replaces the default selection weights.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Next questions to ask, best first.
    ///
    /// `limit` defaults to the policy's batch size. Answered questions are
    /// never returned.
    pub async fn select_next_questions(
        &self,
        profile_id: &ProfileId,
        limit: Option<usize>,
    ) -> Result<Vec<Question>, DomainError> {
        Ok(self
            .rank_next_questions(profile_id, limit)
            .await?
            .into_iter()
            .map(|scored| scored.question)
            .collect())
    }

    /// Same as [`select_next_questions`](Self::select_next_questions) with
    /// the score breakdown of each question.
    pub async fn rank_next_questions(
        &self,
        profile_id: &ProfileId,
        limit: Option<usize>,
    ) -> Result<Vec<ScoredQuestion>, DomainError> {
        let limit = limit.unwrap_or(self.policy.default_limit);
        let candidates = self
            .questions
            .unanswered_active(profile_id, self.policy.candidate_pool_limit)
            .await?;
        if candidates.is_empty() || limit == 0 {
            debug!(profile_id = %profile_id, "No candidate questions");
            return Ok(Vec::new());
        }

        let coverage = self.responses.coverage_by_dimension(profile_id).await?;
        let patterns = self.patterns.find_by_profile(profile_id).await?;
        let ctx = SelectionContext::new(coverage, &patterns, self.policy.weak_confidence_threshold);

        let pool_size = candidates.len();
        let ranked = QuestionScorer::rank(
            candidates,
            &ctx,
            &self.policy,
            || self.random.next_unit(),
            limit,
        );

        debug!(
            profile_id = %profile_id,
            pool = pool_size,
            selected = ranked.len(),
            weak_dimensions = ctx.weak_dimensions.len(),
            "Selected next questions"
        );
        Ok(ranked)
    }
}
