//! Question Scorer - ranks candidate questions for a profile.
//!
//! The score favors dimensions with little coverage, dimensions where the
//! profile's patterns are still weak, and engaging questions. A random
//! freshness term keeps consecutive batches from being identical.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::SelectionPolicy;
use crate::domain::foundation::{DimensionId, QuestionId};
use crate::domain::pattern::{Pattern, PatternKind};
use crate::domain::taxonomy::Question;

/// What the profile already looks like, from the selector's point of view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionContext {
    /// Prior responses per question primary dimension.
    pub coverage: HashMap<DimensionId, u32>,
    /// Dimensions holding at least one low-confidence aspect pattern.
    pub weak_dimensions: HashSet<DimensionId>,
}

impl SelectionContext {
    pub fn new(coverage: HashMap<DimensionId, u32>, patterns: &[Pattern], weak_threshold: f64) -> Self {
        let weak_dimensions = patterns
            .iter()
            .filter(|p| p.confidence.value() < weak_threshold)
            .filter_map(|p| match p.kind {
                PatternKind::Aspect { dimension_id, .. } => Some(dimension_id),
                _ => None,
            })
            .collect();
        Self {
            coverage,
            weak_dimensions,
        }
    }

    pub fn coverage_of(&self, dimension_id: DimensionId) -> u32 {
        self.coverage.get(&dimension_id).copied().unwrap_or(0)
    }

    pub fn is_weak(&self, dimension_id: DimensionId) -> bool {
        self.weak_dimensions.contains(&dimension_id)
    }
}

/// Weighted components of one question's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub coverage: f64,
    pub weakness: f64,
    pub engagement: f64,
    pub freshness: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.coverage + self.weakness + self.engagement + self.freshness
    }
}

/// A candidate with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredQuestion {
    pub question: Question,
    pub breakdown: ScoreBreakdown,
}

impl ScoredQuestion {
    pub fn score(&self) -> f64 {
        self.breakdown.total()
    }

    pub fn id(&self) -> QuestionId {
        self.question.id
    }
}

/// Stateless question scoring.
pub struct QuestionScorer;

impl QuestionScorer {
    /// Scores one question; `freshness` is a draw from [0, 1).
    pub fn score(
        question: &Question,
        ctx: &SelectionContext,
        policy: &SelectionPolicy,
        freshness: f64,
    ) -> ScoreBreakdown {
        let dimension = question.primary_dimension_id;
        let coverage = 1.0 / (f64::from(ctx.coverage_of(dimension)) + 1.0);
        let weakness = if ctx.is_weak(dimension) { 1.0 } else { 0.0 };
        let freshness = if freshness.is_finite() {
            freshness.clamp(0.0, 1.0)
        } else {
            0.0
        };

        ScoreBreakdown {
            coverage: policy.coverage_weight * coverage,
            weakness: policy.weakness_weight * weakness,
            engagement: policy.engagement_weight * question.effective_engagement(),
            freshness: policy.freshness_weight * freshness,
        }
    }

    /// Scores every candidate and returns the best `limit`, highest first.
    ///
    /// `draw` is called once per candidate, in candidate order. Inactive
    /// questions are skipped; everything else is scored and the sort is
    /// stable, so equal scores keep their candidate order.
    pub fn rank(
        candidates: Vec<Question>,
        ctx: &SelectionContext,
        policy: &SelectionPolicy,
        mut draw: impl FnMut() -> f64,
        limit: usize,
    ) -> Vec<ScoredQuestion> {
        let mut scored: Vec<ScoredQuestion> = candidates
            .into_iter()
            .filter(|q| q.active)
            .map(|question| {
                let breakdown = Self::score(&question, ctx, policy, draw());
                ScoredQuestion {
                    question,
                    breakdown,
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score().total_cmp(&a.score()));
        scored.truncate(limit);
        scored
    }
}
