//! PostgreSQL implementation of PatternRepository.
//!
//! Both pattern key shapes are partial unique indexes (see the
//! `create_patterns` migration); each upsert is a single
//! `INSERT ... ON CONFLICT ... DO UPDATE` against the matching index.

use crate::domain::foundation::{
    AspectId, Confidence, DimensionId, DomainError, ErrorCode, ProfileId, Timestamp,
};
use crate::domain::pattern::{Pattern, PatternKind, UpsertOutcome};
use crate::ports::PatternRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PatternRepository port.
pub struct PostgresPatternRepository {
    pool: PgPool,
}

impl PostgresPatternRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a pattern.
#[derive(Debug, sqlx::FromRow)]
struct PatternRow {
    profile_id: Uuid,
    pattern_type: String,
    dimension_id: Option<i64>,
    aspect_id: Option<i64>,
    confidence: f64,
    strength: f64,
    evidence_count: i32,
    impact_score: f64,
    metadata: Option<serde_json::Value>,
    last_updated: DateTime<Utc>,
}

impl TryFrom<PatternRow> for Pattern {
    type Error = DomainError;

    fn try_from(row: PatternRow) -> Result<Self, Self::Error> {
        let kind = PatternKind::from_parts(
            &row.pattern_type,
            row.dimension_id.map(DimensionId::new),
            row.aspect_id.map(AspectId::new),
            row.metadata,
        )
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid pattern row '{}': {}", row.pattern_type, e),
            )
        })?;

        Ok(Pattern {
            profile_id: ProfileId::from_uuid(row.profile_id),
            kind,
            confidence: Confidence::new(row.confidence),
            strength: row.strength,
            evidence_count: u32::try_from(row.evidence_count).unwrap_or(0),
            impact_score: row.impact_score,
            last_updated: Timestamp::from_datetime(row.last_updated),
        })
    }
}

fn synergy_metadata(pattern: &Pattern) -> Result<Option<serde_json::Value>, DomainError> {
    match &pattern.kind {
        PatternKind::Synergy(meta) => serde_json::to_value(meta).map(Some).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode synergy metadata: {}", e),
            )
        }),
        _ => Ok(None),
    }
}

fn outcome(inserted: bool) -> UpsertOutcome {
    if inserted {
        UpsertOutcome::Inserted
    } else {
        UpsertOutcome::Updated
    }
}

#[async_trait]
impl PatternRepository for PostgresPatternRepository {
    async fn upsert(&self, pattern: &Pattern) -> Result<UpsertOutcome, DomainError> {
        let metadata = synergy_metadata(pattern)?;
        let evidence_count = i32::try_from(pattern.evidence_count).unwrap_or(i32::MAX);

        // xmax is zero only for freshly inserted tuples
        let sql = if pattern.is_aspect() {
            r#"
            INSERT INTO patterns (
                profile_id, pattern_type, dimension_id, aspect_id, confidence, strength,
                evidence_count, impact_score, metadata, last_updated
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (profile_id, dimension_id, aspect_id) WHERE aspect_id IS NOT NULL
            DO UPDATE SET
                confidence = EXCLUDED.confidence,
                strength = EXCLUDED.strength,
                evidence_count = EXCLUDED.evidence_count,
                impact_score = EXCLUDED.impact_score,
                last_updated = EXCLUDED.last_updated
            RETURNING (xmax = 0) AS inserted
            "#
        } else {
            r#"
            INSERT INTO patterns (
                profile_id, pattern_type, dimension_id, aspect_id, confidence, strength,
                evidence_count, impact_score, metadata, last_updated
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (profile_id, pattern_type) WHERE aspect_id IS NULL
            DO UPDATE SET
                confidence = EXCLUDED.confidence,
                strength = EXCLUDED.strength,
                evidence_count = EXCLUDED.evidence_count,
                impact_score = EXCLUDED.impact_score,
                metadata = EXCLUDED.metadata,
                last_updated = EXCLUDED.last_updated
            RETURNING (xmax = 0) AS inserted
            "#
        };

        let inserted: bool = sqlx::query_scalar(sql)
            .bind(pattern.profile_id.as_uuid())
            .bind(pattern.pattern_type())
            .bind(pattern.kind.dimension_id().map(|d| d.value()))
            .bind(pattern.kind.aspect_id().map(|a| a.value()))
            .bind(pattern.confidence.value())
            .bind(pattern.strength)
            .bind(evidence_count)
            .bind(pattern.impact_score)
            .bind(metadata)
            .bind(pattern.last_updated.as_datetime())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to upsert pattern", e))?;

        Ok(outcome(inserted))
    }

    async fn find_by_profile(&self, profile_id: &ProfileId) -> Result<Vec<Pattern>, DomainError> {
        let rows: Vec<PatternRow> = sqlx::query_as(
            r#"
            SELECT profile_id, pattern_type, dimension_id, aspect_id, confidence, strength,
                   evidence_count, impact_score, metadata, last_updated
            FROM patterns
            WHERE profile_id = $1
            ORDER BY id
            "#,
        )
        .bind(profile_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load patterns", e))?;

        rows.into_iter().map(Pattern::try_from).collect()
    }
}
