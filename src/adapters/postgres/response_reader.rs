//! PostgreSQL implementation of ResponseReader.

use std::collections::HashMap;

use crate::domain::foundation::{AspectId, DimensionId, DomainError, ErrorCode, ProfileId};
use crate::domain::response::{ProfileActivity, ResponseEvidence, ResponseType};
use crate::ports::ResponseReader;
use async_trait::async_trait;
use sqlx::PgPool;

/// Read-side queries over `responses`, `answer_options` and `entities`.
pub struct PostgresResponseReader {
    pool: PgPool,
}

impl PostgresResponseReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EvidenceRow {
    response_type: String,
    aspect_id: Option<i64>,
    dimension_id: Option<i64>,
    weight: f64,
}

impl TryFrom<EvidenceRow> for ResponseEvidence {
    type Error = DomainError;

    fn try_from(row: EvidenceRow) -> Result<Self, Self::Error> {
        let response_type: ResponseType = row.response_type.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid response row: {}", e))
        })?;
        Ok(ResponseEvidence {
            response_type,
            aspect_id: row.aspect_id.map(AspectId::new),
            dimension_id: row.dimension_id.map(DimensionId::new),
            weight: row.weight,
        })
    }
}

fn count(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[async_trait]
impl ResponseReader for PostgresResponseReader {
    async fn evidence_for_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<ResponseEvidence>, DomainError> {
        let rows: Vec<EvidenceRow> = sqlx::query_as(
            r#"
            SELECT r.response_type, ao.aspect_id, a.dimension_id, ao.weight
            FROM responses r
            JOIN answer_options ao ON ao.id = r.answer_option_id
            LEFT JOIN aspects a ON a.id = ao.aspect_id
            WHERE r.profile_id = $1
            "#,
        )
        .bind(profile_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load response evidence", e))?;

        rows.into_iter().map(ResponseEvidence::try_from).collect()
    }

    async fn coverage_by_dimension(
        &self,
        profile_id: &ProfileId,
    ) -> Result<HashMap<DimensionId, u32>, DomainError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT q.primary_dimension_id, COUNT(*)
            FROM responses r
            JOIN questions q ON q.id = r.question_id
            WHERE r.profile_id = $1
            GROUP BY q.primary_dimension_id
            "#,
        )
        .bind(profile_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load dimension coverage", e))?;

        Ok(rows
            .into_iter()
            .map(|(dimension, responses)| (DimensionId::new(dimension), count(responses)))
            .collect())
    }

    async fn activity(&self, profile_id: &ProfileId) -> Result<ProfileActivity, DomainError> {
        let (explicit, passive, entities): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE response_type = 'selected'),
                COUNT(*) FILTER (WHERE response_type <> 'selected'),
                (SELECT COUNT(*) FROM entities e WHERE e.profile_id = $1)
            FROM responses
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load profile activity", e))?;

        Ok(ProfileActivity {
            explicit_responses: count(explicit),
            passive_responses: count(passive),
            ingested_entities: count(entities),
        })
    }
}
