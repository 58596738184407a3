//! PostgreSQL implementation of EntityRepository.

use crate::domain::entity::{Entity, EntitySource, EntityType};
use crate::domain::foundation::{
    DomainError, EntityId, ErrorCode, ProfileId, Timestamp, ValidationError,
};
use crate::domain::pattern::UpsertOutcome;
use crate::ports::EntityRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresEntityRepository {
    pool: PgPool,
}

impl PostgresEntityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EntityRow {
    id: Uuid,
    profile_id: Uuid,
    entity_type: String,
    name: String,
    source: String,
    source_id: Option<String>,
    occurred_at: Option<DateTime<Utc>>,
    metadata: serde_json::Value,
}

impl TryFrom<EntityRow> for Entity {
    type Error = DomainError;

    fn try_from(row: EntityRow) -> Result<Self, Self::Error> {
        let invalid = |e: ValidationError| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid entity row: {}", e))
        };
        let entity_type: EntityType = row.entity_type.parse().map_err(invalid)?;
        let source: EntitySource = row.source.parse().map_err(invalid)?;
        Ok(Entity {
            id: EntityId::from_uuid(row.id),
            profile_id: ProfileId::from_uuid(row.profile_id),
            entity_type,
            name: row.name,
            source,
            source_id: row.source_id,
            occurred_at: row.occurred_at.map(Timestamp::from_datetime),
            metadata: row.metadata,
        })
    }
}

#[async_trait]
impl EntityRepository for PostgresEntityRepository {
    async fn upsert(&self, entity: &Entity) -> Result<UpsertOutcome, DomainError> {
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO entities (
                id, profile_id, entity_type, name, source, source_id, occurred_at, metadata
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT ON CONSTRAINT entities_profile_type_name_key
            DO UPDATE SET
                source = EXCLUDED.source,
                source_id = EXCLUDED.source_id,
                occurred_at = EXCLUDED.occurred_at,
                metadata = EXCLUDED.metadata,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(entity.id.as_uuid())
        .bind(entity.profile_id.as_uuid())
        .bind(entity.entity_type.as_str())
        .bind(&entity.name)
        .bind(entity.source.as_str())
        .bind(&entity.source_id)
        .bind(entity.occurred_at.map(|at| *at.as_datetime()))
        .bind(&entity.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to upsert entity", e))?;

        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }

    async fn find_by_profile(&self, profile_id: &ProfileId) -> Result<Vec<Entity>, DomainError> {
        let rows: Vec<EntityRow> = sqlx::query_as(
            r#"
            SELECT id, profile_id, entity_type, name, source, source_id, occurred_at, metadata
            FROM entities
            WHERE profile_id = $1
            ORDER BY created_at, name
            "#,
        )
        .bind(profile_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load entities", e))?;

        rows.into_iter().map(Entity::try_from).collect()
    }
}
