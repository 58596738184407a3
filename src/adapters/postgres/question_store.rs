//! PostgreSQL implementation of QuestionReader and QuestionRepository.

use std::collections::HashMap;

use crate::domain::foundation::{
    AnswerOptionId, AspectId, DimensionId, DomainError, ErrorCode, ProfileId, QuestionId,
};
use crate::domain::pattern::UpsertOutcome;
use crate::domain::taxonomy::{AnswerOption, NewQuestion, Question, QuestionSource, QuestionType};
use crate::ports::{QuestionReader, QuestionRepository};
use async_trait::async_trait;
use sqlx::PgPool;

/// Question bank backed by the `questions` and `answer_options` tables.
pub struct PostgresQuestionStore {
    pool: PgPool,
}

impl PostgresQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    id: i64,
    text: String,
    question_type: String,
    primary_dimension_id: i64,
    difficulty_level: i16,
    engagement_factor: f64,
    active: bool,
    source: String,
}

#[derive(Debug, sqlx::FromRow)]
struct OptionRow {
    id: i64,
    question_id: i64,
    position: i16,
    text: String,
    aspect_id: Option<i64>,
    weight: f64,
}

impl QuestionRow {
    fn into_question(self, options: Vec<AnswerOption>) -> Result<Question, DomainError> {
        let question_type: QuestionType = self.question_type.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid question row: {}", e))
        })?;
        let source: QuestionSource = self.source.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid question row: {}", e))
        })?;
        Ok(Question {
            id: QuestionId::new(self.id),
            text: self.text,
            question_type,
            primary_dimension_id: DimensionId::new(self.primary_dimension_id),
            difficulty_level: u8::try_from(self.difficulty_level).unwrap_or(1),
            engagement_factor: self.engagement_factor,
            active: self.active,
            source,
            options,
        })
    }
}

impl From<OptionRow> for AnswerOption {
    fn from(row: OptionRow) -> Self {
        AnswerOption {
            id: AnswerOptionId::new(row.id),
            position: u16::try_from(row.position).unwrap_or(0),
            text: row.text,
            aspect_id: row.aspect_id.map(AspectId::new),
            weight: row.weight,
        }
    }
}

#[async_trait]
impl QuestionReader for PostgresQuestionStore {
    async fn unanswered_active(
        &self,
        profile_id: &ProfileId,
        pool_limit: usize,
    ) -> Result<Vec<Question>, DomainError> {
        let limit = i64::try_from(pool_limit).unwrap_or(i64::MAX);
        let rows: Vec<QuestionRow> = sqlx::query_as(
            r#"
            SELECT q.id, q.text, q.question_type, q.primary_dimension_id, q.difficulty_level,
                   q.engagement_factor, q.active, q.source
            FROM questions q
            WHERE q.active
              AND NOT EXISTS (
                  SELECT 1 FROM responses r
                  WHERE r.profile_id = $1 AND r.question_id = q.id
              )
            ORDER BY q.engagement_factor DESC, q.id
            LIMIT $2
            "#,
        )
        .bind(profile_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load candidate questions", e))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let option_rows: Vec<OptionRow> = sqlx::query_as(
            r#"
            SELECT id, question_id, position, text, aspect_id, weight
            FROM answer_options
            WHERE question_id = ANY($1)
            ORDER BY question_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to load answer options", e))?;

        let mut options: HashMap<i64, Vec<AnswerOption>> = HashMap::new();
        for row in option_rows {
            options.entry(row.question_id).or_default().push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let opts = options.remove(&row.id).unwrap_or_default();
                row.into_question(opts)
            })
            .collect()
    }
}

#[async_trait]
impl QuestionRepository for PostgresQuestionStore {
    async fn upsert_generated(
        &self,
        question: &NewQuestion,
    ) -> Result<(QuestionId, UpsertOutcome), DomainError> {
        question.validate()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO questions (
                text, question_type, primary_dimension_id, difficulty_level,
                engagement_factor, active, source
            ) VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            ON CONFLICT (text) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&question.text)
        .bind(question.question_type.as_str())
        .bind(question.primary_dimension_id.value())
        .bind(i16::from(question.difficulty_level))
        .bind(question.engagement_factor)
        .bind(question.source.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to insert question", e))?;

        let result = match inserted {
            Some(id) => {
                for (position, option) in question.options.iter().enumerate() {
                    sqlx::query(
                        r#"
                        INSERT INTO answer_options (question_id, position, text, aspect_id, weight)
                        VALUES ($1, $2, $3, $4, $5)
                        "#,
                    )
                    .bind(id)
                    .bind(i16::try_from(position + 1).unwrap_or(i16::MAX))
                    .bind(&option.text)
                    .bind(option.aspect_id.map(|a| a.value()))
                    .bind(option.weight)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| DomainError::database("Failed to insert answer option", e))?;
                }
                (QuestionId::new(id), UpsertOutcome::Inserted)
            }
            None => {
                let id: i64 = sqlx::query_scalar("SELECT id FROM questions WHERE text = $1")
                    .bind(&question.text)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| DomainError::database("Failed to find existing question", e))?;
                (QuestionId::new(id), UpsertOutcome::Updated)
            }
        };

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit question", e))?;

        Ok(result)
    }
}
