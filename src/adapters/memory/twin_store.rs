//! In-memory implementation of every storage port.
//!
//! All state lives behind a single `RwLock`, so each upsert is atomic with
//! respect to concurrent readers and writers. Intended for tests and for
//! embedding the engine without a database.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::entity::Entity;
use crate::domain::foundation::{
    AnswerOptionId, AspectId, DimensionId, DomainError, ErrorCode, ProfileId, QuestionId,
};
use crate::domain::pattern::{Pattern, PatternKey, UpsertOutcome};
use crate::domain::response::{ProfileActivity, Response, ResponseEvidence, ResponseType};
use crate::domain::taxonomy::{AnswerOption, Aspect, Dimension, NewQuestion, Question};
use crate::ports::{
    EntityRepository, PatternRepository, QuestionReader, QuestionRepository, ResponseReader,
};

#[derive(Default)]
struct State {
    dimensions: BTreeMap<DimensionId, Dimension>,
    aspects: BTreeMap<AspectId, Aspect>,
    questions: BTreeMap<QuestionId, Question>,
    option_index: HashMap<AnswerOptionId, QuestionId>,
    responses: Vec<Response>,
    entities: Vec<Entity>,
    patterns: BTreeMap<PatternKey, Pattern>,
    next_aspect_id: i64,
    next_question_id: i64,
    next_option_id: i64,
}

impl State {
    fn option(&self, id: AnswerOptionId) -> Option<&AnswerOption> {
        let question_id = self.option_index.get(&id)?;
        self.questions
            .get(question_id)?
            .options
            .iter()
            .find(|o| o.id == id)
    }

    fn insert_question(&mut self, new: &NewQuestion, active: bool) -> Question {
        self.next_question_id += 1;
        let id = QuestionId::new(self.next_question_id);

        let mut options = Vec::with_capacity(new.options.len());
        for (position, template) in new.options.iter().enumerate() {
            self.next_option_id += 1;
            let option_id = AnswerOptionId::new(self.next_option_id);
            self.option_index.insert(option_id, id);
            options.push(AnswerOption {
                id: option_id,
                position: u16::try_from(position + 1).unwrap_or(u16::MAX),
                text: template.text.clone(),
                aspect_id: template.aspect_id,
                weight: template.weight,
            });
        }

        let question = Question {
            id,
            text: new.text.clone(),
            question_type: new.question_type,
            primary_dimension_id: new.primary_dimension_id,
            difficulty_level: new.difficulty_level,
            engagement_factor: new.engagement_factor,
            active,
            source: new.source,
            options,
        };
        self.questions.insert(id, question.clone());
        question
    }

    fn upsert_pattern(&mut self, pattern: &Pattern) -> UpsertOutcome {
        match self.patterns.insert(pattern.key(), pattern.clone()) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Inserted,
        }
    }
}

/// In-memory twin store.
///
/// Seeding helpers panic if the internal lock is poisoned; port methods
/// report a `StorageUnavailable` error instead.
pub struct InMemoryTwinStore {
    state: RwLock<State>,
    fail_reads: AtomicBool,
}

impl InMemoryTwinStore {
    /// Creates an empty store with no taxonomy.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Creates a store seeded with the fifteen standard dimensions.
    pub fn with_standard_taxonomy() -> Self {
        let store = Self::new();
        {
            let mut state = store.write_seed();
            for dimension in Dimension::standard_set() {
                state.dimensions.insert(dimension.id, dimension);
            }
        }
        store
    }

    /// Makes every read port call fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::StorageUnavailable,
                "In-memory store reads disabled",
            ));
        }
        self.state.read().map_err(|_| {
            DomainError::new(ErrorCode::StorageUnavailable, "In-memory store lock poisoned")
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, DomainError> {
        self.state.write().map_err(|_| {
            DomainError::new(ErrorCode::StorageUnavailable, "In-memory store lock poisoned")
        })
    }

    fn write_seed(&self) -> RwLockWriteGuard<'_, State> {
        self.state
            .write()
            .expect("InMemoryTwinStore: state lock poisoned")
    }

    fn read_seed(&self) -> RwLockReadGuard<'_, State> {
        self.state
            .read()
            .expect("InMemoryTwinStore: state lock poisoned")
    }

    // === Seeding Helpers ===

    /// Adds an aspect under `dimension_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_aspect(&self, dimension_id: DimensionId, name: &str) -> AspectId {
        let mut state = self.write_seed();
        state.next_aspect_id += 1;
        let id = AspectId::new(state.next_aspect_id);
        state.aspects.insert(
            id,
            Aspect {
                id,
                dimension_id,
                name: name.to_string(),
            },
        );
        id
    }

    /// Adds an active static question and returns it with assigned ids.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_question(&self, question: NewQuestion) -> Question {
        self.write_seed().insert_question(&question, true)
    }

    /// Flags a question as inactive.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn deactivate_question(&self, id: QuestionId) {
        if let Some(question) = self.write_seed().questions.get_mut(&id) {
            question.active = false;
        }
    }

    /// Records a response as the surrounding application would.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn record_response(
        &self,
        profile_id: ProfileId,
        question_id: QuestionId,
        answer_option_id: AnswerOptionId,
        response_type: ResponseType,
    ) -> Response {
        let response = Response::new(profile_id, question_id, answer_option_id, response_type);
        self.write_seed().responses.push(response.clone());
        response
    }

    // === Test Helpers ===

    pub fn dimension_count(&self) -> usize {
        self.read_seed().dimensions.len()
    }

    pub fn question_count(&self) -> usize {
        self.read_seed().questions.len()
    }

    pub fn entity_count(&self) -> usize {
        self.read_seed().entities.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.read_seed().patterns.len()
    }

    pub fn pattern_count_for(&self, profile_id: &ProfileId) -> usize {
        self.read_seed()
            .patterns
            .keys()
            .filter(|k| k.profile_id() == *profile_id)
            .count()
    }

    pub fn questions(&self) -> Vec<Question> {
        self.read_seed().questions.values().cloned().collect()
    }
}

impl Default for InMemoryTwinStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseReader for InMemoryTwinStore {
    async fn evidence_for_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<ResponseEvidence>, DomainError> {
        let state = self.read()?;
        Ok(state
            .responses
            .iter()
            .filter(|r| r.profile_id == *profile_id)
            .filter_map(|r| {
                let option = state.option(r.answer_option_id)?;
                let dimension_id = option
                    .aspect_id
                    .and_then(|a| state.aspects.get(&a))
                    .map(|a| a.dimension_id);
                Some(ResponseEvidence {
                    response_type: r.response_type,
                    aspect_id: option.aspect_id,
                    dimension_id,
                    weight: option.weight,
                })
            })
            .collect())
    }

    async fn coverage_by_dimension(
        &self,
        profile_id: &ProfileId,
    ) -> Result<HashMap<DimensionId, u32>, DomainError> {
        let state = self.read()?;
        let mut coverage = HashMap::new();
        for response in state.responses.iter().filter(|r| r.profile_id == *profile_id) {
            if let Some(question) = state.questions.get(&response.question_id) {
                *coverage.entry(question.primary_dimension_id).or_insert(0) += 1;
            }
        }
        Ok(coverage)
    }

    async fn activity(&self, profile_id: &ProfileId) -> Result<ProfileActivity, DomainError> {
        let state = self.read()?;
        let mut activity = ProfileActivity::default();
        for response in state.responses.iter().filter(|r| r.profile_id == *profile_id) {
            if response.response_type.is_passively_collected() {
                activity.passive_responses += 1;
            } else {
                activity.explicit_responses += 1;
            }
        }
        activity.ingested_entities = state
            .entities
            .iter()
            .filter(|e| e.profile_id == *profile_id)
            .count() as u32;
        Ok(activity)
    }
}

#[async_trait]
impl QuestionReader for InMemoryTwinStore {
    async fn unanswered_active(
        &self,
        profile_id: &ProfileId,
        pool_limit: usize,
    ) -> Result<Vec<Question>, DomainError> {
        let state = self.read()?;
        let answered: HashSet<QuestionId> = state
            .responses
            .iter()
            .filter(|r| r.profile_id == *profile_id)
            .map(|r| r.question_id)
            .collect();

        let mut candidates: Vec<Question> = state
            .questions
            .values()
            .filter(|q| q.active && !answered.contains(&q.id))
            .cloned()
            .collect();
        candidates.sort_by(|a, b| {
            b.engagement_factor
                .total_cmp(&a.engagement_factor)
                .then(a.id.cmp(&b.id))
        });
        candidates.truncate(pool_limit);
        Ok(candidates)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryTwinStore {
    async fn upsert_generated(
        &self,
        question: &NewQuestion,
    ) -> Result<(QuestionId, UpsertOutcome), DomainError> {
        question.validate()?;
        let mut state = self.write()?;
        if let Some(existing) = state.questions.values().find(|q| q.text == question.text) {
            return Ok((existing.id, UpsertOutcome::Updated));
        }
        let inserted = state.insert_question(question, true);
        Ok((inserted.id, UpsertOutcome::Inserted))
    }
}

#[async_trait]
impl PatternRepository for InMemoryTwinStore {
    async fn upsert(&self, pattern: &Pattern) -> Result<UpsertOutcome, DomainError> {
        Ok(self.write()?.upsert_pattern(pattern))
    }

    async fn upsert_batch(&self, patterns: &[Pattern]) -> Result<Vec<UpsertOutcome>, DomainError> {
        let mut state = self.write()?;
        Ok(patterns.iter().map(|p| state.upsert_pattern(p)).collect())
    }

    async fn find_by_profile(&self, profile_id: &ProfileId) -> Result<Vec<Pattern>, DomainError> {
        let state = self.read()?;
        Ok(state
            .patterns
            .values()
            .filter(|p| p.profile_id == *profile_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EntityRepository for InMemoryTwinStore {
    async fn upsert(&self, entity: &Entity) -> Result<UpsertOutcome, DomainError> {
        let mut state = self.write()?;
        let existing = state.entities.iter_mut().find(|e| {
            e.profile_id == entity.profile_id
                && e.entity_type == entity.entity_type
                && e.name == entity.name
        });
        match existing {
            Some(row) => {
                row.source = entity.source;
                row.source_id = entity.source_id.clone();
                row.occurred_at = entity.occurred_at;
                row.metadata = entity.metadata.clone();
                Ok(UpsertOutcome::Updated)
            }
            None => {
                state.entities.push(entity.clone());
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    async fn find_by_profile(&self, profile_id: &ProfileId) -> Result<Vec<Entity>, DomainError> {
        let state = self.read()?;
        Ok(state
            .entities
            .iter()
            .filter(|e| e.profile_id == *profile_id)
            .cloned()
            .collect())
    }
}
