//! Persistence contract
//!
//! The engine never talks to storage itself. Callers hand a
//! [`SaveRequest`] to whatever implements [`QuestionStore`].

use crate::reconcile::SaveRequest;
use quiz_core::{Question, QuestionData, QuestionId, QuizError};
use std::collections::BTreeMap;
use uuid::Uuid;

pub trait QuestionStore {
    fn get(&self, id: &QuestionId) -> Result<Question, QuizError>;

    /// Store a new record under a freshly allocated id
    fn create(&mut self, data: QuestionData) -> Result<Question, QuizError>;

    /// Replace an existing record
    fn update(&mut self, question: Question) -> Result<Question, QuizError>;

    fn apply(&mut self, request: SaveRequest) -> Result<Question, QuizError> {
        match request {
            SaveRequest::Create(data) => self.create(data),
            SaveRequest::Update(question) => self.update(question),
        }
    }
}

/// Map-backed store with UUID ids
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: BTreeMap<QuestionId, Question>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in id order
    pub fn list(&self) -> impl Iterator<Item = &Question> {
        self.records.values()
    }
}

impl QuestionStore for InMemoryStore {
    fn get(&self, id: &QuestionId) -> Result<Question, QuizError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| QuizError::NotFound(id.clone()))
    }

    fn create(&mut self, data: QuestionData) -> Result<Question, QuizError> {
        let id = QuestionId::new(Uuid::new_v4().to_string());
        let question = Question::new(id.clone(), data);
        self.records.insert(id, question.clone());
        Ok(question)
    }

    fn update(&mut self, question: Question) -> Result<Question, QuizError> {
        match self.records.get_mut(&question.id) {
            Some(slot) => {
                *slot = question.clone();
                Ok(question)
            }
            None => Err(QuizError::NotFound(question.id)),
        }
    }
}
