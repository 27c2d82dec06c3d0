//! Draft Reconciler
//!
//! Converts between persisted records and editable drafts. A record becomes
//! a draft unconditionally; a draft becomes a record only when save-phase
//! validation reports no errors.

use quiz_core::{Draft, Question, QuestionData, QuestionId, QuizError, ValidationResult};
use quiz_validate::ContentValidator;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the persistence layer is asked to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "record", rename_all = "snake_case")]
pub enum SaveRequest {
    /// New record; the store allocates the id
    Create(QuestionData),
    /// Whole-record replacement keeping the id
    Update(Question),
}

impl SaveRequest {
    pub fn data(&self) -> &QuestionData {
        match self {
            SaveRequest::Create(data) => data,
            SaveRequest::Update(question) => &question.data,
        }
    }

    pub fn id(&self) -> Option<&QuestionId> {
        match self {
            SaveRequest::Create(_) => None,
            SaveRequest::Update(question) => Some(&question.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    /// Save-phase validation found errors; nothing was built
    #[error("draft is not valid: {}", .0.summary())]
    Invalid(ValidationResult),

    #[error(transparent)]
    Engine(#[from] QuizError),
}

/// Deep copy of a record into an editable draft
pub fn from_record(record: &Question) -> Draft {
    let data = &record.data;
    Draft {
        question_type: Some(data.question_type()),
        title: data.title.clone(),
        description: data.description.clone(),
        difficulty: Some(data.difficulty),
        topics: data.topics.clone(),
        tags: data.tags.clone(),
        xp_reward: i64::from(data.xp_reward),
        time_limit: data.time_limit.map(i64::from),
        hints: data.hints.clone(),
        explanation: data.explanation.clone(),
        is_public: data.is_public,
        content: Some(data.content.clone()),
    }
}

/// Validates drafts for save and builds save requests
#[derive(Debug, Clone)]
pub struct Reconciler<'r> {
    validator: ContentValidator<'r>,
}

impl Reconciler<'static> {
    pub fn standard() -> Self {
        Self::new(ContentValidator::standard())
    }
}

impl<'r> Reconciler<'r> {
    pub fn new(validator: ContentValidator<'r>) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &ContentValidator<'r> {
        &self.validator
    }

    /// Build the save request for `draft`, or refuse with the findings
    pub fn to_record(&self, draft: &Draft, existing: Option<&QuestionId>) -> Result<SaveRequest, SaveError> {
        self.reconcile(draft, existing).map(|(request, _)| request)
    }

    /// Like [`Reconciler::to_record`], also returning the findings (warnings only on success)
    pub fn reconcile(
        &self,
        draft: &Draft,
        existing: Option<&QuestionId>,
    ) -> Result<(SaveRequest, ValidationResult), SaveError> {
        let result = self.validator.validate_for_save(draft)?;
        if !result.is_save_eligible() {
            return Err(SaveError::Invalid(result));
        }
        let data = build(draft)?;
        let request = match existing {
            Some(id) => SaveRequest::Update(Question::new(id.clone(), data)),
            None => SaveRequest::Create(data),
        };
        Ok((request, result))
    }
}

/// Assemble a record from a draft that already passed validation. Text is
/// copied as written so a record survives a draft round trip unchanged.
fn build(draft: &Draft) -> Result<QuestionData, QuizError> {
    let content = draft.content.clone().ok_or(QuizError::Incomplete("content"))?;
    let difficulty = draft.difficulty.ok_or(QuizError::Incomplete("difficulty"))?;
    let xp_reward = u32::try_from(draft.xp_reward).map_err(|_| QuizError::Incomplete("xpReward"))?;
    let time_limit = draft
        .time_limit
        .map(u32::try_from)
        .transpose()
        .map_err(|_| QuizError::Incomplete("timeLimit"))?;

    Ok(QuestionData {
        title: draft.title.clone(),
        description: draft.description.clone(),
        difficulty,
        topics: draft.topics.clone(),
        tags: draft.tags.clone(),
        xp_reward,
        time_limit,
        hints: draft.hints.clone(),
        explanation: draft.explanation.clone(),
        is_public: draft.is_public,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::{Content, Difficulty, Hint, TrueFalseContent};

    fn record() -> Question {
        let mut hints = quiz_core::HintSequence::new();
        hints.append(Hint::new("Think of boiling water", 5));
        Question::new(
            QuestionId::new("q-1"),
            QuestionData {
                title: "Water boils at 100C".to_string(),
                description: Some("At sea level".to_string()),
                difficulty: Difficulty::Easy,
                topics: ["physics".to_string()].into_iter().collect(),
                tags: Default::default(),
                xp_reward: 20,
                time_limit: Some(30),
                hints,
                explanation: None,
                is_public: true,
                content: Content::TrueFalse(TrueFalseContent { answer: Some(true) }),
            },
        )
    }

    #[test]
    fn test_roundtrip_keeps_record() {
        let original = record();
        let draft = from_record(&original);
        let request = Reconciler::standard().to_record(&draft, Some(&original.id)).unwrap();
        assert_eq!(request, SaveRequest::Update(original));
    }

    #[test]
    fn test_create_without_id() {
        let draft = from_record(&record());
        let request = Reconciler::standard().to_record(&draft, None).unwrap();
        assert!(matches!(request, SaveRequest::Create(_)));
        assert_eq!(request.id(), None);
    }

    #[test]
    fn test_save_request_wire_shape() {
        let request = SaveRequest::Update(record());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["op"], "update");
        assert_eq!(value["record"]["id"], "q-1");
        assert_eq!(value["record"]["type"], "true_false");
        assert_eq!(value["record"]["content"]["answer"], true);

        let parsed: SaveRequest = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_draft_edits_do_not_touch_record() {
        let original = record();
        let mut draft = from_record(&original);
        draft.title.push_str(" (edited)");
        draft.hints.append(Hint::new("Another", 1));
        assert_eq!(original, record());
    }

    #[test]
    fn test_roundtrip_keeps_text_as_written() {
        let mut original = record();
        original.data.title = "  Padded  ".to_string();
        original.data.description = Some("   ".to_string());
        original.data.explanation = Some(String::new());

        let draft = from_record(&original);
        assert_eq!(draft.description.as_deref(), Some("   "));
        assert_eq!(draft.explanation.as_deref(), Some(""));

        let request = Reconciler::standard().to_record(&draft, Some(&original.id)).unwrap();
        assert_eq!(request, SaveRequest::Update(original));
    }

    #[test]
    fn test_absent_and_empty_text_stay_distinct() {
        let mut draft = from_record(&record());
        draft.description = None;
        draft.explanation = Some(String::new());
        let request = Reconciler::standard().to_record(&draft, None).unwrap();
        assert_eq!(request.data().description, None);
        assert_eq!(request.data().explanation.as_deref(), Some(""));
    }

    #[test]
    fn test_blank_title_is_refused_not_trimmed() {
        let mut draft = from_record(&record());
        draft.title = "   ".to_string();
        let err = Reconciler::standard().to_record(&draft, None).unwrap_err();
        match err {
            SaveError::Invalid(result) => assert!(result.has_rule("title.required")),
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_draft_is_refused() {
        let mut draft = from_record(&record());
        draft.xp_reward = -10;
        match Reconciler::standard().to_record(&draft, None) {
            Err(SaveError::Invalid(result)) => assert!(result.has_rule("xp.range")),
            other => panic!("expected refusal, got {:?}", other),
        }
    }
}
