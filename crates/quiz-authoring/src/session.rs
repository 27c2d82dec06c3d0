//! Edit sessions
//!
//! One session owns one draft for the lifetime of a create or edit flow.
//! Every structural change re-runs editing-phase validation, so the current
//! findings are always available without asking for them.

use crate::reconcile::{from_record, Reconciler, SaveError};
use crate::store::QuestionStore;
use quiz_core::{
    Draft, Hint, HintPatch, Question, QuestionId, QuestionType, QuizError, ValidationResult,
};
use tracing::{debug, info};

#[derive(Debug)]
pub struct EditSession<'r> {
    reconciler: Reconciler<'r>,
    draft: Draft,
    /// Id of the record being edited; `None` in create mode
    existing: Option<QuestionId>,
    baseline: String,
    result: ValidationResult,
}

impl<'r> EditSession<'r> {
    /// Start from an empty draft
    pub fn create(reconciler: Reconciler<'r>) -> Result<Self, QuizError> {
        Self::start(reconciler, Draft::empty(), None)
    }

    /// Start from an existing record; the record itself is never touched
    pub fn open(reconciler: Reconciler<'r>, record: &Question) -> Result<Self, QuizError> {
        Self::start(reconciler, from_record(record), Some(record.id.clone()))
    }

    /// Load a record from `store` and start editing it
    pub fn open_from<S: QuestionStore + ?Sized>(
        reconciler: Reconciler<'r>,
        store: &S,
        id: &QuestionId,
    ) -> Result<Self, QuizError> {
        let record = store.get(id)?;
        Self::open(reconciler, &record)
    }

    fn start(reconciler: Reconciler<'r>, draft: Draft, existing: Option<QuestionId>) -> Result<Self, QuizError> {
        let result = reconciler.validator().validate(&draft)?;
        Ok(Self {
            baseline: draft.fingerprint(),
            reconciler,
            draft,
            existing,
            result,
        })
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Findings from the latest validation
    pub fn findings(&self) -> &ValidationResult {
        &self.result
    }

    pub fn id(&self) -> Option<&QuestionId> {
        self.existing.as_ref()
    }

    pub fn is_create(&self) -> bool {
        self.existing.is_none()
    }

    /// True when the draft differs from what the session started with or last saved
    pub fn is_dirty(&self) -> bool {
        self.draft.fingerprint() != self.baseline
    }

    pub fn can_save(&self) -> bool {
        self.reconciler
            .validator()
            .validate_for_save(&self.draft)
            .map(|r| r.is_save_eligible())
            .unwrap_or(false)
    }

    fn revalidate(&mut self) -> Result<&ValidationResult, QuizError> {
        self.result = self.reconciler.validator().validate(&self.draft)?;
        debug!(
            errors = self.result.error_count(),
            warnings = self.result.warning_count(),
            "draft revalidated"
        );
        Ok(&self.result)
    }

    /// Apply an arbitrary change to the draft and re-validate
    pub fn edit<F>(&mut self, change: F) -> Result<&ValidationResult, QuizError>
    where
        F: FnOnce(&mut Draft),
    {
        change(&mut self.draft);
        self.revalidate()
    }

    /// Switch the question type, resetting content to the new type's default.
    ///
    /// Choosing the type the draft already has keeps its content.
    pub fn set_type(&mut self, kind: QuestionType) -> Result<&ValidationResult, QuizError> {
        let entry = self.reconciler.validator().registry().entry(kind)?;
        let unchanged = self.draft.question_type == Some(kind)
            && self.draft.content.as_ref().map(|c| c.kind()) == Some(kind);
        if !unchanged {
            self.draft.question_type = Some(kind);
            self.draft.content = Some(entry.default_content());
        }
        self.revalidate()
    }

    pub fn append_hint(&mut self, hint: Hint) -> Result<&ValidationResult, QuizError> {
        self.draft.hints.append(hint);
        self.revalidate()
    }

    pub fn remove_hint(&mut self, position: usize) -> Result<Hint, QuizError> {
        let hint = self.draft.hints.remove(position)?;
        self.revalidate()?;
        Ok(hint)
    }

    pub fn move_hint(&mut self, from: usize, to: usize) -> Result<&ValidationResult, QuizError> {
        self.draft.hints.move_hint(from, to)?;
        self.revalidate()
    }

    pub fn update_hint(&mut self, position: usize, patch: HintPatch) -> Result<&ValidationResult, QuizError> {
        self.draft.hints.update(position, patch)?;
        self.revalidate()
    }

    /// Reconcile the draft and hand it to `store`.
    ///
    /// On success the session follows the stored record, so a later save
    /// updates it. On failure the draft is left as it was.
    pub fn save<S: QuestionStore + ?Sized>(&mut self, store: &mut S) -> Result<Question, SaveError> {
        let request = self.reconciler.to_record(&self.draft, self.existing.as_ref())?;
        let created = request.id().is_none();
        let saved = store.apply(request)?;
        info!(id = %saved.id, created, question_type = %saved.question_type(), "question saved");

        self.draft = from_record(&saved);
        self.baseline = self.draft.fingerprint();
        self.existing = Some(saved.id.clone());
        self.revalidate()?;
        Ok(saved)
    }

    /// Drop the draft without saving
    pub fn cancel(self) {
        debug!(dirty = self.is_dirty(), "edit session cancelled");
    }
}
