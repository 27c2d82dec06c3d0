//! Content Validator

use crate::common::{self, DraftRule};
use quiz_core::{Draft, Phase, QuizError, RuleContext, ValidationLimits, ValidationResult};
use quiz_registry::TypeRegistry;
use tracing::debug;

/// Validates drafts against the common rules and the registry's type rules
#[derive(Debug, Clone)]
pub struct ContentValidator<'r> {
    registry: &'r TypeRegistry,
    limits: ValidationLimits,
    common: Vec<DraftRule>,
}

impl ContentValidator<'static> {
    /// Validator over the global registry with default limits
    pub fn standard() -> Self {
        Self::new(TypeRegistry::global())
    }
}

impl Default for ContentValidator<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'r> ContentValidator<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            limits: ValidationLimits::default(),
            common: common::rules(),
        }
    }

    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Validate while editing
    pub fn validate(&self, draft: &Draft) -> Result<ValidationResult, QuizError> {
        self.validate_in(draft, Phase::Editing)
    }

    /// Validate right before a save
    pub fn validate_for_save(&self, draft: &Draft) -> Result<ValidationResult, QuizError> {
        self.validate_in(draft, Phase::Save)
    }

    /// Run every rule for `phase`.
    ///
    /// Fails only when the draft's type is not registered; a draft that is
    /// merely incomplete always yields findings instead.
    pub fn validate_in(&self, draft: &Draft, phase: Phase) -> Result<ValidationResult, QuizError> {
        let ctx = RuleContext::new(phase, &self.limits);

        // Resolve first so an unregistered type fails before any work is done.
        let entry = draft
            .question_type
            .map(|kind| self.registry.entry(kind))
            .transpose()?;

        let mut findings: Vec<_> = self
            .common
            .iter()
            .flat_map(|rule| rule.evaluate(draft, &ctx))
            .collect();

        if let (Some(entry), Some(content)) = (entry, &draft.content) {
            if content.kind() == entry.kind {
                findings.extend(entry.check(content, &ctx));
            }
        }

        let result = ValidationResult::new(findings);
        debug!(
            question_type = ?draft.question_type,
            ?phase,
            errors = result.error_count(),
            warnings = result.warning_count(),
            "draft validated"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::{Content, Difficulty, QuestionType, TrueFalseContent};
    use quiz_registry::types;

    fn tf(answer: Option<bool>) -> Draft {
        Draft::with_content(Content::TrueFalse(TrueFalseContent { answer }))
            .with_title("Water boils at 100C at sea level")
            .with_difficulty(Difficulty::Easy)
            .with_topic("physics")
            .with_xp(10)
    }

    #[test]
    fn test_type_rules_follow_common_rules() {
        let mut draft = tf(None);
        draft.title.clear();
        let result = ContentValidator::standard().validate(&draft).unwrap();
        let ids: Vec<_> = result.findings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["title.required", "true_false.answer_required"]);
    }

    #[test]
    fn test_type_rules_skipped_on_mismatch() {
        let mut draft = tf(None);
        draft.question_type = Some(QuestionType::CodeChallenge);
        let result = ContentValidator::standard().validate(&draft).unwrap();
        assert_eq!(result.error_count(), 1);
        assert!(result.has_rule("content.matches_type"));
    }

    #[test]
    fn test_unregistered_type_is_fatal() {
        let mut registry = TypeRegistry::empty();
        registry.register(types::matching::entry());
        let err = ContentValidator::new(&registry).validate(&tf(Some(true))).unwrap_err();
        assert_eq!(err, QuizError::UnknownType("true_false".to_string()));
    }

    #[test]
    fn test_limits_are_applied() {
        let limits = ValidationLimits {
            max_title_chars: 5,
            ..ValidationLimits::default()
        };
        let validator = ContentValidator::standard().with_limits(limits);
        let result = validator.validate(&tf(Some(true))).unwrap();
        assert!(result.has_rule("title.length"));
    }
}
