//! Payload items decoded into drafts

use quiz_core::{Draft, Finding, QuestionId, QuizError};

/// One item read leniently: whatever could be read, plus what could not
#[derive(Debug, Clone)]
pub(crate) struct Decoded {
    /// `None` when the item cannot be validated at all
    pub draft: Option<Draft>,
    /// Id given in the payload, making the item an update
    pub existing: Option<QuestionId>,
    pub findings: Vec<Finding>,
}

impl Decoded {
    pub fn new(draft: Draft, existing: Option<QuestionId>, findings: Vec<Finding>) -> Self {
        Self {
            draft: Some(draft),
            existing,
            findings,
        }
    }

    pub fn rejected(findings: Vec<Finding>) -> Self {
        Self {
            draft: None,
            existing: None,
            findings,
        }
    }
}

pub(crate) fn malformed(field: impl Into<String>, message: impl Into<String>) -> Finding {
    Finding::error("import.malformed", field, message)
}

pub(crate) fn malformed_content(message: impl Into<String>) -> Finding {
    Finding::error("import.malformed_content", "content", message)
}

pub(crate) fn unknown_type(err: &QuizError) -> Finding {
    Finding::error("type.unknown", "type", err.to_string())
}

/// Whether a finding on `field` is explained by a decode problem on `decoded`
pub(crate) fn covered_by(decoded: &str, field: &str) -> bool {
    field == decoded
        || field
            .strip_prefix(decoded)
            .map_or(false, |rest| rest.starts_with('.') || rest.starts_with('['))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covered_by() {
        assert!(covered_by("content", "content"));
        assert!(covered_by("content", "content.options[0]"));
        assert!(covered_by("hints", "hints[2].text"));
        assert!(!covered_by("hints", "hintsExtra"));
        assert!(!covered_by("title", "type"));
    }
}
