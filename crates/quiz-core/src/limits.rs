//! Validation limits
//!
//! Thresholds used by the rules. Loaded from YAML; any key left out keeps
//! its default.

use crate::error::QuizError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Longest accepted title, in characters
    pub max_title_chars: usize,

    /// Upper bound for `xpReward` (inclusive)
    pub max_xp: u32,

    /// Time limits above this only warn
    pub max_time_limit_secs: Option<u32>,

    /// Hint counts above this only warn
    pub max_hints: usize,

    // === Multiple choice ===

    pub min_options: usize,

    /// Option counts above this only warn
    pub max_options: usize,

    // === Code challenge ===

    /// Language tags the runner knows; others warn
    pub supported_languages: Vec<String>,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_title_chars: 200,
            max_xp: 10_000,
            max_time_limit_secs: Some(86_400),
            max_hints: 10,
            min_options: 2,
            max_options: 10,
            supported_languages: ["python", "javascript", "typescript", "rust", "java", "c", "cpp", "go"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ValidationLimits {
    /// Load limits from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, QuizError> {
        serde_yaml::from_str(yaml).map_err(|e| QuizError::Parse(format!("limits: {}", e)))
    }

    pub fn supports_language(&self, language: &str) -> bool {
        self.supported_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = ValidationLimits::default();
        assert_eq!(limits.max_xp, 10_000);
        assert_eq!(limits.min_options, 2);
        assert!(limits.supports_language("Rust"));
        assert!(!limits.supports_language("cobol"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let limits = ValidationLimits::from_yaml("max_xp: 500\nsupported_languages: [python]\n").unwrap();
        assert_eq!(limits.max_xp, 500);
        assert_eq!(limits.max_title_chars, 200);
        assert!(!limits.supports_language("rust"));
    }

    #[test]
    fn test_bad_yaml() {
        let err = ValidationLimits::from_yaml("max_xp: lots").unwrap_err();
        assert!(matches!(err, QuizError::Parse(_)));
    }
}
