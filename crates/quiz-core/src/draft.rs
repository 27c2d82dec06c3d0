//! Editable drafts
//!
//! A draft has the shape of a question but every field is provisional. It
//! may be structurally invalid at any point while the author is still
//! typing: no type chosen yet, negative XP, content that does not match the
//! selected type. Only the validator decides whether it can become a record.

use crate::content::{Content, QuestionType};
use crate::hints::HintSequence;
use crate::model::Difficulty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    #[serde(rename = "type")]
    pub question_type: Option<QuestionType>,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub topics: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    /// Signed so out-of-range input can be held and reported
    pub xp_reward: i64,
    pub time_limit: Option<i64>,
    pub hints: HintSequence,
    pub explanation: Option<String>,
    pub is_public: bool,
    pub content: Option<Content>,
}

impl Draft {
    /// Empty draft for create mode
    pub fn empty() -> Self {
        Self::default()
    }

    /// Draft with a type already chosen and its content set to `content`
    pub fn with_content(content: Content) -> Self {
        Self {
            question_type: Some(content.kind()),
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.insert(topic.into());
        self
    }

    pub fn with_xp(mut self, xp: i64) -> Self {
        self.xp_reward = xp;
        self
    }

    /// Stable digest of the draft, used to detect unsaved edits
    pub fn fingerprint(&self) -> String {
        // Serializing plain data with ordered collections cannot fail.
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        format!("blake3:{}", blake3::hash(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TrueFalseContent;

    #[test]
    fn test_with_content_sets_type() {
        let draft = Draft::with_content(Content::TrueFalse(TrueFalseContent::default()));
        assert_eq!(draft.question_type, Some(QuestionType::TrueFalse));
    }

    #[test]
    fn test_fingerprint_tracks_changes() {
        let draft = Draft::empty().with_title("Capitals");
        let same = draft.clone();
        let changed = draft.clone().with_topic("geography");

        assert_eq!(draft.fingerprint(), same.fingerprint());
        assert_ne!(draft.fingerprint(), changed.fingerprint());
        assert!(draft.fingerprint().starts_with("blake3:"));
    }
}
