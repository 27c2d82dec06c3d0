//! Type-specific question content
//!
//! One variant per question type. The variant discriminant doubles as the
//! question's type tag, so a record can never carry content of one type
//! under the tag of another.

use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Type tag selecting the content variant and rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    CodeChallenge,
    FillInBlank,
    Matching,
    ClickTarget,
}

impl QuestionType {
    pub const ALL: [QuestionType; 6] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::CodeChallenge,
        QuestionType::FillInBlank,
        QuestionType::Matching,
        QuestionType::ClickTarget,
    ];

    /// Wire tag (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::CodeChallenge => "code_challenge",
            QuestionType::FillInBlank => "fill_in_blank",
            QuestionType::Matching => "matching",
            QuestionType::ClickTarget => "click_target",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = QuizError;

    /// Accepts snake_case or kebab-case tags, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| QuizError::UnknownType(s.to_string()))
    }
}

/// Content of a question, tagged by type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Content {
    MultipleChoice(MultipleChoiceContent),
    TrueFalse(TrueFalseContent),
    CodeChallenge(CodeChallengeContent),
    FillInBlank(FillInBlankContent),
    Matching(MatchingContent),
    ClickTarget(ClickTargetContent),
}

impl Content {
    /// The type tag this content belongs to
    pub fn kind(&self) -> QuestionType {
        match self {
            Content::MultipleChoice(_) => QuestionType::MultipleChoice,
            Content::TrueFalse(_) => QuestionType::TrueFalse,
            Content::CodeChallenge(_) => QuestionType::CodeChallenge,
            Content::FillInBlank(_) => QuestionType::FillInBlank,
            Content::Matching(_) => QuestionType::Matching,
            Content::ClickTarget(_) => QuestionType::ClickTarget,
        }
    }

    pub fn as_multiple_choice(&self) -> Option<&MultipleChoiceContent> {
        match self {
            Content::MultipleChoice(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_true_false(&self) -> Option<&TrueFalseContent> {
        match self {
            Content::TrueFalse(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_code_challenge(&self) -> Option<&CodeChallengeContent> {
        match self {
            Content::CodeChallenge(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_fill_in_blank(&self) -> Option<&FillInBlankContent> {
        match self {
            Content::FillInBlank(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_matching(&self) -> Option<&MatchingContent> {
        match self {
            Content::Matching(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_click_target(&self) -> Option<&ClickTargetContent> {
        match self {
            Content::ClickTarget(c) => Some(c),
            _ => None,
        }
    }
}

/// An identified piece of text: a choice, a matching item or a matching target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceContent {
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    /// Ids of the correct options
    #[serde(default)]
    pub correct: BTreeSet<String>,
    #[serde(default)]
    pub allow_multiple: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrueFalseContent {
    /// Absent only while a draft is unfinished
    #[serde(default)]
    pub answer: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChallengeContent {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub starter_code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillInBlankContent {
    /// Text with `{{blank_id}}` markers
    #[serde(default)]
    pub template: String,
    /// Accepted answers per blank id
    #[serde(default)]
    pub answers: BTreeMap<String, Vec<String>>,
}

/// Answer key of a matching/ordering question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchingAnswer {
    /// Item id -> target id
    Pairs {
        #[serde(default)]
        pairs: BTreeMap<String, String>,
    },
    /// Canonical order of item ids
    Order {
        #[serde(default)]
        order: Vec<String>,
    },
}

impl Default for MatchingAnswer {
    fn default() -> Self {
        MatchingAnswer::Pairs {
            pairs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingContent {
    #[serde(default)]
    pub items: Vec<ChoiceOption>,
    /// Right-hand side; only used in pairs mode
    #[serde(default)]
    pub targets: Vec<ChoiceOption>,
    #[serde(default)]
    pub answer: MatchingAnswer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Rectangle in asset pixel coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRegion {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickTargetContent {
    #[serde(default)]
    pub asset: AssetRef,
    #[serde(default)]
    pub regions: Vec<TargetRegion>,
}
