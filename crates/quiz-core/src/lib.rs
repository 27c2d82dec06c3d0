//! Quiz Core: question content model, drafts, hints and findings
//!
//! Shared vocabulary for the authoring engine. Everything here is plain
//! data plus the rule primitive the registry and validator build on.
//!
//! ```text
//! Question (record) ──from_record──▶ Draft ──validate──▶ ValidationResult
//!        ▲                                                     │
//!        └────────────────────── to_record ◀── zero errors ────┘
//! ```

pub mod content;
pub mod draft;
pub mod error;
pub mod finding;
pub mod hints;
pub mod limits;
pub mod model;
pub mod role;
pub mod rule;

pub use content::{
    AssetRef, ChoiceOption, ClickTargetContent, CodeChallengeContent, Content, FillInBlankContent,
    MatchingAnswer, MatchingContent, MultipleChoiceContent, QuestionType, TargetRegion, TestCase,
    TrueFalseContent,
};
pub use draft::Draft;
pub use error::{QuizError, Result};
pub use finding::{Finding, Severity, ValidationResult};
pub use hints::{Hint, HintPatch, HintSequence};
pub use limits::ValidationLimits;
pub use model::{Difficulty, Question, QuestionData, QuestionId};
pub use role::{has_role, Role};
pub use rule::{issue_if, Issue, Phase, Rule, RuleContext};

/// Engine version
pub const ENGINE_VERSION: &str = "1.0.0";
