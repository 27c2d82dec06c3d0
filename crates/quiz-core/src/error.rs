//! Unified Error Model
use crate::model::QuestionId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// A type tag no registry entry exists for. Never recovered by defaulting.
    #[error("TYPE/unknown question type '{0}'")]
    UnknownType(String),

    #[error("INDEX/position {index} out of range for {len} hints")]
    Index { index: usize, len: usize },

    #[error("PARSE/{0}")]
    Parse(String),

    #[error("STORE/question {0} not found")]
    NotFound(QuestionId),

    /// A draft passed validation but was still missing a field needed to build a record.
    #[error("INTERNAL/validated draft is missing {0}")]
    Incomplete(&'static str),
}

pub type Result<T> = std::result::Result<T, QuizError>;
