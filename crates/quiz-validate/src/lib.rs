//! Quiz Validate: is this draft internally consistent?
//!
//! Validation is pure and deterministic. Common field rules run first, then
//! the structural rules the registry holds for the draft's type. Findings
//! come back in that order; nothing short-circuits.
//!
//! ```text
//! Draft ─▶ common rules ─▶ type rules (when type and content agree) ─▶ ValidationResult
//! ```

pub mod common;
pub mod validator;

pub use common::DraftRule;
pub use validator::ContentValidator;
