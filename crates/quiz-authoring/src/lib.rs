//! Quiz Authoring: from draft to record and back
//!
//! ```text
//! store.get ─▶ from_record ─▶ EditSession (edit, set_type, hints...) ─▶ Reconciler::to_record ─▶ store.apply
//! ```
//!
//! Persistence stays behind [`QuestionStore`]; this crate only decides what
//! to ask it for.

pub mod reconcile;
pub mod session;
pub mod store;

pub use reconcile::{from_record, Reconciler, SaveError, SaveRequest};
pub use session::EditSession;
pub use store::{InMemoryStore, QuestionStore};
