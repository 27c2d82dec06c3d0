//! Quiz Registry: the set of known question types
//!
//! Each type contributes one [`TypeEntry`]: its content shape, its ordered
//! structural rules and its tabular columns. Adding a type means writing its
//! module under `types/` and registering the entry; nothing else branches on
//! the type tag.
//!
//! ```text
//! tag ──resolve──▶ TypeEntry ─┬─ default_content()
//!                             ├─ rules        (validator)
//!                             ├─ decode       (JSON import)
//!                             └─ flatten / unflatten (tabular)
//! ```

pub mod flat;
pub mod types;

pub use flat::{CellReader, CellSource, Cells, FlattenError, FlattenOptions, UnflattenError};
pub use types::fill_in_blank::blank_markers;

use once_cell::sync::Lazy;
use quiz_core::{Content, Finding, QuestionType, QuizError, Rule, RuleContext};

/// A structural rule over one type's content
pub type ContentRule = Rule<Content>;

/// Everything the engine knows about one question type
#[derive(Clone)]
pub struct TypeEntry {
    pub kind: QuestionType,
    /// Human-readable name
    pub label: &'static str,
    /// Structural rules, evaluated in order
    pub rules: Vec<ContentRule>,
    /// Tabular columns owned by this type
    pub columns: &'static [&'static str],
    pub default_content: fn() -> Content,
    pub decode: fn(serde_json::Value) -> Result<Content, serde_json::Error>,
    pub flatten: fn(&Content, &FlattenOptions) -> Result<Cells, FlattenError>,
    pub unflatten: fn(&CellReader<'_>) -> Result<Content, UnflattenError>,
}

impl TypeEntry {
    /// Evaluate every rule of this type against `content`
    pub fn check(&self, content: &Content, ctx: &RuleContext<'_>) -> Vec<Finding> {
        self.rules
            .iter()
            .flat_map(|rule| rule.evaluate(content, ctx))
            .collect()
    }

    /// Empty content of this type, as used when a draft switches type
    pub fn default_content(&self) -> Content {
        (self.default_content)()
    }

    /// Read this type's content shape from JSON
    pub fn decode(&self, value: serde_json::Value) -> Result<Content, serde_json::Error> {
        (self.decode)(value)
    }

    pub fn flatten(&self, content: &Content, opts: &FlattenOptions) -> Result<Cells, FlattenError> {
        (self.flatten)(content, opts)
    }

    pub fn unflatten(&self, row: &CellReader<'_>) -> Result<Content, UnflattenError> {
        (self.unflatten)(row)
    }
}

impl std::fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEntry")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("rules", &self.rules.len())
            .field("columns", &self.columns)
            .finish()
    }
}

static GLOBAL: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::standard);

/// Registered question types, in registration order
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
}

impl TypeRegistry {
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// All built-in types
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for entry in types::standard_entries() {
            registry.register(entry);
        }
        registry
    }

    /// Process-wide standard registry, built on first use
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    /// Add a type. An entry for the same kind is replaced in place.
    pub fn register(&mut self, entry: TypeEntry) {
        match self.entries.iter_mut().find(|e| e.kind == entry.kind) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entry(&self, kind: QuestionType) -> Result<&TypeEntry, QuizError> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .ok_or_else(|| QuizError::UnknownType(kind.as_str().to_string()))
    }

    /// Look up a type by its tag string
    pub fn resolve(&self, tag: &str) -> Result<&TypeEntry, QuizError> {
        let kind: QuestionType = tag.parse()?;
        self.entry(kind)
    }

    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    pub fn kinds(&self) -> impl Iterator<Item = QuestionType> + '_ {
        self.entries.iter().map(|e| e.kind)
    }

    /// Every type's tabular columns, in registration order
    pub fn columns(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .flat_map(|e| e.columns.iter().copied())
            .collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::{Phase, TrueFalseContent, ValidationLimits};
    use std::collections::BTreeSet;

    #[test]
    fn test_standard_registers_all_types() {
        let registry = TypeRegistry::standard();
        let kinds: Vec<_> = registry.kinds().collect();
        assert_eq!(kinds, QuestionType::ALL.to_vec());
    }

    #[test]
    fn test_resolve_accepts_kebab_case() {
        let registry = TypeRegistry::global();
        assert_eq!(registry.resolve("fill-in-blank").unwrap().kind, QuestionType::FillInBlank);
        assert_eq!(registry.resolve("true_false").unwrap().label, "True / false");
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let err = TypeRegistry::global().resolve("essay").unwrap_err();
        assert_eq!(err, QuizError::UnknownType("essay".to_string()));
    }

    #[test]
    fn test_subset_registry() {
        let mut registry = TypeRegistry::empty();
        registry.register(types::true_false::entry());
        assert!(registry.entry(QuestionType::TrueFalse).is_ok());
        assert!(matches!(
            registry.entry(QuestionType::Matching),
            Err(QuizError::UnknownType(tag)) if tag == "matching"
        ));
    }

    #[test]
    fn test_register_replaces_same_kind() {
        let mut registry = TypeRegistry::standard();
        let mut custom = types::true_false::entry();
        custom.label = "Yes / no";
        registry.register(custom);
        assert_eq!(registry.entries().len(), QuestionType::ALL.len());
        assert_eq!(registry.entry(QuestionType::TrueFalse).unwrap().label, "Yes / no");
    }

    #[test]
    fn test_columns_are_disjoint() {
        let columns = TypeRegistry::standard().columns();
        let unique: BTreeSet<_> = columns.iter().collect();
        assert_eq!(unique.len(), columns.len());
    }

    #[test]
    fn test_rule_ids_are_prefixed_with_tag() {
        for entry in TypeRegistry::global().entries() {
            for rule in &entry.rules {
                assert!(rule.id.starts_with(&format!("{}.", entry.kind)), "{}", rule.id);
            }
        }
    }

    #[test]
    fn test_default_content_matches_kind() {
        for entry in TypeRegistry::global().entries() {
            assert_eq!(entry.default_content().kind(), entry.kind);
        }
    }

    #[test]
    fn test_decode_and_check() {
        let registry = TypeRegistry::global();
        let entry = registry.entry(QuestionType::TrueFalse).unwrap();
        let content = entry.decode(serde_json::json!({ "answer": true })).unwrap();
        assert_eq!(content, Content::TrueFalse(TrueFalseContent { answer: Some(true) }));
        assert!(entry.decode(serde_json::json!({ "answer": "yes" })).is_err());

        let limits = ValidationLimits::default();
        let ctx = RuleContext::new(Phase::Save, &limits);
        assert!(entry.check(&content, &ctx).is_empty());
        assert_eq!(entry.check(&entry.default_content(), &ctx).len(), 1);
    }
}
