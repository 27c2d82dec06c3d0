//! Validation findings
//!
//! A finding names the rule that produced it and the field path the UI can
//! navigate to. Findings are plain data; a failed validation is never an
//! `Err`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning = 1, // Shown, never blocks save
    Error = 2,   // Blocks save
}

impl Severity {
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Path of the offending field, e.g. `content.options[1].id`
    pub field: String,
    pub severity: Severity,
    pub message: String,
    pub rule_id: String,
}

impl Finding {
    pub fn error(rule_id: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity: Severity::Error,
            message: message.into(),
            rule_id: rule_id.into(),
        }
    }

    pub fn warning(rule_id: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule_id, field, message)
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_blocking()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}: {} ({})", self.severity, self.field, self.message, self.rule_id)
    }
}

/// Ordered findings for one draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub findings: Vec<Finding>,
}

impl ValidationResult {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// True when nothing blocks a save
    pub fn is_save_eligible(&self) -> bool {
        !self.findings.iter().any(Finding::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Findings produced by a given rule
    pub fn by_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.rule_id == rule_id)
    }

    /// Findings attached to a field or any of its sub-fields
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| {
            f.field == field
                || f.field
                    .strip_prefix(field)
                    .map_or(false, |rest| rest.starts_with('.') || rest.starts_with('['))
        })
    }

    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.by_rule(rule_id).next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_save_eligible() {
            format!("OK ({} warnings)", self.warning_count())
        } else {
            format!("{} errors, {} warnings", self.error_count(), self.warning_count())
        }
    }
}
