//! Validation rule primitives
//!
//! A rule is a small predicate object with a stable id. The validator never
//! branches on rule ids; it runs whatever ordered list of rules it is given,
//! so ordering is a property of the declared lists.

use crate::finding::{Finding, Severity};
use crate::limits::ValidationLimits;
use serde::{Deserialize, Serialize};

/// When validation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// On every structural change while authoring
    Editing,
    /// Right before a draft becomes a record
    Save,
}

/// Shared inputs for rule evaluation
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub phase: Phase,
    pub limits: &'a ValidationLimits,
}

impl<'a> RuleContext<'a> {
    pub fn new(phase: Phase, limits: &'a ValidationLimits) -> Self {
        Self { phase, limits }
    }

    pub fn is_save(&self) -> bool {
        self.phase == Phase::Save
    }
}

/// A problem reported by a rule before it is stamped with the rule id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub field: String,
    pub message: String,
    /// Overrides the rule's default severity
    pub severity: Option<Severity>,
}

impl Issue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}

pub type CheckFn<T> = fn(&T, &RuleContext<'_>) -> Vec<Issue>;

/// A single validation rule over `T`
pub struct Rule<T> {
    /// Stable identifier, e.g. `multiple_choice.correct_subset`
    pub id: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    check: CheckFn<T>,
}

impl<T> Rule<T> {
    /// Create an error-severity rule
    pub fn new(id: &'static str, check: CheckFn<T>) -> Self {
        Self {
            id,
            description: "",
            severity: Severity::Error,
            check,
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Run the rule and stamp every issue into a finding
    pub fn evaluate(&self, subject: &T, ctx: &RuleContext<'_>) -> Vec<Finding> {
        (self.check)(subject, ctx)
            .into_iter()
            .map(|issue| Finding {
                field: issue.field,
                severity: issue.severity.unwrap_or(self.severity),
                message: issue.message,
                rule_id: self.id.to_string(),
            })
            .collect()
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            description: self.description,
            severity: self.severity,
            check: self.check,
        }
    }
}

impl<T> std::fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .finish()
    }
}

/// Collect the issues of a check that only reports when `failed` holds
pub fn issue_if(failed: bool, field: impl Into<String>, message: impl Into<String>) -> Vec<Issue> {
    if failed {
        vec![Issue::new(field, message)]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_empty(s: &String, _ctx: &RuleContext<'_>) -> Vec<Issue> {
        issue_if(s.trim().is_empty(), "title", "must not be empty")
    }

    #[test]
    fn test_rule_stamps_id_and_severity() {
        let limits = ValidationLimits::default();
        let ctx = RuleContext::new(Phase::Editing, &limits);
        let rule = Rule::new("title.required", non_empty).with_description("Title is required");

        assert!(rule.evaluate(&"Quiz".to_string(), &ctx).is_empty());

        let findings = rule.evaluate(&"  ".to_string(), &ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "title.required");
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_issue_severity_override() {
        fn soft(_: &String, _ctx: &RuleContext<'_>) -> Vec<Issue> {
            vec![Issue::new("topics", "none yet").with_severity(Severity::Warning)]
        }
        let limits = ValidationLimits::default();
        let ctx = RuleContext::new(Phase::Save, &limits);
        let findings = Rule::new("topics.required", soft).evaluate(&String::new(), &ctx);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(ctx.is_save());
    }
}
