//! Built-in question types, one module each

pub mod click_target;
pub mod code_challenge;
pub mod fill_in_blank;
pub mod matching;
pub mod multiple_choice;
pub mod true_false;

use crate::TypeEntry;

/// Every built-in type, in registration order
pub fn standard_entries() -> Vec<TypeEntry> {
    vec![
        multiple_choice::entry(),
        true_false::entry(),
        code_challenge::entry(),
        fill_in_blank::entry(),
        matching::entry(),
        click_target::entry(),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::TypeEntry;
    use quiz_core::{Content, Finding, Phase, RuleContext, ValidationLimits};

    /// Run an entry's rules with default limits while editing
    pub fn check(entry: &TypeEntry, content: &Content) -> Vec<Finding> {
        let limits = ValidationLimits::default();
        entry.check(content, &RuleContext::new(Phase::Editing, &limits))
    }

    pub fn rule_ids(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.rule_id.as_str()).collect()
    }
}
