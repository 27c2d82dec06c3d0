//! Fill-in-the-blank questions
//!
//! Blanks are marked in the template as `{{id}}`. Every marker needs an
//! accepted-answer entry and every entry needs a marker.

use crate::flat::{self, CellReader, Cells, FlattenError, FlattenOptions, UnflattenError};
use crate::{ContentRule, TypeEntry};
use lazy_static::lazy_static;
use quiz_core::{issue_if, Content, FillInBlankContent, Issue, QuestionType, Rule, RuleContext};
use regex::Regex;
use std::collections::BTreeMap;

const COL_TEMPLATE: &str = "blank_template";
const COL_ANSWERS: &str = "blank_answers";

lazy_static! {
    static ref MARKER: Regex = Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").unwrap();
}

/// Blank ids in order of first appearance
pub fn blank_markers(template: &str) -> Vec<String> {
    let mut markers: Vec<String> = Vec::new();
    for cap in MARKER.captures_iter(template) {
        let id = cap[1].to_string();
        if !markers.contains(&id) {
            markers.push(id);
        }
    }
    markers
}

pub fn entry() -> TypeEntry {
    TypeEntry {
        kind: QuestionType::FillInBlank,
        label: "Fill in the blank",
        rules: rules(),
        columns: &[COL_TEMPLATE, COL_ANSWERS],
        default_content: || Content::FillInBlank(FillInBlankContent::default()),
        decode: |value| serde_json::from_value(value).map(Content::FillInBlank),
        flatten,
        unflatten,
    }
}

pub fn rules() -> Vec<ContentRule> {
    vec![
        Rule::new("fill_in_blank.markers_required", markers_required)
            .with_description("The template contains at least one blank"),
        Rule::new("fill_in_blank.orphan_marker", orphan_marker)
            .with_description("Every blank marker has accepted answers"),
        Rule::new("fill_in_blank.orphan_answer", orphan_answer)
            .with_description("Every answer entry belongs to a blank in the template"),
        Rule::new("fill_in_blank.answers_nonempty", answers_nonempty)
            .with_description("Answer entries list at least one non-blank answer"),
    ]
}

fn markers_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(fill) = content.as_fill_in_blank() else { return Vec::new() };
    issue_if(
        blank_markers(&fill.template).is_empty(),
        "content.template",
        "Template has no {{blank}} markers",
    )
}

fn orphan_marker(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(fill) = content.as_fill_in_blank() else { return Vec::new() };
    blank_markers(&fill.template)
        .into_iter()
        .filter(|id| !fill.answers.contains_key(id))
        .map(|id| {
            Issue::new(
                format!("content.answers.{}", id),
                format!("Blank '{}' has no accepted answers", id),
            )
        })
        .collect()
}

fn orphan_answer(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(fill) = content.as_fill_in_blank() else { return Vec::new() };
    let markers = blank_markers(&fill.template);
    fill.answers
        .keys()
        .filter(|id| !markers.contains(id))
        .map(|id| {
            Issue::new(
                format!("content.answers.{}", id),
                format!("Answers given for '{}' but the template has no such blank", id),
            )
        })
        .collect()
}

fn answers_nonempty(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(fill) = content.as_fill_in_blank() else { return Vec::new() };
    fill.answers
        .iter()
        .filter(|(_, accepted)| accepted.is_empty() || accepted.iter().any(|a| a.trim().is_empty()))
        .map(|(id, _)| {
            Issue::new(
                format!("content.answers.{}", id),
                "Accepted answers must be non-empty",
            )
        })
        .collect()
}

fn flatten(content: &Content, opts: &FlattenOptions) -> Result<Cells, FlattenError> {
    let Some(fill) = content.as_fill_in_blank() else { return Ok(Vec::new()) };
    let mut answers = Vec::with_capacity(fill.answers.len());
    for (id, accepted) in &fill.answers {
        let inner = flat::encode_inner(COL_ANSWERS, accepted.iter().map(String::as_str), opts)?;
        answers.push(flat::pair(id, &inner));
    }
    Ok(vec![
        (COL_TEMPLATE, fill.template.clone()),
        (COL_ANSWERS, flat::join_pairs(COL_ANSWERS, answers, opts)?),
    ])
}

fn unflatten(row: &CellReader<'_>) -> Result<Content, UnflattenError> {
    let answers: BTreeMap<String, Vec<String>> = row
        .raw_pairs(COL_ANSWERS)?
        .into_iter()
        .map(|(id, encoded)| (id, flat::decode_inner(encoded)))
        .collect();
    Ok(Content::FillInBlank(FillInBlankContent {
        template: row.text(COL_TEMPLATE),
        answers,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::{check, rule_ids};

    fn fill(template: &str, answers: &[(&str, &[&str])]) -> Content {
        Content::FillInBlank(FillInBlankContent {
            template: template.to_string(),
            answers: answers
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                .collect(),
        })
    }

    #[test]
    fn test_marker_extraction() {
        assert_eq!(blank_markers("{{a}} and {{ b }} and {{a}}"), vec!["a", "b"]);
        assert!(blank_markers("no blanks {here}").is_empty());
    }

    #[test]
    fn test_orphan_marker_then_fixed() {
        let findings = check(&entry(), &fill("The answer is {{x}}", &[]));
        assert_eq!(rule_ids(&findings), vec!["fill_in_blank.orphan_marker"]);
        assert_eq!(findings[0].field, "content.answers.x");

        assert!(check(&entry(), &fill("The answer is {{x}}", &[("x", &["4"])])).is_empty());
    }

    #[test]
    fn test_orphan_answer_and_empty_answers() {
        let findings = check(&entry(), &fill("{{x}}", &[("x", &[]), ("y", &["1"])]));
        assert_eq!(
            rule_ids(&findings),
            vec!["fill_in_blank.orphan_answer", "fill_in_blank.answers_nonempty"]
        );
    }

    #[test]
    fn test_no_markers() {
        let findings = check(&entry(), &fill("Nothing to fill", &[]));
        assert_eq!(rule_ids(&findings), vec!["fill_in_blank.markers_required"]);
    }

    #[test]
    fn test_flatten_roundtrip() {
        let content = fill("{{x}} + {{y}}", &[("x", &["4", "four"]), ("y", &["a;b"])]);
        let cells = flatten(&content, &FlattenOptions::default()).unwrap();
        let row: BTreeMap<String, String> = cells.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(unflatten(&CellReader::new(&row)).unwrap(), content);
    }
}
