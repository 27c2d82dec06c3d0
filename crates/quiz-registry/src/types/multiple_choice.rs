//! Multiple-choice questions

use crate::flat::{self, CellReader, Cells, FlattenError, FlattenOptions, UnflattenError};
use crate::{ContentRule, TypeEntry};
use quiz_core::{
    issue_if, ChoiceOption, Content, Issue, MultipleChoiceContent, QuestionType, Rule, RuleContext,
    Severity,
};
use std::collections::BTreeSet;

const COL_OPTIONS: &str = "mc_options";
const COL_CORRECT: &str = "mc_correct";
const COL_MULTIPLE: &str = "mc_multiple";

pub fn entry() -> TypeEntry {
    TypeEntry {
        kind: QuestionType::MultipleChoice,
        label: "Multiple choice",
        rules: rules(),
        columns: &[COL_OPTIONS, COL_CORRECT, COL_MULTIPLE],
        default_content: || Content::MultipleChoice(MultipleChoiceContent::default()),
        decode: |value| serde_json::from_value(value).map(Content::MultipleChoice),
        flatten,
        unflatten,
    }
}

pub fn rules() -> Vec<ContentRule> {
    vec![
        Rule::new("multiple_choice.options_min", options_min)
            .with_description("At least the minimum number of options"),
        Rule::new("multiple_choice.options_max", options_max)
            .with_description("Long option lists are hard to read")
            .with_severity(Severity::Warning),
        Rule::new("multiple_choice.option_ids_unique", option_ids_unique)
            .with_description("Option ids are unique within the question"),
        Rule::new("multiple_choice.option_text_required", option_text_required)
            .with_description("Every option has text"),
        Rule::new("multiple_choice.correct_required", correct_required)
            .with_description("At least one option is marked correct"),
        Rule::new("multiple_choice.correct_subset", correct_subset)
            .with_description("Correct ids refer to declared options"),
        Rule::new("multiple_choice.single_answer", single_answer)
            .with_description("Only one correct option unless multiple answers are allowed"),
    ]
}

fn options_min(content: &Content, ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(mc) = content.as_multiple_choice() else { return Vec::new() };
    issue_if(
        mc.options.len() < ctx.limits.min_options,
        "content.options",
        format!(
            "{} options declared, at least {} required",
            mc.options.len(),
            ctx.limits.min_options
        ),
    )
}

fn options_max(content: &Content, ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(mc) = content.as_multiple_choice() else { return Vec::new() };
    issue_if(
        mc.options.len() > ctx.limits.max_options,
        "content.options",
        format!("{} options declared, more than {} is unusual", mc.options.len(), ctx.limits.max_options),
    )
}

fn option_ids_unique(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(mc) = content.as_multiple_choice() else { return Vec::new() };
    let mut seen = BTreeSet::new();
    mc.options
        .iter()
        .enumerate()
        .filter(|(_, option)| !seen.insert(option.id.as_str()))
        .map(|(i, option)| {
            Issue::new(
                format!("content.options[{}].id", i),
                format!("Option id '{}' is used more than once", option.id),
            )
        })
        .collect()
}

fn option_text_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(mc) = content.as_multiple_choice() else { return Vec::new() };
    mc.options
        .iter()
        .enumerate()
        .filter(|(_, option)| option.text.trim().is_empty() || option.id.trim().is_empty())
        .map(|(i, _)| Issue::new(format!("content.options[{}]", i), "Option needs both an id and text"))
        .collect()
}

fn correct_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(mc) = content.as_multiple_choice() else { return Vec::new() };
    issue_if(mc.correct.is_empty(), "content.correct", "No option is marked as correct")
}

fn correct_subset(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(mc) = content.as_multiple_choice() else { return Vec::new() };
    // Missing options are reported by options_min.
    if mc.options.is_empty() {
        return Vec::new();
    }
    let declared: BTreeSet<&str> = mc.options.iter().map(|o| o.id.as_str()).collect();
    mc.correct
        .iter()
        .filter(|id| !declared.contains(id.as_str()))
        .map(|id| Issue::new("content.correct", format!("Correct id '{}' is not one of the options", id)))
        .collect()
}

fn single_answer(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(mc) = content.as_multiple_choice() else { return Vec::new() };
    issue_if(
        !mc.allow_multiple && mc.correct.len() > 1,
        "content.correct",
        format!(
            "{} options marked correct but multiple answers are not allowed",
            mc.correct.len()
        ),
    )
}

fn flatten(content: &Content, opts: &FlattenOptions) -> Result<Cells, FlattenError> {
    let Some(mc) = content.as_multiple_choice() else { return Ok(Vec::new()) };
    let options = mc
        .options
        .iter()
        .map(|o| flat::pair(&o.id, &flat::escape(&o.text)))
        .collect();
    Ok(vec![
        (COL_OPTIONS, flat::join_pairs(COL_OPTIONS, options, opts)?),
        (COL_CORRECT, flat::encode_list(COL_CORRECT, mc.correct.iter().map(String::as_str), opts)?),
        (COL_MULTIPLE, mc.allow_multiple.to_string()),
    ])
}

fn unflatten(row: &CellReader<'_>) -> Result<Content, UnflattenError> {
    Ok(Content::MultipleChoice(MultipleChoiceContent {
        options: row
            .pairs(COL_OPTIONS)?
            .into_iter()
            .map(|(id, text)| ChoiceOption::new(id, text))
            .collect(),
        correct: row.list(COL_CORRECT).into_iter().collect(),
        allow_multiple: row.flag(COL_MULTIPLE)?.unwrap_or(false),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::{check, rule_ids};

    fn mc(options: &[(&str, &str)], correct: &[&str]) -> Content {
        Content::MultipleChoice(MultipleChoiceContent {
            options: options.iter().map(|(id, text)| ChoiceOption::new(*id, *text)).collect(),
            correct: correct.iter().map(|s| s.to_string()).collect(),
            allow_multiple: false,
        })
    }

    #[test]
    fn test_well_formed() {
        assert!(check(&entry(), &mc(&[("a", "2"), ("b", "4")], &["b"])).is_empty());
    }

    #[test]
    fn test_unknown_correct_id() {
        let findings = check(&entry(), &mc(&[("a", "2"), ("b", "4")], &["c"]));
        assert_eq!(rule_ids(&findings), vec!["multiple_choice.correct_subset"]);
        assert_eq!(findings[0].field, "content.correct");

        assert!(check(&entry(), &mc(&[("a", "2"), ("b", "4")], &["a"])).is_empty());
    }

    #[test]
    fn test_no_options_is_one_error() {
        let findings = check(&entry(), &mc(&[], &["a"]));
        assert_eq!(rule_ids(&findings), vec!["multiple_choice.options_min"]);
    }

    #[test]
    fn test_no_correct_is_one_error() {
        let findings = check(&entry(), &mc(&[("a", "2"), ("b", "4")], &[]));
        assert_eq!(rule_ids(&findings), vec!["multiple_choice.correct_required"]);
    }

    #[test]
    fn test_duplicate_ids_and_single_answer() {
        let findings = check(&entry(), &mc(&[("a", "2"), ("a", "4")], &["a"]));
        assert_eq!(rule_ids(&findings), vec!["multiple_choice.option_ids_unique"]);
        assert_eq!(findings[0].field, "content.options[1].id");

        let findings = check(&entry(), &mc(&[("a", "2"), ("b", "4")], &["a", "b"]));
        assert_eq!(rule_ids(&findings), vec!["multiple_choice.single_answer"]);
    }

    #[test]
    fn test_flatten_roundtrip() {
        let content = mc(&[("a", "x | y"), ("b", "p=q")], &["a"]);
        let cells = flatten(&content, &FlattenOptions::default()).unwrap();
        let row: std::collections::BTreeMap<String, String> =
            cells.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(unflatten(&CellReader::new(&row)).unwrap(), content);
    }
}
