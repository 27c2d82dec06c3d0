//! Matching and ordering questions
//!
//! Pairs mode maps every item to exactly one target (a bijection over the
//! declared ids). Order mode gives the canonical order of the items (a
//! permutation of the declared ids).

use crate::flat::{self, CellReader, Cells, FlattenError, FlattenOptions, UnflattenError};
use crate::{ContentRule, TypeEntry};
use quiz_core::{
    issue_if, ChoiceOption, Content, Issue, MatchingAnswer, MatchingContent, QuestionType, Rule,
    RuleContext, Severity,
};
use std::collections::{BTreeMap, BTreeSet};

const COL_ITEMS: &str = "match_items";
const COL_TARGETS: &str = "match_targets";
const COL_MODE: &str = "match_mode";
const COL_ANSWER: &str = "match_answer";

const MODE_PAIRS: &str = "pairs";
const MODE_ORDER: &str = "order";

pub fn entry() -> TypeEntry {
    TypeEntry {
        kind: QuestionType::Matching,
        label: "Matching / ordering",
        rules: rules(),
        columns: &[COL_ITEMS, COL_TARGETS, COL_MODE, COL_ANSWER],
        default_content: || Content::Matching(MatchingContent::default()),
        decode: |value| serde_json::from_value(value).map(Content::Matching),
        flatten,
        unflatten,
    }
}

pub fn rules() -> Vec<ContentRule> {
    vec![
        Rule::new("matching.items_min", items_min).with_description("At least two items"),
        Rule::new("matching.ids_unique", ids_unique)
            .with_description("Item and target ids are unique across both sides"),
        Rule::new("matching.targets_required", targets_required)
            .with_description("Pairs mode declares targets"),
        Rule::new("matching.bijection", bijection)
            .with_description("Pairs map every item to a distinct target and use every target"),
        Rule::new("matching.permutation", permutation)
            .with_description("The order lists every item exactly once"),
        Rule::new("matching.targets_unused", targets_unused)
            .with_description("Targets are ignored in order mode")
            .with_severity(Severity::Warning),
    ]
}

fn ids(options: &[ChoiceOption]) -> BTreeSet<&str> {
    options.iter().map(|o| o.id.as_str()).collect()
}

fn items_min(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(m) = content.as_matching() else { return Vec::new() };
    issue_if(
        m.items.len() < 2,
        "content.items",
        format!("{} items declared, at least 2 required", m.items.len()),
    )
}

fn ids_unique(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(m) = content.as_matching() else { return Vec::new() };
    let mut seen = BTreeSet::new();
    let sides = m
        .items
        .iter()
        .enumerate()
        .map(|(i, o)| (format!("content.items[{}].id", i), o))
        .chain(
            m.targets
                .iter()
                .enumerate()
                .map(|(i, o)| (format!("content.targets[{}].id", i), o)),
        );
    let mut issues = Vec::new();
    for (field, option) in sides {
        if option.id.trim().is_empty() {
            issues.push(Issue::new(field, "Id is empty"));
        } else if !seen.insert(option.id.as_str()) {
            issues.push(Issue::new(field, format!("Id '{}' is used more than once", option.id)));
        }
    }
    issues
}

fn targets_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(m) = content.as_matching() else { return Vec::new() };
    issue_if(
        matches!(m.answer, MatchingAnswer::Pairs { .. }) && m.targets.is_empty(),
        "content.targets",
        "Pairs mode needs targets to match items against",
    )
}

fn bijection(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(m) = content.as_matching() else { return Vec::new() };
    let MatchingAnswer::Pairs { pairs } = &m.answer else { return Vec::new() };
    // Missing sides are reported by items_min and targets_required.
    if m.items.is_empty() || m.targets.is_empty() {
        return Vec::new();
    }
    let items = ids(&m.items);
    let targets = ids(&m.targets);
    let mut issues = Vec::new();

    for (item, target) in pairs {
        if !items.contains(item.as_str()) {
            issues.push(Issue::new(
                format!("content.answer.pairs.{}", item),
                format!("'{}' is not a declared item", item),
            ));
        }
        if !targets.contains(target.as_str()) {
            issues.push(Issue::new(
                format!("content.answer.pairs.{}", item),
                format!("'{}' is not a declared target", target),
            ));
        }
    }
    for item in &items {
        if !pairs.contains_key(*item) {
            issues.push(Issue::new(
                "content.answer.pairs",
                format!("Item '{}' is not matched to any target", item),
            ));
        }
    }
    let mut uses: BTreeMap<&str, usize> = BTreeMap::new();
    for target in pairs.values() {
        *uses.entry(target.as_str()).or_default() += 1;
    }
    for target in &targets {
        match uses.get(target).copied().unwrap_or(0) {
            0 => issues.push(Issue::new(
                "content.answer.pairs",
                format!("Target '{}' is not matched by any item", target),
            )),
            1 => {}
            n => issues.push(Issue::new(
                "content.answer.pairs",
                format!("Target '{}' is matched by {} items", target, n),
            )),
        }
    }
    issues
}

fn permutation(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(m) = content.as_matching() else { return Vec::new() };
    let MatchingAnswer::Order { order } = &m.answer else { return Vec::new() };
    if m.items.is_empty() {
        return Vec::new();
    }
    let items = ids(&m.items);
    let mut seen = BTreeSet::new();
    let mut issues = Vec::new();

    for (i, id) in order.iter().enumerate() {
        if !items.contains(id.as_str()) {
            issues.push(Issue::new(
                format!("content.answer.order[{}]", i),
                format!("'{}' is not a declared item", id),
            ));
        } else if !seen.insert(id.as_str()) {
            issues.push(Issue::new(
                format!("content.answer.order[{}]", i),
                format!("'{}' appears more than once", id),
            ));
        }
    }
    for item in items.difference(&seen) {
        issues.push(Issue::new(
            "content.answer.order",
            format!("Item '{}' is missing from the order", item),
        ));
    }
    issues
}

fn targets_unused(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(m) = content.as_matching() else { return Vec::new() };
    issue_if(
        matches!(m.answer, MatchingAnswer::Order { .. }) && !m.targets.is_empty(),
        "content.targets",
        "Targets are ignored when the answer is an order",
    )
}

fn encode_options(column: &str, options: &[ChoiceOption], opts: &FlattenOptions) -> Result<String, FlattenError> {
    let parts = options
        .iter()
        .map(|o| flat::pair(&o.id, &flat::escape(&o.text)))
        .collect();
    flat::join_pairs(column, parts, opts)
}

fn flatten(content: &Content, opts: &FlattenOptions) -> Result<Cells, FlattenError> {
    let Some(m) = content.as_matching() else { return Ok(Vec::new()) };
    let (mode, answer) = match &m.answer {
        MatchingAnswer::Pairs { pairs } => {
            let parts = pairs
                .iter()
                .map(|(item, target)| flat::pair(item, &flat::escape(target)))
                .collect();
            (MODE_PAIRS, flat::join_pairs(COL_ANSWER, parts, opts)?)
        }
        MatchingAnswer::Order { order } => {
            (MODE_ORDER, flat::encode_list(COL_ANSWER, order.iter().map(String::as_str), opts)?)
        }
    };
    Ok(vec![
        (COL_ITEMS, encode_options(COL_ITEMS, &m.items, opts)?),
        (COL_TARGETS, encode_options(COL_TARGETS, &m.targets, opts)?),
        (COL_MODE, mode.to_string()),
        (COL_ANSWER, answer),
    ])
}

fn unflatten(row: &CellReader<'_>) -> Result<Content, UnflattenError> {
    let options = |column: &str| -> Result<Vec<ChoiceOption>, UnflattenError> {
        Ok(row
            .pairs(column)?
            .into_iter()
            .map(|(id, text)| ChoiceOption::new(id, text))
            .collect())
    };
    let answer = match row.text(COL_MODE).trim() {
        MODE_ORDER => MatchingAnswer::Order {
            order: row.list(COL_ANSWER),
        },
        MODE_PAIRS | "" => MatchingAnswer::Pairs {
            pairs: row.pairs(COL_ANSWER)?.into_iter().collect(),
        },
        other => {
            return Err(UnflattenError::new(
                COL_MODE,
                format!("expected '{}' or '{}', got '{}'", MODE_PAIRS, MODE_ORDER, other),
            ))
        }
    };
    Ok(Content::Matching(MatchingContent {
        items: options(COL_ITEMS)?,
        targets: options(COL_TARGETS)?,
        answer,
    }))
}
