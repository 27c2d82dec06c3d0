//! True/false questions

use crate::flat::{CellReader, Cells, FlattenError, FlattenOptions, UnflattenError};
use crate::{ContentRule, TypeEntry};
use quiz_core::{issue_if, Content, Issue, QuestionType, Rule, RuleContext, TrueFalseContent};

const COL_ANSWER: &str = "tf_answer";

pub fn entry() -> TypeEntry {
    TypeEntry {
        kind: QuestionType::TrueFalse,
        label: "True / false",
        rules: rules(),
        columns: &[COL_ANSWER],
        default_content: || Content::TrueFalse(TrueFalseContent::default()),
        decode: |value| serde_json::from_value(value).map(Content::TrueFalse),
        flatten,
        unflatten,
    }
}

pub fn rules() -> Vec<ContentRule> {
    vec![Rule::new("true_false.answer_required", answer_required)
        .with_description("The statement is marked either true or false")]
}

fn answer_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(tf) = content.as_true_false() else { return Vec::new() };
    issue_if(tf.answer.is_none(), "content.answer", "Choose whether the statement is true or false")
}

fn flatten(content: &Content, _opts: &FlattenOptions) -> Result<Cells, FlattenError> {
    let Some(tf) = content.as_true_false() else { return Ok(Vec::new()) };
    Ok(vec![(COL_ANSWER, tf.answer.map(|a| a.to_string()).unwrap_or_default())])
}

fn unflatten(row: &CellReader<'_>) -> Result<Content, UnflattenError> {
    Ok(Content::TrueFalse(TrueFalseContent {
        answer: row.flag(COL_ANSWER)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::{check, rule_ids};

    #[test]
    fn test_answer_required() {
        let unset = Content::TrueFalse(TrueFalseContent { answer: None });
        assert_eq!(rule_ids(&check(&entry(), &unset)), vec!["true_false.answer_required"]);

        let set = Content::TrueFalse(TrueFalseContent { answer: Some(false) });
        assert!(check(&entry(), &set).is_empty());
    }
}
