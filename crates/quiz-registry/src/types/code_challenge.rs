//! Code challenges

use crate::flat::{self, CellReader, Cells, FlattenError, FlattenOptions, UnflattenError};
use crate::{ContentRule, TypeEntry};
use quiz_core::{
    issue_if, CodeChallengeContent, Content, Issue, QuestionType, Rule, RuleContext, Severity,
    TestCase,
};

const COL_PROMPT: &str = "code_prompt";
const COL_STARTER: &str = "code_starter";
const COL_LANGUAGE: &str = "code_language";
const COL_TESTS: &str = "code_tests";

pub fn entry() -> TypeEntry {
    TypeEntry {
        kind: QuestionType::CodeChallenge,
        label: "Code challenge",
        rules: rules(),
        columns: &[COL_PROMPT, COL_STARTER, COL_LANGUAGE, COL_TESTS],
        default_content: || Content::CodeChallenge(CodeChallengeContent::default()),
        decode: |value| serde_json::from_value(value).map(Content::CodeChallenge),
        flatten,
        unflatten,
    }
}

pub fn rules() -> Vec<ContentRule> {
    vec![
        Rule::new("code_challenge.prompt_required", prompt_required)
            .with_description("The challenge states what to build"),
        Rule::new("code_challenge.language_required", language_required)
            .with_description("A language tag is set"),
        Rule::new("code_challenge.language_supported", language_supported)
            .with_description("The runner knows the language")
            .with_severity(Severity::Warning),
        Rule::new("code_challenge.tests_required", tests_required)
            .with_description("At least one test case"),
        Rule::new("code_challenge.test_expected_output", test_expected_output)
            .with_description("Test cases state their expected output")
            .with_severity(Severity::Warning),
    ]
}

fn prompt_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(code) = content.as_code_challenge() else { return Vec::new() };
    issue_if(code.prompt.trim().is_empty(), "content.prompt", "Prompt is empty")
}

fn language_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(code) = content.as_code_challenge() else { return Vec::new() };
    issue_if(code.language.trim().is_empty(), "content.language", "Language is not set")
}

fn language_supported(content: &Content, ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(code) = content.as_code_challenge() else { return Vec::new() };
    if code.language.trim().is_empty() {
        return Vec::new();
    }
    issue_if(
        !ctx.limits.supports_language(&code.language),
        "content.language",
        format!("Language '{}' is not supported by the runner", code.language),
    )
}

fn tests_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(code) = content.as_code_challenge() else { return Vec::new() };
    issue_if(code.test_cases.is_empty(), "content.testCases", "At least one test case is required")
}

fn test_expected_output(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(code) = content.as_code_challenge() else { return Vec::new() };
    code.test_cases
        .iter()
        .enumerate()
        .filter(|(_, case)| case.expected_output.is_empty())
        .map(|(i, _)| {
            Issue::new(
                format!("content.testCases[{}].expectedOutput", i),
                "Expected output is empty",
            )
        })
        .collect()
}

fn flatten(content: &Content, opts: &FlattenOptions) -> Result<Cells, FlattenError> {
    let Some(code) = content.as_code_challenge() else { return Ok(Vec::new()) };
    let tests = code
        .test_cases
        .iter()
        .map(|t| flat::pair(&t.input, &flat::escape(&t.expected_output)))
        .collect();
    Ok(vec![
        (COL_PROMPT, code.prompt.clone()),
        (COL_STARTER, code.starter_code.clone()),
        (COL_LANGUAGE, code.language.clone()),
        (COL_TESTS, flat::join_pairs(COL_TESTS, tests, opts)?),
    ])
}

fn unflatten(row: &CellReader<'_>) -> Result<Content, UnflattenError> {
    Ok(Content::CodeChallenge(CodeChallengeContent {
        prompt: row.text(COL_PROMPT),
        starter_code: row.text(COL_STARTER),
        language: row.text(COL_LANGUAGE),
        test_cases: row
            .pairs(COL_TESTS)?
            .into_iter()
            .map(|(input, expected)| TestCase::new(input, expected))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::{check, rule_ids};

    fn challenge(language: &str, tests: Vec<TestCase>) -> Content {
        Content::CodeChallenge(CodeChallengeContent {
            prompt: "Reverse a string".to_string(),
            starter_code: "def reverse(s):\n    pass\n".to_string(),
            language: language.to_string(),
            test_cases: tests,
        })
    }

    #[test]
    fn test_well_formed() {
        let content = challenge("python", vec![TestCase::new("abc", "cba")]);
        assert!(check(&entry(), &content).is_empty());
    }

    #[test]
    fn test_no_tests_is_one_error() {
        let findings = check(&entry(), &challenge("python", vec![]));
        assert_eq!(rule_ids(&findings), vec!["code_challenge.tests_required"]);
    }

    #[test]
    fn test_unsupported_language_warns() {
        let findings = check(&entry(), &challenge("cobol", vec![TestCase::new("", "x")]));
        assert_eq!(rule_ids(&findings), vec!["code_challenge.language_supported"]);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_flatten_keeps_multiline_and_empty_input() {
        let content = challenge("python", vec![TestCase::new("", "hello\nworld"), TestCase::new("a=b", "c|d")]);
        let cells = flatten(&content, &FlattenOptions::default()).unwrap();
        let row: std::collections::BTreeMap<String, String> =
            cells.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(unflatten(&CellReader::new(&row)).unwrap(), content);
    }
}
