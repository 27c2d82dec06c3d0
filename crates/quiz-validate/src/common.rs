//! Type-independent draft rules
//!
//! These run before any type rules, in the order declared here.

use quiz_core::{issue_if, Draft, Issue, Phase, Rule, RuleContext, Severity};

pub type DraftRule = Rule<Draft>;

pub fn rules() -> Vec<DraftRule> {
    vec![
        Rule::new("type.required", type_required).with_description("A question type is chosen"),
        Rule::new("content.matches_type", content_matches_type)
            .with_description("Content is present and belongs to the chosen type"),
        Rule::new("title.required", title_required).with_description("Title is not blank"),
        Rule::new("title.length", title_length).with_description("Title fits the length limit"),
        Rule::new("difficulty.required", difficulty_required)
            .with_description("A difficulty is chosen"),
        Rule::new("xp.range", xp_range).with_description("XP reward lies in the accepted range"),
        Rule::new("time_limit.positive", time_limit_positive)
            .with_description("Time limit, when set, is a positive number of seconds"),
        Rule::new("topics.required", topics_required)
            .with_description("At least one topic; only blocks at save"),
        Rule::new("labels.blank", labels_blank).with_description("Topics and tags are not blank"),
        Rule::new("hints.text_required", hint_text_required)
            .with_description("Every hint has text"),
        Rule::new("hints.adjacent_duplicate", hint_adjacent_duplicate)
            .with_description("Consecutive hints differ"),
        Rule::new("hints.limit", hint_limit)
            .with_description("Long hint sequences are unusual")
            .with_severity(Severity::Warning),
        Rule::new("hints.cost_exceeds_reward", hint_cost_exceeds_reward)
            .with_description("Revealing every hint costs no more than the reward")
            .with_severity(Severity::Warning),
    ]
}

fn type_required(draft: &Draft, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    issue_if(draft.question_type.is_none(), "type", "Choose a question type")
}

fn content_matches_type(draft: &Draft, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    // Without a type there is nothing to match; type.required reports it.
    let Some(kind) = draft.question_type else { return Vec::new() };
    match &draft.content {
        None => vec![Issue::new("content", format!("Content for '{}' is missing", kind))],
        Some(content) if content.kind() != kind => vec![Issue::new(
            "content",
            format!("Content is '{}' but the question type is '{}'", content.kind(), kind),
        )],
        Some(_) => Vec::new(),
    }
}

fn title_required(draft: &Draft, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    issue_if(draft.title.trim().is_empty(), "title", "Title is required")
}

fn title_length(draft: &Draft, ctx: &RuleContext<'_>) -> Vec<Issue> {
    let len = draft.title.trim().chars().count();
    issue_if(
        len > ctx.limits.max_title_chars,
        "title",
        format!("Title is {} characters, limit is {}", len, ctx.limits.max_title_chars),
    )
}

fn difficulty_required(draft: &Draft, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    issue_if(draft.difficulty.is_none(), "difficulty", "Choose a difficulty")
}

fn xp_range(draft: &Draft, ctx: &RuleContext<'_>) -> Vec<Issue> {
    let max = i64::from(ctx.limits.max_xp);
    issue_if(
        draft.xp_reward < 0 || draft.xp_reward > max,
        "xpReward",
        format!("XP reward {} is outside 0..={}", draft.xp_reward, max),
    )
}

fn time_limit_positive(draft: &Draft, ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(secs) = draft.time_limit else { return Vec::new() };
    if secs <= 0 {
        return vec![Issue::new("timeLimit", format!("Time limit must be positive, got {}", secs))];
    }
    if secs > i64::from(u32::MAX) {
        return vec![Issue::new("timeLimit", format!("Time limit {} is too large", secs))];
    }
    match ctx.limits.max_time_limit_secs {
        Some(max) if secs > i64::from(max) => vec![Issue::new(
            "timeLimit",
            format!("Time limit of {}s is longer than the usual maximum of {}s", secs, max),
        )
        .with_severity(Severity::Warning)],
        _ => Vec::new(),
    }
}

fn topics_required(draft: &Draft, ctx: &RuleContext<'_>) -> Vec<Issue> {
    if !draft.topics.is_empty() {
        return Vec::new();
    }
    let issue = Issue::new("topics", "Add at least one topic");
    match ctx.phase {
        Phase::Save => vec![issue],
        Phase::Editing => vec![issue.with_severity(Severity::Warning)],
    }
}

fn labels_blank(draft: &Draft, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    if draft.topics.iter().any(|t| t.trim().is_empty()) {
        issues.push(Issue::new("topics", "Topics cannot be blank"));
    }
    if draft.tags.iter().any(|t| t.trim().is_empty()) {
        issues.push(Issue::new("tags", "Tags cannot be blank"));
    }
    issues
}

fn hint_text_required(draft: &Draft, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    draft
        .hints
        .iter()
        .enumerate()
        .filter(|(_, hint)| hint.text.trim().is_empty())
        .map(|(i, _)| Issue::new(format!("hints[{}].text", i), "Hint text is required"))
        .collect()
}

fn hint_adjacent_duplicate(draft: &Draft, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    draft
        .hints
        .as_slice()
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| {
            let text = pair[1].text.trim();
            !text.is_empty() && text == pair[0].text.trim()
        })
        .map(|(i, _)| {
            Issue::new(
                format!("hints[{}].text", i + 1),
                format!("Hint {} repeats hint {}", i + 2, i + 1),
            )
        })
        .collect()
}

fn hint_limit(draft: &Draft, ctx: &RuleContext<'_>) -> Vec<Issue> {
    issue_if(
        draft.hints.len() > ctx.limits.max_hints,
        "hints",
        format!("{} hints, more than {} is unusual", draft.hints.len(), ctx.limits.max_hints),
    )
}

fn hint_cost_exceeds_reward(draft: &Draft, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    // A negative reward is reported by xp.range.
    let Ok(reward) = u64::try_from(draft.xp_reward) else { return Vec::new() };
    let total = draft.hints.total_cost();
    issue_if(
        total > reward,
        "hints",
        format!("Revealing every hint costs {} XP, the reward is {}", total, reward),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::{Content, Difficulty, Hint, TrueFalseContent, ValidationLimits};

    fn run(draft: &Draft, phase: Phase) -> Vec<(String, Severity)> {
        let limits = ValidationLimits::default();
        let ctx = RuleContext::new(phase, &limits);
        rules()
            .iter()
            .flat_map(|rule| rule.evaluate(draft, &ctx))
            .map(|f| (f.rule_id, f.severity))
            .collect()
    }

    fn complete() -> Draft {
        Draft::with_content(Content::TrueFalse(TrueFalseContent { answer: Some(true) }))
            .with_title("The sky is blue")
            .with_difficulty(Difficulty::Easy)
            .with_topic("science")
            .with_xp(50)
    }

    #[test]
    fn test_complete_draft_is_clean() {
        assert!(run(&complete(), Phase::Save).is_empty());
    }

    #[test]
    fn test_empty_draft_reports_in_declaration_order() {
        let ids: Vec<String> = run(&Draft::empty(), Phase::Editing).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["type.required", "title.required", "difficulty.required", "topics.required"]);
    }

    #[test]
    fn test_topics_severity_depends_on_phase() {
        let mut draft = complete();
        draft.topics.clear();
        assert_eq!(run(&draft, Phase::Editing), vec![("topics.required".to_string(), Severity::Warning)]);
        assert_eq!(run(&draft, Phase::Save), vec![("topics.required".to_string(), Severity::Error)]);
    }

    #[test]
    fn test_content_mismatch() {
        let mut draft = complete();
        draft.question_type = Some(quiz_core::QuestionType::MultipleChoice);
        assert_eq!(run(&draft, Phase::Editing), vec![("content.matches_type".to_string(), Severity::Error)]);

        draft.content = None;
        assert_eq!(run(&draft, Phase::Editing), vec![("content.matches_type".to_string(), Severity::Error)]);
    }

    #[test]
    fn test_xp_and_time_limit_bounds() {
        let mut draft = complete().with_xp(-1);
        draft.time_limit = Some(0);
        let ids: Vec<String> = run(&draft, Phase::Editing).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["xp.range", "time_limit.positive"]);

        let mut draft = complete().with_xp(10_001);
        draft.time_limit = Some(90_000);
        assert_eq!(
            run(&draft, Phase::Editing),
            vec![
                ("xp.range".to_string(), Severity::Error),
                ("time_limit.positive".to_string(), Severity::Warning),
            ]
        );
    }

    #[test]
    fn test_hint_rules() {
        let mut draft = complete();
        draft.hints.append(Hint::new("Think about light", 10));
        draft.hints.append(Hint::new("Think about light", 10));
        draft.hints.append(Hint::new("  ", 40));
        assert_eq!(
            run(&draft, Phase::Editing),
            vec![
                ("hints.text_required".to_string(), Severity::Error),
                ("hints.adjacent_duplicate".to_string(), Severity::Error),
                ("hints.cost_exceeds_reward".to_string(), Severity::Warning),
            ]
        );
    }

    #[test]
    fn test_blank_labels() {
        let draft = complete().with_topic(" ");
        let ids: Vec<String> = run(&draft, Phase::Save).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["labels.blank"]);
    }
}
