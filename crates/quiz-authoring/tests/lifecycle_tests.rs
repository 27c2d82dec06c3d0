//! Create/edit lifecycle through an edit session and the in-memory store.

use quiz_authoring::{EditSession, InMemoryStore, QuestionStore, Reconciler, SaveError};
use quiz_core::{
    ChoiceOption, Content, Difficulty, Hint, HintPatch, QuestionType, QuizError, Severity,
};

fn fill_multiple_choice(session: &mut EditSession<'_>) {
    session.set_type(QuestionType::MultipleChoice).unwrap();
    session
        .edit(|draft| {
            draft.title = "What is 2 + 2?".to_string();
            draft.difficulty = Some(Difficulty::Easy);
            draft.topics.insert("arithmetic".to_string());
            draft.xp_reward = 50;
            if let Some(Content::MultipleChoice(mc)) = draft.content.as_mut() {
                mc.options = vec![ChoiceOption::new("a", "3"), ChoiceOption::new("b", "4")];
                mc.correct.insert("b".to_string());
            }
        })
        .unwrap();
}

#[test]
fn test_create_then_edit() {
    let mut store = InMemoryStore::new();
    let mut session = EditSession::create(Reconciler::standard()).unwrap();
    assert!(session.is_create());
    assert!(!session.is_dirty());
    assert!(!session.findings().is_save_eligible());

    fill_multiple_choice(&mut session);
    assert!(session.is_dirty());
    assert!(session.findings().is_empty(), "{:?}", session.findings());

    let saved = session.save(&mut store).unwrap();
    assert_eq!(store.len(), 1);
    assert!(!session.is_dirty());
    assert_eq!(session.id(), Some(&saved.id));

    session.edit(|draft| draft.xp_reward = 75).unwrap();
    let updated = session.save(&mut store).unwrap();
    assert_eq!(updated.id, saved.id);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&saved.id).unwrap().data.xp_reward, 75);
}

#[test]
fn test_refused_save_keeps_draft() {
    let mut store = InMemoryStore::new();
    let mut session = EditSession::create(Reconciler::standard()).unwrap();
    fill_multiple_choice(&mut session);
    session.edit(|draft| draft.topics.clear()).unwrap();

    // While editing the missing topic is only a warning.
    assert!(session.findings().is_save_eligible());
    assert_eq!(session.findings().findings[0].severity, Severity::Warning);

    match session.save(&mut store) {
        Err(SaveError::Invalid(result)) => assert!(result.has_rule("topics.required")),
        other => panic!("expected refusal, got {:?}", other),
    }
    assert!(store.is_empty());
    assert_eq!(session.draft().title, "What is 2 + 2?");
}

#[test]
fn test_changing_type_resets_content() {
    let mut session = EditSession::create(Reconciler::standard()).unwrap();
    fill_multiple_choice(&mut session);

    session.set_type(QuestionType::MultipleChoice).unwrap();
    assert!(session.findings().is_empty());

    let findings = session.set_type(QuestionType::TrueFalse).unwrap();
    assert!(findings.has_rule("true_false.answer_required"));
    assert_eq!(session.draft().content.as_ref().map(|c| c.kind()), Some(QuestionType::TrueFalse));
}

#[test]
fn test_editing_leaves_stored_record_alone() {
    let mut store = InMemoryStore::new();
    let mut session = EditSession::create(Reconciler::standard()).unwrap();
    fill_multiple_choice(&mut session);
    let saved = session.save(&mut store).unwrap();

    let mut editor = EditSession::open_from(Reconciler::standard(), &store, &saved.id).unwrap();
    editor.edit(|draft| draft.title = "Changed".to_string()).unwrap();
    editor.append_hint(Hint::new("Count on your fingers", 5)).unwrap();
    assert!(editor.is_dirty());
    editor.cancel();

    assert_eq!(store.get(&saved.id).unwrap(), saved);
}

#[test]
fn test_hint_operations() {
    let mut session = EditSession::create(Reconciler::standard()).unwrap();
    fill_multiple_choice(&mut session);
    for text in ["A", "B", "C"] {
        session.append_hint(Hint::new(text, 1)).unwrap();
    }

    session.move_hint(0, 2).unwrap();
    let texts: Vec<_> = session.draft().hints.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["B", "C", "A"]);

    let err = session.move_hint(0, 3).unwrap_err();
    assert_eq!(err, QuizError::Index { index: 3, len: 3 });
    let texts: Vec<_> = session.draft().hints.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["B", "C", "A"]);

    let findings = session.update_hint(1, HintPatch::text("B")).unwrap();
    assert!(findings.has_rule("hints.adjacent_duplicate"));

    let removed = session.remove_hint(1).unwrap();
    assert_eq!(removed.text, "B");
    assert!(session.findings().is_empty());
}

#[test]
fn test_open_missing_record() {
    let store = InMemoryStore::new();
    let err = EditSession::open_from(Reconciler::standard(), &store, &quiz_core::QuestionId::new("missing"))
        .unwrap_err();
    assert!(matches!(err, QuizError::NotFound(_)));
}
