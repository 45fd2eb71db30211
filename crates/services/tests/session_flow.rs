use learn_core::model::{
    DeckId, EngineSettings, Flashcard, FlashcardDeck, LessonId, QuestionDraft, QuestionId,
    QuizDraft, QuizId, Screen, UserDraft,
};
use learn_core::time::fixed_clock;
use proptest::prelude::*;
use services::{CatalogService, QuizStep, SessionController, TallyStep};

fn controller() -> SessionController {
    SessionController::new(
        UserDraft::starter().validate().unwrap(),
        EngineSettings::default(),
        fixed_clock(),
    )
}

fn two_question_quiz() -> learn_core::model::Quiz {
    let question = |id: &str| QuestionDraft {
        id: QuestionId::new(id).unwrap(),
        question: format!("Question {id}"),
        options: vec!["a".into(), "b".into(), "c".into()],
        correct_answer: 2,
        xp_reward: 10,
    };
    QuizDraft {
        id: QuizId::new("two").unwrap(),
        lesson_id: LessonId::new("budgeting-101").unwrap(),
        questions: vec![question("1"), question("2")],
    }
    .validate()
    .unwrap()
}

fn deck(cards: usize) -> FlashcardDeck {
    let cards = (0..cards)
        .map(|i| Flashcard::new(format!("Q{i}"), format!("A{i}"), "Budgeting").unwrap())
        .collect();
    FlashcardDeck::new(DeckId::new("deck").unwrap(), "Deck", cards).unwrap()
}

#[test]
fn starter_user_gains_lesson_bonus() {
    let mut session = controller();
    let change = session.add_xp(30);
    assert_eq!(change.xp, 1280);
    assert_eq!(session.user().level(), 3);
}

#[test]
fn one_right_one_wrong_scores_ten() {
    let mut session = controller();
    session.start_quiz(two_question_quiz()).unwrap();

    session.select_answer(2).unwrap();
    session.select_answer(0).unwrap();
    assert!(!session.is_last_question());
    session.complete_or_advance().unwrap();

    session.select_answer(1).unwrap();
    assert!(session.is_last_question());
    let QuizStep::Completed(outcome) = session.complete_or_advance().unwrap() else {
        panic!("expected the quiz to complete");
    };
    assert_eq!(outcome.score, 10);
    assert_eq!(outcome.accuracy_percent(), 50);
    assert_eq!(session.screen(), Screen::LessonComplete);
    assert_eq!(session.user().xp(), 1250 + 10 + 30);
}

#[test]
fn five_card_pass_counts_three_and_two() {
    let mut session = controller();
    session.start_reinforcement(deck(5));

    let mut steps: Vec<TallyStep> = (0..5)
        .map(|card| {
            session.reveal().unwrap();
            if card < 3 {
                session.mark_remembered().unwrap()
            } else {
                session.mark_forgotten().unwrap()
            }
        })
        .collect();
    let last = steps.pop().unwrap();
    assert!(
        steps
            .iter()
            .all(|step| matches!(step, TallyStep::Advanced { .. }))
    );

    let TallyStep::Completed(summary) = last else {
        panic!("expected completion after the fifth mark");
    };
    assert_eq!(summary.remembered, 3);
    assert_eq!(summary.forgotten, 2);
    assert_eq!(summary.message(), "You remembered 3 out of 5 cards");

    let snapshot = session.snapshot();
    let view = snapshot.reinforcement.unwrap();
    assert!(view.progress.is_complete);
    assert_eq!(view.summary.unwrap().next_review, "Next review in 2 days");
}

#[test]
fn snapshot_reports_fallback_for_unguarded_screens() {
    let mut session = controller();
    session.navigate(Screen::Lesson);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.screen, Screen::Lesson);
    assert!(snapshot.fallback.is_some());
    assert!(snapshot.lesson.is_none());
    assert_eq!(snapshot.user.level, 3);
    assert_eq!(snapshot.user.level_progress.percent, 50);
    assert_eq!(snapshot.user.completion_rate, 25);
}

#[tokio::test]
async fn full_flow_through_the_sample_catalog() {
    let catalog = CatalogService::in_memory().unwrap();
    let mut session = controller();

    let goals = catalog.goals().await.unwrap();
    session.navigate(Screen::ChooseGoal);
    let python = goals
        .iter()
        .find(|goal| goal.id().as_str() == "python-basics")
        .unwrap();
    session.choose_goal(python);
    assert_eq!(session.screen(), Screen::Home);
    assert_eq!(session.user().selected_goal(), python.title());

    let lesson = catalog
        .lesson(&LessonId::new("budgeting-101").unwrap())
        .await
        .unwrap();
    let quiz = catalog.quiz_for_lesson(lesson.id()).await.unwrap();
    let answers: Vec<usize> = quiz
        .questions()
        .iter()
        .map(|q| q.correct_answer())
        .collect();
    let max = quiz.max_score();

    session.start_lesson(lesson);
    session.start_quiz(quiz).unwrap();
    for answer in answers {
        session.select_answer(answer).unwrap();
        session.complete_or_advance().unwrap();
    }
    assert_eq!(session.screen(), Screen::LessonComplete);
    assert_eq!(session.user().xp(), 1250 + u64::from(max) + 30);
    assert!(
        session
            .user()
            .completed_topics()
            .iter()
            .any(|t| t == "Personal Finance")
    );

    let deck = catalog
        .flashcard_deck(&DeckId::new("budgeting-basics").unwrap())
        .await
        .unwrap();
    session.start_reinforcement(deck);
    assert_eq!(session.screen(), Screen::Reinforcement);
    session.navigate(Screen::Home);
}

fn screen_strategy() -> impl Strategy<Value = Screen> {
    prop::sample::select(Screen::ALL.to_vec())
}

proptest! {
    #[test]
    fn navigate_always_lands_on_target(path in prop::collection::vec(screen_strategy(), 1..20)) {
        let mut session = controller();
        for screen in path {
            session.navigate(screen);
            prop_assert_eq!(session.screen(), screen);
        }
    }

    #[test]
    fn repeated_selection_never_changes_score(picks in prop::collection::vec(0_usize..3, 1..10)) {
        let mut session = controller();
        session.start_quiz(two_question_quiz()).unwrap();
        let first = picks[0];
        for pick in &picks {
            session.select_answer(*pick).unwrap();
        }
        let expected = if first == 2 { 10 } else { 0 };
        prop_assert_eq!(session.quiz_run().unwrap().score(), expected);
    }

    #[test]
    fn tally_counts_match_marks(ops in prop::collection::vec(0_u8..6, 0..40)) {
        let mut session = controller();
        session.start_reinforcement(deck(4));
        let mut marks = 0_usize;
        for op in ops {
            match op {
                0 => session.reveal().unwrap(),
                1 | 2 => {
                    let step = if op == 1 {
                        session.mark_remembered().unwrap()
                    } else {
                        session.mark_forgotten().unwrap()
                    };
                    if matches!(step, TallyStep::Advanced { .. } | TallyStep::Completed(_)) {
                        marks += 1;
                    }
                }
                3 => {
                    let before = session.reinforcement().unwrap().remembered();
                    session.go_back().unwrap();
                    prop_assert_eq!(session.reinforcement().unwrap().remembered(), before);
                }
                4 => {
                    let before = session.reinforcement().unwrap().forgotten();
                    session.go_forward().unwrap();
                    prop_assert_eq!(session.reinforcement().unwrap().forgotten(), before);
                }
                _ => {
                    session.reset_reinforcement().unwrap();
                    marks = 0;
                }
            }
            let tally = session.reinforcement().unwrap();
            prop_assert_eq!(tally.remembered() + tally.forgotten(), marks);
            prop_assert!(tally.current_index() < tally.deck().len());
        }
    }
}
