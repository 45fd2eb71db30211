use learn_core::model::{
    DeckId, LeaderboardScope, LessonId, QuestionDraft, QuestionId, QuizDraft, QuizId,
};
use storage::repository::{ContentRepository, ContentWriter, StorageError, load_catalog};
use storage::sample::SampleCatalog;
use storage::sqlite::SqliteRepository;

async fn seeded(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrips_the_sample_catalog() {
    let repo = seeded("memdb_catalog").await;
    assert!(repo.is_empty().await.unwrap());
    assert!(repo.seed_if_empty().await.unwrap());
    assert!(!repo.seed_if_empty().await.unwrap());

    let lesson = repo
        .get_lesson(&LessonId::new("budgeting-101").unwrap())
        .await
        .unwrap();
    assert_eq!(lesson.title(), "Budgeting 101");
    assert_eq!(lesson.steps().len(), 3);

    let quiz = repo
        .get_quiz(&QuizId::new("daily-reinforcement").unwrap())
        .await
        .unwrap();
    assert_eq!(quiz.len(), 2);
    assert_eq!(quiz.max_score(), 20);
    let first = quiz.question(0).unwrap();
    assert_eq!(first.options().len(), 4);
    assert_eq!(first.options()[1], "50%");
    assert!(first.is_correct(1));

    let deck = repo
        .get_flashcard_deck(&DeckId::new("budgeting-basics").unwrap())
        .await
        .unwrap();
    assert_eq!(deck.len(), 5);

    let goals = repo.list_goals().await.unwrap();
    assert_eq!(goals.len(), 3);

    let global = repo.leaderboard(LeaderboardScope::Global).await.unwrap();
    assert_eq!(global.len(), 8);
    assert!(global.windows(2).all(|pair| pair[0].rank < pair[1].rank));
    let friends = repo.leaderboard(LeaderboardScope::Friends).await.unwrap();
    assert_eq!(friends.len(), 5);

    let for_lesson = repo.quiz_for_lesson(lesson.id()).await.unwrap().unwrap();
    assert_eq!(for_lesson.id().as_str(), "budgeting-quiz");
}

#[tokio::test]
async fn missing_content_is_not_found() {
    let repo = seeded("memdb_missing").await;

    let err = repo
        .get_lesson(&LessonId::new("nope").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));

    let none = repo
        .quiz_for_lesson(&LessonId::new("nope").unwrap())
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn upserting_a_quiz_replaces_its_questions() {
    let repo = seeded("memdb_upsert").await;
    let catalog = SampleCatalog::budgeting().unwrap();
    load_catalog(&repo, &catalog).await.unwrap();

    let mut quiz = catalog.quizzes[0].clone();
    quiz.questions.truncate(1);
    repo.upsert_quiz(&quiz).await.unwrap();

    let stored = repo.get_quiz(&quiz.id).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn invalid_stored_quiz_surfaces_as_invalid_content() {
    let repo = seeded("memdb_invalid").await;
    let broken = QuizDraft {
        id: QuizId::new("broken").unwrap(),
        lesson_id: LessonId::new("budgeting-101").unwrap(),
        questions: vec![QuestionDraft {
            id: QuestionId::new("1").unwrap(),
            question: "Pick one".into(),
            options: vec!["a".into(), "b".into()],
            correct_answer: 5,
            xp_reward: 10,
        }],
    };
    repo.upsert_quiz(&broken).await.unwrap();

    let err = repo.get_quiz(&broken.id).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidContent(_)));
}
