use async_trait::async_trait;
use learn_core::model::{
    ContentError, DeckId, FlashcardDeck, Goal, LeaderboardEntry, LeaderboardScope, Lesson,
    LessonDraft, LessonId, Quiz, QuizDraft, QuizId,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::sample::SampleCatalog;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid content: {0}")]
    InvalidContent(#[from] ContentError),
}

/// Read-only catalog the session engine pulls lessons, quizzes, and decks from.
///
/// Implementations validate records while mapping them into domain types, so
/// an authoring defect surfaces as `StorageError::InvalidContent` for that
/// item only.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch a lesson by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_lesson(&self, id: &LessonId) -> Result<Lesson, StorageError>;

    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing and
    /// `StorageError::InvalidContent` if the quiz fails validation.
    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError>;

    /// Fetch a flashcard deck by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_flashcard_deck(&self, id: &DeckId) -> Result<FlashcardDeck, StorageError>;

    /// All lessons, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a lesson cannot be read or validated.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError>;

    /// The first quiz (by id) that references `lesson_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be read or validated.
    async fn quiz_for_lesson(&self, lesson_id: &LessonId) -> Result<Option<Quiz>, StorageError>;

    /// Goals in display order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_goals(&self) -> Result<Vec<Goal>, StorageError>;

    /// The pre-ranked leaderboard snapshot for `scope`, ordered by rank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn leaderboard(
        &self,
        scope: LeaderboardScope,
    ) -> Result<Vec<LeaderboardEntry>, StorageError>;
}

/// Write side used by seeding and tests; the session engine never writes content.
#[async_trait]
pub trait ContentWriter: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the lesson cannot be stored.
    async fn upsert_lesson(&self, lesson: &LessonDraft) -> Result<(), StorageError>;

    /// Stores the quiz as authored; validation happens on read.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &QuizDraft) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the deck cannot be stored.
    async fn upsert_flashcard_deck(&self, deck: &FlashcardDeck) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the goal cannot be stored.
    async fn upsert_goal(&self, position: u32, goal: &Goal) -> Result<(), StorageError>;

    /// Replace the snapshot for `scope`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn replace_leaderboard(
        &self,
        scope: LeaderboardScope,
        entries: &[LeaderboardEntry],
    ) -> Result<(), StorageError>;
}

/// Store every record of `catalog` through `writer`.
///
/// # Errors
///
/// Returns the first `StorageError` hit.
pub async fn load_catalog(
    writer: &dyn ContentWriter,
    catalog: &SampleCatalog,
) -> Result<(), StorageError> {
    for lesson in &catalog.lessons {
        writer.upsert_lesson(lesson).await?;
    }
    for quiz in &catalog.quizzes {
        writer.upsert_quiz(quiz).await?;
    }
    for deck in &catalog.decks {
        writer.upsert_flashcard_deck(deck).await?;
    }
    for (position, goal) in (0_u32..).zip(&catalog.goals) {
        writer.upsert_goal(position, goal).await?;
    }
    for (scope, entries) in &catalog.leaderboards {
        writer.replace_leaderboard(*scope, entries).await?;
    }
    tracing::debug!(
        lessons = catalog.lessons.len(),
        quizzes = catalog.quizzes.len(),
        decks = catalog.decks.len(),
        "catalog loaded"
    );
    Ok(())
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct Tables {
    lessons: BTreeMap<LessonId, LessonDraft>,
    quizzes: BTreeMap<QuizId, QuizDraft>,
    decks: BTreeMap<DeckId, FlashcardDeck>,
    goals: BTreeMap<u32, Goal>,
    leaderboards: BTreeMap<&'static str, Vec<LeaderboardEntry>>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with the bundled sample catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the bundled catalog is malformed,
    /// or `StorageError::Connection` if the table lock is poisoned.
    pub fn with_sample_catalog() -> Result<Self, StorageError> {
        let repo = Self::new();
        let catalog =
            SampleCatalog::budgeting().map_err(|e| StorageError::Serialization(e.to_string()))?;
        {
            let mut t = repo.lock()?;
            for lesson in catalog.lessons {
                t.lessons.insert(lesson.id.clone(), lesson);
            }
            for quiz in catalog.quizzes {
                t.quizzes.insert(quiz.id.clone(), quiz);
            }
            for deck in catalog.decks {
                t.decks.insert(deck.id().clone(), deck);
            }
            for (position, goal) in (0_u32..).zip(catalog.goals) {
                t.goals.insert(position, goal);
            }
            for (scope, entries) in catalog.leaderboards {
                t.leaderboards.insert(scope.as_str(), entries);
            }
        }
        Ok(repo)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn get_lesson(&self, id: &LessonId) -> Result<Lesson, StorageError> {
        let draft = self.lock()?.lessons.get(id).cloned();
        Ok(draft.ok_or(StorageError::NotFound)?.validate()?)
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        let draft = self.lock()?.quizzes.get(id).cloned();
        Ok(draft.ok_or(StorageError::NotFound)?.validate()?)
    }

    async fn get_flashcard_deck(&self, id: &DeckId) -> Result<FlashcardDeck, StorageError> {
        self.lock()?
            .decks
            .get(id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let drafts: Vec<_> = self.lock()?.lessons.values().cloned().collect();
        drafts
            .into_iter()
            .map(|d| d.validate().map_err(StorageError::from))
            .collect()
    }

    async fn quiz_for_lesson(&self, lesson_id: &LessonId) -> Result<Option<Quiz>, StorageError> {
        let draft = self
            .lock()?
            .quizzes
            .values()
            .find(|q| &q.lesson_id == lesson_id)
            .cloned();
        draft
            .map(|d| d.validate().map_err(StorageError::from))
            .transpose()
    }

    async fn list_goals(&self) -> Result<Vec<Goal>, StorageError> {
        Ok(self.lock()?.goals.values().cloned().collect())
    }

    async fn leaderboard(
        &self,
        scope: LeaderboardScope,
    ) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let mut entries = self
            .lock()?
            .leaderboards
            .get(scope.as_str())
            .cloned()
            .unwrap_or_default();
        entries.sort_by_key(|e| e.rank);
        Ok(entries)
    }
}

#[async_trait]
impl ContentWriter for InMemoryRepository {
    async fn upsert_lesson(&self, lesson: &LessonDraft) -> Result<(), StorageError> {
        self.lock()?.lessons.insert(lesson.id.clone(), lesson.clone());
        Ok(())
    }

    async fn upsert_quiz(&self, quiz: &QuizDraft) -> Result<(), StorageError> {
        self.lock()?.quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(())
    }

    async fn upsert_flashcard_deck(&self, deck: &FlashcardDeck) -> Result<(), StorageError> {
        self.lock()?.decks.insert(deck.id().clone(), deck.clone());
        Ok(())
    }

    async fn upsert_goal(&self, position: u32, goal: &Goal) -> Result<(), StorageError> {
        let mut t = self.lock()?;
        t.goals.retain(|_, g| g.id() != goal.id());
        t.goals.insert(position, goal.clone());
        Ok(())
    }

    async fn replace_leaderboard(
        &self,
        scope: LeaderboardScope,
        entries: &[LeaderboardEntry],
    ) -> Result<(), StorageError> {
        self.lock()?
            .leaderboards
            .insert(scope.as_str(), entries.to_vec());
        Ok(())
    }
}

/// Content backend behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub content: Arc<dyn ContentRepository>,
}

impl Storage {
    /// In-memory storage seeded with the sample catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be loaded.
    pub fn in_memory() -> Result<Self, StorageError> {
        let repo = InMemoryRepository::with_sample_catalog()?;
        Ok(Self {
            content: Arc::new(repo),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::{QuestionDraft, QuestionId};

    #[tokio::test]
    async fn sample_catalog_serves_lesson_and_quiz() {
        let repo = InMemoryRepository::with_sample_catalog().unwrap();
        let lesson_id = LessonId::new("budgeting-101").unwrap();

        let lesson = repo.get_lesson(&lesson_id).await.unwrap();
        assert_eq!(lesson.title(), "Budgeting 101");

        let quiz = repo.quiz_for_lesson(&lesson_id).await.unwrap().unwrap();
        assert_eq!(quiz.lesson_id(), &lesson_id);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .get_quiz(&QuizId::new("nope").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn invalid_quiz_fails_only_that_item() {
        let repo = InMemoryRepository::with_sample_catalog().unwrap();
        let broken = QuizDraft {
            id: QuizId::new("broken").unwrap(),
            lesson_id: LessonId::new("budgeting-101").unwrap(),
            questions: vec![QuestionDraft {
                id: QuestionId::new("1").unwrap(),
                question: "Pick one".into(),
                options: vec!["a".into(), "b".into()],
                correct_answer: 7,
                xp_reward: 10,
            }],
        };
        repo.upsert_quiz(&broken).await.unwrap();

        let err = repo.get_quiz(&broken.id).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidContent(ContentError::InvalidQuestion { .. })
        ));
        let ok = repo.get_quiz(&QuizId::new("budgeting-quiz").unwrap()).await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn leaderboard_is_returned_in_rank_order() {
        let repo = InMemoryRepository::with_sample_catalog().unwrap();
        let global = repo.leaderboard(LeaderboardScope::Global).await.unwrap();
        assert_eq!(global.len(), 8);
        assert!(global.windows(2).all(|w| w[0].rank < w[1].rank));
        let friends = repo.leaderboard(LeaderboardScope::Friends).await.unwrap();
        assert_eq!(friends.len(), 5);
    }

    #[tokio::test]
    async fn load_catalog_fills_an_empty_repository() {
        let repo = InMemoryRepository::new();
        load_catalog(&repo, &SampleCatalog::budgeting().unwrap())
            .await
            .unwrap();
        assert_eq!(repo.list_goals().await.unwrap().len(), 3);
        assert_eq!(repo.list_lessons().await.unwrap().len(), 1);
    }
}
