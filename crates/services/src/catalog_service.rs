use std::sync::Arc;

use learn_core::model::{
    DeckId, FlashcardDeck, Goal, LeaderboardEntry, LeaderboardScope, Lesson, LessonId, Quiz,
    QuizId,
};
use storage::repository::{ContentRepository, InMemoryRepository, Storage, StorageError};

use crate::error::CatalogError;

/// Read-only access to lessons, quizzes, decks, goals and leaderboards.
///
/// Lookups happen before an intent reaches the session controller, which
/// only ever receives validated content.
#[derive(Clone)]
pub struct CatalogService {
    content: Arc<dyn ContentRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(Arc::clone(&storage.content))
    }

    /// Catalog backed by the bundled sample content.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the sample content fails validation.
    pub fn in_memory() -> Result<Self, CatalogError> {
        Ok(Self::new(Arc::new(InMemoryRepository::with_sample_catalog()?)))
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` for missing or invalid lessons.
    pub async fn lesson(&self, id: &LessonId) -> Result<Lesson, CatalogError> {
        tracing::debug!(lesson_id = %id, "load lesson");
        Ok(self.content.get_lesson(id).await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` for missing or invalid quizzes.
    pub async fn quiz(&self, id: &QuizId) -> Result<Quiz, CatalogError> {
        tracing::debug!(quiz_id = %id, "load quiz");
        self.content.get_quiz(id).await.map_err(|err| {
            if let StorageError::InvalidContent(content) = &err {
                tracing::warn!(quiz_id = %id, %content, "skipping invalid quiz");
            }
            err.into()
        })
    }

    /// The quiz attached to `lesson_id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoQuizForLesson` if the lesson has none.
    pub async fn quiz_for_lesson(&self, lesson_id: &LessonId) -> Result<Quiz, CatalogError> {
        self.content
            .quiz_for_lesson(lesson_id)
            .await?
            .ok_or_else(|| CatalogError::NoQuizForLesson {
                lesson_id: lesson_id.clone(),
            })
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` for missing decks.
    pub async fn flashcard_deck(&self, id: &DeckId) -> Result<FlashcardDeck, CatalogError> {
        tracing::debug!(deck_id = %id, "load flashcard deck");
        Ok(self.content.get_flashcard_deck(id).await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn lessons(&self) -> Result<Vec<Lesson>, CatalogError> {
        Ok(self.content.list_lessons().await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn goals(&self) -> Result<Vec<Goal>, CatalogError> {
        Ok(self.content.list_goals().await?)
    }

    /// The stored snapshot, in stored rank order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn leaderboard(
        &self,
        scope: LeaderboardScope,
    ) -> Result<Vec<LeaderboardEntry>, CatalogError> {
        Ok(self.content.leaderboard(scope).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_catalog_links_lesson_and_quiz() {
        let catalog = CatalogService::in_memory().unwrap();
        let lesson_id = LessonId::new("budgeting-101").unwrap();
        let lesson = catalog.lesson(&lesson_id).await.unwrap();
        let quiz = catalog.quiz_for_lesson(lesson.id()).await.unwrap();
        assert_eq!(quiz.lesson_id(), lesson.id());
    }

    #[tokio::test]
    async fn lesson_without_quiz_is_reported() {
        let catalog = CatalogService::in_memory().unwrap();
        let err = catalog
            .quiz_for_lesson(&LessonId::new("no-such-lesson").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NoQuizForLesson { .. }));
    }

    #[tokio::test]
    async fn missing_deck_is_not_found() {
        let catalog = CatalogService::in_memory().unwrap();
        let err = catalog
            .flashcard_deck(&DeckId::new("missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Storage(StorageError::NotFound)));
    }
}
