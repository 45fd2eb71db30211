use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use learn_core::model::{
    DeckId, FlashcardDeck, Goal, LeaderboardEntry, LeaderboardScope, Lesson, LessonDraft,
    LessonId, Quiz, QuizDraft, QuizId,
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{
    ContentRepository, ContentWriter, Storage, StorageError, load_catalog,
};
use crate::sample::SampleCatalog;

mod catalog_repo;
mod flashcard_repo;
mod lesson_repo;
mod mapping;
mod migrate;
mod quiz_repo;

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("bundled catalog is invalid: {0}")]
    Catalog(#[from] learn_core::Error),
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or if
    /// enforcing foreign key constraints fails during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        // An in-memory database lives only as long as a connection holds it open.
        let private_memory = database_url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if private_memory { 1 } else { 5 })
            .min_connections(u32::from(private_memory))
            .idle_timeout((!private_memory).then(|| Duration::from_secs(600)))
            .max_lifetime((!private_memory).then(|| Duration::from_secs(1800)))
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }

    /// True when no lesson has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the count query fails.
    pub async fn is_empty(&self) -> Result<bool, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(count == 0)
    }

    /// Load the bundled catalog if the database holds no content yet.
    ///
    /// Returns true if the catalog was written.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the catalog is invalid or cannot be stored.
    pub async fn seed_if_empty(&self) -> Result<bool, SqliteInitError> {
        if !self.is_empty().await? {
            return Ok(false);
        }
        let catalog = SampleCatalog::budgeting()?;
        load_catalog(self, &catalog).await?;
        tracing::info!("seeded empty content database with the sample catalog");
        Ok(true)
    }
}

#[async_trait]
impl ContentRepository for SqliteRepository {
    async fn get_lesson(&self, id: &LessonId) -> Result<Lesson, StorageError> {
        let draft = self.fetch_lesson(id).await?.ok_or(StorageError::NotFound)?;
        Ok(draft.validate()?)
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        let draft = self.fetch_quiz(id).await?.ok_or(StorageError::NotFound)?;
        Ok(draft.validate()?)
    }

    async fn get_flashcard_deck(&self, id: &DeckId) -> Result<FlashcardDeck, StorageError> {
        self.fetch_flashcard_deck(id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let mut lessons = Vec::new();
        for id in self.lesson_ids().await? {
            lessons.push(self.get_lesson(&id).await?);
        }
        Ok(lessons)
    }

    async fn quiz_for_lesson(&self, lesson_id: &LessonId) -> Result<Option<Quiz>, StorageError> {
        match self.quiz_id_for_lesson(lesson_id).await? {
            Some(id) => Ok(Some(self.get_quiz(&id).await?)),
            None => Ok(None),
        }
    }

    async fn list_goals(&self) -> Result<Vec<Goal>, StorageError> {
        self.fetch_goals().await
    }

    async fn leaderboard(
        &self,
        scope: LeaderboardScope,
    ) -> Result<Vec<LeaderboardEntry>, StorageError> {
        self.fetch_leaderboard(scope).await
    }
}

#[async_trait]
impl ContentWriter for SqliteRepository {
    async fn upsert_lesson(&self, lesson: &LessonDraft) -> Result<(), StorageError> {
        self.write_lesson(lesson).await
    }

    async fn upsert_quiz(&self, quiz: &QuizDraft) -> Result<(), StorageError> {
        self.write_quiz(quiz).await
    }

    async fn upsert_flashcard_deck(&self, deck: &FlashcardDeck) -> Result<(), StorageError> {
        self.write_flashcard_deck(deck).await
    }

    async fn upsert_goal(&self, position: u32, goal: &Goal) -> Result<(), StorageError> {
        self.write_goal(position, goal).await
    }

    async fn replace_leaderboard(
        &self,
        scope: LeaderboardScope,
        entries: &[LeaderboardEntry],
    ) -> Result<(), StorageError> {
        self.write_leaderboard(scope, entries).await
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`, seeding the sample catalog into an
    /// empty database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection, migrations, or seeding cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        repo.seed_if_empty().await?;
        let content: Arc<dyn ContentRepository> = Arc::new(repo);
        Ok(Self { content })
    }
}
