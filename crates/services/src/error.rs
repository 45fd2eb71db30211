//! Shared error types for the services crate.

use thiserror::Error;

use learn_core::model::{LessonId, QuizId, Screen};
use storage::repository::StorageError;

/// Errors emitted by the session controller and its engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("screen {screen} has no active content")]
    NoActiveContent { screen: Screen },
    #[error("quiz {quiz_id} has no questions")]
    EmptyQuiz { quiz_id: QuizId },
    #[error("question index {index} is past the last question ({len} total)")]
    OutOfRangeIndex { index: usize, len: usize },
    #[error("option {index} does not exist ({options} options)")]
    InvalidOption { index: usize, options: usize },
    #[error("quiz run has not been completed")]
    QuizNotComplete,
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("lesson {lesson_id} has no quiz")]
    NoQuizForLesson { lesson_id: LessonId },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
