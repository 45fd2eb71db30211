use thiserror::Error;

use crate::model::ids::{DeckId, QuestionId, QuizId};

/// Authoring defects detected while loading catalog content.
///
/// These are fatal to the offending content item only; the session that
/// requested it keeps running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("quiz {quiz_id} has no questions")]
    EmptyQuiz { quiz_id: QuizId },

    #[error("question {question_id} needs at least two options, found {found}")]
    TooFewOptions { question_id: QuestionId, found: usize },

    #[error(
        "question {question_id} marks option {correct_answer} as correct but has {options} options"
    )]
    InvalidQuestion {
        question_id: QuestionId,
        correct_answer: usize,
        options: usize,
    },

    #[error("flashcard deck {deck_id} has no cards")]
    EmptyDeck { deck_id: DeckId },
}

/// Trim `value` and reject it if nothing is left.
pub(crate) fn require_text(value: String, field: &'static str) -> Result<String, ContentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContentError::EmptyField { field });
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims_whitespace() {
        assert_eq!(require_text("  hi ".into(), "title").unwrap(), "hi");
        assert_eq!(require_text("hi".into(), "title").unwrap(), "hi");
    }

    #[test]
    fn require_text_rejects_blank() {
        let err = require_text(" \n".into(), "title").unwrap_err();
        assert_eq!(err, ContentError::EmptyField { field: "title" });
        assert_eq!(err.to_string(), "title cannot be empty");
    }
}
