use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, QuestionId, QuizId, RunId};
use crate::model::validation::{ContentError, require_text};

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated multiple-choice question as authored in the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub xp_reward: u32,
}

impl QuestionDraft {
    /// Validate the question.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::TooFewOptions` for fewer than two options and
    /// `ContentError::InvalidQuestion` if `correct_answer` is not an option index.
    pub fn validate(self) -> Result<Question, ContentError> {
        let question = require_text(self.question, "question text")?;
        if self.options.len() < 2 {
            return Err(ContentError::TooFewOptions {
                question_id: self.id,
                found: self.options.len(),
            });
        }
        if self.correct_answer >= self.options.len() {
            return Err(ContentError::InvalidQuestion {
                question_id: self.id,
                correct_answer: self.correct_answer,
                options: self.options.len(),
            });
        }
        let options = self
            .options
            .into_iter()
            .map(|option| require_text(option, "question option"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Question {
            id: self.id,
            question,
            options,
            correct_answer: self.correct_answer,
            xp_reward: self.xp_reward,
        })
    }
}

/// A validated multiple-choice question; `correct_answer` always indexes `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    xp_reward: u32,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// Unvalidated quiz as authored in the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDraft {
    pub id: QuizId,
    pub lesson_id: LessonId,
    pub questions: Vec<QuestionDraft>,
}

impl QuizDraft {
    /// Validate the quiz and every question in it.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyQuiz` when there are no questions, or the
    /// first question error encountered.
    pub fn validate(self) -> Result<Quiz, ContentError> {
        if self.questions.is_empty() {
            return Err(ContentError::EmptyQuiz { quiz_id: self.id });
        }
        let questions = self
            .questions
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Quiz {
            id: self.id,
            lesson_id: self.lesson_id,
            questions,
        })
    }
}

/// An ordered sequence of questions, loosely tied to a lesson by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    id: QuizId,
    lesson_id: LessonId,
    questions: Vec<Question>,
}

impl Quiz {
    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Highest score a run of this quiz can produce.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.questions
            .iter()
            .fold(0_u32, |acc, q| acc.saturating_add(q.xp_reward))
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Final tally of a completed quiz run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOutcome {
    pub run_id: RunId,
    pub quiz_id: QuizId,
    pub lesson_id: LessonId,
    pub score: u32,
    pub correct: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl QuizOutcome {
    /// Share of questions answered correctly, rounded to a whole percent.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.correct as f64 / self.total as f64) * 100.0;
        pct.round() as u32
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, options: &[&str], correct: usize) -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new(id).unwrap(),
            question: format!("Question {id}?"),
            options: options.iter().map(|o| (*o).to_string()).collect(),
            correct_answer: correct,
            xp_reward: 10,
        }
    }

    fn quiz(questions: Vec<QuestionDraft>) -> QuizDraft {
        QuizDraft {
            id: QuizId::new("budgeting-quiz").unwrap(),
            lesson_id: LessonId::new("budgeting-101").unwrap(),
            questions,
        }
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let err = quiz(Vec::new()).validate().unwrap_err();
        assert!(matches!(err, ContentError::EmptyQuiz { .. }));
    }

    #[test]
    fn correct_answer_out_of_range_is_rejected() {
        let err = quiz(vec![question("1", &["a", "b"], 2)])
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ContentError::InvalidQuestion {
                question_id: QuestionId::new("1").unwrap(),
                correct_answer: 2,
                options: 2,
            }
        );
    }

    #[test]
    fn single_option_question_is_rejected() {
        let err = question("1", &["only"], 0).validate().unwrap_err();
        assert!(matches!(err, ContentError::TooFewOptions { found: 1, .. }));
    }

    #[test]
    fn valid_quiz_exposes_questions_in_order() {
        let quiz = quiz(vec![
            question("1", &["a", "b", "c"], 1),
            question("2", &["a", "b"], 0),
        ])
        .validate()
        .unwrap();

        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.question(0).unwrap().id().as_str(), "1");
        assert!(quiz.question(0).unwrap().is_correct(1));
        assert!(!quiz.question(1).unwrap().is_correct(1));
        assert!(quiz.question(2).is_none());
        assert_eq!(quiz.max_score(), 20);
    }

    #[test]
    fn accuracy_rounds_to_whole_percent() {
        let now = crate::time::fixed_now();
        let outcome = QuizOutcome {
            run_id: RunId::new_v4(),
            quiz_id: QuizId::new("q").unwrap(),
            lesson_id: LessonId::new("l").unwrap(),
            score: 20,
            correct: 2,
            total: 3,
            started_at: now,
            completed_at: now,
        };
        assert_eq!(outcome.accuracy_percent(), 67);
    }
}
