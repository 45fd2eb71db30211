use chrono::{DateTime, Utc};
use serde::Serialize;

use learn_core::model::{Question, Quiz, QuizOutcome, RunId};

use super::progress::{QuizProgress, percent_of};
use crate::error::SessionError;

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// The learner's pick for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub selected: usize,
    pub is_correct: bool,
    /// XP credited to the running score by this answer.
    pub awarded: u32,
}

/// Result of [`QuizRun::select_answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerResult {
    Recorded(AnswerRecord),
    /// The question was already answered; the earlier record stands.
    AlreadyAnswered(AnswerRecord),
}

impl AnswerResult {
    #[must_use]
    pub fn record(&self) -> AnswerRecord {
        match self {
            AnswerResult::Recorded(record) | AnswerResult::AlreadyAnswered(record) => *record,
        }
    }
}

/// Result of [`QuizRun::complete_or_advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    /// The current question has no answer yet; nothing moved.
    Unanswered { index: usize },
    Advanced { index: usize },
    Completed(QuizOutcome),
    AlreadyCompleted,
}

//
// ─── QUIZ RUN ──────────────────────────────────────────────────────────────────
//

/// One pass through a quiz.
///
/// Each question can be answered once; the running score only grows through
/// the first answer to a question.
#[derive(Debug, Clone)]
pub struct QuizRun {
    run_id: RunId,
    quiz: Quiz,
    current: usize,
    answer: Option<AnswerRecord>,
    score: u32,
    correct: usize,
    started_at: DateTime<Utc>,
    outcome: Option<QuizOutcome>,
}

impl QuizRun {
    /// Start a run at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuiz` if the quiz has no questions.
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        Self::with_run_id(RunId::new_v4(), quiz, started_at)
    }

    /// Like [`QuizRun::new`] with a caller-chosen run id.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuiz` if the quiz has no questions.
    pub fn with_run_id(
        run_id: RunId,
        quiz: Quiz,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if quiz.is_empty() {
            return Err(SessionError::EmptyQuiz {
                quiz_id: quiz.id().clone(),
            });
        }
        Ok(Self {
            run_id,
            quiz,
            current: 0,
            answer: None,
            score: 0,
            correct: 0,
            started_at,
            outcome: None,
        })
    }

    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.question(self.current)
    }

    /// Answer given to the current question, if any.
    #[must_use]
    pub fn answer(&self) -> Option<AnswerRecord> {
        self.answer
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.quiz.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    /// Final tally once the last question has been passed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuizNotComplete` while the run is still in progress.
    pub fn outcome(&self) -> Result<&QuizOutcome, SessionError> {
        self.outcome.as_ref().ok_or(SessionError::QuizNotComplete)
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.quiz.len();
        QuizProgress {
            position: self.current + 1,
            total,
            percent: percent_of(self.current + 1, total),
            score: self.score,
            answered: self.answer.is_some(),
            is_complete: self.is_complete(),
        }
    }

    /// Record an answer for the current question.
    ///
    /// A second selection on the same question changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` if `index` is not one of the
    /// question's options.
    pub fn select_answer(&mut self, index: usize) -> Result<AnswerResult, SessionError> {
        if let Some(existing) = self.answer {
            return Ok(AnswerResult::AlreadyAnswered(existing));
        }
        let question = self
            .quiz
            .question(self.current)
            .ok_or(SessionError::OutOfRangeIndex {
                index: self.current,
                len: self.quiz.len(),
            })?;
        let options = question.options().len();
        if index >= options {
            return Err(SessionError::InvalidOption { index, options });
        }

        let is_correct = question.is_correct(index);
        let awarded = if is_correct { question.xp_reward() } else { 0 };
        self.score = self.score.saturating_add(awarded);
        if is_correct {
            self.correct += 1;
        }
        let record = AnswerRecord {
            selected: index,
            is_correct,
            awarded,
        };
        self.answer = Some(record);
        Ok(AnswerResult::Recorded(record))
    }

    /// Move to the next question and clear the per-question state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRangeIndex` when already on the last question.
    pub fn advance_question(&mut self) -> Result<usize, SessionError> {
        let next = self.current + 1;
        if next >= self.quiz.len() {
            return Err(SessionError::OutOfRangeIndex {
                index: next,
                len: self.quiz.len(),
            });
        }
        self.current = next;
        self.answer = None;
        Ok(next)
    }

    /// Finish the run on the last question, otherwise advance.
    ///
    /// The current question must be answered first.
    pub fn complete_or_advance(&mut self, now: DateTime<Utc>) -> QuizStep {
        if self.is_complete() {
            return QuizStep::AlreadyCompleted;
        }
        if self.answer.is_none() {
            return QuizStep::Unanswered {
                index: self.current,
            };
        }
        if !self.is_last_question() {
            self.current += 1;
            self.answer = None;
            return QuizStep::Advanced {
                index: self.current,
            };
        }

        let outcome = QuizOutcome {
            run_id: self.run_id,
            quiz_id: self.quiz.id().clone(),
            lesson_id: self.quiz.lesson_id().clone(),
            score: self.score,
            correct: self.correct,
            total: self.quiz.len(),
            started_at: self.started_at,
            completed_at: now,
        };
        self.outcome = Some(outcome.clone());
        QuizStep::Completed(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::{LessonId, QuestionDraft, QuestionId, QuizDraft, QuizId};
    use chrono::Duration;
    use learn_core::time::{fixed_clock, fixed_now};

    fn quiz(n: usize) -> Quiz {
        QuizDraft {
            id: QuizId::new("q").unwrap(),
            lesson_id: LessonId::new("l").unwrap(),
            questions: (0..n)
                .map(|i| QuestionDraft {
                    id: QuestionId::new(format!("{i}")).unwrap(),
                    question: format!("Question {i}"),
                    options: vec!["a".into(), "b".into(), "c".into()],
                    correct_answer: 1,
                    xp_reward: 10,
                })
                .collect(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn second_selection_is_ignored() {
        let mut run = QuizRun::new(quiz(2), fixed_now()).unwrap();
        let first = run.select_answer(1).unwrap();
        assert!(matches!(first, AnswerResult::Recorded(r) if r.is_correct && r.awarded == 10));

        let again = run.select_answer(0).unwrap();
        assert_eq!(again, AnswerResult::AlreadyAnswered(first.record()));
        assert_eq!(run.score(), 10);
    }

    #[test]
    fn invalid_option_leaves_question_unanswered() {
        let mut run = QuizRun::new(quiz(1), fixed_now()).unwrap();
        let err = run.select_answer(3).unwrap_err();
        assert_eq!(err, SessionError::InvalidOption { index: 3, options: 3 });
        assert!(run.answer().is_none());
    }

    #[test]
    fn advancing_clears_answer_and_finishing_reports_outcome() {
        let mut run = QuizRun::new(quiz(2), fixed_now()).unwrap();
        run.select_answer(1).unwrap();
        assert!(!run.is_last_question());
        assert_eq!(run.complete_or_advance(fixed_now()), QuizStep::Advanced { index: 1 });
        assert!(run.answer().is_none());
        assert!(run.is_last_question());
        assert_eq!(run.outcome().unwrap_err(), SessionError::QuizNotComplete);

        run.select_answer(0).unwrap();
        let QuizStep::Completed(outcome) = run.complete_or_advance(fixed_now()) else {
            panic!("expected completion");
        };
        assert_eq!(outcome.score, 10);
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.total, 2);
        assert_eq!(run.complete_or_advance(fixed_now()), QuizStep::AlreadyCompleted);
    }

    #[test]
    fn unanswered_question_blocks_continue() {
        let mut run = QuizRun::new(quiz(3), fixed_now()).unwrap();
        for _ in 0..3 {
            assert_eq!(
                run.complete_or_advance(fixed_now()),
                QuizStep::Unanswered { index: 0 }
            );
        }
        assert_eq!(run.current_index(), 0);
        assert!(!run.is_complete());

        run.select_answer(2).unwrap();
        assert_eq!(run.complete_or_advance(fixed_now()), QuizStep::Advanced { index: 1 });
        assert_eq!(
            run.complete_or_advance(fixed_now()),
            QuizStep::Unanswered { index: 1 }
        );
    }

    #[test]
    fn outcome_spans_the_time_spent_on_the_run() {
        let mut clock = fixed_clock();
        let mut run = QuizRun::new(quiz(2), clock.now()).unwrap();
        run.select_answer(1).unwrap();
        clock.advance(Duration::seconds(40));
        run.complete_or_advance(clock.now());
        run.select_answer(1).unwrap();
        clock.advance(Duration::seconds(50));

        let QuizStep::Completed(outcome) = run.complete_or_advance(clock.now()) else {
            panic!("expected completion");
        };
        assert_eq!(outcome.started_at, fixed_now());
        assert_eq!(outcome.completed_at - outcome.started_at, Duration::seconds(90));
    }

    #[test]
    fn manual_advance_past_end_is_rejected() {
        let mut run = QuizRun::new(quiz(1), fixed_now()).unwrap();
        assert_eq!(
            run.advance_question().unwrap_err(),
            SessionError::OutOfRangeIndex { index: 1, len: 1 }
        );
        assert_eq!(run.current_index(), 0);
    }

    #[test]
    fn progress_is_one_based() {
        let mut run = QuizRun::new(quiz(4), fixed_now()).unwrap();
        assert_eq!(run.progress().position, 1);
        assert_eq!(run.progress().percent, 25);
        run.advance_question().unwrap();
        assert_eq!(run.progress().percent, 50);
    }
}
