use learn_core::model::{DeckId, ParseIdError, Screen};
use services::{
    AnswerResult, CatalogError, CatalogService, QuizStep, SessionController, SessionError,
    TallyStep,
};
use thiserror::Error;

use crate::intent::{HELP, Intent};

pub const DEFAULT_DECK: &str = "budgeting-basics";

/// Failures while handling one prompt line. None of them end the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriverError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("could not render state: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error("unknown goal: {0}")]
    UnknownGoal(String),
    #[error("start a lesson first or pass a quiz id")]
    NoActiveLesson,
}

/// Whether the prompt loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Text-mode stand-in for the screens: turns intents into controller calls
/// and describes what changed.
pub struct Driver {
    session: SessionController,
    catalog: CatalogService,
}

impl Driver {
    #[must_use]
    pub fn new(session: SessionController, catalog: CatalogService) -> Self {
        Self { session, catalog }
    }

    #[must_use]
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Apply one intent, appending human-readable output to `out`.
    ///
    /// # Errors
    ///
    /// Returns `DriverError` when the intent cannot be applied; the session is
    /// left as it was.
    pub async fn handle(
        &mut self,
        intent: Intent,
        out: &mut Vec<String>,
    ) -> Result<Flow, DriverError> {
        tracing::debug!(?intent, "intent");
        match intent {
            Intent::Go(screen) => {
                self.session.navigate(screen);
                self.describe_screen(out);
            }
            Intent::SignIn(name) => {
                self.session.sign_in(name.as_deref().unwrap_or_default());
                out.push(format!("Welcome back, {}!", self.session.user().name()));
                self.describe_screen(out);
            }
            Intent::Goals => {
                for goal in self.catalog.goals().await? {
                    out.push(format!(
                        "{:<22} {} ({}, {})",
                        goal.id().as_str(),
                        goal.title(),
                        goal.lessons_label(),
                        goal.difficulty()
                    ));
                }
            }
            Intent::ChooseGoal(id) => {
                let goals = self.catalog.goals().await?;
                let goal = goals
                    .iter()
                    .find(|goal| goal.id().as_str() == id)
                    .ok_or(DriverError::UnknownGoal(id))?;
                self.session.choose_goal(goal);
                out.push(format!("Goal set: {}", goal.title()));
                self.describe_screen(out);
            }
            Intent::Lessons => {
                for lesson in self.catalog.lessons().await? {
                    out.push(format!(
                        "{:<16} {} [{}] +{} XP",
                        lesson.id().as_str(),
                        lesson.title(),
                        lesson.topic(),
                        lesson.xp_reward()
                    ));
                }
            }
            Intent::StartLesson(id) => {
                let lesson = self.catalog.lesson(&id).await?;
                self.session.start_lesson(lesson);
                self.describe_screen(out);
            }
            Intent::StartQuiz(id) => {
                let quiz = match id {
                    Some(id) => self.catalog.quiz(&id).await?,
                    None => {
                        let lesson_id = self
                            .session
                            .lesson()
                            .map(|lesson| lesson.id().clone())
                            .ok_or(DriverError::NoActiveLesson)?;
                        self.catalog.quiz_for_lesson(&lesson_id).await?
                    }
                };
                self.session.start_quiz(quiz)?;
                self.describe_screen(out);
            }
            Intent::Answer(number) => {
                let index = number.checked_sub(1).ok_or(SessionError::InvalidOption {
                    index: 0,
                    options: self.option_count(),
                })?;
                match self.session.select_answer(index)? {
                    AnswerResult::Recorded(record) if record.is_correct => {
                        out.push(format!("Correct! +{} XP", record.awarded));
                    }
                    AnswerResult::Recorded(_) => out.push(self.incorrect_message()),
                    AnswerResult::AlreadyAnswered(_) => {
                        out.push("Already answered; press `next`.".to_string());
                    }
                }
            }
            Intent::Advance => {
                self.session.advance_question()?;
                self.describe_screen(out);
            }
            Intent::Next => match self.session.complete_or_advance()? {
                QuizStep::Unanswered { .. } => {
                    out.push("Pick an answer first with `answer <n>`.".to_string());
                }
                QuizStep::Advanced { .. } => self.describe_screen(out),
                QuizStep::Completed(outcome) => {
                    out.push(format!(
                        "Quiz complete: {}/{} correct, {} XP",
                        outcome.correct, outcome.total, outcome.score
                    ));
                    self.describe_screen(out);
                }
                QuizStep::AlreadyCompleted => out.push("Quiz already completed.".to_string()),
            },
            Intent::Review(deck) => {
                let deck_id = match deck {
                    Some(id) => id,
                    None => DeckId::new(DEFAULT_DECK)?,
                };
                let deck = self.catalog.flashcard_deck(&deck_id).await?;
                self.session.start_reinforcement(deck);
                self.describe_screen(out);
            }
            Intent::Reveal => {
                self.session.reveal()?;
                self.describe_screen(out);
            }
            Intent::Remembered => {
                let step = self.session.mark_remembered()?;
                self.describe_tally_step(&step, out);
            }
            Intent::Forgot => {
                let step = self.session.mark_forgotten()?;
                self.describe_tally_step(&step, out);
            }
            Intent::Back => {
                self.session.go_back()?;
                self.describe_screen(out);
            }
            Intent::Forward => {
                self.session.go_forward()?;
                self.describe_screen(out);
            }
            Intent::Reset => {
                self.session.reset_reinforcement()?;
                self.describe_screen(out);
            }
            Intent::Leaderboard(scope) => {
                self.session.navigate(Screen::Leaderboard);
                out.push(format!("Leaderboard ({scope})"));
                for entry in self.catalog.leaderboard(scope).await? {
                    out.push(format!(
                        "#{:<3} {:<18} {:>6} XP  level {:<3} streak {}",
                        entry.rank, entry.name, entry.xp, entry.level, entry.streak
                    ));
                }
            }
            Intent::AddXp(amount) => {
                let change = self.session.add_xp(amount);
                out.push(format!("XP {} -> {}", change.previous_xp, change.xp));
                if change.leveled_up() {
                    out.push(format!("Level up! Now level {}", change.level));
                }
            }
            Intent::State => {
                out.push(serde_json::to_string_pretty(&self.session.snapshot())?);
            }
            Intent::Help => out.push(HELP.to_string()),
            Intent::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn option_count(&self) -> usize {
        self.session
            .quiz_run()
            .and_then(|run| run.current_question())
            .map_or(0, |question| question.options().len())
    }

    fn incorrect_message(&self) -> String {
        let correct = self
            .session
            .quiz_run()
            .and_then(|run| run.current_question())
            .and_then(|q| q.options().get(q.correct_answer()).cloned())
            .unwrap_or_default();
        format!("Not quite. The correct answer is: {correct}")
    }

    fn describe_tally_step(&self, step: &TallyStep, out: &mut Vec<String>) {
        match step {
            TallyStep::NotRevealed => out.push("Reveal the answer first.".to_string()),
            TallyStep::AlreadyComplete => out.push("Review already complete.".to_string()),
            TallyStep::Advanced { .. } | TallyStep::Completed(_) => self.describe_screen(out),
        }
    }

    fn describe_screen(&self, out: &mut Vec<String>) {
        let snapshot = self.session.snapshot();
        out.push(format!("[{}]", snapshot.screen));
        if let Some(fallback) = &snapshot.fallback {
            out.push(format!("Nothing to show here: {fallback}"));
            return;
        }
        let user = &snapshot.user;
        match snapshot.screen {
            Screen::Home | Screen::Profile => {
                out.push(format!(
                    "{}: level {} ({} XP, {}% to next), streak {} days",
                    user.name,
                    user.level,
                    user.xp,
                    user.level_progress.percent,
                    user.streak
                ));
                out.push(format!("Goal: {}", user.selected_goal));
                if snapshot.screen == Screen::Profile {
                    out.push(format!("Badges: {}", user.badges.join(", ")));
                    out.push(format!(
                        "Topics completed: {} ({}%)",
                        user.completed_topics.join(", "),
                        user.completion_rate
                    ));
                }
            }
            Screen::Lesson => {
                if let Some(lesson) = &snapshot.lesson {
                    out.push(format!("{} ({})", lesson.title, lesson.topic));
                    out.push(lesson.content.clone());
                    for (i, step) in lesson.steps.iter().enumerate() {
                        out.push(format!("  {}. {step}", i + 1));
                    }
                }
            }
            Screen::Quiz => {
                if let Some(quiz) = &snapshot.quiz {
                    out.push(format!(
                        "Question {} of {} ({}%), score {}",
                        quiz.progress.position,
                        quiz.progress.total,
                        quiz.progress.percent,
                        quiz.progress.score
                    ));
                    out.push(quiz.question.clone());
                    for (i, option) in quiz.options.iter().enumerate() {
                        out.push(format!("  {}. {option}", i + 1));
                    }
                }
            }
            Screen::LessonComplete => {
                if let Some(reward) = &snapshot.last_reward {
                    out.push(format!(
                        "Lesson complete! +{} XP (level {})",
                        reward.xp_gained, reward.level
                    ));
                    for badge in &reward.new_badges {
                        out.push(format!("New badge: {badge}"));
                    }
                }
            }
            Screen::Reinforcement => {
                if let Some(view) = &snapshot.reinforcement {
                    if let Some(summary) = &view.summary {
                        out.push(summary.message.clone());
                        out.push(summary.next_review.clone());
                    } else {
                        out.push(format!(
                            "Card {} of {} [{}]: {}",
                            view.progress.position,
                            view.progress.total,
                            view.category,
                            view.question
                        ));
                        if let Some(answer) = &view.answer {
                            out.push(format!("Answer: {answer}"));
                        }
                    }
                }
            }
            Screen::Welcome
            | Screen::SignIn
            | Screen::ChooseGoal
            | Screen::Leaderboard
            | Screen::Admin => {}
        }
    }
}
