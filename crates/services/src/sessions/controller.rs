use std::sync::Arc;

use serde::Serialize;

use learn_core::Clock;
use learn_core::model::{
    EngineSettings, FlashcardDeck, Goal, Lesson, Quiz, QuizOutcome, RunId, Screen, User,
    UserUpdate, XpChange,
};
use learn_core::progression::{RewardPolicy, completion_rate};

use super::quiz::{AnswerResult, QuizRun, QuizStep};
use super::reinforcement::{Recall, ReinforcementTally, TallyStep};
use super::view::SessionSnapshot;
use crate::error::SessionError;

//
// ─── REWARD RECORD ─────────────────────────────────────────────────────────────
//

/// What the lesson-complete transition actually granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantedReward {
    pub run_id: RunId,
    /// Quiz score plus the completion bonus.
    pub xp_gained: u64,
    pub bonus_xp: u32,
    pub new_badges: Vec<String>,
    pub topic_completed: Option<String>,
    pub xp: u64,
    pub level: u64,
    pub leveled_up: bool,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns the session: the active screen, the user's ledger, and whichever
/// lesson, quiz run, or reinforcement pass is in flight.
///
/// Every intent runs to completion synchronously. Failing intents return
/// before touching any state.
pub struct SessionController {
    clock: Clock,
    settings: EngineSettings,
    reward_policy: Arc<dyn RewardPolicy>,
    screen: Screen,
    user: User,
    lesson: Option<Lesson>,
    quiz: Option<QuizRun>,
    reinforcement: Option<ReinforcementTally>,
    last_outcome: Option<QuizOutcome>,
    rewarded_run: Option<RunId>,
    last_reward: Option<GrantedReward>,
}

impl SessionController {
    /// Start on the welcome screen with the settings' fixed reward policy.
    #[must_use]
    pub fn new(user: User, settings: EngineSettings, clock: Clock) -> Self {
        let reward_policy: Arc<dyn RewardPolicy> = Arc::new(settings.reward_policy());
        Self {
            clock,
            settings,
            reward_policy,
            screen: Screen::default(),
            user,
            lesson: None,
            quiz: None,
            reinforcement: None,
            last_outcome: None,
            rewarded_run: None,
            last_reward: None,
        }
    }

    #[must_use]
    pub fn with_reward_policy(mut self, policy: Arc<dyn RewardPolicy>) -> Self {
        self.reward_policy = policy;
        self
    }

    // ─── accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn lesson(&self) -> Option<&Lesson> {
        self.lesson.as_ref()
    }

    #[must_use]
    pub fn quiz_run(&self) -> Option<&QuizRun> {
        self.quiz.as_ref()
    }

    #[must_use]
    pub fn current_question_index(&self) -> Option<usize> {
        self.quiz.as_ref().map(QuizRun::current_index)
    }

    #[must_use]
    pub fn reinforcement(&self) -> Option<&ReinforcementTally> {
        self.reinforcement.as_ref()
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&QuizOutcome> {
        self.last_outcome.as_ref()
    }

    #[must_use]
    pub fn last_reward(&self) -> Option<&GrantedReward> {
        self.last_reward.as_ref()
    }

    /// Share of all topics the user has completed, for the profile.
    #[must_use]
    pub fn completion_rate(&self) -> u32 {
        completion_rate(
            self.user.completed_topics().len(),
            self.settings.total_topics(),
        )
    }

    /// Check that the active screen has what it needs to render.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveContent` on the lesson or quiz screen
    /// without an active lesson or quiz.
    pub fn guard(&self) -> Result<(), SessionError> {
        let missing = match self.screen {
            Screen::Lesson => self.lesson.is_none(),
            Screen::Quiz => self.quiz.is_none(),
            _ => false,
        };
        if missing {
            return Err(SessionError::NoActiveContent {
                screen: self.screen,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    // ─── navigation ────────────────────────────────────────────────────────────

    /// Show `screen`. Always succeeds and leaves every other piece of state alone.
    ///
    /// Entering the lesson-complete screen grants the completion reward for the
    /// last finished quiz run, once per run.
    pub fn navigate(&mut self, screen: Screen) {
        let from = self.screen;
        if !from.is_expected_transition(screen) {
            tracing::warn!(%from, to = %screen, "navigating outside the usual flow");
        }
        self.screen = screen;
        tracing::debug!(%from, to = %screen, "navigate");

        if screen == Screen::LessonComplete {
            self.grant_lesson_reward();
        }
        if let Err(err) = self.guard() {
            tracing::warn!(%err, "screen will render its fallback");
        }
    }

    pub fn start_lesson(&mut self, lesson: Lesson) {
        tracing::debug!(lesson_id = %lesson.id(), "start lesson");
        self.lesson = Some(lesson);
        self.navigate(Screen::Lesson);
    }

    /// Begin a fresh run of `quiz` at its first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuiz` if the quiz has no questions.
    pub fn start_quiz(&mut self, quiz: Quiz) -> Result<RunId, SessionError> {
        let run = QuizRun::new(quiz, self.clock.now())?;
        let run_id = run.run_id();
        tracing::debug!(quiz_id = %run.quiz().id(), %run_id, "start quiz");
        self.quiz = Some(run);
        self.navigate(Screen::Quiz);
        Ok(run_id)
    }

    /// Record the learner's choice for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveContent` without an active quiz and
    /// `SessionError::InvalidOption` for an index outside the options.
    pub fn select_answer(&mut self, index: usize) -> Result<AnswerResult, SessionError> {
        let run = self.active_quiz_mut()?;
        let result = run.select_answer(index)?;
        match result {
            AnswerResult::Recorded(record) => tracing::debug!(
                index,
                correct = record.is_correct,
                score = run.score(),
                "answer recorded"
            ),
            AnswerResult::AlreadyAnswered(_) => {
                tracing::debug!(index, "question already answered; ignoring");
            }
        }
        Ok(result)
    }

    /// True when the active quiz sits on its last question.
    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.quiz.as_ref().is_some_and(QuizRun::is_last_question)
    }

    /// Step to the next question without finishing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRangeIndex` on the last question and
    /// `SessionError::NoActiveContent` without an active quiz.
    pub fn advance_question(&mut self) -> Result<usize, SessionError> {
        let index = self.active_quiz_mut()?.advance_question()?;
        tracing::debug!(index, "advance question");
        Ok(index)
    }

    /// Advance, or on the last question credit the score and move to the
    /// lesson-complete screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveContent` without an active quiz.
    /// An unanswered current question yields `QuizStep::Unanswered`.
    pub fn complete_or_advance(&mut self) -> Result<QuizStep, SessionError> {
        let now = self.clock.now();
        let step = self.active_quiz_mut()?.complete_or_advance(now);
        match &step {
            QuizStep::Unanswered { index } => {
                tracing::debug!(index, "current question not answered yet");
            }
            QuizStep::Advanced { index } => tracing::debug!(index, "advance question"),
            QuizStep::Completed(outcome) => {
                let change = self.user.add_xp(outcome.score);
                tracing::info!(
                    quiz_id = %outcome.quiz_id,
                    score = outcome.score,
                    correct = outcome.correct,
                    total = outcome.total,
                    xp = change.xp,
                    "quiz completed"
                );
                log_level_up(&change);
                self.last_outcome = Some(outcome.clone());
                self.navigate(Screen::LessonComplete);
            }
            QuizStep::AlreadyCompleted => tracing::debug!("quiz run already completed"),
        }
        Ok(step)
    }

    // ─── user ledger ───────────────────────────────────────────────────────────

    pub fn update_user(&mut self, update: UserUpdate) {
        if update.is_empty() {
            return;
        }
        tracing::debug!(?update, "update user");
        self.user.apply(update);
    }

    pub fn add_xp(&mut self, amount: u32) -> XpChange {
        let change = self.user.add_xp(amount);
        tracing::debug!(amount, xp = change.xp, "add xp");
        log_level_up(&change);
        change
    }

    /// Make `goal` the user's active goal and head home.
    pub fn choose_goal(&mut self, goal: &Goal) {
        self.update_user(UserUpdate::selected_goal(goal.title()));
        self.navigate(Screen::Home);
    }

    /// Sign-in always succeeds; a non-blank name replaces the display name.
    pub fn sign_in(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.update_user(UserUpdate {
                name: Some(name.to_string()),
                ..UserUpdate::default()
            });
        }
        tracing::info!(user = self.user.name(), "signed in");
        self.navigate(Screen::Home);
    }

    // ─── reinforcement ─────────────────────────────────────────────────────────

    pub fn start_reinforcement(&mut self, deck: FlashcardDeck) {
        tracing::debug!(deck_id = %deck.id(), cards = deck.len(), "start reinforcement");
        self.reinforcement = Some(ReinforcementTally::new(deck, self.clock.now()));
        self.navigate(Screen::Reinforcement);
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveContent` without an active deck.
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        self.active_tally_mut()?.reveal();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveContent` without an active deck.
    pub fn mark_remembered(&mut self) -> Result<TallyStep, SessionError> {
        self.mark(Recall::Remembered)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveContent` without an active deck.
    pub fn mark_forgotten(&mut self) -> Result<TallyStep, SessionError> {
        self.mark(Recall::Forgotten)
    }

    fn mark(&mut self, recall: Recall) -> Result<TallyStep, SessionError> {
        let now = self.clock.now();
        let step = self.active_tally_mut()?.mark(recall, now);
        match &step {
            TallyStep::Completed(summary) => tracing::info!(
                remembered = summary.remembered,
                forgotten = summary.forgotten,
                "reinforcement complete"
            ),
            TallyStep::NotRevealed => tracing::debug!(?recall, "card not revealed; ignoring"),
            _ => tracing::debug!(?recall, ?step, "card marked"),
        }
        Ok(step)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveContent` without an active deck.
    pub fn go_back(&mut self) -> Result<usize, SessionError> {
        let tally = self.active_tally_mut()?;
        tally.go_back();
        Ok(tally.current_index())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveContent` without an active deck.
    pub fn go_forward(&mut self) -> Result<usize, SessionError> {
        let tally = self.active_tally_mut()?;
        tally.go_forward();
        Ok(tally.current_index())
    }

    /// Restart the reinforcement pass ("review again").
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveContent` without an active deck.
    pub fn reset_reinforcement(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.active_tally_mut()?.reset(now);
        tracing::debug!("reinforcement reset");
        Ok(())
    }

    // ─── internals ─────────────────────────────────────────────────────────────

    fn active_quiz_mut(&mut self) -> Result<&mut QuizRun, SessionError> {
        self.quiz.as_mut().ok_or(SessionError::NoActiveContent {
            screen: Screen::Quiz,
        })
    }

    fn active_tally_mut(&mut self) -> Result<&mut ReinforcementTally, SessionError> {
        self.reinforcement
            .as_mut()
            .ok_or(SessionError::NoActiveContent {
                screen: Screen::Reinforcement,
            })
    }

    /// Apply the completion reward for the last finished run, at most once per run.
    fn grant_lesson_reward(&mut self) {
        let Some(outcome) = self.last_outcome.as_ref() else {
            tracing::debug!("no finished quiz run; nothing to reward");
            return;
        };
        if self.rewarded_run == Some(outcome.run_id) {
            tracing::debug!(run_id = %outcome.run_id, "reward already granted");
            return;
        }

        let reward = self
            .reward_policy
            .lesson_complete_reward(outcome, &self.user);
        let run_id = outcome.run_id;
        let score = outcome.score;

        let change = self.user.add_xp(reward.bonus_xp);
        let new_badges: Vec<String> = reward
            .badges
            .into_iter()
            .filter(|badge| self.user.award_badge(badge.clone()))
            .collect();
        // Only the lesson the quiz belongs to counts as completed.
        let topic_completed = self
            .lesson
            .as_ref()
            .filter(|lesson| *lesson.id() == outcome.lesson_id)
            .map(|lesson| lesson.topic().to_string())
            .filter(|topic| self.user.mark_topic_completed(topic.clone()));

        self.rewarded_run = Some(run_id);
        tracing::info!(
            %run_id,
            bonus_xp = reward.bonus_xp,
            badges = ?new_badges,
            xp = change.xp,
            "lesson reward granted"
        );
        log_level_up(&change);

        self.last_reward = Some(GrantedReward {
            run_id,
            xp_gained: u64::from(score) + u64::from(reward.bonus_xp),
            bonus_xp: reward.bonus_xp,
            new_badges,
            topic_completed,
            xp: change.xp,
            level: change.level,
            leveled_up: change.leveled_up(),
        });
    }
}

fn log_level_up(change: &XpChange) {
    if change.leveled_up() {
        tracing::info!(
            from = change.previous_level,
            to = change.level,
            "level up"
        );
    }
}
