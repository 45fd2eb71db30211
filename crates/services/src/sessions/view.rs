use serde::Serialize;

use learn_core::model::{DeckId, LessonId, QuizId, QuizOutcome, Screen};
use learn_core::progression::LevelProgress;

use super::controller::{GrantedReward, SessionController};
use super::progress::{QuizProgress, TallyProgress};
use super::quiz::AnswerRecord;
use super::reinforcement::TallySummary;

/// Everything a presentation layer needs to re-render after an intent.
///
/// Owned and serializable; no pre-formatted strings except the tally message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub screen: Screen,
    /// Set when the screen lacks the content it renders.
    pub fallback: Option<String>,
    pub user: UserView,
    pub lesson: Option<LessonView>,
    pub quiz: Option<QuizView>,
    pub reinforcement: Option<ReinforcementView>,
    pub last_outcome: Option<QuizOutcome>,
    pub last_reward: Option<GrantedReward>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub name: String,
    pub xp: u64,
    pub level: u64,
    pub streak: u32,
    pub level_progress: LevelProgress,
    pub badges: Vec<String>,
    pub selected_goal: String,
    pub completed_topics: Vec<String>,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonView {
    pub id: LessonId,
    pub title: String,
    pub topic: String,
    pub content: String,
    pub steps: Vec<String>,
    pub xp_reward: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    pub quiz_id: QuizId,
    pub question: String,
    pub options: Vec<String>,
    pub xp_reward: u32,
    pub answer: Option<AnswerRecord>,
    /// Revealed once the question is answered.
    pub correct_answer: Option<usize>,
    pub is_last_question: bool,
    pub progress: QuizProgress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReinforcementView {
    pub deck_id: DeckId,
    pub question: String,
    pub category: String,
    /// Only present after the card is revealed.
    pub answer: Option<String>,
    pub progress: TallyProgress,
    pub summary: Option<TallySummaryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallySummaryView {
    pub remembered: usize,
    pub forgotten: usize,
    pub total_cards: usize,
    pub message: String,
    pub next_review: String,
}

impl From<&TallySummary> for TallySummaryView {
    fn from(summary: &TallySummary) -> Self {
        Self {
            remembered: summary.remembered,
            forgotten: summary.forgotten,
            total_cards: summary.total_cards,
            message: summary.message(),
            next_review: summary.next_review().to_string(),
        }
    }
}

impl SessionSnapshot {
    pub(crate) fn capture(session: &SessionController) -> Self {
        let user = session.user();
        let user = UserView {
            name: user.name().to_string(),
            xp: user.xp(),
            level: user.level(),
            streak: user.streak(),
            level_progress: user.level_progress(),
            badges: user.badges().to_vec(),
            selected_goal: user.selected_goal().to_string(),
            completed_topics: user.completed_topics().to_vec(),
            completion_rate: session.completion_rate(),
        };

        let lesson = session.lesson().map(|lesson| LessonView {
            id: lesson.id().clone(),
            title: lesson.title().to_string(),
            topic: lesson.topic().to_string(),
            content: lesson.content().to_string(),
            steps: lesson.steps().to_vec(),
            xp_reward: lesson.xp_reward(),
        });

        let quiz = session.quiz_run().and_then(|run| {
            let question = run.current_question()?;
            let answer = run.answer();
            Some(QuizView {
                quiz_id: run.quiz().id().clone(),
                question: question.question().to_string(),
                options: question.options().to_vec(),
                xp_reward: question.xp_reward(),
                answer,
                correct_answer: answer.map(|_| question.correct_answer()),
                is_last_question: run.is_last_question(),
                progress: run.progress(),
            })
        });

        let reinforcement = session.reinforcement().and_then(|tally| {
            let card = tally.current_card()?;
            Some(ReinforcementView {
                deck_id: tally.deck().id().clone(),
                question: card.question().to_string(),
                category: card.category().to_string(),
                answer: tally.is_revealed().then(|| card.answer().to_string()),
                progress: tally.progress(),
                summary: tally.summary().map(TallySummaryView::from),
            })
        });

        Self {
            screen: session.screen(),
            fallback: session.guard().err().map(|err| err.to_string()),
            user,
            lesson,
            quiz,
            reinforcement,
            last_outcome: session.last_outcome().cloned(),
            last_reward: session.last_reward().cloned(),
        }
    }
}
