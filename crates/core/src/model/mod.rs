mod flashcard;
mod goal;
mod ids;
mod leaderboard;
mod lesson;
mod quiz;
mod screen;
mod settings;
mod user;
mod validation;

pub use flashcard::{Flashcard, FlashcardDeck, NEXT_REVIEW_MESSAGE};
pub use goal::Goal;
pub use ids::{DeckId, GoalId, LessonId, ParseIdError, QuestionId, QuizId, RunId};
pub use leaderboard::{LeaderboardEntry, LeaderboardScope};
pub use lesson::{Lesson, LessonDraft};
pub use quiz::{Question, QuestionDraft, Quiz, QuizDraft, QuizOutcome};
pub use screen::{ParseScreenError, Screen};
pub use settings::{
    DEFAULT_LESSON_COMPLETE_BONUS, DEFAULT_REWARD_BADGE, DEFAULT_TOTAL_TOPICS, EngineSettings,
    EngineSettingsDraft, SettingsError,
};
pub use user::{User, UserDraft, UserError, UserUpdate, XpChange};
pub use validation::ContentError;
