mod controller;
mod progress;
mod quiz;
mod reinforcement;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{GrantedReward, SessionController};
pub use progress::{QuizProgress, TallyProgress};
pub use quiz::{AnswerRecord, AnswerResult, QuizRun, QuizStep};
pub use reinforcement::{Recall, ReinforcementTally, TallyStep, TallySummary};
pub use view::{
    LessonView, QuizView, ReinforcementView, SessionSnapshot, TallySummaryView, UserView,
};
