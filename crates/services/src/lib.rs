#![forbid(unsafe_code)]

pub mod catalog_service;
pub mod error;
pub mod sessions;

pub use learn_core::Clock;
pub use sessions as session;

pub use catalog_service::CatalogService;
pub use error::{CatalogError, SessionError};

pub use sessions::{
    AnswerRecord, AnswerResult, GrantedReward, QuizRun, QuizStep, Recall, ReinforcementTally,
    SessionController, SessionSnapshot, TallyStep, TallySummary,
};
