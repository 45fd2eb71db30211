use std::str::FromStr;

use learn_core::model::{DeckId, LeaderboardScope, LessonId, ParseIdError, QuizId, Screen};
use thiserror::Error;

/// One line typed at the driver prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Go(Screen),
    SignIn(Option<String>),
    Goals,
    ChooseGoal(String),
    Lessons,
    StartLesson(LessonId),
    /// Without an id, the quiz attached to the active lesson.
    StartQuiz(Option<QuizId>),
    /// 1-based option number as shown to the learner.
    Answer(usize),
    Advance,
    Next,
    Review(Option<DeckId>),
    Reveal,
    Remembered,
    Forgot,
    Back,
    Forward,
    Reset,
    Leaderboard(LeaderboardScope),
    AddXp(u32),
    State,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs an argument")]
    MissingArgument { command: &'static str },
    #[error("not a valid number: {raw}")]
    InvalidNumber { raw: String },
    #[error("unknown screen: {0}")]
    InvalidScreen(String),
    #[error("{0}")]
    InvalidScope(String),
    #[error(transparent)]
    InvalidId(#[from] ParseIdError),
}

pub const HELP: &str = "\
commands:
  go <screen>            show a screen (welcome, signin, choose-goal, home, lesson, quiz,
                         lesson-complete, reinforcement, profile, leaderboard, admin)
  signin [name]          sign in and go home
  goals | goal <id>      list goals / pick one
  lessons | lesson <id>  list lessons / start one
  quiz [id]              start a quiz (default: the active lesson's)
  answer <n>             pick option n on the current question
  advance                skip to the next question
  next                   continue, finishing on the last question
  review [deck]          start a reinforcement pass (default: budgeting-basics)
  reveal | remembered | forgot | back | forward | reset
  leaderboard [global|friends]
  xp <n>                 add XP directly
  state                  print the session snapshot as JSON
  help | quit";

fn number<T: FromStr>(raw: &str) -> Result<T, IntentError> {
    raw.parse().map_err(|_| IntentError::InvalidNumber {
        raw: raw.to_string(),
    })
}

impl Intent {
    /// Parse a prompt line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `IntentError` for unknown commands or malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, IntentError> {
        let line = line.trim();
        let Some((command, rest)) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .or_else(|| (!line.is_empty()).then_some((line, "")))
        else {
            return Ok(None);
        };
        let arg = (!rest.is_empty()).then_some(rest);
        let required = |command: &'static str| arg.ok_or(IntentError::MissingArgument { command });

        let intent = match command.to_ascii_lowercase().as_str() {
            "go" => {
                let raw = required("go")?;
                Intent::Go(
                    raw.parse()
                        .map_err(|_| IntentError::InvalidScreen(raw.to_string()))?,
                )
            }
            "signin" => Intent::SignIn(arg.map(str::to_string)),
            "goals" => Intent::Goals,
            "goal" => Intent::ChooseGoal(required("goal")?.to_string()),
            "lessons" => Intent::Lessons,
            "lesson" => Intent::StartLesson(LessonId::new(required("lesson")?)?),
            "quiz" => Intent::StartQuiz(arg.map(QuizId::new).transpose()?),
            "answer" => Intent::Answer(number(required("answer")?)?),
            "advance" => Intent::Advance,
            "next" => Intent::Next,
            "review" => Intent::Review(arg.map(DeckId::new).transpose()?),
            "reveal" => Intent::Reveal,
            "remembered" => Intent::Remembered,
            "forgot" => Intent::Forgot,
            "back" => Intent::Back,
            "forward" => Intent::Forward,
            "reset" => Intent::Reset,
            "leaderboard" => Intent::Leaderboard(
                arg.unwrap_or("global")
                    .parse()
                    .map_err(IntentError::InvalidScope)?,
            ),
            "xp" => Intent::AddXp(number(required("xp")?)?),
            "state" => Intent::State,
            "help" | "?" => Intent::Help,
            "quit" | "exit" => Intent::Quit,
            other => return Err(IntentError::Unknown(other.to_string())),
        };
        Ok(Some(intent))
    }
}
