use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown screen: {0}")]
pub struct ParseScreenError(pub String);

/// Every screen the session can show.
///
/// Matches over `Screen` are exhaustive on purpose: adding a variant must
/// touch every consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    #[default]
    Welcome,
    SignIn,
    ChooseGoal,
    Home,
    Lesson,
    Quiz,
    LessonComplete,
    Reinforcement,
    Profile,
    Leaderboard,
    Admin,
}

impl Screen {
    pub const ALL: [Screen; 11] = [
        Screen::Welcome,
        Screen::SignIn,
        Screen::ChooseGoal,
        Screen::Home,
        Screen::Lesson,
        Screen::Quiz,
        Screen::LessonComplete,
        Screen::Reinforcement,
        Screen::Profile,
        Screen::Leaderboard,
        Screen::Admin,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Welcome => "welcome",
            Screen::SignIn => "signin",
            Screen::ChooseGoal => "choose-goal",
            Screen::Home => "home",
            Screen::Lesson => "lesson",
            Screen::Quiz => "quiz",
            Screen::LessonComplete => "lesson-complete",
            Screen::Reinforcement => "reinforcement",
            Screen::Profile => "profile",
            Screen::Leaderboard => "leaderboard",
            Screen::Admin => "admin",
        }
    }

    /// Screens reachable from `self` through the app's own buttons.
    ///
    /// Navigation is never restricted to this list; it documents the expected
    /// flow so callers can flag unusual jumps.
    #[must_use]
    pub fn successors(self) -> &'static [Screen] {
        match self {
            Screen::Welcome => &[Screen::SignIn, Screen::ChooseGoal],
            Screen::SignIn => &[Screen::Welcome, Screen::ChooseGoal, Screen::Home],
            Screen::ChooseGoal => &[Screen::Welcome, Screen::Home],
            Screen::Home => &[
                Screen::Lesson,
                Screen::Quiz,
                Screen::Profile,
                Screen::Leaderboard,
                Screen::Admin,
                Screen::ChooseGoal,
            ],
            Screen::Lesson => &[Screen::Quiz, Screen::Home],
            Screen::Quiz => &[Screen::LessonComplete, Screen::Home],
            Screen::LessonComplete => &[Screen::Home, Screen::Reinforcement],
            Screen::Reinforcement => &[Screen::Home, Screen::Reinforcement],
            Screen::Profile | Screen::Leaderboard | Screen::Admin => &[Screen::Home],
        }
    }

    #[must_use]
    pub fn is_expected_transition(self, to: Screen) -> bool {
        self == to || self.successors().contains(&to)
    }

    /// Screens that render the active lesson or quiz and need a guard when none is set.
    #[must_use]
    pub fn needs_active_content(self) -> bool {
        matches!(self, Screen::Lesson | Screen::Quiz)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = ParseScreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| ParseScreenError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_screen_parses_from_its_name() {
        for screen in Screen::ALL {
            assert_eq!(screen.as_str().parse::<Screen>().unwrap(), screen);
        }
        assert!("settings".parse::<Screen>().is_err());
    }

    #[test]
    fn welcome_is_initial() {
        assert_eq!(Screen::default(), Screen::Welcome);
    }

    #[test]
    fn documented_flow_edges() {
        assert!(Screen::Welcome.is_expected_transition(Screen::ChooseGoal));
        assert!(Screen::Quiz.is_expected_transition(Screen::LessonComplete));
        assert!(Screen::Reinforcement.is_expected_transition(Screen::Reinforcement));
        assert!(!Screen::Welcome.is_expected_transition(Screen::Quiz));
        assert!(!Screen::Profile.is_expected_transition(Screen::Admin));
    }

    #[test]
    fn every_screen_has_an_exit() {
        for screen in Screen::ALL {
            assert!(!screen.successors().is_empty(), "{screen} is terminal");
        }
    }
}
