use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error type for parsing an ID from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// Catalog ids are authored slugs ("budgeting-101"), so they wrap a trimmed,
// non-empty string rather than a numeric key.
macro_rules! slug_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new id from an authored slug.
            ///
            /// # Errors
            ///
            /// Returns `ParseIdError` if the slug is blank.
            pub fn new(value: impl Into<String>) -> Result<Self, ParseIdError> {
                let raw = value.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

slug_id!(
    /// Unique identifier for a Lesson
    LessonId
);
slug_id!(
    /// Unique identifier for a Quiz
    QuizId
);
slug_id!(
    /// Identifier for a Question, unique within its quiz
    QuestionId
);
slug_id!(
    /// Unique identifier for a Flashcard deck
    DeckId
);
slug_id!(
    /// Unique identifier for a learning Goal
    GoalId
);

/// Identifier for one pass through a quiz or flashcard deck.
///
/// Minted by the session controller each time a run starts; it keys the
/// one-shot completion reward so a re-entered screen cannot grant it twice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunId({})", self.0)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(RunId)
            .map_err(|_| ParseIdError { kind: "RunId" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_trims_and_displays() {
        let id = LessonId::new("  budgeting-101 ").unwrap();
        assert_eq!(id.to_string(), "budgeting-101");
        assert_eq!(id.as_str(), "budgeting-101");
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(QuizId::new("   ").is_err());
        assert!("".parse::<DeckId>().is_err());
    }

    #[test]
    fn parse_error_names_the_id_kind() {
        let err = GoalId::new("").unwrap_err();
        assert_eq!(err.to_string(), "failed to parse GoalId from string");
    }

    #[test]
    fn run_ids_are_unique_and_parse_back() {
        let a = RunId::new_v4();
        let b = RunId::new_v4();
        assert_ne!(a, b);
        let parsed: RunId = a.to_string().parse().unwrap();
        assert_eq!(parsed, a);
        assert!("not-a-uuid".parse::<RunId>().is_err());
    }

    #[test]
    fn slug_ids_deserialize_through_validation() {
        let ok: Result<QuestionId, _> = "q1".to_string().try_into();
        assert!(ok.is_ok());
        let bad: Result<QuestionId, _> = " ".to_string().try_into();
        assert!(bad.is_err());
    }
}
