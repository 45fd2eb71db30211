use thiserror::Error;

use crate::progression::FixedReward;

pub const DEFAULT_LESSON_COMPLETE_BONUS: u32 = 30;
pub const DEFAULT_REWARD_BADGE: &str = "Budget Beginner";
pub const DEFAULT_TOTAL_TOPICS: u32 = 4;

/// Tunables for the session engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineSettings {
    lesson_complete_bonus: u32,
    reward_badge: String,
    total_topics: u32,
}

#[derive(Clone, Debug, Default)]
pub struct EngineSettingsDraft {
    pub lesson_complete_bonus: Option<u32>,
    pub reward_badge: Option<String>,
    pub total_topics: Option<u32>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("reward badge name cannot be empty")]
    EmptyBadge,
    #[error("total topics must be > 0")]
    InvalidTotalTopics,
}

impl EngineSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft, filling unset fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the badge is blank or the topic count is zero.
    pub fn validate(self) -> Result<EngineSettings, SettingsError> {
        let reward_badge = match self.reward_badge {
            Some(badge) => {
                let trimmed = badge.trim();
                if trimmed.is_empty() {
                    return Err(SettingsError::EmptyBadge);
                }
                trimmed.to_string()
            }
            None => DEFAULT_REWARD_BADGE.to_string(),
        };
        let total_topics = self.total_topics.unwrap_or(DEFAULT_TOTAL_TOPICS);
        if total_topics == 0 {
            return Err(SettingsError::InvalidTotalTopics);
        }

        Ok(EngineSettings {
            lesson_complete_bonus: self
                .lesson_complete_bonus
                .unwrap_or(DEFAULT_LESSON_COMPLETE_BONUS),
            reward_badge,
            total_topics,
        })
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            lesson_complete_bonus: DEFAULT_LESSON_COMPLETE_BONUS,
            reward_badge: DEFAULT_REWARD_BADGE.to_string(),
            total_topics: DEFAULT_TOTAL_TOPICS,
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn lesson_complete_bonus(&self) -> u32 {
        self.lesson_complete_bonus
    }

    #[must_use]
    pub fn reward_badge(&self) -> &str {
        &self.reward_badge
    }

    /// Denominator for the profile completion rate.
    #[must_use]
    pub fn total_topics(&self) -> u32 {
        self.total_topics
    }

    #[must_use]
    pub fn reward_policy(&self) -> FixedReward {
        FixedReward::new(self.lesson_complete_bonus, self.reward_badge.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_yields_defaults() {
        let settings = EngineSettingsDraft::new().validate().unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.lesson_complete_bonus(), 30);
        assert_eq!(settings.reward_badge(), "Budget Beginner");
    }

    #[test]
    fn blank_badge_is_rejected() {
        let draft = EngineSettingsDraft {
            reward_badge: Some("  ".into()),
            ..EngineSettingsDraft::default()
        };
        assert_eq!(draft.validate().unwrap_err(), SettingsError::EmptyBadge);
    }

    #[test]
    fn zero_topics_is_rejected() {
        let draft = EngineSettingsDraft {
            total_topics: Some(0),
            ..EngineSettingsDraft::default()
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            SettingsError::InvalidTotalTopics
        );
    }
}
