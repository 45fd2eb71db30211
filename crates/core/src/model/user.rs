use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progression::{LevelProgress, level_for_xp, level_progress};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("user name cannot be empty")]
    EmptyName,
}

//
// ─── USER DRAFT ────────────────────────────────────────────────────────────────
//

/// Initial values for the process-lifetime user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub xp: u64,
    pub streak: u32,
    pub badges: Vec<String>,
    pub selected_goal: String,
    pub completed_topics: Vec<String>,
}

impl UserDraft {
    /// The profile a fresh process starts with.
    #[must_use]
    pub fn starter() -> Self {
        Self {
            name: "Jainil".into(),
            xp: 1250,
            streak: 12,
            badges: vec![
                "Budget Beginner".into(),
                "Quick Learner".into(),
                "Streak Master".into(),
            ],
            selected_goal: "Personal Finance".into(),
            completed_topics: vec!["Introduction to Budgeting".into()],
        }
    }

    /// Validate the draft. Duplicate badges and topics collapse to their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyName` if the name is blank.
    pub fn validate(self) -> Result<User, UserError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(UserError::EmptyName);
        }
        let mut user = User {
            name,
            xp: self.xp,
            streak: self.streak,
            badges: Vec::new(),
            selected_goal: self.selected_goal,
            completed_topics: Vec::new(),
        };
        for badge in self.badges {
            user.award_badge(badge);
        }
        for topic in self.completed_topics {
            user.mark_topic_completed(topic);
        }
        Ok(user)
    }
}

/// Partial update for the user's non-derived fields.
///
/// XP, badges, and completed topics only move through the ledger operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub streak: Option<u32>,
    pub selected_goal: Option<String>,
}

impl UserUpdate {
    #[must_use]
    pub fn selected_goal(goal: impl Into<String>) -> Self {
        Self {
            selected_goal: Some(goal.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.streak.is_none() && self.selected_goal.is_none()
    }
}

//
// ─── USER / PROGRESSION LEDGER ─────────────────────────────────────────────────
//

/// XP change applied by [`User::add_xp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpChange {
    pub previous_xp: u64,
    pub xp: u64,
    pub previous_level: u64,
    pub level: u64,
}

impl XpChange {
    #[must_use]
    pub fn leveled_up(&self) -> bool {
        self.level > self.previous_level
    }
}

/// The learner's progression ledger.
///
/// `level` is not stored; it is always `floor(xp / 500) + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
    xp: u64,
    streak: u32,
    badges: Vec<String>,
    selected_goal: String,
    completed_topics: Vec<String>,
}

impl User {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn xp(&self) -> u64 {
        self.xp
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn level(&self) -> u64 {
        level_for_xp(self.xp)
    }

    #[must_use]
    pub fn level_progress(&self) -> LevelProgress {
        level_progress(self.xp)
    }

    /// Badges in the order they were first awarded.
    #[must_use]
    pub fn badges(&self) -> &[String] {
        &self.badges
    }

    #[must_use]
    pub fn has_badge(&self, name: &str) -> bool {
        self.badges.iter().any(|b| b == name)
    }

    #[must_use]
    pub fn selected_goal(&self) -> &str {
        &self.selected_goal
    }

    #[must_use]
    pub fn completed_topics(&self) -> &[String] {
        &self.completed_topics
    }

    /// Add `amount` XP. Saturates instead of wrapping.
    pub fn add_xp(&mut self, amount: u32) -> XpChange {
        let previous_xp = self.xp;
        let previous_level = self.level();
        self.xp = self.xp.saturating_add(u64::from(amount));
        XpChange {
            previous_xp,
            xp: self.xp,
            previous_level,
            level: self.level(),
        }
    }

    /// Returns true if the badge was newly added.
    pub fn award_badge(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.has_badge(&name) {
            return false;
        }
        self.badges.push(name);
        true
    }

    /// Returns true if the topic was newly appended.
    pub fn mark_topic_completed(&mut self, topic: impl Into<String>) -> bool {
        let topic = topic.into();
        if self.completed_topics.contains(&topic) {
            return false;
        }
        self.completed_topics.push(topic);
        true
    }

    /// Merge a partial update. A blank name is ignored so the identity key never goes empty.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(name) = update.name {
            let name = name.trim();
            if !name.is_empty() {
                self.name = name.to_string();
            }
        }
        if let Some(streak) = update.streak {
            self.streak = streak;
        }
        if let Some(goal) = update.selected_goal {
            self.selected_goal = goal;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn starter() -> User {
        UserDraft::starter().validate().unwrap()
    }

    #[test]
    fn starter_profile_is_level_three() {
        let user = starter();
        assert_eq!(user.xp(), 1250);
        assert_eq!(user.level(), 3);
        assert_eq!(user.badges().len(), 3);
    }

    #[test]
    fn add_xp_recomputes_level() {
        let mut user = starter();
        let change = user.add_xp(30);
        assert_eq!(user.xp(), 1280);
        assert_eq!(user.level(), 3);
        assert!(!change.leveled_up());

        let change = user.add_xp(220);
        assert_eq!(user.xp(), 1500);
        assert_eq!(change.previous_level, 3);
        assert_eq!(change.level, 4);
        assert!(change.leveled_up());
    }

    #[test]
    fn add_xp_saturates() {
        let mut user = UserDraft {
            xp: u64::MAX - 5,
            ..UserDraft::starter()
        }
        .validate()
        .unwrap();
        user.add_xp(100);
        assert_eq!(user.xp(), u64::MAX);
    }

    #[test]
    fn awarding_same_badge_twice_is_idempotent() {
        let mut user = starter();
        assert!(user.award_badge("Quiz Whiz"));
        let once = user.badges().to_vec();
        assert!(!user.award_badge("Quiz Whiz"));
        assert_eq!(user.badges(), once.as_slice());
    }

    #[test]
    fn completing_same_topic_twice_is_idempotent() {
        let mut user = starter();
        assert!(user.mark_topic_completed("Personal Finance"));
        assert!(!user.mark_topic_completed("Personal Finance"));
        assert_eq!(
            user.completed_topics(),
            ["Introduction to Budgeting", "Personal Finance"]
        );
    }

    #[test]
    fn draft_dedupes_and_requires_name() {
        let draft = UserDraft {
            badges: vec!["A".into(), "A".into()],
            ..UserDraft::starter()
        };
        assert_eq!(draft.validate().unwrap().badges(), ["A"]);

        let blank = UserDraft {
            name: "  ".into(),
            ..UserDraft::starter()
        };
        assert_eq!(blank.validate().unwrap_err(), UserError::EmptyName);
    }

    #[test]
    fn update_merges_only_given_fields() {
        let mut user = starter();
        user.apply(UserUpdate::selected_goal("Python Basics"));
        assert_eq!(user.selected_goal(), "Python Basics");
        assert_eq!(user.name(), "Jainil");
        assert_eq!(user.streak(), 12);

        user.apply(UserUpdate {
            name: Some("   ".into()),
            streak: Some(13),
            selected_goal: None,
        });
        assert_eq!(user.name(), "Jainil");
        assert_eq!(user.streak(), 13);
        assert_eq!(user.xp(), 1250);
    }

    proptest! {
        #[test]
        fn level_invariant_holds_after_any_gains(
            xp0 in 0_u64..5_000_000,
            gains in proptest::collection::vec(0_u32..10_000, 0..20),
        ) {
            let mut user = UserDraft { xp: xp0, ..UserDraft::starter() }.validate().unwrap();
            for gain in gains {
                user.add_xp(gain);
                prop_assert_eq!(user.level(), user.xp() / 500 + 1);
            }
        }
    }
}
