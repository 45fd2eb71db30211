//! XP economy: the level banding formula, derived progress views, and the
//! reward granted when a lesson is completed.

use serde::Serialize;

use crate::model::{QuizOutcome, User};

/// XP needed to climb one level.
pub const XP_PER_LEVEL: u64 = 500;

/// Level for a given XP total: `floor(xp / 500) + 1`.
#[must_use]
pub fn level_for_xp(xp: u64) -> u64 {
    xp / XP_PER_LEVEL + 1
}

/// Where the user sits inside their current level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub level: u64,
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
    /// 0..=99, the share of the current band already earned.
    pub percent: u8,
}

#[must_use]
pub fn level_progress(xp: u64) -> LevelProgress {
    let xp_into_level = xp % XP_PER_LEVEL;
    let percent = u8::try_from(xp_into_level * 100 / XP_PER_LEVEL).unwrap_or(u8::MAX);
    LevelProgress {
        level: level_for_xp(xp),
        xp_into_level,
        xp_to_next_level: XP_PER_LEVEL - xp_into_level,
        percent,
    }
}

/// Percentage of `total_topics` already completed, rounded to the nearest whole number.
///
/// Returns 0 when `total_topics` is 0.
#[must_use]
pub fn completion_rate(completed: usize, total_topics: u32) -> u32 {
    if total_topics == 0 {
        return 0;
    }
    let pct = completed as f64 / f64::from(total_topics) * 100.0;
    pct.round() as u32
}

//
// ─── REWARDS ───────────────────────────────────────────────────────────────────
//

/// What completing a lesson grants on top of the quiz score.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Reward {
    pub bonus_xp: u32,
    pub badges: Vec<String>,
}

/// Decides the lesson-complete reward.
pub trait RewardPolicy: Send + Sync {
    fn lesson_complete_reward(&self, outcome: &QuizOutcome, user: &User) -> Reward;
}

/// Grants the same bonus and badge for every completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedReward {
    bonus_xp: u32,
    badge: String,
}

impl FixedReward {
    #[must_use]
    pub fn new(bonus_xp: u32, badge: impl Into<String>) -> Self {
        Self {
            bonus_xp,
            badge: badge.into(),
        }
    }
}

impl RewardPolicy for FixedReward {
    fn lesson_complete_reward(&self, _outcome: &QuizOutcome, _user: &User) -> Reward {
        Reward {
            bonus_xp: self.bonus_xp,
            badges: vec![self.badge.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn level_bands() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(499), 1);
        assert_eq!(level_for_xp(500), 2);
        assert_eq!(level_for_xp(1280), 3);
    }

    #[test]
    fn progress_within_band() {
        let p = level_progress(1250);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp_into_level, 250);
        assert_eq!(p.xp_to_next_level, 250);
        assert_eq!(p.percent, 50);
    }

    #[test]
    fn completion_rate_rounds() {
        assert_eq!(completion_rate(1, 4), 25);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(5, 0), 0);
    }

    proptest! {
        #[test]
        fn level_matches_banding_formula(xp0 in 0_u64..10_000_000, delta in 0_u64..1_000_000) {
            let xp = xp0 + delta;
            prop_assert_eq!(level_for_xp(xp), xp / 500 + 1);
            prop_assert!(level_for_xp(xp) >= level_for_xp(xp0));
        }

        #[test]
        fn progress_percent_stays_below_hundred(xp in any::<u64>()) {
            let p = level_progress(xp);
            prop_assert!(p.percent < 100);
            prop_assert_eq!(p.xp_into_level + p.xp_to_next_level, XP_PER_LEVEL);
        }
    }
}
