use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which pre-ranked snapshot to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaderboardScope {
    Global,
    Friends,
}

impl LeaderboardScope {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LeaderboardScope::Global => "global",
            LeaderboardScope::Friends => "friends",
        }
    }
}

impl fmt::Display for LeaderboardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "friends" => Ok(Self::Friends),
            other => Err(format!("unknown leaderboard scope: {other}")),
        }
    }
}

/// One row of a leaderboard snapshot.
///
/// `rank` is whatever the snapshot says; it is not recomputed from `xp`,
/// because the source data does not always agree with a descending sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub xp: u64,
    pub streak: u32,
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_round_trips_through_str() {
        for scope in [LeaderboardScope::Global, LeaderboardScope::Friends] {
            assert_eq!(scope.as_str().parse::<LeaderboardScope>().unwrap(), scope);
        }
        assert!("weekly".parse::<LeaderboardScope>().is_err());
    }
}
