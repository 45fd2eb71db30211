use serde::Serialize;

/// Position within an active quiz, useful for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub percent: u32,
    pub score: u32,
    pub answered: bool,
    pub is_complete: bool,
}

/// Position and tallies within a reinforcement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TallyProgress {
    /// 1-based position of the current card.
    pub position: usize,
    pub total: usize,
    pub percent: u32,
    pub remembered: usize,
    pub forgotten: usize,
    pub revealed: bool,
    pub is_complete: bool,
}

/// `position / total` as a whole percent, 0 for an empty sequence.
pub(crate) fn percent_of(position: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (position as f64 / total as f64) * 100.0;
    pct.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_and_handles_empty() {
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(5, 5), 100);
        assert_eq!(percent_of(0, 0), 0);
    }
}
