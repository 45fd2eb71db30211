use chrono::{DateTime, Utc};
use serde::Serialize;

use learn_core::model::{Flashcard, FlashcardDeck, NEXT_REVIEW_MESSAGE};

use super::progress::{TallyProgress, percent_of};

/// How the learner rated a revealed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recall {
    Remembered,
    Forgotten,
}

/// Final counts of a reinforcement pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallySummary {
    pub remembered: usize,
    pub forgotten: usize,
    pub total_cards: usize,
    pub completed_at: DateTime<Utc>,
}

impl TallySummary {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "You remembered {} out of {} cards",
            self.remembered, self.total_cards
        )
    }

    #[must_use]
    pub fn next_review(&self) -> &'static str {
        NEXT_REVIEW_MESSAGE
    }
}

/// Result of marking a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyStep {
    /// The answer has not been revealed yet; nothing was counted.
    NotRevealed,
    Advanced { index: usize },
    Completed(TallySummary),
    AlreadyComplete,
}

/// Remembered/forgotten pass over a fixed flashcard deck.
///
/// `remembered + forgotten` always equals the number of marks accepted since
/// the last reset. Cursor moves never touch the counters.
#[derive(Debug, Clone)]
pub struct ReinforcementTally {
    deck: FlashcardDeck,
    current: usize,
    revealed: bool,
    remembered: usize,
    forgotten: usize,
    started_at: DateTime<Utc>,
    summary: Option<TallySummary>,
}

impl ReinforcementTally {
    #[must_use]
    pub fn new(deck: FlashcardDeck, started_at: DateTime<Utc>) -> Self {
        Self {
            deck,
            current: 0,
            revealed: false,
            remembered: 0,
            forgotten: 0,
            started_at,
            summary: None,
        }
    }

    #[must_use]
    pub fn deck(&self) -> &FlashcardDeck {
        &self.deck
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Flashcard> {
        self.deck.card(self.current)
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn remembered(&self) -> usize {
        self.remembered
    }

    #[must_use]
    pub fn forgotten(&self) -> usize {
        self.forgotten
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.summary.is_some()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&TallySummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> TallyProgress {
        let total = self.deck.len();
        TallyProgress {
            position: self.current + 1,
            total,
            percent: percent_of(self.current + 1, total),
            remembered: self.remembered,
            forgotten: self.forgotten,
            revealed: self.revealed,
            is_complete: self.is_complete(),
        }
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn mark_remembered(&mut self, now: DateTime<Utc>) -> TallyStep {
        self.mark(Recall::Remembered, now)
    }

    pub fn mark_forgotten(&mut self, now: DateTime<Utc>) -> TallyStep {
        self.mark(Recall::Forgotten, now)
    }

    /// Count the current card and move on, finishing after the last card.
    pub fn mark(&mut self, recall: Recall, now: DateTime<Utc>) -> TallyStep {
        if self.is_complete() {
            return TallyStep::AlreadyComplete;
        }
        if !self.revealed {
            return TallyStep::NotRevealed;
        }

        match recall {
            Recall::Remembered => self.remembered += 1,
            Recall::Forgotten => self.forgotten += 1,
        }
        self.revealed = false;

        if self.current + 1 < self.deck.len() {
            self.current += 1;
            return TallyStep::Advanced {
                index: self.current,
            };
        }

        let summary = TallySummary {
            remembered: self.remembered,
            forgotten: self.forgotten,
            total_cards: self.deck.len(),
            completed_at: now,
        };
        self.summary = Some(summary.clone());
        TallyStep::Completed(summary)
    }

    /// Step to the previous card; no-op on the first card.
    pub fn go_back(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
        self.revealed = false;
    }

    /// Step to the next card; no-op on the last card.
    pub fn go_forward(&mut self) {
        if self.current + 1 < self.deck.len() {
            self.current += 1;
        }
        self.revealed = false;
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.current = 0;
        self.revealed = false;
        self.remembered = 0;
        self.forgotten = 0;
        self.started_at = now;
        self.summary = None;
    }
}
