use serde::{Deserialize, Serialize};

use crate::model::ids::DeckId;
use crate::model::validation::{ContentError, require_text};

/// Static follow-up shown once a reinforcement pass completes.
///
/// Review scheduling is not computed; this mirrors the copy the learner sees.
pub const NEXT_REVIEW_MESSAGE: &str = "Next review in 2 days";

/// A single question/answer card with a category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    question: String,
    answer: String,
    category: String,
}

impl Flashcard {
    /// Create a flashcard.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyField` if the question or answer is blank.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ContentError> {
        Ok(Self {
            question: require_text(question.into(), "flashcard question")?,
            answer: require_text(answer.into(), "flashcard answer")?,
            category: category.into().trim().to_string(),
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Fixed-size, immutable, non-empty sequence of flashcards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashcardDeck {
    id: DeckId,
    title: String,
    cards: Vec<Flashcard>,
}

impl FlashcardDeck {
    /// Create a deck.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyDeck` if `cards` is empty.
    pub fn new(
        id: DeckId,
        title: impl Into<String>,
        cards: Vec<Flashcard>,
    ) -> Result<Self, ContentError> {
        if cards.is_empty() {
            return Err(ContentError::EmptyDeck { deck_id: id });
        }
        Ok(Self {
            id,
            title: title.into(),
            cards,
        })
    }

    #[must_use]
    pub fn id(&self) -> &DeckId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<&Flashcard> {
        self.cards.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_deck_is_rejected() {
        let err = FlashcardDeck::new(DeckId::new("d").unwrap(), "Deck", Vec::new()).unwrap_err();
        assert!(matches!(err, ContentError::EmptyDeck { .. }));
    }

    #[test]
    fn card_requires_question_and_answer() {
        assert!(Flashcard::new(" ", "a", "c").is_err());
        assert!(Flashcard::new("q", "", "c").is_err());
        let card = Flashcard::new("q", "a", " Budgeting Basics ").unwrap();
        assert_eq!(card.category(), "Budgeting Basics");
    }

    #[test]
    fn deck_indexes_cards() {
        let cards = vec![
            Flashcard::new("q1", "a1", "c").unwrap(),
            Flashcard::new("q2", "a2", "c").unwrap(),
        ];
        let deck = FlashcardDeck::new(DeckId::new("d").unwrap(), "Deck", cards).unwrap();
        assert_eq!(deck.len(), 2);
        assert!(!deck.is_empty());
        assert_eq!(deck.card(1).unwrap().answer(), "a2");
        assert!(deck.card(2).is_none());
    }
}
