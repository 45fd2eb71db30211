use learn_core::model::{DeckId, Flashcard, FlashcardDeck};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser, usize_to_i64};
use crate::repository::StorageError;

impl SqliteRepository {
    pub(super) async fn fetch_flashcard_deck(
        &self,
        id: &DeckId,
    ) -> Result<Option<FlashcardDeck>, StorageError> {
        let title: Option<String> =
            sqlx::query_scalar("SELECT title FROM flashcard_decks WHERE id = ?1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(conn)?;

        let Some(title) = title else {
            return Ok(None);
        };

        let rows = sqlx::query(
            r"
            SELECT question, answer, category
            FROM flashcards
            WHERE deck_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut cards = Vec::with_capacity(rows.len());
        for row in &rows {
            cards.push(Flashcard::new(
                row.try_get::<String, _>("question").map_err(ser)?,
                row.try_get::<String, _>("answer").map_err(ser)?,
                row.try_get::<String, _>("category").map_err(ser)?,
            )?);
        }

        Ok(Some(FlashcardDeck::new(id.clone(), title, cards)?))
    }

    pub(super) async fn write_flashcard_deck(
        &self,
        deck: &FlashcardDeck,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO flashcard_decks (id, title)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET title = excluded.title
            ",
        )
        .bind(deck.id().as_str())
        .bind(deck.title())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM flashcards WHERE deck_id = ?1")
            .bind(deck.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, card) in deck.cards().iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO flashcards (deck_id, position, question, answer, category)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )
            .bind(deck.id().as_str())
            .bind(usize_to_i64("position", position)?)
            .bind(card.question())
            .bind(card.answer())
            .bind(card.category())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
