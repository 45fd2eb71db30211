use std::collections::BTreeMap;

use learn_core::model::{LessonId, QuestionDraft, QuestionId, QuizDraft, QuizId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, i64_to_u32, i64_to_usize, id_err, ser, usize_to_i64};
use crate::repository::StorageError;

impl SqliteRepository {
    /// Rebuild the authored quiz; validation is left to the caller.
    pub(super) async fn fetch_quiz(&self, id: &QuizId) -> Result<Option<QuizDraft>, StorageError> {
        let lesson_id: Option<String> =
            sqlx::query_scalar("SELECT lesson_id FROM quizzes WHERE id = ?1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(conn)?;

        let Some(lesson_id) = lesson_id else {
            return Ok(None);
        };

        let option_rows = sqlx::query(
            r"
            SELECT question_position, body
            FROM question_options
            WHERE quiz_id = ?1
            ORDER BY question_position ASC, position ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut options: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        for row in &option_rows {
            let question_position: i64 = row.try_get("question_position").map_err(ser)?;
            options
                .entry(question_position)
                .or_default()
                .push(row.try_get("body").map_err(ser)?);
        }

        let question_rows = sqlx::query(
            r"
            SELECT position, id, question, correct_answer, xp_reward
            FROM questions
            WHERE quiz_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut questions = Vec::with_capacity(question_rows.len());
        for row in &question_rows {
            let position: i64 = row.try_get("position").map_err(ser)?;
            questions.push(QuestionDraft {
                id: QuestionId::new(row.try_get::<String, _>("id").map_err(ser)?)
                    .map_err(id_err)?,
                question: row.try_get("question").map_err(ser)?,
                options: options.remove(&position).unwrap_or_default(),
                correct_answer: i64_to_usize(
                    "correct_answer",
                    row.try_get("correct_answer").map_err(ser)?,
                )?,
                xp_reward: i64_to_u32("xp_reward", row.try_get("xp_reward").map_err(ser)?)?,
            });
        }

        Ok(Some(QuizDraft {
            id: id.clone(),
            lesson_id: LessonId::new(lesson_id).map_err(id_err)?,
            questions,
        }))
    }

    pub(super) async fn quiz_id_for_lesson(
        &self,
        lesson_id: &LessonId,
    ) -> Result<Option<QuizId>, StorageError> {
        let id: Option<String> = sqlx::query_scalar(
            r"
            SELECT id FROM quizzes
            WHERE lesson_id = ?1
            ORDER BY id ASC
            LIMIT 1
            ",
        )
        .bind(lesson_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        id.map(|id| QuizId::new(id).map_err(id_err)).transpose()
    }

    /// Replace the quiz and all of its questions and options.
    pub(super) async fn write_quiz(&self, quiz: &QuizDraft) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO quizzes (id, lesson_id)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET lesson_id = excluded.lesson_id
            ",
        )
        .bind(quiz.id.as_str())
        .bind(quiz.lesson_id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        // Options cascade with their question.
        sqlx::query("DELETE FROM questions WHERE quiz_id = ?1")
            .bind(quiz.id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, question) in quiz.questions.iter().enumerate() {
            let position = usize_to_i64("position", position)?;
            sqlx::query(
                r"
                INSERT INTO questions (quiz_id, position, id, question, correct_answer, xp_reward)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(quiz.id.as_str())
            .bind(position)
            .bind(question.id.as_str())
            .bind(&question.question)
            .bind(usize_to_i64("correct_answer", question.correct_answer)?)
            .bind(i64::from(question.xp_reward))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

            for (option_position, body) in question.options.iter().enumerate() {
                sqlx::query(
                    r"
                    INSERT INTO question_options (quiz_id, question_position, position, body)
                    VALUES (?1, ?2, ?3, ?4)
                    ",
                )
                .bind(quiz.id.as_str())
                .bind(position)
                .bind(usize_to_i64("option position", option_position)?)
                .bind(body)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
            }
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
