use learn_core::model::{LessonDraft, LessonId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, i64_to_u32, id_err, ser, usize_to_i64};
use crate::repository::StorageError;

impl SqliteRepository {
    pub(super) async fn fetch_lesson(
        &self,
        id: &LessonId,
    ) -> Result<Option<LessonDraft>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, topic, content, xp_reward
            FROM lessons
            WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let steps: Vec<String> = sqlx::query_scalar(
            r"
            SELECT body FROM lesson_steps
            WHERE lesson_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        Ok(Some(LessonDraft {
            id: LessonId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(id_err)?,
            title: row.try_get("title").map_err(ser)?,
            topic: row.try_get("topic").map_err(ser)?,
            content: row.try_get("content").map_err(ser)?,
            steps,
            xp_reward: i64_to_u32("xp_reward", row.try_get("xp_reward").map_err(ser)?)?,
        }))
    }

    pub(super) async fn lesson_ids(&self) -> Result<Vec<LessonId>, StorageError> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM lessons ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        ids.into_iter()
            .map(|id| LessonId::new(id).map_err(id_err))
            .collect()
    }

    pub(super) async fn write_lesson(&self, lesson: &LessonDraft) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO lessons (id, title, topic, content, xp_reward)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                topic = excluded.topic,
                content = excluded.content,
                xp_reward = excluded.xp_reward
            ",
        )
        .bind(lesson.id.as_str())
        .bind(&lesson.title)
        .bind(&lesson.topic)
        .bind(&lesson.content)
        .bind(i64::from(lesson.xp_reward))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM lesson_steps WHERE lesson_id = ?1")
            .bind(lesson.id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, step) in lesson.steps.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO lesson_steps (lesson_id, position, body)
                VALUES (?1, ?2, ?3)
                ",
            )
            .bind(lesson.id.as_str())
            .bind(usize_to_i64("position", position)?)
            .bind(step)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
