use learn_core::model::{Goal, GoalId, LeaderboardEntry, LeaderboardScope};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, i64_to_u32, i64_to_u64, id_err, ser, u64_to_i64};
use crate::repository::StorageError;

impl SqliteRepository {
    pub(super) async fn fetch_goals(&self) -> Result<Vec<Goal>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, description, lessons_label, difficulty
            FROM goals
            ORDER BY position ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut goals = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = GoalId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(id_err)?;
            goals.push(Goal::new(
                id,
                row.try_get::<String, _>("title").map_err(ser)?,
                row.try_get::<String, _>("description").map_err(ser)?,
                row.try_get::<String, _>("lessons_label").map_err(ser)?,
                row.try_get::<String, _>("difficulty").map_err(ser)?,
            )?);
        }
        Ok(goals)
    }

    pub(super) async fn write_goal(&self, position: u32, goal: &Goal) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO goals (id, position, title, description, lessons_label, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                position = excluded.position,
                title = excluded.title,
                description = excluded.description,
                lessons_label = excluded.lessons_label,
                difficulty = excluded.difficulty
            ",
        )
        .bind(goal.id().as_str())
        .bind(i64::from(position))
        .bind(goal.title())
        .bind(goal.description())
        .bind(goal.lessons_label())
        .bind(goal.difficulty())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    pub(super) async fn fetch_leaderboard(
        &self,
        scope: LeaderboardScope,
    ) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT rank, name, xp, streak, level
            FROM leaderboard_entries
            WHERE scope = ?1
            ORDER BY rank ASC
            ",
        )
        .bind(scope.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter()
            .map(|row| {
                Ok(LeaderboardEntry {
                    rank: i64_to_u32("rank", row.try_get("rank").map_err(ser)?)?,
                    name: row.try_get("name").map_err(ser)?,
                    xp: i64_to_u64("xp", row.try_get("xp").map_err(ser)?)?,
                    streak: i64_to_u32("streak", row.try_get("streak").map_err(ser)?)?,
                    level: i64_to_u32("level", row.try_get("level").map_err(ser)?)?,
                })
            })
            .collect()
    }

    pub(super) async fn write_leaderboard(
        &self,
        scope: LeaderboardScope,
        entries: &[LeaderboardEntry],
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM leaderboard_entries WHERE scope = ?1")
            .bind(scope.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for entry in entries {
            sqlx::query(
                r"
                INSERT INTO leaderboard_entries (scope, rank, name, xp, streak, level)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(scope.as_str())
            .bind(i64::from(entry.rank))
            .bind(&entry.name)
            .bind(u64_to_i64("xp", entry.xp)?)
            .bind(i64::from(entry.streak))
            .bind(i64::from(entry.level))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
