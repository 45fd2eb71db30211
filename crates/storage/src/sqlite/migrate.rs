use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

const SCHEMA_V1: &[&str] = &[
    r"
        CREATE TABLE IF NOT EXISTS lessons (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            topic TEXT NOT NULL,
            content TEXT NOT NULL,
            xp_reward INTEGER NOT NULL CHECK (xp_reward >= 0)
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS lesson_steps (
            lesson_id TEXT NOT NULL,
            position INTEGER NOT NULL CHECK (position >= 0),
            body TEXT NOT NULL,
            PRIMARY KEY (lesson_id, position),
            FOREIGN KEY (lesson_id) REFERENCES lessons(id) ON DELETE CASCADE
        );
    ",
    // lesson_id is a loose reference: a quiz may outlive or precede its lesson.
    r"
        CREATE TABLE IF NOT EXISTS quizzes (
            id TEXT PRIMARY KEY,
            lesson_id TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS questions (
            quiz_id TEXT NOT NULL,
            position INTEGER NOT NULL CHECK (position >= 0),
            id TEXT NOT NULL,
            question TEXT NOT NULL,
            correct_answer INTEGER NOT NULL,
            xp_reward INTEGER NOT NULL CHECK (xp_reward >= 0),
            PRIMARY KEY (quiz_id, position),
            FOREIGN KEY (quiz_id) REFERENCES quizzes(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS question_options (
            quiz_id TEXT NOT NULL,
            question_position INTEGER NOT NULL,
            position INTEGER NOT NULL CHECK (position >= 0),
            body TEXT NOT NULL,
            PRIMARY KEY (quiz_id, question_position, position),
            FOREIGN KEY (quiz_id, question_position)
                REFERENCES questions(quiz_id, position) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS flashcard_decks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS flashcards (
            deck_id TEXT NOT NULL,
            position INTEGER NOT NULL CHECK (position >= 0),
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            category TEXT NOT NULL,
            PRIMARY KEY (deck_id, position),
            FOREIGN KEY (deck_id) REFERENCES flashcard_decks(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS goals (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            lessons_label TEXT NOT NULL,
            difficulty TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS leaderboard_entries (
            scope TEXT NOT NULL CHECK (scope IN ('global', 'friends')),
            rank INTEGER NOT NULL CHECK (rank > 0),
            name TEXT NOT NULL,
            xp INTEGER NOT NULL CHECK (xp >= 0),
            streak INTEGER NOT NULL CHECK (streak >= 0),
            level INTEGER NOT NULL CHECK (level >= 1),
            PRIMARY KEY (scope, rank)
        );
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_quizzes_lesson
            ON quizzes (lesson_id, id);
    ",
];

/// Runs the versioned schema migrations for the content catalog.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: content catalog.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        for statement in SCHEMA_V1.iter().copied() {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(version = 1, "applied content schema migration");
    }

    Ok(())
}
