use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Ordered schema steps. Each version runs once, inside one transaction.
const MIGRATIONS: &[(i64, &[&str])] = &[
    (
        1,
        &[
            r"CREATE TABLE IF NOT EXISTS quiz_attempts (
                id INTEGER PRIMARY KEY,
                material_id TEXT NOT NULL,
                score INTEGER NOT NULL CHECK (score >= 0),
                total_questions INTEGER NOT NULL CHECK (total_questions >= score),
                answers TEXT NOT NULL,
                completed_at TEXT NOT NULL
            )",
            r"CREATE INDEX IF NOT EXISTS idx_quiz_attempts_material_completed
                ON quiz_attempts (material_id, completed_at)",
            // At most one signed-in user.
            r"CREATE TABLE IF NOT EXISTS credentials (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                access_token TEXT NOT NULL,
                user_id TEXT NOT NULL,
                email TEXT NOT NULL,
                name TEXT NOT NULL,
                user_created_at TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )",
        ],
    ),
];

/// Highest schema version this build knows about.
pub const LATEST_VERSION: i64 = 1;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    let applied: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_migrations")
        .fetch_all(pool)
        .await?;

    for (version, statements) in MIGRATIONS {
        if applied.contains(version) {
            continue;
        }
        let mut tx = pool.begin().await?;
        for statement in *statements {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
            .bind(*version)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
    }

    Ok(())
}

/// Newest applied version, or 0 on a fresh database.
pub async fn current_version(pool: &SqlitePool) -> Result<i64, SqliteInitError> {
    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if tracked == 0 {
        return Ok(0);
    }
    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    Ok(version.unwrap_or(0))
}
