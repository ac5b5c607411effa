mod models;

pub use models::*;

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub type DbPool = SqlitePool;

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

pub async fn init(data_dir: &Path) -> Result<DbPool> {
    let db_path = data_dir.join("staffd.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    info!("Initializing database at {}", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Enable WAL mode for better concurrency
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    // Migration 001: employee directory and sessions
    execute_sql(pool, include_str!("../../migrations/001_initial.sql")).await?;

    // Migration 002: compensation ledger
    let has_compensation_table: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='compensation'",
    )
    .fetch_optional(pool)
    .await?;
    if has_compensation_table.is_none() {
        execute_sql(pool, include_str!("../../migrations/002_compensation.sql")).await?;
    }

    // Migration 003: leave applications
    let has_leave_table: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='leave_applications'",
    )
    .fetch_optional(pool)
    .await?;
    if has_leave_table.is_none() {
        execute_sql(pool, include_str!("../../migrations/003_leaves.sql")).await?;
    }

    // Migration 004: attendance entries
    let has_attendance_table: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='attendance'",
    )
    .fetch_optional(pool)
    .await?;
    if has_attendance_table.is_none() {
        execute_sql(pool, include_str!("../../migrations/004_attendance.sql")).await?;
    }

    info!("Migrations completed");
    Ok(())
}

/// In-memory pool with the full schema, for tests.
#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("pragma");

    run_migrations(&pool).await.expect("migrations");
    pool
}
