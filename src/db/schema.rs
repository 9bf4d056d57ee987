//! Table creation, optional migration and schema capability probing.
//!
//! Stores created before `reports.generation_method` existed stay readable:
//! the column's presence is probed once at startup and cached in
//! [`SchemaCapabilities`], and report queries pick their statement from it.

use sqlx::SqlitePool;

/// Optional schema features detected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaCapabilities {
    /// `reports.generation_method` exists.
    pub report_generation_method: bool,
}

impl SchemaCapabilities {
    /// Capabilities of a store created by this server.
    pub const fn current() -> Self {
        Self {
            report_generation_method: true,
        }
    }

    pub const fn legacy() -> Self {
        Self {
            report_generation_method: false,
        }
    }
}

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL
    )
"#;

const CREATE_REPORTS: &str = r#"
    CREATE TABLE IF NOT EXISTS reports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        topic TEXT NOT NULL,
        filename TEXT NOT NULL,
        file_path TEXT NOT NULL,
        created_at TEXT,
        generation_method TEXT
    )
"#;

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_reports_user_id ON reports(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_reports_filename ON reports(filename)",
];

/// Whether `table` has a column named `column`.
pub async fn has_column(pool: &SqlitePool, table: &str, column: &str) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2")
            .bind(table)
            .bind(column)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn probe_capabilities(pool: &SqlitePool) -> Result<SchemaCapabilities, sqlx::Error> {
    Ok(SchemaCapabilities {
        report_generation_method: has_column(pool, "reports", "generation_method").await?,
    })
}

/// Add `reports.generation_method` if it is missing. Returns whether the
/// column was added.
pub async fn migrate_generation_method(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    if has_column(pool, "reports", "generation_method").await? {
        log::info!("generation_method column already exists");
        return Ok(false);
    }

    log::info!("Adding generation_method column to reports table...");
    sqlx::query("ALTER TABLE reports ADD COLUMN generation_method TEXT")
        .execute(pool)
        .await?;
    log::info!("Migration completed successfully");
    Ok(true)
}

/// Create missing tables, optionally migrate, then probe capabilities.
///
/// A failed migration is logged and the store is used in legacy mode.
pub async fn ensure_schema(
    pool: &SqlitePool,
    auto_migrate: bool,
) -> Result<SchemaCapabilities, sqlx::Error> {
    sqlx::query(CREATE_USERS).execute(pool).await?;
    sqlx::query(CREATE_REPORTS).execute(pool).await?;
    for statement in CREATE_INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    if auto_migrate {
        if let Err(e) = migrate_generation_method(pool).await {
            log::warn!("Database migration warning: {}", e);
        }
    }

    let capabilities = probe_capabilities(pool).await?;
    if capabilities.report_generation_method {
        log::info!("Schema capabilities: generation_method available");
    } else {
        log::warn!("Schema capabilities: reports.generation_method missing, using legacy report queries");
    }
    Ok(capabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    const LEGACY_REPORTS: &str = r#"
        CREATE TABLE reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            topic TEXT NOT NULL,
            filename TEXT NOT NULL,
            file_path TEXT NOT NULL,
            created_at DATETIME
        )
    "#;

    #[tokio::test]
    async fn test_fresh_store_has_generation_method() {
        let pool = test_pool().await;
        let caps = ensure_schema(&pool, false).await.unwrap();
        assert_eq!(caps, SchemaCapabilities::current());
    }

    #[tokio::test]
    async fn test_legacy_store_without_migration_is_detected() {
        let pool = test_pool().await;
        sqlx::query(LEGACY_REPORTS).execute(&pool).await.unwrap();

        let caps = ensure_schema(&pool, false).await.unwrap();

        assert_eq!(caps, SchemaCapabilities::legacy());
    }

    #[tokio::test]
    async fn test_legacy_store_is_migrated_when_enabled() {
        let pool = test_pool().await;
        sqlx::query(LEGACY_REPORTS).execute(&pool).await.unwrap();

        let caps = ensure_schema(&pool, true).await.unwrap();

        assert!(caps.report_generation_method);
        assert!(!migrate_generation_method(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let pool = test_pool().await;
        ensure_schema(&pool, true).await.unwrap();
        let caps = ensure_schema(&pool, true).await.unwrap();
        assert!(caps.report_generation_method);
        assert!(has_column(&pool, "users", "hashed_password").await.unwrap());
        assert!(!has_column(&pool, "users", "display_name").await.unwrap());
    }
}
