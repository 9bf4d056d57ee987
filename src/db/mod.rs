//! Database module - AppState and database operations
//!
//! - `schema` - table creation, migration and capability probing
//! - `user` - user database operations
//! - `report` - report database operations

pub mod schema;
mod report;
mod user;

use anyhow::Context;
use moka::future::Cache;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::ai::ReportGenerator;
use crate::auth::jwt::TokenService;
use crate::auth::model::User;
use crate::config::AppConfig;
use crate::pdf::{ReportRenderer, TypstReportRenderer};
use schema::SchemaCapabilities;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub schema: SchemaCapabilities,
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub user_cache: Cache<i64, User>,
    pub generator: Arc<ReportGenerator>,
    pub renderer: Arc<dyn ReportRenderer>,
}

/// Open a SQLite pool. In-memory databases are pinned to one connection
/// that is never recycled, since each connection would otherwise see its
/// own empty database.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
    };

    pool_options.connect_with(options).await
}

impl AppState {
    /// Connect, prepare the schema and wire every collaborator from `config`.
    pub async fn new_with_config(config: AppConfig) -> anyhow::Result<Self> {
        let pool = connect(&config.database_url, config.database_max_connections)
            .await
            .with_context(|| format!("failed to open database {}", config.database_url))?;

        let schema = schema::ensure_schema(&pool, config.auto_migrate)
            .await
            .context("failed to prepare database schema")?;

        std::fs::create_dir_all(&config.reports_dir).with_context(|| {
            format!(
                "failed to create reports directory {}",
                config.reports_dir.display()
            )
        })?;

        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .user_agent("genai-report-server/2.0")
            .build()
            .context("failed to create HTTP client")?;

        let generator = Arc::new(ReportGenerator::from_config(
            config.openai.as_ref(),
            http_client,
        ));
        let renderer: Arc<dyn ReportRenderer> = Arc::new(
            TypstReportRenderer::new(&config.typst_bin).context("failed to load report template")?,
        );

        Ok(Self::new_with_parts(pool, schema, config, generator, renderer))
    }

    /// Assemble state from already-built parts.
    pub fn new_with_parts(
        pool: SqlitePool,
        schema: SchemaCapabilities,
        config: AppConfig,
        generator: Arc<ReportGenerator>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        let user_cache = Cache::builder()
            .time_to_live(Duration::from_secs(10 * 60))
            .max_capacity(10_000)
            .build();

        Self {
            pool,
            schema,
            tokens: TokenService::from_config(&config.auth),
            config: Arc::new(config),
            user_cache,
            generator,
            renderer,
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect("sqlite::memory:", 1).await.unwrap()
}

#[cfg(test)]
pub(crate) async fn test_state_with_pool(pool: SqlitePool, auto_migrate: bool) -> AppState {
    let schema = schema::ensure_schema(&pool, auto_migrate).await.unwrap();
    let renderer: Arc<dyn ReportRenderer> =
        Arc::new(TypstReportRenderer::with_template(String::new(), "typst"));
    AppState::new_with_parts(
        pool,
        schema,
        AppConfig::default(),
        Arc::new(ReportGenerator::fallback_only()),
        renderer,
    )
}

#[cfg(test)]
pub(crate) async fn test_state() -> AppState {
    test_state_with_pool(test_pool().await, true).await
}
