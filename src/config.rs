//! Runtime configuration loaded from the environment (and `.env`).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_JWT_SECRET: &str = "genai-report-jwt-secret-change-in-production";
const DEFAULT_DATABASE_URL: &str = "sqlite://genai_reports.db?mode=rwc";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// How PDF filenames are derived for a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameScheme {
    /// `{prefix}_{user_id}_{content_length}.pdf`. Two reports of equal
    /// length for the same user overwrite each other.
    ContentLength,
    /// `{prefix}_{user_id}_{uuid}.pdf`.
    Unique,
}

impl FromStr for FilenameScheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "content_length" | "length" => Ok(Self::ContentLength),
            "unique" | "uuid" => Ok(Self::Unique),
            other => Err(format!("unknown filename scheme '{}'", other)),
        }
    }
}

/// Settings for the OpenAI-compatible completion backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_seconds: i64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Add `reports.generation_method` to older stores at startup.
    pub auto_migrate: bool,
    pub reports_dir: PathBuf,
    pub auth: AuthConfig,
    /// `None` puts the generator in fallback-only mode.
    pub openai: Option<OpenAiConfig>,
    pub typst_bin: String,
    pub filename_scheme: FilenameScheme,
    /// Deny downloads whose ownership check fails instead of logging and serving.
    pub strict_download_ownership: bool,
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: 5,
            auto_migrate: true,
            reports_dir: PathBuf::from("reports"),
            auth: AuthConfig {
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                token_expiry_seconds: 30 * 60,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            openai: None,
            typst_bin: "typst".to_string(),
            filename_scheme: FilenameScheme::ContentLength,
            strict_download_ownership: false,
            cors_origins: split_list(DEFAULT_CORS_ORIGINS),
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// Unset variables fall back to [`AppConfig::default`]. Variables that are
    /// set but cannot be parsed are reported as errors.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default secret. SET THIS IN PRODUCTION!");
            DEFAULT_JWT_SECRET.to_string()
        });

        let openai = match env::var("OPENAI_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => Some(OpenAiConfig {
                api_key,
                api_url: env::var("OPENAI_API_URL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
                model: env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
                temperature: parse_var("OPENAI_TEMPERATURE")?.unwrap_or(0.7),
            }),
            _ => {
                log::warn!("No OPENAI_API_KEY found. Using fallback content generation.");
                None
            }
        };

        let token_expiry_minutes: i64 = parse_var("TOKEN_EXPIRY_MINUTES")?.unwrap_or(30);

        let filename_scheme = match env::var("FILENAME_SCHEME") {
            Ok(value) => value
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("invalid FILENAME_SCHEME")?,
            Err(_) => defaults.filename_scheme,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(defaults.database_max_connections),
            auto_migrate: parse_flag("AUTO_MIGRATE").unwrap_or(defaults.auto_migrate),
            reports_dir: env::var("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.reports_dir),
            auth: AuthConfig {
                jwt_secret,
                token_expiry_seconds: token_expiry_minutes * 60,
                bcrypt_cost: parse_var("BCRYPT_COST")?.unwrap_or(defaults.auth.bcrypt_cost),
            },
            openai,
            typst_bin: env::var("TYPST_BIN").unwrap_or(defaults.typst_bin),
            filename_scheme,
            strict_download_ownership: parse_flag("STRICT_DOWNLOAD_OWNERSHIP")
                .unwrap_or(defaults.strict_download_ownership),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.cors_origins),
        })
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid value '{}' for {}: {}", raw, name, e)),
        Err(_) => Ok(None),
    }
}

fn parse_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
