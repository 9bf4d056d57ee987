#![allow(dead_code)]

use actix_web::web;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use genai_report_server::ai::{CompletionError, ReportGenerator, TextCompletion};
use genai_report_server::auth::password::hash_password;
use genai_report_server::db::{self, schema};
use genai_report_server::pdf::{write_pdf, RenderError, ReportRenderer};
use genai_report_server::{AppConfig, AppState};

pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n% stub report\n%%EOF\n";
pub const PASSWORD: &str = "password123";

/// Writes a fixed PDF without invoking Typst.
pub struct StubRenderer;

impl ReportRenderer for StubRenderer {
    fn render(
        &self,
        _topic: &str,
        _body: &str,
        _author: &str,
        destination: &Path,
    ) -> Result<(), RenderError> {
        write_pdf(destination, FAKE_PDF)
    }
}

pub struct FailingRenderer;

impl ReportRenderer for FailingRenderer {
    fn render(
        &self,
        _topic: &str,
        _body: &str,
        _author: &str,
        _destination: &Path,
    ) -> Result<(), RenderError> {
        Err(RenderError::TypstExit {
            code: 1,
            stderr: "error: unexpected end of file".to_string(),
        })
    }
}

/// Answers every prompt with the same text.
pub struct CannedCompletion(pub String);

#[async_trait]
impl TextCompletion for CannedCompletion {
    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, CompletionError> {
        Ok(self.0.clone())
    }
}

pub fn canned_generator(reply: &str) -> ReportGenerator {
    ReportGenerator::new(Some(Arc::new(CannedCompletion(reply.to_string()))))
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub reports_dir: tempfile::TempDir,
}

impl TestContext {
    pub fn report_path(&self, filename: &str) -> std::path::PathBuf {
        self.reports_dir.path().join(filename)
    }
}

/// State backed by in-memory SQLite and a temporary reports directory.
pub async fn context_with(
    generator: ReportGenerator,
    renderer: Arc<dyn ReportRenderer>,
    configure: impl FnOnce(&mut AppConfig),
) -> TestContext {
    let reports_dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.database_url = "sqlite::memory:".to_string();
    config.reports_dir = reports_dir.path().to_path_buf();
    config.auth.bcrypt_cost = 4;
    configure(&mut config);

    let pool = db::connect(&config.database_url, 1).await.unwrap();
    let schema = schema::ensure_schema(&pool, config.auto_migrate).await.unwrap();
    let state = AppState::new_with_parts(pool, schema, config, Arc::new(generator), renderer);

    TestContext {
        state: web::Data::new(state),
        reports_dir,
    }
}

pub async fn default_context() -> TestContext {
    context_with(
        ReportGenerator::fallback_only(),
        Arc::new(StubRenderer),
        |_| {},
    )
    .await
}

/// Create a user directly in the store and issue a token for them.
pub async fn register_user(state: &AppState, username: &str) -> (i64, String) {
    let hashed = hash_password(PASSWORD, 4).unwrap();
    let user = state
        .create_user(username, &format!("{}@example.com", username), &hashed)
        .await
        .unwrap();
    let token = state.tokens.issue_token(user.id).unwrap();
    (user.id, token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
