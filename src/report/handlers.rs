use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use thiserror::Error;

use super::models::{
    EnhancedReportRequest, GenerationMethod, NewReport, ReportGenerationResponse, ReportRequest,
    ReportSummary,
};
use crate::auth::middleware::current_user;
use crate::auth::model::User;
use crate::config::FilenameScheme;
use crate::pdf::RenderError;
use crate::{AppState, ErrorResponse};

/// Failures after the report text exists.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Render(#[from] RenderError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("rendering task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

/// `{prefix}_{user_id}_{n}.pdf`, where `n` is the content length in
/// characters or a fresh uuid, depending on `scheme`.
pub fn report_filename(prefix: &str, user_id: i64, content: &str, scheme: FilenameScheme) -> String {
    match scheme {
        FilenameScheme::ContentLength => {
            format!("{}_{}_{}.pdf", prefix, user_id, content.chars().count())
        }
        FilenameScheme::Unique => format!("{}_{}_{}.pdf", prefix, user_id, uuid::Uuid::new_v4()),
    }
}

/// Render `content` to the reports directory and record it. Returns the
/// stored filename.
async fn render_and_store(
    state: &AppState,
    user: &User,
    topic: &str,
    content: &str,
    method: GenerationMethod,
) -> Result<String, ReportError> {
    let filename = report_filename(
        method.filename_prefix(),
        user.id,
        content,
        state.config.filename_scheme,
    );
    let destination = state.config.reports_dir.join(&filename);

    let renderer = state.renderer.clone();
    let (render_topic, render_body, author, render_path) = (
        topic.to_string(),
        content.to_string(),
        user.username.clone(),
        destination.clone(),
    );
    web::block(move || renderer.render(&render_topic, &render_body, &author, &render_path))
        .await??;
    log::info!("Rendered {} for user {}", destination.display(), user.id);

    let stored = state
        .insert_report(&NewReport {
            user_id: user.id,
            topic: topic.to_string(),
            filename: filename.clone(),
            file_path: destination.to_string_lossy().into_owned(),
            generation_method: method,
        })
        .await?;
    log::debug!("Stored report {} ({})", stored.id, method);

    Ok(filename)
}

/// Generate a report
#[utoipa::path(
    post,
    path = "/generate-report",
    tag = "Reports",
    request_body = ReportRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Report generated", body = ReportGenerationResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_report(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ReportRequest>,
) -> impl Responder {
    let user = match current_user(&req, &state).await {
        Ok(user) => user,
        Err(e) => return e.error_response(),
    };
    log::info!("User {} requested report on '{}'", user.id, body.topic);

    let content = state.generator.generate_report_content(&body.topic).await;
    let method = GenerationMethod::BasicAi;

    match render_and_store(&state, &user, &body.topic, &content, method).await {
        Ok(filename) => HttpResponse::Ok().json(ReportGenerationResponse {
            content,
            filename,
            generation_method: method,
        }),
        Err(e) => {
            log::error!("Failed to generate report for user {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Failed to generate report: {}",
                e
            )))
        }
    }
}

/// Generate a report using extra context or the recent generation history
#[utoipa::path(
    post,
    path = "/generate-enhanced-report",
    tag = "Reports",
    request_body = EnhancedReportRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Report generated", body = ReportGenerationResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_enhanced_report(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<EnhancedReportRequest>,
) -> impl Responder {
    let user = match current_user(&req, &state).await {
        Ok(user) => user,
        Err(e) => return e.error_response(),
    };
    log::info!(
        "User {} requested enhanced report on '{}' (include_memory: {})",
        user.id,
        body.topic,
        body.include_memory
    );

    let (content, method) = if body.include_memory {
        (
            state
                .generator
                .generate_report_with_memory(&body.topic, user.id)
                .await,
            GenerationMethod::EnhancedWithMemory,
        )
    } else {
        (
            state
                .generator
                .generate_enhanced_report(&body.topic, Some(&body.additional_context), Some(user.id))
                .await,
            GenerationMethod::EnhancedWithContext,
        )
    };

    match render_and_store(&state, &user, &body.topic, &content, method).await {
        Ok(filename) => HttpResponse::Ok().json(ReportGenerationResponse {
            content,
            filename,
            generation_method: method,
        }),
        Err(e) => {
            log::error!("Failed to generate enhanced report for user {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Failed to generate enhanced report: {}",
                e
            )))
        }
    }
}

/// List the caller's reports
#[utoipa::path(
    get,
    path = "/reports",
    tag = "Reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reports owned by the caller", body = [ReportSummary]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Lookup failed", body = ErrorResponse)
    )
)]
pub async fn list_reports(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let user = match current_user(&req, &state).await {
        Ok(user) => user,
        Err(e) => return e.error_response(),
    };

    match state.get_reports_by_user(user.id).await {
        Ok(reports) => {
            let summaries: Vec<ReportSummary> =
                reports.into_iter().map(ReportSummary::from).collect();
            HttpResponse::Ok().json(summaries)
        }
        Err(e) => {
            log::error!("Reports fetch error for user {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Failed to fetch reports: {}",
                e
            )))
        }
    }
}

/// Configure report routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/generate-report", web::post().to(generate_report))
        .route(
            "/generate-enhanced-report",
            web::post().to(generate_enhanced_report),
        )
        .route("/reports", web::get().to(list_reports))
        .route(
            "/download/{filename}",
            web::get().to(super::download::download_report),
        )
        .route(
            "/download-json/{filename}",
            web::get().to(super::download::download_report_json),
        );
}
