//! Report file download.
//!
//! The file must exist before the caller is authenticated, so a missing
//! report is a 404 whether or not a token was sent. Ownership is checked
//! against the caller's report rows; by default a failed check is only
//! logged and the file is served anyway. `STRICT_DOWNLOAD_OWNERSHIP`
//! turns it into a 403.

use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::PathBuf;

use super::models::DownloadJsonResponse;
use crate::auth::middleware::current_user;
use crate::auth::model::User;
use crate::{AppState, ErrorResponse};

/// Result of matching a file against the caller's report rows.
#[derive(Debug)]
pub enum Ownership {
    Owned,
    NotOwned,
    /// The lookup itself failed.
    Unknown(String),
}

/// Whether a download may proceed for the given ownership outcome.
pub fn download_permitted(ownership: &Ownership, strict: bool) -> bool {
    matches!(ownership, Ownership::Owned) || !strict
}

/// A single path component with nothing that sanitising would change.
pub fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && sanitize_filename::sanitize(name) == name
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found("Report file not found"))
}

/// Locate `filename` in the reports directory.
fn locate_report(state: &AppState, filename: &str) -> Result<PathBuf, HttpResponse> {
    if !is_plain_filename(filename) {
        log::warn!("Rejected download of suspicious filename '{}'", filename);
        return Err(not_found());
    }

    let path = state.config.reports_dir.join(filename);
    if !path.is_file() {
        log::info!("Report file not found: {}", path.display());
        return Err(not_found());
    }
    Ok(path)
}

async fn check_ownership(state: &AppState, user: &User, filename: &str) -> Ownership {
    match state.find_report_by_filename(filename, user.id).await {
        Ok(Some(_)) => Ownership::Owned,
        Ok(None) => Ownership::NotOwned,
        Err(e) => Ownership::Unknown(e.to_string()),
    }
}

/// Everything that must hold before any bytes are sent.
async fn authorize_download(
    req: &HttpRequest,
    state: &web::Data<AppState>,
    filename: &str,
) -> Result<PathBuf, HttpResponse> {
    let path = locate_report(state, filename)?;
    let user = current_user(req, state)
        .await
        .map_err(|e| e.error_response())?;

    let ownership = check_ownership(state, &user, filename).await;
    let strict = state.config.strict_download_ownership;
    if !download_permitted(&ownership, strict) {
        log::warn!(
            "User {} denied download of '{}': {:?}",
            user.id,
            filename,
            ownership
        );
        return Err(HttpResponse::Forbidden().json(ErrorResponse::forbidden("Access denied")));
    }

    match ownership {
        Ownership::Owned => {}
        Ownership::NotOwned => {
            log::warn!(
                "User {} has no report row for '{}', serving anyway",
                user.id,
                filename
            )
        }
        Ownership::Unknown(e) => {
            log::warn!("Ownership check for '{}' failed, serving anyway: {}", filename, e)
        }
    }
    Ok(path)
}

/// Download a report PDF
#[utoipa::path(
    get,
    path = "/download/{filename}",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(
        ("filename" = String, Path, description = "Report file name")
    ),
    responses(
        (status = 200, description = "PDF attachment"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the caller's report", body = ErrorResponse),
        (status = 404, description = "Report file not found", body = ErrorResponse)
    )
)]
pub async fn download_report(
    req: HttpRequest,
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> impl Responder {
    let filename = filename.into_inner();
    let path = match authorize_download(&req, &state, &filename).await {
        Ok(path) => path,
        Err(response) => return response,
    };

    match NamedFile::open_async(&path).await {
        Ok(file) => file
            .set_content_type(mime_guess::from_path(&path).first_or_octet_stream())
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .into_response(&req),
        Err(e) => {
            log::error!("Download error for {}: {}", path.display(), e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Failed to download report: {}",
                e
            )))
        }
    }
}

/// Download a report PDF as base64 JSON
#[utoipa::path(
    get,
    path = "/download-json/{filename}",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(
        ("filename" = String, Path, description = "Report file name")
    ),
    responses(
        (status = 200, description = "Base64 encoded PDF", body = DownloadJsonResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the caller's report", body = ErrorResponse),
        (status = 404, description = "Report file not found", body = ErrorResponse)
    )
)]
pub async fn download_report_json(
    req: HttpRequest,
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> impl Responder {
    let filename = filename.into_inner();
    let path = match authorize_download(&req, &state, &filename).await {
        Ok(path) => path,
        Err(response) => return response,
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => HttpResponse::Ok().json(DownloadJsonResponse {
            filename,
            size: bytes.len() as u64,
            content: STANDARD.encode(&bytes),
            mime_type: "application/pdf".to_string(),
        }),
        Err(e) => {
            log::error!("Download JSON error for {}: {}", path.display(), e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Failed to download report: {}",
                e
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_policy_serves_everything() {
        assert!(download_permitted(&Ownership::Owned, false));
        assert!(download_permitted(&Ownership::NotOwned, false));
        assert!(download_permitted(
            &Ownership::Unknown("no such column".to_string()),
            false
        ));
    }

    #[test]
    fn test_strict_policy_requires_ownership() {
        assert!(download_permitted(&Ownership::Owned, true));
        assert!(!download_permitted(&Ownership::NotOwned, true));
        assert!(!download_permitted(
            &Ownership::Unknown("locked".to_string()),
            true
        ));
    }

    #[test]
    fn test_plain_filenames() {
        assert!(is_plain_filename("report_1_5234.pdf"));
        assert!(is_plain_filename("enhanced_report_2_10.pdf"));
        assert!(!is_plain_filename(""));
        assert!(!is_plain_filename(".."));
        assert!(!is_plain_filename("../secret.pdf"));
        assert!(!is_plain_filename("nested/report.pdf"));
    }
}
