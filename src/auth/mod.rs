pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod model;
pub mod password;


pub use handlers::*;
pub use jwt::*;
pub use middleware::*;
pub use model::*;
pub use password::*;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Credential failures. All of them surface as `401 Unauthorized`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("User not found")]
    UnknownUser,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("failed to load user: {0}")]
    Database(#[from] sqlx::Error),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Hash(_) | AuthError::Signing(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self.status_code() {
            StatusCode::UNAUTHORIZED => crate::ErrorResponse::unauthorized(&self.to_string()),
            _ => crate::ErrorResponse::internal_error("Authentication failed"),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
