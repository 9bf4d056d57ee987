use actix_web::{web, HttpRequest};

use super::model::User;
use super::AuthError;
use crate::AppState;

/// Extract token from Authorization header
fn extract_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validate token from HttpRequest and return the user id it was issued for
pub fn validate_request_token(req: &HttpRequest, state: &AppState) -> Result<i64, AuthError> {
    let token = extract_token(req).ok_or(AuthError::MissingToken)?;
    state.tokens.decode_token(token)
}

/// Resolve the caller of a protected endpoint.
///
/// Users are immutable once created, so lookups are served from the user
/// cache when possible.
pub async fn current_user(req: &HttpRequest, state: &web::Data<AppState>) -> Result<User, AuthError> {
    let user_id = validate_request_token(req, state)?;

    if let Some(user) = state.user_cache.get(&user_id).await {
        log::debug!("User {} served from cache", user_id);
        return Ok(user);
    }

    log::debug!("User {} not cached, loading from database", user_id);
    match state.get_user_by_id(user_id).await? {
        Some(user) => {
            state.user_cache.insert(user_id, user.clone()).await;
            Ok(user)
        }
        None => {
            log::warn!("Token refers to unknown user {}", user_id);
            Err(AuthError::UnknownUser)
        }
    }
}
