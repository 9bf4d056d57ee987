use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};

use super::middleware::current_user;
use super::model::{AuthResponse, LoginRequest, SignupRequest, User, UserInfo};
use super::password::{hash_password, verify_password};
use crate::{AppState, ErrorResponse};

fn token_response(state: &AppState, user: User, message: &str) -> HttpResponse {
    match state.tokens.issue_token(user.id) {
        Ok(token) => HttpResponse::Ok().json(AuthResponse {
            message: message.to_string(),
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.tokens.expiry_seconds(),
            user: UserInfo::from(user),
        }),
        Err(e) => {
            log::error!("Failed to generate token: {:?}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to generate token"))
        }
    }
}

fn conflict() -> HttpResponse {
    HttpResponse::Conflict().json(ErrorResponse::conflict(
        "Username or email already registered",
    ))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created", body = AuthResponse),
        (status = 409, description = "Username or email already registered", body = ErrorResponse)
    )
)]
pub async fn signup(state: web::Data<AppState>, body: web::Json<SignupRequest>) -> impl Responder {
    log::info!("Signup attempt for username '{}'", body.username);

    match state
        .find_user_by_username_or_email(&body.username, &body.email)
        .await
    {
        Ok(Some(existing)) => {
            log::info!(
                "Signup rejected: '{}' / '{}' collides with user {}",
                body.username,
                body.email,
                existing.id
            );
            return conflict();
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Database error during signup: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Signup failed"));
        }
    }

    let hashed_password = match hash_password(&body.password, state.config.auth.bcrypt_cost) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Failed to hash password: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Signup failed"));
        }
    };

    let user = match state
        .create_user(&body.username, &body.email, &hashed_password)
        .await
    {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            log::info!("Signup for '{}' lost a uniqueness race", body.username);
            return conflict();
        }
        Err(e) => {
            log::error!("Failed to create user: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Signup failed"));
        }
    };

    log::info!("User {} ('{}') created", user.id, user.username);
    token_response(&state, user, "User created successfully")
}

/// Login endpoint
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    let user = match state.get_user_by_username(&body.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            log::info!("Login failed: unknown username '{}'", body.username);
            return HttpResponse::Unauthorized()
                .json(ErrorResponse::unauthorized("Invalid credentials"));
        }
        Err(e) => {
            log::error!("Database error during login: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Login failed"));
        }
    };

    if !verify_password(&body.password, &user.hashed_password) {
        log::info!("Login failed: wrong password for '{}'", body.username);
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::unauthorized("Invalid credentials"));
    }

    token_response(&state, user, "Login successful")
}

/// Current user's public profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated user", body = UserInfo),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn me(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    match current_user(&req, &state).await {
        Ok(user) => HttpResponse::Ok().json(UserInfo::from(user)),
        Err(e) => e.error_response(),
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Configure auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me)),
    );
}
