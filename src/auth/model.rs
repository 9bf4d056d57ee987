use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User stored in database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
}

/// User info for API responses (without sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserInfo {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "analyst")]
    pub username: String,
    #[schema(example = "analyst@example.com")]
    pub email: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Signup request payload
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned by signup and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserInfo,
}

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
    pub iat: usize,
}
