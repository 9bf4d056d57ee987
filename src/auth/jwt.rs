use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::model::Claims;
use super::AuthError;
use crate::config::AuthConfig;

/// Issues and decodes the bearer tokens handed out at signup and login.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: i64,
}

impl TokenService {
    pub fn new(secret: &str, expiry_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_expiry_seconds)
    }

    /// Token lifetime in seconds
    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_seconds
    }

    /// Sign a token for `user_id` that expires after the configured lifetime.
    pub fn issue_token(&self, user_id: i64) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now as usize,
            exp: (now + self.expiry_seconds).max(0) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Signing)
    }

    /// Validate signature and expiry, returning the user id in the subject.
    pub fn decode_token(&self, token: &str) -> Result<i64, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                log::warn!("Token validation failed: {:?}", e);
                AuthError::InvalidToken
            })?;

        token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken)
    }
}
