// ABOUTME: JWT-based user authentication and password hashing
// ABOUTME: Issues and validates HS256 tokens, hashes passwords with bcrypt off the async runtime
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Authentication
//!
//! Tokens are stateless HS256 JWTs carrying the user ID. Logging out is a
//! client-side concern; the server keeps no session table.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Why a token was rejected
#[derive(Debug, Clone, thiserror::Error)]
pub enum JwtValidationError {
    /// Past its `exp`
    #[error("Token expired at {}", expired_at.format("%Y-%m-%d %H:%M:%S UTC"))]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Bad signature or claims
    #[error("Token is invalid: {reason}")]
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Not a three-part `JWT`
    #[error("Token is malformed: {details}")]
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        Self::auth_invalid(error.to_string())
    }
}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Numeric user ID carried in `sub`
    ///
    /// # Errors
    ///
    /// `AuthInvalid` when `sub` is not an integer
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::auth_invalid("Token subject is not a user id"))
    }
}

/// Token issuing, token validation and password hashing
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
    bcrypt_cost: u32,
}

impl AuthManager {
    /// Create an authentication manager from an HMAC secret
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
            bcrypt_cost,
        }
    }

    /// Generate a token for a user
    ///
    /// # Errors
    ///
    /// `InternalError` if encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// A [`JwtValidationError`] describing why the token was rejected
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))
    }

    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        debug!("JWT validation failed: {:?}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Utc::now(),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "token format is invalid".into(),
            },
            ErrorKind::Base64(err) => JwtValidationError::TokenMalformed {
                details: format!("invalid base64: {err}"),
            },
            ErrorKind::Json(err) => JwtValidationError::TokenMalformed {
                details: format!("invalid JSON: {err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: e.to_string(),
            },
        }
    }

    /// Resolve the user ID from an `Authorization` header value
    ///
    /// # Errors
    ///
    /// `AuthInvalid` for an unknown scheme or a rejected token
    pub fn authenticate_header(&self, header_value: &str) -> AppResult<i64> {
        let token = extract_token(header_value)
            .ok_or_else(|| AppError::auth_invalid("Expected 'Bearer <token>' or 'Token <token>'"))?;
        let claims = self.validate_token(token).map_err(|e| {
            warn!(error = %e, "Rejected authentication token");
            AppError::from(e)
        })?;
        claims.user_id()
    }

    /// Hash a password with bcrypt on the blocking pool
    ///
    /// # Errors
    ///
    /// `InternalError` if hashing fails or the task panics
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
    }

    /// Check a password against a bcrypt hash on the blocking pool
    ///
    /// # Errors
    ///
    /// `InternalError` if the hash is malformed or the task panics
    pub async fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Failed to verify password: {e}")))
    }
}

/// Token part of `Bearer <token>` or `Token <token>`
#[must_use]
pub fn extract_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    let known = scheme.eq_ignore_ascii_case("bearer") || scheme.eq_ignore_ascii_case("token");
    (known && !token.is_empty()).then_some(token)
}

/// Generate a random `JWT` secret
#[must_use]
pub fn generate_jwt_secret() -> [u8; 64] {
    let mut secret = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}
