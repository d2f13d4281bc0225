/// Authentication
///
/// Passwords are stored as bcrypt hashes. A successful login hands out an
/// HS256 session token that the [`AuthUser`] extractor checks on every
/// protected route.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::DbPool;
use crate::errors::ApiError;
use crate::models::User;
use crate::repo;

/// Issuer written into and required from every session token
pub const ISSUER: &str = "mediashelf";

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user ID
    pub sub: String,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
    pub iss: String,
}

/// Secrets and costs used for hashing and signing
#[derive(Clone)]
pub struct AuthSettings {
    jwt_secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AuthSettings {
    pub fn new(jwt_secret: String, token_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self { jwt_secret, token_ttl, bcrypt_cost }
    }

    /// Token lifetime in whole seconds
    pub fn ttl_seconds(&self) -> i64 {
        i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Hashes a password with the configured bcrypt cost
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).context("Failed to hash password")
    }

    /// Checks a password against a stored hash
    ///
    /// A malformed hash counts as a mismatch.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Issues a signed session token for `user_id`
    pub fn issue_token(&self, user_id: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds()),
            iss: ISSUER.to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .context("Failed to sign session token")
    }

    /// Verifies a session token's signature, issuer and expiry
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}

/// Generates a random signing secret for runs without a configured one
///
/// Tokens signed with it do not survive a restart.
pub fn generate_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Pulls the token out of an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

fn unauthenticated() -> ApiError {
    ApiError::Unauthorized("Unauthenticated.".to_string())
}

/// The signed-in user, resolved from the request's bearer token
///
/// Rejects with 401 when the header is missing or malformed, the token
/// does not verify, or the user no longer exists.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn new(user: User) -> Self {
        Self(user)
    }

    /// The ID of the signed-in user
    pub fn id(&self) -> String {
        self.0.get_id()
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<DbPool>: FromRef<S>,
    Arc<AuthSettings>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let settings = Arc::<AuthSettings>::from_ref(state);
        let pool = Arc::<DbPool>::from_ref(state);

        let token = extract_bearer_token(&parts.headers).ok_or_else(unauthenticated)?;
        let claims = settings.verify_token(token).map_err(|e| {
            debug!("Rejected session token: {}", e);
            unauthenticated()
        })?;

        match repo::get_user(&pool, &claims.sub)? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                debug!("Session token names unknown user {}", claims.sub);
                Err(unauthenticated())
            }
        }
    }
}

#[cfg(test)]
mod tests;
