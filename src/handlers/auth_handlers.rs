use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::{AuthSettings, AuthUser};
use crate::db::DbPool;
use crate::dto::{AuthTokenDto, LoginDto, RegisterDto};
use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::models::User;
use crate::repo;
use crate::validation::validate_registration;

/// Signs a session token for `user` and wraps it in the auth response
fn token_response(auth: &AuthSettings, user: User) -> Result<AuthTokenDto, ApiError> {
    let token = auth.issue_token(&user.get_id())?;
    Ok(AuthTokenDto {
        token,
        token_type: "Bearer".to_string(),
        expires_in: auth.ttl_seconds(),
        user,
    })
}

/// Handler for creating an account
///
/// This function handles POST requests to `/auth/register`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `auth` - Hashing and signing settings
/// * `payload` - The name, email and password
///
/// ### Returns
///
/// 201 with a session token and the new user
#[instrument(skip_all)]
pub async fn register_handler(
    State(pool): State<Arc<DbPool>>,
    State(auth): State<Arc<AuthSettings>>,
    JsonBody(payload): JsonBody<RegisterDto>,
) -> Result<(StatusCode, Json<AuthTokenDto>), ApiError> {
    let registration = validate_registration(payload)?;

    let hash = auth.hash_password(&registration.password)?;
    let user = repo::create_user(&pool, registration.name, registration.email, hash)?;

    info!("Registered user {}", user.get_id());
    Ok((StatusCode::CREATED, Json(token_response(&auth, user)?)))
}

/// Handler for logging in
///
/// This function handles POST requests to `/auth/login`. An unknown email
/// and a wrong password get the same answer.
#[instrument(skip_all)]
pub async fn login_handler(
    State(pool): State<Arc<DbPool>>,
    State(auth): State<Arc<AuthSettings>>,
    JsonBody(payload): JsonBody<LoginDto>,
) -> Result<Json<AuthTokenDto>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let Some(user) = repo::find_user_by_email(&pool, payload.email.trim())? else {
        debug!("Login for unknown email");
        return Err(invalid());
    };

    if !auth.verify_password(&payload.password, user.get_password_hash()) {
        debug!("Wrong password for user {}", user.get_id());
        return Err(invalid());
    }

    info!("User {} logged in", user.get_id());
    Ok(Json(token_response(&auth, user)?))
}

/// Handler for the signed-in user's account
///
/// This function handles GET requests to `/auth/me`.
pub async fn me_handler(user: AuthUser) -> Json<User> {
    Json(user.0)
}
