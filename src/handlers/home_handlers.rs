use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::instrument;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{DashboardDto, WelcomeDto};
use crate::errors::ApiError;
use crate::repo;

/// Handler for the public landing page (`GET /`)
pub async fn welcome_handler() -> Json<WelcomeDto> {
    Json(WelcomeDto {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for the dashboard
///
/// This function handles GET requests to `/dashboard`.
///
/// ### Returns
///
/// How many listings, tags and types the user has
#[instrument(skip_all, fields(user_id = %user.id()))]
pub async fn dashboard_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<DashboardDto>, ApiError> {
    let user_id = user.id();

    Ok(Json(DashboardDto {
        listings: repo::count_listings(&pool, &user_id)?,
        tags: repo::count_tags(&pool, &user_id)?,
        types: repo::count_types(&pool, &user_id)?,
    }))
}
