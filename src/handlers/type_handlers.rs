use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::CreateTypesDto;
use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::models::ListingType;
use crate::repo;

/// Handler for creating types
///
/// This function handles POST requests to `/types`.
///
/// ### Returns
///
/// 201 with the newly created types as JSON
#[instrument(skip(pool, user, payload), fields(user_id = %user.id(), count = payload.types.len()))]
pub async fn create_types_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateTypesDto>,
) -> Result<(StatusCode, Json<Vec<ListingType>>), ApiError> {
    let types = repo::create_types(&pool, &user.id(), payload.types).await?;

    info!("Successfully created {} types", types.len());
    Ok((StatusCode::CREATED, Json(types)))
}

/// Handler for listing the user's types (`GET /types`)
#[instrument(skip_all, fields(user_id = %user.id()))]
pub async fn list_types_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<Vec<ListingType>>, ApiError> {
    let types = repo::list_types(&pool, &user.id())?;
    Ok(Json(types))
}

/// Handler for deleting a type
///
/// This function handles DELETE requests to `/types/{id}`.
///
/// ### Errors
///
/// 409 while any listing still uses the type
#[instrument(skip(pool, user), fields(user_id = %user.id()))]
pub async fn delete_type_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    repo::delete_type(&pool, &user.id(), &id).await?;

    info!("Deleted type {}", id);
    Ok(StatusCode::NO_CONTENT)
}
