use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::CreateTagsDto;
use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::models::Tag;
use crate::repo;

/// Handler for creating tags
///
/// This function handles POST requests to `/tags`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The signed-in user
/// * `payload` - The request payload containing the tag names
///
/// ### Returns
///
/// 201 with the newly created tags as JSON
#[instrument(skip(pool, user, payload), fields(user_id = %user.id(), count = payload.tags.len()))]
pub async fn create_tags_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract and deserialize the JSON request body
    JsonBody(payload): JsonBody<CreateTagsDto>,
) -> Result<(StatusCode, Json<Vec<Tag>>), ApiError> {
    info!("Creating new tags");

    // Validation and insert happen together so a bad name creates nothing
    let tags = repo::create_tags(&pool, &user.id(), payload.tags).await?;

    info!("Successfully created {} tags", tags.len());
    Ok((StatusCode::CREATED, Json(tags)))
}

/// Handler for listing the user's tags
///
/// This function handles GET requests to `/tags`.
///
/// ### Returns
///
/// The user's tags ordered by name
#[instrument(skip_all, fields(user_id = %user.id()))]
pub async fn list_tags_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<Vec<Tag>>, ApiError> {
    debug!("Listing tags");

    let tags = repo::list_tags(&pool, &user.id())?;

    info!("Retrieved {} tags", tags.len());
    Ok(Json(tags))
}

/// Handler for deleting a tag
///
/// This function handles DELETE requests to `/tags/{id}`. The tag is
/// removed from every listing that carried it.
///
/// ### Returns
///
/// A 204 No Content response if successful
#[instrument(skip(pool, user), fields(user_id = %user.id()))]
pub async fn delete_tag_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    repo::delete_tag(&pool, &user.id(), &id).await?;

    info!("Deleted tag {}", id);
    Ok(StatusCode::NO_CONTENT)
}
