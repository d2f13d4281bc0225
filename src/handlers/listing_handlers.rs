use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Query;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{EditListingDto, ListingFormDto, ListingFormOptionsDto, ListingQueryDto};
use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::models::ListingDetails;
use crate::repo;
use crate::validation::validate_listing_form;

/// IDs of the types and tags the user may attach to a listing
fn owned_ids(pool: &DbPool, user_id: &str) -> Result<(HashSet<String>, HashSet<String>), ApiError> {
    let type_ids = repo::list_types(pool, user_id)?.iter().map(|t| t.get_id()).collect();
    let tag_ids = repo::list_tags(pool, user_id)?.iter().map(|t| t.get_id()).collect();
    Ok((type_ids, tag_ids))
}

fn load_details(pool: &DbPool, listing_id: &str) -> Result<ListingDetails, ApiError> {
    repo::get_listing_details(pool, listing_id)?.ok_or(ApiError::NotFound)
}

/// Handler for listing the user's listings
///
/// This function handles GET requests to `/listings`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The signed-in user
/// * `query` - Optional `search`, `tags` and `types` filters
///
/// ### Returns
///
/// The matching listings, newest first, with their type and tags
#[instrument(skip_all, fields(user_id = %user.id()))]
pub async fn list_listings_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Repeated keys are collected into the tag and type filters
    Query(query): Query<ListingQueryDto>,
) -> Result<Json<Vec<ListingDetails>>, ApiError> {
    debug!("Listing listings with filters: {:?}", query);

    let listings = repo::list_listing_details(&pool, &user.id(), &query)?;

    info!("Retrieved {} listings", listings.len());
    Ok(Json(listings))
}

/// Handler for the create form's choices
///
/// This function handles GET requests to `/listings/create`.
#[instrument(skip_all, fields(user_id = %user.id()))]
pub async fn listing_form_options_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<ListingFormOptionsDto>, ApiError> {
    let user_id = user.id();

    Ok(Json(ListingFormOptionsDto {
        available_tags: repo::list_tags(&pool, &user_id)?,
        available_types: repo::list_types(&pool, &user_id)?,
    }))
}

/// Handler for creating a listing
///
/// This function handles POST requests to `/listings`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The signed-in user
/// * `payload` - The listing form
///
/// ### Returns
///
/// 201 with the created listing, its type and tags
#[instrument(skip_all, fields(user_id = %user.id()))]
pub async fn create_listing_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    JsonBody(payload): JsonBody<ListingFormDto>,
) -> Result<(StatusCode, Json<ListingDetails>), ApiError> {
    let user_id = user.id();
    let (type_ids, tag_ids) = owned_ids(&pool, &user_id)?;
    let input = validate_listing_form(payload, &type_ids, &tag_ids)?;

    let listing = repo::create_listing(&pool, &user_id, input).await?;

    info!("Created listing {}", listing.get_id());
    Ok((StatusCode::CREATED, Json(load_details(&pool, &listing.get_id())?)))
}

/// Handler for retrieving a listing
///
/// This function handles GET requests to `/listings/{id}`.
///
/// ### Errors
///
/// 404 if the listing does not exist, 403 if it belongs to another user
#[instrument(skip(pool, user), fields(user_id = %user.id()))]
pub async fn get_listing_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ListingDetails>, ApiError> {
    repo::get_owned_listing(&pool, &user.id(), &id)?;
    Ok(Json(load_details(&pool, &id)?))
}

/// Handler for the edit form (`GET /listings/{id}/edit`)
#[instrument(skip(pool, user), fields(user_id = %user.id()))]
pub async fn edit_listing_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<EditListingDto>, ApiError> {
    let user_id = user.id();
    repo::get_owned_listing(&pool, &user_id, &id)?;

    Ok(Json(EditListingDto {
        listing: load_details(&pool, &id)?,
        available_tags: repo::list_tags(&pool, &user_id)?,
        available_types: repo::list_types(&pool, &user_id)?,
    }))
}

/// Handler for updating a listing
///
/// This function handles PUT and PATCH requests to `/listings/{id}`. The
/// form is validated as for create, and the submitted tags replace the
/// listing's current set.
///
/// ### Errors
///
/// 404 or 403 before the form is looked at, then 422 for a bad form
#[instrument(skip(pool, user, payload), fields(user_id = %user.id()))]
pub async fn update_listing_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ListingFormDto>,
) -> Result<Json<ListingDetails>, ApiError> {
    let user_id = user.id();
    repo::get_owned_listing(&pool, &user_id, &id)?;

    let (type_ids, tag_ids) = owned_ids(&pool, &user_id)?;
    let input = validate_listing_form(payload, &type_ids, &tag_ids)?;

    repo::update_listing(&pool, &user_id, &id, input).await?;

    info!("Updated listing {}", id);
    Ok(Json(load_details(&pool, &id)?))
}

/// Handler for deleting a listing (`DELETE /listings/{id}`)
#[instrument(skip(pool, user), fields(user_id = %user.id()))]
pub async fn delete_listing_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    repo::delete_listing(&pool, &user.id(), &id).await?;

    info!("Deleted listing {}", id);
    Ok(StatusCode::NO_CONTENT)
}
