use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{BulkImportDto, BulkImportResultDto, BulkSampleDto};
use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::import;

/// Handler for the bulk import page (`GET /listings/bulk-create`)
///
/// Returns the sample payload that documents the accepted format.
pub async fn bulk_sample_handler(_user: AuthUser) -> Json<BulkSampleDto> {
    Json(BulkSampleDto { sample: import::sample_payload() })
}

/// Handler for importing listings
///
/// This function handles POST requests to `/listings/bulk`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The signed-in user
/// * `payload` - `listingsData`, the JSON array as text
///
/// ### Returns
///
/// 201 with the number of listings created. Any problem is a 422 on
/// `listingsData` and nothing is written.
#[instrument(skip_all, fields(user_id = %user.id()))]
pub async fn bulk_import_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    JsonBody(payload): JsonBody<BulkImportDto>,
) -> Result<(StatusCode, Json<BulkImportResultDto>), ApiError> {
    let created = import::import_listings(&pool, &user.id(), payload.listings_data.as_deref()).await?;

    info!("Bulk import created {} listings", created);
    Ok((
        StatusCode::CREATED,
        Json(BulkImportResultDto {
            message: "Listings created successfully!".to_string(),
            created,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo;
    use crate::repo::tests::{create_test_user, setup_test_db};

    #[tokio::test]
    async fn test_bulk_sample_handler() {
        let pool = setup_test_db();
        let user = create_test_user(&pool, "ann@example.com");

        let Json(body) = bulk_sample_handler(AuthUser::new(user)).await;

        assert_eq!(body.sample.len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_import_handler() {
        let pool = setup_test_db();
        let user = create_test_user(&pool, "ann@example.com");
        repo::create_types(&pool, &user.get_id(), vec!["Movie".to_string()]).await.unwrap();
        repo::create_tags(&pool, &user.get_id(), vec!["action".to_string()]).await.unwrap();

        let payload = BulkImportDto {
            listings_data: Some(r#"[{"name": "Heat", "type": "Movie", "tags": "action"}]"#.to_string()),
        };
        let (status, Json(result)) = bulk_import_handler(State(pool.clone()), AuthUser::new(user.clone()), JsonBody(payload))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(result.created, 1);
        assert_eq!(result.message, "Listings created successfully!");
        assert_eq!(repo::count_listings(&pool, &user.get_id()).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bulk_import_handler_invalid_json() {
        let pool = setup_test_db();
        let user = create_test_user(&pool, "ann@example.com");

        let payload = BulkImportDto { listings_data: Some("{oops".to_string()) };
        let err = bulk_import_handler(State(pool), AuthUser::new(user), JsonBody(payload)).await.unwrap_err();

        match err {
            ApiError::Validation(errors) => assert_eq!(errors.get("listingsData"), ["Invalid JSON format"]),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
