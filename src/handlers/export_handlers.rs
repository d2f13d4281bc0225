use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{DownloadDto, ListingQueryDto};
use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::export;
use crate::repo;

/// Handler for exporting every listing with the full field set
///
/// This function handles GET requests to `/listings/export`.
#[instrument(skip_all, fields(user_id = %user.id()))]
pub async fn export_listings_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    let listings = repo::list_listing_details(&pool, &user.id(), &ListingQueryDto::default())?;

    info!("Exporting {} listings", listings.len());
    Ok(Json(export::export_all(&listings)))
}

/// Handler for downloading listings as a JSON file
///
/// This function handles POST requests to `/listings/download`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The signed-in user
/// * `payload` - The export fields to keep; the default set when absent
///
/// ### Returns
///
/// A pretty-printed JSON attachment named after the current time
#[instrument(skip_all, fields(user_id = %user.id()))]
pub async fn download_listings_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    JsonBody(payload): JsonBody<DownloadDto>,
) -> Result<Response, ApiError> {
    let fields = export::parse_fields(payload.fields)?;
    let listings = repo::list_listing_details(&pool, &user.id(), &ListingQueryDto::default())?;

    let rows: Vec<Map<String, Value>> = listings.iter().map(|l| export::project(l, &fields)).collect();
    let body = export::render_download(&rows)?;
    let disposition = format!("attachment; filename=\"{}\"", export::export_filename(Utc::now()));

    info!("Downloading {} listings with {} fields", rows.len(), fields.len());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::ListingInput;
    use crate::repo::tests::{create_test_user, setup_test_db};

    async fn seeded() -> (Arc<DbPool>, AuthUser) {
        let pool = setup_test_db();
        let user = create_test_user(&pool, "ann@example.com");
        let uid = user.get_id();
        let types = repo::create_types(&pool, &uid, vec!["Anime".to_string()]).await.unwrap();
        let tags = repo::create_tags(&pool, &uid, vec!["Drama".to_string(), "Action".to_string()]).await.unwrap();

        let input = ListingInput {
            name: "Monster".to_string(),
            description: None,
            author: Some("Naoki Urasawa".to_string()),
            type_id: types[0].get_id(),
            image_url: None,
            link: Some("https://example.com/monster".to_string()),
            tag_ids: tags.iter().map(|t| t.get_id()).collect(),
        };
        repo::create_listing(&pool, &uid, input).await.unwrap();
        (pool, AuthUser::new(user))
    }

    #[tokio::test]
    async fn test_export_listings_handler() {
        let (pool, user) = seeded().await;

        let Json(rows) = export_listings_handler(State(pool), user).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["type"], "Anime");
        assert_eq!(rows[0]["tags"], "Action, Drama");
        assert_eq!(rows[0].len(), 10);
        assert!(rows[0]["created_at"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_download_listings_handler() {
        let (pool, user) = seeded().await;

        let payload = DownloadDto { fields: Some(vec!["tags".to_string(), "name".to_string()]) };
        let response = download_listings_handler(State(pool), user, JsonBody(payload)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"listings-export-"));
        assert!(disposition.ends_with(".json\""));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let rows: Vec<Map<String, Value>> = serde_json::from_slice(&bytes).unwrap();
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, ["name", "tags"]);
    }

    #[tokio::test]
    async fn test_download_listings_handler_rejects_unknown_field() {
        let (pool, user) = seeded().await;

        let payload = DownloadDto { fields: Some(vec!["secret".to_string()]) };
        let err = download_listings_handler(State(pool), user, JsonBody(payload)).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }
}
