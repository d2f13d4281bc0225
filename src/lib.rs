/// mediashelf: a personal media-listing manager
///
/// This library provides the core functionality for cataloguing media such
/// as anime, manga and films: user accounts, listings, per-user tags and
/// types, bulk JSON import and JSON export.
///
/// ### Modules
///
/// - `auth`: Password hashing, session tokens and the `AuthUser` extractor
/// - `config`: Layered configuration for the server and CLI
/// - `db`: Database connection management
/// - `extract`: JSON body extraction with per-field type errors
/// - `models`: Data structures representing users, listings, tags and types
/// - `repo`: Repository layer for database operations
/// - `schema`: Database schema definitions
/// - `import` / `export`: Bulk JSON in and out
/// - `seed`: Demo data
///
/// ### Web API
///
/// The library exposes a RESTful API using Axum with the following endpoints:
///
/// - `GET /`: Welcome
/// - `POST /auth/register`, `POST /auth/login`, `GET /auth/me`
/// - `GET /dashboard`: Counts of the user's listings, tags and types
/// - `GET|POST /listings`: List (with filters) or create listings
/// - `GET /listings/create`: Tags and types offered by the create form
/// - `GET /listings/bulk-create`, `POST /listings/bulk`: Bulk import
/// - `GET /listings/export`, `POST /listings/download`: Export
/// - `GET|PUT|PATCH|DELETE /listings/{id}`, `GET /listings/{id}/edit`
/// - `GET|POST /tags`, `DELETE /tags/{id}`
/// - `GET|POST /types`, `DELETE /types/{id}`

/// Authentication module
pub mod auth;

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects module
pub mod dto;

/// Error handling module
pub mod errors;

/// Listing export module
pub mod export;

/// Request body extraction module
pub mod extract;

/// Web API handlers module
pub mod handlers;

/// Bulk import module
pub mod import;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Demo data module
pub mod seed;

/// Form validation module
pub mod validation;

#[cfg(test)]
mod test_utils;

use anyhow::anyhow;
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AuthSettings;
use crate::db::DbPool;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    pub fn new(pool: Arc<DbPool>, auth: Arc<AuthSettings>) -> Self {
        Self { pool, auth }
    }
}

impl FromRef<AppState> for Arc<DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<AuthSettings> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Creates the application router with all routes configured
///
/// ### Arguments
///
/// * `state` - The connection pool and auth settings shared by handlers
///
/// ### Returns
///
/// An Axum Router configured with all API routes
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::welcome_handler))
        // Accounts
        .route("/auth/register", post(handlers::register_handler))
        .route("/auth/login", post(handlers::login_handler))
        .route("/auth/me", get(handlers::me_handler))
        .route("/dashboard", get(handlers::dashboard_handler))
        // Listings
        .route(
            "/listings",
            get(handlers::list_listings_handler).post(handlers::create_listing_handler),
        )
        .route("/listings/create", get(handlers::listing_form_options_handler))
        .route("/listings/bulk-create", get(handlers::bulk_sample_handler))
        .route("/listings/bulk", post(handlers::bulk_import_handler))
        .route("/listings/export", get(handlers::export_listings_handler))
        .route("/listings/download", post(handlers::download_listings_handler))
        .route(
            "/listings/{id}",
            get(handlers::get_listing_handler)
                .put(handlers::update_listing_handler)
                .patch(handlers::update_listing_handler)
                .delete(handlers::delete_listing_handler),
        )
        .route("/listings/{id}/edit", get(handlers::edit_listing_handler))
        // Taxonomy
        .route(
            "/tags",
            get(handlers::list_tags_handler).post(handlers::create_tags_handler),
        )
        .route("/tags/{id}", axum::routing::delete(handlers::delete_tag_handler))
        .route(
            "/types",
            get(handlers::list_types_handler).post(handlers::create_types_handler),
        )
        .route("/types/{id}", axum::routing::delete(handlers::delete_type_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs database migrations
///
/// This function runs all pending migrations embedded in the binary.
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Errors
///
/// Returns an error if a migration fails to apply
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    // Define the embedded migrations
    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    // Run all pending migrations
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;
    Ok(())
}
