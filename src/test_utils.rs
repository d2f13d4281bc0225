use crate::*;
use chrono::{DateTime, Utc};
use diesel::sql_types::Text;
use diesel::{QueryableByName, RunQueryDsl};
use proptest::prelude::*;

use crate::repo::tests::setup_test_db;

#[derive(QueryableByName, Debug)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Tests the setup_test_db function
///
/// This test verifies that:
/// 1. The test database can be created and connected to
/// 2. The migrations created every table
/// 3. Foreign keys are enforced on pooled connections
#[tokio::test]
async fn test_setup_test_db() {
    let pool = setup_test_db();
    let mut conn = pool.get().unwrap();

    let table_names: Vec<TableName> =
        diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
            .load(&mut conn)
            .expect("Failed to load table names");
    let names: Vec<&str> = table_names.iter().map(|t| t.name.as_str()).collect();

    for expected in ["users", "types", "tags", "listings", "listing_tags"] {
        assert!(names.contains(&expected), "missing table {} in {:?}", expected, names);
    }

    let orphan = diesel::sql_query(
        "INSERT INTO tags (id, user_id, name, created_at, updated_at) \
         VALUES ('t', 'no-such-user', 'x', '2024-01-01 00:00:00', '2024-01-01 00:00:00')",
    )
    .execute(&mut conn);
    assert!(orphan.is_err(), "foreign keys should be enforced");
}

/// Tests that the router answers on a fresh database
#[tokio::test]
async fn test_app_serves_welcome() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    let pool = setup_test_db();
    let auth = Arc::new(auth::AuthSettings::new("secret".to_string(), std::time::Duration::from_secs(60), 4));
    let app = create_app(AppState::new(pool, auth));

    let request = Request::builder().uri("/").method("GET").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Generates an arbitrary DateTime<Utc> within 2020-01-01 to 2030-01-01
pub fn arb_datetime_utc() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64)
        .prop_map(|ts| DateTime::from_timestamp(ts, 0).unwrap())
}

/// Generates strings with padding, unicode and control characters
pub fn arb_messy_string() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}",
        "\\PC{0,40}",
        "[ ]{0,3}[a-zA-Z0-9_\\-]{1,20}[ ]{0,3}",
        ".{0,20}",
    ]
}

/// Generates a batch of distinct tag or type names that pass validation
pub fn arb_label_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[A-Za-z][A-Za-z0-9]{0,20}", 1..6)
        .prop_map(|set| set.into_iter().collect())
}
