use super::*;
use crate::repo::tests::{create_test_user, setup_test_db};
use crate::AppState;
use axum::http::Request;
use jsonwebtoken::{encode, EncodingKey, Header};

fn settings(secret: &str) -> AuthSettings {
    AuthSettings::new(secret.to_string(), Duration::from_secs(3600), 4)
}

fn signed(secret: &str, claims: &Claims) -> String {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

fn parts_with(header: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/auth/me");
    if let Some(value) = header {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(()).unwrap().into_parts().0
}

#[test]
fn test_hash_and_verify_password() {
    let auth = settings("secret");
    let hash = auth.hash_password("correct horse").unwrap();

    assert_ne!(hash, "correct horse");
    assert!(auth.verify_password("correct horse", &hash));
    assert!(!auth.verify_password("battery staple", &hash));
}

#[test]
fn test_verify_password_with_malformed_hash() {
    assert!(!settings("secret").verify_password("password", "not-a-bcrypt-hash"));
}

#[test]
fn test_issue_and_verify_token() {
    let auth = settings("secret");
    let token = auth.issue_token("user-1").unwrap();

    let claims = auth.verify_token(&token).unwrap();

    assert_eq!(claims.sub, "user-1");
    assert_eq!(claims.iss, ISSUER);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_token_from_other_secret_rejected() {
    let token = settings("secret-a").issue_token("user-1").unwrap();
    assert!(settings("secret-b").verify_token(&token).is_err());
}

#[test]
fn test_expired_token_rejected() {
    let now = Utc::now().timestamp();
    let claims = Claims { sub: "user-1".to_string(), iat: now - 120, exp: now - 60, iss: ISSUER.to_string() };

    assert!(settings("secret").verify_token(&signed("secret", &claims)).is_err());
}

#[test]
fn test_foreign_issuer_rejected() {
    let now = Utc::now().timestamp();
    let claims = Claims { sub: "user-1".to_string(), iat: now, exp: now + 60, iss: "someone-else".to_string() };

    assert!(settings("secret").verify_token(&signed("secret", &claims)).is_err());
}

#[test]
fn test_ttl_seconds() {
    let auth = AuthSettings::new("s".to_string(), Duration::from_secs(90 * 60), 4);
    assert_eq!(auth.ttl_seconds(), 5400);
}

#[test]
fn test_debug_hides_secret() {
    let printed = format!("{:?}", settings("super-secret-value"));
    assert!(!printed.contains("super-secret-value"));
    assert!(printed.contains("<redacted>"));
}

#[test]
fn test_generate_secret() {
    let a = generate_secret();
    let b = generate_secret();

    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(a, b);
}

#[test]
fn test_extract_bearer_token() {
    let parts = parts_with(Some("Bearer abc.def.ghi"));
    assert_eq!(extract_bearer_token(&parts.headers), Some("abc.def.ghi"));

    assert_eq!(extract_bearer_token(&parts_with(Some("Basic dXNlcjpwYXNz")).headers), None);
    assert_eq!(extract_bearer_token(&parts_with(Some("Bearer   ")).headers), None);
    assert_eq!(extract_bearer_token(&parts_with(None).headers), None);
}

#[tokio::test]
async fn test_extractor_resolves_user() {
    let pool = setup_test_db();
    let user = create_test_user(&pool, "ann@example.com");
    let auth = Arc::new(settings("secret"));
    let token = auth.issue_token(&user.get_id()).unwrap();
    let state = AppState::new(pool, auth);

    let mut parts = parts_with(Some(&format!("Bearer {}", token)));
    let resolved = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();

    assert_eq!(resolved.id(), user.get_id());
    assert_eq!(resolved.user().get_email(), "ann@example.com");
}

#[tokio::test]
async fn test_extractor_rejects_missing_header() {
    let state = AppState::new(setup_test_db(), Arc::new(settings("secret")));

    let mut parts = parts_with(None);
    let err = AuthUser::from_request_parts(&mut parts, &state).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Unauthenticated."));
}

#[tokio::test]
async fn test_extractor_rejects_bad_token() {
    let state = AppState::new(setup_test_db(), Arc::new(settings("secret")));

    let mut parts = parts_with(Some("Bearer not-a-token"));
    let err = AuthUser::from_request_parts(&mut parts, &state).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized(_)));
}

#[tokio::test]
async fn test_extractor_rejects_deleted_user() {
    let auth = Arc::new(settings("secret"));
    let token = auth.issue_token("no-such-user").unwrap();
    let state = AppState::new(setup_test_db(), auth);

    let mut parts = parts_with(Some(&format!("Bearer {}", token)));
    let err = AuthUser::from_request_parts(&mut parts, &state).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized(_)));
}
