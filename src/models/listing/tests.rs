use super::*;
use chrono::Duration;

fn sample_input() -> ListingInput {
    ListingInput {
        name: "Frieren".to_string(),
        description: Some("After the journey".to_string()),
        author: Some("Kanehito Yamada".to_string()),
        type_id: "type-1".to_string(),
        image_url: Some("https://example.com/frieren.jpg".to_string()),
        link: None,
        tag_ids: vec!["tag-1".to_string()],
    }
}

#[test]
fn test_new_copies_input() {
    let listing = Listing::new("user-1".to_string(), &sample_input());

    assert!(Uuid::parse_str(&listing.get_id()).is_ok());
    assert_eq!(listing.get_user_id(), "user-1");
    assert_eq!(listing.get_type_id(), "type-1");
    assert_eq!(listing.get_name(), "Frieren");
    assert_eq!(listing.get_description().as_deref(), Some("After the journey"));
    assert_eq!(listing.get_author().as_deref(), Some("Kanehito Yamada"));
    assert_eq!(listing.get_image_url().as_deref(), Some("https://example.com/frieren.jpg"));
    assert_eq!(listing.get_link(), None);
    assert_eq!(listing.get_created_at(), listing.get_updated_at());
}

#[test]
fn test_apply_replaces_fields_and_bumps_updated_at() {
    let created = Utc::now() - Duration::days(2);
    let mut listing = Listing::new_with_fields(
        "listing-1".to_string(),
        "user-1".to_string(),
        "type-old".to_string(),
        "Old name".to_string(),
        Some("old".to_string()),
        None,
        None,
        Some("https://example.com/old".to_string()),
        created,
        created,
    );

    listing.apply(&sample_input());

    assert_eq!(listing.get_id(), "listing-1");
    assert_eq!(listing.get_name(), "Frieren");
    assert_eq!(listing.get_type_id(), "type-1");
    assert_eq!(listing.get_link(), None);
    assert_eq!(listing.get_created_at().timestamp(), created.timestamp());
    assert!(listing.get_updated_at() > listing.get_created_at());
}

#[test]
fn test_serializes_image_url_in_camel_case() {
    let listing = Listing::new("user-1".to_string(), &sample_input());
    let json = serde_json::to_value(&listing).unwrap();

    assert_eq!(json["imageUrl"], "https://example.com/frieren.jpg");
    assert!(json.get("image_url").is_none());
    assert_eq!(json["type_id"], "type-1");
}

#[test]
fn test_ownership() {
    let listing = Listing::new("user-1".to_string(), &sample_input());
    assert!(listing.is_owned_by("user-1"));
    assert!(!listing.is_owned_by("user-2"));
}
