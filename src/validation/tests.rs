use super::*;

fn ids(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn form() -> ListingFormDto {
    ListingFormDto {
        name: Some("Vinland Saga".to_string()),
        description: Some("A viking epic".to_string()),
        author: Some("Makoto Yukimura".to_string()),
        type_id: Some("manga".to_string()),
        image_url: Some("https://example.com/vinland.jpg".to_string()),
        link: Some("http://example.com/vinland".to_string()),
        tags: Some(vec!["history".to_string(), "action".to_string()]),
    }
}

#[test]
fn test_display_name() {
    assert_eq!(display_name("type_id"), "type id");
    assert_eq!(display_name("imageUrl"), "image url");
    assert_eq!(display_name("tags.3"), "tags.3");
    assert_eq!(display_name("name"), "name");
}

#[test]
fn test_clean_maps_blank_to_none() {
    assert_eq!(clean(Some("  hi ".to_string())), Some("hi".to_string()));
    assert_eq!(clean(Some("   ".to_string())), None);
    assert_eq!(clean(Some(String::new())), None);
    assert_eq!(clean(None), None);
}

#[test]
fn test_is_valid_url() {
    assert!(is_valid_url("https://example.com"));
    assert!(is_valid_url("http://example.com/path?q=1"));
    assert!(!is_valid_url("example.com"));
    assert!(!is_valid_url("ftp://example.com/file"));
    assert!(!is_valid_url("javascript:alert(1)"));
    assert!(!is_valid_url("not a url"));
}

#[test]
fn test_validation_errors_keeps_report_order() {
    let mut errors = ValidationErrors::new();
    assert!(errors.is_empty());
    assert_eq!(errors.to_string(), "The given data was invalid.");

    errors.add("type_id", "second");
    errors.add("name", "first");
    errors.add("name", "again");

    assert!(errors.has("name"));
    assert!(!errors.has("link"));
    assert_eq!(errors.get("name"), ["first", "again"]);
    assert!(errors.get("link").is_empty());
    assert_eq!(errors.first_message(), Some("second"));
    assert_eq!(errors.all(), vec!["second", "first", "again"]);
    assert!(errors.into_result().is_err());
}

#[test]
fn test_summary_follows_rule_order() {
    // author is checked after name, and tags.10 after tags.2
    let mut errors = ValidationErrors::new();
    errors.add("name", "The name field is required.");
    errors.add("author", "The author field must not be greater than 255 characters.");
    assert_eq!(errors.to_string(), "The name field is required.");

    let mut errors = ValidationErrors::new();
    errors.add("tags.2", "The selected tags.2 is invalid.");
    errors.add("tags.10", "The selected tags.10 is invalid.");
    assert_eq!(errors.to_string(), "The selected tags.2 is invalid.");
    let keys: Vec<String> = serde_json::to_value(&errors)
        .unwrap()
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, ["tags.2", "tags.10"]);
}

#[test]
fn test_validation_errors_deserializes_in_order() {
    let errors: ValidationErrors =
        serde_json::from_str(r#"{"link": ["bad link"], "name": ["no name", "still no name"]}"#).unwrap();
    assert_eq!(errors.first_message(), Some("bad link"));
    assert_eq!(errors.get("name"), ["no name", "still no name"]);
}

#[test]
fn test_validation_errors_serializes_as_map() {
    let errors = ValidationErrors::single("name", "The name field is required.");
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json, serde_json::json!({ "name": ["The name field is required."] }));
}

#[test]
fn test_valid_listing_form() {
    let input = validate_listing_form(form(), &ids(&["manga"]), &ids(&["history", "action"])).unwrap();

    assert_eq!(input.name, "Vinland Saga");
    assert_eq!(input.type_id, "manga");
    assert_eq!(input.tag_ids, vec!["history", "action"]);
    assert_eq!(input.link.as_deref(), Some("http://example.com/vinland"));
}

#[test]
fn test_listing_form_trims_and_nulls_blank_optionals() {
    let mut f = form();
    f.name = Some("  Vinland Saga  ".to_string());
    f.description = Some("".to_string());
    f.author = Some("   ".to_string());
    f.image_url = Some("".to_string());
    f.link = None;
    f.tags = None;

    let input = validate_listing_form(f, &ids(&["manga"]), &ids(&[])).unwrap();

    assert_eq!(input.name, "Vinland Saga");
    assert_eq!(input.description, None);
    assert_eq!(input.author, None);
    assert_eq!(input.image_url, None);
    assert!(input.tag_ids.is_empty());
}

#[test]
fn test_listing_form_requires_name_and_type() {
    let f = ListingFormDto::default();

    let errors = validate_listing_form(f, &ids(&["manga"]), &ids(&[])).unwrap_err();

    assert_eq!(errors.get("name"), ["The name field is required."]);
    assert_eq!(errors.get("type_id"), ["The type id field is required."]);
}

#[test]
fn test_listing_form_rejects_unknown_type() {
    let mut f = form();
    f.type_id = Some("someone-elses-type".to_string());

    let errors = validate_listing_form(f, &ids(&["manga"]), &ids(&["history", "action"])).unwrap_err();

    assert_eq!(errors.get("type_id"), ["The selected type id is invalid."]);
}

#[test]
fn test_listing_form_rejects_unknown_tags_by_index() {
    let mut f = form();
    f.tags = Some(vec!["history".to_string(), "ghost".to_string()]);

    let errors = validate_listing_form(f, &ids(&["manga"]), &ids(&["history"])).unwrap_err();

    assert_eq!(errors.get("tags.1"), ["The selected tags.1 is invalid."]);
    assert!(!errors.has("tags.0"));
}

#[test]
fn test_listing_form_collapses_duplicate_tags() {
    let mut f = form();
    f.tags = Some(vec!["action".to_string(), "history".to_string(), "action".to_string()]);

    let input = validate_listing_form(f, &ids(&["manga"]), &ids(&["history", "action"])).unwrap();

    assert_eq!(input.tag_ids, vec!["action", "history"]);
}

#[test]
fn test_listing_form_length_limits() {
    let mut f = form();
    f.name = Some("n".repeat(SHORT_TEXT_MAX + 1));
    f.description = Some("d".repeat(DESCRIPTION_MAX + 1));
    f.author = Some("a".repeat(SHORT_TEXT_MAX));

    let errors = validate_listing_form(f, &ids(&["manga"]), &ids(&["history", "action"])).unwrap_err();

    assert_eq!(errors.get("name"), ["The name field must not be greater than 255 characters."]);
    assert_eq!(errors.get("description"), ["The description field must not be greater than 1000 characters."]);
    assert!(!errors.has("author"));
}

#[test]
fn test_listing_form_measures_trimmed_values() {
    let mut f = form();
    f.name = Some(format!("  {}  ", "n".repeat(SHORT_TEXT_MAX)));
    f.author = Some(format!("\t{}", "a".repeat(SHORT_TEXT_MAX)));

    let input = validate_listing_form(f, &ids(&["manga"]), &ids(&["history", "action"])).unwrap();
    assert_eq!(input.name.chars().count(), SHORT_TEXT_MAX);
    assert_eq!(input.author.map(|a| a.chars().count()), Some(SHORT_TEXT_MAX));
}

#[test]
fn test_listing_form_rejects_bad_urls() {
    let mut f = form();
    f.image_url = Some("cover.jpg".to_string());
    f.link = Some(format!("https://example.com/{}", "x".repeat(250)));

    let errors = validate_listing_form(f, &ids(&["manga"]), &ids(&["history", "action"])).unwrap_err();

    assert_eq!(errors.get("imageUrl"), ["The image url field must be a valid URL."]);
    assert_eq!(errors.get("link"), ["The link field must not be greater than 255 characters."]);
}

#[test]
fn test_label_names_trimmed_in_order() {
    let names = validate_label_names(
        LabelKind::Tag,
        vec!["  Action".to_string(), "Slice of Life ".to_string()],
        &HashSet::new(),
    )
    .unwrap();

    assert_eq!(names, vec!["Action", "Slice of Life"]);
}

#[test]
fn test_label_names_required() {
    let errors = validate_label_names(LabelKind::Type, vec![], &HashSet::new()).unwrap_err();
    assert_eq!(errors.get("types"), ["The types field is required."]);

    let errors = validate_label_names(LabelKind::Type, vec!["  ".to_string()], &HashSet::new()).unwrap_err();
    assert_eq!(errors.get("types.0"), ["Type name is required"]);
}

#[test]
fn test_label_names_length_limit() {
    let at_limit = "x".repeat(LABEL_MAX);
    let over_limit = "y".repeat(LABEL_MAX + 1);

    let errors = validate_label_names(LabelKind::Tag, vec![at_limit, over_limit], &HashSet::new()).unwrap_err();

    assert!(!errors.has("tags.0"));
    assert_eq!(errors.get("tags.1"), ["Tag name cannot be longer than 30 characters"]);
}

#[test]
fn test_label_names_reject_existing_and_repeated() {
    let existing = ids(&["Action"]);

    let errors = validate_label_names(
        LabelKind::Tag,
        vec!["Action".to_string(), "Drama".to_string(), "Drama ".to_string()],
        &existing,
    )
    .unwrap_err();

    assert_eq!(errors.get("tags.0"), ["Tag \"Action\" already exists"]);
    assert!(!errors.has("tags.1"));
    assert_eq!(errors.get("tags.2"), ["Tag \"Drama\" already exists"]);
}

fn registration(name: &str, email: &str, password: &str) -> RegisterDto {
    RegisterDto {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        password: Some(password.to_string()),
    }
}

#[test]
fn test_registration_accepts_and_trims() {
    let accepted = validate_registration(registration(" Ann ", " ann@example.com", "hunter22")).unwrap();

    assert_eq!(accepted.name, "Ann");
    assert_eq!(accepted.email, "ann@example.com");
    assert_eq!(accepted.password, "hunter22");
}

#[test]
fn test_registration_requires_every_field() {
    let errors = validate_registration(RegisterDto::default()).unwrap_err();

    assert_eq!(errors.get("name"), ["The name field is required."]);
    assert_eq!(errors.get("email"), ["The email field is required."]);
    assert_eq!(errors.get("password"), ["The password field is required."]);
}

#[test]
fn test_registration_rules() {
    let errors = validate_registration(registration(&"n".repeat(256), "not-an-email", "short")).unwrap_err();

    assert_eq!(errors.get("name"), ["The name field must not be greater than 255 characters."]);
    assert_eq!(errors.get("email"), ["The email field must be a valid email address."]);
    assert_eq!(errors.get("password"), ["The password field must be at least 8 characters."]);
}
