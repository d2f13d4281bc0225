use super::*;
use crate::dto::ListingInput;
use crate::models::Listing;
use proptest::prelude::*;

fn listing_named(name: &str, tag_names: &[String]) -> ListingDetails {
    let input = ListingInput {
        name: name.to_string(),
        description: None,
        author: None,
        type_id: "t".to_string(),
        image_url: None,
        link: None,
        tag_ids: vec![],
    };
    let tags = tag_names
        .iter()
        .map(|n| Tag::new("u".to_string(), n.clone()))
        .collect();
    ListingDetails::new(Listing::new("u".to_string(), &input), None, tags)
}

proptest! {
    /// The default query matches every listing
    #[test]
    fn prop_empty_query_matches_all(name in "[a-zA-Z ]{1,30}") {
        prop_assert!(ListingQueryDto::default().matches(&listing_named(&name, &[])));
    }

    /// Any substring of the name, in any case, is a search hit
    #[test]
    fn prop_search_substring_hits(
        name in "[a-zA-Z]{5,30}",
        range in (0usize..3, 0usize..3),
        upper in any::<bool>(),
    ) {
        let start = range.0;
        let end = name.len() - range.1;
        let needle = &name[start..end];
        let needle = if upper { needle.to_uppercase() } else { needle.to_lowercase() };

        let query = ListingQueryDto { search: Some(needle), ..Default::default() };
        prop_assert!(query.matches(&listing_named(&name, &[])));
    }

    /// Filtering on one of a listing's own tag names, in any case, keeps it
    #[test]
    fn prop_own_tag_name_hits(
        tags in prop::collection::vec("[a-z]{1,10}", 1..5),
        pick in any::<prop::sample::Index>(),
    ) {
        let wanted = tags[pick.index(tags.len())].to_uppercase();
        let query = ListingQueryDto { tags: vec![wanted], ..Default::default() };
        prop_assert!(query.matches(&listing_named("x", &tags)));
    }
}
