/// Demo data for a fresh database
///
/// Creates a test account with a taxonomy and a handful of tagged listings.
/// Running it again is a no-op once the test account exists.
use anyhow::Result;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{info, instrument};

use crate::auth::AuthSettings;
use crate::db::DbPool;
use crate::dto::ListingInput;
use crate::models::{Listing, ListingType, Tag};
use crate::repo;

pub const TEST_USER_NAME: &str = "Test User";
pub const TEST_USER_EMAIL: &str = "test@example.com";
pub const TEST_USER_PASSWORD: &str = "password";

pub const TYPE_NAMES: [&str; 10] = [
    "Anime",
    "Manga",
    "Movie",
    "Series",
    "Novel",
    "Light Novel",
    "Manhwa",
    "Game",
    "Documentary",
    "OVA",
];

pub const TAG_NAMES: [&str; 20] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Fantasy",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Sports",
    "Thriller",
    "Supernatural",
    "Psychological",
    "Historical",
    "Mecha",
    "Music",
    "Isekai",
    "Cyberpunk",
    "Post-Apocalyptic",
];

/// (name, author, description) of the seeded listings
const LISTINGS: [(&str, &str, &str); 5] = [
    ("Cowboy Bebop", "Shinichiro Watanabe", "Bounty hunters drift through the solar system."),
    ("Berserk", "Kentaro Miura", "A mercenary's long struggle against fate."),
    ("Spirited Away", "Hayao Miyazaki", "A girl is trapped in a world of spirits."),
    ("Solo Leveling", "Chugong", "The weakest hunter finds a way to level up."),
    ("Steins;Gate", "Chiyomaru Shikura", "A self-proclaimed mad scientist meddles with time."),
];

/// What a seeding run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created { listings: usize },
    AlreadySeeded,
}

/// Builds the demo listings for `user_id`
///
/// Types are handed out in turn and each listing gets two to five distinct
/// random tags.
pub fn plan_listings<R: Rng>(
    user_id: &str,
    types: &[ListingType],
    tags: &[Tag],
    rng: &mut R,
) -> Vec<(Listing, Vec<String>)> {
    LISTINGS
        .iter()
        .enumerate()
        .filter_map(|(index, (name, author, description))| {
            let listing_type = types.get(index % types.len().max(1))?;
            let count = rng.random_range(2..=5).min(tags.len());
            let tag_ids: Vec<String> = tags.choose_multiple(rng, count).map(Tag::get_id).collect();

            let input = ListingInput {
                name: name.to_string(),
                description: Some(description.to_string()),
                author: Some(author.to_string()),
                type_id: listing_type.get_id(),
                image_url: None,
                link: None,
                tag_ids: tag_ids.clone(),
            };
            Some((Listing::new(user_id.to_string(), &input), tag_ids))
        })
        .collect()
}

/// Seeds the demo account and its data
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `auth` - Used to hash the test account's password
///
/// ### Returns
///
/// [`SeedOutcome::AlreadySeeded`] when the test account exists already
#[instrument(skip(pool, auth))]
pub async fn seed(pool: &DbPool, auth: &AuthSettings) -> Result<SeedOutcome> {
    if repo::find_user_by_email(pool, TEST_USER_EMAIL)?.is_some() {
        info!("Test user already present, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let hash = auth.hash_password(TEST_USER_PASSWORD)?;
    let user = repo::create_user(pool, TEST_USER_NAME.to_string(), TEST_USER_EMAIL.to_string(), hash)?;
    let user_id = user.get_id();

    let types = repo::create_types(pool, &user_id, TYPE_NAMES.iter().map(|s| s.to_string()).collect()).await?;
    let tags = repo::create_tags(pool, &user_id, TAG_NAMES.iter().map(|s| s.to_string()).collect()).await?;

    let batch = plan_listings(&user_id, &types, &tags, &mut rand::rng());
    let listings = repo::create_listings(pool, &batch).await?;

    info!("Seeded {} types, {} tags and {} listings", types.len(), tags.len(), listings);
    Ok(SeedOutcome::Created { listings })
}
