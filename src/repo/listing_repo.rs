use std::collections::HashMap;

use crate::db::{with_retry, DbPool};
use crate::dto::{ListingInput, ListingQueryDto};
use crate::models::{Listing, ListingDetails, ListingTag, ListingType, Tag};
use crate::repo::RepoError;
use crate::schema::{listing_tags, listings, tags, types};
use anyhow::Result;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

/// Inserts a listing row together with its pivot rows
///
/// Runs on the caller's connection so it can be part of a larger
/// transaction.
fn insert_listing_with_tags(conn: &mut SqliteConnection, listing: &Listing, tag_ids: &[String]) -> QueryResult<()> {
    diesel::insert_into(listings::table)
        .values(listing)
        .execute(conn)?;

    let rows: Vec<ListingTag> = tag_ids
        .iter()
        .map(|tag_id| ListingTag::new(listing.get_id(), tag_id.clone()))
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(listing_tags::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

/// Makes a listing's tag set exactly `tag_ids`
///
/// Rows for tags that stay attached are left alone, so their `created_at`
/// survives an update.
fn sync_tags(conn: &mut SqliteConnection, listing_id: &str, tag_ids: &[String]) -> QueryResult<()> {
    diesel::delete(
        listing_tags::table
            .filter(listing_tags::listing_id.eq(listing_id))
            .filter(listing_tags::tag_id.ne_all(tag_ids)),
    )
    .execute(conn)?;

    let attached: Vec<String> = listing_tags::table
        .filter(listing_tags::listing_id.eq(listing_id))
        .select(listing_tags::tag_id)
        .load(conn)?;

    let rows: Vec<ListingTag> = tag_ids
        .iter()
        .filter(|id| !attached.contains(id))
        .map(|id| ListingTag::new(listing_id.to_string(), id.clone()))
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(listing_tags::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

/// Loads the type and tags for a batch of listings
///
/// Order of `listings` is preserved. A listing whose type row is missing
/// gets `None` rather than failing the whole batch.
fn load_details(conn: &mut SqliteConnection, listings: Vec<Listing>) -> QueryResult<Vec<ListingDetails>> {
    let listing_ids: Vec<String> = listings.iter().map(Listing::get_id).collect();
    let mut type_ids: Vec<String> = listings.iter().map(Listing::get_type_id).collect();
    type_ids.sort();
    type_ids.dedup();

    let tag_rows: Vec<(String, Tag)> = listing_tags::table
        .inner_join(tags::table)
        .filter(listing_tags::listing_id.eq_any(&listing_ids))
        .order(tags::name.asc())
        .select((listing_tags::listing_id, Tag::as_select()))
        .load(conn)?;

    let mut tags_by_listing: HashMap<String, Vec<Tag>> = HashMap::new();
    for (listing_id, tag) in tag_rows {
        tags_by_listing.entry(listing_id).or_default().push(tag);
    }

    let types_by_id: HashMap<String, ListingType> = types::table
        .filter(types::id.eq_any(&type_ids))
        .select(ListingType::as_select())
        .load(conn)?
        .into_iter()
        .map(|t| (t.get_id(), t))
        .collect();

    Ok(listings
        .into_iter()
        .map(|listing| {
            let listing_type = types_by_id.get(&listing.get_type_id()).cloned();
            let tags = tags_by_listing.remove(&listing.get_id()).unwrap_or_default();
            ListingDetails::new(listing, listing_type, tags)
        })
        .collect())
}

/// Creates a listing and attaches its tags in one transaction
///
/// The input is expected to have passed form validation for `user_id`.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owner of the new listing
/// * `input` - The validated listing form
///
/// ### Returns
///
/// A Result containing the newly created Listing
#[instrument(skip(pool, input), fields(name = %input.name))]
pub async fn create_listing(pool: &DbPool, user_id: &str, input: ListingInput) -> Result<Listing> {
    let listing = Listing::new(user_id.to_string(), &input);

    with_retry(|| {
        let conn = &mut pool.get()?;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            insert_listing_with_tags(conn, &listing, &input.tag_ids)?;
            Ok(())
        })
    })
    .await?;

    info!("Created listing {} with {} tags", listing.get_id(), input.tag_ids.len());
    Ok(listing)
}

/// Creates many listings in one transaction
///
/// Either every listing is written or none is.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `batch` - Each listing paired with the IDs of the tags to attach
///
/// ### Returns
///
/// The number of listings written
#[instrument(skip(pool, batch), fields(count = batch.len()))]
pub async fn create_listings(pool: &DbPool, batch: &[(Listing, Vec<String>)]) -> Result<usize> {
    with_retry(|| {
        let conn = &mut pool.get()?;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            for (listing, tag_ids) in batch {
                insert_listing_with_tags(conn, listing, tag_ids)?;
            }
            Ok(())
        })
    })
    .await?;

    info!("Created {} listings in one batch", batch.len());
    Ok(batch.len())
}

/// Retrieves a listing by ID, regardless of owner
pub fn get_listing(pool: &DbPool, listing_id: &str) -> Result<Option<Listing>> {
    let conn = &mut pool.get()?;

    let result = listings::table
        .find(listing_id)
        .select(Listing::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a listing that must belong to `user_id`
///
/// ### Errors
///
/// Returns [`RepoError::NotFound`] if the listing does not exist and
/// [`RepoError::Forbidden`] if another user owns it
pub fn get_owned_listing(pool: &DbPool, user_id: &str, listing_id: &str) -> Result<Listing> {
    let listing = get_listing(pool, listing_id)?.ok_or(RepoError::NotFound)?;
    if !listing.is_owned_by(user_id) {
        debug!("Listing {} is not owned by {}", listing_id, user_id);
        return Err(RepoError::Forbidden.into());
    }
    Ok(listing)
}

/// Retrieves a listing with its type and tags loaded
pub fn get_listing_details(pool: &DbPool, listing_id: &str) -> Result<Option<ListingDetails>> {
    let Some(listing) = get_listing(pool, listing_id)? else {
        return Ok(None);
    };

    let conn = &mut pool.get()?;
    let mut details = load_details(conn, vec![listing])?;
    Ok(details.pop())
}

/// Lists a user's listings, newest first, with types and tags loaded
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - Whose listings to return
/// * `filter` - Name search and tag/type filters; an empty filter keeps all
#[instrument(skip(pool, filter))]
pub fn list_listing_details(pool: &DbPool, user_id: &str, filter: &ListingQueryDto) -> Result<Vec<ListingDetails>> {
    let conn = &mut pool.get()?;

    let rows: Vec<Listing> = listings::table
        .filter(listings::user_id.eq(user_id))
        .order((listings::created_at.desc(), listings::id.desc()))
        .select(Listing::as_select())
        .load(conn)?;

    let details = load_details(conn, rows)?;
    if filter.is_empty() {
        debug!("Loaded {} listings", details.len());
        return Ok(details);
    }

    let filtered: Vec<ListingDetails> = details.into_iter().filter(|d| filter.matches(d)).collect();
    debug!("Loaded {} listings after filtering", filtered.len());
    Ok(filtered)
}

/// Counts a user's listings
pub fn count_listings(pool: &DbPool, user_id: &str) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = listings::table
        .filter(listings::user_id.eq(user_id))
        .count()
        .get_result(conn)?;

    Ok(count)
}

/// Updates a listing's fields and replaces its tag set
///
/// ### Errors
///
/// Returns [`RepoError::NotFound`] or [`RepoError::Forbidden`] as
/// [`get_owned_listing`] does
#[instrument(skip(pool, input))]
pub async fn update_listing(pool: &DbPool, user_id: &str, listing_id: &str, input: ListingInput) -> Result<Listing> {
    let mut listing = get_owned_listing(pool, user_id, listing_id)?;
    listing.apply(&input);

    #[derive(AsChangeset)]
    #[diesel(table_name = listings)]
    #[diesel(treat_none_as_null = true)]
    struct ListingChanges {
        type_id: String,
        name: String,
        description: Option<String>,
        author: Option<String>,
        image_url: Option<String>,
        link: Option<String>,
        updated_at: NaiveDateTime,
    }

    let changes = ListingChanges {
        type_id: listing.get_type_id(),
        name: listing.get_name(),
        description: listing.get_description(),
        author: listing.get_author(),
        image_url: listing.get_image_url(),
        link: listing.get_link(),
        updated_at: listing.get_updated_at().naive_utc(),
    };

    with_retry(|| {
        let conn = &mut pool.get()?;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            diesel::update(listings::table.find(listing_id))
                .set(&changes)
                .execute(conn)?;
            sync_tags(conn, listing_id, &input.tag_ids)?;
            Ok(())
        })
    })
    .await?;

    info!("Updated listing {}", listing_id);
    Ok(listing)
}

/// Deletes a listing owned by `user_id` along with its pivot rows
#[instrument(skip(pool))]
pub async fn delete_listing(pool: &DbPool, user_id: &str, listing_id: &str) -> Result<()> {
    get_owned_listing(pool, user_id, listing_id)?;

    with_retry(|| {
        let conn = &mut pool.get()?;
        diesel::delete(listings::table.find(listing_id)).execute(conn)?;
        anyhow::Ok(())
    })
    .await?;

    info!("Deleted listing {}", listing_id);
    Ok(())
}
