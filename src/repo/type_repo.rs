use std::collections::HashSet;

use crate::db::{with_retry, DbPool};
use crate::models::ListingType;
use crate::repo::{is_unique_violation, RepoError};
use crate::schema::{listings, types};
use crate::validation::{validate_label_names, LabelKind};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a batch of types for a user
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owner of the new types
/// * `names` - The submitted type names, untrimmed
///
/// ### Returns
///
/// A Result containing the created types in submission order
///
/// ### Errors
///
/// Returns a [`ValidationErrors`](crate::validation::ValidationErrors) if
/// any name is rejected; nothing is inserted in that case
#[instrument(skip(pool, names), fields(count = names.len()))]
pub async fn create_types(pool: &DbPool, user_id: &str, names: Vec<String>) -> Result<Vec<ListingType>> {
    let existing: HashSet<String> = list_types(pool, user_id)?
        .into_iter()
        .map(|row| row.get_name())
        .collect();

    insert_types(pool, user_id, names, &existing).await
}

/// Validates `names` against `existing` and inserts them
///
/// A name taken after `existing` was read trips the `UNIQUE` index; the
/// batch is then re-validated against the current rows so the caller sees
/// the usual per-name message.
async fn insert_types(
    pool: &DbPool,
    user_id: &str,
    names: Vec<String>,
    existing: &HashSet<String>,
) -> Result<Vec<ListingType>> {
    let accepted = validate_label_names(LabelKind::Type, names.clone(), existing)?;
    let new_types: Vec<ListingType> = accepted
        .into_iter()
        .map(|name| ListingType::new(user_id.to_string(), name))
        .collect();

    let inserted = with_retry(|| {
        let conn = &mut pool.get()?;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            diesel::insert_into(types::table)
                .values(&new_types)
                .execute(conn)?;
            Ok(())
        })
    })
    .await;

    if let Err(err) = inserted {
        if is_unique_violation(&err) {
            let current: HashSet<String> = list_types(pool, user_id)?
                .into_iter()
                .map(|row| row.get_name())
                .collect();
            validate_label_names(LabelKind::Type, names, &current)?;
        }
        return Err(err);
    }

    info!("Created {} types", new_types.len());
    Ok(new_types)
}

/// Retrieves a type by ID, regardless of owner
pub fn get_type(pool: &DbPool, type_id: &str) -> Result<Option<ListingType>> {
    let conn = &mut pool.get()?;

    let result = types::table
        .find(type_id)
        .select(ListingType::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists a user's types ordered by name
#[instrument(skip(pool))]
pub fn list_types(pool: &DbPool, user_id: &str) -> Result<Vec<ListingType>> {
    let conn = &mut pool.get()?;

    let result = types::table
        .filter(types::user_id.eq(user_id))
        .order(types::name.asc())
        .select(ListingType::as_select())
        .load(conn)?;

    debug!("Loaded {} types", result.len());
    Ok(result)
}

/// Looks up one of a user's types by exact name
pub fn find_type_by_name(pool: &DbPool, user_id: &str, name: &str) -> Result<Option<ListingType>> {
    let conn = &mut pool.get()?;

    let result = types::table
        .filter(types::user_id.eq(user_id))
        .filter(types::name.eq(name))
        .select(ListingType::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Counts a user's types
pub fn count_types(pool: &DbPool, user_id: &str) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = types::table
        .filter(types::user_id.eq(user_id))
        .count()
        .get_result(conn)?;

    Ok(count)
}

/// Counts the listings that reference a type
pub fn count_listings_for_type(pool: &DbPool, type_id: &str) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = listings::table
        .filter(listings::type_id.eq(type_id))
        .count()
        .get_result(conn)?;

    Ok(count)
}

fn in_use_message(name: &str, count: i64) -> String {
    let noun = if count == 1 { "listing" } else { "listings" };
    format!("Type \"{}\" cannot be deleted because it is used by {} {}.", name, count, noun)
}

/// Deletes a type owned by `user_id`
///
/// A type that still has listings is kept; the usage check and the delete
/// run in the same transaction.
///
/// ### Errors
///
/// Returns [`RepoError::NotFound`] if the type does not exist,
/// [`RepoError::Forbidden`] if it belongs to another user, and
/// [`RepoError::Conflict`] if listings still use it
#[instrument(skip(pool))]
pub async fn delete_type(pool: &DbPool, user_id: &str, type_id: &str) -> Result<()> {
    let listing_type = get_type(pool, type_id)?.ok_or(RepoError::NotFound)?;
    if !listing_type.is_owned_by(user_id) {
        return Err(RepoError::Forbidden.into());
    }

    with_retry(|| {
        let conn = &mut pool.get()?;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            let in_use: i64 = listings::table
                .filter(listings::type_id.eq(type_id))
                .count()
                .get_result(conn)?;
            if in_use > 0 {
                debug!("Type {} still used by {} listings", type_id, in_use);
                return Err(RepoError::Conflict(in_use_message(&listing_type.get_name(), in_use)).into());
            }

            diesel::delete(types::table.find(type_id)).execute(conn)?;
            Ok(())
        })
    })
    .await?;

    info!("Deleted type {}", type_id);
    Ok(())
}
