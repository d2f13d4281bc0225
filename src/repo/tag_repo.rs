use std::collections::HashSet;

use crate::db::{with_retry, DbPool};
use crate::models::Tag;
use crate::repo::{is_unique_violation, RepoError};
use crate::schema::tags;
use crate::validation::{validate_label_names, LabelKind};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a batch of tags for a user
///
/// The names are validated together and inserted in one transaction, so
/// either every tag is created or none is.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owner of the new tags
/// * `names` - The submitted tag names, untrimmed
///
/// ### Returns
///
/// A Result containing the created tags in submission order
///
/// ### Errors
///
/// Returns a [`ValidationErrors`](crate::validation::ValidationErrors) if
/// any name is blank, too long, or already taken, or an error if the
/// insert fails
#[instrument(skip(pool, names), fields(count = names.len()))]
pub async fn create_tags(pool: &DbPool, user_id: &str, names: Vec<String>) -> Result<Vec<Tag>> {
    let existing: HashSet<String> = list_tags(pool, user_id)?
        .into_iter()
        .map(|row| row.get_name())
        .collect();

    insert_tags(pool, user_id, names, &existing).await
}

/// Validates `names` against `existing` and inserts them
///
/// A name taken after `existing` was read trips the `UNIQUE` index; the
/// batch is then re-validated against the current rows so the caller sees
/// the usual per-name message.
async fn insert_tags(
    pool: &DbPool,
    user_id: &str,
    names: Vec<String>,
    existing: &HashSet<String>,
) -> Result<Vec<Tag>> {
    let accepted = validate_label_names(LabelKind::Tag, names.clone(), existing)?;
    let new_tags: Vec<Tag> = accepted
        .into_iter()
        .map(|name| Tag::new(user_id.to_string(), name))
        .collect();

    let inserted = with_retry(|| {
        let conn = &mut pool.get()?;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            diesel::insert_into(tags::table)
                .values(&new_tags)
                .execute(conn)?;
            Ok(())
        })
    })
    .await;

    if let Err(err) = inserted {
        if is_unique_violation(&err) {
            let current: HashSet<String> = list_tags(pool, user_id)?
                .into_iter()
                .map(|row| row.get_name())
                .collect();
            validate_label_names(LabelKind::Tag, names, &current)?;
        }
        return Err(err);
    }

    info!("Created {} tags", new_tags.len());
    Ok(new_tags)
}

/// Retrieves a tag by ID, regardless of owner
///
/// ### Returns
///
/// A Result containing an Option with the Tag if found
pub fn get_tag(pool: &DbPool, tag_id: &str) -> Result<Option<Tag>> {
    let conn = &mut pool.get()?;

    let result = tags::table
        .find(tag_id)
        .select(Tag::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists a user's tags ordered by name
#[instrument(skip(pool))]
pub fn list_tags(pool: &DbPool, user_id: &str) -> Result<Vec<Tag>> {
    let conn = &mut pool.get()?;

    let result = tags::table
        .filter(tags::user_id.eq(user_id))
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(conn)?;

    debug!("Loaded {} tags", result.len());
    Ok(result)
}

/// Looks up a user's tags by exact name
///
/// Names with no matching tag are simply absent from the result.
pub fn find_tags_by_names(pool: &DbPool, user_id: &str, names: &[String]) -> Result<Vec<Tag>> {
    let conn = &mut pool.get()?;

    let result = tags::table
        .filter(tags::user_id.eq(user_id))
        .filter(tags::name.eq_any(names))
        .select(Tag::as_select())
        .load(conn)?;

    Ok(result)
}

/// Counts a user's tags
pub fn count_tags(pool: &DbPool, user_id: &str) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = tags::table
        .filter(tags::user_id.eq(user_id))
        .count()
        .get_result(conn)?;

    Ok(count)
}

/// Deletes a tag owned by `user_id`
///
/// The tag is detached from every listing; the pivot rows go with it.
///
/// ### Errors
///
/// Returns [`RepoError::NotFound`] if the tag does not exist and
/// [`RepoError::Forbidden`] if it belongs to another user
#[instrument(skip(pool))]
pub async fn delete_tag(pool: &DbPool, user_id: &str, tag_id: &str) -> Result<()> {
    let tag = get_tag(pool, tag_id)?.ok_or(RepoError::NotFound)?;
    if !tag.is_owned_by(user_id) {
        return Err(RepoError::Forbidden.into());
    }

    with_retry(|| {
        let conn = &mut pool.get()?;
        diesel::delete(tags::table.find(tag_id)).execute(conn)?;
        anyhow::Ok(())
    })
    .await?;

    info!("Deleted tag {}", tag_id);
    Ok(())
}
