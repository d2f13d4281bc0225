use crate::db::DbPool;
use crate::models::User;
use crate::repo::is_unique_violation;
use crate::schema::users;
use crate::validation::ValidationErrors;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Registers a new user
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `name` - The display name
/// * `email` - The login email
/// * `password_hash` - The already hashed password
///
/// ### Returns
///
/// A Result containing the newly created User
///
/// ### Errors
///
/// Returns a [`ValidationErrors`] on the `email` field if the email is
/// already registered, or an error if the insert fails
#[instrument(skip(pool, password_hash), fields(email = %email))]
pub fn create_user(pool: &DbPool, name: String, email: String, password_hash: String) -> Result<User> {
    if find_user_by_email(pool, &email)?.is_some() {
        debug!("Email already registered");
        return Err(email_taken().into());
    }

    let user = User::new(name, email, password_hash);
    insert_user(pool, &user)?;

    info!("Registered user {}", user.get_id());
    Ok(user)
}

fn email_taken() -> ValidationErrors {
    ValidationErrors::single("email", "The email has already been taken.")
}

/// Inserts a fully built user row
///
/// ### Errors
///
/// A duplicate email is reported as the same [`ValidationErrors`] that
/// [`create_user`] returns
pub fn insert_user(pool: &DbPool, user: &User) -> Result<()> {
    let conn = &mut pool.get()?;
    diesel::insert_into(users::table)
        .values(user)
        .execute(conn)
        .map_err(anyhow::Error::from)
        .map_err(|err| if is_unique_violation(&err) { email_taken().into() } else { err })?;
    Ok(())
}

/// Retrieves a user by ID
///
/// ### Returns
///
/// A Result containing an Option with the User if found, or None if not found
#[instrument(skip(pool))]
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a user by login email
///
/// The comparison is exact; emails are stored as submitted after trimming.
#[instrument(skip(pool))]
pub fn find_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .filter(users::email.eq(email))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}
