use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account that owns listings, tags and types
///
/// The password hash never leaves the server: it is skipped when the user
/// is serialized.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    /// Unique identifier for the user (UUID v4 as string)
    id: String,

    /// Display name
    name: String,

    /// Login email, unique across users
    email: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing, default)]
    password_hash: String,

    /// When the account was created
    created_at: NaiveDateTime,

    /// When the account was last updated
    updated_at: NaiveDateTime,
}

impl User {
    /// Creates a new user
    ///
    /// ### Arguments
    ///
    /// * `name` - The display name
    /// * `email` - The login email
    /// * `password_hash` - An already hashed password
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Gets the user's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the user's display name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Gets the user's email
    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    /// Gets the stored password hash
    pub fn get_password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Gets the account creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Gets the account's last update timestamp as a DateTime<Utc>
    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
