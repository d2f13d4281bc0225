use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined category for listings, e.g. "Anime" or "Manga"
///
/// Maps to the `types` table. Type names are unique per user and each
/// listing belongs to exactly one type.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ListingType {
    /// Unique identifier for the type (UUID v4 as string)
    id: String,

    /// The user who owns the type
    user_id: String,

    /// The name of this type
    name: String,

    /// When this type was created
    created_at: NaiveDateTime,

    /// When this type was last updated
    updated_at: NaiveDateTime,
}

impl ListingType {
    /// Creates a new type owned by `user_id`
    ///
    /// ### Arguments
    ///
    /// * `user_id` - The owner of the type
    /// * `name` - The name of the type
    pub fn new(user_id: String, name: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a type with all fields specified
    ///
    /// ### Returns
    ///
    /// A new `ListingType` instance with the specified fields
    pub fn new_with_fields(
        id: String,
        user_id: String,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            created_at: created_at.naive_utc(),
            updated_at: updated_at.naive_utc(),
        }
    }

    /// Gets the type's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the ID of the user owning the type
    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    /// Gets the type's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Returns true if the type belongs to `user_id`
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Gets the type's creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Gets the type's last update timestamp as a DateTime<Utc>
    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
