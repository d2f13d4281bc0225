use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined label attached to listings
///
/// Tag names are unique per user.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Tag {
    /// Unique identifier for the tag (UUID v4 as string)
    id: String,

    /// The user who owns the tag
    user_id: String,

    /// The name of the tag
    name: String,

    /// When this tag was created
    created_at: NaiveDateTime,

    /// When this tag was last updated
    updated_at: NaiveDateTime,
}

impl Tag {
    /// Creates a new tag owned by `user_id`
    ///
    /// ### Arguments
    ///
    /// * `user_id` - The owner of the tag
    /// * `name` - The name of the tag
    ///
    /// ### Returns
    ///
    /// A new `Tag` instance with a fresh ID and timestamps
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

    /// Creates a tag with all fields specified
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

    /// Gets the tag's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the ID of the user owning the tag
    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    /// Gets the tag's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Returns true if the tag belongs to `user_id`
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Gets the tag's creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Gets the tag's last update timestamp as a DateTime<Utc>
    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
