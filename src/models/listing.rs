use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::ListingInput;

/// A catalogued media entry owned by a user
///
/// Every listing belongs to one type and carries any number of tags through
/// the `listing_tags` pivot table.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::listings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Listing {
    /// Unique identifier for the listing (UUID v4 as string)
    id: String,

    /// The user who owns the listing
    user_id: String,

    /// The type this listing belongs to
    type_id: String,

    /// Title of the entry
    name: String,

    /// Free-text description
    description: Option<String>,

    /// Author or studio
    author: Option<String>,

    /// Cover image URL
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,

    /// External link for the entry
    link: Option<String>,

    /// When this listing was created
    created_at: NaiveDateTime,

    /// When this listing was last updated
    updated_at: NaiveDateTime,
}

impl Listing {
    /// Creates a new listing for `user_id` from validated input
    ///
    /// Tag IDs in the input are not part of the row; the repository writes
    /// them to the pivot table.
    pub fn new(user_id: String, input: &ListingInput) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            type_id: input.type_id.clone(),
            name: input.name.clone(),
            description: input.description.clone(),
            author: input.author.clone(),
            image_url: input.image_url.clone(),
            link: input.link.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a listing with all fields specified
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_fields(
        id: String,
        user_id: String,
        type_id: String,
        name: String,
        description: Option<String>,
        author: Option<String>,
        image_url: Option<String>,
        link: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            type_id,
            name,
            description,
            author,
            image_url,
            link,
            created_at: created_at.naive_utc(),
            updated_at: updated_at.naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_type_id(&self) -> String {
        self.type_id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_description(&self) -> Option<String> {
        self.description.clone()
    }

    pub fn get_author(&self) -> Option<String> {
        self.author.clone()
    }

    pub fn get_image_url(&self) -> Option<String> {
        self.image_url.clone()
    }

    pub fn get_link(&self) -> Option<String> {
        self.link.clone()
    }

    /// Returns true if the listing belongs to `user_id`
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Gets the creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Gets the last update timestamp as a DateTime<Utc>
    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }

    /// Overwrites the editable fields with validated input and bumps
    /// `updated_at`
    pub fn apply(&mut self, input: &ListingInput) {
        self.type_id = input.type_id.clone();
        self.name = input.name.clone();
        self.description = input.description.clone();
        self.author = input.author.clone();
        self.image_url = input.image_url.clone();
        self.link = input.link.clone();
        self.updated_at = Utc::now().naive_utc();
    }
}

#[cfg(test)]
mod tests;
