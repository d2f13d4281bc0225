use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents an association between a listing and a tag
///
/// One row of the `listing_tags` pivot table.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::listing_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ListingTag {
    /// The ID of the listing
    listing_id: String,

    /// The ID of the tag
    tag_id: String,

    /// When the tag was attached
    created_at: NaiveDateTime,
}

impl ListingTag {
    /// Creates a new listing tag association
    ///
    /// ### Arguments
    ///
    /// * `listing_id` - The ID of the listing
    /// * `tag_id` - The ID of the tag
    pub fn new(listing_id: String, tag_id: String) -> Self {
        Self {
            listing_id,
            tag_id,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Gets the listing ID
    pub fn get_listing_id(&self) -> String {
        self.listing_id.clone()
    }

    /// Gets the tag ID
    pub fn get_tag_id(&self) -> String {
        self.tag_id.clone()
    }

    /// Gets the creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
