use serde::{Deserialize, Serialize};

use super::{Listing, ListingType, Tag};

/// A listing with its type and tags loaded
///
/// This is the shape the listing pages and the CLI work with. `type` is
/// `None` when the referenced type row is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetails {
    #[serde(flatten)]
    pub listing: Listing,

    #[serde(rename = "type")]
    pub listing_type: Option<ListingType>,

    /// Attached tags ordered by name
    pub tags: Vec<Tag>,
}

impl ListingDetails {
    pub fn new(listing: Listing, listing_type: Option<ListingType>, tags: Vec<Tag>) -> Self {
        Self { listing, listing_type, tags }
    }

    /// The type's name, if the type still exists
    pub fn type_name(&self) -> Option<String> {
        self.listing_type.as_ref().map(ListingType::get_name)
    }

    /// Tag names in display order
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(Tag::get_name).collect()
    }
}
