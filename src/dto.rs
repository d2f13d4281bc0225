use serde::{Deserialize, Serialize};

use crate::import::SampleListing;
use crate::models::{ListingDetails, ListingType, Tag, User};

/// Data transfer object for registering a new account
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct RegisterDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A registration that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Data transfer object for logging in
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login or registration
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthTokenDto {
    /// The signed session token
    pub token: String,

    /// Always "Bearer"
    pub token_type: String,

    /// Seconds until the token expires
    pub expires_in: i64,

    /// The authenticated user
    pub user: User,
}

/// Data transfer object for creating or updating a listing
///
/// Every field is optional at the wire level so that a missing value is
/// reported as a validation failure rather than a deserialization error.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct ListingFormDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub type_id: Option<String>,
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
    pub link: Option<String>,
    /// IDs of the tags to attach
    pub tags: Option<Vec<String>>,
}

/// A listing form that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingInput {
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub type_id: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    /// Deduplicated tag IDs, in submission order
    pub tag_ids: Vec<String>,
}

/// Data transfer object for creating tags
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct CreateTagsDto {
    /// The names of the tags to create
    pub tags: Vec<String>,
}

/// Data transfer object for creating types
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct CreateTypesDto {
    /// The names of the types to create
    pub types: Vec<String>,
}

/// Data transfer object for a bulk import
///
/// `listingsData` carries the JSON array as text, the way it was pasted.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct BulkImportDto {
    #[serde(rename = "listingsData")]
    pub listings_data: Option<String>,
}

/// The documented bulk import format
#[derive(Serialize, Debug)]
pub struct BulkSampleDto {
    pub sample: Vec<SampleListing>,
}

/// Result of a successful bulk import
#[derive(Serialize, Deserialize, Debug)]
pub struct BulkImportResultDto {
    pub message: String,
    pub created: usize,
}

/// Data transfer object for downloading an export
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct DownloadDto {
    /// Export field keys; the default set is used when absent
    pub fields: Option<Vec<String>>,
}

/// Query filters for the listing index
///
/// Repeated keys are accepted (`?tags=a&tags=b`).
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct ListingQueryDto {
    /// Case-insensitive substring match on the listing name
    pub search: Option<String>,

    /// Keep listings carrying any of these tag names
    pub tags: Vec<String>,

    /// Keep listings whose type is any of these names
    pub types: Vec<String>,
}

impl ListingQueryDto {
    /// Returns true when no filter is set
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.tags.is_empty()
            && self.types.is_empty()
    }

    /// Applies the filters to a single listing
    ///
    /// Name search is a substring match; tag and type filters compare whole
    /// names. All comparisons ignore case.
    pub fn matches(&self, listing: &ListingDetails) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !listing.listing.get_name().to_lowercase().contains(&needle) {
                return false;
            }
        }

        if !self.tags.is_empty() {
            let hit = self.tags.iter().any(|wanted| {
                listing
                    .tags
                    .iter()
                    .any(|tag| tag.get_name().to_lowercase() == wanted.to_lowercase())
            });
            if !hit {
                return false;
            }
        }

        if !self.types.is_empty() {
            let Some(ref listing_type) = listing.listing_type else {
                return false;
            };
            let type_name = listing_type.get_name().to_lowercase();
            if !self.types.iter().any(|wanted| wanted.to_lowercase() == type_name) {
                return false;
            }
        }

        true
    }
}

/// The choices offered by the listing create form
#[derive(Serialize, Deserialize, Debug)]
pub struct ListingFormOptionsDto {
    pub available_tags: Vec<Tag>,
    pub available_types: Vec<ListingType>,
}

/// A listing together with the choices offered by the edit form
#[derive(Serialize, Deserialize, Debug)]
pub struct EditListingDto {
    pub listing: ListingDetails,
    pub available_tags: Vec<Tag>,
    pub available_types: Vec<ListingType>,
}

/// Per-user counts shown on the dashboard
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DashboardDto {
    pub listings: i64,
    pub tags: i64,
    pub types: i64,
}

/// Public landing response
#[derive(Serialize, Deserialize, Debug)]
pub struct WelcomeDto {
    pub name: String,
    pub version: String,
}

#[cfg(test)]
mod prop_tests;
