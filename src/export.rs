/// JSON export of a user's listings
///
/// Listings are flattened to plain objects: the type becomes its name and
/// the tags a comma-separated list of names. The download variant lets the
/// caller pick which fields to keep.
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::models::ListingDetails;
use crate::validation::{invalid_selection_message, ValidationErrors};

/// A field that can appear in an exported listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExportField {
    Id,
    Name,
    Description,
    Author,
    ImageUrl,
    Link,
    Type,
    Tags,
    CreatedAt,
    UpdatedAt,
}

impl ExportField {
    /// Every field, in output order
    pub const ALL: [ExportField; 10] = [
        ExportField::Id,
        ExportField::Name,
        ExportField::Description,
        ExportField::Author,
        ExportField::ImageUrl,
        ExportField::Link,
        ExportField::Type,
        ExportField::Tags,
        ExportField::CreatedAt,
        ExportField::UpdatedAt,
    ];

    /// Fields used by a download that does not choose any
    pub const DEFAULT: [ExportField; 8] = [
        ExportField::Id,
        ExportField::Name,
        ExportField::Description,
        ExportField::Author,
        ExportField::ImageUrl,
        ExportField::Link,
        ExportField::Type,
        ExportField::Tags,
    ];

    /// The key the field is written under
    pub fn key(self) -> &'static str {
        match self {
            ExportField::Id => "id",
            ExportField::Name => "name",
            ExportField::Description => "description",
            ExportField::Author => "author",
            ExportField::ImageUrl => "imageUrl",
            ExportField::Link => "link",
            ExportField::Type => "type",
            ExportField::Tags => "tags",
            ExportField::CreatedAt => "created_at",
            ExportField::UpdatedAt => "updated_at",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    fn value(self, details: &ListingDetails) -> Value {
        let listing = &details.listing;
        match self {
            ExportField::Id => Value::String(listing.get_id()),
            ExportField::Name => Value::String(listing.get_name()),
            ExportField::Description => optional(listing.get_description()),
            ExportField::Author => optional(listing.get_author()),
            ExportField::ImageUrl => optional(listing.get_image_url()),
            ExportField::Link => optional(listing.get_link()),
            ExportField::Type => optional(details.type_name()),
            ExportField::Tags => Value::String(details.tag_names().join(", ")),
            ExportField::CreatedAt => Value::String(format_timestamp(listing.get_created_at())),
            ExportField::UpdatedAt => Value::String(format_timestamp(listing.get_updated_at())),
        }
    }
}

fn optional(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

/// ISO-8601 in UTC with microseconds, e.g. `2024-05-01T12:00:00.000000Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Resolves the requested download fields
///
/// `None` selects [`ExportField::DEFAULT`]. The result is in output order
/// without repeats, whatever order the keys were sent in.
///
/// ### Errors
///
/// "The selected fields.N is invalid." for every unknown key
pub fn parse_fields(keys: Option<Vec<String>>) -> Result<Vec<ExportField>, ValidationErrors> {
    let Some(keys) = keys else {
        return Ok(ExportField::DEFAULT.to_vec());
    };

    let mut errors = ValidationErrors::new();
    let mut selected = Vec::with_capacity(keys.len());
    for (index, key) in keys.iter().enumerate() {
        match ExportField::from_key(key) {
            Some(field) => selected.push(field),
            None => {
                let field = format!("fields.{}", index);
                errors.add(field.clone(), invalid_selection_message(&field));
            }
        }
    }
    errors.into_result()?;

    selected.sort();
    selected.dedup();
    Ok(selected)
}

/// Flattens one listing into an object holding `fields`
pub fn project(details: &ListingDetails, fields: &[ExportField]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| (field.key().to_string(), field.value(details)))
        .collect()
}

/// Flattens every listing with the full field set
pub fn export_all(listings: &[ListingDetails]) -> Vec<Map<String, Value>> {
    listings.iter().map(|l| project(l, &ExportField::ALL)).collect()
}

/// Name of the attachment offered by a download made at `at`
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("listings-export-{}.json", at.format("%Y-%m-%d-%H-%M-%S"))
}

/// Pretty-prints the download body with four-space indentation
pub fn render_download<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .context("Failed to render export")?;
    Ok(out)
}
