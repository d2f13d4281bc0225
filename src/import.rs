/// Bulk import of listings from pasted JSON
///
/// The payload is a JSON array of objects that name their type and tags
/// instead of referencing IDs. Every entry is checked before anything is
/// written, and the whole batch goes in one transaction: the first bad
/// entry aborts the import and nothing is stored.
use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::ListingInput;
use crate::models::{Listing, Tag};
use crate::repo;
use crate::validation::{
    is_valid_url, max_message, required_message, string_message, url_message, ValidationErrors,
    DESCRIPTION_MAX, SHORT_TEXT_MAX,
};

/// Request field the import errors are reported under
pub const FIELD: &str = "listingsData";

/// One entry of the documented sample payload
#[derive(Debug, Clone, Serialize)]
pub struct SampleListing {
    pub name: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub tags: &'static str,
    #[serde(rename = "imageUrl")]
    pub image_url: &'static str,
    pub link: &'static str,
}

/// The example payload offered to users preparing an import
pub fn sample_payload() -> Vec<SampleListing> {
    vec![
        SampleListing {
            name: "Sample Listing 1",
            description: "Description for listing 1",
            author: "John Doe",
            type_name: "Movie",
            tags: "action, adventure",
            image_url: "https://example.com/image1.jpg",
            link: "https://example.com/1",
        },
        SampleListing {
            name: "Sample Listing 2",
            description: "Description for listing 2",
            author: "Jane Smith",
            type_name: "Series",
            tags: "drama, comedy",
            image_url: "https://example.com/image2.jpg",
            link: "https://example.com/2",
        },
    ]
}

/// An import entry that passed field validation
///
/// The type and tags are still names; they are resolved against the
/// user's taxonomy afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEntry {
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub type_name: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub tag_names: Vec<String>,
}

fn import_error(message: impl Into<String>) -> ValidationErrors {
    ValidationErrors::single(FIELD, message)
}

/// Parses the submitted text into the list of raw entries
///
/// ### Errors
///
/// "The listings data field is required." for a missing or blank payload,
/// and "Invalid JSON format" for anything that is not a JSON array
pub fn parse_listings_data(text: Option<&str>) -> Result<Vec<Value>, ValidationErrors> {
    let text = text.map(str::trim).filter(|t| !t.is_empty());
    let Some(text) = text else {
        return Err(import_error(required_message("listings_data")));
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(entries)) => Ok(entries),
        Ok(_) | Err(_) => Err(import_error("Invalid JSON format")),
    }
}

/// What a JSON field held
enum Raw<'a> {
    Absent,
    Text(&'a str),
    Other,
}

fn raw<'a>(object: &'a Map<String, Value>, key: &str) -> Raw<'a> {
    match object.get(key) {
        None | Some(Value::Null) => Raw::Absent,
        Some(Value::String(s)) => Raw::Text(s),
        Some(_) => Raw::Other,
    }
}

/// A required string field; messages are appended in rule order
fn required_text(object: &Map<String, Value>, key: &str, max: Option<usize>, messages: &mut Vec<String>) -> Option<String> {
    match raw(object, key) {
        Raw::Text(s) if !s.trim().is_empty() => {
            let s = s.trim();
            if let Some(max) = max {
                if s.chars().count() > max {
                    messages.push(max_message(key, max));
                }
            }
            Some(s.to_string())
        }
        Raw::Absent | Raw::Text(_) => {
            messages.push(required_message(key));
            None
        }
        Raw::Other => {
            messages.push(string_message(key));
            None
        }
    }
}

/// An optional string field; blanks become `None`
fn optional_text(object: &Map<String, Value>, key: &str, max: usize, messages: &mut Vec<String>) -> Option<String> {
    match raw(object, key) {
        Raw::Absent => None,
        Raw::Text(s) => {
            let s = s.trim();
            if s.chars().count() > max {
                messages.push(max_message(key, max));
            }
            if s.is_empty() { None } else { Some(s.to_string()) }
        }
        Raw::Other => {
            messages.push(string_message(key));
            None
        }
    }
}

/// An optional URL field
fn optional_url(object: &Map<String, Value>, key: &str, messages: &mut Vec<String>) -> Option<String> {
    match raw(object, key) {
        Raw::Absent => None,
        Raw::Text(s) if s.trim().is_empty() => None,
        Raw::Text(s) => {
            let s = s.trim();
            if !is_valid_url(s) {
                messages.push(url_message(key));
            }
            if s.chars().count() > SHORT_TEXT_MAX {
                messages.push(max_message(key, SHORT_TEXT_MAX));
            }
            Some(s.to_string())
        }
        Raw::Other => {
            messages.push(url_message(key));
            None
        }
    }
}

/// Splits a comma-separated tag list, trimming and dropping empty parts
pub fn split_tag_names(tags: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for part in tags.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if !names.iter().any(|n| n == part) {
            names.push(part.to_string());
        }
    }
    names
}

/// Validates the fields of one import entry
///
/// ### Errors
///
/// `Validation failed for listing at index {i}: [..]` listing every
/// failed rule, in field order
pub fn validate_entry(index: usize, value: &Value) -> Result<BulkEntry, ValidationErrors> {
    let empty = Map::new();
    let object = value.as_object().unwrap_or(&empty);
    let mut messages = Vec::new();

    let name = required_text(object, "name", Some(SHORT_TEXT_MAX), &mut messages);
    let description = optional_text(object, "description", DESCRIPTION_MAX, &mut messages);
    let author = optional_text(object, "author", SHORT_TEXT_MAX, &mut messages);
    let type_name = required_text(object, "type", None, &mut messages);
    let image_url = optional_url(object, "imageUrl", &mut messages);
    let link = optional_url(object, "link", &mut messages);
    let tags = required_text(object, "tags", None, &mut messages);

    match (name, type_name, tags) {
        (Some(name), Some(type_name), Some(tags)) if messages.is_empty() => Ok(BulkEntry {
            name,
            description,
            author,
            type_name,
            image_url,
            link,
            tag_names: split_tag_names(&tags),
        }),
        _ => {
            let list = serde_json::to_string(&messages).unwrap_or_default();
            Err(import_error(format!("Validation failed for listing at index {}: {}", index, list)))
        }
    }
}

/// Resolves an entry's tag names against the tags the user owns
///
/// ### Errors
///
/// `The following tags do not exist for listing at index {i}: a, b`
pub fn resolve_tags(index: usize, entry: &BulkEntry, owned: &[Tag]) -> Result<Vec<String>, ValidationErrors> {
    let mut ids = Vec::with_capacity(entry.tag_names.len());
    let mut missing = Vec::new();

    for name in &entry.tag_names {
        match owned.iter().find(|tag| &tag.get_name() == name) {
            Some(tag) => ids.push(tag.get_id()),
            None => missing.push(name.as_str()),
        }
    }

    if !missing.is_empty() {
        return Err(import_error(format!(
            "The following tags do not exist for listing at index {}: {}",
            index,
            missing.join(", ")
        )));
    }
    Ok(ids)
}

/// Imports a batch of listings for `user_id`
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owner of the imported listings
/// * `text` - The submitted `listingsData` JSON text
///
/// ### Returns
///
/// The number of listings created
///
/// ### Errors
///
/// Returns a [`ValidationErrors`] on `listingsData` describing the first
/// problem found; no listing is written in that case
#[instrument(skip(pool, text))]
pub async fn import_listings(pool: &DbPool, user_id: &str, text: Option<&str>) -> Result<usize> {
    let entries = parse_listings_data(text)?;
    debug!("Parsed {} import entries", entries.len());

    let mut batch: Vec<(Listing, Vec<String>)> = Vec::with_capacity(entries.len());
    for (index, value) in entries.iter().enumerate() {
        let entry = validate_entry(index, value)?;

        let Some(listing_type) = repo::find_type_by_name(pool, user_id, &entry.type_name)? else {
            return Err(import_error(format!(
                "Type '{}' does not exist for listing at index {}.",
                entry.type_name, index
            ))
            .into());
        };

        let owned = repo::find_tags_by_names(pool, user_id, &entry.tag_names)?;
        let tag_ids = resolve_tags(index, &entry, &owned)?;

        let input = ListingInput {
            name: entry.name,
            description: entry.description,
            author: entry.author,
            type_id: listing_type.get_id(),
            image_url: entry.image_url,
            link: entry.link,
            tag_ids: tag_ids.clone(),
        };
        batch.push((Listing::new(user_id.to_string(), &input), tag_ids));
    }

    let created = repo::create_listings(pool, &batch).await?;
    info!("Imported {} listings", created);
    Ok(created)
}
