/// Form validation
///
/// Field rules shared by the listing form, the bulk importer and the
/// tag/type forms. Failures are collected per field into [`ValidationErrors`]
/// so a handler can report every problem with a form in one response.
use std::collections::HashSet;
use std::fmt;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use url::Url;

use crate::dto::{ListingFormDto, ListingInput, RegisterDto, Registration};

/// Maximum length of names, authors and URLs
pub const SHORT_TEXT_MAX: usize = 255;

/// Maximum length of a listing description
pub const DESCRIPTION_MAX: usize = 1000;

/// Minimum length of an account password
pub const PASSWORD_MIN: usize = 8;

/// Maximum length of a tag or type name
pub const LABEL_MAX: usize = 30;

/// Validation failures keyed by field name
///
/// Fields keep the order they were first reported in, which follows the
/// order the rules run. The summary line is the first message recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single message for one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.fields.push((field, vec![message.into()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    /// Messages recorded for a field, empty if the field passed
    pub fn get(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    /// The first message recorded, used as the summary line
    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .first()
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    /// Every message, grouped by field in report order
    pub fn all(&self) -> Vec<String> {
        self.fields.iter().flat_map(|(_, messages)| messages.iter().cloned()).collect()
    }

    /// Ok when nothing was recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ValidationErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut errors = ValidationErrors::new();
        for (field, messages) in map {
            let messages: Vec<String> = serde_json::from_value(messages).map_err(D::Error::custom)?;
            for message in messages {
                errors.add(field.clone(), message);
            }
        }
        Ok(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_message().unwrap_or("The given data was invalid."))
    }
}

impl std::error::Error for ValidationErrors {}

/// Turns a field key into the words used in messages
///
/// `type_id` becomes "type id" and `imageUrl` becomes "image url".
pub fn display_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if c == '_' {
            out.push(' ');
        } else if c.is_uppercase() {
            if i > 0 {
                out.push(' ');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Trims a submitted string and maps blanks to `None`
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn required_message(field: &str) -> String {
    format!("The {} field is required.", display_name(field))
}

pub fn max_message(field: &str, max: usize) -> String {
    format!("The {} field must not be greater than {} characters.", display_name(field), max)
}

pub fn url_message(field: &str) -> String {
    format!("The {} field must be a valid URL.", display_name(field))
}

pub fn string_message(field: &str) -> String {
    format!("The {} field must be a string.", display_name(field))
}

pub fn invalid_selection_message(field: &str) -> String {
    format!("The selected {} is invalid.", display_name(field))
}

/// True for absolute http(s) URLs with a host
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// Checks an already-cleaned optional string against a maximum length
pub fn check_max(errors: &mut ValidationErrors, field: &str, value: Option<&str>, max: usize) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.add(field, max_message(field, max));
        }
    }
}

/// Checks an already-cleaned optional URL field
pub fn check_url(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !is_valid_url(v) {
            errors.add(field, url_message(field));
        }
        check_max(errors, field, Some(v), SHORT_TEXT_MAX);
    }
}

/// Validates a submitted listing form
///
/// `type_ids` and `tag_ids` are the IDs owned by the submitting user; a
/// reference to anything else is reported as an invalid selection.
///
/// ### Returns
///
/// The cleaned input ready to be written, or every failure found
pub fn validate_listing_form(
    form: ListingFormDto,
    type_ids: &HashSet<String>,
    tag_ids: &HashSet<String>,
) -> Result<ListingInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = clean(form.name);
    let description = clean(form.description);
    let author = clean(form.author);
    let type_id = clean(form.type_id);
    let image_url = clean(form.image_url);
    let link = clean(form.link);

    match name.as_deref() {
        None => errors.add("name", required_message("name")),
        Some(n) => check_max(&mut errors, "name", Some(n), SHORT_TEXT_MAX),
    }
    check_max(&mut errors, "description", description.as_deref(), DESCRIPTION_MAX);
    check_max(&mut errors, "author", author.as_deref(), SHORT_TEXT_MAX);

    match type_id.as_deref() {
        None => errors.add("type_id", required_message("type_id")),
        Some(id) if !type_ids.contains(id) => {
            errors.add("type_id", invalid_selection_message("type_id"))
        }
        Some(_) => {}
    }

    check_url(&mut errors, "imageUrl", image_url.as_deref());
    check_url(&mut errors, "link", link.as_deref());

    let mut selected = Vec::new();
    for (index, tag_id) in form.tags.unwrap_or_default().into_iter().enumerate() {
        if !tag_ids.contains(&tag_id) {
            let field = format!("tags.{}", index);
            errors.add(field.clone(), invalid_selection_message(&field));
        } else if !selected.contains(&tag_id) {
            selected.push(tag_id);
        }
    }

    errors.into_result()?;

    // Both are Some once the checks above pass
    let (Some(name), Some(type_id)) = (name, type_id) else {
        return Err(ValidationErrors::single("name", required_message("name")));
    };

    Ok(ListingInput {
        name,
        description,
        author,
        type_id,
        image_url,
        link,
        tag_ids: selected,
    })
}

/// Validates an account registration
///
/// The name and email are trimmed; the password is taken as sent. Email
/// uniqueness is checked when the account is written.
pub fn validate_registration(form: RegisterDto) -> Result<Registration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = clean(form.name);
    let email = clean(form.email);
    let password = form.password.filter(|p| !p.is_empty());

    match name.as_deref() {
        None => errors.add("name", required_message("name")),
        Some(n) => check_max(&mut errors, "name", Some(n), SHORT_TEXT_MAX),
    }

    match email.as_deref() {
        None => errors.add("email", required_message("email")),
        Some(e) => {
            if !e.contains('@') {
                errors.add("email", "The email field must be a valid email address.");
            }
            check_max(&mut errors, "email", Some(e), SHORT_TEXT_MAX);
        }
    }

    match password.as_deref() {
        None => errors.add("password", required_message("password")),
        Some(p) if p.chars().count() < PASSWORD_MIN => errors.add(
            "password",
            format!("The password field must be at least {} characters.", PASSWORD_MIN),
        ),
        Some(_) => {}
    }

    errors.into_result()?;

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Ok(Registration { name, email, password }),
        _ => Err(ValidationErrors::single("name", required_message("name"))),
    }
}

/// Which taxonomy a batch of names is being created for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Tag,
    Type,
}

impl LabelKind {
    /// The request field holding the names, e.g. `tags`
    pub fn field(self) -> &'static str {
        match self {
            LabelKind::Tag => "tags",
            LabelKind::Type => "types",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            LabelKind::Tag => "Tag",
            LabelKind::Type => "Type",
        }
    }
}

/// Validates a batch of new tag or type names
///
/// Names are trimmed. Each must be non-blank, at most [`LABEL_MAX`]
/// characters, and absent from both `existing` and the rest of the batch.
///
/// ### Returns
///
/// The trimmed names in submission order
pub fn validate_label_names(
    kind: LabelKind,
    names: Vec<String>,
    existing: &HashSet<String>,
) -> Result<Vec<String>, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if names.is_empty() {
        errors.add(kind.field(), required_message(kind.field()));
        return Err(errors);
    }

    let mut accepted: Vec<String> = Vec::with_capacity(names.len());
    for (index, raw) in names.into_iter().enumerate() {
        let field = format!("{}.{}", kind.field(), index);
        let name = raw.trim().to_string();

        if name.is_empty() {
            errors.add(field, format!("{} name is required", kind.noun()));
        } else if name.chars().count() > LABEL_MAX {
            errors.add(
                field,
                format!("{} name cannot be longer than {} characters", kind.noun(), LABEL_MAX),
            );
        } else if existing.contains(&name) || accepted.contains(&name) {
            errors.add(field, format!("{} \"{}\" already exists", kind.noun(), name));
        } else {
            accepted.push(name);
        }
    }

    errors.into_result()?;
    Ok(accepted)
}

#[cfg(test)]
mod tests;
