/// Request body extraction
///
/// [`JsonBody`] replaces `axum::Json` for form-like bodies. A field holding
/// the wrong JSON type is reported as a validation failure on that field,
/// in the same `{ error, errors }` shape the form rules use, instead of
/// axum's plain-text rejection.
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ApiError;
use crate::validation::{display_name, string_message, ValidationErrors};

/// JSON body decoded into `T`, with per-field type errors
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        decode(value).map(JsonBody)
    }
}

/// Decodes a parsed body into `T`
///
/// ### Errors
///
/// [`ApiError::BadRequest`] when the body is not a JSON object, and
/// [`ApiError::Validation`] naming each field whose value has the wrong
/// type
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let Value::Object(object) = value else {
        return Err(ApiError::BadRequest("The request body must be a JSON object.".to_string()));
    };

    match serde_json::from_value::<T>(Value::Object(object.clone())) {
        Ok(decoded) => Ok(decoded),
        Err(err) => {
            debug!("Rejected request body: {}", err);
            let errors = field_errors::<T>(&object);
            if errors.is_empty() {
                Err(ApiError::BadRequest(err.to_string()))
            } else {
                Err(errors.into())
            }
        }
    }
}

/// Tries each field on its own to find the ones `T` refuses
///
/// Every body type defaults its missing fields, so a one-field object
/// fails only when that field is at fault.
fn field_errors<T: DeserializeOwned>(object: &Map<String, Value>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for (key, value) in object {
        let single: Map<String, Value> = [(key.clone(), value.clone())].into_iter().collect();
        if let Err(err) = serde_json::from_value::<T>(Value::Object(single)) {
            let (field, message) = describe(key, value, &err.to_string());
            errors.add(field, message);
        }
    }
    errors
}

fn describe(key: &str, value: &Value, reason: &str) -> (String, String) {
    if reason.contains("expected a sequence") {
        return (key.to_string(), format!("The {} field must be an array.", display_name(key)));
    }
    if reason.contains("invalid type: sequence") {
        return (key.to_string(), string_message(key));
    }
    if let Value::Array(items) = value {
        if let Some(index) = items.iter().position(|item| !item.is_string()) {
            let field = format!("{}.{}", key, index);
            let message = string_message(&field);
            return (field, message);
        }
    }
    if reason.contains("expected a string") {
        return (key.to_string(), string_message(key));
    }
    (key.to_string(), format!("The {} field is invalid.", display_name(key)))
}
