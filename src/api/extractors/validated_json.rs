//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed bodies and rule failures both become a 400 whose `meta`
/// lists `{path, message}` per failing field.
///
/// ```rust,ignore
/// async fn create(ValidatedJson(payload): ValidatedJson<CreateOrderRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| {
                AppError::validation_with_meta(
                    "Invalid request body",
                    json!([{ "path": "body", "message": e.body_text() }]),
                )
            })?;

        value
            .validate()
            .map_err(|e| AppError::validation_with_meta("Validation failed", field_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten validation errors into `[{path, message}]`, sorted by path.
fn field_errors(errors: &ValidationErrors) -> Value {
    let mut entries: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
        })
        .collect();
    entries.sort();

    Value::Array(
        entries
            .into_iter()
            .map(|(path, message)| json!({ "path": path, "message": message }))
            .collect(),
    )
}
