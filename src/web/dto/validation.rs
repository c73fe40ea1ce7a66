//! Request extractors for Web API DTOs.
//!
//! Bodies may be sent as JSON or as an urlencoded form; the content type
//! decides which. A missing body, or JSON that is not an object, is read
//! as an empty object so that absent fields surface as contract messages
//! instead of parse errors. Repeated form or query keys keep their first
//! value.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::web::error::ApiError;

/// A validated request that creates a document.
pub trait DocumentModel: Validate {
    /// Model name used in validation messages.
    const MODEL: &'static str;
}

/// A JSON or form extractor.
pub struct Payload<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

/// Collapse urlencoded pairs into a JSON object, first value wins.
fn pairs_to_object(pairs: Vec<(String, String)>) -> Value {
    let mut fields = Map::new();
    for (key, value) in pairs {
        fields.entry(key).or_insert(Value::String(value));
    }
    Value::Object(fields)
}

fn from_object<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ApiError> {
    let value = match value {
        Value::Object(_) => value,
        _ => Value::Object(Map::new()),
    };
    serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("invalid {what}: {e}")))
}

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("invalid request body: {}", e)))?;
            return from_object(pairs_to_object(pairs), "request body").map(Payload);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("invalid request body: {}", e)))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return from_object(Value::Object(Map::new()), "request body").map(Payload);
        }

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::bad_request(format!("invalid request body: {}", e)))?;
        from_object(value, "request body").map(Payload)
    }
}

/// A query string extractor whose rejections are API errors.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("invalid query string: {}", e)))?;
        from_object(pairs_to_object(pairs), "query string").map(QueryParams)
    }
}

/// A JSON or form extractor that validates the request body.
///
/// Validation failures are reported with the model name of `T`.
///
/// # Example
///
/// ```ignore
/// async fn create_thread(
///     ValidatedPayload(payload): ValidatedPayload<CreateThreadRequest>,
/// ) -> Result<Json<ThreadResponse>, ApiError> {
///     // text and password are present
/// }
/// ```
pub struct ValidatedPayload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + DocumentModel,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Payload(value) = Payload::<T>::from_request(req, state).await?;

        value
            .validate()
            .map_err(|errors| ApiError::from_validation_errors(T::MODEL, errors))?;

        Ok(ValidatedPayload(value))
    }
}
