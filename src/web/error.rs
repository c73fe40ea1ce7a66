//! API error handling.
//!
//! Contract failures are reported in the body with HTTP 200, in one of two
//! shapes: a field-keyed validation error map, or a flat `message`. Only
//! unparseable requests (400) and internal failures (500) use an error
//! status.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::dto::MessageResponse;
use crate::BoardError;

/// Message for a reply or report without a thread id.
pub const THREAD_ID_MISSING: &str = "Thread id is missing";
/// Message for a thread id that resolves to nothing.
pub const THREAD_NOT_FOUND: &str = "Thread does not exist";
/// Message for a reply operation without a reply id.
pub const REPLY_ID_MISSING: &str = "Reply id is missing";
/// Message for a reply id that resolves to nothing.
pub const REPLY_NOT_FOUND: &str = "Reply does not exist";
/// Message for every failed password-protected deletion.
pub const INCORRECT_PASSWORD: &str = "incorrect password";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Required fields missing from a create request.
    Validation,
    /// No thread id supplied.
    ThreadIdMissing,
    /// Thread id does not resolve.
    ThreadNotFound,
    /// No reply id supplied.
    ReplyIdMissing,
    /// Reply id does not resolve.
    ReplyNotFound,
    /// Deletion rejected.
    IncorrectPassword,
    /// Request body or query could not be parsed (400).
    BadRequest,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }
}

/// Validation error body, shaped like a document-store validation failure.
#[derive(Debug, Serialize)]
pub struct ValidationBody {
    /// Always `ValidationError`.
    pub name: &'static str,
    /// `<Model> validation failed`.
    #[serde(rename = "_message")]
    pub summary: String,
    /// Summary followed by every field message.
    pub message: String,
    /// Errors keyed by field name.
    pub errors: BTreeMap<String, FieldError>,
}

/// Error for a single field.
#[derive(Debug, Serialize)]
pub struct FieldError {
    /// Always `ValidatorError`.
    pub name: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Failed rule.
    pub kind: &'static str,
    /// Field name.
    pub path: String,
    /// Rule details.
    pub properties: FieldErrorProperties,
}

/// Rule details for a field error.
#[derive(Debug, Serialize)]
pub struct FieldErrorProperties {
    /// Human-readable message.
    pub message: String,
    /// Failed rule.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Field name.
    pub path: String,
}

/// The message reported for a missing required field.
pub fn required_message(field: &str) -> String {
    format!("Path `{field}` is required.")
}

impl ValidationBody {
    /// Build the body for a model from `field -> message` pairs.
    pub fn new(model: &str, fields: BTreeMap<String, String>) -> Self {
        let summary = format!("{model} validation failed");
        let details: Vec<String> = fields
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        let message = format!("{summary}: {}", details.join(", "));

        let errors = fields
            .into_iter()
            .map(|(field, message)| {
                let error = FieldError {
                    name: "ValidatorError",
                    message: message.clone(),
                    kind: "required",
                    path: field.clone(),
                    properties: FieldErrorProperties {
                        message,
                        kind: "required",
                        path: field.clone(),
                    },
                };
                (field, error)
            })
            .collect();

        Self {
            name: "ValidationError",
            summary,
            message,
            errors,
        }
    }
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    validation: Option<ValidationBody>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            validation: None,
        }
    }

    /// Create a validation error for a model from `field -> message` pairs.
    pub fn validation(model: &str, fields: BTreeMap<String, String>) -> Self {
        let body = ValidationBody::new(model, fields);
        Self {
            code: ErrorCode::Validation,
            message: body.message.clone(),
            validation: Some(body),
        }
    }

    /// Create a validation error from validator::ValidationErrors.
    ///
    /// Only the first message of each field is kept.
    pub fn from_validation_errors(model: &str, errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| {
                let message = field_errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| required_message(&field));
                (field.to_string(), message)
            })
            .collect();

        Self::validation(model, fields)
    }

    /// No thread id supplied.
    pub fn thread_id_missing() -> Self {
        Self::new(ErrorCode::ThreadIdMissing, THREAD_ID_MISSING)
    }

    /// Thread id does not resolve.
    pub fn thread_not_found() -> Self {
        Self::new(ErrorCode::ThreadNotFound, THREAD_NOT_FOUND)
    }

    /// No reply id supplied.
    pub fn reply_id_missing() -> Self {
        Self::new(ErrorCode::ReplyIdMissing, REPLY_ID_MISSING)
    }

    /// Reply id does not resolve.
    pub fn reply_not_found() -> Self {
        Self::new(ErrorCode::ReplyNotFound, REPLY_NOT_FOUND)
    }

    /// Deletion rejected, for whatever reason.
    pub fn incorrect_password() -> Self {
        Self::new(ErrorCode::IncorrectPassword, INCORRECT_PASSWORD)
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        match self.validation {
            Some(body) => (status, Json(body)).into_response(),
            None => (status, Json(MessageResponse::new(self.message))).into_response(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        tracing::error!("Internal error: {}", err);
        ApiError::internal("internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    async fn body_json(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::Validation.status_code(), StatusCode::OK);
        assert_eq!(ErrorCode::ThreadIdMissing.status_code(), StatusCode::OK);
        assert_eq!(ErrorCode::ThreadNotFound.status_code(), StatusCode::OK);
        assert_eq!(ErrorCode::ReplyIdMissing.status_code(), StatusCode::OK);
        assert_eq!(ErrorCode::ReplyNotFound.status_code(), StatusCode::OK);
        assert_eq!(ErrorCode::IncorrectPassword.status_code(), StatusCode::OK);
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_constructors() {
        assert_eq!(ApiError::thread_id_missing().message(), "Thread id is missing");
        assert_eq!(ApiError::thread_not_found().message(), "Thread does not exist");
        assert_eq!(ApiError::reply_id_missing().message(), "Reply id is missing");
        assert_eq!(ApiError::reply_not_found().message(), "Reply does not exist");
        assert_eq!(ApiError::incorrect_password().message(), "incorrect password");
        assert_eq!(ApiError::bad_request("x").code(), ErrorCode::BadRequest);
        assert_eq!(ApiError::internal("x").code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn test_message_response_shape() {
        let (status, body) = body_json(ApiError::incorrect_password()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "incorrect password" }));
    }

    #[tokio::test]
    async fn test_validation_response_shape() {
        let mut fields = BTreeMap::new();
        fields.insert("text".to_string(), required_message("text"));
        fields.insert("password".to_string(), required_message("password"));

        let (status, body) = body_json(ApiError::validation("Thread", fields)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "ValidationError");
        assert_eq!(body["_message"], "Thread validation failed");
        assert_eq!(
            body["message"],
            "Thread validation failed: password: Path `password` is required., \
             text: Path `text` is required."
        );
        assert_eq!(
            body["errors"]["text"]["properties"]["message"],
            "Path `text` is required."
        );
        assert_eq!(body["errors"]["text"]["properties"]["type"], "required");
        assert_eq!(body["errors"]["password"]["path"], "password");
        assert_eq!(body["errors"]["password"]["kind"], "required");
    }

    #[tokio::test]
    async fn test_board_error_is_internal() {
        let err: ApiError = BoardError::Database("disk full".to_string()).into();
        assert_eq!(err.code(), ErrorCode::InternalError);

        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // store details are not leaked
        assert_eq!(body, json!({ "message": "internal server error" }));
    }
}
