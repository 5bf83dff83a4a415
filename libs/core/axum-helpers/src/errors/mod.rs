pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Error envelope returned by every endpoint.
///
/// ```json
/// {
///   "code": 1011,
///   "error": "DUPLICATE_FIELD",
///   "message": "User already registered",
///   "details": { "key": "email" }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable identifier, see [`ErrorCode`]
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details,
        }
    }
}

/// Application error rendered as an [`ErrorResponse`].
///
/// Domain crates convert their own error enums into this type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// Catalog parameters that could not be parsed
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// Unique field taken; rendered as 406 with `details.key = field`
    #[error("Duplicate {field}: {message}")]
    DuplicateField { field: String, message: String },

    /// Store failure; the driver message is passed through
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn parts(self) -> (StatusCode, ErrorCode, String, Option<Value>) {
        match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = ErrorCode::SerdeJsonError.code(), error = ?e, "JSON serialization failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::SerdeJsonError,
                    ErrorCode::SerdeJsonError.default_message().to_string(),
                    None,
                )
            }
            AppError::JsonExtractorRejection(e) => (
                e.status(),
                ErrorCode::JsonExtraction,
                e.body_text(),
                None,
            ),
            AppError::ValidationError(e) => {
                let message = first_validation_message(&e)
                    .unwrap_or_else(|| ErrorCode::ValidationError.default_message().to_string());
                let details = serde_json::to_value(&e).unwrap_or(Value::Null);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    message,
                    Some(details),
                )
            }
            AppError::InvalidUuid(msg) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidUuid, msg, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg, None),
            AppError::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidQuery, msg, None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg, None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, None),
            AppError::DuplicateField { field, message } => (
                StatusCode::NOT_ACCEPTABLE,
                ErrorCode::DuplicateField,
                message,
                Some(json!({ "key": field })),
            ),
            AppError::Database(msg) => {
                tracing::error!(error_code = ErrorCode::DatabaseError.code(), "Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError, msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, msg, None)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        if status.is_client_error() {
            tracing::info!(error_code = code.code(), %status, "{}", message);
        }

        (status, Json(ErrorResponse::new(code, message, details))).into_response()
    }
}

/// `"<field>: <message>"` for the alphabetically first failing field.
fn first_validation_message(errors: &ValidationErrors) -> Option<String> {
    let field_errors = errors.field_errors();
    let (field, errs) = field_errors.iter().min_by(|a, b| a.0.cmp(b.0))?;
    let first = errs.first()?;

    let reason = match &first.message {
        Some(msg) => msg.to_string(),
        None => format!("failed '{}' check", first.code),
    };
    Some(format!("{field}: {reason}"))
}

/// Build an error response outside of [`AppError`].
pub fn error_response(status: StatusCode, message: impl Into<String>, code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(code, message, None))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 5, message = "must be at least 5 characters"))]
        name: String,
        #[validate(range(min = 0.0))]
        price: f64,
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_names_first_field_and_lists_all() {
        let err = Signup {
            name: "Al".into(),
            price: -1.0,
        }
        .validate()
        .unwrap_err();

        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["code"], 1001);
        assert_eq!(body["message"], "name: must be at least 5 characters");
        assert!(body["details"]["name"].is_array());
        assert!(body["details"]["price"].is_array());
    }

    #[tokio::test]
    async fn test_duplicate_field_is_406_with_key() {
        let response = AppError::DuplicateField {
            field: "email".into(),
            message: "User already registered".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
        let body = body_json(response).await;
        assert_eq!(body["details"]["key"], "email");
        assert_eq!(body["error"], "DUPLICATE_FIELD");
    }

    #[tokio::test]
    async fn test_database_error_passes_message_through() {
        let response = AppError::Database("connection pool closed".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "connection pool closed");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (AppError::InvalidQuery("bad page".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("no token".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("admins only".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("product".into()), StatusCode::NOT_FOUND),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
