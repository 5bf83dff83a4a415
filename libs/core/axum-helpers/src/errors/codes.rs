//! Stable error codes carried in every error envelope.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::InvalidQuery.as_str(), "INVALID_QUERY");
//! assert_eq!(ErrorCode::InvalidQuery.code(), 1010);
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use utoipa::ToSchema;

/// Machine-readable error identifiers.
///
/// Integer codes are grouped by range:
/// - 1000-1999: client errors
/// - 2000-2999: server and store errors
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    ValidationError,
    InvalidUuid,
    JsonExtraction,
    NotFound,
    BadRequest,
    Unauthorized,
    Forbidden,
    /// Malformed catalog parameters (page index, price range, search term)
    InvalidQuery,
    /// A unique field (email, identification number) is already taken
    DuplicateField,

    // Server errors (2000-2999)
    InternalError,
    DatabaseError,
    SerdeJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Integer code for logs and dashboards.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::BadRequest => 1005,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::InvalidQuery => 1010,
            Self::DuplicateField => 1011,

            Self::InternalError => 2001,
            Self::DatabaseError => 2003,
            Self::SerdeJsonError => 2004,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::InvalidQuery => "Invalid catalog query",
            Self::DuplicateField => "A unique field is already in use",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database error occurred",
            Self::SerdeJsonError => "JSON serialization error",
        }
    }
}
