use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("No user with identification number {0}")]
    IdentificationNotFound(i64),

    /// Registration with an email that is already taken
    #[error("User with email '{0}' already registered")]
    DuplicateEmail(String),

    /// Registration with an identification number that is already taken
    #[error("Identification number {0} already registered")]
    DuplicateIdentification(i64),

    /// Profile update to an email owned by another account
    #[error("Email '{0}' already in use")]
    EmailInUse(String),

    #[error("Identification number {0} already in use")]
    IdentificationInUse(i64),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    Inactive,

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::IdentificationNotFound(_) => {
                AppError::NotFound("User not found".into())
            }
            UserError::DuplicateEmail(_) => AppError::DuplicateField {
                field: "email".into(),
                message: "User already registered.".into(),
            },
            UserError::DuplicateIdentification(_) => AppError::DuplicateField {
                field: "id".into(),
                message: "Identification Number cannot be duplicate.".into(),
            },
            UserError::EmailInUse(_) => {
                AppError::BadRequest("Email already in use. Cannot be duplicate".into())
            }
            UserError::IdentificationInUse(_) => {
                AppError::BadRequest("Identification Number already in use. Cannot be duplicate".into())
            }
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".into())
            }
            UserError::Inactive => AppError::Unauthorized("Account is inactive".into()),
            UserError::Validation(e) => AppError::ValidationError(e),
            UserError::PasswordHash(msg) | UserError::Token(msg) => {
                AppError::InternalServerError(msg)
            }
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for UserError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        UserError::Database(err.to_string())
    }
}
