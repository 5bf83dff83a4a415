use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DatabaseError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(i64),

    #[error("totalPrice {submitted} does not match the line items ({expected})")]
    TotalMismatch { expected: f64, submitted: f64 },

    /// Caller is neither the buyer nor an admin
    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => AppError::NotFound("The order cannot be found".into()),
            e @ OrderError::TotalMismatch { .. } => AppError::BadRequest(e.to_string()),
            OrderError::Forbidden(msg) => AppError::Forbidden(msg),
            OrderError::Validation(e) => AppError::ValidationError(e),
            OrderError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for OrderError {
    fn from(err: mongodb::error::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for OrderError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

impl From<DatabaseError> for OrderError {
    fn from(err: DatabaseError) -> Self {
        OrderError::Database(err.to_string())
    }
}
