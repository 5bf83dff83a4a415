/// Errors raised by the connection layer, independent of any domain.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Server unreachable after the retry budget was spent
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Sequence '{0}' could not be advanced")]
    SequenceUnavailable(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
