use thiserror::Error;

/// Name of the unique constraint on `accounts.email`.
pub const ACCOUNTS_EMAIL_CONSTRAINT: &str = "accounts_email_key";

/// Name of the unique index enforcing exact-text uniqueness on `sentences`.
pub const SENTENCES_TEXT_CONSTRAINT: &str = "sentences_text_md5_key";

/// Unified error type for store operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// An account with this email already exists
    #[error("Email already registered")]
    DuplicateEmail,

    /// A sentence with exactly this text already exists
    #[error("Sentence already exists")]
    DuplicateText,

    /// Any other unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convert from sqlx::Error using proper sqlx error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => match db_err.constraint() {
                Some(ACCOUNTS_EMAIL_CONSTRAINT) => DbError::DuplicateEmail,
                Some(SENTENCES_TEXT_CONSTRAINT) => DbError::DuplicateText,
                constraint => DbError::UniqueViolation {
                    constraint: constraint.map(|s| s.to_string()),
                    table: db_err.table().map(|s| s.to_string()),
                    message: db_err.message().to_string(),
                },
            },
            // All other sqlx errors are non-recoverable - convert to anyhow with context
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;
