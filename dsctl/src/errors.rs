use crate::auth::access::AuthError;
use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Missing, malformed, unknown or deactivated API key
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// The account has used its whole request allowance
    #[error("Quota exceeded (limit {requests_limit})")]
    QuotaExceeded { requests_limit: i64 },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// A required text field was empty or whitespace-only
    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Store operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable category, e.g. `invalid_key` or `duplicate_text`
    pub error: String,
    /// Human-readable description, safe to show to callers
    pub message: String,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Error::BadRequest { .. } | Error::EmptyInput { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::DuplicateEmail | DbError::DuplicateText => StatusCode::BAD_REQUEST,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error category reported in the `error` field of the response body
    pub fn category(&self) -> &'static str {
        match self {
            Error::Unauthenticated { .. } => "invalid_key",
            Error::QuotaExceeded { .. } => "quota_exceeded",
            Error::BadRequest { .. } => "bad_request",
            Error::EmptyInput { .. } => "empty_input",
            Error::NotFound { .. } | Error::Database(DbError::NotFound) => "not_found",
            Error::Database(DbError::DuplicateEmail) => "duplicate_email",
            Error::Database(DbError::DuplicateText) => "duplicate_text",
            Error::Database(DbError::UniqueViolation { .. }) => "conflict",
            Error::Internal { .. } | Error::Database(DbError::Other(_)) | Error::Other(_) => "internal",
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Invalid or inactive API key".to_string()),
            Error::QuotaExceeded { requests_limit } => format!("Request quota of {requests_limit} exhausted"),
            Error::BadRequest { message } => message.clone(),
            Error::EmptyInput { field } => format!("{field} must not be empty"),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::DuplicateEmail => "An account with this email address already exists".to_string(),
                DbError::DuplicateText => "This sentence already exists in the dataset".to_string(),
                DbError::UniqueViolation { .. } => "Resource already exists".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidKey => Error::Unauthenticated { message: None },
            AuthError::QuotaExceeded { requests_limit } => Error::QuotaExceeded { requests_limit },
            AuthError::Database(db_err) => Error::Database(db_err),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::QuotaExceeded { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::EmptyInput { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let body = ErrorBody {
            error: self.category().to_string(),
            message: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
