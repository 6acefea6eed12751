//! Service layer error types
//!
//! Every user action ends in either success or one of these. Port-level
//! `ApiError`s are classified per operation: a refused token while logging in
//! is an authentication failure, a refused signup is a validation failure.

use snooze_domain::DomainError;

use crate::ports::outbound::{ApiError, ApiStatus};

/// Errors that can occur in session and story operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Login refused: unknown user or wrong password
    #[error("Invalid username or password")]
    Authentication,

    /// Input refused locally or by the server (e.g. duplicate username)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The session record or addressed entity no longer exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// The story API could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a status other than the one the operation requires
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The server answered with a body the client could not read
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The operation needs a logged-in user
    #[error("Not logged in")]
    NotAuthenticated,
}

impl SessionError {
    /// An unexpected success status, e.g. 200 where 201 was promised.
    pub fn unexpected_status(expected: ApiStatus, actual: ApiStatus) -> Self {
        Self::Rejected {
            status: actual.code(),
            message: format!("expected status {}", expected),
        }
    }

    /// Classify an API error raised while logging in.
    pub fn from_login(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(_) | ApiError::NotFound(_) => Self::Authentication,
            other => Self::from(other),
        }
    }

    /// Classify an API error raised while creating an account.
    pub fn from_signup(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { message, .. } => Self::Validation(message),
            other => Self::from(other),
        }
    }
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::RequestFailed(msg) => Self::Network(msg),
            ApiError::Unauthorized(msg) => Self::Rejected {
                status: 401,
                message: msg,
            },
            ApiError::NotFound(msg) => Self::NotFound(msg),
            ApiError::Rejected { status, message } => Self::Rejected { status, message },
            ApiError::ParseError(msg) | ApiError::SerializeError(msg) => Self::Parse(msg),
        }
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
        }
    }
}
