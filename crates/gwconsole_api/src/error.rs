//! API error types

use crate::query::ApiErrorDetail;

/// Errors returned by a [`crate::ServiceApi`] backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx HTTP response.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The backend answered with `success: false`.
    #[error("{}", .0.detail)]
    Backend(Box<ApiErrorDetail>),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to decode the response body.
    #[error("Response parse error: {message}")]
    Parse { message: String, body: Option<String> },

    #[error("Local store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Local store migration failed: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn parse_with_body(
        message: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the session token was rejected
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 401,
            Self::Backend(detail) => detail.status == 401,
            _ => false,
        }
    }
}
