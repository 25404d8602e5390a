use gwconsole_api::ApiError;
use gwconsole_auth::AuthError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
    /// Backend request or store failure
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),
    #[error("Session error: {0}")]
    Auth(#[from] AuthError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// One-line text for the status line
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::Api(err) if err.is_unauthorized() => {
                "Session expired, sign in again".to_string()
            }
            Self::Api(err) => err.to_string(),
            Self::Config(_) | Self::Logging(_) | Self::Auth(_) | Self::Io(_) => {
                self.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_api_error_has_friendly_status() {
        let err = AppError::from(ApiError::http(401, "token expired"));
        assert_eq!(err.status_message(), "Session expired, sign in again");
    }

    #[test]
    fn test_config_error_is_prefixed() {
        let err = AppError::from(ConfigError::InvalidPath("x".to_string()));
        assert_eq!(err.to_string(), "Configuration error: Invalid config path: x");
    }
}
