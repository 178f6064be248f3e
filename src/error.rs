//! Error types and handling for the Destina application

use thiserror::Error;

/// Main error type for the Destina application
#[derive(Error, Debug)]
pub enum DestinaError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// External service communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl DestinaError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DestinaError::Config { .. } => {
                "Configuration error. Please check your config file and GEMINI_API_KEY.".to_string()
            }
            DestinaError::Api { .. } => {
                "Unable to reach Wikipedia or Gemini. Please check your internet connection."
                    .to_string()
            }
            DestinaError::Io { .. } => {
                "File or network operation failed. Please check permissions and ports.".to_string()
            }
            DestinaError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = DestinaError::config("missing API key");
        assert!(matches!(config_err, DestinaError::Config { .. }));

        let api_err = DestinaError::api("connection failed");
        assert!(matches!(api_err, DestinaError::Api { .. }));

        let general_err = DestinaError::general("subscriber already set");
        assert!(matches!(general_err, DestinaError::General { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = DestinaError::config("test");
        assert!(config_err.user_message().contains("GEMINI_API_KEY"));

        let api_err = DestinaError::api("test");
        assert!(api_err.user_message().contains("Unable to reach"));

        let general_err = DestinaError::general("subscriber already set");
        assert_eq!(general_err.user_message(), "subscriber already set");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: DestinaError = io_err.into();
        assert!(matches!(err, DestinaError::Io { .. }));
    }
}
