//! Error types and handling for the `Tempo` application

use thiserror::Error;

/// Main error type for the `Tempo` application
#[derive(Error, Debug)]
pub enum TempoError {
    /// Foreground location permission was refused
    #[error("location permission denied")]
    PermissionDenied,

    /// Device geolocation errors (unavailable capability, timeout)
    #[error("geolocation error: {message}")]
    Geolocation { message: String },

    /// Network-level failures against the weather or directory endpoints
    #[error("network error: {message}")]
    Network { message: String },

    /// Response body could not be decoded into the expected shape
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// Last-location store errors
    #[error("store error: {message}")]
    Store { message: String },

    /// Configuration-related errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TempoError {
    /// Create a new geolocation error
    pub fn geolocation<S: Into<String>>(message: S) -> Self {
        Self::Geolocation {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify this error for the presentation layer
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TempoError::PermissionDenied => ErrorKind::PermissionDenied,
            TempoError::Geolocation { .. } => ErrorKind::Geolocation,
            TempoError::Network { .. } => ErrorKind::Network,
            TempoError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            TempoError::Store { .. } => ErrorKind::Store,
            TempoError::Config { .. } => ErrorKind::Config,
            TempoError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TempoError::PermissionDenied => {
                "Location permission denied. Pick a state and city manually.".to_string()
            }
            TempoError::Geolocation { .. } => {
                "Unable to determine your position. Pick a state and city manually.".to_string()
            }
            TempoError::Network { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            TempoError::MalformedResponse { .. } => {
                "The weather service returned an unexpected response.".to_string()
            }
            TempoError::Store { .. } => {
                "Could not read or write the saved location.".to_string()
            }
            TempoError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            TempoError::Io { .. } => "File operation failed.".to_string(),
        }
    }
}

/// Failure taxonomy surfaced to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PermissionDenied,
    Geolocation,
    Network,
    MalformedResponse,
    Store,
    Config,
    Io,
}

/// A failure made visible to the screen instead of being swallowed.
/// Carries the classification plus a message the status line can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&TempoError> for ErrorNotice {
    fn from(error: &TempoError) -> Self {
        Self {
            kind: error.kind(),
            message: error.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let network_err = TempoError::network("connection refused");
        assert!(matches!(network_err, TempoError::Network { .. }));

        let geo_err = TempoError::geolocation("no position source");
        assert!(matches!(geo_err, TempoError::Geolocation { .. }));

        let store_err = TempoError::store("keyspace unavailable");
        assert!(matches!(store_err, TempoError::Store { .. }));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(TempoError::PermissionDenied.kind(), ErrorKind::PermissionDenied);
        assert_eq!(TempoError::network("x").kind(), ErrorKind::Network);
        assert_eq!(TempoError::malformed("x").kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_user_messages() {
        let network_err = TempoError::network("test");
        assert!(network_err.user_message().contains("Unable to reach"));

        let permission_err = TempoError::PermissionDenied;
        assert!(permission_err.user_message().contains("manually"));
    }

    #[test]
    fn test_notice_from_error() {
        let err = TempoError::network("timed out");
        let notice = ErrorNotice::from(&err);
        assert_eq!(notice.kind, ErrorKind::Network);
        assert_eq!(notice.message, err.user_message());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let tempo_err: TempoError = io_err.into();
        assert!(matches!(tempo_err, TempoError::Io { .. }));
    }
}
