//! Error types and handling for `RecFinder`

use thiserror::Error;

/// Why a position request did not produce coordinates
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationFailure {
    /// The user (or platform) refused the request
    #[error("permission denied")]
    Denied,
    /// No answer within the configured timeout
    #[error("timed out")]
    Timeout,
    /// The provider could not determine a position
    #[error("position unavailable")]
    Unavailable,
}

/// Main error type for the `RecFinder` library
#[derive(Error, Debug)]
pub enum RecFinderError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The backend answered with a non-2xx status
    #[error("HTTP {status} {status_text} for {path}")]
    Http {
        status: u16,
        status_text: String,
        path: String,
    },

    /// The request never produced a response
    #[error("Network error: {message}")]
    Network { message: String },

    /// A response body did not match the documented schema
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Position could not be acquired
    #[error("Geolocation error: {reason}")]
    Geolocation { reason: GeolocationFailure },

    /// CSV reader errors
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Result type alias for `RecFinder` operations
pub type Result<T> = std::result::Result<T, RecFinderError>;

impl RecFinderError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn http<S: Into<String>, P: Into<String>>(status: u16, status_text: S, path: P) -> Self {
        Self::Http {
            status,
            status_text: status_text.into(),
            path: path.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn geolocation(reason: GeolocationFailure) -> Self {
        Self::Geolocation { reason }
    }

    /// HTTP status code, if the backend produced one
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            RecFinderError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly status line for the affected view region
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RecFinderError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            RecFinderError::Http {
                status,
                status_text,
                ..
            } => format!("Request failed: {status} {status_text}"),
            RecFinderError::Network { .. } => {
                "Unable to reach the recreation API. Please check your connection.".to_string()
            }
            RecFinderError::Decode { .. } => {
                "The recreation API returned data in an unexpected format.".to_string()
            }
            RecFinderError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            RecFinderError::Geolocation { .. } => "Unable to retrieve your location.".to_string(),
            RecFinderError::Csv { .. } => {
                "Could not read the registered programs file.".to_string()
            }
            RecFinderError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for RecFinderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RecFinderError::decode(err.to_string())
        } else {
            RecFinderError::network(err.to_string())
        }
    }
}
