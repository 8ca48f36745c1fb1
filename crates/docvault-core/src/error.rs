//! Error types for docvault.

use thiserror::Error;

/// Result type alias using docvault's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for docvault operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input rejected before any side effect
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate title, detected pre-flight or by the unique constraint
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Content type outside the allow-list
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// File content exceeds the upload limit
    #[error("Payload too large: {size} bytes (max {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    /// Remote object store unreachable or rejected the upload
    #[error("Upload error: {0}")]
    Upload(String),

    /// Local commit failed after a successful remote upload
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable, machine-readable kind for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::Conflict(_) => "conflict",
            Error::UnsupportedType(_) => "unsupported_type",
            Error::PayloadTooLarge { .. } => "payload_too_large",
            Error::Upload(_) => "upload_error",
            Error::Persistence(_) => "persistence_error",
            Error::NotFound(_) => "not_found",
            Error::Database(_) => "database_error",
            Error::Config(_) => "configuration_error",
            Error::Request(_) => "request_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
        }
    }

    /// Whether the caller caused this error (4xx family).
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::Conflict(_)
                | Error::UnsupportedType(_)
                | Error::PayloadTooLarge { .. }
                | Error::NotFound(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // Strip the URL: signed requests carry credentials in the query or body.
        Error::Request(e.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let err = Error::Validation("title must not be empty".to_string());
        assert_eq!(err.to_string(), "Validation error: title must not be empty");
    }

    #[test]
    fn test_error_display_conflict() {
        let err = Error::Conflict("title already exists".to_string());
        assert_eq!(err.to_string(), "Conflict: title already exists");
    }

    #[test]
    fn test_error_display_payload_too_large() {
        let err = Error::PayloadTooLarge {
            size: 11,
            max: 10,
        };
        assert_eq!(
            err.to_string(),
            "Payload too large: 11 bytes (max 10 bytes)"
        );
    }

    #[test]
    fn test_error_display_upload() {
        let err = Error::Upload("store unreachable".to_string());
        assert_eq!(err.to_string(), "Upload error: store unreachable");
    }

    #[test]
    fn test_error_display_persistence() {
        let err = Error::Persistence("connection reset".to_string());
        assert_eq!(err.to_string(), "Persistence error: connection reset");
    }

    #[test]
    fn test_client_fault_classification() {
        assert!(Error::Validation(String::new()).is_client_fault());
        assert!(Error::Conflict(String::new()).is_client_fault());
        assert!(Error::UnsupportedType(String::new()).is_client_fault());
        assert!(Error::PayloadTooLarge { size: 2, max: 1 }.is_client_fault());
        assert!(Error::NotFound(String::new()).is_client_fault());

        assert!(!Error::Upload(String::new()).is_client_fault());
        assert!(!Error::Persistence(String::new()).is_client_fault());
        assert!(!Error::Config(String::new()).is_client_fault());
    }

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(Error::Conflict(String::new()).kind(), "conflict");
        assert_eq!(Error::Upload(String::new()).kind(), "upload_error");
        assert_eq!(
            Error::PayloadTooLarge { size: 2, max: 1 }.kind(),
            "payload_too_large"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
