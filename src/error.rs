//! Error types for tasbeeh
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in tasbeeh
#[derive(Debug, Error)]
pub enum TasbeehError {
    /// Record not found in the collection
    #[error("Tasbeeh not found: {0}")]
    NotFound(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error from the underlying storage primitive
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tasbeeh operations
pub type Result<T> = std::result::Result<T, TasbeehError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = TasbeehError::NotFound("tasbeeh_123_abc".to_string());
        assert_eq!(err.to_string(), "Tasbeeh not found: tasbeeh_123_abc");
    }

    #[test]
    fn test_storage_error() {
        let err = TasbeehError::Storage("lock poisoned".to_string());
        assert_eq!(err.to_string(), "Storage error: lock poisoned");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
        let err: TasbeehError = io_err.into();
        assert!(matches!(err, TasbeehError::Io(_)));
        assert!(err.to_string().contains("read-only volume"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: TasbeehError = json_err.into();
        assert!(matches!(err, TasbeehError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(TasbeehError::NotFound("x".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
