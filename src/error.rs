//! Error types for ocadrust

use std::io;
use thiserror::Error;

/// Main error type for OCAD read/write operations
#[derive(Debug, Error)]
pub enum OcadError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// File does not start with the OCAD mark
    #[error("Invalid OCAD mark: {0:#06X}")]
    InvalidMagic(u16),

    /// Format version outside 6..=12
    #[error("Unsupported OCAD version: {0}")]
    UnsupportedVersion(i16),

    /// Offsets outside the file, broken block chains, inconsistent element sizes
    #[error("Malformed structure: {0}")]
    MalformedStructure(String),

    /// Reference to a symbol definition that does not exist
    #[error("Unknown symbol reference: {0}")]
    UnknownSymbolReference(String),

    /// Value outside the range the target version can represent
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),

    /// Compressed output larger than its fixed destination buffer
    #[error("Buffer capacity exceeded: needed more than {capacity} bytes (at {needed})")]
    BufferCapacityExceeded { needed: usize, capacity: usize },

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

impl OcadError {
    /// Errors that abort a whole read or write regardless of policy.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OcadError::Io(_) | OcadError::InvalidMagic(_) | OcadError::UnsupportedVersion(_)
        )
    }
}

/// Result type alias for ocadrust operations
pub type Result<T> = std::result::Result<T, OcadError>;

impl From<String> for OcadError {
    fn from(s: String) -> Self {
        OcadError::Custom(s)
    }
}

impl From<&str> for OcadError {
    fn from(s: &str) -> Self {
        OcadError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OcadError::UnsupportedVersion(13);
        assert_eq!(err.to_string(), "Unsupported OCAD version: 13");
    }

    #[test]
    fn test_magic_display() {
        let err = OcadError::InvalidMagic(0x1234);
        assert_eq!(err.to_string(), "Invalid OCAD mark: 0x1234");
    }

    #[test]
    fn test_capacity_error() {
        let err = OcadError::BufferCapacityExceeded {
            needed: 249,
            capacity: 248,
        };
        assert!(err.to_string().contains("248"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: OcadError = io_err.into();
        assert!(matches!(err, OcadError::Io(_)));
        assert!(err.is_fatal());
    }
}
