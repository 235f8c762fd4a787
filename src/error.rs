//! Error handling for the stop-detector library.
//!
//! Detection itself never fails; errors only come from loading tracks
//! (XML structure, I/O) and from validating user-supplied configuration.

use std::fmt;

/// Unified error type for stop-detector operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StopError {
    /// The TCX document is not well-formed XML
    XmlParse {
        message: String,
        /// Byte offset in the document where the reader gave up
        position: u64,
    },
    /// A timestamp could not be parsed as RFC 3339
    InvalidTimestamp { value: String },
    /// Configuration values are out of range
    Config { message: String },
    /// Reading a track file failed
    Io { message: String },
}

impl fmt::Display for StopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopError::XmlParse { message, position } => {
                write!(f, "XML parse error at byte {}: {}", position, message)
            }
            StopError::InvalidTimestamp { value } => {
                write!(f, "Invalid timestamp '{}'", value)
            }
            StopError::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            StopError::Io { message } => {
                write!(f, "I/O error: {}", message)
            }
        }
    }
}

impl std::error::Error for StopError {}

impl From<std::io::Error> for StopError {
    fn from(err: std::io::Error) -> Self {
        StopError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type alias for stop-detector operations.
pub type Result<T> = std::result::Result<T, StopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StopError::XmlParse {
            message: "unexpected end".to_string(),
            position: 42,
        };
        assert!(err.to_string().contains("byte 42"));
        assert!(err.to_string().contains("unexpected end"));

        let err = StopError::InvalidTimestamp {
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid timestamp 'yesterday'");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: StopError = io.into();
        assert!(matches!(err, StopError::Io { .. }));
        assert!(err.to_string().contains("no such file"));
    }
}
