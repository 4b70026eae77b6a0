//! Error types for the pagetext library.
//!
//! The aggregation core itself never fails; these errors come from the
//! surrounding surface (options, event recordings, search, rendering).

use std::io;
use thiserror::Error;

/// Result type alias for pagetext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur outside the glyph aggregation core.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a recording.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Layout options failed validation.
    #[error("Invalid layout options: {0}")]
    InvalidOptions(String),

    /// A recorded glyph event stream could not be decoded.
    #[error("Malformed event recording: {0}")]
    Recording(String),

    /// A search pattern could not be compiled.
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// A shared page lock was poisoned by a panicking reader.
    #[error("Page lock poisoned")]
    Poisoned,

    /// No reader is left on the page channel.
    #[error("Page channel disconnected")]
    Disconnected,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => Error::Io(err.into()),
            _ => Error::Recording(err.to_string()),
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidPattern(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOptions("space_fraction must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid layout options: space_fraction must be positive"
        );

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Recording(_)));
    }

    #[test]
    fn test_regex_error_conversion() {
        let re_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: Error = re_err.into();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }
}
