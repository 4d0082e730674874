use std::error::Error;
use std::fmt;
use std::io;

use crate::container::ContainerError;

/// Main error type for the AAA encoder library.
#[derive(Debug)]
pub enum AaaError {
    /// An I/O error occurred
    Io(io::Error),
    /// An invalid argument was provided
    InvalidArg(String),
    /// The container could not be written or parsed
    Container(ContainerError),
    /// A raster image could not be read or written
    Image(::image::ImageError),
}

impl fmt::Display for AaaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AaaError::Io(err) => write!(f, "I/O error: {}", err),
            AaaError::InvalidArg(msg) => write!(f, "Invalid argument: {}", msg),
            AaaError::Container(err) => write!(f, "Container error: {}", err),
            AaaError::Image(err) => write!(f, "Image error: {}", err),
        }
    }
}

impl Error for AaaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AaaError::Io(err) => Some(err),
            AaaError::Container(err) => Some(err),
            AaaError::Image(err) => Some(err),
            AaaError::InvalidArg(_) => None,
        }
    }
}

impl From<io::Error> for AaaError {
    fn from(err: io::Error) -> Self {
        AaaError::Io(err)
    }
}

impl From<ContainerError> for AaaError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::Io(e) => AaaError::Io(e),
            other => AaaError::Container(other),
        }
    }
}

impl From<::image::ImageError> for AaaError {
    fn from(err: ::image::ImageError) -> Self {
        AaaError::Image(err)
    }
}

/// A specialized `Result` type for AAA encoding operations.
pub type Result<T> = std::result::Result<T, AaaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        assert_eq!(
            AaaError::Io(io_error).to_string(),
            "I/O error: file not found"
        );

        assert_eq!(
            AaaError::InvalidArg("test".to_string()).to_string(),
            "Invalid argument: test"
        );

        assert_eq!(
            AaaError::Container(ContainerError::TruncatedEntry { row: 1, col: 2 }).to_string(),
            "Container error: Entry for pixel (1, 2) ends before its payload"
        );
    }

    #[test]
    fn test_container_io_is_unwrapped() {
        let err: AaaError =
            ContainerError::Io(io::Error::new(io::ErrorKind::Other, "disk full")).into();
        assert!(matches!(err, AaaError::Io(_)));
        assert!(err.source().is_some());
    }
}
