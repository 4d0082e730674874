// src/container/error.rs

use thiserror::Error;

/// Errors raised while writing or parsing an AAA container.
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    #[error("Entry for pixel ({row}, {col}) ends before its payload")]
    TruncatedEntry { row: usize, col: usize },
    #[error("Stream holds {found} entries but the header declares {expected}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("Coefficient magnitude {0} cannot be quantized")]
    UnrepresentableMagnitude(f64),
    #[error("Matrix shape {height}x{width} cannot be stored")]
    InvalidShape { height: usize, width: usize },
    #[error("Cannot allocate a {height}x{width} matrix with {channels} channel(s)")]
    AllocationFailed {
        height: usize,
        width: usize,
        channels: usize,
    },
    #[error("Flag byte {flag:#010b} at pixel ({row}, {col}) is not valid for a grayscale stream")]
    InvalidEntryFlag { flag: u8, row: usize, col: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContainerError>;
