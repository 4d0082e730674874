//! # AAA Encoder Library
//!
//! Lossy image compression by frequency-domain sparsification. Image
//! channels are transformed with a 2D DCT, small coefficients are dropped,
//! and the sparse spectrum is packed into the compact AAA container.
//!
//! This library is organized into several modules:
//! - `utils`: Error handling
//! - `container`: The AAA binary format (scale selection, entry codec,
//!   writer and reader)
//! - `pipeline`: Transform, thresholding and raster image I/O around the
//!   container

// Re-export commonly used types at the crate root
pub use utils::error::{AaaError, Result};

pub mod utils {
    pub mod error;
}

pub mod container;
pub mod pipeline;

// Public API exports
pub use container::{
    CoefficientMatrix, ContainerError, ContainerHeader, Layout, decode, encode, read_file,
    write_file,
};
pub use pipeline::CompressParams;

// Constants
pub const AAA_VERSION: &str = "0.1.0";
/// File extension of AAA containers.
pub const AAA_EXTENSION: &str = "aaa";
