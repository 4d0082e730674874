// src/container/mod.rs

//! The AAA container: a 6-byte header followed by one self-delimiting
//! entry per pixel in row-major order. All integers are little-endian.
//!
//! Zero pixels cost one byte. Non-zero channels are stored as
//! `int(v) >> scale_shift` in 32 bits, with a single shift chosen for the
//! whole matrix, so decoding yields `(v >> k) << k` for each value.

pub mod entry;
pub mod error;
pub mod header;
pub mod matrix;
pub mod reader;
pub mod scale;
pub mod writer;

pub use entry::Entry;
pub use error::ContainerError;
pub use header::{ContainerHeader, HEADER_LEN};
pub use matrix::{CoefficientMatrix, Layout};
pub use reader::ContainerReader;
pub use writer::ContainerWriter;

use error::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Encodes a matrix into an in-memory AAA stream.
pub fn encode(matrix: &CoefficientMatrix) -> Result<Vec<u8>> {
    let mut writer = ContainerWriter::new(Vec::new());
    writer.write_matrix(matrix)?;
    Ok(writer.into_inner())
}

/// Decodes a complete in-memory AAA stream.
pub fn decode(bytes: &[u8]) -> Result<CoefficientMatrix> {
    ContainerReader::new(bytes).read_matrix()
}

/// Encodes a matrix onto a writer.
pub fn dump<W: Write>(matrix: &CoefficientMatrix, writer: W) -> Result<ContainerHeader> {
    ContainerWriter::new(writer).write_matrix(matrix)
}

/// Decodes a matrix from a reader, consuming it to the end.
pub fn load<R: Read>(reader: R) -> Result<CoefficientMatrix> {
    ContainerReader::new(reader).read_matrix()
}

/// Writes a matrix to `path`, creating or truncating the file.
pub fn write_file<P: AsRef<Path>>(matrix: &CoefficientMatrix, path: P) -> Result<ContainerHeader> {
    let file = File::create(path)?;
    dump(matrix, BufWriter::new(file))
}

/// Reads a matrix from the file at `path`.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<CoefficientMatrix> {
    let file = File::open(path)?;
    load(BufReader::new(file))
}
