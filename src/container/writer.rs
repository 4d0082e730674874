// src/container/writer.rs

use super::entry::Entry;
use super::error::Result;
use super::header::{ContainerHeader, HEADER_LEN};
use super::matrix::CoefficientMatrix;
use super::scale::select_shift;
use log::{debug, info};
use std::io::Write;

/// Serializes coefficient matrices onto any `std::io::Write` destination.
pub struct ContainerWriter<W: Write> {
    writer: W,
    bytes_written: u64,
}

impl<W: Write> ContainerWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    /// Writes the header followed by one entry per pixel, row by row.
    ///
    /// The matrix is only read. Returns the header that was emitted.
    pub fn write_matrix(&mut self, matrix: &CoefficientMatrix) -> Result<ContainerHeader> {
        let shift = select_shift(matrix)?;
        let header =
            ContainerHeader::for_shape(matrix.height(), matrix.width(), matrix.layout(), shift)?;
        header.write_to(&mut self.writer)?;
        self.bytes_written += HEADER_LEN as u64;

        let layout = matrix.layout();
        let mut nonzero = 0usize;
        for values in matrix.pixels() {
            let entry = Entry::for_pixel(layout, values, shift);
            if !entry.is_empty() {
                nonzero += 1;
            }
            entry.write_to(&mut self.writer)?;
            self.bytes_written += entry.encoded_len() as u64;
        }
        self.writer.flush()?;

        debug!(
            "container: wrote {}x{} {:?}, shift={}, {} of {} entries carry data",
            header.height,
            header.width,
            layout,
            shift,
            nonzero,
            header.entry_count()
        );
        info!("container: {} bytes written", self.bytes_written);
        Ok(header)
    }

    /// Total bytes emitted so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::matrix::Layout;

    #[test]
    fn test_concrete_grayscale_stream() {
        let m = CoefficientMatrix::from_rows(&[vec![0.0, 1000.0], vec![0.0, 0.0]]).unwrap();
        let mut writer = ContainerWriter::new(Vec::new());
        let header = writer.write_matrix(&m).unwrap();
        assert_eq!(header.scale_shift, 0);
        assert_eq!(writer.bytes_written(), 14);
        assert_eq!(
            writer.into_inner(),
            vec![
                2, 0, 2, 0, 0, 1, // header
                0x00, 0x08, 0xE8, 0x03, 0x00, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn test_rgb_header_flag() {
        let m = CoefficientMatrix::zeros(1, 1, Layout::Rgb);
        let mut writer = ContainerWriter::new(Vec::new());
        writer.write_matrix(&m).unwrap();
        assert_eq!(writer.into_inner(), vec![1, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let m = CoefficientMatrix::zeros(0, 5, Layout::Grayscale);
        let mut writer = ContainerWriter::new(Vec::new());
        assert!(writer.write_matrix(&m).is_err());
        assert!(writer.into_inner().is_empty());
    }
}
