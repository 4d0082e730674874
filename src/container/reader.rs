// src/container/reader.rs

use super::entry::Entry;
use super::error::{ContainerError, Result};
use super::header::ContainerHeader;
use super::matrix::CoefficientMatrix;
use log::debug;
use std::io::Read;

/// Parses an AAA stream back into a coefficient matrix.
pub struct ContainerReader<R: Read> {
    reader: R,
}

impl<R: Read> ContainerReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the header, then scans entries until the stream ends.
    ///
    /// The stream must end exactly after `height * width` entries. Decoded
    /// values are buffered until the entry count checks out, so the matrix
    /// is only allocated for a stream that really carries every pixel.
    pub fn read_matrix(&mut self) -> Result<CoefficientMatrix> {
        let header = ContainerHeader::read_from(&mut self.reader)?;
        let layout = header.layout();
        let shift = header.scale_shift;
        let (height, width) = (header.height as usize, header.width as usize);
        let expected = header.entry_count();
        debug!(
            "container: reading {}x{} {:?}, shift={}",
            height, width, layout, shift
        );

        let channels = layout.channels();
        let mut values: Vec<(usize, f64)> = Vec::new();
        let (mut row, mut col) = (0usize, 0usize);
        let mut decoded = 0usize;

        while decoded < expected {
            let Some(entry) = Entry::read_from(&mut self.reader, layout, row, col)? else {
                return Err(ContainerError::ShapeMismatch {
                    expected,
                    found: decoded,
                });
            };
            let base = (row * width + col) * channels;
            values.extend(
                entry
                    .channels(layout, shift)
                    .map(|(channel, value)| (base + channel, value)),
            );
            decoded += 1;
            col += 1;
            if col == width {
                col = 0;
                row += 1;
            }
        }

        // Count whatever follows so the error reports the real entry total.
        let mut found = expected;
        while Entry::read_from(&mut self.reader, layout, row, col)?.is_some() {
            found += 1;
            col += 1;
            if col == width {
                col = 0;
                row += 1;
            }
        }
        if found != expected {
            return Err(ContainerError::ShapeMismatch { expected, found });
        }

        let mut matrix = CoefficientMatrix::try_zeros(height, width, layout)?;
        let data = matrix.as_mut_slice();
        for (offset, value) in values {
            data[offset] = value;
        }

        debug!("container: decoded {} entries", decoded);
        Ok(matrix)
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::matrix::Layout;

    #[test]
    fn test_concrete_grayscale_stream() {
        let bytes = [
            2u8, 0, 2, 0, 0, 1, 0x00, 0x08, 0xE8, 0x03, 0x00, 0x00, 0x00, 0x00,
        ];
        let m = ContainerReader::new(&bytes[..]).read_matrix().unwrap();
        let expected =
            CoefficientMatrix::from_rows(&[vec![0.0, 1000.0], vec![0.0, 0.0]]).unwrap();
        assert_eq!(m, expected);
    }

    #[test]
    fn test_premature_end() {
        let bytes = [2u8, 0, 2, 0, 0, 1, 0x00, 0x00, 0x00];
        assert!(matches!(
            ContainerReader::new(&bytes[..]).read_matrix(),
            Err(ContainerError::ShapeMismatch { expected: 4, found: 3 })
        ));
    }

    #[test]
    fn test_trailing_entries() {
        let bytes = [1u8, 0, 2, 0, 0, 1, 0x00, 0x00, 0x00, 0x08, 1, 0, 0, 0];
        assert!(matches!(
            ContainerReader::new(&bytes[..]).read_matrix(),
            Err(ContainerError::ShapeMismatch { expected: 2, found: 4 })
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = [1u8, 0, 2, 0, 0, 0, 0x00, 0b1100, 9, 0];
        assert!(matches!(
            ContainerReader::new(&bytes[..]).read_matrix(),
            Err(ContainerError::TruncatedEntry { row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_huge_header_without_entries() {
        let bytes = [0xFFu8, 0xFF, 0xFF, 0xFF, 0, 0];
        assert!(matches!(
            ContainerReader::new(&bytes[..]).read_matrix(),
            Err(ContainerError::ShapeMismatch { expected: 4_294_836_225, found: 0 })
        ));
    }

    #[test]
    fn test_huge_header_with_few_entries() {
        let bytes = [0xFFu8, 0xFF, 0xFF, 0xFF, 0, 1, 0x00, 0x08, 7, 0, 0, 0];
        assert!(matches!(
            ContainerReader::new(&bytes[..]).read_matrix(),
            Err(ContainerError::ShapeMismatch { found: 2, .. })
        ));
    }

    #[test]
    fn test_color_stream_with_shift() {
        // 1x2 RGB, shift 4: pixel 0 green=3, pixel 1 red=-1 and blue=2
        let bytes = [
            1u8, 0, 2, 0, 4, 0, 0b1010, 3, 0, 0, 0, 0b1101, 0xFF, 0xFF, 0xFF, 0xFF, 2, 0, 0, 0,
        ];
        let m = ContainerReader::new(&bytes[..]).read_matrix().unwrap();
        assert_eq!(m.layout(), Layout::Rgb);
        assert_eq!(m.pixel(0, 0), &[0.0, 48.0, 0.0]);
        assert_eq!(m.pixel(0, 1), &[-16.0, 0.0, 32.0]);
    }
}
