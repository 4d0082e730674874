// src/container/header.rs

use super::error::{ContainerError, Result};
use super::matrix::Layout;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{ErrorKind, Read, Write};

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 6;

/// Fixed 6-byte preamble of an AAA stream.
///
/// | offset | field        | type |
/// |--------|--------------|------|
/// | 0      | height       | u16  |
/// | 2      | width        | u16  |
/// | 4      | scale_shift  | u8   |
/// | 5      | is_grayscale | u8   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub height: u16,
    pub width: u16,
    pub scale_shift: u8,
    pub is_grayscale: bool,
}

impl ContainerHeader {
    /// Validates the matrix dimensions against the u16 header fields.
    pub fn for_shape(height: usize, width: usize, layout: Layout, scale_shift: u8) -> Result<Self> {
        let invalid = || ContainerError::InvalidShape { height, width };
        if height == 0 || width == 0 {
            return Err(invalid());
        }
        Ok(Self {
            height: u16::try_from(height).map_err(|_| invalid())?,
            width: u16::try_from(width).map_err(|_| invalid())?,
            scale_shift,
            is_grayscale: layout == Layout::Grayscale,
        })
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        if self.is_grayscale {
            Layout::Grayscale
        } else {
            Layout::Rgb
        }
    }

    /// Number of entries the stream must carry.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.height as usize * self.width as usize
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<LittleEndian>(self.height)?;
        writer.write_u16::<LittleEndian>(self.width)?;
        writer.write_u8(self.scale_shift)?;
        writer.write_u8(self.is_grayscale as u8)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; HEADER_LEN];
        match reader.read_exact(&mut raw) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(ContainerError::MalformedHeader(format!(
                    "stream is shorter than {} bytes",
                    HEADER_LEN
                )));
            }
            Err(e) => return Err(e.into()),
        }

        let mut cursor = &raw[..];
        let height = cursor.read_u16::<LittleEndian>()?;
        let width = cursor.read_u16::<LittleEndian>()?;
        let scale_shift = cursor.read_u8()?;
        let is_grayscale = match cursor.read_u8()? {
            0 => false,
            1 => true,
            other => {
                return Err(ContainerError::MalformedHeader(format!(
                    "grayscale flag must be 0 or 1, got {}",
                    other
                )));
            }
        };

        if height == 0 || width == 0 {
            return Err(ContainerError::MalformedHeader(format!(
                "declared shape {}x{} has zero area",
                height, width
            )));
        }

        Ok(Self {
            height,
            width,
            scale_shift,
            is_grayscale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = ContainerHeader {
            height: 0x0102,
            width: 0x0304,
            scale_shift: 5,
            is_grayscale: true,
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf, vec![0x02, 0x01, 0x04, 0x03, 5, 1]);
        assert_eq!(ContainerHeader::read_from(&mut buf.as_slice()).unwrap(), header);
    }

    #[test]
    fn test_short_header() {
        let buf = [2u8, 0, 2, 0, 0];
        assert!(matches!(
            ContainerHeader::read_from(&mut &buf[..]),
            Err(ContainerError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_zero_area_header() {
        let buf = [0u8, 0, 4, 0, 0, 1];
        assert!(matches!(
            ContainerHeader::read_from(&mut &buf[..]),
            Err(ContainerError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_bad_grayscale_byte() {
        let buf = [1u8, 0, 1, 0, 0, 2];
        assert!(matches!(
            ContainerHeader::read_from(&mut &buf[..]),
            Err(ContainerError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_for_shape_limits() {
        assert!(ContainerHeader::for_shape(65535, 1, Layout::Rgb, 0).is_ok());
        assert!(matches!(
            ContainerHeader::for_shape(65536, 1, Layout::Rgb, 0),
            Err(ContainerError::InvalidShape { .. })
        ));
        assert!(ContainerHeader::for_shape(0, 3, Layout::Grayscale, 0).is_err());
    }
}
