// src/container/entry.rs

//! Per-pixel entry codec.
//!
//! An entry is one flag byte followed by zero to three little-endian i32
//! payloads.
//!
//! ```text
//! 00000000  no data, pixel is zero
//! 00001000  grayscale value follows
//! 000011xx  red payload present
//! 00001x1x  green payload present
//! 00001xx1  blue payload present
//! ```
//!
//! Payloads follow in red, green, blue order for the bits that are set.

use super::error::{ContainerError, Result};
use super::matrix::Layout;
use super::scale::{dequantize, quantize};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{ErrorKind, Read, Write};

/// Flag byte of an all-zero pixel.
pub const FLAG_EMPTY: u8 = 0b0000_0000;
/// Set on every entry that carries payload.
pub const FLAG_DATA: u8 = 0b0000_1000;
/// Presence bits for red, green and blue, in payload order.
pub const CHANNEL_BITS: [u8; 3] = [0b0100, 0b0010, 0b0001];
const CHANNEL_MASK: u8 = 0b0111;

/// One pixel's encoded form: the flag byte and the quantized payloads
/// of the channels it marks present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    flag: u8,
    payload: [i32; 3],
    len: usize,
}

impl Entry {
    /// The single zero byte.
    pub const EMPTY: Entry = Entry {
        flag: FLAG_EMPTY,
        payload: [0; 3],
        len: 0,
    };

    /// Encodes a grayscale value.
    pub fn gray(value: f64, shift: u8) -> Self {
        if value == 0.0 {
            return Self::EMPTY;
        }
        Self {
            flag: FLAG_DATA,
            payload: [quantize(value, shift), 0, 0],
            len: 1,
        }
    }

    /// Encodes a red, green, blue triple. Each non-zero channel shifts a
    /// presence bit into the flag and appends its payload.
    pub fn rgb(values: &[f64], shift: u8) -> Self {
        debug_assert_eq!(values.len(), 3);
        let mut flag: u8 = 1;
        let mut payload = [0i32; 3];
        let mut len = 0;
        for &v in values {
            flag <<= 1;
            if v != 0.0 {
                flag |= 1;
                payload[len] = quantize(v, shift);
                len += 1;
            }
        }
        // 0b1000 with no payload must still go out as the plain zero byte.
        if len == 0 {
            return Self::EMPTY;
        }
        Self { flag, payload, len }
    }

    /// Encodes one pixel of a matrix with the given layout.
    #[inline]
    pub fn for_pixel(layout: Layout, values: &[f64], shift: u8) -> Self {
        match layout {
            Layout::Grayscale => Self::gray(values[0], shift),
            Layout::Rgb => Self::rgb(values, shift),
        }
    }

    #[inline]
    pub fn flag(&self) -> u8 {
        self.flag
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flag & FLAG_DATA == 0
    }

    /// Quantized payloads in stream order.
    #[inline]
    pub fn payload(&self) -> &[i32] {
        &self.payload[..self.len]
    }

    /// Encoded size in bytes.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        1 + 4 * self.len
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(self.flag)?;
        for &p in self.payload() {
            writer.write_i32::<LittleEndian>(p)?;
        }
        Ok(())
    }

    /// Reads the entry for pixel (`row`, `col`).
    ///
    /// Returns `Ok(None)` if the stream ends before the flag byte. Ending
    /// anywhere inside the payload is a `TruncatedEntry`.
    pub fn read_from<R: Read>(
        reader: &mut R,
        layout: Layout,
        row: usize,
        col: usize,
    ) -> Result<Option<Self>> {
        let flag = match reader.read_u8() {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if flag & FLAG_DATA == 0 {
            return Ok(Some(Self::EMPTY));
        }

        let count = match layout {
            Layout::Grayscale => {
                if flag & CHANNEL_MASK != 0 {
                    return Err(ContainerError::InvalidEntryFlag { flag, row, col });
                }
                1
            }
            Layout::Rgb => (flag & CHANNEL_MASK).count_ones() as usize,
        };

        let mut payload = [0i32; 3];
        for slot in payload.iter_mut().take(count) {
            *slot = match reader.read_i32::<LittleEndian>() {
                Ok(v) => v,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Err(ContainerError::TruncatedEntry { row, col });
                }
                Err(e) => return Err(e.into()),
            };
        }

        Ok(Some(Self {
            flag,
            payload,
            len: count,
        }))
    }

    /// Dequantized values as (channel, value) pairs. Channels not listed
    /// are zero.
    pub fn channels(&self, layout: Layout, shift: u8) -> impl Iterator<Item = (usize, f64)> + '_ {
        let present: Vec<usize> = match layout {
            Layout::Grayscale if !self.is_empty() => vec![0],
            Layout::Grayscale => Vec::new(),
            Layout::Rgb => (0..3).filter(|&c| self.flag & CHANNEL_BITS[c] != 0).collect(),
        };
        present
            .into_iter()
            .zip(self.payload())
            .map(move |(c, &p)| (c, dequantize(p, shift)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(entry: &Entry) -> Vec<u8> {
        let mut buf = Vec::new();
        entry.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), entry.encoded_len());
        buf
    }

    #[test]
    fn test_gray_zero_is_single_byte() {
        assert_eq!(encode(&Entry::gray(0.0, 0)), vec![0x00]);
        assert_eq!(encode(&Entry::gray(-0.0, 3)), vec![0x00]);
    }

    #[test]
    fn test_gray_value() {
        assert_eq!(
            encode(&Entry::gray(1000.0, 0)),
            vec![0x08, 0xE8, 0x03, 0x00, 0x00]
        );
        assert_eq!(
            encode(&Entry::gray(-1.0, 0)),
            vec![0x08, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_rgb_flags() {
        assert_eq!(Entry::rgb(&[5.0, 0.0, 0.0], 0).flag(), 0b1100);
        assert_eq!(Entry::rgb(&[0.0, 5.0, 0.0], 0).flag(), 0b1010);
        assert_eq!(Entry::rgb(&[0.0, 0.0, 5.0], 0).flag(), 0b1001);
        assert_eq!(Entry::rgb(&[1.0, 2.0, 3.0], 0).flag(), 0b1111);
        assert_eq!(Entry::rgb(&[1.0, 0.0, 3.0], 0).payload(), &[1, 3]);
    }

    #[test]
    fn test_rgb_without_channels_collapses_to_zero_byte() {
        let entry = Entry::rgb(&[0.0, 0.0, 0.0], 0);
        assert_eq!(entry, Entry::EMPTY);
        assert_eq!(encode(&entry), vec![0x00]);
    }

    #[test]
    fn test_rgb_payload_order() {
        let bytes = encode(&Entry::rgb(&[0.0, 2.0, -3.0], 0));
        assert_eq!(
            bytes,
            vec![0b1011, 2, 0, 0, 0, 0xFD, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_read_rgb_entry() {
        let bytes = [0b1101u8, 16, 0, 0, 0, 32, 0, 0, 0];
        let entry = Entry::read_from(&mut &bytes[..], Layout::Rgb, 0, 0)
            .unwrap()
            .unwrap();
        let values: Vec<(usize, f64)> = entry.channels(Layout::Rgb, 2).collect();
        assert_eq!(values, vec![(0, 64.0), (2, 128.0)]);
    }

    #[test]
    fn test_read_zero_consumes_one_byte() {
        let bytes = [0x00u8, 0x08];
        let mut reader = &bytes[..];
        let entry = Entry::read_from(&mut reader, Layout::Grayscale, 0, 0)
            .unwrap()
            .unwrap();
        assert!(entry.is_empty());
        assert_eq!(reader, &[0x08]);
        assert_eq!(entry.channels(Layout::Grayscale, 0).count(), 0);
    }

    #[test]
    fn test_read_eof_at_flag() {
        let bytes: [u8; 0] = [];
        assert!(Entry::read_from(&mut &bytes[..], Layout::Grayscale, 0, 0)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_read_truncated_payload() {
        let bytes = [0b1110u8, 1, 0, 0, 0, 2, 0];
        assert!(matches!(
            Entry::read_from(&mut &bytes[..], Layout::Rgb, 3, 4),
            Err(ContainerError::TruncatedEntry { row: 3, col: 4 })
        ));
    }

    #[test]
    fn test_grayscale_rejects_channel_bits() {
        let bytes = [0b1100u8, 1, 0, 0, 0];
        assert!(matches!(
            Entry::read_from(&mut &bytes[..], Layout::Grayscale, 0, 1),
            Err(ContainerError::InvalidEntryFlag { flag: 0b1100, .. })
        ));
    }
}
