// src/container/scale.rs

//! Global quantization shift.
//!
//! One shift is chosen per matrix so that the largest coefficient, once
//! shifted right, fits a signed 32-bit payload. The same shift is applied
//! to every channel of every pixel; the low bits it discards are lost.

use super::error::{ContainerError, Result};
use super::matrix::CoefficientMatrix;
use log::debug;

/// Width of every entry payload, in bits.
pub const PAYLOAD_BITS: i64 = 32;

/// Computes the scale shift for a whole matrix.
///
/// Fails with `UnrepresentableMagnitude` if any coefficient is NaN or
/// infinite, or if the magnitude would need a shift wider than a byte.
pub fn select_shift(matrix: &CoefficientMatrix) -> Result<u8> {
    if let Some(&bad) = matrix.as_slice().iter().find(|v| !v.is_finite()) {
        return Err(ContainerError::UnrepresentableMagnitude(bad));
    }
    let magnitude = matrix.max_magnitude();
    let shift = shift_for_magnitude(magnitude)?;
    debug!("scale: magnitude={} shift={}", magnitude, shift);
    Ok(shift)
}

/// `ceil(log2(magnitude)) + 1 - 32`, floored at zero.
pub fn shift_for_magnitude(magnitude: f64) -> Result<u8> {
    if !magnitude.is_finite() || magnitude < 0.0 {
        return Err(ContainerError::UnrepresentableMagnitude(magnitude));
    }
    // log2(0) is -inf
    if magnitude == 0.0 {
        return Ok(0);
    }

    let bits = magnitude.log2().ceil() as i64;
    let mut shift = (bits + 1 - PAYLOAD_BITS).max(0);

    // An exact power of two such as 2^31 passes the formula yet overflows i32.
    while (magnitude.trunc() / pow2(shift)).floor() > i32::MAX as f64 {
        shift += 1;
    }

    u8::try_from(shift).map_err(|_| ContainerError::UnrepresentableMagnitude(magnitude))
}

/// Converts a coefficient to its payload: `int(v) >> shift`.
///
/// The integer step truncates toward zero; the shift is arithmetic, so
/// negative values round toward negative infinity.
#[inline]
pub fn quantize(value: f64, shift: u8) -> i32 {
    (value.trunc() / pow2(shift as i64)).floor() as i32
}

/// Inverse of [`quantize`]: `payload << shift`.
#[inline]
pub fn dequantize(payload: i32, shift: u8) -> f64 {
    payload as f64 * pow2(shift as i64)
}

#[inline]
fn pow2(exp: i64) -> f64 {
    2f64.powi(exp as i32)
}
