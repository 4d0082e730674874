// src/pipeline/raster.rs

use crate::container::{CoefficientMatrix, Layout};
use crate::utils::error::{AaaError, Result};
use ::image::{GrayImage, RgbImage};
use log::debug;
use std::path::Path;

/// ITU-R BT.601 luma weights for red, green and blue.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Opens any image the `image` crate can decode as an RGB matrix with
/// intensities in [0, 255].
pub fn open_image<P: AsRef<Path>>(path: P) -> Result<CoefficientMatrix> {
    let img = ::image::open(path.as_ref())?.to_rgb8();
    matrix_from_rgb(&img)
}

/// Converts 8-bit RGB pixels to an RGB matrix.
pub fn matrix_from_rgb(img: &RgbImage) -> Result<CoefficientMatrix> {
    let (w, h) = img.dimensions();
    let pixels: &[[u8; 3]] = bytemuck::cast_slice(img.as_raw());
    let data = pixels
        .iter()
        .flat_map(|px| px.iter().map(|&c| c as f64))
        .collect();
    debug!("raster: loaded {}x{} RGB image", w, h);
    Ok(CoefficientMatrix::from_vec(h as usize, w as usize, Layout::Rgb, data)?)
}

/// Collapses an RGB matrix to one luma channel. Grayscale input is
/// returned unchanged.
pub fn rgb_to_grayscale(matrix: &CoefficientMatrix) -> CoefficientMatrix {
    if matrix.is_grayscale() {
        return matrix.clone();
    }
    let data = matrix
        .pixels()
        .map(|px| px.iter().zip(LUMA_WEIGHTS).map(|(v, w)| v * w).sum::<f64>())
        .collect::<Vec<f64>>();
    let mut gray = CoefficientMatrix::zeros(matrix.height(), matrix.width(), Layout::Grayscale);
    gray.as_mut_slice().copy_from_slice(&data);
    gray
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Writes a matrix as an 8-bit image. The file format follows the
/// extension of `path`; values are rounded and clamped to [0, 255].
pub fn save_image<P: AsRef<Path>>(matrix: &CoefficientMatrix, path: P) -> Result<()> {
    let (w, h) = (matrix.width() as u32, matrix.height() as u32);
    let bytes: Vec<u8> = matrix.as_slice().iter().map(|&v| to_u8(v)).collect();
    let bad_size = || AaaError::InvalidArg(format!("cannot build a {}x{} image", w, h));

    match matrix.layout() {
        Layout::Grayscale => GrayImage::from_raw(w, h, bytes)
            .ok_or_else(bad_size)?
            .save(path.as_ref())?,
        Layout::Rgb => RgbImage::from_raw(w, h, bytes)
            .ok_or_else(bad_size)?
            .save(path.as_ref())?,
    }
    debug!("raster: saved {}x{} image to {}", w, h, path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::Rgb;

    #[test]
    fn test_matrix_from_rgb() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(1, 0, Rgb([10, 20, 30]));
        let m = matrix_from_rgb(&img).unwrap();
        assert_eq!(m.height(), 1);
        assert_eq!(m.width(), 2);
        assert_eq!(m.pixel(0, 1), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_grayscale_weights() {
        let mut m = CoefficientMatrix::zeros(1, 2, Layout::Rgb);
        for c in 0..3 {
            m.set(0, 0, c, 255.0);
        }
        m.set(0, 1, 1, 100.0);
        let g = rgb_to_grayscale(&m);
        assert!(g.is_grayscale());
        assert!((g.get(0, 0, 0) - 255.0).abs() < 1e-9);
        assert!((g.get(0, 1, 0) - 58.7).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_clamping() {
        assert_eq!(to_u8(-4.0), 0);
        assert_eq!(to_u8(254.6), 255);
        assert_eq!(to_u8(300.0), 255);
        assert_eq!(to_u8(12.4), 12);
    }
}
