// src/pipeline/mod.rs

//! Image to spectrum to container, and back.
//!
//! Each channel is transformed independently with a 2D DCT, small
//! coefficients are zeroed, and the sparse spectrum is stored with
//! [`crate::container`].

pub mod params;
pub mod raster;
pub mod transform;

pub use params::CompressParams;
pub use raster::{open_image, rgb_to_grayscale, save_image};
pub use transform::Dct2d;

use crate::container::{self, CoefficientMatrix, ContainerHeader, Layout};
use crate::utils::error::{AaaError, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

fn transform_plane(
    mut plane: Vec<f64>,
    height: usize,
    width: usize,
    dir: Direction,
) -> Result<Vec<f64>> {
    let mut dct = Dct2d::new();
    match dir {
        Direction::Forward => dct.forward(&mut plane, height, width)?,
        Direction::Inverse => dct.inverse(&mut plane, height, width)?,
    }
    Ok(plane)
}

fn transform_channels(matrix: &CoefficientMatrix, dir: Direction) -> Result<CoefficientMatrix> {
    let (h, w) = (matrix.height(), matrix.width());
    let channels: Vec<usize> = (0..matrix.layout().channels()).collect();

    #[cfg(feature = "rayon")]
    let planes: Vec<Vec<f64>> = channels
        .par_iter()
        .map(|&c| transform_plane(matrix.channel_plane(c), h, w, dir))
        .collect::<Result<_>>()?;
    #[cfg(not(feature = "rayon"))]
    let planes: Vec<Vec<f64>> = channels
        .iter()
        .map(|&c| transform_plane(matrix.channel_plane(c), h, w, dir))
        .collect::<Result<_>>()?;

    let out = match matrix.layout() {
        Layout::Grayscale => {
            let plane = planes.into_iter().next().unwrap_or_default();
            CoefficientMatrix::from_vec(h, w, Layout::Grayscale, plane)?
        }
        Layout::Rgb => CoefficientMatrix::from_planes(h, w, [&planes[0], &planes[1], &planes[2]])?,
    };
    Ok(out)
}

/// Forward 2D DCT of every channel.
pub fn forward(matrix: &CoefficientMatrix) -> Result<CoefficientMatrix> {
    transform_channels(matrix, Direction::Forward)
}

/// Inverse 2D DCT of every channel.
pub fn inverse(matrix: &CoefficientMatrix) -> Result<CoefficientMatrix> {
    transform_channels(matrix, Direction::Inverse)
}

/// Zeroes every coefficient with `|v| < epsilon`. Returns how many
/// non-zero coefficients remain.
pub fn threshold(matrix: &mut CoefficientMatrix, epsilon: f64) -> usize {
    let mut kept = 0;
    for v in matrix.as_mut_slice() {
        if v.abs() < epsilon {
            *v = 0.0;
        } else if *v != 0.0 {
            kept += 1;
        }
    }
    kept
}

/// Transforms and thresholds an image matrix into a sparse spectrum.
pub fn spectrum(image: &CoefficientMatrix, params: &CompressParams) -> Result<CoefficientMatrix> {
    if params.epsilon.is_nan() || params.epsilon < 0.0 {
        return Err(AaaError::InvalidArg(format!(
            "epsilon must be a non-negative number, got {}",
            params.epsilon
        )));
    }
    let source = if params.grayscale {
        rgb_to_grayscale(image)
    } else {
        image.clone()
    };
    let mut coeffs = forward(&source)?;
    let kept = threshold(&mut coeffs, params.epsilon);
    debug!(
        "pipeline: kept {} of {} coefficients at epsilon={}",
        kept,
        coeffs.as_slice().len(),
        params.epsilon
    );
    Ok(coeffs)
}

/// Replaces the extension of `path`.
pub fn derive_path<P: AsRef<Path>>(path: P, extension: &str) -> PathBuf {
    path.as_ref().with_extension(extension)
}

/// Reads an image, compresses it, and writes the container to `output`.
pub fn compress_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    params: &CompressParams,
) -> Result<ContainerHeader> {
    let start = Instant::now();
    let image = open_image(&input)?;
    info!(
        "Opened {} ({}x{}), took {:.2} s",
        input.as_ref().display(),
        image.width(),
        image.height(),
        start.elapsed().as_secs_f64()
    );

    let start = Instant::now();
    let coeffs = spectrum(&image, params)?;
    let header = container::write_file(&coeffs, &output)?;
    info!(
        "Wrote {}, took {:.2} s",
        output.as_ref().display(),
        start.elapsed().as_secs_f64()
    );
    Ok(header)
}

/// Reads a container, inverts the transform, and saves the image.
pub fn decompress_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<()> {
    let start = Instant::now();
    let coeffs = container::read_file(&input)?;
    let image = inverse(&coeffs)?;
    save_image(&image, &output)?;
    info!(
        "Converted {} to {}, took {:.2} s",
        input.as_ref().display(),
        output.as_ref().display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
