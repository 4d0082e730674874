// src/container/matrix.rs

use super::error::{ContainerError, Result};

/// Channel arrangement of a coefficient matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One value per pixel, shape (H, W).
    Grayscale,
    /// Red, green and blue values per pixel, shape (H, W, 3).
    Rgb,
}

impl Layout {
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            Layout::Grayscale => 1,
            Layout::Rgb => 3,
        }
    }
}

/// Owns the real-valued coefficients of one image, stored row-major with
/// interleaved channels. Indexed by (row, col, channel).
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientMatrix {
    height: usize,
    width: usize,
    layout: Layout,
    data: Vec<f64>,
}

impl CoefficientMatrix {
    /// Allocates a zero-filled matrix.
    pub fn zeros(height: usize, width: usize, layout: Layout) -> Self {
        Self {
            height,
            width,
            layout,
            data: vec![0.0; height * width * layout.channels()],
        }
    }

    /// Allocates a zero-filled matrix, reporting an allocation failure
    /// instead of aborting.
    pub fn try_zeros(height: usize, width: usize, layout: Layout) -> Result<Self> {
        let failed = || ContainerError::AllocationFailed {
            height,
            width,
            channels: layout.channels(),
        };
        let len = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(layout.channels()))
            .ok_or_else(failed)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| failed())?;
        data.resize(len, 0.0);
        Ok(Self {
            height,
            width,
            layout,
            data,
        })
    }

    /// Wraps an interleaved row-major buffer.
    pub fn from_vec(height: usize, width: usize, layout: Layout, data: Vec<f64>) -> Result<Self> {
        if data.len() != height * width * layout.channels() {
            return Err(ContainerError::ShapeMismatch {
                expected: height * width * layout.channels(),
                found: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            layout,
            data,
        })
    }

    /// Builds a grayscale matrix from nested rows. All rows must share a length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != width) {
            return Err(ContainerError::ShapeMismatch {
                expected: width,
                found: bad.len(),
            });
        }
        let data = rows.iter().flatten().copied().collect();
        Self::from_vec(height, width, Layout::Grayscale, data)
    }

    /// Interleaves three equally sized planes into an RGB matrix.
    pub fn from_planes(height: usize, width: usize, planes: [&[f64]; 3]) -> Result<Self> {
        let npix = height * width;
        if let Some(bad) = planes.iter().find(|p| p.len() != npix) {
            return Err(ContainerError::ShapeMismatch {
                expected: npix,
                found: bad.len(),
            });
        }
        let mut data = Vec::with_capacity(npix * 3);
        for i in 0..npix {
            data.extend(planes.iter().map(|p| p[i]));
        }
        Self::from_vec(height, width, Layout::Rgb, data)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn is_grayscale(&self) -> bool {
        self.layout == Layout::Grayscale
    }

    #[inline]
    fn offset(&self, row: usize, col: usize, channel: usize) -> usize {
        debug_assert!(row < self.height && col < self.width && channel < self.layout.channels());
        (row * self.width + col) * self.layout.channels() + channel
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> f64 {
        self.data[self.offset(row, col, channel)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: f64) {
        let idx = self.offset(row, col, channel);
        self.data[idx] = value;
    }

    /// All channel values of one pixel.
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> &[f64] {
        let start = self.offset(row, col, 0);
        &self.data[start..start + self.layout.channels()]
    }

    /// Iterates pixels in row-major order.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.layout.channels())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Copies one channel out as a dense H×W plane.
    pub fn channel_plane(&self, channel: usize) -> Vec<f64> {
        self.data
            .iter()
            .skip(channel)
            .step_by(self.layout.channels())
            .copied()
            .collect()
    }

    /// Largest absolute value over every channel of every pixel.
    pub fn max_magnitude(&self) -> f64 {
        self.data.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }
}
