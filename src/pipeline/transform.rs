// src/pipeline/transform.rs

//! Separable 2D DCT-II over a single channel plane.
//!
//! Each axis uses `X[k] = 2 * sum x[n] * cos(pi * k * (2n + 1) / 2N)`, and
//! the inverse applies the matching DCT-III divided by N, so a forward
//! then inverse pass reproduces the plane up to rounding.

use crate::utils::error::{AaaError, Result};
use rustdct::DctPlanner;

/// Owns a DCT planner so repeated planes of the same size reuse plans.
pub struct Dct2d {
    planner: DctPlanner<f64>,
}

impl Default for Dct2d {
    fn default() -> Self {
        Self::new()
    }
}

impl Dct2d {
    pub fn new() -> Self {
        Self {
            planner: DctPlanner::new(),
        }
    }

    /// Forward transform of a row-major `height` x `width` plane, in place.
    pub fn forward(&mut self, plane: &mut [f64], height: usize, width: usize) -> Result<()> {
        check_shape(plane, height, width)?;
        if plane.is_empty() {
            return Ok(());
        }

        let row_dct = self.planner.plan_dct2(width);
        for row in plane.chunks_exact_mut(width) {
            row_dct.process_dct2(row);
            row.iter_mut().for_each(|v| *v *= 2.0);
        }

        let col_dct = self.planner.plan_dct2(height);
        let mut column = vec![0.0; height];
        for x in 0..width {
            gather_column(plane, width, x, &mut column);
            col_dct.process_dct2(&mut column);
            column.iter_mut().for_each(|v| *v *= 2.0);
            scatter_column(&column, plane, width, x);
        }
        Ok(())
    }

    /// Inverse of [`Dct2d::forward`], in place.
    pub fn inverse(&mut self, plane: &mut [f64], height: usize, width: usize) -> Result<()> {
        check_shape(plane, height, width)?;
        if plane.is_empty() {
            return Ok(());
        }

        let row_dct = self.planner.plan_dct3(width);
        let row_norm = 1.0 / width as f64;
        for row in plane.chunks_exact_mut(width) {
            row_dct.process_dct3(row);
            row.iter_mut().for_each(|v| *v *= row_norm);
        }

        let col_dct = self.planner.plan_dct3(height);
        let col_norm = 1.0 / height as f64;
        let mut column = vec![0.0; height];
        for x in 0..width {
            gather_column(plane, width, x, &mut column);
            col_dct.process_dct3(&mut column);
            column.iter_mut().for_each(|v| *v *= col_norm);
            scatter_column(&column, plane, width, x);
        }
        Ok(())
    }
}

fn check_shape(plane: &[f64], height: usize, width: usize) -> Result<()> {
    if height.checked_mul(width) != Some(plane.len()) {
        return Err(AaaError::InvalidArg(format!(
            "plane of {} values does not match a {}x{} shape",
            plane.len(),
            height,
            width
        )));
    }
    Ok(())
}

#[inline]
fn gather_column(plane: &[f64], width: usize, x: usize, out: &mut [f64]) {
    for (y, v) in out.iter_mut().enumerate() {
        *v = plane[y * width + x];
    }
}

#[inline]
fn scatter_column(column: &[f64], plane: &mut [f64], width: usize, x: usize) {
    for (y, &v) in column.iter().enumerate() {
        plane[y * width + x] = v;
    }
}
