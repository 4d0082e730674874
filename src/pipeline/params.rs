// src/pipeline/params.rs

/// Settings for turning an image into an AAA container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressParams {
    /// Coefficients with magnitude below this are dropped.
    pub epsilon: f64,
    /// Convert to a single luma channel before the transform.
    pub grayscale: bool,
}

impl Default for CompressParams {
    fn default() -> Self {
        Self {
            epsilon: 0.0, // keep everything but exact zeros
            grayscale: false,
        }
    }
}

impl CompressParams {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            ..Default::default()
        }
    }

    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }
}
