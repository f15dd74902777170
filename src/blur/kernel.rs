use ndarray::{Array1, Array2, ArrayView2, ArrayViewMut2};

use crate::{
    setting::{KernelSize, Sigma},
    Error, Result,
};

/// Normalized 2D gaussian, stored as its (row, column) 1D factors.
///
/// The outer product `rows ⊗ cols` sums to one, so convolving with the two
/// factors in turn is exactly the 2D convolution.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    rows: Array1<f32>,
    cols: Array1<f32>,
}

impl GaussianKernel {
    pub fn new(kernel_size: KernelSize, sigma: Sigma) -> Result<Self> {
        let [row_size, col_size] = kernel_size.per_axis();
        let [row_sigma, col_sigma] = sigma.per_axis();
        Ok(Self {
            rows: Self::factor(row_size, row_sigma)?,
            cols: Self::factor(col_size, col_sigma)?,
        })
    }

    /// (height, width)
    pub fn size(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    pub fn rows(&self) -> &Array1<f32> {
        &self.rows
    }

    pub fn cols(&self) -> &Array1<f32> {
        &self.cols
    }

    pub fn weights(&self) -> Array2<f32> {
        let (h, w) = self.size();
        Array2::from_shape_fn((h, w), |(y, x)| self.rows[y] * self.cols[x])
    }

    /// Zero padded, same sized convolution of one plane into `dst`.
    pub fn convolve_plane(&self, src: ArrayView2<f32>, mut dst: ArrayViewMut2<f32>) {
        let (h, w) = src.dim();
        let (row_pad, col_pad) = (self.rows.len() / 2, self.cols.len() / 2);

        // horizontal pass
        let horizontal = Array2::from_shape_fn((h, w), |(y, x)| {
            self.cols
                .iter()
                .enumerate()
                .fold(0., |accu, (k, weight)| match (x + k).checked_sub(col_pad) {
                    Some(sx) if sx < w => accu + weight * src[(y, sx)],
                    _ => accu,
                })
        });

        // vertical pass
        for ((y, x), out) in dst.indexed_iter_mut() {
            *out = self
                .rows
                .iter()
                .enumerate()
                .fold(0., |accu, (k, weight)| match (y + k).checked_sub(row_pad) {
                    Some(sy) if sy < h => accu + weight * horizontal[(sy, x)],
                    _ => accu,
                });
        }
    }

    fn factor(size: usize, sigma: f32) -> Result<Array1<f32>> {
        if size == 0 || size % 2 == 0 {
            return Err(Error::InvalidKernel(format!(
                "kernel size must be a positive odd number, got {}",
                size
            )));
        }
        if !sigma.is_finite() || sigma <= 0. {
            return Err(Error::InvalidKernel(format!(
                "sigma must be a positive finite number, got {}",
                sigma
            )));
        }

        let mean = (size - 1) as f32 / 2.;
        let scale = 1. / (sigma * (2. * std::f32::consts::PI).sqrt());
        let gaussian = Array1::from_shape_fn(size, |i| {
            scale * (-((i as f32 - mean) / sigma).powi(2) / 2.).exp()
        });
        let sum = gaussian.sum();
        Ok(gaussian / sum)
    }
}
