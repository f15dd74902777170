use ndarray::{Array3, Array4, ArrayView4, Zip};

pub use kernel::GaussianKernel;

use crate::{
    setting::{KernelSize, Sigma},
    Error, Result,
};

pub mod kernel;

/// Depthwise gaussian blur over `[batch, channels, height, width]` tensors.
#[derive(Debug, Clone)]
pub struct GaussianSmoothing {
    channels: usize,
    kernel: GaussianKernel,
}

impl GaussianSmoothing {
    #[tracing::instrument(name = "Initialize gaussian smoothing", err)]
    pub fn new(channels: usize, kernel_size: KernelSize, sigma: Sigma) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidConfig("channels must be at least 1".into()));
        }
        let kernel = GaussianKernel::new(kernel_size, sigma)?;
        tracing::debug!(size = ?kernel.size(), "gaussian kernel ready");
        Ok(Self { channels, kernel })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    /// Each (batch, channel) plane is convolved independently with zero padding,
    /// so the output keeps the input shape.
    pub fn forward(&self, input: ArrayView4<f32>) -> Result<Array4<f32>> {
        let (n, c, h, w) = input.dim();
        if c != self.channels {
            return Err(Error::InvalidInputShape(format!(
                "expected {} channels, got {}",
                self.channels, c
            )));
        }

        let input = input.as_standard_layout();
        let planes = input.view().into_shape_with_order((n * c, h, w))?;
        let mut output = Array3::<f32>::zeros((n * c, h, w));

        Zip::from(output.outer_iter_mut())
            .and(planes.outer_iter())
            .par_for_each(|dst, src| self.kernel.convolve_plane(src, dst));

        Ok(output.into_shape_with_order((n, c, h, w))?)
    }
}
