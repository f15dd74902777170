//! Landmark to heatmap conversion.
//!
//! Every landmark is marked as a single hot pixel in its own channel, the
//! stack is blurred with a fixed gaussian and then divided by its global
//! maximum so the brightest pixel of the whole batch reads exactly `1.0`.

pub use tensor::{Heatmap, HeatmapData, Peak};

use crate::{
    blur::GaussianSmoothing,
    landmark::Landmarks,
    setting::{DegeneratePolicy, HeatmapConfig, Setting},
    Error, Result,
};

pub mod tensor;

#[derive(Debug, Clone)]
pub struct LandmarkHeatmap {
    config: HeatmapConfig,
    smoothing: GaussianSmoothing,
}

impl LandmarkHeatmap {
    #[tracing::instrument(
        name = "Initialize landmark heatmap",
        skip(config),
        fields(channels = config.channels, size = ?config.size),
        err
    )]
    pub fn new(config: &HeatmapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            smoothing: GaussianSmoothing::new(config.channels, config.kernel_size, config.sigma)?,
            config: config.clone(),
        })
    }

    pub fn from_setting(setting: &Setting) -> Result<Self> {
        Self::new(setting.heatmap())
    }

    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    pub fn smoothing(&self) -> &GaussianSmoothing {
        &self.smoothing
    }

    /// Converts `[batch, channels, >=2]` landmarks into `[batch, channels, height, width]` heatmaps.
    #[tracing::instrument(
        name = "Landmarks to heatmap",
        skip_all,
        fields(batch = landmarks.batch(), points = landmarks.points()),
        err
    )]
    pub fn landmarks_to_heatmap(&self, landmarks: &Landmarks) -> Result<Heatmap> {
        if landmarks.points() != self.config.channels {
            return Err(Error::InvalidInputShape(format!(
                "expected {} landmarks per sample, got {}",
                self.config.channels,
                landmarks.points()
            )));
        }
        if landmarks.dim().2 < 2 {
            return Err(Error::InvalidInputShape(format!(
                "landmarks need at least 2 coordinates per point, got {}",
                landmarks.dim().2
            )));
        }

        let hot = self.scatter(landmarks)?;
        let blurred = self.smoothing.forward(hot.view())?;
        Ok(Heatmap::new(self.normalize(blurred)?))
    }

    pub fn forward(&self, landmarks: &Landmarks) -> Result<Heatmap> {
        self.landmarks_to_heatmap(landmarks)
    }

    fn scatter(&self, landmarks: &Landmarks) -> Result<HeatmapData> {
        let (height, width) = (self.config.height(), self.config.width());
        let mut hot = HeatmapData::zeros((landmarks.batch(), self.config.channels, height, width));

        let pixels = landmarks.to_pixels(height, width, self.config.clamp);
        for (b, sample) in pixels.iter().enumerate() {
            for (c, pixel) in sample.iter().enumerate() {
                if pixel.row >= height || pixel.col >= width {
                    return Err(Error::LandmarkOutOfBounds {
                        row: pixel.row,
                        col: pixel.col,
                        height,
                        width,
                    });
                }
                hot[(b, c, pixel.row, pixel.col)] = 1.;
            }
        }
        Ok(hot)
    }

    fn normalize(&self, mut data: HeatmapData) -> Result<HeatmapData> {
        if data.is_empty() {
            return Ok(data);
        }

        let max = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        tracing::debug!(max, "global heatmap maximum");
        if max.is_nan() || max <= self.config.epsilon {
            return match self.config.degenerate {
                DegeneratePolicy::Skip => {
                    tracing::warn!(max, "skipping normalization of degenerate heatmap");
                    Ok(data)
                }
                DegeneratePolicy::Fail => Err(Error::DegenerateHeatmap(max)),
            };
        }

        data.par_mapv_inplace(|v| v / max);
        Ok(data)
    }
}
