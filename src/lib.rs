pub mod blur;
pub mod error;
pub mod heatmap;
pub mod landmark;
pub mod result;
pub mod setting;
pub mod tracing;

pub use blur::{GaussianKernel, GaussianSmoothing};
pub use error::Error;
pub use heatmap::{Heatmap, LandmarkHeatmap, Peak};
pub use landmark::{Landmarks, Pixel};
pub use result::Result;
pub use setting::{HeatmapConfig, Setting};
