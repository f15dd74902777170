use std::path::Path;

use crate::{error::Error, result::Result};

pub const CONFIG_FILE_NAME: &str = "heatmap.json";
pub const ENV_PREFIX: &str = "HEATMAP";

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub heatmap: HeatmapConfig,
    pub log: LogConfig,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HeatmapConfig {
    pub channels: usize,
    pub kernel_size: KernelSize,
    pub sigma: Sigma,
    /// (height, width)
    pub size: [usize; 2],
    pub clamp: ClampBound,
    pub degenerate: DegeneratePolicy,
    pub epsilon: f32,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub name: String,
    /// trace|debug|info|warn|error|off
    pub env_filter: String,
}

/// Gaussian kernel extent, either shared by both axes or given as (height, width).
#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum KernelSize {
    Uniform(usize),
    PerAxis([usize; 2]),
}

/// Gaussian standard deviation, either shared by both axes or given as (height, width).
#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(untagged)]
pub enum Sigma {
    Uniform(f32),
    PerAxis([f32; 2]),
}

/// Bound applied to the truncated landmark coordinates before the scatter write.
#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClampBound {
    /// Both x and y are clamped to `[0, height - 1]`.
    #[default]
    Height,
    /// x is clamped to `[0, width - 1]` and y to `[0, height - 1]`.
    PerAxis,
}

/// What to do when the blurred buffer has no usable maximum to divide by.
#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Return the buffer without dividing.
    #[default]
    Skip,
    Fail,
}

impl KernelSize {
    pub fn per_axis(&self) -> [usize; 2] {
        match *self {
            KernelSize::Uniform(size) => [size, size],
            KernelSize::PerAxis(sizes) => sizes,
        }
    }
}

impl Sigma {
    pub fn per_axis(&self) -> [f32; 2] {
        match *self {
            Sigma::Uniform(sigma) => [sigma, sigma],
            Sigma::PerAxis(sigmas) => sigmas,
        }
    }
}

impl From<usize> for KernelSize {
    fn from(value: usize) -> Self {
        Self::Uniform(value)
    }
}

impl From<[usize; 2]> for KernelSize {
    fn from(value: [usize; 2]) -> Self {
        Self::PerAxis(value)
    }
}

impl From<f32> for Sigma {
    fn from(value: f32) -> Self {
        Self::Uniform(value)
    }
}

impl From<[f32; 2]> for Sigma {
    fn from(value: [f32; 2]) -> Self {
        Self::PerAxis(value)
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            channels: 68,
            kernel_size: KernelSize::Uniform(13),
            sigma: Sigma::Uniform(2.),
            size: [256, 256],
            clamp: ClampBound::Height,
            degenerate: DegeneratePolicy::Skip,
            epsilon: f32::EPSILON,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            name: "landmark_heatmap".into(),
            env_filter: "info".into(),
        }
    }
}

impl HeatmapConfig {
    pub fn height(&self) -> usize {
        self.size[0]
    }

    pub fn width(&self) -> usize {
        self.size[1]
    }

    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::InvalidConfig("channels must be at least 1".into()));
        }
        if self.height() == 0 || self.width() == 0 {
            return Err(Error::InvalidConfig(format!(
                "heatmap size must be non-zero, got {}x{}",
                self.height(),
                self.width()
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0. {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be a non-negative finite number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

impl Config {
    pub fn get() -> Result<Config> {
        let config_path = std::env::current_dir()
            .map_err(Error::as_unknown_error)?
            .join(CONFIG_FILE_NAME);
        Self::from_path(&config_path)
    }

    /// Missing files fall back to defaults; environment variables still apply.
    pub fn from_path(path: &Path) -> Result<Config> {
        Self::load(path, ENV_PREFIX)
    }

    fn load(path: &Path, env_prefix: &str) -> Result<Config> {
        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(Self::environment(env_prefix))
            .build()
            .map_err(Error::ConfigError)?
            .try_deserialize::<Config>()
            .map_err(Error::ConfigError)
    }

    pub fn from_json_str(json: &str) -> Result<Config> {
        config::Config::builder()
            .add_source(config::File::from_str(json, config::FileFormat::Json))
            .build()
            .map_err(Error::ConfigError)?
            .try_deserialize::<Config>()
            .map_err(Error::ConfigError)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::SerializationError)
    }

    // Scalars parse as numbers; `size` also accepts "height,width". Per-axis
    // kernel_size and sigma stay file-only.
    fn environment(prefix: &str) -> config::Environment {
        config::Environment::with_prefix(prefix)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("heatmap.size")
    }
}
