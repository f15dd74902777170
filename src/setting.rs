use std::path::Path;

pub use self::config::{
    ClampBound, Config, DegeneratePolicy, HeatmapConfig, KernelSize, LogConfig, Sigma,
};

use crate::result::Result;

pub mod config;

#[derive(Debug, Default, Clone)]
pub struct Setting {
    pub config: Config,
}

impl Setting {
    pub fn get() -> Result<Self> {
        Ok(Self {
            config: Config::get()?,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self {
            config: Config::from_path(path)?,
        })
    }

    pub fn heatmap(&self) -> &HeatmapConfig {
        &self.config.heatmap
    }

    pub fn log(&self) -> &LogConfig {
        &self.config.log
    }
}
