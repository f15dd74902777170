use std::error::Error as StdError;

#[derive(Debug)]
pub enum Error {
    InvalidInputShape(String),
    InvalidKernel(String),
    InvalidConfig(String),
    LandmarkOutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
    DegenerateHeatmap(f32),
    ShapeError(ndarray::ShapeError),
    ConfigError(config::ConfigError),
    SerializationError(serde_json::Error),
    UnknownError(Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub fn as_unknown_error<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::UnknownError(err.into())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidInputShape(msg) => write!(f, "invalid input shape: {}", msg),
            Error::InvalidKernel(msg) => write!(f, "invalid gaussian kernel: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "invalid heatmap configuration: {}", msg),
            Error::LandmarkOutOfBounds {
                row,
                col,
                height,
                width,
            } => write!(
                f,
                "landmark pixel ({}, {}) is outside the {}x{} heatmap",
                row, col, height, width
            ),
            Error::DegenerateHeatmap(max) => {
                write!(f, "heatmap maximum {} is too small to normalize", max)
            }
            Error::ShapeError(err) => write!(f, "tensor shape error: {}", err),
            Error::ConfigError(err) => write!(f, "configuration error: {}", err),
            Error::SerializationError(err) => write!(f, "serialization error: {}", err),
            Error::UnknownError(err) => write!(f, "unknown error: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::ShapeError(err) => Some(err),
            Error::ConfigError(err) => Some(err),
            Error::SerializationError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(value: ndarray::ShapeError) -> Self {
        Self::ShapeError(value)
    }
}

impl From<config::ConfigError> for Error {
    fn from(value: config::ConfigError) -> Self {
        Self::ConfigError(value)
    }
}
