use std::fmt;

/// Boundary failures only. The engine itself never fails an analysis:
/// ineligibility, degraded input, rate clamping, and empty scenario tables are
/// all first-class result states carried inside the returned structures.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv export error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unrecognized {field}: {value}")]
    UnknownKey { field: &'static str, value: String },
}

/// Top-level error for the CLI binary.
#[derive(Debug)]
pub enum AppError {
    Engine(EngineError),
    Config(crate::config::ConfigError),
    Io(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Engine(err) => write!(f, "engine error: {}", err),
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Engine(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Io(err) => Some(err),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(value: crate::config::ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Engine(EngineError::Json(value))
    }
}
