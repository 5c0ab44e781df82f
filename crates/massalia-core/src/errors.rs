//! Error types for the Massalia core library.

/// Top-level error enum for the Massalia core library.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Front matter error: {0}")]
    FrontMatter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
