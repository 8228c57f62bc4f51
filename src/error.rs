use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawbiasError {
    #[error("Invalid draw: {0}")]
    InvalidDraw(String),

    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Strategy error: {0}")]
    Strategy(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DrawbiasError>;
