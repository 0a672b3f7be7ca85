use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("insufficient capital: need {required:.2}, have {available:.2}")]
    InsufficientCapital { required: f64, available: f64 },
    #[error("unknown asset: {0}")]
    UnknownAsset(String),
    #[error("the firm is bankrupt; restart to keep playing")]
    Bankrupt,
    #[error("burn rate must be a finite value >= 0, got {0}")]
    InvalidBurnRate(f64),
    #[error("firm name must not be empty")]
    EmptyFirmName,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("progress snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress snapshot is not valid JSON: {0}")]
    Encoding(#[from] serde_json::Error),
}
