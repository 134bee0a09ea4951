pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error used at the reporter boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`workers` must be a positive integer")]
    InvalidWorkers,

    #[error("`duration` must be a positive duration")]
    InvalidDuration,

    #[error("invalid threshold expression: {0}")]
    InvalidThreshold(String),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
