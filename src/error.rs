use crate::{constants::ConfigError, service::FetchError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Departure board stopped: {0}")]
    Fetch(#[from] FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Screen clearing failed: {0}")]
    ClearScreen(#[from] clearscreen::Error),
}
