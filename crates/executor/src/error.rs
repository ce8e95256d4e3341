use thiserror::Error;

use common::error::Error as NumericError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Channel sender failed: Receiver has been dropped.")]
    ChannelSendFailed,

    #[error("Numeric error: {0}")]
    NumericError(#[from] NumericError),

    #[error("Task failed: {0}")]
    TaskJoinError(#[from] tokio::task::JoinError),
}
