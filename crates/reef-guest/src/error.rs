use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

/// Errors raised on the guest side of the reef boundary.
///
/// None of these can escape `reef_main`: every value that crosses into the
/// host is validated when it is constructed.
#[derive(Error, Debug)]
pub enum ReefError {
    #[error("Message of {len} bytes does not fit the i32 length of the log import")]
    MessageTooLong { len: usize },

    #[error("Progress must be a fraction in 0.0..=1.0, got {0}")]
    ProgressOutOfRange(f32),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to install log bridge: {0}")]
    Logging(#[from] SetGlobalDefaultError),
}

pub type ReefResult<T> = Result<T, ReefError>;
