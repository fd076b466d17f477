use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::abi::LogBuffer;
use crate::error::{ReefError, ReefResult};

/// Message the entry point logs by default
pub const DEFAULT_MESSAGE: &str = "Hello World!";

/// Status the entry point returns by default
pub const DEFAULT_STATUS: i32 = 42;

/// Configuration for the guest entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuestConfig {
    /// Text handed to the log import
    pub message: String,

    /// Value returned to the host from the entry point
    pub status: i32,

    /// Most verbose level the log bridge forwards to the host
    pub log_level: String,
}

impl Default for GuestConfig {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            status: DEFAULT_STATUS,
            log_level: "warn".to_string(),
        }
    }
}

impl GuestConfig {
    /// Parse and validate a JSON configuration. Missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> ReefResult<Self> {
        let config: GuestConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReefResult<()> {
        self.level_filter()?;
        LogBuffer::new(self.message.as_bytes())?;
        Ok(())
    }

    pub fn level_filter(&self) -> ReefResult<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ReefError::InvalidLogLevel(self.log_level.clone()))
    }
}
