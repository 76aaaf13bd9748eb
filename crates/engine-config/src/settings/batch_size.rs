use crate::settings::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BATCH_SIZE: u64 = 1000;

/// Rows per extract/insert window. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSize(u64);

impl BatchSize {
    pub fn new(size: u64) -> Option<Self> {
        (size > 0).then_some(BatchSize(size))
    }

    pub fn parse(key: &'static str, raw: &str) -> Result<Self, SettingsError> {
        let size = raw.trim().parse::<u64>().map_err(|e| SettingsError::Invalid {
            key,
            reason: format!("'{raw}' is not a positive integer ({e})"),
        })?;
        Self::new(size).ok_or(SettingsError::Invalid {
            key,
            reason: "batch size must be greater than zero".to_string(),
        })
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        BatchSize(DEFAULT_BATCH_SIZE)
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
