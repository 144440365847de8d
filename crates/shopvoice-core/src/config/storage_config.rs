//! Storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DB_FILENAME: &str = "shopvoice.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const MAX_READ_POOL_SIZE: usize = 8;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;

/// Configuration for the SQLite store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file. Default: `shopvoice.db`.
    pub db_path: Option<PathBuf>,
    /// Number of read-only connections. Default: 4, max 8.
    pub read_pool_size: Option<usize>,
    /// Busy timeout in milliseconds. Default: 5000.
    pub busy_timeout_ms: Option<u32>,
    /// Insert the sample catalog when opening an empty database. Default: false.
    pub seed_sample_data: Option<bool>,
}

impl StorageConfig {
    pub fn effective_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILENAME))
    }

    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.unwrap_or(DEFAULT_READ_POOL_SIZE)
    }

    pub fn effective_busy_timeout_ms(&self) -> u32 {
        self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS)
    }

    pub fn effective_seed_sample_data(&self) -> bool {
        self.seed_sample_data.unwrap_or(false)
    }
}
