//! Configuration system for shopvoice.
//! TOML-based, 4-layer resolution: CLI > env > project > defaults.

pub mod report_config;
pub mod shop_config;
pub mod storage_config;

pub use report_config::ReportConfig;
pub use shop_config::{CliOverrides, ShopConfig};
pub use storage_config::StorageConfig;
