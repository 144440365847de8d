//! Error handling for shopvoice.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::ShopErrorCode;
pub use storage_error::{ConstraintKind, StorageError};
