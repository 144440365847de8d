//! ShopErrorCode trait: stable codes for callers that match on strings.

/// Every error enum implements this to expose a structured error code.
pub trait ShopErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
