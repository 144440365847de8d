//! Storage errors.

use rusqlite::ffi;

use super::error_code::{self, ShopErrorCode};

/// Which schema constraint rejected a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
    Check,
    NotNull,
    Other,
}

impl ConstraintKind {
    /// Classify an SQLite extended result code from the CONSTRAINT family.
    pub fn from_extended_code(code: i32) -> Self {
        match code {
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Self::PrimaryKey,
            ffi::SQLITE_CONSTRAINT_UNIQUE => Self::Unique,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::ForeignKey,
            ffi::SQLITE_CONSTRAINT_CHECK => Self::Check,
            ffi::SQLITE_CONSTRAINT_NOTNULL => Self::NotNull,
            _ => Self::Other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PrimaryKey => "primary key",
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::Check => "check",
            Self::NotNull => "not null",
            Self::Other => "other",
        }
    }
}

/// Errors raised by the SQLite persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Constraint violation ({}): {message}", .kind.name())]
    ConstraintViolation { kind: ConstraintKind, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
}

impl StorageError {
    /// True when the engine rejected the statement because of `kind`.
    pub fn is_constraint(&self, kind: ConstraintKind) -> bool {
        matches!(self, Self::ConstraintViolation { kind: k, .. } if *k == kind)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref inner, ref msg)
                if inner.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StorageError::ConstraintViolation {
                    kind: ConstraintKind::from_extended_code(inner.extended_code),
                    message: msg.clone().unwrap_or_else(|| inner.to_string()),
                }
            }
            other => StorageError::SqliteError {
                message: other.to_string(),
            },
        }
    }
}

impl ShopErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::ConstraintViolation { .. } => error_code::CONSTRAINT_VIOLATION,
            Self::NotFound { .. } => error_code::NOT_FOUND,
        }
    }
}
