//! Write transactions: BEGIN IMMEDIATE, commit on success, rollback on error.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use shopvoice_core::errors::StorageError;

/// Execute `f` inside a BEGIN IMMEDIATE transaction.
///
/// The write lock is taken at BEGIN, so a concurrent writer fails fast with
/// SQLITE_BUSY (after busy_timeout) instead of mid-transaction. Dropping the
/// transaction on the error path rolls back everything `f` wrote.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|e| {
        StorageError::SqliteError {
            message: format!("failed to begin immediate transaction: {e}"),
        }
    })?;

    let result = f(&tx)?;

    tx.commit().map_err(|e| StorageError::SqliteError {
        message: format!("failed to commit: {e}"),
    })?;

    Ok(result)
}
