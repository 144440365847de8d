//! Connection management: write-serialized + read-pooled.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;
use shopvoice_core::config::StorageConfig;
use shopvoice_core::errors::StorageError;

use self::pool::ReadPool;
use self::pragmas::apply_pragmas;
use crate::{migrations, queries, seed};

/// Manages the single write connection and the read connection pool.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    /// `None` for in-memory databases, whose contents a second connection
    /// cannot see. Reads then go through the writer.
    readers: Option<ReadPool>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open a database at the given path, apply pragmas, run migrations.
    ///
    /// An in-memory path (`:memory:` or a `file::memory:` URI) gets no read
    /// pool, as in [`DatabaseManager::open_in_memory`].
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        let busy_timeout_ms = config.effective_busy_timeout_ms();
        let writer = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: format!("open {}: {e}", path.display()),
        })?;
        if is_memory_path(path) {
            return Self::writer_only(writer, busy_timeout_ms);
        }

        apply_pragmas(&writer, busy_timeout_ms)?;
        migrations::run_migrations(&writer)?;

        let readers = ReadPool::open(path, config.effective_read_pool_size(), busy_timeout_ms)?;
        tracing::debug!(path = %path.display(), readers = readers.size(), "database opened");

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        Self::writer_only(writer, StorageConfig::default().effective_busy_timeout_ms())
    }

    fn writer_only(writer: Connection, busy_timeout_ms: u32) -> Result<Self, StorageError> {
        apply_pragmas(&writer, busy_timeout_ms)?;
        migrations::run_migrations(&writer)?;
        tracing::debug!("in-memory database opened");

        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    /// Open the database described by `config`, seeding the sample catalog
    /// into an empty database when `seed_sample_data` is set.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let db = Self::open(&config.effective_db_path(), config)?;
        if config.effective_seed_sample_data() {
            db.with_writer(|conn| {
                if is_empty_catalog(conn)? {
                    seed::seed_sample_data(conn)?;
                }
                Ok(())
            })?;
        }
        Ok(db)
    }

    /// Execute a write operation with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.writer.lock().map_err(|_| StorageError::SqliteError {
            message: "write lock poisoned".to_string(),
        })?;
        f(&guard)
    }

    /// Execute a read operation with a pooled read connection.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.readers {
            Some(pool) => pool.with_conn(f),
            None => self.with_writer(f),
        }
    }

    /// Run a WAL checkpoint (TRUNCATE mode).
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        self.with_writer(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
                .map_err(|e| StorageError::SqliteError {
                    message: e.to_string(),
                })
        })
    }

    /// Get the database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn is_memory_path(path: &Path) -> bool {
    match path.to_str() {
        Some(s) => {
            s == ":memory:"
                || s.starts_with("file::memory:")
                || (s.starts_with("file:") && s.contains("mode=memory"))
        }
        None => false,
    }
}

/// True when none of the four tables hold a row.
fn is_empty_catalog(conn: &Connection) -> Result<bool, StorageError> {
    Ok(queries::products::count(conn)? == 0
        && queries::customers::count(conn)? == 0
        && queries::reviews::count(conn)? == 0
        && queries::ratings::count(conn)? == 0)
}
