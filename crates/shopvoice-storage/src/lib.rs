//! SQLite persistence for the shopvoice review store.
//!
//! Products, customers, reviews, and ratings live in four tables. Each
//! product caches the mean of its ratings; triggers on `ratings` keep that
//! value current, and [`procedures`] exposes the same recomputation to callers.

pub mod connection;
pub mod migrations;
pub mod procedures;
pub mod queries;
pub mod reports;
pub mod seed;

pub use connection::DatabaseManager;
pub use shopvoice_core::errors::StorageError;
