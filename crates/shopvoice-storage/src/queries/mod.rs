//! Per-table queries. Every function takes a borrowed connection so callers
//! choose between the writer, a pooled reader, or an open transaction.

pub mod customers;
pub mod products;
pub mod ratings;
pub mod reviews;
