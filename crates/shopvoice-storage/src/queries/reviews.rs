//! Queries for the reviews table.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use shopvoice_core::errors::StorageError;

/// A review row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    pub review_id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub review_text: String,
    pub review_date: NaiveDate,
}

const SELECT_COLUMNS: &str =
    "SELECT review_id, product_id, customer_id, review_text, review_date FROM reviews";

/// Insert a review dated today (UTC, per SQLite's `date('now')`).
/// Both the product and the customer must exist.
pub fn insert(
    conn: &Connection,
    product_id: i64,
    customer_id: i64,
    review_text: &str,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO reviews (product_id, customer_id, review_text) VALUES (?1, ?2, ?3)",
        params![product_id, customer_id, review_text],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a review with an explicit date.
pub fn insert_dated(
    conn: &Connection,
    product_id: i64,
    customer_id: i64,
    review_text: &str,
    review_date: NaiveDate,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO reviews (product_id, customer_id, review_text, review_date)
         VALUES (?1, ?2, ?3, ?4)",
        params![product_id, customer_id, review_text, review_date],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a review by id.
pub fn get(conn: &Connection, review_id: i64) -> Result<Option<ReviewRow>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_COLUMNS} WHERE review_id = ?1"))?;
    Ok(stmt.query_row(params![review_id], map_review_row).optional()?)
}

/// Reviews of one product, oldest first.
pub fn list_for_product(conn: &Connection, product_id: i64) -> Result<Vec<ReviewRow>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "{SELECT_COLUMNS} WHERE product_id = ?1 ORDER BY review_date, review_id"
    ))?;
    let rows = stmt.query_map(params![product_id], map_review_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Reviews written by one customer, oldest first.
pub fn list_for_customer(
    conn: &Connection,
    customer_id: i64,
) -> Result<Vec<ReviewRow>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "{SELECT_COLUMNS} WHERE customer_id = ?1 ORDER BY review_date, review_id"
    ))?;
    let rows = stmt.query_map(params![customer_id], map_review_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Replace a review's text.
pub fn update_text(conn: &Connection, review_id: i64, review_text: &str) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE reviews SET review_text = ?1 WHERE review_id = ?2",
        params![review_text, review_id],
    )?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "review",
            id: review_id,
        });
    }
    Ok(())
}

/// Delete a review. Returns whether a row was removed.
pub fn delete(conn: &Connection, review_id: i64) -> Result<bool, StorageError> {
    let changed = conn.execute("DELETE FROM reviews WHERE review_id = ?1", params![review_id])?;
    Ok(changed > 0)
}

/// Count all reviews.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))?)
}

fn map_review_row(row: &Row<'_>) -> rusqlite::Result<ReviewRow> {
    Ok(ReviewRow {
        review_id: row.get(0)?,
        product_id: row.get(1)?,
        customer_id: row.get(2)?,
        review_text: row.get(3)?,
        review_date: row.get(4)?,
    })
}
