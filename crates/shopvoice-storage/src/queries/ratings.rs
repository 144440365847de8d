//! Queries for the ratings table.
//!
//! Every write here fires a trigger that refreshes `products.avg_rating` for
//! the affected product before the statement returns.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use shopvoice_core::errors::StorageError;

/// A rating row. `rating` is within 1..=5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingRow {
    pub rating_id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub rating: i64,
}

/// Insert a rating. Out-of-range scores fail the CHECK constraint and
/// leave the cached average untouched.
pub fn insert(
    conn: &Connection,
    product_id: i64,
    customer_id: i64,
    rating: i64,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO ratings (product_id, customer_id, rating) VALUES (?1, ?2, ?3)",
        params![product_id, customer_id, rating],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a rating by id.
pub fn get(conn: &Connection, rating_id: i64) -> Result<Option<RatingRow>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT rating_id, product_id, customer_id, rating FROM ratings WHERE rating_id = ?1",
    )?;
    Ok(stmt.query_row(params![rating_id], map_rating_row).optional()?)
}

/// List the ratings of a product ordered by id.
pub fn list_for_product(conn: &Connection, product_id: i64) -> Result<Vec<RatingRow>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT rating_id, product_id, customer_id, rating FROM ratings
         WHERE product_id = ?1 ORDER BY rating_id",
    )?;
    let rows = stmt.query_map(params![product_id], map_rating_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Count the ratings of a product.
pub fn count_for_product(conn: &Connection, product_id: i64) -> Result<i64, StorageError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM ratings WHERE product_id = ?1",
        params![product_id],
        |row| row.get(0),
    )?)
}

/// Count all ratings.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM ratings", [], |row| row.get(0))?)
}

/// Change a score. The update trigger refreshes the product average.
pub fn update_score(conn: &Connection, rating_id: i64, rating: i64) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE ratings SET rating = ?1 WHERE rating_id = ?2",
        params![rating, rating_id],
    )?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "rating",
            id: rating_id,
        });
    }
    Ok(())
}

/// Delete a rating. The delete trigger refreshes the product average.
pub fn delete(conn: &Connection, rating_id: i64) -> Result<bool, StorageError> {
    let changed = conn.execute("DELETE FROM ratings WHERE rating_id = ?1", params![rating_id])?;
    Ok(changed > 0)
}

fn map_rating_row(row: &Row<'_>) -> rusqlite::Result<RatingRow> {
    Ok(RatingRow {
        rating_id: row.get(0)?,
        product_id: row.get(1)?,
        customer_id: row.get(2)?,
        rating: row.get(3)?,
    })
}
