//! Queries for the products table.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use shopvoice_core::errors::StorageError;

use crate::connection::writer::with_immediate_transaction;

/// A product row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub avg_rating: f64,
}

const SELECT_COLUMNS: &str = "SELECT product_id, name, category, price, avg_rating FROM products";

/// Insert a product. The cached average starts at 0. Returns the row id.
pub fn insert(conn: &Connection, name: &str, category: &str, price: f64) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO products (name, category, price) VALUES (?1, ?2, ?3)",
        params![name, category, price],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a product by id.
pub fn get(conn: &Connection, product_id: i64) -> Result<Option<ProductRow>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_COLUMNS} WHERE product_id = ?1"))?;
    Ok(stmt.query_row(params![product_id], map_product_row).optional()?)
}

/// Like [`get`], but a missing product is an error.
pub fn require(conn: &Connection, product_id: i64) -> Result<ProductRow, StorageError> {
    get(conn, product_id)?.ok_or(StorageError::NotFound {
        entity: "product",
        id: product_id,
    })
}

/// List all products ordered by id.
pub fn list(conn: &Connection) -> Result<Vec<ProductRow>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_COLUMNS} ORDER BY product_id"))?;
    let rows = stmt.query_map([], map_product_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// List the products in one category.
pub fn list_by_category(conn: &Connection, category: &str) -> Result<Vec<ProductRow>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "{SELECT_COLUMNS} WHERE category = ?1 ORDER BY product_id"
    ))?;
    let rows = stmt.query_map(params![category], map_product_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Count all products.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?)
}

/// Set a product's price. A negative price is rejected by the CHECK constraint.
pub fn update_price(conn: &Connection, product_id: i64, price: f64) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE products SET price = ?1 WHERE product_id = ?2",
        params![price, product_id],
    )?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "product",
            id: product_id,
        });
    }
    Ok(())
}

/// Apply several price changes as one unit. Either every update lands or,
/// on the first missing product or rejected price, none do.
pub fn reprice_batch(conn: &Connection, changes: &[(i64, f64)]) -> Result<usize, StorageError> {
    let applied = with_immediate_transaction(conn, |tx| {
        for &(product_id, price) in changes {
            update_price(tx, product_id, price)?;
        }
        Ok(changes.len())
    })?;
    tracing::info!(rows_affected = applied, "reprice batch committed");
    Ok(applied)
}

/// Delete a product. Its reviews and ratings go with it. Returns whether a
/// row was removed.
pub fn delete(conn: &Connection, product_id: i64) -> Result<bool, StorageError> {
    let changed = conn.execute(
        "DELETE FROM products WHERE product_id = ?1",
        params![product_id],
    )?;
    Ok(changed > 0)
}

pub(crate) fn map_product_row(row: &Row<'_>) -> rusqlite::Result<ProductRow> {
    Ok(ProductRow {
        product_id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        price: row.get(3)?,
        avg_rating: row.get(4)?,
    })
}
