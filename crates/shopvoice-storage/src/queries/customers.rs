//! Queries for the customers table.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use shopvoice_core::errors::StorageError;

/// A customer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRow {
    pub customer_id: i64,
    pub name: String,
    pub email: String,
}

/// Insert a customer. A duplicate email is rejected as a unique violation.
pub fn insert(conn: &Connection, name: &str, email: &str) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO customers (name, email) VALUES (?1, ?2)",
        params![name, email],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a customer by id.
pub fn get(conn: &Connection, customer_id: i64) -> Result<Option<CustomerRow>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT customer_id, name, email FROM customers WHERE customer_id = ?1",
    )?;
    Ok(stmt.query_row(params![customer_id], map_customer_row).optional()?)
}

/// Look up a customer by email.
pub fn get_by_email(conn: &Connection, email: &str) -> Result<Option<CustomerRow>, StorageError> {
    let mut stmt =
        conn.prepare_cached("SELECT customer_id, name, email FROM customers WHERE email = ?1")?;
    Ok(stmt.query_row(params![email], map_customer_row).optional()?)
}

/// List all customers ordered by id.
pub fn list(conn: &Connection) -> Result<Vec<CustomerRow>, StorageError> {
    let mut stmt =
        conn.prepare_cached("SELECT customer_id, name, email FROM customers ORDER BY customer_id")?;
    let rows = stmt.query_map([], map_customer_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Change a customer's email. Fails with a unique violation if the email is taken.
pub fn update_email(conn: &Connection, customer_id: i64, email: &str) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE customers SET email = ?1 WHERE customer_id = ?2",
        params![email, customer_id],
    )?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "customer",
            id: customer_id,
        });
    }
    Ok(())
}

/// Count all customers.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?)
}

/// Delete a customer together with all of their reviews and ratings. The
/// rating delete trigger refreshes every product the customer had rated.
pub fn delete(conn: &Connection, customer_id: i64) -> Result<bool, StorageError> {
    let changed = conn.execute(
        "DELETE FROM customers WHERE customer_id = ?1",
        params![customer_id],
    )?;
    tracing::debug!(customer_id, removed = changed > 0, "customer delete");
    Ok(changed > 0)
}

fn map_customer_row(row: &Row<'_>) -> rusqlite::Result<CustomerRow> {
    Ok(CustomerRow {
        customer_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}
