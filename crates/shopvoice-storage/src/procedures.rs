//! Stored-procedure style operations over the rating cache.
//!
//! The triggers installed by migration v002/v003 already keep
//! `products.avg_rating` current. These functions run the same recomputation
//! on demand and bundle the review + rating insert used by the storefront.

use rusqlite::{params, Connection};
use serde::Serialize;
use shopvoice_core::errors::StorageError;

use crate::connection::writer::with_immediate_transaction;
use crate::queries::{ratings, reviews};

/// Cached and live averages further apart than this count as stale.
const AVG_EPSILON: f64 = 1e-9;

/// Ids and resulting average from [`add_review`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddedReview {
    pub review_id: i64,
    pub rating_id: i64,
    pub avg_rating: f64,
}

/// A product whose cached average disagrees with its ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleAverage {
    pub product_id: i64,
    pub cached: f64,
    pub actual: f64,
}

/// Recompute one product's cached average from its current ratings and
/// return the stored value. No ratings means 0.
pub fn update_avg_rating(conn: &Connection, product_id: i64) -> Result<f64, StorageError> {
    let changed = conn.execute(
        "UPDATE products
         SET avg_rating = COALESCE(
             (SELECT AVG(rating) FROM ratings WHERE product_id = ?1), 0)
         WHERE product_id = ?1",
        params![product_id],
    )?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "product",
            id: product_id,
        });
    }

    let avg: f64 = conn.query_row(
        "SELECT avg_rating FROM products WHERE product_id = ?1",
        params![product_id],
        |row| row.get(0),
    )?;
    tracing::debug!(product_id, avg_rating = avg, "average rating recomputed");
    Ok(avg)
}

/// Insert a review and a rating for the same (product, customer) pair, then
/// refresh the product's average.
///
/// Runs under whatever transaction the caller holds. Without one, each
/// insert commits on its own: a rejected rating leaves the review in place.
/// Use [`add_review_atomic`] when both rows must land together.
pub fn add_review(
    conn: &Connection,
    product_id: i64,
    customer_id: i64,
    review_text: &str,
    rating: i64,
) -> Result<AddedReview, StorageError> {
    let review_id = reviews::insert(conn, product_id, customer_id, review_text)?;
    let rating_id = ratings::insert(conn, product_id, customer_id, rating)?;
    let avg_rating = update_avg_rating(conn, product_id)?;
    tracing::info!(product_id, customer_id, review_id, rating_id, "review added");
    Ok(AddedReview {
        review_id,
        rating_id,
        avg_rating,
    })
}

/// [`add_review`] inside a BEGIN IMMEDIATE transaction.
pub fn add_review_atomic(
    conn: &Connection,
    product_id: i64,
    customer_id: i64,
    review_text: &str,
    rating: i64,
) -> Result<AddedReview, StorageError> {
    with_immediate_transaction(conn, |tx| {
        add_review(tx, product_id, customer_id, review_text, rating)
    })
}

/// Recompute every product's cached average in one transaction. Returns the
/// number of product rows written.
pub fn rebuild_all_avg_ratings(conn: &Connection) -> Result<usize, StorageError> {
    let touched = with_immediate_transaction(conn, |tx| {
        Ok(tx.execute(
            "UPDATE products
             SET avg_rating = COALESCE(
                 (SELECT AVG(r.rating) FROM ratings r WHERE r.product_id = products.product_id), 0)",
            [],
        )?)
    })?;
    tracing::info!(rows_affected = touched, "rebuilt all average ratings");
    Ok(touched)
}

/// List products whose cached average differs from the mean of their ratings.
pub fn find_stale_averages(conn: &Connection) -> Result<Vec<StaleAverage>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT p.product_id, p.avg_rating, COALESCE(AVG(r.rating), 0) AS actual
         FROM products p
         LEFT JOIN ratings r ON r.product_id = p.product_id
         GROUP BY p.product_id
         HAVING ABS(p.avg_rating - COALESCE(AVG(r.rating), 0)) > ?1
         ORDER BY p.product_id",
    )?;
    let rows = stmt.query_map(params![AVG_EPSILON], |row| {
        Ok(StaleAverage {
            product_id: row.get(0)?,
            cached: row.get(1)?,
            actual: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
