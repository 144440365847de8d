//! Read-only reporting queries over the review and rating tables.
//!
//! These read live ratings where a report is about ratings, and the cached
//! `products.avg_rating` where it is about the catalog.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::Serialize;
use shopvoice_core::config::ReportConfig;
use shopvoice_core::errors::StorageError;

use crate::queries::products::{map_product_row, ProductRow};

/// A review joined with its author's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductReview {
    pub review_id: i64,
    pub customer_name: String,
    pub review_text: String,
    pub review_date: NaiveDate,
}

/// Aggregate rating figures for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub product_id: i64,
    pub product_name: String,
    pub rating_count: i64,
    pub mean_rating: f64,
    pub min_rating: i64,
    pub max_rating: i64,
}

/// A customer who touched a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub customer_id: i64,
    pub name: String,
}

/// Product with its number of reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewCount {
    pub product_id: i64,
    pub name: String,
    pub review_count: i64,
}

/// A review paired with a rating the same customer gave the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewWithScore {
    pub review_id: i64,
    pub customer_id: i64,
    pub review_text: String,
    pub rating: Option<i64>,
}

/// Per-category catalog figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub product_count: i64,
    pub mean_price: f64,
    pub mean_avg_rating: f64,
}

/// Customer with the number of reviews they wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerCount {
    pub customer_id: i64,
    pub name: String,
    pub review_count: i64,
}

/// Reviews of one product with the reviewer's name, oldest first.
pub fn product_reviews(conn: &Connection, product_id: i64) -> Result<Vec<ProductReview>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT rv.review_id, c.name, rv.review_text, rv.review_date
         FROM reviews rv
         JOIN customers c ON c.customer_id = rv.customer_id
         WHERE rv.product_id = ?1
         ORDER BY rv.review_date, rv.review_id",
    )?;
    let rows = stmt.query_map(params![product_id], |row| {
        Ok(ProductReview {
            review_id: row.get(0)?,
            customer_name: row.get(1)?,
            review_text: row.get(2)?,
            review_date: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Count, mean, min and max score for every product that has ratings.
pub fn rating_summaries(conn: &Connection) -> Result<Vec<RatingSummary>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT p.product_id, p.name, COUNT(r.rating_id), AVG(r.rating), MIN(r.rating), MAX(r.rating)
         FROM products p
         JOIN ratings r ON r.product_id = p.product_id
         GROUP BY p.product_id, p.name
         ORDER BY p.product_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RatingSummary {
            product_id: row.get(0)?,
            product_name: row.get(1)?,
            rating_count: row.get(2)?,
            mean_rating: row.get(3)?,
            min_rating: row.get(4)?,
            max_rating: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Products whose mean rating is strictly above `threshold`, best first.
pub fn products_rated_above(conn: &Connection, threshold: f64) -> Result<Vec<ProductRow>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT product_id, name, category, price, avg_rating
         FROM products
         WHERE product_id IN (
             SELECT product_id FROM ratings
             GROUP BY product_id
             HAVING AVG(rating) > ?1
         )
         ORDER BY avg_rating DESC, product_id",
    )?;
    let rows = stmt.query_map(params![threshold], map_product_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Customers who reviewed or rated a product, each listed once.
pub fn product_participants(conn: &Connection, product_id: i64) -> Result<Vec<Participant>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT c.customer_id, c.name
         FROM customers c
         WHERE c.customer_id IN (
             SELECT customer_id FROM reviews WHERE product_id = ?1
             UNION
             SELECT customer_id FROM ratings WHERE product_id = ?1
         )
         ORDER BY c.customer_id",
    )?;
    let rows = stmt.query_map(params![product_id], |row| {
        Ok(Participant {
            customer_id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Every product with its review count, most reviewed first. Equal counts
/// come back in product id order; unreviewed products sort last with 0.
pub fn most_reviewed_products(conn: &Connection, limit: usize) -> Result<Vec<ReviewCount>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT p.product_id, p.name, COUNT(rv.review_id) AS review_count
         FROM products p
         LEFT JOIN reviews rv ON rv.product_id = p.product_id
         GROUP BY p.product_id, p.name
         ORDER BY review_count DESC, p.product_id
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
        Ok(ReviewCount {
            product_id: row.get(0)?,
            name: row.get(1)?,
            review_count: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// [`most_reviewed_products`] with the configured row limit.
pub fn most_reviewed_with(conn: &Connection, config: &ReportConfig) -> Result<Vec<ReviewCount>, StorageError> {
    most_reviewed_products(conn, config.effective_most_reviewed_limit())
}

/// [`products_rated_above`] with the configured threshold.
pub fn highly_rated_products(conn: &Connection, config: &ReportConfig) -> Result<Vec<ProductRow>, StorageError> {
    products_rated_above(conn, config.effective_high_rating_threshold())
}

/// Reviews of a product next to the scores their authors gave it.
///
/// Reviews and ratings are only related through (product, customer), so a
/// review with no matching rating has `rating: None`, and a customer with two
/// ratings produces two rows for the same review.
pub fn reviews_with_scores(conn: &Connection, product_id: i64) -> Result<Vec<ReviewWithScore>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT rv.review_id, rv.customer_id, rv.review_text, ra.rating
         FROM reviews rv
         LEFT JOIN ratings ra
             ON ra.product_id = rv.product_id AND ra.customer_id = rv.customer_id
         WHERE rv.product_id = ?1
         ORDER BY rv.review_id, ra.rating_id",
    )?;
    let rows = stmt.query_map(params![product_id], |row| {
        Ok(ReviewWithScore {
            review_id: row.get(0)?,
            customer_id: row.get(1)?,
            review_text: row.get(2)?,
            rating: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Products nobody has reviewed yet.
pub fn unreviewed_products(conn: &Connection) -> Result<Vec<ProductRow>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT p.product_id, p.name, p.category, p.price, p.avg_rating
         FROM products p
         WHERE NOT EXISTS (SELECT 1 FROM reviews rv WHERE rv.product_id = p.product_id)
         ORDER BY p.product_id",
    )?;
    let rows = stmt.query_map([], map_product_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Product count, mean price and mean cached rating per category.
pub fn category_summaries(conn: &Connection) -> Result<Vec<CategorySummary>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT category, COUNT(*), AVG(price), AVG(avg_rating)
         FROM products
         GROUP BY category
         ORDER BY category",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(CategorySummary {
            category: row.get(0)?,
            product_count: row.get(1)?,
            mean_price: row.get(2)?,
            mean_avg_rating: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Customers by number of reviews written, ties by customer id.
pub fn top_reviewers(conn: &Connection, limit: usize) -> Result<Vec<ReviewerCount>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT c.customer_id, c.name, COUNT(rv.review_id) AS review_count
         FROM customers c
         JOIN reviews rv ON rv.customer_id = c.customer_id
         GROUP BY c.customer_id, c.name
         ORDER BY review_count DESC, c.customer_id
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
        Ok(ReviewerCount {
            customer_id: row.get(0)?,
            name: row.get(1)?,
            review_count: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
