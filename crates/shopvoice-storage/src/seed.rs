//! Sample catalog: a handful of products, customers, reviews, and ratings.
//!
//! Ratings are inserted through the normal path so the triggers fill in
//! each product's cached average.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use shopvoice_core::errors::StorageError;

use crate::connection::writer::with_immediate_transaction;
use crate::queries::{customers, products, ratings, reviews};

/// (name, category, price)
pub const SAMPLE_PRODUCTS: &[(&str, &str, f64)] = &[
    ("Laptop Pro 14", "Electronics", 1299.99),
    ("Noise-Cancelling Headphones", "Electronics", 249.50),
    ("Espresso Machine", "Kitchen", 389.00),
    ("Trail Running Shoes", "Sports", 129.95),
    ("Yoga Mat", "Sports", 35.00),
];

/// (name, email)
pub const SAMPLE_CUSTOMERS: &[(&str, &str)] = &[
    ("Alice Johnson", "alice@example.com"),
    ("Bob Smith", "bob@example.com"),
    ("Carol White", "carol@example.com"),
    ("David Brown", "david@example.com"),
];

/// (product index, customer index, text, ISO date)
pub const SAMPLE_REVIEWS: &[(usize, usize, &str, &str)] = &[
    (0, 0, "Fast and light, battery lasts all day.", "2024-01-15"),
    (0, 1, "Great screen but runs warm under load.", "2024-01-20"),
    (1, 0, "Excellent noise cancellation on flights.", "2024-02-03"),
    (2, 2, "Makes cafe-quality espresso at home.", "2024-02-10"),
    (0, 3, "Solid build quality.", "2024-03-01"),
    (3, 1, "Comfortable on long runs.", "2024-03-05"),
    (1, 2, "Ear cups get warm after an hour.", "2024-03-12"),
];

/// (product index, customer index, score). The last rating has no review.
pub const SAMPLE_RATINGS: &[(usize, usize, i64)] = &[
    (0, 0, 5),
    (0, 1, 4),
    (1, 0, 5),
    (2, 2, 4),
    (0, 3, 4),
    (3, 1, 5),
    (1, 2, 3),
    (2, 3, 2),
];

/// Row counts written by [`seed_sample_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub products: usize,
    pub customers: usize,
    pub reviews: usize,
    pub ratings: usize,
}

/// Insert the sample catalog in one transaction. Fails without writing
/// anything if any sample email is already registered.
pub fn seed_sample_data(conn: &Connection) -> Result<SeedReport, StorageError> {
    let report = with_immediate_transaction(conn, |tx| {
        let product_ids = SAMPLE_PRODUCTS
            .iter()
            .map(|(name, category, price)| products::insert(tx, name, category, *price))
            .collect::<Result<Vec<_>, _>>()?;

        let customer_ids = SAMPLE_CUSTOMERS
            .iter()
            .map(|(name, email)| customers::insert(tx, name, email))
            .collect::<Result<Vec<_>, _>>()?;

        for (product, customer, text, date) in SAMPLE_REVIEWS {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                StorageError::SqliteError {
                    message: format!("bad sample date {date}: {e}"),
                }
            })?;
            reviews::insert_dated(tx, product_ids[*product], customer_ids[*customer], text, date)?;
        }

        for (product, customer, score) in SAMPLE_RATINGS {
            ratings::insert(tx, product_ids[*product], customer_ids[*customer], *score)?;
        }

        Ok(SeedReport {
            products: product_ids.len(),
            customers: customer_ids.len(),
            reviews: SAMPLE_REVIEWS.len(),
            ratings: SAMPLE_RATINGS.len(),
        })
    })?;

    tracing::info!(
        products = report.products,
        customers = report.customers,
        reviews = report.reviews,
        ratings = report.ratings,
        "sample data seeded"
    );
    Ok(report)
}
