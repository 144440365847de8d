//! V001: Initial schema.
//! products, customers, reviews, ratings.

pub const MIGRATION_SQL: &str = r#"
-- Catalog. avg_rating is a cache of AVG(ratings.rating) for the product,
-- written only by the rating triggers and procedures::update_avg_rating.
CREATE TABLE IF NOT EXISTS products (
    product_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    price REAL NOT NULL CHECK (price >= 0),
    avg_rating REAL NOT NULL DEFAULT 0
) STRICT;

CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);

CREATE TABLE IF NOT EXISTS customers (
    customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE
) STRICT;

-- Reviews and ratings share (product_id, customer_id) but are not linked by
-- a key. A customer may leave any number of either on the same product.
CREATE TABLE IF NOT EXISTS reviews (
    review_id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(product_id) ON DELETE CASCADE,
    customer_id INTEGER NOT NULL REFERENCES customers(customer_id) ON DELETE CASCADE,
    review_text TEXT NOT NULL,
    review_date TEXT NOT NULL DEFAULT (date('now'))
) STRICT;

CREATE INDEX IF NOT EXISTS idx_reviews_product ON reviews(product_id);
CREATE INDEX IF NOT EXISTS idx_reviews_customer ON reviews(customer_id);

CREATE TABLE IF NOT EXISTS ratings (
    rating_id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(product_id) ON DELETE CASCADE,
    customer_id INTEGER NOT NULL REFERENCES customers(customer_id) ON DELETE CASCADE,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_ratings_product ON ratings(product_id);
CREATE INDEX IF NOT EXISTS idx_ratings_customer ON ratings(customer_id);
"#;
