//! V003: Recompute averages when a rating's score or product changes.
//!
//! Moving a rating between products touches both the old and the new product.

pub const MIGRATION_SQL: &str = r#"
CREATE TRIGGER IF NOT EXISTS trg_ratings_after_update
AFTER UPDATE OF rating, product_id ON ratings
BEGIN
    UPDATE products
    SET avg_rating = COALESCE(
        (SELECT AVG(r.rating) FROM ratings r WHERE r.product_id = products.product_id), 0)
    WHERE product_id IN (OLD.product_id, NEW.product_id);
END;
"#;
