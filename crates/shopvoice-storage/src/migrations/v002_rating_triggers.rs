//! V002: Keep products.avg_rating in sync on rating insert and delete.
//!
//! Each trigger recomputes only the product named by the affected row. A
//! product with no ratings left goes back to 0. Triggers run inside the
//! firing statement, so a failure here aborts the insert or delete.

pub const MIGRATION_SQL: &str = r#"
CREATE TRIGGER IF NOT EXISTS trg_ratings_after_insert
AFTER INSERT ON ratings
BEGIN
    UPDATE products
    SET avg_rating = COALESCE(
        (SELECT AVG(rating) FROM ratings WHERE product_id = NEW.product_id), 0)
    WHERE product_id = NEW.product_id;
END;

CREATE TRIGGER IF NOT EXISTS trg_ratings_after_delete
AFTER DELETE ON ratings
BEGIN
    UPDATE products
    SET avg_rating = COALESCE(
        (SELECT AVG(rating) FROM ratings WHERE product_id = OLD.product_id), 0)
    WHERE product_id = OLD.product_id;
END;
"#;
