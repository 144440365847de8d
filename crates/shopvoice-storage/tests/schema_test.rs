//! Schema tests: migrations, constraints, referential integrity, cascades.

use rusqlite::Connection;
use shopvoice_core::errors::{ConstraintKind, StorageError};
use shopvoice_storage::connection::pragmas::apply_pragmas;
use shopvoice_storage::migrations::{current_version, run_migrations, LATEST_VERSION};
use shopvoice_storage::queries::{customers, products, ratings, reviews};

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    apply_pragmas(&conn, 5000).unwrap();
    run_migrations(&conn).unwrap();
    conn
}

fn assert_constraint(result: Result<i64, StorageError>, kind: ConstraintKind) {
    match result {
        Err(ref e) if e.is_constraint(kind) => {}
        other => panic!("expected {kind:?} violation, got {other:?}"),
    }
}

#[test]
fn migrations_reach_latest_version() {
    let conn = setup_db();
    assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
}

#[test]
fn migrations_are_idempotent() {
    let conn = setup_db();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();
    assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
}

#[test]
fn all_tables_and_triggers_exist() {
    let conn = setup_db();
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type IN ('table', 'trigger') ORDER BY name")
        .unwrap();
    let names: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    for expected in [
        "customers",
        "products",
        "ratings",
        "reviews",
        "trg_ratings_after_delete",
        "trg_ratings_after_insert",
        "trg_ratings_after_update",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
}

#[test]
fn negative_price_rejected() {
    let conn = setup_db();
    assert_constraint(products::insert(&conn, "Broken", "Misc", -0.01), ConstraintKind::Check);
    assert_eq!(products::count(&conn).unwrap(), 0);
}

#[test]
fn zero_price_allowed() {
    let conn = setup_db();
    let id = products::insert(&conn, "Sticker", "Misc", 0.0).unwrap();
    assert_eq!(products::require(&conn, id).unwrap().price, 0.0);
}

#[test]
fn new_product_average_defaults_to_zero() {
    let conn = setup_db();
    let id = products::insert(&conn, "Lamp", "Home", 20.0).unwrap();
    assert_eq!(products::require(&conn, id).unwrap().avg_rating, 0.0);
}

#[test]
fn rating_out_of_range_rejected() {
    let conn = setup_db();
    let p = products::insert(&conn, "Lamp", "Home", 20.0).unwrap();
    let c = customers::insert(&conn, "Eve", "eve@example.com").unwrap();

    assert_constraint(ratings::insert(&conn, p, c, 0), ConstraintKind::Check);
    assert_constraint(ratings::insert(&conn, p, c, 6), ConstraintKind::Check);
    assert_eq!(ratings::count(&conn).unwrap(), 0);

    for score in 1..=5 {
        ratings::insert(&conn, p, c, score).unwrap();
    }
    assert_eq!(ratings::count(&conn).unwrap(), 5);
}

#[test]
fn duplicate_email_rejected() {
    let conn = setup_db();
    customers::insert(&conn, "Eve", "eve@example.com").unwrap();
    assert_constraint(
        customers::insert(&conn, "Other Eve", "eve@example.com"),
        ConstraintKind::Unique,
    );
}

#[test]
fn review_for_missing_product_or_customer_rejected() {
    let conn = setup_db();
    let p = products::insert(&conn, "Lamp", "Home", 20.0).unwrap();
    let c = customers::insert(&conn, "Eve", "eve@example.com").unwrap();

    assert_constraint(reviews::insert(&conn, 999, c, "ghost product"), ConstraintKind::ForeignKey);
    assert_constraint(reviews::insert(&conn, p, 999, "ghost customer"), ConstraintKind::ForeignKey);
    assert_eq!(reviews::count(&conn).unwrap(), 0);
}

#[test]
fn rating_for_missing_product_or_customer_rejected() {
    let conn = setup_db();
    let p = products::insert(&conn, "Lamp", "Home", 20.0).unwrap();
    let c = customers::insert(&conn, "Eve", "eve@example.com").unwrap();

    assert_constraint(ratings::insert(&conn, 999, c, 4), ConstraintKind::ForeignKey);
    assert_constraint(ratings::insert(&conn, p, 999, 4), ConstraintKind::ForeignKey);
    assert_eq!(ratings::count(&conn).unwrap(), 0);
}

#[test]
fn deleting_product_cascades_to_reviews_and_ratings() {
    let conn = setup_db();
    let keep = products::insert(&conn, "Kettle", "Kitchen", 40.0).unwrap();
    let gone = products::insert(&conn, "Lamp", "Home", 20.0).unwrap();
    let c = customers::insert(&conn, "Eve", "eve@example.com").unwrap();
    reviews::insert(&conn, gone, c, "bright").unwrap();
    ratings::insert(&conn, gone, c, 4).unwrap();
    reviews::insert(&conn, keep, c, "boils fast").unwrap();
    ratings::insert(&conn, keep, c, 3).unwrap();

    assert!(products::delete(&conn, gone).unwrap());

    assert!(reviews::list_for_product(&conn, gone).unwrap().is_empty());
    assert_eq!(ratings::count_for_product(&conn, gone).unwrap(), 0);
    assert_eq!(reviews::list_for_product(&conn, keep).unwrap().len(), 1);
    assert_eq!(products::require(&conn, keep).unwrap().avg_rating, 3.0);
    assert!(customers::get(&conn, c).unwrap().is_some());
}

#[test]
fn deleting_customer_cascades_to_reviews_and_ratings() {
    let conn = setup_db();
    let p = products::insert(&conn, "Lamp", "Home", 20.0).unwrap();
    let eve = customers::insert(&conn, "Eve", "eve@example.com").unwrap();
    let sam = customers::insert(&conn, "Sam", "sam@example.com").unwrap();
    reviews::insert(&conn, p, eve, "bright").unwrap();
    reviews::insert(&conn, p, eve, "still bright").unwrap();
    ratings::insert(&conn, p, eve, 5).unwrap();
    reviews::insert(&conn, p, sam, "too dim").unwrap();
    ratings::insert(&conn, p, sam, 2).unwrap();

    assert!(customers::delete(&conn, eve).unwrap());

    assert!(reviews::list_for_customer(&conn, eve).unwrap().is_empty());
    let remaining = ratings::list_for_product(&conn, p).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].customer_id, sam);
    // The cascaded rating delete fired the trigger.
    assert_eq!(products::require(&conn, p).unwrap().avg_rating, 2.0);
}

#[test]
fn deleting_missing_rows_reports_false() {
    let conn = setup_db();
    assert!(!products::delete(&conn, 42).unwrap());
    assert!(!customers::delete(&conn, 42).unwrap());
    assert!(!reviews::delete(&conn, 42).unwrap());
    assert!(!ratings::delete(&conn, 42).unwrap());
}
