//! Reporting queries against the seeded sample catalog.
//!
//! Sample ids are assigned in insertion order on a fresh database:
//! products 1..=5 (Laptop, Headphones, Espresso, Shoes, Yoga Mat) and
//! customers 1..=4 (Alice, Bob, Carol, David).

use rusqlite::Connection;
use shopvoice_core::config::ReportConfig;
use shopvoice_core::errors::ConstraintKind;
use shopvoice_storage::connection::pragmas::apply_pragmas;
use shopvoice_storage::migrations::run_migrations;
use shopvoice_storage::queries::{customers, products, ratings, reviews};
use shopvoice_storage::reports::*;
use shopvoice_storage::seed::{seed_sample_data, SeedReport};

const LAPTOP: i64 = 1;
const HEADPHONES: i64 = 2;
const ESPRESSO: i64 = 3;
const SHOES: i64 = 4;
const YOGA_MAT: i64 = 5;

fn seeded_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    apply_pragmas(&conn, 5000).unwrap();
    run_migrations(&conn).unwrap();
    seed_sample_data(&conn).unwrap();
    conn
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn seed_writes_expected_counts_and_averages() {
    let conn = Connection::open_in_memory().unwrap();
    apply_pragmas(&conn, 5000).unwrap();
    run_migrations(&conn).unwrap();

    let report = seed_sample_data(&conn).unwrap();
    assert_eq!(
        report,
        SeedReport { products: 5, customers: 4, reviews: 7, ratings: 8 }
    );

    assert!(close(products::require(&conn, LAPTOP).unwrap().avg_rating, 13.0 / 3.0));
    assert!(close(products::require(&conn, HEADPHONES).unwrap().avg_rating, 4.0));
    assert!(close(products::require(&conn, ESPRESSO).unwrap().avg_rating, 3.0));
    assert!(close(products::require(&conn, SHOES).unwrap().avg_rating, 5.0));
    assert_eq!(products::require(&conn, YOGA_MAT).unwrap().avg_rating, 0.0);
}

#[test]
fn seeding_twice_fails_without_partial_rows() {
    let conn = seeded_db();
    let err = seed_sample_data(&conn).unwrap_err();
    assert!(err.is_constraint(ConstraintKind::Unique));

    assert_eq!(products::count(&conn).unwrap(), 5);
    assert_eq!(customers::list(&conn).unwrap().len(), 4);
    assert_eq!(reviews::count(&conn).unwrap(), 7);
    assert_eq!(ratings::count(&conn).unwrap(), 8);
}

#[test]
fn product_reviews_join_customer_names() {
    let conn = seeded_db();
    let names: Vec<_> = product_reviews(&conn, LAPTOP)
        .unwrap()
        .into_iter()
        .map(|r| r.customer_name)
        .collect();
    assert_eq!(names, vec!["Alice Johnson", "Bob Smith", "David Brown"]);
    assert!(product_reviews(&conn, YOGA_MAT).unwrap().is_empty());
}

#[test]
fn rating_summaries_aggregate_per_product() {
    let conn = seeded_db();
    let summaries = rating_summaries(&conn).unwrap();
    assert_eq!(summaries.len(), 4, "unrated products are omitted");

    let laptop = &summaries[0];
    assert_eq!(laptop.product_id, LAPTOP);
    assert_eq!(laptop.product_name, "Laptop Pro 14");
    assert_eq!(laptop.rating_count, 3);
    assert!(close(laptop.mean_rating, 13.0 / 3.0));
    assert_eq!((laptop.min_rating, laptop.max_rating), (4, 5));

    let espresso = &summaries[2];
    assert_eq!(espresso.product_id, ESPRESSO);
    assert_eq!((espresso.min_rating, espresso.max_rating), (2, 4));
}

#[test]
fn products_rated_above_is_strict() {
    let conn = seeded_db();
    let ids: Vec<_> = products_rated_above(&conn, 4.0)
        .unwrap()
        .into_iter()
        .map(|p| p.product_id)
        .collect();
    // Headphones sit exactly at 4.0 and are excluded.
    assert_eq!(ids, vec![SHOES, LAPTOP]);

    let highly_rated: Vec<_> = highly_rated_products(&conn, &ReportConfig::default())
        .unwrap()
        .into_iter()
        .map(|p| p.product_id)
        .collect();
    assert_eq!(highly_rated, ids);
}

#[test]
fn participants_union_reviewers_and_raters() {
    let conn = seeded_db();
    let ids: Vec<_> = product_participants(&conn, ESPRESSO)
        .unwrap()
        .into_iter()
        .map(|p| p.customer_id)
        .collect();
    // Carol reviewed and rated; David only rated.
    assert_eq!(ids, vec![3, 4]);

    assert_eq!(product_participants(&conn, LAPTOP).unwrap().len(), 3);
    assert!(product_participants(&conn, YOGA_MAT).unwrap().is_empty());
}

#[test]
fn most_reviewed_orders_by_descending_count() {
    let conn = seeded_db();
    let top = most_reviewed_products(&conn, 3).unwrap();
    let counts: Vec<_> = top.iter().map(|r| (r.product_id, r.review_count)).collect();
    assert_eq!(counts, vec![(LAPTOP, 3), (HEADPHONES, 2), (ESPRESSO, 1)]);

    let all = most_reviewed_with(&conn, &ReportConfig::default()).unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].review_count >= w[1].review_count));
    assert_eq!(all.last().unwrap().product_id, YOGA_MAT);
    assert_eq!(all.last().unwrap().review_count, 0);
}

#[test]
fn oversized_limits_return_every_row() {
    let conn = seeded_db();
    assert_eq!(most_reviewed_products(&conn, usize::MAX).unwrap().len(), 5);
    assert_eq!(top_reviewers(&conn, usize::MAX).unwrap().len(), 4);
}

#[test]
fn reviews_with_scores_correlate_on_product_and_customer() {
    let conn = seeded_db();
    let rows = reviews_with_scores(&conn, HEADPHONES).unwrap();
    let pairs: Vec<_> = rows.iter().map(|r| (r.customer_id, r.rating)).collect();
    assert_eq!(pairs, vec![(1, Some(5)), (3, Some(3))]);

    // A review with no matching rating, and a second rating on a reviewed pair.
    reviews::insert(&conn, ESPRESSO, 2, "Bob never rated this").unwrap();
    ratings::insert(&conn, ESPRESSO, 3, 5).unwrap();

    let rows = reviews_with_scores(&conn, ESPRESSO).unwrap();
    let pairs: Vec<_> = rows.iter().map(|r| (r.customer_id, r.rating)).collect();
    assert_eq!(pairs, vec![(3, Some(4)), (3, Some(5)), (2, None)]);
}

#[test]
fn unreviewed_products_lists_only_yoga_mat() {
    let conn = seeded_db();
    let ids: Vec<_> = unreviewed_products(&conn)
        .unwrap()
        .into_iter()
        .map(|p| p.product_id)
        .collect();
    assert_eq!(ids, vec![YOGA_MAT]);
}

#[test]
fn category_summaries_group_catalog() {
    let conn = seeded_db();
    let summaries = category_summaries(&conn).unwrap();
    let categories: Vec<_> = summaries.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(categories, vec!["Electronics", "Kitchen", "Sports"]);

    let sports = &summaries[2];
    assert_eq!(sports.product_count, 2);
    assert!(close(sports.mean_price, (129.95 + 35.00) / 2.0));
    assert!(close(sports.mean_avg_rating, 2.5));
}

#[test]
fn top_reviewers_break_ties_by_id() {
    let conn = seeded_db();
    let top = top_reviewers(&conn, 2).unwrap();
    let ids: Vec<_> = top.iter().map(|r| (r.customer_id, r.review_count)).collect();
    assert_eq!(ids, vec![(1, 2), (2, 2)]);
}
