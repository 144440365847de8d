//! Tests for the tracing setup.

use std::sync::Mutex;

use shopvoice_core::tracing::setup::{build_filter, DEFAULT_FILTER};
use shopvoice_core::tracing::init_tracing;

/// Serializes tests that touch SHOPVOICE_LOG.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn init_with_module_filters() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("SHOPVOICE_LOG", "shopvoice_storage=debug,shopvoice_core=warn");
    init_tracing();
    std::env::remove_var("SHOPVOICE_LOG");
}

#[test]
fn init_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    tracing::info!("still logging after repeated init");
}

#[test]
fn invalid_filter_falls_back_to_default() {
    let default = build_filter(None).to_string();
    assert_eq!(default, DEFAULT_FILTER);
    assert_eq!(build_filter(Some("[[not a filter")).to_string(), default);
}

#[test]
fn valid_filter_is_kept() {
    let filter = build_filter(Some("shopvoice_storage=debug")).to_string();
    assert_eq!(filter, "shopvoice_storage=debug");
}
