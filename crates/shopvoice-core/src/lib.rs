//! Core types for shopvoice: errors, configuration, and tracing setup.

pub mod config;
pub mod errors;
pub mod tracing;
