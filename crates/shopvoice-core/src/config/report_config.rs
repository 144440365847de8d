//! Report query configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MOST_REVIEWED_LIMIT: usize = 5;
pub const DEFAULT_HIGH_RATING_THRESHOLD: f64 = 4.0;

/// Defaults for the reporting queries.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows returned by the "most reviewed products" report. Default: 5.
    pub most_reviewed_limit: Option<usize>,
    /// Mean score a product must exceed to count as highly rated. Default: 4.0.
    pub high_rating_threshold: Option<f64>,
}

impl ReportConfig {
    pub fn effective_most_reviewed_limit(&self) -> usize {
        self.most_reviewed_limit.unwrap_or(DEFAULT_MOST_REVIEWED_LIMIT)
    }

    pub fn effective_high_rating_threshold(&self) -> f64 {
        self.high_rating_threshold
            .unwrap_or(DEFAULT_HIGH_RATING_THRESHOLD)
    }
}
