//! Allocator configuration.
//!
//! Bounds the size of the triage table before any memory is committed,
//! caps the exact schedule search and fixes the survivor threshold.

use serde::{Deserialize, Serialize};

/// Default planning horizon limit (time units).
pub const DEFAULT_MAX_HORIZON: usize = 1440;
/// Default responder limit.
pub const DEFAULT_MAX_RESPONDERS: usize = 64;
/// A patient survives when their final probability is strictly above this.
pub const DEFAULT_SURVIVAL_THRESHOLD: f64 = 50.0;
/// Default number of branch-and-bound nodes explored per allocation.
pub const DEFAULT_SEARCH_BUDGET: usize = 100_000;

/// Limits and thresholds for [`TriageAllocator`](crate::triage::TriageAllocator).
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Largest accepted `total_time`.
    pub max_horizon: usize,
    /// Largest accepted responder count.
    pub max_responders: usize,
    /// Survivor threshold (exclusive).
    pub survival_threshold: f64,
    /// Node limit for the exact search; `0` keeps the greedy plan.
    pub search_budget: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            max_horizon: DEFAULT_MAX_HORIZON,
            max_responders: DEFAULT_MAX_RESPONDERS,
            survival_threshold: DEFAULT_SURVIVAL_THRESHOLD,
            search_budget: DEFAULT_SEARCH_BUDGET,
        }
    }
}

impl AllocatorConfig {
    /// Sets the horizon limit.
    pub fn with_max_horizon(mut self, max_horizon: usize) -> Self {
        self.max_horizon = max_horizon;
        self
    }

    /// Sets the responder limit.
    pub fn with_max_responders(mut self, max_responders: usize) -> Self {
        self.max_responders = max_responders;
        self
    }

    /// Sets the survivor threshold.
    pub fn with_survival_threshold(mut self, threshold: f64) -> Self {
        self.survival_threshold = threshold;
        self
    }

    /// Sets the search node limit.
    pub fn with_search_budget(mut self, search_budget: usize) -> Self {
        self.search_budget = search_budget;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AllocatorConfig::default();
        assert_eq!(config.max_horizon, 1440);
        assert_eq!(config.max_responders, 64);
        assert_eq!(config.survival_threshold, 50.0);
        assert_eq!(config.search_budget, 100_000);
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: AllocatorConfig = serde_json::from_str(r#"{"max_horizon": 60}"#).unwrap();
        assert_eq!(config.max_horizon, 60);
        assert_eq!(config.max_responders, DEFAULT_MAX_RESPONDERS);
        assert_eq!(config.survival_threshold, DEFAULT_SURVIVAL_THRESHOLD);
        assert_eq!(config.search_budget, DEFAULT_SEARCH_BUDGET);
    }
}
