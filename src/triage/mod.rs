//! Mass-casualty triage: responder-constrained treatment allocation.
//!
//! Assigns at most one treatment resource per patient over a bounded time
//! horizon so that the sum of final survival probabilities is maximized,
//! without ever running more than `responders` applications at once.
//! The maximum is exact whenever the schedule search completes within
//! [`AllocatorConfig::search_budget`](crate::config::AllocatorConfig)
//! nodes; a larger instance keeps the best plan found by then.
//!
//! # Submodules
//!
//! - `allocator`: greedy time-indexed table, then branch-and-bound search
//! - `outcome`: final probabilities, survivors and concurrency metrics

mod allocator;
mod outcome;

pub use allocator::TriageAllocator;
pub use outcome::{Treatment, TriageOutcome};

use crate::models::{SurvivalCurve, TreatmentResource};

/// A validated triage problem.
#[derive(Debug, Clone, PartialEq)]
pub struct TriageProblem {
    /// Survival curve per patient.
    pub patients: Vec<SurvivalCurve>,
    /// Available treatment kinds (each usable any number of times).
    pub resources: Vec<TreatmentResource>,
    /// Maximum concurrent applications.
    pub responders: usize,
    /// Number of time units in the horizon.
    pub total_time: usize,
}

impl TriageProblem {
    /// Last time unit of the horizon (0 for an empty horizon).
    pub fn horizon_end(&self) -> usize {
        self.total_time.saturating_sub(1)
    }

    /// Untreated final probability of `patient`.
    pub fn baseline(&self, patient: usize) -> f64 {
        self.patients[patient].at(self.horizon_end())
    }

    /// Whether no treatment can possibly be scheduled.
    pub fn is_degenerate(&self) -> bool {
        self.total_time == 0
            || self.responders == 0
            || self.patients.is_empty()
            || self.resources.is_empty()
    }
}
