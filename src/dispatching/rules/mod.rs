//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Travel**: TRAVEL (shortest travel time)
//! - **Capability**: ALS_FIRST (life support for critical events)
//! - **Facility**: CAPACITY (higher emergency capacity tier)
//!
//! # Score Convention
//! All rules return lower scores for higher priority candidates.

use super::{Candidate, DispatchContext, DispatchingRule, RuleScore};
use crate::models::ADVANCED_LIFE_SUPPORT;

/// Shortest travel time.
///
/// Scores a candidate by its travel minutes to (or from) the scene.
#[derive(Debug, Clone, Copy)]
pub struct TravelTime;

impl DispatchingRule for TravelTime {
    fn name(&self) -> &'static str {
        "TRAVEL"
    }

    fn evaluate(&self, candidate: &Candidate, _context: &DispatchContext) -> RuleScore {
        candidate.travel_minutes
    }

    fn description(&self) -> &'static str {
        "Shortest Travel Time"
    }
}

/// Advanced life support first.
///
/// For critical events, units carrying "Advanced Life Support" outrank
/// those that don't. Neutral for every other severity.
#[derive(Debug, Clone, Copy)]
pub struct LifeSupportFirst;

impl DispatchingRule for LifeSupportFirst {
    fn name(&self) -> &'static str {
        "ALS_FIRST"
    }

    fn evaluate(&self, candidate: &Candidate, context: &DispatchContext) -> RuleScore {
        if context.severity.is_critical() && !candidate.has_capability(ADVANCED_LIFE_SUPPORT) {
            1.0
        } else {
            0.0
        }
    }

    fn description(&self) -> &'static str {
        "Advanced Life Support First (critical events)"
    }
}

/// Highest emergency capacity tier.
#[derive(Debug, Clone, Copy)]
pub struct CapacityTier;

impl DispatchingRule for CapacityTier {
    fn name(&self) -> &'static str {
        "CAPACITY"
    }

    fn evaluate(&self, candidate: &Candidate, _context: &DispatchContext) -> RuleScore {
        -f64::from(candidate.capacity_tier.rank())
    }

    fn description(&self) -> &'static str {
        "Highest Capacity Tier"
    }
}
