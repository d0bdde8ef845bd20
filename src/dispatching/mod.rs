//! Dispatching rules, rule engine and ambulance/hospital selection.
//!
//! Candidates are first filtered (availability, capability superset match,
//! reachability) and then ranked by a sequential rule engine ending in a
//! deterministic id tie-breaker.
//!
//! # Usage
//!
//! ```
//! use u_emergency::dispatching::DispatchSelector;
//! use u_emergency::models::{Ambulance, EmergencyEvent, Hospital, Region, Severity, Terrain};
//! use u_emergency::routing::RegionGraph;
//!
//! let regions = vec![
//!     Region::new("R1", Terrain::Urban).with_neighbor("R2", 5.0),
//!     Region::new("R2", Terrain::Urban).with_neighbor("R1", 5.0),
//! ];
//! let graph = RegionGraph::build(&regions).unwrap();
//! let event = EmergencyEvent::new("E1", "R1", Severity::Critical);
//! let ambulances = vec![Ambulance::new("A1", "R2")];
//! let hospitals = vec![Hospital::new("H1", "R2")];
//!
//! let outcome = DispatchSelector::new()
//!     .dispatch(&event, &ambulances, &hospitals, &graph)
//!     .unwrap();
//! assert_eq!(outcome.ambulance.as_deref(), Some("A1"));
//! assert_eq!(outcome.hospital.as_deref(), Some("H1"));
//! ```

mod context;
mod engine;
pub mod rules;
mod selector;

pub use context::{Candidate, DispatchContext};
pub use engine::{RuleEngine, TieBreaker};
pub use selector::{DispatchOutcome, DispatchSelector, DispatchState};

use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority.
pub type RuleScore = f64;

/// A dispatching rule that evaluates candidate priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for candidates that should be chosen first.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "TRAVEL").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a candidate for the given event context.
    fn evaluate(&self, candidate: &Candidate, context: &DispatchContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
