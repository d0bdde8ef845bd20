//! Emergency-response domain models.
//!
//! Immutable snapshot records consumed by the routing, dispatching and
//! triage components. Every record is serde-compatible and accepts the
//! legacy field spellings (`region_id` for region ids, `current_region`,
//! `emergency_capacity`, `special_requirements`) as aliases.
//!
//! # Domain Mappings
//!
//! | u-emergency | Role |
//! |-------------|------|
//! | Region | Road-network node with outgoing segments |
//! | Ambulance | Dispatch candidate (responder side) |
//! | Hospital | Dispatch candidate (destination side) |
//! | EmergencyEvent | Dispatch request subject |
//! | SurvivalCurve | Triage patient |
//! | TreatmentResource | Triage intervention |

mod event;
mod fleet;
mod patient;
mod region;

pub use event::{EmergencyEvent, Severity};
pub use fleet::{Ambulance, AmbulanceStatus, CapacityTier, Hospital, ADVANCED_LIFE_SUPPORT};
pub use patient::{SurvivalCurve, TreatmentResource, MAX_PROBABILITY};
pub use region::{segment_minutes, Region, Terrain};
