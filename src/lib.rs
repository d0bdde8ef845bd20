//! Emergency-response decision core for the U-Engine ecosystem.
//!
//! Two independent, pure computations over a fully supplied snapshot:
//!
//! - **Dispatch**: build a directed region graph (edge weight = travel
//!   minutes), then pick the fastest capable ambulance and the best
//!   reachable hospital for one emergency.
//! - **Triage**: assign treatment resources to patients over a bounded time
//!   horizon, never exceeding the responder count at any instant, to
//!   maximize total survival probability.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Region`, `Ambulance`, `Hospital`,
//!   `EmergencyEvent`, `SurvivalCurve`, `TreatmentResource`
//! - **`routing`**: `RegionGraph` and shortest travel time (Dijkstra)
//! - **`dispatching`**: Rule engine and `DispatchSelector`
//! - **`triage`**: `TriageAllocator` and outcome metrics
//! - **`validation`**: Snapshot integrity checks
//! - **`api`**: Request/response records and validated entry points
//! - **`config`**, **`error`**, **`logging`**: Ambient setup
//!
//! # Concurrency
//!
//! Every computation reads only its own input and allocates its own working
//! tables, so independent requests can run on separate threads without
//! synchronization. `RegionGraph` is `Send + Sync` and can be shared.
//!
//! # References
//!
//! - Dijkstra (1959), "A note on two problems in connexion with graphs"
//! - Bellman (1957), "Dynamic Programming"

pub mod api;
pub mod config;
pub mod dispatching;
pub mod error;
pub mod logging;
pub mod models;
pub mod routing;
pub mod triage;
pub mod validation;

pub use api::{allocate, dispatch};
pub use config::AllocatorConfig;
pub use error::{Error, Result};
