//! Ambulance and hospital selection for a single emergency.
//!
//! # Algorithm
//!
//! 1. Keep available ambulances whose capabilities cover the event's
//!    requirements; estimate travel time from each unit to the scene.
//! 2. Drop unreachable units and rank the rest with the ambulance rules.
//! 3. If a unit was found, keep hospitals covering the requirements, estimate
//!    travel time from the scene (one single-source search) and rank them
//!    with the hospital rules.
//!
//! One deterministic pass; no retries.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::rules;
use super::{Candidate, DispatchContext, RuleEngine, TieBreaker};
use crate::error::{Error, Result};
use crate::models::{Ambulance, EmergencyEvent, Hospital};
use crate::routing::RegionGraph;

/// Terminal state of a dispatch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchState {
    /// No eligible, reachable ambulance; hospital selection skipped.
    NoAmbulance,
    /// Ambulance assigned, but no eligible, reachable hospital.
    NoHospital,
    /// Ambulance and hospital assigned.
    Complete,
}

/// Result of dispatching one emergency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub emergency_id: String,
    /// Selected ambulance id.
    pub ambulance: Option<String>,
    /// Ambulance travel minutes to the scene.
    pub response_minutes: Option<f64>,
    /// Selected hospital id.
    pub hospital: Option<String>,
    /// Transport minutes from the scene to the hospital.
    pub transport_minutes: Option<f64>,
}

impl DispatchOutcome {
    fn unassigned(emergency_id: &str) -> Self {
        Self {
            emergency_id: emergency_id.to_string(),
            ambulance: None,
            response_minutes: None,
            hospital: None,
            transport_minutes: None,
        }
    }

    pub fn state(&self) -> DispatchState {
        match (&self.ambulance, &self.hospital) {
            (None, _) => DispatchState::NoAmbulance,
            (Some(_), None) => DispatchState::NoHospital,
            (Some(_), Some(_)) => DispatchState::Complete,
        }
    }
}

/// Picks one ambulance and one hospital for an emergency.
///
/// Default ranking:
/// - ambulances: travel time → life support (critical events) → id
/// - hospitals: travel time → capacity tier → id
#[derive(Debug, Clone)]
pub struct DispatchSelector {
    ambulance_rules: RuleEngine,
    hospital_rules: RuleEngine,
}

impl DispatchSelector {
    /// Creates a selector with the default rankings.
    pub fn new() -> Self {
        Self {
            ambulance_rules: RuleEngine::new()
                .with_rule(rules::TravelTime)
                .with_tie_breaker(rules::LifeSupportFirst)
                .with_final_tie_breaker(TieBreaker::ById),
            hospital_rules: RuleEngine::new()
                .with_rule(rules::TravelTime)
                .with_tie_breaker(rules::CapacityTier)
                .with_final_tie_breaker(TieBreaker::ById),
        }
    }

    /// Replaces the ambulance ranking.
    pub fn with_ambulance_rules(mut self, engine: RuleEngine) -> Self {
        self.ambulance_rules = engine;
        self
    }

    /// Replaces the hospital ranking.
    pub fn with_hospital_rules(mut self, engine: RuleEngine) -> Self {
        self.hospital_rules = engine;
        self
    }

    /// Best eligible ambulance, or `None` if no unit qualifies.
    ///
    /// # Errors
    /// [`Error::UnknownRegion`] if a unit or the event is outside the graph.
    pub fn select_ambulance(
        &self,
        event: &EmergencyEvent,
        ambulances: &[Ambulance],
        graph: &RegionGraph,
    ) -> Result<Option<Candidate>> {
        let mut candidates = Vec::new();
        for ambulance in ambulances {
            if !ambulance.is_available() || !event.is_covered_by(&ambulance.capabilities) {
                continue;
            }
            let minutes = graph.shortest_time(&ambulance.region_id, &event.region_id)?;
            if minutes.is_finite() {
                candidates.push(Candidate::from_ambulance(ambulance, minutes));
            } else {
                debug!(ambulance = %ambulance.id, "ambulance cannot reach the scene");
            }
        }

        debug!(eligible = candidates.len(), "ranking ambulances");
        let context = DispatchContext::for_event(event);
        Ok(self
            .ambulance_rules
            .select_best(&candidates, &context)
            .map(|i| candidates.swap_remove(i)))
    }

    /// Best eligible hospital, or `None` if no facility qualifies.
    ///
    /// # Errors
    /// [`Error::UnknownRegion`] if a hospital or the event is outside the graph.
    pub fn select_hospital(
        &self,
        event: &EmergencyEvent,
        hospitals: &[Hospital],
        graph: &RegionGraph,
    ) -> Result<Option<Candidate>> {
        let times = graph.travel_times_from(&event.region_id)?;

        let mut candidates = Vec::new();
        for hospital in hospitals {
            if !event.is_covered_by(&hospital.capabilities) {
                continue;
            }
            let minutes = *times
                .get(&hospital.region_id)
                .ok_or_else(|| Error::UnknownRegion(hospital.region_id.clone()))?;
            if minutes.is_finite() {
                candidates.push(Candidate::from_hospital(hospital, minutes));
            } else {
                debug!(hospital = %hospital.id, "hospital unreachable from the scene");
            }
        }

        debug!(eligible = candidates.len(), "ranking hospitals");
        let context = DispatchContext::for_event(event);
        Ok(self
            .hospital_rules
            .select_best(&candidates, &context)
            .map(|i| candidates.swap_remove(i)))
    }

    /// Runs both selection passes for one emergency.
    ///
    /// Hospital selection is skipped when no ambulance qualifies.
    ///
    /// # Errors
    /// [`Error::UnknownRegion`] for region ids outside the graph.
    #[instrument(skip_all, fields(event_id = %event.id))]
    pub fn dispatch(
        &self,
        event: &EmergencyEvent,
        ambulances: &[Ambulance],
        hospitals: &[Hospital],
        graph: &RegionGraph,
    ) -> Result<DispatchOutcome> {
        let mut outcome = DispatchOutcome::unassigned(&event.id);

        let Some(ambulance) = self.select_ambulance(event, ambulances, graph)? else {
            debug!("no eligible ambulance");
            return Ok(outcome);
        };
        debug!(ambulance = %ambulance.id, minutes = ambulance.travel_minutes, "ambulance selected");
        outcome.ambulance = Some(ambulance.id);
        outcome.response_minutes = Some(ambulance.travel_minutes);

        match self.select_hospital(event, hospitals, graph)? {
            Some(hospital) => {
                debug!(hospital = %hospital.id, minutes = hospital.travel_minutes, "hospital selected");
                outcome.hospital = Some(hospital.id);
                outcome.transport_minutes = Some(hospital.travel_minutes);
            }
            None => debug!("no eligible hospital"),
        }

        Ok(outcome)
    }
}

impl Default for DispatchSelector {
    fn default() -> Self {
        Self::new()
    }
}
