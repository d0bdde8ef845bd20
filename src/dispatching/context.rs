//! Candidates and evaluation context for dispatching rules.

use std::collections::BTreeSet;

use crate::models::{Ambulance, CapacityTier, EmergencyEvent, Hospital, Severity};

/// A dispatch candidate (ambulance or hospital) with its travel estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Ambulance or hospital id.
    pub id: String,
    /// Capability set of the unit or facility.
    pub capabilities: BTreeSet<String>,
    /// Travel minutes relevant to this candidate (to or from the scene).
    pub travel_minutes: f64,
    /// Capacity tier; `Unrated` for ambulances.
    pub capacity_tier: CapacityTier,
}

impl Candidate {
    /// Creates a candidate with no capabilities.
    pub fn new(id: impl Into<String>, travel_minutes: f64) -> Self {
        Self {
            id: id.into(),
            capabilities: BTreeSet::new(),
            travel_minutes,
            capacity_tier: CapacityTier::Unrated,
        }
    }

    /// Candidate for an ambulance travelling to the scene.
    pub fn from_ambulance(ambulance: &Ambulance, travel_minutes: f64) -> Self {
        Self {
            id: ambulance.id.clone(),
            capabilities: ambulance.capabilities.clone(),
            travel_minutes,
            capacity_tier: CapacityTier::Unrated,
        }
    }

    /// Candidate for a hospital reached from the scene.
    pub fn from_hospital(hospital: &Hospital, travel_minutes: f64) -> Self {
        Self {
            id: hospital.id.clone(),
            capabilities: hospital.capabilities.clone(),
            travel_minutes,
            capacity_tier: hospital.capacity_tier,
        }
    }

    /// Adds a capability.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    /// Sets the capacity tier.
    pub fn with_capacity_tier(mut self, tier: CapacityTier) -> Self {
        self.capacity_tier = tier;
        self
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

/// Event attributes visible to dispatching rules.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub severity: Severity,
    pub required_capabilities: BTreeSet<String>,
}

impl DispatchContext {
    /// Context for the given emergency.
    pub fn for_event(event: &EmergencyEvent) -> Self {
        Self {
            severity: event.severity.clone(),
            required_capabilities: event.required_capabilities.clone(),
        }
    }

    /// Context with the given severity and no requirements.
    pub fn with_severity(severity: Severity) -> Self {
        Self {
            severity,
            required_capabilities: BTreeSet::new(),
        }
    }
}
