//! Ambulance and hospital models.
//!
//! Both are dispatch candidates: they carry a capability set that must cover
//! the emergency's requirements and a home region used for travel estimates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Capability that takes priority when responding to critical emergencies.
pub const ADVANCED_LIFE_SUPPORT: &str = "Advanced Life Support";

/// Operational status of an ambulance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AmbulanceStatus {
    /// Ready to be dispatched.
    Available,
    /// Already assigned to another emergency.
    Dispatched,
    /// Under maintenance or off shift.
    OutOfService,
    /// Unrecognised status label (treated as unavailable).
    Other(String),
}

impl From<String> for AmbulanceStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Available" => AmbulanceStatus::Available,
            "Dispatched" => AmbulanceStatus::Dispatched,
            "OutOfService" | "Out of Service" => AmbulanceStatus::OutOfService,
            _ => AmbulanceStatus::Other(label),
        }
    }
}

impl From<AmbulanceStatus> for String {
    fn from(status: AmbulanceStatus) -> Self {
        match status {
            AmbulanceStatus::Available => "Available".into(),
            AmbulanceStatus::Dispatched => "Dispatched".into(),
            AmbulanceStatus::OutOfService => "OutOfService".into(),
            AmbulanceStatus::Other(label) => label,
        }
    }
}

/// An ambulance unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ambulance {
    /// Unique ambulance identifier.
    pub id: String,
    /// Equipment and crew capabilities.
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    /// Region the unit is currently in.
    #[serde(alias = "current_region")]
    pub region_id: String,
    /// Operational status.
    pub status: AmbulanceStatus,
}

impl Ambulance {
    /// Creates an available ambulance in the given region.
    pub fn new(id: impl Into<String>, region_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            capabilities: BTreeSet::new(),
            region_id: region_id.into(),
            status: AmbulanceStatus::Available,
        }
    }

    /// Adds a capability.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    /// Sets the operational status.
    pub fn with_status(mut self, status: AmbulanceStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the unit can be dispatched.
    pub fn is_available(&self) -> bool {
        self.status == AmbulanceStatus::Available
    }
}

/// Emergency department capacity tier.
///
/// Ordered `Unrated < Low < Medium < High`. Missing or unrecognised labels
/// deserialize as `Unrated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CapacityTier {
    #[default]
    Unrated,
    Low,
    Medium,
    High,
}

impl CapacityTier {
    /// Numeric rank (higher = more capacity).
    pub fn rank(self) -> u8 {
        match self {
            CapacityTier::Unrated => 0,
            CapacityTier::Low => 1,
            CapacityTier::Medium => 2,
            CapacityTier::High => 3,
        }
    }
}

impl From<String> for CapacityTier {
    fn from(label: String) -> Self {
        match label.as_str() {
            "High" => CapacityTier::High,
            "Medium" => CapacityTier::Medium,
            "Low" => CapacityTier::Low,
            _ => CapacityTier::Unrated,
        }
    }
}

impl From<CapacityTier> for String {
    fn from(tier: CapacityTier) -> Self {
        match tier {
            CapacityTier::High => "High".into(),
            CapacityTier::Medium => "Medium".into(),
            CapacityTier::Low => "Low".into(),
            CapacityTier::Unrated => "Unrated".into(),
        }
    }
}

/// A receiving hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    /// Unique hospital identifier.
    pub id: String,
    /// Region the hospital is located in.
    pub region_id: String,
    /// Clinical capabilities (e.g., "Trauma Center").
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    /// Emergency department capacity tier.
    #[serde(default, alias = "emergency_capacity")]
    pub capacity_tier: CapacityTier,
}

impl Hospital {
    /// Creates an unrated hospital in the given region.
    pub fn new(id: impl Into<String>, region_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region_id: region_id.into(),
            capabilities: BTreeSet::new(),
            capacity_tier: CapacityTier::Unrated,
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
}
