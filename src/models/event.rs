//! Emergency event model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Event severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    /// Life-threatening; life-support-capable units are preferred.
    Critical,
    /// Any other severity label.
    Other(String),
}

impl Severity {
    pub fn is_critical(&self) -> bool {
        matches!(self, Severity::Critical)
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        if label == "Critical" {
            Severity::Critical
        } else {
            Severity::Other(label)
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical => "Critical".into(),
            Severity::Other(label) => label,
        }
    }
}

/// An emergency requiring one ambulance and one receiving hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyEvent {
    /// Unique event identifier.
    pub id: String,
    /// Region where the emergency occurred.
    pub region_id: String,
    /// Event severity.
    pub severity: Severity,
    /// Incident classification (e.g., "Cardiac Arrest").
    #[serde(default, rename = "type")]
    pub incident_type: String,
    /// Capabilities every responding unit and hospital must have.
    #[serde(default, alias = "special_requirements")]
    pub required_capabilities: BTreeSet<String>,
}

impl EmergencyEvent {
    /// Creates an event with no capability requirements.
    pub fn new(id: impl Into<String>, region_id: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            region_id: region_id.into(),
            severity,
            incident_type: String::new(),
            required_capabilities: BTreeSet::new(),
        }
    }

    /// Sets the incident type.
    pub fn with_incident_type(mut self, incident_type: impl Into<String>) -> Self {
        self.incident_type = incident_type.into();
        self
    }

    /// Adds a required capability.
    pub fn with_requirement(mut self, capability: impl Into<String>) -> Self {
        self.required_capabilities.insert(capability.into());
        self
    }

    /// Whether `capabilities` covers every requirement of this event.
    pub fn is_covered_by(&self, capabilities: &BTreeSet<String>) -> bool {
        self.required_capabilities.is_subset(capabilities)
    }
}
