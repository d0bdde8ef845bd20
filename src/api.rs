//! Request/response records and validated entry points.
//!
//! The records mirror the structured wire format (field names below); the
//! encoding itself (JSON or otherwise) is left to the caller. Each entry point
//! validates the whole snapshot first and only then runs the core algorithm,
//! so a malformed request never produces a partial result.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::AllocatorConfig;
use crate::dispatching::{DispatchOutcome, DispatchSelector};
use crate::error::Result;
use crate::models::{Ambulance, EmergencyEvent, Hospital, Region, SurvivalCurve, TreatmentResource};
use crate::routing::RegionGraph;
use crate::triage::{TriageAllocator, TriageProblem};
use crate::validation::{validate_dispatch, validate_triage};

/// A single-event dispatch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    #[serde(alias = "emergency_event")]
    pub event: EmergencyEvent,
    #[serde(default)]
    pub ambulances: Vec<Ambulance>,
    #[serde(default)]
    pub hospitals: Vec<Hospital>,
    pub regions: Vec<Region>,
}

/// Dispatch decision. Absent assignments serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub emergency_id: String,
    pub assigned_ambulance: Option<String>,
    pub destination_hospital: Option<String>,
}

impl From<DispatchOutcome> for DispatchResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            emergency_id: outcome.emergency_id,
            assigned_ambulance: outcome.ambulance,
            destination_hospital: outcome.hospital,
        }
    }
}

/// A treatment resource as supplied on the wire.
///
/// Signed so that negative durations can be reported instead of rejected by
/// the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(alias = "time")]
    pub duration: i64,
    pub boost: f64,
}

/// A triage allocation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageRequest {
    /// Survival probability by time unit, one sequence per patient.
    pub patients: Vec<Vec<f64>>,
    pub resources: Vec<ResourceRecord>,
    pub responders: i64,
    pub total_time: i64,
}

/// One treatment in the triage response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub patient: usize,
    pub resource: usize,
    pub time: usize,
}

/// Triage allocation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResponse {
    pub assignments: Vec<AssignmentRecord>,
    pub survivors: usize,
    pub total_survival_probability: f64,
}

/// Validates a dispatch request and selects an ambulance and hospital.
///
/// # Errors
/// [`Error::Validation`](crate::Error::Validation) when the snapshot is
/// malformed (duplicate ids, unknown region references, negative distances).
#[instrument(skip_all, fields(event_id = %request.event.id))]
pub fn dispatch(request: &DispatchRequest) -> Result<DispatchResponse> {
    validate_dispatch(
        &request.event,
        &request.ambulances,
        &request.hospitals,
        &request.regions,
    )?;

    let graph = RegionGraph::build(&request.regions)?;
    let outcome = DispatchSelector::new().dispatch(
        &request.event,
        &request.ambulances,
        &request.hospitals,
        &graph,
    )?;

    info!(state = ?outcome.state(), "dispatch decided");
    Ok(outcome.into())
}

/// Validates a triage request against `config` and runs the allocator.
///
/// # Errors
/// [`Error::Validation`](crate::Error::Validation) for empty or non-finite
/// survival curves, negative counts or durations, and requests exceeding the
/// configured limits.
#[instrument(skip_all, fields(patients = request.patients.len(), total_time = request.total_time))]
pub fn allocate(request: &TriageRequest, config: &AllocatorConfig) -> Result<TriageResponse> {
    validate_triage(request, config)?;

    let problem = TriageProblem {
        patients: request
            .patients
            .iter()
            .map(|values| SurvivalCurve::new(values.clone()))
            .collect(),
        resources: request
            .resources
            .iter()
            .map(|r| TreatmentResource::new(r.duration as usize, r.boost))
            .collect(),
        responders: request.responders as usize,
        total_time: request.total_time as usize,
    };

    let outcome = TriageAllocator::new(config.clone()).allocate(&problem);
    info!(
        assignments = outcome.assignments.len(),
        survivors = outcome.survivors,
        "triage allocated"
    );

    Ok(TriageResponse {
        assignments: outcome
            .assignments
            .iter()
            .map(|a| AssignmentRecord {
                patient: a.patient,
                resource: a.resource,
                time: a.start,
            })
            .collect(),
        survivors: outcome.survivors,
        total_survival_probability: outcome.total_survival_probability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::validation::ValidationErrorKind;

    const DISPATCH_JSON: &str = r#"{
        "emergency_event": {
            "id": "E1",
            "region_id": "R1",
            "severity": "Critical",
            "type": "Cardiac Arrest",
            "special_requirements": ["Cardiac Center"]
        },
        "ambulances": [
            {"id": "A1", "capabilities": ["Basic Life Support"], "current_region": "R1", "status": "Available"},
            {"id": "A2", "capabilities": ["Advanced Life Support", "Cardiac Center"], "current_region": "R2", "status": "Available"},
            {"id": "A3", "capabilities": ["Advanced Life Support", "Cardiac Center"], "current_region": "R1", "status": "Dispatched"}
        ],
        "hospitals": [
            {"id": "H1", "region_id": "R3", "capabilities": ["Trauma Center", "Cardiac Center"], "emergency_capacity": "High"},
            {"id": "H2", "region_id": "R1", "capabilities": ["General Emergency"], "emergency_capacity": "Medium"}
        ],
        "regions": [
            {"region_id": "R1", "type": "Urban", "speed": 30, "distances": {"R2": 5, "R3": 7}, "congestion_factor": 0.5, "blocked_routes": []},
            {"region_id": "R2", "type": "Suburban", "speed": 50, "distances": {"R1": 5, "R3": 8}, "congestion_factor": 1.0, "blocked_routes": []},
            {"region_id": "R3", "type": "Suburban", "speed": 50, "distances": {"R1": 7, "R2": 8}, "congestion_factor": 1.0, "blocked_routes": []}
        ]
    }"#;

    #[test]
    fn test_dispatch_from_legacy_json() {
        let request: DispatchRequest = serde_json::from_str(DISPATCH_JSON).unwrap();
        let response = dispatch(&request).unwrap();

        // A1 lacks the cardiac capability, A3 is busy → A2 (R2→R1 = 6 min).
        // Only H1 covers "Cardiac Center".
        assert_eq!(response.emergency_id, "E1");
        assert_eq!(response.assigned_ambulance.as_deref(), Some("A2"));
        assert_eq!(response.destination_hospital.as_deref(), Some("H1"));
    }

    #[test]
    fn test_dispatch_response_serializes_nulls() {
        let response = DispatchResponse {
            emergency_id: "E1".into(),
            assigned_ambulance: None,
            destination_hospital: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "emergency_id": "E1",
                "assigned_ambulance": null,
                "destination_hospital": null
            })
        );
    }

    #[test]
    fn test_dispatch_rejects_unknown_region() {
        let mut request: DispatchRequest = serde_json::from_str(DISPATCH_JSON).unwrap();
        request.ambulances[0].region_id = "R9".into();

        match dispatch(&request) {
            Err(Error::Validation(errors)) => assert!(errors
                .iter()
                .any(|e| e.kind == ValidationErrorKind::InvalidRegionReference)),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_missing_required_field_fails_to_decode() {
        let json = r#"{"event": {"id": "E1", "severity": "Critical"}, "regions": []}"#;
        assert!(serde_json::from_str::<DispatchRequest>(json).is_err());
    }

    #[test]
    fn test_allocate_reference_scenario() {
        let request: TriageRequest = serde_json::from_str(
            r#"{"patients": [[40, 60, 80]], "resources": [{"time": 1, "boost": 20}], "responders": 1, "total_time": 2}"#,
        )
        .unwrap();
        let response = allocate(&request, &AllocatorConfig::default()).unwrap();

        assert_eq!(
            response.assignments,
            vec![AssignmentRecord {
                patient: 0,
                resource: 0,
                time: 0
            }]
        );
        assert_eq!(response.survivors, 1);
        assert!((response.total_survival_probability - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocate_rejects_negative_inputs() {
        let request = TriageRequest {
            patients: vec![vec![50.0]],
            resources: vec![ResourceRecord {
                duration: -1,
                boost: 10.0,
            }],
            responders: -2,
            total_time: 3,
        };

        match allocate(&request, &AllocatorConfig::default()) {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .all(|e| e.kind == ValidationErrorKind::NegativeValue));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_allocate_response_shape() {
        let request = TriageRequest {
            patients: vec![vec![30.0, 20.0]],
            resources: vec![ResourceRecord {
                duration: 1,
                boost: 40.0,
            }],
            responders: 1,
            total_time: 2,
        };
        let response = allocate(&request, &AllocatorConfig::default()).unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["assignments"][0]["patient"], 0);
        assert_eq!(json["assignments"][0]["resource"], 0);
        assert_eq!(json["assignments"][0]["time"], 0);
        assert_eq!(json["survivors"], 1);
        assert_eq!(json["total_survival_probability"], 60.0);
    }
}
