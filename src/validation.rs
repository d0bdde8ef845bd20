//! Input validation for dispatch and triage requests.
//!
//! Checks structural integrity of a snapshot before any algorithm runs.
//! Detects:
//! - Duplicate IDs
//! - References to regions that are not part of the snapshot
//! - Negative or non-finite distances
//! - Empty or non-finite survival curves
//! - Negative counts and durations
//! - Requests exceeding the configured table limits
//!
//! Every issue is collected; callers get the full list at once.

use crate::api::TriageRequest;
use crate::config::AllocatorConfig;
use crate::models::{Ambulance, EmergencyEvent, Hospital, Region};
use std::collections::HashSet;
use thiserror::Error;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A record references a region that doesn't exist.
    InvalidRegionReference,
    /// A road segment has a negative or non-finite distance.
    InvalidDistance,
    /// A patient has no survival values.
    EmptySurvivalCurve,
    /// A count, duration or time horizon is negative.
    NegativeValue,
    /// A probability or boost is NaN or infinite.
    NonFiniteValue,
    /// The request exceeds a configured limit.
    LimitExceeded,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a region set.
///
/// Checks:
/// 1. No duplicate region IDs
/// 2. Every neighbour in a distance map is a known region
/// 3. Distances are finite and non-negative
pub fn validate_regions(regions: &[Region]) -> ValidationResult {
    let mut errors = Vec::new();
    check_regions(regions, &mut errors);
    finish(errors)
}

fn check_regions<'a>(regions: &'a [Region], errors: &mut Vec<ValidationError>) -> HashSet<&'a str> {
    let mut region_ids = HashSet::new();
    for region in regions {
        if !region_ids.insert(region.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate region ID: {}", region.id),
            ));
        }
    }

    for region in regions {
        for (neighbor, &distance) in &region.distances {
            if !region_ids.contains(neighbor.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidRegionReference,
                    format!(
                        "Region '{}' references unknown neighbour '{}'",
                        region.id, neighbor
                    ),
                ));
            }
            if !distance.is_finite() || distance < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDistance,
                    format!(
                        "Region '{}' has invalid distance {} to '{}'",
                        region.id, distance, neighbor
                    ),
                ));
            }
        }
    }

    region_ids
}

/// Validates a dispatch snapshot.
///
/// Checks the region set (see [`validate_regions`]), then:
/// 1. No duplicate ambulance or hospital IDs
/// 2. The event, every ambulance and every hospital reference a known region
pub fn validate_dispatch(
    event: &EmergencyEvent,
    ambulances: &[Ambulance],
    hospitals: &[Hospital],
    regions: &[Region],
) -> ValidationResult {
    let mut errors = Vec::new();
    let region_ids = check_regions(regions, &mut errors);

    let mut check_region = |owner: &str, region_id: &str| {
        if !region_ids.contains(region_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRegionReference,
                format!("{owner} references unknown region '{region_id}'"),
            ));
        }
    };

    check_region(&format!("Event '{}'", event.id), &event.region_id);
    for ambulance in ambulances {
        check_region(&format!("Ambulance '{}'", ambulance.id), &ambulance.region_id);
    }
    for hospital in hospitals {
        check_region(&format!("Hospital '{}'", hospital.id), &hospital.region_id);
    }

    let mut ambulance_ids = HashSet::new();
    for ambulance in ambulances {
        if !ambulance_ids.insert(ambulance.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate ambulance ID: {}", ambulance.id),
            ));
        }
    }

    let mut hospital_ids = HashSet::new();
    for hospital in hospitals {
        if !hospital_ids.insert(hospital.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate hospital ID: {}", hospital.id),
            ));
        }
    }

    finish(errors)
}

/// Validates a triage request against the allocator limits.
///
/// Checks:
/// 1. `responders` and `total_time` are non-negative and within limits
/// 2. Every patient has at least one finite survival value
/// 3. Every resource has a non-negative duration and a finite boost
pub fn validate_triage(request: &TriageRequest, config: &AllocatorConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if request.responders < 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("responders is negative ({})", request.responders),
        ));
    } else if request.responders as u64 > config.max_responders as u64 {
        errors.push(ValidationError::new(
            ValidationErrorKind::LimitExceeded,
            format!(
                "responders {} exceeds limit {}",
                request.responders, config.max_responders
            ),
        ));
    }

    if request.total_time < 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("total_time is negative ({})", request.total_time),
        ));
    } else if request.total_time as u64 > config.max_horizon as u64 {
        errors.push(ValidationError::new(
            ValidationErrorKind::LimitExceeded,
            format!(
                "total_time {} exceeds limit {}",
                request.total_time, config.max_horizon
            ),
        ));
    }

    for (index, curve) in request.patients.iter().enumerate() {
        if curve.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySurvivalCurve,
                format!("Patient {index} has no survival values"),
            ));
        } else if curve.iter().any(|p| !p.is_finite()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFiniteValue,
                format!("Patient {index} has a non-finite survival value"),
            ));
        }
    }

    for (index, resource) in request.resources.iter().enumerate() {
        if resource.duration < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!("Resource {index} has negative duration ({})", resource.duration),
            ));
        }
        if !resource.boost.is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFiniteValue,
                format!("Resource {index} has a non-finite boost"),
            ));
        }
    }

    finish(errors)
}
