//! Triage outcome metrics.
//!
//! Computes per-patient final probabilities and the aggregate survival
//! indicators from a set of treatments.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Final probability | Treated value, or baseline at the horizon end |
//! | Survivors | Patients with final probability > threshold |
//! | Total survival | Sum of final probabilities |
//! | Peak concurrency | Most treatments in progress at one instant |

use serde::{Deserialize, Serialize};

use super::TriageProblem;

/// One resource application to one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    /// Patient index.
    pub patient: usize,
    /// Resource index.
    pub resource: usize,
    /// Time unit the application starts.
    pub start: usize,
    /// Time unit the boost lands (`start + duration`).
    pub completion: usize,
    /// First time unit the responder is free again.
    pub release: usize,
    /// Patient's final survival probability.
    pub probability: f64,
}

/// Result of a triage allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    /// Treatments ordered by start time, then patient index.
    pub assignments: Vec<Treatment>,
    /// Final probability per patient (0..=100).
    pub final_probabilities: Vec<f64>,
    /// Patients strictly above the survival threshold.
    pub survivors: usize,
    /// Sum of final probabilities.
    pub total_survival_probability: f64,
}

impl TriageOutcome {
    /// Computes the outcome of applying `assignments` to `problem`.
    ///
    /// Untreated patients keep their baseline at the horizon end.
    pub fn calculate(problem: &TriageProblem, assignments: Vec<Treatment>, threshold: f64) -> Self {
        let mut final_probabilities: Vec<f64> = (0..problem.patients.len())
            .map(|p| problem.baseline(p))
            .collect();
        for treatment in &assignments {
            final_probabilities[treatment.patient] = treatment.probability;
        }

        let survivors = final_probabilities
            .iter()
            .filter(|&&p| p > threshold)
            .count();
        let total_survival_probability = final_probabilities.iter().sum();

        Self {
            assignments,
            final_probabilities,
            survivors,
            total_survival_probability,
        }
    }

    /// Number of treated patients.
    pub fn treated_count(&self) -> usize {
        self.assignments.len()
    }

    /// Most treatments in progress at any single instant.
    pub fn max_concurrency(&self) -> usize {
        let mut events: Vec<(usize, i32)> = Vec::with_capacity(self.assignments.len() * 2);
        for t in &self.assignments {
            events.push((t.start, 1));
            events.push((t.release, -1));
        }
        // Releases sort before starts at the same instant.
        events.sort();

        let mut active = 0i32;
        let mut peak = 0i32;
        for (_, delta) in events {
            active += delta;
            peak = peak.max(active);
        }
        peak as usize
    }

    /// Fraction of patients counted as survivors (1.0 when there are none).
    pub fn survival_rate(&self) -> f64 {
        if self.final_probabilities.is_empty() {
            1.0
        } else {
            self.survivors as f64 / self.final_probabilities.len() as f64
        }
    }
}
