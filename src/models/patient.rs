//! Triage models: patient survival curves and treatment resources.

use serde::{Deserialize, Serialize};

/// Upper bound of a survival probability.
pub const MAX_PROBABILITY: f64 = 100.0;

/// Survival probability (0..=100) indexed by elapsed time unit.
///
/// Values are clamped on construction. No monotonicity is assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct SurvivalCurve {
    values: Vec<f64>,
}

impl SurvivalCurve {
    /// Creates a curve, clamping every value to `[0, 100]`.
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|p| p.clamp(0.0, MAX_PROBABILITY))
            .collect();
        Self { values }
    }

    /// Probability at time `t`.
    ///
    /// Past the last defined index the final value holds. An empty curve
    /// reads as 0.
    pub fn at(&self, t: usize) -> f64 {
        match self.values.get(t) {
            Some(&p) => p,
            None => self.values.last().copied().unwrap_or(0.0),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for SurvivalCurve {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<SurvivalCurve> for Vec<f64> {
    fn from(curve: SurvivalCurve) -> Self {
        curve.values
    }
}

/// A treatment that occupies one responder for `duration` time units and
/// raises the patient's survival probability by `boost` on completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreatmentResource {
    /// Application time (time units).
    pub duration: usize,
    /// Additive probability boost.
    pub boost: f64,
}

impl TreatmentResource {
    pub fn new(duration: usize, boost: f64) -> Self {
        Self { duration, boost }
    }

    /// Boosted probability, capped at 100.
    pub fn apply(&self, probability: f64) -> f64 {
        (probability + self.boost).clamp(0.0, MAX_PROBABILITY)
    }

    /// Instants a responder is busy: zero-duration treatments still hold
    /// a responder for one unit.
    pub fn occupancy(&self) -> usize {
        self.duration.max(1)
    }
}
