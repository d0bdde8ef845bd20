//! Time-indexed treatment allocator.
//!
//! # Time Model
//!
//! Time units are `0..total_time`; the horizon ends at `total_time - 1`.
//! A resource `k` started at `s` holds one responder over
//! `[s, s + max(d_k, 1))` and completes at `c = s + d_k ≤ total_time - 1`,
//! leaving the patient at `min(100, curve(c) + boost_k)`. An untreated
//! patient ends at `curve(total_time - 1)`.
//!
//! # Algorithm
//!
//! 1. Build `dp[t][p]`: best final probability for patient `p` from one
//!    application completing by `t`, using only windows that still have a
//!    free responder at every instant:
//!    `dp[t][p] = max(dp[t-1][p], max_k min(100, curve_p(t) + boost_k))`.
//!    Only strict improvements replace a cell, so ties keep the earliest
//!    completion and the lowest resource index.
//! 2. Commit the untreated patient whose `dp[T-1][p]` gains the most over
//!    baseline (ties: lowest resource, then lowest patient), consume its
//!    responder window and mark the patient treated.
//! 3. Rebuild the table on the residual capacity and repeat until no
//!    application with a positive gain fits.
//! 4. Starting from that plan as the incumbent, run a depth-first
//!    branch-and-bound over `(patient, resource, start)` on the capacity
//!    timeline. Each patient is either left untreated or given one
//!    feasible window; a branch is cut when its gain plus the best
//!    capacity-free gain of the remaining patients cannot beat the
//!    incumbent. Only strict improvements replace the incumbent.
//!
//! When the search finishes within `search_budget` nodes the plan is
//! optimal; otherwise the best plan found so far is kept, which is never
//! worse than the greedy one. Both loops are iterative; each patient is
//! treated at most once and the number of concurrent applications never
//! exceeds `responders`.
//!
//! # Complexity
//! Greedy: O(T · P · K) per round, at most P rounds. Table memory O(T · P).
//! Search: at most `search_budget` nodes, each scanning O(T · K) windows.

use tracing::{debug, instrument, trace};

use super::{Treatment, TriageOutcome, TriageProblem};
use crate::config::AllocatorConfig;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct Cell {
    probability: f64,
    /// `(resource, start)` that achieves `probability`; `None` = untreated.
    choice: Option<(usize, usize)>,
}

/// Free responders per time unit.
#[derive(Debug, Clone)]
struct CapacityTimeline {
    free: Vec<usize>,
    /// `saturated[i]` = number of fully booked instants in `0..i`.
    saturated: Vec<usize>,
}

impl CapacityTimeline {
    fn new(responders: usize, total_time: usize) -> Self {
        let mut timeline = Self {
            free: vec![responders; total_time],
            saturated: vec![0; total_time + 1],
        };
        timeline.reindex();
        timeline
    }

    fn reindex(&mut self) {
        for (i, &free) in self.free.iter().enumerate() {
            self.saturated[i + 1] = self.saturated[i] + usize::from(free == 0);
        }
    }

    fn fits(&self, start: usize, len: usize) -> bool {
        let end = start + len;
        end <= self.free.len() && self.saturated[end] == self.saturated[start]
    }

    fn occupy(&mut self, start: usize, len: usize) {
        for free in &mut self.free[start..start + len] {
            *free -= 1;
        }
        self.reindex();
    }

    fn release(&mut self, start: usize, len: usize) {
        for free in &mut self.free[start..start + len] {
            *free += 1;
        }
        self.reindex();
    }
}

/// One level of the branch-and-bound stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Next option index to try; `options.len()` means "untreated".
    next: usize,
    /// Gain accumulated by the choices above this level.
    gain: f64,
}

/// Assigns treatment resources to patients to maximize total survival.
#[derive(Debug, Clone, Default)]
pub struct TriageAllocator {
    config: AllocatorConfig,
}

impl TriageAllocator {
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Runs the allocation.
    ///
    /// Degenerate problems (`total_time == 0`, `responders == 0`, no patients
    /// or no resources) return baseline figures with no assignments.
    ///
    /// # Example
    /// ```
    /// use u_emergency::models::{SurvivalCurve, TreatmentResource};
    /// use u_emergency::triage::{TriageAllocator, TriageProblem};
    ///
    /// let problem = TriageProblem {
    ///     patients: vec![SurvivalCurve::new(vec![40.0, 60.0, 80.0])],
    ///     resources: vec![TreatmentResource::new(1, 20.0)],
    ///     responders: 1,
    ///     total_time: 2,
    /// };
    /// let outcome = TriageAllocator::default().allocate(&problem);
    /// assert_eq!(outcome.assignments.len(), 1);
    /// assert_eq!(outcome.survivors, 1);
    /// ```
    #[instrument(skip_all, fields(
        patients = problem.patients.len(),
        resources = problem.resources.len(),
        responders = problem.responders,
        total_time = problem.total_time,
    ))]
    pub fn allocate(&self, problem: &TriageProblem) -> TriageOutcome {
        let mut assignments = if problem.is_degenerate() {
            debug!("nothing to allocate");
            Vec::new()
        } else {
            let baselines: Vec<f64> = (0..problem.patients.len())
                .map(|p| problem.baseline(p))
                .collect();
            let greedy = self.plan(problem, &baselines);
            self.search(problem, &baselines, greedy)
        };
        assignments.sort_by_key(|t| (t.start, t.patient));
        TriageOutcome::calculate(problem, assignments, self.config.survival_threshold)
    }

    fn plan(&self, problem: &TriageProblem, baselines: &[f64]) -> Vec<Treatment> {
        let patient_count = problem.patients.len();
        let mut timeline = CapacityTimeline::new(problem.responders, problem.total_time);
        let mut treated = vec![false; patient_count];
        let mut assignments = Vec::new();

        while assignments.len() < patient_count {
            let table = build_table(problem, &timeline, &treated, baselines);
            let Some(treatment) = pick_best(problem, &table, &treated, baselines) else {
                break;
            };

            debug!(
                patient = treatment.patient,
                resource = treatment.resource,
                start = treatment.start,
                probability = treatment.probability,
                "treatment committed"
            );
            timeline.occupy(treatment.start, treatment.release - treatment.start);
            treated[treatment.patient] = true;
            assignments.push(treatment);
        }

        assignments
    }

    /// Improves `incumbent` by branch-and-bound within the search budget.
    fn search(
        &self,
        problem: &TriageProblem,
        baselines: &[f64],
        mut incumbent: Vec<Treatment>,
    ) -> Vec<Treatment> {
        let budget = self.config.search_budget;
        if budget == 0 {
            return incumbent;
        }

        let options: Vec<Vec<Treatment>> = (0..problem.patients.len())
            .map(|p| treatment_options(problem, p, baselines[p]))
            .collect();
        let best_gain = |p: usize| options[p].first().map_or(0.0, |t| t.probability - baselines[p]);

        // Patients with nothing to gain never branch.
        let mut order: Vec<usize> = (0..options.len())
            .filter(|&p| !options[p].is_empty())
            .collect();
        order.sort_by(|&a, &b| best_gain(b).total_cmp(&best_gain(a)).then(a.cmp(&b)));

        let mut bound = vec![0.0; order.len() + 1];
        for depth in (0..order.len()).rev() {
            bound[depth] = bound[depth + 1] + best_gain(order[depth]);
        }

        let mut incumbent_gain = plan_gain(&incumbent, baselines);
        let mut timeline = CapacityTimeline::new(problem.responders, problem.total_time);
        let mut chosen: Vec<Option<Treatment>> = Vec::with_capacity(order.len());
        let mut stack = vec![Frame { next: 0, gain: 0.0 }];
        let mut nodes = 0usize;
        let mut exhausted = false;

        while let Some(frame) = stack.last().copied() {
            let depth = stack.len() - 1;

            let descend = if depth == order.len() {
                if frame.gain > incumbent_gain + EPSILON {
                    incumbent = chosen.iter().flatten().copied().collect();
                    incumbent_gain = frame.gain;
                    trace!(gain = incumbent_gain, nodes, "incumbent improved");
                }
                None
            } else if frame.gain + bound[depth] <= incumbent_gain + EPSILON {
                None
            } else {
                let patient_options = &options[order[depth]];
                let mut next = frame.next;
                while next < patient_options.len() {
                    let t = &patient_options[next];
                    if timeline.fits(t.start, t.release - t.start) {
                        break;
                    }
                    next += 1;
                }
                (next <= patient_options.len()).then(|| (next, patient_options.get(next).copied()))
            };

            let Some((next, choice)) = descend else {
                stack.pop();
                if let Some(Some(t)) = chosen.pop() {
                    timeline.release(t.start, t.release - t.start);
                }
                continue;
            };

            if nodes >= budget {
                exhausted = true;
                break;
            }
            nodes += 1;

            stack[depth].next = next + 1;
            let gain = match choice {
                Some(t) => {
                    timeline.occupy(t.start, t.release - t.start);
                    frame.gain + (t.probability - baselines[t.patient])
                }
                None => frame.gain,
            };
            chosen.push(choice);
            stack.push(Frame { next: 0, gain });
        }

        debug!(nodes, exhausted, gain = incumbent_gain, "schedule search finished");
        incumbent
    }
}

/// Total gain of a plan over the untreated baselines.
fn plan_gain(assignments: &[Treatment], baselines: &[f64]) -> f64 {
    assignments
        .iter()
        .map(|t| t.probability - baselines[t.patient])
        .sum()
}

/// Every window that completes inside the horizon and improves on the
/// baseline, best probability first (ties: earliest start, lowest resource).
fn treatment_options(problem: &TriageProblem, patient: usize, baseline: f64) -> Vec<Treatment> {
    let curve = &problem.patients[patient];
    let mut options = Vec::new();

    for (k, resource) in problem.resources.iter().enumerate() {
        for start in 0..problem.total_time {
            let completion = start + resource.duration;
            let release = start + resource.occupancy();
            if completion >= problem.total_time || release > problem.total_time {
                break;
            }
            let probability = resource.apply(curve.at(completion));
            if probability > baseline + EPSILON {
                options.push(Treatment {
                    patient,
                    resource: k,
                    start,
                    completion,
                    release,
                    probability,
                });
            }
        }
    }

    options.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then(a.start.cmp(&b.start))
            .then(a.resource.cmp(&b.resource))
    });
    options
}

/// Fills `dp[t][p]` for untreated patients on the residual capacity.
fn build_table(
    problem: &TriageProblem,
    timeline: &CapacityTimeline,
    treated: &[bool],
    baselines: &[f64],
) -> Vec<Vec<Cell>> {
    let patient_count = problem.patients.len();
    let mut dp: Vec<Vec<Cell>> = Vec::with_capacity(problem.total_time);

    for t in 0..problem.total_time {
        let mut row = Vec::with_capacity(patient_count);
        for p in 0..patient_count {
            let mut cell = match dp.last() {
                Some(previous) => previous[p],
                None => Cell {
                    probability: baselines[p],
                    choice: None,
                },
            };

            if !treated[p] {
                let curve = &problem.patients[p];
                for (k, resource) in problem.resources.iter().enumerate() {
                    if resource.duration > t {
                        continue;
                    }
                    let start = t - resource.duration;
                    if !timeline.fits(start, resource.occupancy()) {
                        continue;
                    }
                    let probability = resource.apply(curve.at(t));
                    if probability > cell.probability + EPSILON {
                        cell = Cell {
                            probability,
                            choice: Some((k, start)),
                        };
                    }
                }
            }

            row.push(cell);
        }
        dp.push(row);
    }

    dp
}

/// Highest-gain untreated patient at the horizon end.
fn pick_best(
    problem: &TriageProblem,
    table: &[Vec<Cell>],
    treated: &[bool],
    baselines: &[f64],
) -> Option<Treatment> {
    let last = table.last()?;
    let mut best: Option<(f64, Treatment)> = None;

    for (p, cell) in last.iter().enumerate() {
        if treated[p] {
            continue;
        }
        let Some((resource, start)) = cell.choice else {
            continue;
        };
        let gain = cell.probability - baselines[p];
        if gain <= EPSILON {
            continue;
        }

        let duration = problem.resources[resource].duration;
        let candidate = Treatment {
            patient: p,
            resource,
            start,
            completion: start + duration,
            release: start + problem.resources[resource].occupancy(),
            probability: cell.probability,
        };
        trace!(patient = p, resource, start, gain, "candidate");

        let better = match &best {
            None => true,
            Some((best_gain, incumbent)) => {
                if (gain - best_gain).abs() > EPSILON {
                    gain > *best_gain
                } else {
                    // Patients are scanned in ascending order, so on equal
                    // resources the incumbent already has the lower index.
                    resource < incumbent.resource
                }
            }
        };
        if better {
            best = Some((gain, candidate));
        }
    }

    best.map(|(_, treatment)| treatment)
}
