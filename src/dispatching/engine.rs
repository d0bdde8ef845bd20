//! Rule engine for multi-criteria candidate ranking.
//!
//! Applies dispatching rules in sequence: a later rule is consulted only when
//! every earlier rule scores two candidates within `epsilon`. A final
//! tie-breaker keeps the ranking total and reproducible.

use std::sync::Arc;

use super::{Candidate, DispatchContext, DispatchingRule, RuleScore};

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Default)]
pub enum TieBreaker {
    /// Leave tied candidates in input order.
    InputOrder,
    /// Deterministic by candidate ID (lexicographic).
    #[default]
    ById,
}

/// A composable rule engine for candidate prioritization.
///
/// # Example
/// ```
/// use u_emergency::dispatching::{Candidate, DispatchContext, RuleEngine};
/// use u_emergency::dispatching::rules;
/// use u_emergency::models::Severity;
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::TravelTime)
///     .with_tie_breaker(rules::LifeSupportFirst);
///
/// let candidates = vec![Candidate::new("B", 7.0), Candidate::new("A", 7.0)];
/// let ctx = DispatchContext::with_severity(Severity::Critical);
/// assert_eq!(engine.select_best(&candidates, &ctx), Some(1));
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine with id tie-breaking.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::ById,
            epsilon: 1e-9,
        }
    }

    /// Adds a primary rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds a tie-breaking rule, consulted after all previously added rules.
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_rule(rule)
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Sets the score equality tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts candidates by priority (highest priority first).
    ///
    /// Returns indices into the original slice. The sort is stable.
    pub fn sort_indices(&self, candidates: &[Candidate], context: &DispatchContext) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..candidates.len()).collect();
        indices.sort_by(|&a, &b| self.compare(&candidates[a], &candidates[b], context));
        indices
    }

    /// Returns the index of the highest-priority candidate.
    pub fn select_best(&self, candidates: &[Candidate], context: &DispatchContext) -> Option<usize> {
        (0..candidates.len()).min_by(|&a, &b| self.compare(&candidates[a], &candidates[b], context))
    }

    /// Scores from each rule for one candidate.
    pub fn evaluate(&self, candidate: &Candidate, context: &DispatchContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|rule| rule.evaluate(candidate, context))
            .collect()
    }

    fn compare(
        &self,
        a: &Candidate,
        b: &Candidate,
        context: &DispatchContext,
    ) -> std::cmp::Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a, context);
            let score_b = rule.evaluate(b, context);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a
                    .partial_cmp(&score_b)
                    .unwrap_or(std::cmp::Ordering::Equal);
            }
        }

        match &self.tie_breaker {
            TieBreaker::InputOrder => std::cmp::Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::{CapacityTier, Severity, ADVANCED_LIFE_SUPPORT};

    fn critical() -> DispatchContext {
        DispatchContext::with_severity(Severity::Critical)
    }

    #[test]
    fn test_travel_ordering() {
        let candidates = vec![
            Candidate::new("far", 30.0),
            Candidate::new("near", 5.0),
            Candidate::new("mid", 12.0),
        ];
        let engine = RuleEngine::new().with_rule(rules::TravelTime);

        let indices = engine.sort_indices(&candidates, &critical());
        assert_eq!(candidates[indices[0]].id, "near");
        assert_eq!(candidates[indices[1]].id, "mid");
        assert_eq!(candidates[indices[2]].id, "far");
    }

    #[test]
    fn test_sequential_with_tie_breaker() {
        let candidates = vec![
            Candidate::new("A1", 10.0),
            Candidate::new("A2", 10.0).with_capability(ADVANCED_LIFE_SUPPORT),
        ];
        let engine = RuleEngine::new()
            .with_rule(rules::TravelTime)
            .with_tie_breaker(rules::LifeSupportFirst);

        // Travel ties → ALS breaks it → A2 despite the larger id
        assert_eq!(engine.select_best(&candidates, &critical()), Some(1));
    }

    #[test]
    fn test_by_id_tie_breaker() {
        let candidates = vec![Candidate::new("B", 10.0), Candidate::new("A", 10.0)];
        let engine = RuleEngine::new().with_rule(rules::TravelTime);

        let indices = engine.sort_indices(&candidates, &critical());
        assert_eq!(candidates[indices[0]].id, "A");
    }

    #[test]
    fn test_input_order_tie_breaker() {
        let candidates = vec![Candidate::new("B", 10.0), Candidate::new("A", 10.0)];
        let engine = RuleEngine::new()
            .with_rule(rules::TravelTime)
            .with_final_tie_breaker(TieBreaker::InputOrder);

        assert_eq!(engine.select_best(&candidates, &critical()), Some(0));
    }

    #[test]
    fn test_primary_rule_dominates_tie_breakers() {
        let candidates = vec![
            Candidate::new("H1", 10.0).with_capacity_tier(CapacityTier::High),
            Candidate::new("H2", 9.0).with_capacity_tier(CapacityTier::Low),
        ];
        let engine = RuleEngine::new()
            .with_rule(rules::TravelTime)
            .with_tie_breaker(rules::CapacityTier);

        assert_eq!(engine.select_best(&candidates, &critical()), Some(1));
    }

    #[test]
    fn test_epsilon_widens_ties() {
        let candidates = vec![Candidate::new("B", 10.0), Candidate::new("A", 10.4)];

        let strict = RuleEngine::new().with_rule(rules::TravelTime);
        assert_eq!(strict.select_best(&candidates, &critical()), Some(0));

        // Within tolerance the travel times tie and the id decides.
        let loose = RuleEngine::new()
            .with_rule(rules::TravelTime)
            .with_epsilon(0.5);
        assert_eq!(loose.select_best(&candidates, &critical()), Some(1));
    }

    #[test]
    fn test_empty_candidates() {
        let engine = RuleEngine::new().with_rule(rules::TravelTime);
        assert!(engine.sort_indices(&[], &critical()).is_empty());
        assert!(engine.select_best(&[], &critical()).is_none());
    }

    #[test]
    fn test_evaluate_scores() {
        let candidate = Candidate::new("H1", 14.0).with_capacity_tier(CapacityTier::Medium);
        let engine = RuleEngine::new()
            .with_rule(rules::TravelTime)
            .with_rule(rules::CapacityTier);

        let scores = engine.evaluate(&candidate, &critical());
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 14.0).abs() < 1e-10);
        assert!((scores[1] + 2.0).abs() < 1e-10);
        assert_eq!(engine.rule_names(), vec!["TRAVEL", "CAPACITY"]);
    }
}
