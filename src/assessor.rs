//! Config-driven entry point tying the generators, cycles and scoring together.

use serde::{Deserialize, Serialize};

use crate::combinatorics::{diametric_arrangements, oriented_arrangements};
use crate::config::{ArrangementStrategy, AssessmentConfig};
use crate::cycle::Cycle;
use crate::error::{DialecticResult, ModelResult};
use crate::model::Node;
use crate::scoring::Scorable;

/// Scores computed for one cycle by [`CycleAssessor::assess`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub probability: Option<f64>,
    pub contextual_fidelity: f64,
    pub score: Option<f64>,
}

/// Enumerates candidate cycles and scores them under one [`AssessmentConfig`].
#[derive(Debug, Clone, Default)]
pub struct CycleAssessor {
    config: AssessmentConfig,
}

impl CycleAssessor {
    /// Create an assessor after validating `config`.
    pub fn new(config: AssessmentConfig) -> DialecticResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Candidate arrangements of `pairs` from the configured generator.
    pub fn candidates<T: Clone>(&self, pairs: &[(T, T)]) -> Vec<Vec<T>> {
        match self.config.strategy {
            ArrangementStrategy::Diametric => diametric_arrangements(pairs),
            ArrangementStrategy::Oriented => oriented_arrangements(pairs),
        }
    }

    /// Build a cycle over `nodes` with the configured direction and predicate.
    pub fn build_cycle(&self, nodes: Vec<Node>) -> ModelResult<Cycle> {
        Cycle::new(nodes, self.config.direction, self.config.predicate)
    }

    /// One cycle per candidate arrangement of thesis/antithesis node pairs.
    pub fn candidate_cycles(&self, pairs: &[(Node, Node)]) -> ModelResult<Vec<Cycle>> {
        let cycles = self
            .candidates(pairs)
            .into_iter()
            .map(|arrangement| self.build_cycle(arrangement))
            .collect::<ModelResult<Vec<_>>>()?;
        tracing::debug!(
            pairs = pairs.len(),
            cycles = cycles.len(),
            strategy = ?self.config.strategy,
            "built candidate cycles"
        );
        Ok(cycles)
    }

    /// Score `cycle` with the configured alpha, recording every computed value
    /// on the cycle and its path.
    pub fn assess(&self, cycle: &mut Cycle) -> DialecticResult<Assessment> {
        let score = cycle.score(self.config.alpha, true)?;
        let assessment = Assessment {
            probability: cycle.scores.calculated_probability,
            contextual_fidelity: cycle
                .scores
                .calculated_contextual_fidelity
                .unwrap_or(crate::scoring::NEUTRAL_FIDELITY),
            score,
        };
        tracing::debug!(ordering = ?cycle.ordering(), ?assessment, "assessed cycle");
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::CausalityDirection;
    use crate::error::{ConfigError, DialecticError};

    fn node_pairs(n: usize) -> Vec<(Node, Node)> {
        (1..=n)
            .map(|i| {
                (
                    Node::new(format!("T{i}"), format!("thesis {i}")).with_fidelity(0.9),
                    Node::new(format!("A{i}"), format!("antithesis {i}")).with_fidelity(0.8),
                )
            })
            .collect()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AssessmentConfig {
            alpha: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            CycleAssessor::new(config),
            Err(DialecticError::Config(ConfigError::InvalidAlpha { .. }))
        ));
    }

    #[test]
    fn candidates_follow_strategy() {
        let pairs = [("T1", "A1"), ("T2", "A2"), ("T3", "A3")];
        let diametric = CycleAssessor::default().candidates(&pairs);
        let oriented = CycleAssessor::new(
            AssessmentConfig::default().with_strategy(ArrangementStrategy::Oriented),
        )
        .unwrap()
        .candidates(&pairs);
        assert_eq!(diametric.len(), 4);
        assert_eq!(oriented.len(), 4);
        assert_eq!(oriented[1], vec!["T1", "A2", "T3", "A1", "T2", "A3"]);
    }

    #[test]
    fn candidate_cycles_use_configured_direction() {
        let assessor = CycleAssessor::new(
            AssessmentConfig::default().with_direction(CausalityDirection::Counterclockwise),
        )
        .unwrap();
        let cycles = assessor.candidate_cycles(&node_pairs(2)).unwrap();
        assert_eq!(cycles.len(), 2);
        // Natural order T1 T2 A1 A2, traversed backwards from T1.
        assert_eq!(cycles[0].ordering(), ["T1", "A2", "A1", "T2"]);
    }

    #[test]
    fn assess_records_scores() {
        let assessor = CycleAssessor::new(AssessmentConfig::default().with_alpha(2.0).unwrap()).unwrap();
        let mut cycle = assessor
            .build_cycle(vec![
                Node::new("T1", "a").with_fidelity(0.8),
                Node::new("A1", "b").with_fidelity(0.8),
            ])
            .unwrap();
        cycle.decompose_probability(0.6, false).unwrap();

        let assessment = assessor.assess(&mut cycle).unwrap();
        assert!((assessment.probability.unwrap() - 0.6).abs() < 1e-9);
        assert!((assessment.contextual_fidelity - 0.8).abs() < 1e-9);
        assert!((assessment.score.unwrap() - 0.384).abs() < 1e-9);
        assert_eq!(cycle.scores.score, assessment.score);
        assert_eq!(assessor.assess(&mut cycle).unwrap(), assessment);
    }

    #[test]
    fn assess_without_probability_has_no_score() {
        let assessor = CycleAssessor::default();
        let mut cycle = assessor
            .build_cycle(vec![Node::new("T1", "a"), Node::new("A1", "b")])
            .unwrap();
        let assessment = assessor.assess(&mut cycle).unwrap();
        assert_eq!(assessment.probability, None);
        assert_eq!(assessment.contextual_fidelity, 1.0);
        assert_eq!(assessment.score, None);
    }
}
