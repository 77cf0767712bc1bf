//! Nested justifications ("rationales") and their critiques.
//!
//! A rationale is an opinion about its parent. Its own zero fidelity is
//! therefore soft: an unconvincing rationale is dropped from the parent's
//! aggregate instead of vetoing it. The rationale's rating is applied by the
//! parent, never by the rationale itself.

use serde::{Deserialize, Serialize};

use crate::error::DialecticResult;
use crate::scoring::{self, Contribution, Scorable};

use super::{Node, Scores};

/// A scorable justification that may carry child critiques and refer to the
/// secondary nodes it concerns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rationale {
    pub headline: String,
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub scores: Scores,
    /// Child rationales (critiques of this one).
    #[serde(default)]
    pub rationales: Vec<Rationale>,
    /// Secondary nodes this rationale is about.
    #[serde(default)]
    pub concerns: Vec<Node>,
}

impl Rationale {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn concerning(mut self, node: Node) -> Self {
        self.concerns.push(node);
        self
    }
}

score_builders!(Rationale);

impl Scorable for Rationale {
    fn scores(&self) -> &Scores {
        &self.scores
    }

    fn scores_mut(&mut self) -> &mut Scores {
        &mut self.scores
    }

    fn gather_fidelity(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        let mut contributions = scoring::rationale_fidelities(&mut self.rationales, mutate)?;
        for node in &mut self.concerns {
            contributions.push(Contribution::soft(node.fidelity_evidence(mutate)?));
        }
        contributions.push(Contribution::soft(self.scores.contextual_fidelity));
        Ok(scoring::geometric_mean(contributions))
    }

    fn gather_probability(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        if let Some(p) = self.scores.weighted_probability() {
            return Ok(Some(p));
        }
        scoring::rationale_probability(&mut self.rationales, mutate)
    }
}
