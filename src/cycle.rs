//! Closed causal cycles over concept nodes.
//!
//! A [`Cycle`] is built once from an ordered list of nodes and a
//! [`CausalityDirection`]. It is backed by a [`DirectedCycleGraph`] whose
//! single extractable path equals the cycle's ordering; further transitions
//! may be added as enrichment without changing that path.
//!
//! Scoring walks the extracted path:
//!
//! - fidelity: geometric mean of each distinct node's fidelity evidence
//!   (non-positive and unknown values dropped) and the cycle's rated rationales
//! - probability: product of the usable edge probabilities, `None` when no
//!   edge carries one

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decompose::{Decomposition, decompose_probability};
use crate::error::{DialecticResult, ModelError, ModelResult};
use crate::graph::{AliasKey, DirectedCycleGraph};
use crate::model::{Node, Predicate, Rationale, Scores, Transition, score_builders};
use crate::scoring::{self, Contribution, Scorable};

/// Orientation in which a cycle is traversed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CausalityDirection {
    /// Each node leads to the next one in the given order.
    #[default]
    Clockwise,
    /// Each node leads to the previous one in the given order.
    Counterclockwise,
}

impl fmt::Display for CausalityDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CausalityDirection::Clockwise => write!(f, "clockwise"),
            CausalityDirection::Counterclockwise => write!(f, "counterclockwise"),
        }
    }
}

/// A closed, ordered causal loop with its own scores and explanations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cycle {
    /// Node aliases in traversal order.
    ordering: Vec<String>,
    /// Source aliases of the first path transition; the path is extracted from here.
    start: AliasKey,
    pub causality_direction: CausalityDirection,
    /// Why this ordering is causally plausible.
    #[serde(default)]
    pub reasoning_explanation: String,
    /// Supporting argument drawn from the source text.
    #[serde(default)]
    pub argumentation: String,
    #[serde(flatten)]
    pub scores: Scores,
    #[serde(default)]
    pub rationales: Vec<Rationale>,
    graph: DirectedCycleGraph,
}

impl Cycle {
    /// Build a cycle linking `nodes` in `direction`.
    ///
    /// `Clockwise` links `n[i] -> n[i+1]`, `Counterclockwise` links
    /// `n[i] -> n[i-1]`; the last transition closes the loop.
    pub fn new(
        nodes: Vec<Node>,
        direction: CausalityDirection,
        predicate: Predicate,
    ) -> ModelResult<Self> {
        if nodes.is_empty() {
            return Err(ModelError::EmptyCycle);
        }
        {
            let mut seen = HashSet::new();
            if let Some(dup) = nodes.iter().find(|n| !seen.insert(n.alias.as_str())) {
                return Err(ModelError::DuplicateAlias {
                    alias: dup.alias.clone(),
                });
            }
        }

        let mut traversal = nodes;
        if direction == CausalityDirection::Counterclockwise {
            traversal[1..].reverse();
        }

        let mut graph = DirectedCycleGraph::new();
        for (i, source) in traversal.iter().enumerate() {
            let target = &traversal[(i + 1) % traversal.len()];
            graph.add_edge(Transition::new(source.clone(), target.clone(), predicate)?);
        }

        Ok(Self {
            start: vec![traversal[0].alias.clone()],
            ordering: traversal.into_iter().map(|n| n.alias).collect(),
            causality_direction: direction,
            reasoning_explanation: String::new(),
            argumentation: String::new(),
            scores: Scores::default(),
            rationales: Vec::new(),
            graph,
        })
    }

    /// Adopt an externally built graph; the ordering is read off its first path.
    pub fn from_graph(graph: DirectedCycleGraph, direction: CausalityDirection) -> DialecticResult<Self> {
        let (start, ordering) = {
            let path = graph.first_path()?;
            let start = path
                .first()
                .map(|e| e.source_aliases.clone())
                .unwrap_or_default();
            let ordering: Vec<String> = path
                .iter()
                .flat_map(|e| e.source_aliases.iter().cloned())
                .collect();
            (start, ordering)
        };
        Ok(Self {
            ordering,
            start,
            causality_direction: direction,
            reasoning_explanation: String::new(),
            argumentation: String::new(),
            scores: Scores::default(),
            rationales: Vec::new(),
            graph,
        })
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.reasoning_explanation = explanation.into();
        self
    }

    pub fn with_argumentation(mut self, argumentation: impl Into<String>) -> Self {
        self.argumentation = argumentation.into();
        self
    }

    /// Node aliases in traversal order.
    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    pub fn graph(&self) -> &DirectedCycleGraph {
        &self.graph
    }

    /// Mutable access to the backing graph, e.g. to score a single transition.
    pub fn graph_mut(&mut self) -> &mut DirectedCycleGraph {
        &mut self.graph
    }

    /// Add or merge an enrichment transition; the extracted path is unchanged
    /// unless the transition lies on it.
    pub fn add_transition(&mut self, transition: Transition) {
        self.graph.add_edge(transition);
    }

    /// Transitions of the cycle in traversal order.
    pub fn path(&self) -> DialecticResult<Vec<&Transition>> {
        Ok(match self.start() {
            Some(start) => self.graph.first_path_from(start)?,
            None => self.graph.first_path()?,
        })
    }

    /// Alias tuple the path starts from.
    pub fn start_aliases(&self) -> &[String] {
        &self.start
    }

    /// Spread an externally judged cycle probability over the path edges.
    pub fn decompose_probability(
        &mut self,
        probability: f64,
        overwrite: bool,
    ) -> DialecticResult<Decomposition> {
        let start = self.start();
        let edges = self.graph.first_path_mut(start)?;
        Ok(decompose_probability(probability, edges, overwrite))
    }

    fn start(&self) -> Option<AliasKey> {
        (!self.start.is_empty()).then(|| self.start.clone())
    }
}

score_builders!(Cycle);

impl Scorable for Cycle {
    fn scores(&self) -> &Scores {
        &self.scores
    }

    fn scores_mut(&mut self) -> &mut Scores {
        &mut self.scores
    }

    fn gather_fidelity(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        let mut contributions = scoring::rationale_fidelities(&mut self.rationales, mutate)?;

        let start = self.start();
        let mut seen = HashSet::new();
        for edge in self.graph.first_path_mut(start)? {
            let Transition { source, target, .. } = edge;
            for node in source.nodes_mut().into_iter().chain(target.nodes_mut()) {
                let evidence = node.fidelity_evidence(mutate)?;
                if seen.insert(node.alias.clone()) {
                    contributions.push(Contribution::soft(evidence));
                }
            }
        }

        Ok(scoring::geometric_mean(contributions))
    }

    fn gather_probability(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        let start = self.start();
        let mut product: Option<f64> = None;
        for edge in self.graph.first_path_mut(start)? {
            if let Some(p) = edge.probability(mutate)?.filter(|p| *p > 0.0) {
                product = Some(product.unwrap_or(1.0) * p);
            }
        }
        Ok(product)
    }
}
