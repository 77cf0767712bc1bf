//! Concept nodes, slot-keyed segments and transition endpoints.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DialecticResult;
use crate::graph::AliasKey;
use crate::scoring::{self, Contribution, Scorable};

use super::{Rationale, Scores};

// ---------------------------------------------------------------------------
// AliasSet
// ---------------------------------------------------------------------------

/// Anything that resolves to an ordered list of node aliases.
///
/// Lets graph lookups accept plain alias lists and node references alike.
pub trait AliasSet {
    fn aliases(&self) -> AliasKey;
}

impl AliasSet for str {
    fn aliases(&self) -> AliasKey {
        vec![self.to_string()]
    }
}

impl AliasSet for String {
    fn aliases(&self) -> AliasKey {
        vec![self.clone()]
    }
}

impl<S: AsRef<str>> AliasSet for [S] {
    fn aliases(&self) -> AliasKey {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> AliasSet for [S; N] {
    fn aliases(&self) -> AliasKey {
        self.as_slice().aliases()
    }
}

impl<S: AsRef<str>> AliasSet for Vec<S> {
    fn aliases(&self) -> AliasKey {
        self.as_slice().aliases()
    }
}

impl<T: AliasSet + ?Sized> AliasSet for &T {
    fn aliases(&self) -> AliasKey {
        (**self).aliases()
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A leaf concept discovered in the input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier, unique within a graph.
    pub alias: String,
    pub statement: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(flatten)]
    pub scores: Scores,
    #[serde(default)]
    pub rationales: Vec<Rationale>,
}

impl Node {
    pub fn new(alias: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            statement: statement.into(),
            explanation: String::new(),
            scores: Scores::default(),
            rationales: Vec::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Fold a newer record of the same node into this one.
    ///
    /// Scores follow newer-non-null-wins, non-empty text replaces the old
    /// text, rationales accumulate.
    pub fn merge(&mut self, newer: Node) {
        self.scores.merge(&newer.scores);
        if !newer.statement.is_empty() {
            self.statement = newer.statement;
        }
        if !newer.explanation.is_empty() {
            self.explanation = newer.explanation;
        }
        self.rationales.extend(newer.rationales);
    }
}

score_builders!(Node);

impl AliasSet for Node {
    fn aliases(&self) -> AliasKey {
        vec![self.alias.clone()]
    }
}

impl Scorable for Node {
    fn scores(&self) -> &Scores {
        &self.scores
    }

    fn scores_mut(&mut self) -> &mut Scores {
        &mut self.scores
    }

    fn gather_fidelity(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        let mut contributions = scoring::rationale_fidelities(&mut self.rationales, mutate)?;
        contributions.push(Contribution::veto(self.scores.rated_fidelity()));
        Ok(scoring::geometric_mean(contributions))
    }

    fn gather_probability(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        if let Some(p) = self.scores.weighted_probability() {
            return Ok(Some(p));
        }
        scoring::rationale_probability(&mut self.rationales, mutate)
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// Canonical position of a node inside a dialectical segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "T")]
    Thesis,
    #[serde(rename = "T+")]
    ThesisPositive,
    #[serde(rename = "T-")]
    ThesisNegative,
    #[serde(rename = "A")]
    Antithesis,
    #[serde(rename = "A+")]
    AntithesisPositive,
    #[serde(rename = "A-")]
    AntithesisNegative,
}

impl Slot {
    /// The slot diametrically opposed to this one (T <-> A, T+ <-> A-, T- <-> A+).
    pub fn opposite(self) -> Slot {
        match self {
            Slot::Thesis => Slot::Antithesis,
            Slot::ThesisPositive => Slot::AntithesisNegative,
            Slot::ThesisNegative => Slot::AntithesisPositive,
            Slot::Antithesis => Slot::Thesis,
            Slot::AntithesisPositive => Slot::ThesisNegative,
            Slot::AntithesisNegative => Slot::ThesisPositive,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Thesis => write!(f, "T"),
            Slot::ThesisPositive => write!(f, "T+"),
            Slot::ThesisNegative => write!(f, "T-"),
            Slot::Antithesis => write!(f, "A"),
            Slot::AntithesisPositive => write!(f, "A+"),
            Slot::AntithesisNegative => write!(f, "A-"),
        }
    }
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A group of nodes keyed by canonical slot, e.g. a thesis with its poles.
///
/// Lookup is by [`Slot`]; each node's alias is display metadata and is only
/// used to match transition aliases against the segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub components: BTreeMap<Slot, Node>,
    #[serde(flatten)]
    pub scores: Scores,
    #[serde(default)]
    pub rationales: Vec<Rationale>,
}

impl Segment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `node` in `slot`, replacing any previous occupant.
    pub fn with(mut self, slot: Slot, node: Node) -> Self {
        self.components.insert(slot, node);
        self
    }

    pub fn get(&self, slot: Slot) -> Option<&Node> {
        self.components.get(&slot)
    }

    pub fn node_by_alias(&self, alias: &str) -> Option<&Node> {
        self.components.values().find(|n| n.alias == alias)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.components.values()
    }

    /// Fold a newer record of the same segment into this one, node by node.
    ///
    /// A newer node merges into the old node with the same alias wherever it
    /// sits; a node with an unknown alias takes its slot outright.
    pub fn merge(&mut self, newer: Segment) {
        self.scores.merge(&newer.scores);
        self.rationales.extend(newer.rationales);
        for (slot, node) in newer.components {
            match self.components.values_mut().find(|n| n.alias == node.alias) {
                Some(existing) => existing.merge(node),
                None => {
                    self.components.insert(slot, node);
                }
            }
        }
    }
}

score_builders!(Segment);

impl AliasSet for Segment {
    fn aliases(&self) -> AliasKey {
        self.components.values().map(|n| n.alias.clone()).collect()
    }
}

impl Scorable for Segment {
    fn scores(&self) -> &Scores {
        &self.scores
    }

    fn scores_mut(&mut self) -> &mut Scores {
        &mut self.scores
    }

    /// Rated rationales, then every constituent node (a vetoed node vetoes the
    /// segment), then the segment's own rated fidelity.
    fn gather_fidelity(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        let mut contributions = scoring::rationale_fidelities(&mut self.rationales, mutate)?;
        for node in self.components.values_mut() {
            contributions.push(Contribution::veto(node.fidelity_evidence(mutate)?));
        }
        contributions.push(Contribution::veto(self.scores.rated_fidelity()));
        Ok(scoring::geometric_mean(contributions))
    }

    fn gather_probability(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        if let Some(p) = self.scores.weighted_probability() {
            return Ok(Some(p));
        }
        scoring::rationale_probability(&mut self.rationales, mutate)
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// One side of a transition: a single node or a whole segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Node(Node),
    Segment(Segment),
}

impl Endpoint {
    /// Whether `alias` names one of this endpoint's nodes.
    pub fn declares(&self, alias: &str) -> bool {
        match self {
            Endpoint::Node(node) => node.alias == alias,
            Endpoint::Segment(segment) => segment.node_by_alias(alias).is_some(),
        }
    }

    pub fn nodes(&self) -> Vec<&Node> {
        match self {
            Endpoint::Node(node) => vec![node],
            Endpoint::Segment(segment) => segment.nodes().collect(),
        }
    }

    pub fn nodes_mut(&mut self) -> Vec<&mut Node> {
        match self {
            Endpoint::Node(node) => vec![node],
            Endpoint::Segment(segment) => segment.components.values_mut().collect(),
        }
    }

    /// Fold a newer record of the same endpoint into this one.
    ///
    /// Nodes are matched by alias and merged; a newer node whose alias the old
    /// endpoint lacks is taken as is. When the newer record changes the shape
    /// (node vs segment), the newer shape wins but keeps the old nodes' values.
    pub fn merge(&mut self, newer: Endpoint) {
        match (&mut *self, newer) {
            (Endpoint::Node(old), Endpoint::Node(new)) if old.alias == new.alias => old.merge(new),
            (Endpoint::Segment(old), Endpoint::Segment(new)) => old.merge(new),
            (current, mut new) => {
                for node in new.nodes_mut() {
                    if let Some(old) = current.nodes().into_iter().find(|n| n.alias == node.alias) {
                        let mut merged = old.clone();
                        merged.merge(node.clone());
                        *node = merged;
                    }
                }
                *current = new;
            }
        }
    }
}

impl AliasSet for Endpoint {
    fn aliases(&self) -> AliasKey {
        match self {
            Endpoint::Node(node) => node.aliases(),
            Endpoint::Segment(segment) => segment.aliases(),
        }
    }
}

impl From<Node> for Endpoint {
    fn from(node: Node) -> Self {
        Endpoint::Node(node)
    }
}

impl From<Segment> for Endpoint {
    fn from(segment: Segment) -> Self {
        Endpoint::Segment(segment)
    }
}
