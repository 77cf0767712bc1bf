//! Arena-backed directed graph of transitions with single-cycle extraction.
//!
//! Transitions live in an insertion-ordered arena. A key index maps each
//! [`EdgeKey`] to its arena slot and an outbound index maps each source alias
//! set to the slots leaving it. Path extraction always prefers the earliest
//! inserted unused transition, so enrichment edges added after the canonical
//! cycle never change the extracted path.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult, ModelError};
use crate::model::{AliasSet, Transition};

use super::{AliasKey, EdgeKey, display_aliases};

/// Unordered alias set used to match a frontier against transition sources.
type AliasGroup = BTreeSet<String>;

fn group(aliases: &[String]) -> AliasGroup {
    aliases.iter().cloned().collect()
}

/// Directed graph of transitions, unique by [`EdgeKey`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Transition>", into = "Vec<Transition>")]
pub struct DirectedCycleGraph {
    /// Transitions in insertion order.
    edges: Vec<Transition>,
    /// EdgeKey → arena slot.
    index: HashMap<EdgeKey, usize>,
    /// Source alias set → arena slots of outbound transitions, in insertion order.
    outbound: HashMap<AliasGroup, Vec<usize>>,
}

impl DirectedCycleGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a transition, merging into the existing record when its key is
    /// already present.
    pub fn add_edge(&mut self, edge: Transition) {
        let key = edge.key();
        if let Some(&slot) = self.index.get(&key) {
            tracing::debug!(%key, "merging transition into existing edge");
            self.edges[slot].merge(edge);
            return;
        }

        let slot = self.edges.len();
        self.outbound
            .entry(group(&key.source))
            .or_default()
            .push(slot);
        self.index.insert(key, slot);
        self.edges.push(edge);
    }

    /// Look up the transition from `source` to `target`.
    pub fn get_edge(&self, source: impl AliasSet, target: impl AliasSet) -> Option<&Transition> {
        let key = EdgeKey::new(source.aliases(), target.aliases());
        self.index.get(&key).map(|&slot| &self.edges[slot])
    }

    /// Mutable variant of [`DirectedCycleGraph::get_edge`].
    pub fn get_edge_mut(
        &mut self,
        source: impl AliasSet,
        target: impl AliasSet,
    ) -> Option<&mut Transition> {
        let key = EdgeKey::new(source.aliases(), target.aliases());
        let slot = *self.index.get(&key)?;
        self.edges.get_mut(slot)
    }

    /// All transitions in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Transition> {
        self.edges.iter()
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of distinct aliases referenced by any transition.
    pub fn node_count(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|e| e.source_aliases.iter().chain(e.target_aliases.iter()))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Extract the closed path starting at the source of the first inserted
    /// transition.
    pub fn first_path(&self) -> GraphResult<Vec<&Transition>> {
        let slots = self.path_slots(None)?;
        Ok(slots.into_iter().map(|slot| &self.edges[slot]).collect())
    }

    /// Extract the closed path that starts and ends at `start`.
    pub fn first_path_from(&self, start: impl AliasSet) -> GraphResult<Vec<&Transition>> {
        let slots = self.path_slots(Some(start.aliases()))?;
        Ok(slots.into_iter().map(|slot| &self.edges[slot]).collect())
    }

    /// Keys of the closed path from `start` (or the default start).
    pub fn first_path_keys(&self, start: Option<AliasKey>) -> GraphResult<Vec<EdgeKey>> {
        let slots = self.path_slots(start)?;
        Ok(slots.into_iter().map(|slot| self.edges[slot].key()).collect())
    }

    /// Mutable access to the transitions of the closed path, in path order.
    pub fn first_path_mut(&mut self, start: Option<AliasKey>) -> GraphResult<Vec<&mut Transition>> {
        let slots = self.path_slots(start)?;
        let mut arena: Vec<Option<&mut Transition>> = self.edges.iter_mut().map(Some).collect();
        // A path never revisits a slot, so every take() succeeds.
        Ok(slots
            .into_iter()
            .filter_map(|slot| arena[slot].take())
            .collect())
    }

    /// Source alias tuples of every transition leaving `start`'s node set.
    ///
    /// A graph may hold several independent loops; each of these tuples is a
    /// valid argument to [`DirectedCycleGraph::first_path_from`] when it lies on one.
    pub fn outbound_entry_points(&self, start: impl AliasSet) -> BTreeSet<AliasKey> {
        let members = group(&start.aliases());
        self.edges
            .iter()
            .filter(|e| e.source_aliases.iter().all(|a| members.contains(a)))
            .map(|e| e.source_aliases.clone())
            .collect()
    }

    /// Walk from `start` along the earliest inserted unused outbound
    /// transition until the frontier returns to `start`.
    fn path_slots(&self, start: Option<AliasKey>) -> GraphResult<Vec<usize>> {
        let start = match start {
            Some(start) => start,
            None => self
                .edges
                .first()
                .map(|e| e.source_aliases.clone())
                .ok_or(GraphError::EmptyGraph)?,
        };
        let origin = group(&start);
        let max_steps = self.node_count();

        let mut path = Vec::new();
        let mut used = HashSet::new();
        let mut frontier = origin.clone();

        loop {
            let next = self
                .outbound
                .get(&frontier)
                .and_then(|slots| slots.iter().copied().find(|slot| !used.contains(slot)));

            let Some(slot) = next else {
                return Err(if path.is_empty() {
                    GraphError::NoOutboundEdge {
                        start: display_aliases(&start),
                    }
                } else {
                    GraphError::UnclosedPath {
                        start: display_aliases(&start),
                        steps: path.len(),
                    }
                });
            };

            used.insert(slot);
            path.push(slot);
            frontier = group(&self.edges[slot].target_aliases);

            if frontier == origin {
                tracing::debug!(start = %display_aliases(&start), len = path.len(), "extracted path");
                return Ok(path);
            }
            if path.len() >= max_steps {
                return Err(GraphError::UnclosedPath {
                    start: display_aliases(&start),
                    steps: path.len(),
                });
            }
        }
    }
}

impl TryFrom<Vec<Transition>> for DirectedCycleGraph {
    type Error = ModelError;

    fn try_from(edges: Vec<Transition>) -> Result<Self, Self::Error> {
        let mut graph = Self::new();
        for edge in edges {
            edge.validate()?;
            graph.add_edge(edge);
        }
        Ok(graph)
    }
}

impl From<DirectedCycleGraph> for Vec<Transition> {
    fn from(graph: DirectedCycleGraph) -> Self {
        graph.edges
    }
}
