//! Directed cycle graphs: transitions keyed by ordered alias tuples.
//!
//! - [`EdgeKey`]: `(source_aliases, target_aliases)`, the identity of a transition
//! - [`DirectedCycleGraph`]: arena of transitions with a key index and an
//!   outbound index, supporting merge-on-insert and closed-path extraction

pub mod cycle_graph;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use cycle_graph::DirectedCycleGraph;

/// Ordered list of node aliases.
pub type AliasKey = Vec<String>;

/// Identity of a transition inside a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: AliasKey,
    pub target: AliasKey,
}

impl EdgeKey {
    pub fn new(source: AliasKey, target: AliasKey) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", display_aliases(&self.source), display_aliases(&self.target))
    }
}

/// Render an alias list as `(T1, T1+)`.
pub(crate) fn display_aliases(aliases: &[String]) -> String {
    format!("({})", aliases.join(", "))
}
