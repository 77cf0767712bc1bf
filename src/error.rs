//! Rich diagnostic error types for dialectic-core.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know exactly which structural
//! rule was broken and how to repair the input.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for dialectic-core.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum DialecticError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("alias '{alias}' is not declared by the {role} endpoint")]
    #[diagnostic(
        code(dialectic::model::unknown_alias),
        help(
            "Every alias listed on a transition must belong to the node or segment \
             it is attached to. Check the alias spelling, or attach the node that \
             carries it to the endpoint."
        )
    )]
    UnknownAlias { alias: String, role: String },

    #[error("transition has no {role} aliases")]
    #[diagnostic(
        code(dialectic::model::empty_aliases),
        help("A transition needs at least one alias on each side to be keyed in a graph.")
    )]
    EmptyAliases { role: String },

    #[error("a cycle needs at least one node")]
    #[diagnostic(
        code(dialectic::model::empty_cycle),
        help("Build the cycle from a non-empty, ordered list of nodes.")
    )]
    EmptyCycle,

    #[error("alias '{alias}' appears more than once in the cycle ordering")]
    #[diagnostic(
        code(dialectic::model::duplicate_alias),
        help(
            "A cycle visits every node exactly once before closing. \
             Remove the repeated node or give it a distinct alias."
        )
    )]
    DuplicateAlias { alias: String },

    #[error("{field} must lie in [0, 1], got {value}")]
    #[diagnostic(
        code(dialectic::model::out_of_range),
        help("Score fields are either unset (unknown) or a finite value between 0 and 1.")
    )]
    OutOfRange { field: String, value: f64 },
}

/// Result type for model construction.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("no path: nothing leaves {start}")]
    #[diagnostic(
        code(dialectic::graph::no_outbound_edge),
        help(
            "The requested start has no outbound transition. \
             Use `outbound_entry_points` to list the valid starts of this graph."
        )
    )]
    NoOutboundEdge { start: String },

    #[error("no path: traversal from {start} did not close within {steps} steps")]
    #[diagnostic(
        code(dialectic::graph::unclosed_path),
        help(
            "The transitions reachable from the start never lead back to it. \
             The graph is either disconnected or holds an open chain rather than a cycle."
        )
    )]
    UnclosedPath { start: String, steps: usize },

    #[error("no path: the graph holds no transitions")]
    #[diagnostic(
        code(dialectic::graph::empty),
        help("Add at least one transition before extracting a path.")
    )]
    EmptyGraph,
}

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to parse assessment config: {message}")]
    #[diagnostic(
        code(dialectic::config::parse),
        help("Check the TOML syntax; known keys are alpha, strategy, direction and predicate.")
    )]
    Parse { message: String },

    #[error("alpha must be finite and non-negative, got {alpha}")]
    #[diagnostic(
        code(dialectic::config::invalid_alpha),
        help("`alpha` is the exponent applied to contextual fidelity; 0 ignores fidelity entirely.")
    )]
    InvalidAlpha { alpha: f64 },
}

/// Result type for configuration parsing.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Convenience alias used across the crate.
pub type DialecticResult<T> = std::result::Result<T, DialecticError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_converts_into_top_level() {
        let err: DialecticError = GraphError::EmptyGraph.into();
        assert!(matches!(err, DialecticError::Graph(GraphError::EmptyGraph)));
        assert!(err.to_string().contains("no path"));
    }

    #[test]
    fn unknown_alias_names_the_role() {
        let err = ModelError::UnknownAlias {
            alias: "T9".into(),
            role: "source".into(),
        };
        assert_eq!(
            err.to_string(),
            "alias 'T9' is not declared by the source endpoint"
        );
    }
}
