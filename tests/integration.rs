//! End-to-end tests for dialectic-core.
//!
//! These exercise the public API the way a host application would: build
//! candidate cycles from thesis/antithesis pairs, hand probabilities down to
//! edges, score, and exchange the result as JSON.

use dialectic_core::assessor::CycleAssessor;
use dialectic_core::config::{ArrangementStrategy, AssessmentConfig};
use dialectic_core::cycle::{CausalityDirection, Cycle};
use dialectic_core::decompose::Decomposition;
use dialectic_core::error::{DialecticError, GraphError, ModelError};
use dialectic_core::graph::DirectedCycleGraph;
use dialectic_core::model::{Node, Predicate, Rationale, Segment, Slot, Transition};
use dialectic_core::scoring::Scorable;
use miette::Diagnostic;

fn wheel_pairs() -> Vec<(Node, Node)> {
    vec![
        (
            Node::new("T1", "Discipline").with_fidelity(0.9),
            Node::new("A1", "Spontaneity").with_fidelity(0.8),
        ),
        (
            Node::new("T2", "Planning").with_fidelity(0.7),
            Node::new("A2", "Improvisation").with_fidelity(0.9),
        ),
        (
            Node::new("T3", "Caution").with_fidelity(0.6),
            Node::new("A3", "Risk").with_fidelity(0.8),
        ),
    ]
}

#[test]
fn end_to_end_candidates_decompose_assess() {
    let config = AssessmentConfig::from_toml_str("alpha = 1.5\nstrategy = \"diametric\"").unwrap();
    let assessor = CycleAssessor::new(config).unwrap();

    let mut cycles = assessor.candidate_cycles(&wheel_pairs()).unwrap();
    assert_eq!(cycles.len(), 4);

    for cycle in &mut cycles {
        assert_eq!(cycle.path().unwrap().len(), 6);
        assert_eq!(
            cycle.decompose_probability(0.42, false).unwrap(),
            Decomposition::Uniform
        );

        let assessment = assessor.assess(cycle).unwrap();
        let p = assessment.probability.unwrap();
        assert!((p - 0.42).abs() < 1e-9, "probability round trip, got {p}");

        let expected_fidelity = (0.9f64 * 0.8 * 0.7 * 0.9 * 0.6 * 0.8).powf(1.0 / 6.0);
        assert!((assessment.contextual_fidelity - expected_fidelity).abs() < 1e-9);
        let score = assessment.score.unwrap();
        assert!((score - 0.42 * expected_fidelity.powf(1.5)).abs() < 1e-9);
    }
}

#[test]
fn oriented_candidates_are_distinct_cycles() {
    let assessor = CycleAssessor::new(
        AssessmentConfig::default().with_strategy(ArrangementStrategy::Oriented),
    )
    .unwrap();
    let cycles = assessor.candidate_cycles(&wheel_pairs()).unwrap();
    let orderings: Vec<Vec<String>> = cycles.iter().map(|c| c.ordering().to_vec()).collect();
    assert_eq!(orderings.len(), 4);
    for (i, a) in orderings.iter().enumerate() {
        for b in &orderings[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn pre_assigned_edge_keeps_its_value() {
    let assessor = CycleAssessor::default();
    let mut cycle = assessor
        .build_cycle(vec![
            Node::new("T1", "a"),
            Node::new("T2", "b"),
            Node::new("A1", "c"),
            Node::new("A2", "d"),
        ])
        .unwrap();
    cycle
        .graph_mut()
        .get_edge_mut("T1", "T2")
        .unwrap()
        .scores
        .probability = Some(0.5);

    assert_eq!(
        cycle.decompose_probability(0.1, false).unwrap(),
        Decomposition::Remainder
    );
    assert_eq!(cycle.graph().get_edge("T1", "T2").unwrap().scores.probability, Some(0.5));
    let p = cycle.probability(false).unwrap().unwrap();
    assert!((p - 0.1).abs() < 1e-9);
}

#[test]
fn zero_rated_node_is_dropped_at_cycle_level() {
    let mut cycle = Cycle::new(
        vec![
            Node::new("T1", "a").with_fidelity(0.64),
            Node::new("A1", "b").with_fidelity(0.9).with_rating(0.0),
        ],
        CausalityDirection::Clockwise,
        Predicate::Causes,
    )
    .unwrap();

    // The node itself is vetoed...
    let mut vetoed = Node::new("A1", "b").with_fidelity(0.9).with_rating(0.0);
    assert_eq!(vetoed.contextual_fidelity(false).unwrap(), 0.0);
    // ...but the cycle only averages nodes with positive evidence.
    let f = cycle.contextual_fidelity(true).unwrap();
    assert!((f - 0.64).abs() < 1e-12, "got {f}");
    assert_eq!(cycle.scores.calculated_contextual_fidelity, Some(f));
}

#[test]
fn segment_cycle_from_graph() {
    let thesis = Segment::new()
        .with(Slot::Thesis, Node::new("T1", "Discipline").with_fidelity(0.81))
        .with(Slot::ThesisPositive, Node::new("T1+", "Reliability"))
        .with(Slot::ThesisNegative, Node::new("T1-", "Rigidity"));
    let antithesis = Segment::new()
        .with(Slot::Antithesis, Node::new("A1", "Spontaneity"))
        .with(Slot::AntithesisPositive, Node::new("A1+", "Creativity"));

    let mut graph = DirectedCycleGraph::new();
    graph.add_edge(
        Transition::with_aliases(thesis.clone(), ["T1-"], antithesis.clone(), ["A1+"], Predicate::TransformsTo)
            .unwrap()
            .with_probability(0.6),
    );
    graph.add_edge(
        Transition::with_aliases(antithesis, ["A1+"], thesis, ["T1-"], Predicate::TransformsTo)
            .unwrap()
            .with_rationale(Rationale::new("creativity restores structure").with_probability(0.5)),
    );

    let mut cycle = Cycle::from_graph(graph, CausalityDirection::Clockwise).unwrap();
    assert_eq!(cycle.ordering(), ["T1-", "A1+"]);

    let p = cycle.probability(false).unwrap().unwrap();
    assert!((p - 0.3).abs() < 1e-12, "got {p}");
    let f = cycle.contextual_fidelity(false).unwrap();
    assert!((f - 0.81).abs() < 1e-12, "only T1 carries fidelity, got {f}");
}

#[test]
fn cycle_json_roundtrip() {
    let mut cycle = Cycle::new(
        vec![Node::new("T1", "a").with_fidelity(0.5), Node::new("A1", "b")],
        CausalityDirection::Counterclockwise,
        Predicate::ConstructivelyConvergesTo,
    )
    .unwrap()
    .with_explanation("each pole feeds the other")
    .with_argumentation("observed in both directions");
    cycle.decompose_probability(0.25, false).unwrap();
    cycle.score(1.0, true).unwrap();

    let json = serde_json::to_string(&cycle).unwrap();
    let mut back: Cycle = serde_json::from_str(&json).unwrap();
    assert_eq!(back.ordering(), cycle.ordering());
    assert_eq!(back.causality_direction, CausalityDirection::Counterclockwise);
    assert_eq!(back.reasoning_explanation, "each pole feeds the other");
    assert_eq!(back.scores, cycle.scores);
    assert_eq!(back.score(1.0, false).unwrap(), cycle.scores.score);
}

#[test]
fn errors_carry_diagnostic_codes() {
    let err = Cycle::new(
        vec![Node::new("T1", "a"), Node::new("T1", "b")],
        CausalityDirection::Clockwise,
        Predicate::Causes,
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateAlias { ref alias } if alias == "T1"));
    assert_eq!(
        err.code().map(|c| c.to_string()).as_deref(),
        Some("dialectic::model::duplicate_alias")
    );

    let err = Cycle::from_graph(DirectedCycleGraph::new(), CausalityDirection::Clockwise).unwrap_err();
    assert!(matches!(err, DialecticError::Graph(GraphError::EmptyGraph)));
    assert!(err.code().is_some(), "transparent wrapper forwards the code");
}
