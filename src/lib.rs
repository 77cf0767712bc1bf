// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # dialectic-core
//!
//! Scoring and arrangement core for dialectical wheels: concept nodes linked
//! into closed causal cycles, scored by probability and contextual fidelity.
//!
//! ## Architecture
//!
//! - **Model** (`model`): nodes, slot segments, rationales and transitions
//! - **Scoring** (`scoring`): safe geometric mean and the `Scorable` trait
//! - **Graph** (`graph`): directed transition graph with closed-path extraction
//! - **Cycles** (`cycle`, `decompose`): ordered loops and probability decomposition
//! - **Arrangements** (`combinatorics`): diametric layouts of thesis/antithesis pairs
//! - **Assessment** (`config`, `assessor`): config-driven candidate scoring
//!
//! ## Library usage
//!
//! ```no_run
//! use dialectic_core::assessor::CycleAssessor;
//! use dialectic_core::config::AssessmentConfig;
//! use dialectic_core::model::Node;
//!
//! let config = AssessmentConfig::from_toml_str("alpha = 2.0").unwrap();
//! let assessor = CycleAssessor::new(config).unwrap();
//! let pairs = vec![
//!     (Node::new("T1", "Order").with_fidelity(0.9), Node::new("A1", "Chaos")),
//!     (Node::new("T2", "Growth"), Node::new("A2", "Decay").with_fidelity(0.7)),
//! ];
//! for mut cycle in assessor.candidate_cycles(&pairs).unwrap() {
//!     cycle.decompose_probability(0.5, false).unwrap();
//!     let assessment = assessor.assess(&mut cycle).unwrap();
//!     println!("{:?}: {:?}", cycle.ordering(), assessment.score);
//! }
//! ```

pub mod assessor;
pub mod combinatorics;
pub mod config;
pub mod cycle;
pub mod decompose;
pub mod error;
pub mod graph;
pub mod model;
pub mod scoring;
