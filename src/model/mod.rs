//! Data model: concept nodes, justifications and transitions between them.
//!
//! Everything here is plain data handed over by the discovery step. The only
//! mutation the core performs afterwards is writing computed scores, which
//! live in separate fields of [`Scores`] so manual inputs are never overwritten.
//!
//! - [`Node`]: leaf concept with a stable alias
//! - [`Segment`]: slot-keyed group of nodes (thesis with its poles, ...)
//! - [`Rationale`]: nested justification attached to any scorable entity
//! - [`Transition`]: directed, predicate-tagged relationship between endpoints

/// Builder helpers shared by every entity that embeds [`Scores`].
macro_rules! score_builders {
    ($ty:ty) => {
        impl $ty {
            /// Set the manual contextual fidelity (clamped to [0, 1]).
            pub fn with_fidelity(mut self, fidelity: f64) -> Self {
                self.scores.contextual_fidelity = Some($crate::model::clamp_unit(fidelity));
                self
            }

            /// Set the manual probability (clamped to [0, 1]).
            pub fn with_probability(mut self, probability: f64) -> Self {
                self.scores.probability = Some($crate::model::clamp_unit(probability));
                self
            }

            /// Set the rating (clamped to [0, 1]).
            pub fn with_rating(mut self, rating: f64) -> Self {
                self.scores.rating = Some($crate::model::clamp_unit(rating));
                self
            }

            /// Set the confidence (clamped to [0, 1]).
            pub fn with_confidence(mut self, confidence: f64) -> Self {
                self.scores.confidence = Some($crate::model::clamp_unit(confidence));
                self
            }

            /// Attach a justification.
            pub fn with_rationale(mut self, rationale: $crate::model::Rationale) -> Self {
                self.rationales.push(rationale);
                self
            }
        }
    };
}

/// Clamp a score input into [0, 1]; non-finite input becomes 0.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub(crate) use score_builders;

pub mod node;
pub mod rationale;
pub mod transition;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

pub use node::{AliasSet, Endpoint, Node, Segment, Slot};
pub use rationale::Rationale;
pub use transition::Transition;

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Manual score inputs and computed score outputs of a scorable entity.
///
/// `None` always means "unknown", which is distinct from `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Manually assessed grounding in the source context.
    #[serde(default)]
    pub contextual_fidelity: Option<f64>,
    /// Manually assessed probability.
    #[serde(default)]
    pub probability: Option<f64>,
    /// Weight applied to this entity's fidelity when it is aggregated.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Weight applied to this entity's probability.
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Last fidelity written by a mutating computation.
    #[serde(default)]
    pub calculated_contextual_fidelity: Option<f64>,
    /// Last probability written by a mutating computation.
    #[serde(default)]
    pub calculated_probability: Option<f64>,
    /// Last score written by a mutating computation.
    #[serde(default)]
    pub score: Option<f64>,
}

impl Scores {
    /// Check that every manual field is unset or a finite value in [0, 1].
    pub fn validate(&self) -> ModelResult<()> {
        for (field, value) in [
            ("contextual_fidelity", self.contextual_fidelity),
            ("probability", self.probability),
            ("rating", self.rating),
            ("confidence", self.confidence),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                    return Err(ModelError::OutOfRange {
                        field: field.to_string(),
                        value: v,
                    });
                }
            }
        }
        Ok(())
    }

    /// Merge `newer` into `self`: newer non-null values win, old values survive
    /// where the newer record left a field unset.
    pub fn merge(&mut self, newer: &Scores) {
        fn take(slot: &mut Option<f64>, newer: Option<f64>) {
            if newer.is_some() {
                *slot = newer;
            }
        }
        take(&mut self.contextual_fidelity, newer.contextual_fidelity);
        take(&mut self.probability, newer.probability);
        take(&mut self.rating, newer.rating);
        take(&mut self.confidence, newer.confidence);
        take(
            &mut self.calculated_contextual_fidelity,
            newer.calculated_contextual_fidelity,
        );
        take(&mut self.calculated_probability, newer.calculated_probability);
        take(&mut self.score, newer.score);
    }

    /// Manual fidelity weighted by the entity's own rating (unset rating = 1.0).
    pub(crate) fn rated_fidelity(&self) -> Option<f64> {
        self.contextual_fidelity
            .map(|f| f * self.rating.unwrap_or(1.0))
    }

    /// Manual probability weighted by confidence (unset confidence = 1.0).
    pub(crate) fn weighted_probability(&self) -> Option<f64> {
        self.probability.map(|p| p * self.confidence.unwrap_or(1.0))
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// The relationship a transition asserts between its endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Predicate {
    /// The source brings about the target.
    #[default]
    Causes,
    /// The source turns into the target.
    TransformsTo,
    /// The source converges constructively towards the target.
    ConstructivelyConvergesTo,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Causes => write!(f, "causes"),
            Predicate::TransformsTo => write!(f, "transforms-to"),
            Predicate::ConstructivelyConvergesTo => write!(f, "constructively-converges-to"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_newer_non_null_values() {
        let mut old = Scores {
            probability: Some(0.4),
            rating: Some(0.9),
            ..Default::default()
        };
        let newer = Scores {
            probability: Some(0.7),
            confidence: Some(0.5),
            ..Default::default()
        };
        old.merge(&newer);

        assert_eq!(old.probability, Some(0.7));
        assert_eq!(old.rating, Some(0.9), "unset newer field must keep old value");
        assert_eq!(old.confidence, Some(0.5));
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let scores = Scores {
            probability: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(
            scores.validate(),
            Err(ModelError::OutOfRange { ref field, .. }) if field == "probability"
        ));
        assert!(Scores::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_nan() {
        let scores = Scores {
            rating: Some(f64::NAN),
            ..Default::default()
        };
        assert!(scores.validate().is_err());
    }

    #[test]
    fn predicate_display_and_serde() {
        assert_eq!(Predicate::TransformsTo.to_string(), "transforms-to");
        let json = serde_json::to_string(&Predicate::ConstructivelyConvergesTo).unwrap();
        assert_eq!(json, "\"constructively-converges-to\"");
    }
}
