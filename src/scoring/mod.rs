//! Scoring algebra shared by every scorable entity.
//!
//! Aggregation is a "safe" geometric mean over partially known values:
//!
//! 1. `None` (unknown) is always dropped, never read as zero.
//! 2. A zero at a [`ZeroPolicy::Veto`] leaf forces the whole aggregate to `0.0`.
//! 3. A zero at a [`ZeroPolicy::Ignore`] leaf is dropped like `None`.
//! 4. Nothing left means "no evidence": [`geometric_mean`] returns `None` and
//!    the public fidelity accessor falls back to [`NEUTRAL_FIDELITY`].
//! 5. Otherwise the result is `exp(mean(ln x))`.
//!
//! The [`Scorable`] trait wires this into nodes, segments, transitions,
//! rationales and cycles without any shared state between them.

use crate::error::DialecticResult;
use crate::model::{Rationale, Scores};

/// Fidelity reported when an entity carries no fidelity evidence at all.
pub const NEUTRAL_FIDELITY: f64 = 1.0;

// ---------------------------------------------------------------------------
// Contributions
// ---------------------------------------------------------------------------

/// What a zero contributed at a given leaf means to the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// Zero signals structural impossibility and vetoes the aggregate.
    Veto,
    /// Zero is an unconvincing opinion and is dropped.
    Ignore,
}

/// One candidate value for an aggregate, tagged with its zero policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub value: Option<f64>,
    pub policy: ZeroPolicy,
}

impl Contribution {
    /// A contribution whose zero vetoes the aggregate.
    pub fn veto(value: Option<f64>) -> Self {
        Self {
            value,
            policy: ZeroPolicy::Veto,
        }
    }

    /// A contribution whose zero is dropped.
    pub fn soft(value: Option<f64>) -> Self {
        Self {
            value,
            policy: ZeroPolicy::Ignore,
        }
    }
}

/// Safe geometric mean of partially known values.
///
/// Returns `None` when every contribution was filtered out, `Some(0.0)` when a
/// veto leaf contributed zero. NaN is treated as unknown.
pub fn geometric_mean<I>(contributions: I) -> Option<f64>
where
    I: IntoIterator<Item = Contribution>,
{
    let mut log_sum = 0.0;
    let mut count = 0usize;

    for contribution in contributions {
        let Some(value) = contribution.value else {
            continue;
        };
        if value.is_nan() {
            continue;
        }
        if value <= 0.0 {
            match contribution.policy {
                ZeroPolicy::Veto => return Some(0.0),
                ZeroPolicy::Ignore => continue,
            }
        }
        log_sum += value.ln();
        count += 1;
    }

    (count > 0).then(|| (log_sum / count as f64).exp())
}

/// `probability × fidelity^alpha`, or `None` when the probability is unknown.
pub fn combine_score(probability: Option<f64>, fidelity: f64, alpha: f64) -> Option<f64> {
    probability.map(|p| p * fidelity.powf(alpha))
}

// ---------------------------------------------------------------------------
// Scorable
// ---------------------------------------------------------------------------

/// Capability shared by every entity that carries probability and fidelity.
///
/// Implementors supply the two `gather_*` methods; the provided methods add
/// the neutral default and the opt-in recording of computed values. With
/// `mutate = true` only the `calculated_*` and `score` fields of [`Scores`]
/// are written, so repeated calls on unchanged inputs return identical results.
pub trait Scorable {
    fn scores(&self) -> &Scores;

    fn scores_mut(&mut self) -> &mut Scores;

    /// Fidelity evidence of this entity, `None` when there is none.
    fn gather_fidelity(&mut self, mutate: bool) -> DialecticResult<Option<f64>>;

    /// Probability of this entity, `None` when no informative signal exists.
    fn gather_probability(&mut self, mutate: bool) -> DialecticResult<Option<f64>>;

    /// Like [`Scorable::contextual_fidelity`] but keeps "no evidence" visible
    /// as `None` so a parent can decide how to treat it.
    fn fidelity_evidence(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        let evidence = self.gather_fidelity(mutate)?;
        if mutate {
            self.scores_mut().calculated_contextual_fidelity =
                Some(evidence.unwrap_or(NEUTRAL_FIDELITY));
        }
        Ok(evidence)
    }

    /// Aggregated contextual fidelity; [`NEUTRAL_FIDELITY`] without evidence.
    fn contextual_fidelity(&mut self, mutate: bool) -> DialecticResult<f64> {
        Ok(self
            .fidelity_evidence(mutate)?
            .unwrap_or(NEUTRAL_FIDELITY))
    }

    /// Aggregated probability; `None` means unknown.
    fn probability(&mut self, mutate: bool) -> DialecticResult<Option<f64>> {
        let probability = self.gather_probability(mutate)?;
        if mutate {
            self.scores_mut().calculated_probability = probability;
        }
        Ok(probability)
    }

    /// Recompute probability and fidelity and combine them as
    /// `probability × fidelity^alpha`.
    fn score(&mut self, alpha: f64, mutate: bool) -> DialecticResult<Option<f64>> {
        let probability = self.probability(mutate)?;
        let fidelity = self.contextual_fidelity(mutate)?;
        let score = combine_score(probability, fidelity, alpha);
        if mutate {
            self.scores_mut().score = score;
        }
        Ok(score)
    }
}

/// Fidelity contributions of child rationales: each rationale's evidence
/// times its rating, applied here and nowhere else.
pub(crate) fn rationale_fidelities(
    rationales: &mut [Rationale],
    mutate: bool,
) -> DialecticResult<Vec<Contribution>> {
    rationales
        .iter_mut()
        .map(|r| {
            let evidence = r.fidelity_evidence(mutate)?;
            let rating = r.scores.rating.unwrap_or(1.0);
            Ok(Contribution::soft(evidence.map(|e| e * rating)))
        })
        .collect()
}

/// Geometric mean of the usable probabilities of child rationales.
pub(crate) fn rationale_probability(
    rationales: &mut [Rationale],
    mutate: bool,
) -> DialecticResult<Option<f64>> {
    let mut contributions = Vec::with_capacity(rationales.len());
    for rationale in rationales.iter_mut() {
        contributions.push(Contribution::soft(rationale.probability(mutate)?));
    }
    Ok(geometric_mean(contributions))
}
