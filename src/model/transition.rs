//! Directed, predicate-tagged transitions between endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{DialecticResult, ModelError, ModelResult};
use crate::graph::{AliasKey, EdgeKey};
use crate::scoring::{self, Contribution, Scorable};

use super::{AliasSet, Endpoint, Predicate, Rationale, Scores};

/// A directed relationship from a set of source aliases to a set of target
/// aliases, each drawn from the declared source and target endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub source: Endpoint,
    pub target: Endpoint,
    pub source_aliases: AliasKey,
    pub target_aliases: AliasKey,
    pub predicate: Predicate,
    #[serde(flatten)]
    pub scores: Scores,
    #[serde(default)]
    pub rationales: Vec<Rationale>,
}

impl Transition {
    /// Transition covering every alias of both endpoints.
    pub fn new(
        source: impl Into<Endpoint>,
        target: impl Into<Endpoint>,
        predicate: Predicate,
    ) -> ModelResult<Self> {
        let source = source.into();
        let target = target.into();
        let source_aliases = source.aliases();
        let target_aliases = target.aliases();
        Self::with_aliases(source, source_aliases, target, target_aliases, predicate)
    }

    /// Transition restricted to the given aliases of each endpoint.
    ///
    /// Fails if an alias is not declared by its endpoint or a side is empty.
    pub fn with_aliases(
        source: impl Into<Endpoint>,
        source_aliases: impl AliasSet,
        target: impl Into<Endpoint>,
        target_aliases: impl AliasSet,
        predicate: Predicate,
    ) -> ModelResult<Self> {
        let transition = Self {
            source: source.into(),
            target: target.into(),
            source_aliases: source_aliases.aliases(),
            target_aliases: target_aliases.aliases(),
            predicate,
            scores: Scores::default(),
            rationales: Vec::new(),
        };
        transition.validate()?;
        Ok(transition)
    }

    /// Check alias membership and score ranges, e.g. after deserialization.
    pub fn validate(&self) -> ModelResult<()> {
        for (role, endpoint, aliases) in [
            ("source", &self.source, &self.source_aliases),
            ("target", &self.target, &self.target_aliases),
        ] {
            if aliases.is_empty() {
                return Err(ModelError::EmptyAliases { role: role.into() });
            }
            if let Some(alias) = aliases.iter().find(|a| !endpoint.declares(a)) {
                return Err(ModelError::UnknownAlias {
                    alias: alias.clone(),
                    role: role.into(),
                });
            }
        }
        self.scores.validate()
    }

    /// The graph key `(source_aliases, target_aliases)`.
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source_aliases.clone(), self.target_aliases.clone())
    }

    /// Fold a newer record for the same key into this one.
    ///
    /// Score fields follow newer-non-null-wins and the predicate takes the
    /// newer value. Endpoints merge node by node, so values set on the older
    /// nodes survive a newer record that leaves them unset. Rationales
    /// accumulate.
    pub fn merge(&mut self, newer: Transition) {
        self.scores.merge(&newer.scores);
        self.predicate = newer.predicate;
        self.source.merge(newer.source);
        self.target.merge(newer.target);
        self.rationales.extend(newer.rationales);
    }
}

score_builders!(Transition);

impl Scorable for Transition {
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
