//! Assessment configuration.
//!
//! ```toml
//! alpha = 2.0
//! strategy = "oriented"
//! direction = "counterclockwise"
//! predicate = "transforms-to"
//! ```
//!
//! Every key is optional. Reading the file is left to the caller.

use serde::{Deserialize, Serialize};

use crate::cycle::CausalityDirection;
use crate::error::{ConfigError, ConfigResult};
use crate::model::Predicate;

/// Which generator enumerates candidate arrangements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrangementStrategy {
    /// Backtracking over primary positions.
    #[default]
    Diametric,
    /// One orientation choice per pair.
    Oriented,
}

/// Tunables for [`CycleAssessor`](crate::assessor::CycleAssessor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssessmentConfig {
    /// Fidelity exponent in `probability × fidelity^alpha` (default: 1.0).
    pub alpha: f64,
    /// Candidate generator (default: diametric).
    pub strategy: ArrangementStrategy,
    /// Orientation of cycles built from arrangements.
    pub direction: CausalityDirection,
    /// Predicate carried by the edges of built cycles.
    pub predicate: Predicate,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            strategy: ArrangementStrategy::Diametric,
            direction: CausalityDirection::Clockwise,
            predicate: Predicate::Causes,
        }
    }
}

impl AssessmentConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    pub fn with_alpha(mut self, alpha: f64) -> ConfigResult<Self> {
        self.alpha = alpha;
        self.validate()?;
        Ok(self)
    }

    pub fn with_strategy(mut self, strategy: ArrangementStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_direction(mut self, direction: CausalityDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(ConfigError::InvalidAlpha { alpha: self.alpha });
        }
        Ok(())
    }
}
