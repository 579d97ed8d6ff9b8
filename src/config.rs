use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analyzers::risk::RiskRules;
use crate::analyzers::waves::WavePolicy;
use crate::analyzers::yvs::ScoringWeights;
use crate::error::ConfigError;
use crate::validate::ValidatorSettings;

/// Tunable tables and constants for every analyzer, loaded once at startup.
///
/// Stored as JSON on disk; every section is optional and falls back to its
/// defaults:
/// ```json
/// {
///   "scoring": { "paved": 0.5, "trailers": 0.3, "gates": 0.2 },
///   "risk": { "paper_heavy_above": 12 },
///   "waves": { "facilities_per_week": 4 },
///   "validation": { "review_threshold_m": 750.0 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringWeights,
    pub risk: RiskRules,
    pub waves: WavePolicy,
    pub validation: ValidatorSettings,
}

impl EngineConfig {
    /// Loads and validates the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config '{path}'"))?;
        let config = Self::from_json(&content)?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        self.risk.validate()?;
        self.waves.validate()?;
        self.validation.validate()
    }
}
