//! Search configuration

use crate::board::Side;
use crate::error::ConfigError;
use crate::eval::Heuristics;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for the automated player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Side the engine plays (maximizes for)
    pub side: Side,
    /// Depth D0: iterations up to this depth always run to completion
    pub min_depth: u32,
    /// Optional cap on iterative deepening
    pub max_depth: Option<u32>,
    /// Wall-clock budget in milliseconds
    pub time_budget_ms: u64,
    /// Material weights for leaf evaluation
    pub heuristics: Heuristics,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            side: Side::Far,
            min_depth: 5,
            max_depth: None,
            time_budget_ms: 10_300,
            heuristics: Heuristics::default(),
        }
    }
}

impl SearchConfig {
    /// Config for `side` with a fixed depth range and no time pressure below it
    pub fn fixed_depth(side: Side, depth: u32) -> Self {
        Self {
            side,
            min_depth: depth,
            max_depth: Some(depth),
            ..Default::default()
        }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_min_depth(mut self, depth: u32) -> Self {
        self.min_depth = depth;
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = budget.as_millis() as u64;
        self
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_depth == 0 {
            return Err(ConfigError::Invalid("min_depth must be at least 1".into()));
        }
        if let Some(max) = self.max_depth {
            if max < self.min_depth {
                return Err(ConfigError::Invalid(format!(
                    "max_depth {} is below min_depth {}",
                    max, self.min_depth
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: SearchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.side, Side::Far);
        assert_eq!(config.min_depth, 5);
        assert_eq!(config.max_depth, None);
        assert_eq!(config.time_budget(), Duration::from_millis(10_300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"side":"Near","min_depth":3}"#).unwrap();
        assert_eq!(config.side, Side::Near);
        assert_eq!(config.min_depth, 3);
        assert_eq!(config.time_budget_ms, 10_300);
    }

    #[test]
    fn test_validate_rejects_inverted_depths() {
        let config = SearchConfig::default().with_min_depth(4).with_max_depth(2);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(SearchConfig::default().with_min_depth(0).validate().is_err());
    }

    #[test]
    fn test_fixed_depth() {
        let config = SearchConfig::fixed_depth(Side::Near, 3);
        assert_eq!(config.min_depth, 3);
        assert_eq!(config.max_depth, Some(3));
    }
}
