use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid rules: {0}")]
    Invalid(String),
}

/// Largest hand the solver searches at interactive speed
pub const MAX_HAND_SIZE: usize = 6;

/// Table rules. Every field is optional in a rules file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Face-up enemies kept on the table
    pub enemy_row_size: usize,
    /// Cards dealt to the hand alongside the anchor
    pub opening_draw: usize,
    /// Kings that must fall for a win (at most the three non-anchor kings)
    pub kings_to_win: u8,
    /// Largest value multiset the solver searches
    pub solver_value_limit: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            enemy_row_size: 4,
            opening_draw: 4,
            kings_to_win: 3,
            solver_value_limit: crate::solver::DEFAULT_VALUE_LIMIT,
        }
    }
}

impl RulesConfig {
    /// Load and validate rules from a JSON file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let rules: RulesConfig = serde_json::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Hand size between turns: the anchor plus the opening draw
    pub fn hand_size(&self) -> usize {
        self.opening_draw + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=8).contains(&self.enemy_row_size) {
            return Err(ConfigError::Invalid(format!(
                "enemy_row_size must be between 1 and 8, got {}",
                self.enemy_row_size
            )));
        }
        if !(1..MAX_HAND_SIZE).contains(&self.opening_draw) {
            return Err(ConfigError::Invalid(format!(
                "opening_draw must be between 1 and {}, got {}",
                MAX_HAND_SIZE - 1,
                self.opening_draw
            )));
        }
        if !(1..=3).contains(&self.kings_to_win) {
            return Err(ConfigError::Invalid(format!(
                "kings_to_win must be between 1 and 3, got {}",
                self.kings_to_win
            )));
        }
        if self.solver_value_limit < self.hand_size() || self.solver_value_limit > MAX_HAND_SIZE {
            return Err(ConfigError::Invalid(format!(
                "solver_value_limit must cover the hand ({}) and be at most {}, got {}",
                self.hand_size(),
                MAX_HAND_SIZE,
                self.solver_value_limit
            )));
        }
        Ok(())
    }
}
