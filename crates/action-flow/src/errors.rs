//! Flow execution error types

use thiserror::Error;

/// Flow execution errors
#[derive(Debug, Error)]
pub enum FlowError {
    /// Scenario file could not be read or parsed
    #[error("Scenario load failed: {0}")]
    ScenarioLoad(String),

    /// A recorded step failed validation
    #[error("Step {index} is invalid: {reason}")]
    InvalidStep { index: usize, reason: String },

    /// Cluster analysis could not be configured
    #[error("Recipe analysis error: {0}")]
    RecipeError(String),
}

impl FlowError {
    /// Invalid steps and recipe policies are configuration errors
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FlowError::InvalidStep { .. } | FlowError::RecipeError(_)
        )
    }
}

impl From<replay_recipes::RecError> for FlowError {
    fn from(err: replay_recipes::RecError) -> Self {
        FlowError::RecipeError(err.to_string())
    }
}
