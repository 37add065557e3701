//! Error types for the locator system

use thiserror::Error;

/// Locator error enumeration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// The caller did not supply a candidate list at all
    #[error("Configuration error: no candidate list supplied")]
    MissingCandidates,

    /// Every candidate was empty or whitespace
    #[error("Configuration error: candidate list is empty after normalization")]
    EmptyCandidates,

    /// Every remaining candidate was an icon selector
    #[error("Configuration error: all {count} candidate(s) are icon selectors: {selectors}")]
    OnlyIconCandidates { count: usize, selectors: String },
}

impl LocatorError {
    /// Locator errors describe bad input, so none of them are worth retrying
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            LocatorError::MissingCandidates => 3,
            LocatorError::EmptyCandidates | LocatorError::OnlyIconCandidates { .. } => 2,
        }
    }
}
