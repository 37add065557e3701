//! Error types for action execution

use action_locator::LocatorError;
use thiserror::Error;

/// Errors surfaced by an [`ElementDriver`](crate::driver::ElementDriver)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// Lookup did not settle within the bounded wait
    #[error("Lookup timed out after {timeout_ms}ms: {selector}")]
    LookupTimeout { selector: String, timeout_ms: u64 },

    /// Driver could not parse the selector
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Handle no longer refers to a live element
    #[error("Stale element handle: {0}")]
    StaleHandle(String),

    /// Element exists but cannot be clicked or filled
    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    /// Transport or protocol failure
    #[error("Driver I/O error: {0}")]
    Io(String),
}

impl DriverError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DriverError::LookupTimeout { .. } | DriverError::StaleHandle(_) | DriverError::Io(_)
        )
    }

    /// Get error severity level (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            DriverError::Io(_) => 2,
            DriverError::InvalidSelector { .. } | DriverError::NotInteractable(_) => 1,
            DriverError::LookupTimeout { .. } | DriverError::StaleHandle(_) => 0,
        }
    }
}

/// Errors raised while building or loading actions
///
/// Execution itself never fails with an error; it reports an outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Record is missing a field its kind requires
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Candidate list could not produce a locator set
    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// Page snapshot could not be read or parsed
    #[error("Snapshot load failed: {0}")]
    SnapshotLoad(String),

    /// Driver failure outside the candidate walk
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl ActionError {
    /// Configuration errors are fatal for the action and never retried
    pub fn is_configuration(&self) -> bool {
        matches!(self, ActionError::Configuration(_) | ActionError::Locator(_))
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            ActionError::Driver(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Get error severity level (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            ActionError::Configuration(_) => 3,
            ActionError::Locator(err) => err.severity(),
            ActionError::SnapshotLoad(_) => 2,
            ActionError::Driver(err) => err.severity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_errors_are_configuration_errors() {
        let err: ActionError = LocatorError::EmptyCandidates.into();
        assert!(err.is_configuration());
        assert!(!err.is_retryable());
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn driver_timeouts_are_retryable() {
        let err = DriverError::LookupTimeout {
            selector: "#a".into(),
            timeout_ms: 10,
        };
        assert!(err.is_retryable());
        assert_eq!(err.severity(), 0);
        assert!(!DriverError::NotInteractable("#a".into()).is_retryable());
    }
}
