use thiserror::Error;

/// Errors produced by the engine.
///
/// Every variant is a caller programming error and fails fast; data-quality
/// outcomes (no positive-EV side, empty candidate pools) are ordinary return
/// values, never errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// A parameter violates a structural precondition: zero trial count,
    /// non-positive standard deviation, correlation outside [-1, 1],
    /// decimal odds at or below 1.0, American odds of 0, or a malformed
    /// configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration(msg.into())
    }
}
