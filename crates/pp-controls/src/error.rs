//! Error types for controller operations.

use pp_core::CoreError;
use thiserror::Error;

/// Result type for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring a controller.
///
/// Updates never fail; only limit changes and configuration loading do.
#[derive(Debug, Error)]
pub enum ControlError {
    /// A `(min, max)` pair with `min > max`.
    #[error("Invalid range for {what}: min {min} is greater than max {max}")]
    InvalidRange {
        what: &'static str,
        min: f64,
        max: f64,
    },

    /// A configuration value failed numeric validation.
    #[error("Invalid configuration value: {0}")]
    Core(#[from] CoreError),

    /// A configuration document could not be parsed or written.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
