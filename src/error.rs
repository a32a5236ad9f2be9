//! Error types for diagnostic marker generation

use thiserror::Error;

/// Errors raised while building or delivering marker batches
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VisError {
    /// Path lookup outside of the path bounds
    #[error("path index {index} out of range for path of length {len}")]
    InvalidIndex { index: usize, len: usize },

    /// A configuration parameter failed validation
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The sink could not deliver the markers
    #[error("marker delivery failed: {0}")]
    Delivery(String),
}

impl VisError {
    pub(crate) fn invalid_parameter(name: &str, reason: &str) -> Self {
        VisError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
