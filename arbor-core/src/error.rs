//! Error types for value generation.

use thiserror::Error;

/// Main error type for generator construction and generation.
///
/// Misconfiguration is reported when a generator is built. Empty domains and
/// exhausted retries are reported by the first `generate` call that hits them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArborError {
    /// The domain has no values to generate from.
    #[error("Empty domain: {reason}")]
    EmptyDomain { reason: String },

    /// A constraint could not be met within the retry budget.
    #[error(
        "Unsatisfiable constraint: {constraint} (attempted size {attempted_size}, {attempts} attempts)"
    )]
    UnsatisfiableConstraint {
        constraint: String,
        attempted_size: usize,
        attempts: usize,
    },

    /// Malformed bounds or parameters.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ArborError {
    pub fn empty_domain(reason: impl Into<String>) -> Self {
        ArborError::EmptyDomain {
            reason: reason.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ArborError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Result type for Arbor operations.
pub type Result<T> = std::result::Result<T, ArborError>;
