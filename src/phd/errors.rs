//! Error types for the filter
//!
//! Configuration and per-step failures are surfaced as values instead of
//! panics; a failed step leaves the tracked mixture untouched.

use std::fmt;

/// Errors that can occur during configuration or filtering
#[derive(Debug, Clone)]
pub enum FilterError {
    /// Dimension mismatch between expected and actual
    DimensionMismatch {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Context (e.g., "birth component mean", "measurement positions")
        context: String,
    },

    /// Numerical instability detected (non-finite or singular innovation
    /// covariance); the step is aborted
    NumericalInstability {
        /// Description of the issue
        description: String,
    },

    /// Configuration error
    Configuration {
        /// Description of the configuration issue
        description: String,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::DimensionMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            FilterError::NumericalInstability { description } => {
                write!(f, "Numerical instability: {}", description)
            }
            FilterError::Configuration { description } => {
                write!(f, "Configuration error: {}", description)
            }
        }
    }
}

impl std::error::Error for FilterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterError::DimensionMismatch {
            expected: 6,
            actual: 4,
            context: "spawn transition".to_string(),
        };
        assert!(err.to_string().contains("6"));
        assert!(err.to_string().contains("4"));
        assert!(err.to_string().contains("spawn transition"));

        let err = FilterError::NumericalInstability {
            description: "NaN in innovation covariance".to_string(),
        };
        assert!(err.to_string().contains("innovation covariance"));
    }
}
