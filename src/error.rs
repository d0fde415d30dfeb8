//! Error types for u-permde.
//!
//! Every fallible operation returns `Result<T, DeError>`.
//! Feasibility violations of a tour are *not* errors; they are reported as
//! [`Violation`](crate::tsp::Violation) values alongside a result.

use thiserror::Error;

/// Unified error type.
#[derive(Debug, Error)]
pub enum DeError {
    /// Invalid configuration (population too small, unknown algorithm, bad
    /// parameter value). Raised before any generation runs.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// The instance text could not be turned into a cost matrix.
    #[error("load error: {message}")]
    Load {
        /// Description of the problem.
        message: String,
    },

    /// The exact sub-solver produced no tour (limit reached without an
    /// incumbent, or the restricted edge set admits no Hamiltonian cycle).
    #[error("solver error: {message}")]
    Solver {
        /// Description of the problem.
        message: String,
    },

    /// File I/O error while reading an instance.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    /// Creates a solver error.
    pub fn solver(message: impl Into<String>) -> Self {
        Self::Solver {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            DeError::config("population_size too small").to_string(),
            "configuration error: population_size too small"
        );
        assert_eq!(
            DeError::load("missing DIMENSION").to_string(),
            "load error: missing DIMENSION"
        );
        assert_eq!(
            DeError::solver("no incumbent").to_string(),
            "solver error: no incumbent"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DeError = io.into();
        assert!(matches!(err, DeError::Io(_)));
    }
}
