//! Error types for solver operations.

use kf_core::KfError;
use thiserror::Error;

/// Errors that can occur while solving a nonlinear system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    /// The residual callback failed; the message comes from the system.
    #[error("Residual evaluation failed: {what}")]
    Evaluation { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    /// The iteration stopped without meeting the tolerances.
    ///
    /// `last_iterate` is the best point reached; it is not a solution.
    #[error("Did not converge after {iterations} iterations (residual norm {residual_norm:.3e})")]
    NotConverged {
        iterations: usize,
        residual_norm: f64,
        last_iterate: Vec<f64>,
    },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for KfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { what } => KfError::InvalidArg { what },
            SolverError::Evaluation { what } | SolverError::Numeric { what } => {
                KfError::Invariant { what }
            }
            err @ SolverError::NotConverged { .. } => KfError::NotConverged {
                what: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_converged_display() {
        let err = SolverError::NotConverged {
            iterations: 1,
            residual_norm: 12.5,
            last_iterate: vec![1.0, 2.0],
        };
        let msg = err.to_string();
        assert!(msg.contains("1 iterations"));
        assert!(msg.contains("1.250e1"));
    }

    #[test]
    fn converts_to_kf_not_converged() {
        let err = SolverError::NotConverged {
            iterations: 3,
            residual_norm: 1.0,
            last_iterate: vec![],
        };
        assert!(matches!(KfError::from(err), KfError::NotConverged { .. }));
    }
}
