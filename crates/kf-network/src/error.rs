//! Error types for network models.

use kf_components::ComponentError;
use kf_core::KfError;
use kf_graph::GraphError;
use kf_solver::SolverError;
use thiserror::Error;

/// Errors raised while building, validating or solving a network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Topology error: {0}")]
    Graph(#[from] GraphError),

    #[error("Element error: {0}")]
    Component(#[from] ComponentError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// A named element, node or loop does not exist.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// The network cannot be solved as described.
    #[error("Invalid network: {what}")]
    Invalid { what: String },
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl NetworkError {
    /// The solver stopped before converging. The network holds the last iterate.
    pub fn is_not_converged(&self) -> bool {
        matches!(self, NetworkError::Solver(SolverError::NotConverged { .. }))
    }

    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        NetworkError::Invalid { what: what.into() }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        NetworkError::NotFound { what: what.into() }
    }
}

impl From<NetworkError> for KfError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::Graph(e) => e.into(),
            NetworkError::Component(e) => e.into(),
            NetworkError::Solver(e) => e.into(),
            NetworkError::NotFound { what } => KfError::NotFound { what },
            NetworkError::Invalid { what } => KfError::InvalidArg { what },
        }
    }
}
