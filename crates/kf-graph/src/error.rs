//! Topology-specific error types.

use kf_core::KfError;

pub type GraphResult<T> = Result<T, GraphError>;

/// Topology construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge was requested from a node to itself.
    SelfLoop { node: String },

    /// Two edges join the same pair of nodes.
    DuplicateEdge { name: String },

    /// Two loops share a name.
    DuplicateLoop { name: String },

    /// A node name was referenced but never added.
    UnknownNode { name: String },

    /// No edge joins the two named nodes.
    NoEdge { from: String, to: String },

    /// A loop has too few elements to enclose anything.
    LoopTooShort { name: String, len: usize },

    /// Consecutive loop elements do not share an endpoint.
    LoopBroken {
        name: String,
        edge: String,
        at: String,
    },

    /// The last loop element does not lead back to the first node.
    LoopNotClosed { name: String },

    /// ID not found in the topology or layout.
    IdNotFound { what: &'static str },

    /// More objects than a 32-bit id can number.
    TooMany { what: &'static str },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::SelfLoop { node } => {
                write!(f, "Edge from node {} to itself", node)
            }
            GraphError::DuplicateEdge { name } => {
                write!(f, "Edge {} defined more than once", name)
            }
            GraphError::DuplicateLoop { name } => {
                write!(f, "Loop {} defined more than once", name)
            }
            GraphError::UnknownNode { name } => {
                write!(f, "Node {} does not exist", name)
            }
            GraphError::NoEdge { from, to } => {
                write!(f, "No element joins {} and {}", from, to)
            }
            GraphError::LoopTooShort { name, len } => {
                write!(f, "Loop {} has {} elements (need at least 3)", name, len)
            }
            GraphError::LoopBroken { name, edge, at } => {
                write!(
                    f,
                    "Loop {} is broken: element {} does not touch node {}",
                    name, edge, at
                )
            }
            GraphError::LoopNotClosed { name } => {
                write!(f, "Loop {} does not return to its starting node", name)
            }
            GraphError::IdNotFound { what } => {
                write!(f, "{} not found", what)
            }
            GraphError::TooMany { what } => {
                write!(f, "Too many {} to number with 32-bit ids", what)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for KfError {
    fn from(err: GraphError) -> Self {
        KfError::Invariant {
            what: err.to_string(),
        }
    }
}
