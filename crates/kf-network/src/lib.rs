//! kf-network: network models and residual assembly for kirchflow.
//!
//! Two network kinds share one pattern: typed elements on an undirected
//! topology, a residual built from conservation laws (loops first, then
//! nodes), and a Newton solve that writes each trial point back into the
//! elements.
//!
//! - [`ResistorNetwork`]: branch currents under Kirchhoff's laws
//! - [`PipeNetwork`]: pipe flows under mass and head-loss balances
//!
//! # Example
//!
//! ```
//! use kf_network::{SolveOptions, scenarios};
//!
//! let mut circuit = scenarios::reference_circuit().unwrap();
//! let report = circuit.solve(&SolveOptions::default()).unwrap();
//! assert_eq!(format!("{:.1}", report.value("I1").unwrap()), "0.9");
//! ```

pub mod error;
pub mod options;
pub mod pipe;
pub mod report;
pub mod resistor;
pub mod scenarios;

pub use error::{NetworkError, NetworkResult};
pub use options::{CIRCUIT_INITIAL_GUESS, PIPE_INITIAL_GUESS, SolveOptions};
pub use pipe::{PipeNetwork, PipeNetworkBuilder, PipeNode, build_nodes};
pub use report::{Named, SolveReport};
pub use resistor::{ResistorNetwork, ResistorNetworkBuilder};
