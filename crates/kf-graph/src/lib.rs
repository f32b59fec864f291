//! kf-graph: topology layer for kirchflow.
//!
//! Provides:
//! - Undirected network topology (named nodes, canonical edges, closed loops)
//! - Incremental builder with loop and connectivity validation
//! - Residual row layout shared by network solvers
//!
//! # Example
//!
//! ```
//! use kf_graph::{Direction, TopologyBuilder};
//!
//! let mut builder = TopologyBuilder::new();
//! builder.add_edge("a", "b").unwrap();
//! builder.add_edge("b", "c").unwrap();
//! builder.add_edge("c", "a").unwrap();
//! builder.add_loop_through_nodes("L1", &["a", "b", "c"]);
//! let topo = builder.build().unwrap();
//!
//! let (edge, dir) = topo.edge_between("c", "a").unwrap();
//! assert_eq!(topo.edge(edge).unwrap().name, "a-c");
//! assert_eq!(dir, Direction::Reverse);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

pub use builder::TopologyBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Direction, Edge, Loop, LoopStep, Node, Topology, canonical_pair, edge_name};
pub use indexing::{Equation, ResidualLayout};
