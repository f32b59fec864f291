//! kf-components: element physics for kirchflow networks.
//!
//! Provides the per-element models that network residuals are assembled from:
//! - `Resistor` and `VoltageSource` (Ohm's law, fixed EMF)
//! - `Pipe` (Darcy-Weisbach head loss over a shared `Fluid`)
//! - Friction-factor regimes with a pluggable transition sampler
//!
//! Every element is named by the undirected pair of nodes it joins and stores
//! its state with the sign convention "positive runs start to end".
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use kf_components::{FlowElement, MeanSampler, Pipe};
//! use kf_core::units::{m, mm};
//! use kf_fluids::Fluid;
//!
//! let mut pipe = Pipe::new("b", "a", m(250.0), mm(300.0), m(0.00025), Arc::new(Fluid::water())).unwrap();
//! assert_eq!(pipe.name(), "a-b");
//!
//! pipe.set_flow(0.05);
//! let hl = pipe.head_loss(&mut MeanSampler).unwrap();
//! assert!(hl.value > 0.0);
//! ```

pub mod common;
pub mod error;
pub mod friction;
pub mod pipe;
pub mod resistor;
pub mod sampler;
pub mod source;
pub mod traits;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use friction::{FlowRegime, colebrook, darcy_friction_factor, laminar, transitional_mean};
pub use pipe::Pipe;
pub use resistor::Resistor;
pub use sampler::{MeanSampler, NormalSampler, TRANSITION_REL_STD_DEV, TransitionSampler};
pub use source::VoltageSource;
pub use traits::FlowElement;
