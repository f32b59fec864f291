//! Derivative-free Newton solver for kirchflow residual systems.
//!
//! A network exposes its conservation laws as a [`NonlinearSystem`]; this
//! crate drives it to a root with a finite-difference Jacobian and a
//! backtracking line search. Systems with more equations than unknowns (a
//! redundant mass balance, for instance) take least-squares steps.
//!
//! Convergence is always classified: [`solve`] returns either a converged
//! [`Solution`] or [`SolverError::NotConverged`] carrying the last iterate.

pub mod error;
pub mod jacobian;
pub mod newton;
pub mod solve;
pub mod system;

pub use error::{SolverError, SolverResult};
pub use jacobian::JacobianScheme;
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
pub use solve::{Solution, solve};
pub use system::NonlinearSystem;
