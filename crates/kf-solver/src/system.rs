//! The contract between a model and the solver.

use nalgebra::DVector;

use crate::error::SolverResult;

/// A vector residual over a fixed-size vector of unknowns.
///
/// `residual` takes `&mut self` because models write each candidate back into
/// their element state before evaluating conservation laws. Position `i` of
/// the unknown vector must refer to the same element on every call, and the
/// row order of the residual must be equally stable.
pub trait NonlinearSystem {
    /// Number of unknowns.
    fn unknowns(&self) -> usize;

    /// Number of residual rows. May exceed `unknowns()` when some equations
    /// are redundant.
    fn equations(&self) -> usize;

    fn residual(&mut self, x: &DVector<f64>) -> SolverResult<DVector<f64>>;
}
