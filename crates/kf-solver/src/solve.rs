//! High-level solver interface.

use nalgebra::DVector;
use tracing::{info, warn};

use crate::error::{SolverError, SolverResult};
use crate::newton::{NewtonConfig, newton_solve};
use crate::system::NonlinearSystem;

/// A converged root of a [`NonlinearSystem`].
#[derive(Debug, Clone)]
pub struct Solution {
    pub x: DVector<f64>,
    /// Residual at `x`, one entry per equation
    pub residual: DVector<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
}

/// Drive `system` from `x0` to a root.
///
/// An unconverged iteration is reported as [`SolverError::NotConverged`],
/// never as a `Solution`. Either way the system is left evaluated at the
/// last iterate.
pub fn solve<S: NonlinearSystem + ?Sized>(
    system: &mut S,
    x0: DVector<f64>,
    config: &NewtonConfig,
) -> SolverResult<Solution> {
    let result = newton_solve(system, x0, config)?;

    if !result.converged {
        warn!(
            iterations = result.iterations,
            residual_norm = result.residual_norm,
            "solve did not converge"
        );
        return Err(SolverError::NotConverged {
            iterations: result.iterations,
            residual_norm: result.residual_norm,
            last_iterate: result.x.iter().copied().collect(),
        });
    }

    info!(
        iterations = result.iterations,
        residual_norm = result.residual_norm,
        unknowns = result.x.len(),
        "solve converged"
    );
    Ok(Solution {
        x: result.x,
        residual: result.residual,
        residual_norm: result.residual_norm,
        iterations: result.iterations,
    })
}
