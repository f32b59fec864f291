//! Finite difference Jacobian computation.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::SolverResult;
use crate::system::NonlinearSystem;

/// Finite difference stencil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JacobianScheme {
    /// One extra residual per column.
    #[default]
    Forward,
    /// Two extra residuals per column, second-order accurate.
    Central,
}

/// Compute Jacobian using forward finite differences.
///
/// For each column j, perturbs x[j] by epsilon and computes (f(x+e) - f(x))/epsilon.
/// `f_x` is the residual already evaluated at `x`.
pub fn finite_difference_jacobian<S: NonlinearSystem + ?Sized>(
    system: &mut S,
    x: &DVector<f64>,
    f_x: &DVector<f64>,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>> {
    let n = x.len();
    let m = f_x.len();
    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let mut x_perturbed = x.clone();
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] += dx;

        let f_perturbed = system.residual(&x_perturbed)?;
        let df = (f_perturbed - f_x) / dx;
        jac.set_column(j, &df);
    }

    Ok(jac)
}

/// Compute Jacobian using central finite differences (more accurate but 2x cost).
pub fn central_difference_jacobian<S: NonlinearSystem + ?Sized>(
    system: &mut S,
    x: &DVector<f64>,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>> {
    let n = x.len();
    let m = system.equations();
    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(1.0);

        let mut x_plus = x.clone();
        x_plus[j] += dx;
        let f_plus = system.residual(&x_plus)?;

        let mut x_minus = x.clone();
        x_minus[j] -= dx;
        let f_minus = system.residual(&x_minus)?;

        let df = (f_plus - f_minus) / (2.0 * dx);
        jac.set_column(j, &df);
    }

    Ok(jac)
}
