//! Damped Newton iteration with least-squares steps.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};
use crate::jacobian::{JacobianScheme, central_difference_jacobian, finite_difference_jacobian};
use crate::system::NonlinearSystem;

/// Singular values below this fraction of the largest are treated as zero.
const SVD_REL_EPS: f64 = 1e-12;

/// Newton solver configuration.
///
/// Every field has a default, so configuration files only name what they
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm (against the initial norm)
    pub rel_tol: f64,
    /// Full Newton steps shorter than `step_tol * (1 + |x|)` also count as converged
    pub step_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Relative perturbation for finite differences
    pub fd_epsilon: f64,
    pub jacobian: JacobianScheme,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            abs_tol: 1e-9,
            rel_tol: 1e-10,
            step_tol: 1e-12,
            line_search_beta: 0.5,
            max_line_search_iters: 30,
            fd_epsilon: 1e-7,
            jacobian: JacobianScheme::Forward,
        }
    }
}

impl NewtonConfig {
    pub fn validate(&self) -> SolverResult<()> {
        let bad = |what: &str| {
            Err(SolverError::ProblemSetup {
                what: what.to_string(),
            })
        };
        if !(self.abs_tol >= 0.0 && self.rel_tol >= 0.0 && self.step_tol >= 0.0) {
            return bad("tolerances must be non-negative");
        }
        if !(self.line_search_beta > 0.0 && self.line_search_beta < 1.0) {
            return bad("line_search_beta must lie in (0, 1)");
        }
        if !(self.fd_epsilon > 0.0 && self.fd_epsilon.is_finite()) {
            return bad("fd_epsilon must be positive");
        }
        Ok(())
    }

    fn residual_converged(&self, r_norm: f64, r0_norm: f64) -> bool {
        r_norm <= self.abs_tol || r_norm <= self.rel_tol * r0_norm
    }
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Final iterate
    pub x: DVector<f64>,
    /// Final residual vector
    pub residual: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Solve `J dx = -r`: LU for square systems, SVD least squares otherwise or
/// when LU fails.
fn newton_step(jac: DMatrix<f64>, r: &DVector<f64>) -> SolverResult<DVector<f64>> {
    let rhs = -r.clone();
    if jac.is_square() {
        if let Some(dx) = jac.clone().lu().solve(&rhs) {
            if dx.iter().all(|v| v.is_finite()) {
                return Ok(dx);
            }
        }
    }

    let svd = jac.svd(true, true);
    let eps = SVD_REL_EPS * svd.singular_values.max();
    svd.solve(&rhs, eps).map_err(|e| SolverError::Numeric {
        what: format!("least-squares step failed: {e}"),
    })
}

fn evaluate<S: NonlinearSystem + ?Sized>(
    system: &mut S,
    x: &DVector<f64>,
) -> SolverResult<DVector<f64>> {
    let r = system.residual(x)?;
    if r.len() != system.equations() {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "residual has {} rows, system declares {}",
                r.len(),
                system.equations()
            ),
        });
    }
    Ok(r)
}

/// Newton solver with finite-difference Jacobian and backtracking line search.
///
/// Never errors on slow convergence: the caller reads `converged`. On return
/// the system's internal state corresponds to `x`.
pub fn newton_solve<S: NonlinearSystem + ?Sized>(
    system: &mut S,
    x0: DVector<f64>,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult> {
    config.validate()?;
    if x0.len() != system.unknowns() {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "initial guess has {} entries, system has {} unknowns",
                x0.len(),
                system.unknowns()
            ),
        });
    }
    if system.equations() < system.unknowns() {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "underdetermined system: {} equations for {} unknowns",
                system.equations(),
                system.unknowns()
            ),
        });
    }

    let mut x = x0;
    let mut r = evaluate(system, &x)?;
    let mut r_norm = r.norm();
    if !r_norm.is_finite() {
        return Err(SolverError::Numeric {
            what: "non-finite residual at initial guess".to_string(),
        });
    }
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        // Check convergence
        if config.residual_converged(r_norm, r0_norm) {
            return Ok(NewtonResult {
                x,
                residual: r,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        // Compute Jacobian
        let jac = match config.jacobian {
            JacobianScheme::Forward => {
                finite_difference_jacobian(system, &x, &r, config.fd_epsilon)?
            }
            JacobianScheme::Central => central_difference_jacobian(system, &x, config.fd_epsilon)?,
        };

        let dx = newton_step(jac, &r)?;

        // Backtracking line search on the residual norm
        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..=config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            let r_new = evaluate(system, &x_new)?;
            let r_new_norm = r_new.norm();
            if r_new_norm.is_finite() && r_new_norm < r_norm {
                accepted = Some((x_new, r_new, r_new_norm));
                break;
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            warn!(iteration = iter, residual_norm = r_norm, "line search stagnated");
            // The last trial point was rejected; put the system back on x.
            let r = evaluate(system, &x)?;
            return Ok(NewtonResult {
                x,
                residual: r,
                residual_norm: r_norm,
                iterations: iter + 1,
                converged: false,
            });
        };

        let step_norm = alpha * dx.norm();
        debug!(
            iteration = iter,
            residual_norm = r_new_norm,
            step = alpha,
            step_norm,
            "newton iteration"
        );

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;

        if alpha == 1.0 && step_norm <= config.step_tol * (1.0 + x.norm()) {
            return Ok(NewtonResult {
                x,
                residual: r,
                residual_norm: r_norm,
                iterations: iter + 1,
                converged: true,
            });
        }
    }

    Ok(NewtonResult {
        converged: config.residual_converged(r_norm, r0_norm),
        x,
        residual: r,
        residual_norm: r_norm,
        iterations: config.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x^2 - 4 = 0
    struct Quadratic;

    impl NonlinearSystem for Quadratic {
        fn unknowns(&self) -> usize {
            1
        }

        fn equations(&self) -> usize {
            1
        }

        fn residual(&mut self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        }
    }

    /// Two consistent lines plus a redundant copy of the first.
    struct Redundant;

    impl NonlinearSystem for Redundant {
        fn unknowns(&self) -> usize {
            2
        }

        fn equations(&self) -> usize {
            3
        }

        fn residual(&mut self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![
                x[0] + x[1] - 3.0,
                x[0] - x[1] - 1.0,
                2.0 * (x[0] + x[1] - 3.0),
            ]))
        }
    }

    #[test]
    fn simple_quadratic() {
        let x0 = DVector::from_element(1, 3.0);
        let result = newton_solve(&mut Quadratic, x0, &NewtonConfig::default()).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn overdetermined_consistent_system() {
        let x0 = DVector::from_element(2, 10.0);
        let result = newton_solve(&mut Redundant, x0, &NewtonConfig::default()).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-9);
        assert!((result.x[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn iteration_cap_reports_unconverged() {
        let config = NewtonConfig {
            max_iterations: 1,
            ..NewtonConfig::default()
        };
        let x0 = DVector::from_element(1, 100.0);
        let result = newton_solve(&mut Quadratic, x0, &config).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert!(result.residual_norm > 1.0);
    }

    #[test]
    fn wrong_guess_length_is_setup_error() {
        let x0 = DVector::from_element(3, 1.0);
        let err = newton_solve(&mut Quadratic, x0, &NewtonConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }

    #[test]
    fn bad_beta_rejected() {
        let config = NewtonConfig {
            line_search_beta: 1.5,
            ..NewtonConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
