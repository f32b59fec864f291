//! Solve configuration shared by both network kinds.

use kf_solver::NewtonConfig;
use serde::{Deserialize, Serialize};

/// Starting value for every branch current [A].
pub const CIRCUIT_INITIAL_GUESS: f64 = 0.0;

/// Starting value for every pipe flow [m^3/s]. Nonzero so the first
/// Jacobian is not degenerate.
pub const PIPE_INITIAL_GUESS: f64 = 10.0;

/// Options for a network solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolveOptions {
    /// Common starting value for every unknown. `None` uses the network's
    /// own default.
    pub initial_guess: Option<f64>,
    pub newton: NewtonConfig,
}

impl SolveOptions {
    pub fn with_initial_guess(mut self, value: f64) -> Self {
        self.initial_guess = Some(value);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.newton.max_iterations = max_iterations;
        self
    }
}
