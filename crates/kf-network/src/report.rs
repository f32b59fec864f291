//! Post-solve summaries.

use serde::Serialize;

/// A labelled scalar, e.g. a pipe flow or a loop residual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Named {
    pub name: String,
    pub value: f64,
}

impl Named {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Outcome of a converged network solve.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// Solved unknowns in positional order (branch currents or pipe flows).
    pub unknowns: Vec<Named>,
    /// Residual rows at the solution, labelled by the law they encode.
    pub residuals: Vec<Named>,
    pub residual_norm: f64,
    pub iterations: usize,
}

impl SolveReport {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.unknowns.iter().find(|n| n.name == name).map(|n| n.value)
    }
}
