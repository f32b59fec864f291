//! Common utilities for element calculations.

use crate::error::{ComponentError, ComponentResult};
use kf_core::numeric::ensure_finite;
use kf_graph::canonical_pair;

/// Flows smaller than this (m^3/s) are treated as stagnant.
pub const EPSILON_FLOW: f64 = 1e-12;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a parameter is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value <= 0.0 {
        return Err(ComponentError::NonPhysical { what });
    }
    Ok(())
}

/// Canonical `(start, end)` names for an element joining `a` and `b`.
pub fn canonical_ends(a: &str, b: &str) -> ComponentResult<(String, String)> {
    if a == b {
        return Err(ComponentError::InvalidArg {
            what: format!("element cannot join node {a} to itself"),
        });
    }
    let (start, end) = canonical_pair(a, b);
    Ok((start.to_string(), end.to_string()))
}
