use crate::KfError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, KfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(KfError::NonFinite { what, value: v })
    }
}

/// Sign of a value as +1 or -1, treating zero as positive.
///
/// Flow direction flags use this convention: a stagnant element is walked as
/// if flow followed its canonical orientation.
pub fn sign_of(v: Real) -> Real {
    if v >= 0.0 { 1.0 } else { -1.0 }
}

/// Linear interpolation of `y` at `x` between `(x0, y0)` and `(x1, y1)`.
///
/// Degenerate intervals return `y0`.
pub fn lerp(x: Real, x0: Real, x1: Real, y0: Real, y1: Real) -> Real {
    let span = x1 - x0;
    if span == 0.0 {
        return y0;
    }
    y0 + (x - x0) / span * (y1 - y0)
}
