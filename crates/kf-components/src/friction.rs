//! Darcy friction factor across laminar, transitional and turbulent flow.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};
use crate::sampler::TransitionSampler;

/// Upper Reynolds number of the laminar regime (inclusive).
pub const LAMINAR_RE_MAX: f64 = 2000.0;

/// Lower Reynolds number of the turbulent regime (inclusive).
pub const TURBULENT_RE_MIN: f64 = 4000.0;

/// Starting guess for the Colebrook iteration.
pub const COLEBROOK_SEED: f64 = 0.01;

const COLEBROOK_MAX_ITERS: usize = 50;
const COLEBROOK_TOL: f64 = 1e-14;

/// Flow regime by Reynolds number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Laminar,
    Transitional,
    Turbulent,
}

impl FlowRegime {
    pub fn classify(reynolds: f64) -> Self {
        if reynolds >= TURBULENT_RE_MIN {
            FlowRegime::Turbulent
        } else if reynolds <= LAMINAR_RE_MAX {
            FlowRegime::Laminar
        } else {
            FlowRegime::Transitional
        }
    }
}

/// Hagen-Poiseuille friction factor, `64 / Re`.
pub fn laminar(reynolds: f64) -> f64 {
    64.0 / reynolds
}

/// Solve the Colebrook equation for the Darcy friction factor.
///
/// Newton iteration in `x = 1/sqrt(f)` on
/// `x + 2 log10(rr/3.7 + 2.51 x / Re) = 0`, started from `f = 0.01`.
pub fn colebrook(reynolds: f64, relative_roughness: f64) -> ComponentResult<f64> {
    if !(reynolds.is_finite() && reynolds > 0.0) {
        return Err(ComponentError::NonPhysical {
            what: "Reynolds number",
        });
    }
    if !(relative_roughness.is_finite() && relative_roughness >= 0.0) {
        return Err(ComponentError::NonPhysical {
            what: "relative roughness",
        });
    }

    let a = relative_roughness / 3.7;
    let b = 2.51 / reynolds;
    let mut x = 1.0 / COLEBROOK_SEED.sqrt();

    for _ in 0..COLEBROOK_MAX_ITERS {
        let arg = a + b * x;
        if arg <= 0.0 {
            return Err(ComponentError::ConvergenceFailed {
                what: "Colebrook iterate left the log domain",
            });
        }
        let g = x + 2.0 * arg.log10();
        let dg = 1.0 + 2.0 * b / (arg * std::f64::consts::LN_10);
        let step = g / dg;
        x -= step;
        if step.abs() <= COLEBROOK_TOL * x.abs() {
            let f = 1.0 / (x * x);
            check_finite(f, "Colebrook friction factor")?;
            return Ok(f);
        }
    }

    Err(ComponentError::ConvergenceFailed {
        what: "Colebrook friction factor",
    })
}

/// Mean transitional friction factor.
///
/// Linear blend from the laminar value at `Re = 2000` to the Colebrook value
/// at `Re = 4000`, so the mean is continuous at both regime boundaries.
pub fn transitional_mean(reynolds: f64, relative_roughness: f64) -> ComponentResult<f64> {
    let lam = laminar(reynolds);
    let turb = colebrook(reynolds, relative_roughness)?;
    let w = (reynolds - LAMINAR_RE_MAX) / (TURBULENT_RE_MIN - LAMINAR_RE_MAX);
    Ok(lam + w * (turb - lam))
}

/// Darcy friction factor for any regime.
///
/// Only the transitional regime consults `sampler`.
pub fn darcy_friction_factor(
    reynolds: f64,
    relative_roughness: f64,
    sampler: &mut dyn TransitionSampler,
) -> ComponentResult<f64> {
    if !(reynolds.is_finite() && reynolds > 0.0) {
        return Err(ComponentError::NonPhysical {
            what: "Reynolds number",
        });
    }
    match FlowRegime::classify(reynolds) {
        FlowRegime::Laminar => Ok(laminar(reynolds)),
        FlowRegime::Turbulent => colebrook(reynolds, relative_roughness),
        FlowRegime::Transitional => {
            let mean = transitional_mean(reynolds, relative_roughness)?;
            let f = sampler.sample(mean);
            check_finite(f, "transitional friction factor")?;
            Ok(f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{MeanSampler, NormalSampler};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn colebrook_residual(f: f64, re: f64, rr: f64) -> f64 {
        1.0 / f.sqrt() + 2.0 * (rr / 3.7 + 2.51 / (re * f.sqrt())).log10()
    }

    #[test]
    fn regime_boundaries() {
        assert_eq!(FlowRegime::classify(2000.0), FlowRegime::Laminar);
        assert_eq!(FlowRegime::classify(2000.1), FlowRegime::Transitional);
        assert_eq!(FlowRegime::classify(3999.9), FlowRegime::Transitional);
        assert_eq!(FlowRegime::classify(4000.0), FlowRegime::Turbulent);
    }

    #[test]
    fn laminar_is_exact_and_ignores_sampler() {
        let mut s = NormalSampler::seeded(3);
        let f = darcy_friction_factor(1500.0, 0.001, &mut s).unwrap();
        assert_eq!(f, 64.0 / 1500.0);
    }

    #[test]
    fn colebrook_root_satisfies_equation() {
        let rr = 0.00025 / 0.2;
        let f = colebrook(5000.0, rr).unwrap();
        assert!(colebrook_residual(f, 5000.0, rr).abs() < 1e-10);

        let mut s = NormalSampler::seeded(3);
        assert_eq!(darcy_friction_factor(5000.0, rr, &mut s).unwrap(), f);
    }

    #[test]
    fn colebrook_smooth_pipe_reference() {
        // Moody chart: smooth pipe, Re = 1e5 gives f close to 0.018.
        let f = colebrook(1e5, 0.0).unwrap();
        assert_relative_eq!(f, 0.018, epsilon = 5e-4);
    }

    #[test]
    fn transitional_mean_is_continuous() {
        let rr = 0.00125;
        assert_relative_eq!(
            transitional_mean(2000.0, rr).unwrap(),
            laminar(2000.0),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            transitional_mean(4000.0, rr).unwrap(),
            colebrook(4000.0, rr).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn mean_sampler_makes_transition_deterministic() {
        let rr = 0.00125;
        let a = darcy_friction_factor(3000.0, rr, &mut MeanSampler).unwrap();
        let b = darcy_friction_factor(3000.0, rr, &mut MeanSampler).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, transitional_mean(3000.0, rr).unwrap());
    }

    #[test]
    fn zero_reynolds_rejected() {
        assert!(darcy_friction_factor(0.0, 0.001, &mut MeanSampler).is_err());
    }

    proptest! {
        #[test]
        fn laminar_closed_form(re in 1.0f64..=2000.0) {
            let f = darcy_friction_factor(re, 0.001, &mut MeanSampler).unwrap();
            prop_assert_eq!(f, 64.0 / re);
        }

        #[test]
        fn colebrook_converges_over_turbulent_range(re in 4000.0f64..1e8, rr in 0.0f64..0.05) {
            let f = colebrook(re, rr).unwrap();
            prop_assert!(f > 0.004 && f < 0.1);
            prop_assert!(colebrook_residual(f, re, rr).abs() < 1e-9);
        }
    }
}
