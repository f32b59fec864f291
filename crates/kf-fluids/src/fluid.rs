//! Incompressible fluid constants.

use crate::error::{FluidError, FluidResult};
use kf_core::units::{Density, DynVisc, kg_per_m3, pa_s};

/// Immutable physical constants of an incompressible liquid.
///
/// Pipes share one `Fluid` by reference; nothing mutates it after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fluid {
    mu: DynVisc,
    rho: Density,
}

impl Fluid {
    /// Create a fluid from dynamic viscosity and density.
    ///
    /// Both must be positive and finite.
    pub fn new(mu: DynVisc, rho: Density) -> FluidResult<Self> {
        if !mu.value.is_finite() || mu.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "viscosity must be positive and finite",
            });
        }
        if !rho.value.is_finite() || rho.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(Self { mu, rho })
    }

    /// Water near room temperature (mu = 0.00089 Pa s, rho = 1000 kg/m^3).
    pub fn water() -> Self {
        Self {
            mu: pa_s(0.00089),
            rho: kg_per_m3(1000.0),
        }
    }

    pub fn viscosity(&self) -> DynVisc {
        self.mu
    }

    pub fn density(&self) -> Density {
        self.rho
    }

    /// Kinematic viscosity nu = mu / rho [m^2/s].
    pub fn kinematic_viscosity(&self) -> f64 {
        self.mu.value / self.rho.value
    }
}

impl Default for Fluid {
    fn default() -> Self {
        Self::water()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_defaults() {
        let w = Fluid::default();
        assert_eq!(w.viscosity().value, 0.00089);
        assert_eq!(w.density().value, 1000.0);
        assert!((w.kinematic_viscosity() - 8.9e-7).abs() < 1e-15);
    }

    #[test]
    fn rejects_non_physical() {
        assert!(Fluid::new(pa_s(0.0), kg_per_m3(1000.0)).is_err());
        assert!(Fluid::new(pa_s(0.001), kg_per_m3(f64::NAN)).is_err());
        assert!(Fluid::new(pa_s(0.001), kg_per_m3(998.0)).is_ok());
    }
}
