//! Steam property lookup contract.
//!
//! A state is fixed by pressure plus exactly one other property. The
//! `StateSpec` enum makes "exactly one" a type-level guarantee.

use crate::error::{FluidError, FluidResult};
use kf_core::units::{Pressure, Temperature, as_deg_c, as_kpa, deg_c};

/// Specific enthalpy [kJ/kg].
pub type SpecEnthalpy = f64;

/// Specific entropy [kJ/(kg·K)].
pub type SpecEntropy = f64;

/// Specific volume [m^3/kg].
pub type SpecVolume = f64;

/// Gas constant of water vapor used for superheated specific volume [J/(kg·K)].
pub const R_WATER: f64 = 8.314 / (18.0 / 1000.0);

/// The second independent property fixing a steam state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateSpec {
    Temperature(Temperature),
    Quality(f64),
    SpecificVolume(SpecVolume),
    Enthalpy(SpecEnthalpy),
    Entropy(SpecEntropy),
}

/// Thermodynamic region of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Quality below zero; properties are extrapolated from the saturated line.
    CompressedLiquid,
    Saturated,
    Superheated,
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Region::CompressedLiquid => write!(f, "compressed liquid"),
            Region::Saturated => write!(f, "Saturated"),
            Region::Superheated => write!(f, "Superheated"),
        }
    }
}

/// Saturated liquid (f) and vapor (g) properties at one pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationProps {
    /// Saturation temperature [°C]
    pub t_sat: f64,
    pub hf: SpecEnthalpy,
    pub hg: SpecEnthalpy,
    pub sf: SpecEntropy,
    pub sg: SpecEntropy,
    pub vf: SpecVolume,
    pub vg: SpecVolume,
}

/// Superheated enthalpy and entropy at one (p, T).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperheatedProps {
    pub h: SpecEnthalpy,
    pub s: SpecEntropy,
}

/// Property used to locate a superheated temperature on an isobar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuperheatedProperty {
    Enthalpy(SpecEnthalpy),
    Entropy(SpecEntropy),
}

/// A fully resolved steam state.
#[derive(Debug, Clone, PartialEq)]
pub struct SteamState {
    pub p: Pressure,
    pub t: Temperature,
    /// Vapor mass fraction; 1.0 for superheated, below 0.0 for compressed liquid.
    pub x: f64,
    pub v: SpecVolume,
    pub h: SpecEnthalpy,
    pub s: SpecEntropy,
    pub region: Region,
}

impl std::fmt::Display for SteamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Region: {}", self.region)?;
        writeln!(f, "p = {:.2} kPa", as_kpa(self.p))?;
        writeln!(f, "T = {:.1} degrees C", as_deg_c(self.t))?;
        writeln!(f, "h = {:.2} kJ/kg", self.h)?;
        writeln!(f, "s = {:.4} kJ/(kg K)", self.s)?;
        writeln!(f, "v = {:.6} m^3/kg", self.v)?;
        if self.region != Region::Superheated {
            writeln!(f, "x = {:.4}", self.x)?;
        }
        Ok(())
    }
}

/// Source of steam properties.
///
/// Implementors provide three primitive lookups; `state` combines them into
/// the region-branching resolution every caller needs. A quality above one
/// computed from enthalpy, entropy or volume is not an error: it selects the
/// superheated table.
pub trait SteamTable {
    /// Saturated properties at pressure `p`.
    fn saturation(&self, p: Pressure) -> FluidResult<SaturationProps>;

    /// Superheated properties at `(p, t)`.
    fn superheated(&self, p: Pressure, t: Temperature) -> FluidResult<SuperheatedProps>;

    /// Superheated temperature on the `p` isobar where `property` is attained.
    fn superheated_temperature(
        &self,
        p: Pressure,
        property: SuperheatedProperty,
    ) -> FluidResult<Temperature>;

    /// Resolve the full state at pressure `p` fixed by `spec`.
    fn state(&self, p: Pressure, spec: StateSpec) -> FluidResult<SteamState> {
        let sat = self.saturation(p)?;
        match spec {
            StateSpec::Temperature(t) => {
                if as_deg_c(t) <= sat.t_sat {
                    return Err(FluidError::OutOfRange {
                        what: format!(
                            "T = {:.2} C is not above saturation ({:.2} C); quality is undetermined",
                            as_deg_c(t),
                            sat.t_sat
                        ),
                    });
                }
                superheated_state(self, p, t)
            }
            StateSpec::Quality(x) => {
                if !(0.0..=1.0).contains(&x) {
                    return Err(FluidError::InvalidArg {
                        what: "quality must lie in [0, 1]",
                    });
                }
                Ok(two_phase_state(p, &sat, x))
            }
            StateSpec::SpecificVolume(v) => {
                let x = (v - sat.vf) / (sat.vg - sat.vf);
                if x <= 1.0 {
                    Ok(two_phase_state(p, &sat, x))
                } else {
                    let t_k = v * as_kpa(p) * 1000.0 / R_WATER;
                    superheated_state(self, p, deg_c(t_k - 273.15))
                }
            }
            StateSpec::Enthalpy(h) => {
                let x = (h - sat.hf) / (sat.hg - sat.hf);
                if x <= 1.0 {
                    Ok(two_phase_state(p, &sat, x))
                } else {
                    let t = self.superheated_temperature(p, SuperheatedProperty::Enthalpy(h))?;
                    superheated_state(self, p, t)
                }
            }
            StateSpec::Entropy(s) => {
                let x = (s - sat.sf) / (sat.sg - sat.sf);
                if x <= 1.0 {
                    Ok(two_phase_state(p, &sat, x))
                } else {
                    let t = self.superheated_temperature(p, SuperheatedProperty::Entropy(s))?;
                    superheated_state(self, p, t)
                }
            }
        }
    }
}

fn two_phase_state(p: Pressure, sat: &SaturationProps, x: f64) -> SteamState {
    SteamState {
        p,
        t: deg_c(sat.t_sat),
        x,
        v: sat.vf + x * (sat.vg - sat.vf),
        h: sat.hf + x * (sat.hg - sat.hf),
        s: sat.sf + x * (sat.sg - sat.sf),
        region: if x < 0.0 {
            Region::CompressedLiquid
        } else {
            Region::Saturated
        },
    }
}

fn superheated_state<T: SteamTable + ?Sized>(
    table: &T,
    p: Pressure,
    t: Temperature,
) -> FluidResult<SteamState> {
    let props = table.superheated(p, t)?;
    let t_k = as_deg_c(t) + 273.15;
    Ok(SteamState {
        p,
        t,
        x: 1.0,
        v: R_WATER * t_k / (as_kpa(p) * 1000.0),
        h: props.h,
        s: props.s,
        region: Region::Superheated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kf_core::units::kpa;

    /// Fixed single-pressure table with a linear superheated isobar.
    struct Flat;

    impl SteamTable for Flat {
        fn saturation(&self, _p: Pressure) -> FluidResult<SaturationProps> {
            Ok(SaturationProps {
                t_sat: 100.0,
                hf: 400.0,
                hg: 2700.0,
                sf: 1.3,
                sg: 7.4,
                vf: 0.001,
                vg: 1.7,
            })
        }

        fn superheated(&self, _p: Pressure, t: Temperature) -> FluidResult<SuperheatedProps> {
            let dt = as_deg_c(t) - 100.0;
            Ok(SuperheatedProps {
                h: 2700.0 + 2.0 * dt,
                s: 7.4 + 0.005 * dt,
            })
        }

        fn superheated_temperature(
            &self,
            _p: Pressure,
            property: SuperheatedProperty,
        ) -> FluidResult<Temperature> {
            let dt = match property {
                SuperheatedProperty::Enthalpy(h) => (h - 2700.0) / 2.0,
                SuperheatedProperty::Entropy(s) => (s - 7.4) / 0.005,
            };
            Ok(deg_c(100.0 + dt))
        }
    }

    #[test]
    fn quality_mixes_linearly() {
        let st = Flat.state(kpa(100.0), StateSpec::Quality(0.5)).unwrap();
        assert_eq!(st.region, Region::Saturated);
        assert!((st.h - 1550.0).abs() < 1e-9);
        assert!((as_deg_c(st.t) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn enthalpy_above_hg_branches_to_superheated() {
        let st = Flat.state(kpa(100.0), StateSpec::Enthalpy(2900.0)).unwrap();
        assert_eq!(st.region, Region::Superheated);
        assert!((as_deg_c(st.t) - 200.0).abs() < 1e-9);
        assert!((st.s - 7.9).abs() < 1e-9);
        assert_eq!(st.x, 1.0);
    }

    #[test]
    fn entropy_below_sf_is_compressed_liquid() {
        let st = Flat.state(kpa(100.0), StateSpec::Entropy(1.0)).unwrap();
        assert_eq!(st.region, Region::CompressedLiquid);
        assert!(st.x < 0.0);
    }

    #[test]
    fn temperature_at_saturation_is_out_of_range() {
        let err = Flat
            .state(kpa(100.0), StateSpec::Temperature(deg_c(90.0)))
            .unwrap_err();
        assert!(matches!(err, FluidError::OutOfRange { .. }));
    }

    #[test]
    fn superheated_volume_is_ideal_gas() {
        let st = Flat
            .state(kpa(100.0), StateSpec::Temperature(deg_c(200.0)))
            .unwrap();
        let expected = R_WATER * 473.15 / 100_000.0;
        assert!((st.v - expected).abs() < 1e-12);
    }

    #[test]
    fn quality_outside_unit_interval_rejected() {
        assert!(Flat.state(kpa(100.0), StateSpec::Quality(1.2)).is_err());
    }
}
