//! Four-state ideal Rankine cycle.

use kf_core::units::{Pressure, Temperature, as_kpa};
use kf_fluids::{SpecEnthalpy, StateSpec, SteamState, SteamTable};
use serde::Serialize;
use tracing::debug;

use crate::error::{CycleError, CycleResult};

/// Cycle inputs: condenser and boiler pressures, optional superheat.
#[derive(Debug, Clone, PartialEq)]
pub struct RankineCycle {
    pub name: String,
    pub p_low: Pressure,
    pub p_high: Pressure,
    /// Turbine inlet temperature. `None` means saturated vapor.
    pub t_high: Option<Temperature>,
}

/// A labelled point on the cycle.
#[derive(Debug, Clone)]
pub struct CycleState {
    pub label: &'static str,
    pub state: SteamState,
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}:", self.label)?;
        write!(f, "{}", self.state)
    }
}

/// Specific works and heat [kJ/kg], efficiency [%], and the four states.
#[derive(Debug, Clone, Serialize)]
pub struct RankineReport {
    pub name: String,
    pub turbine_work: SpecEnthalpy,
    pub pump_work: SpecEnthalpy,
    pub heat_added: SpecEnthalpy,
    pub efficiency: f64,
    #[serde(skip)]
    pub states: [CycleState; 4],
}

impl std::fmt::Display for RankineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cycle Summary for: {}", self.name)?;
        writeln!(f, "\tEfficiency: {:.3}%", self.efficiency)?;
        writeln!(f, "\tTurbine Work: {:.3} kJ/kg", self.turbine_work)?;
        writeln!(f, "\tPump Work: {:.3} kJ/kg", self.pump_work)?;
        writeln!(f, "\tHeat Added: {:.3} kJ/kg", self.heat_added)?;
        for state in &self.states {
            write!(f, "{state}")?;
        }
        Ok(())
    }
}

fn lookup<T: SteamTable + ?Sized>(
    table: &T,
    label: &'static str,
    p: Pressure,
    spec: StateSpec,
) -> CycleResult<CycleState> {
    let state = table
        .state(p, spec)
        .map_err(|source| CycleError::Property {
            state: label,
            source,
        })?;
    debug!(state = label, h = state.h, s = state.s, region = %state.region, "cycle state");
    Ok(CycleState { label, state })
}

impl RankineCycle {
    pub fn new(name: impl Into<String>, p_low: Pressure, p_high: Pressure) -> Self {
        Self {
            name: name.into(),
            p_low,
            p_high,
            t_high: None,
        }
    }

    pub fn with_superheat(mut self, t_high: Temperature) -> Self {
        self.t_high = Some(t_high);
        self
    }

    /// Walk the four states and compute the cycle energetics.
    ///
    /// 1 turbine inlet, 2 isentropic turbine exit, 3 saturated liquid at the
    /// condenser, 4 pump exit with `h4 = h3 + v3 (p_high - p_low)`.
    pub fn analyze<T: SteamTable + ?Sized>(&self, table: &T) -> CycleResult<RankineReport> {
        if self.p_high <= self.p_low {
            return Err(CycleError::Invalid {
                what: format!(
                    "boiler pressure {} kPa must exceed condenser pressure {} kPa",
                    as_kpa(self.p_high),
                    as_kpa(self.p_low)
                ),
            });
        }

        let inlet_spec = match self.t_high {
            Some(t) => StateSpec::Temperature(t),
            None => StateSpec::Quality(1.0),
        };
        let s1 = lookup(table, "Turbine Inlet", self.p_high, inlet_spec)?;
        let s2 = lookup(
            table,
            "Turbine Exit",
            self.p_low,
            StateSpec::Entropy(s1.state.s),
        )?;
        let s3 = lookup(table, "Pump Inlet", self.p_low, StateSpec::Quality(0.0))?;
        let mut s4 = lookup(
            table,
            "Pump Exit",
            self.p_high,
            StateSpec::Entropy(s3.state.s),
        )?;
        // Incompressible pump work: v [m^3/kg] * dp [kPa] = kJ/kg.
        s4.state.h = s3.state.h + s3.state.v * (as_kpa(self.p_high) - as_kpa(self.p_low));

        let turbine_work = s1.state.h - s2.state.h;
        let pump_work = s4.state.h - s3.state.h;
        let heat_added = s1.state.h - s4.state.h;
        if heat_added <= 0.0 {
            return Err(CycleError::Invalid {
                what: "no heat is added between pump exit and turbine inlet".to_string(),
            });
        }
        let efficiency = 100.0 * (turbine_work - pump_work) / heat_added;

        Ok(RankineReport {
            name: self.name.clone(),
            turbine_work,
            pump_work,
            heat_added,
            efficiency,
            states: [s1, s2, s3, s4],
        })
    }
}
