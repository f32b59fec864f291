//! kf-fluids: fluid property collaborators for kirchflow.
//!
//! Provides:
//! - `Fluid`: incompressible constants (viscosity, density) shared by pipes
//! - `SteamTable`: the steam property lookup contract used by cycle analysis
//! - `TabulatedSteam`: an in-memory table implementation of that contract
//!
//! # Example
//!
//! ```
//! use kf_core::units::kpa;
//! use kf_fluids::{Region, StateSpec, SteamTable, TabulatedSteam};
//!
//! let table = TabulatedSteam::reference();
//! let state = table.state(kpa(8.0), StateSpec::Quality(0.0)).unwrap();
//! assert_eq!(state.region, Region::Saturated);
//! assert!((state.h - 173.88).abs() < 1e-9);
//! ```

pub mod error;
pub mod fluid;
pub mod steam;
pub mod steam_table;

pub use error::{FluidError, FluidResult};
pub use fluid::Fluid;
pub use steam::{
    Region, SaturationProps, SpecEnthalpy, SpecEntropy, SpecVolume, StateSpec, SteamState,
    SteamTable, SuperheatedProperty, SuperheatedProps,
};
pub use steam_table::{SaturatedRow, SuperheatedRow, TabulatedSteam};
