//! kf-cycle: ideal Rankine cycle analysis.
//!
//! A sequential property-lookup pipeline on top of any
//! [`kf_fluids::SteamTable`]; there is no iterative solve here beyond the
//! table's own inversions.

pub mod error;
pub mod rankine;

pub use error::{CycleError, CycleResult};
pub use rankine::{CycleState, RankineCycle, RankineReport};
