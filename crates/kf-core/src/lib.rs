//! kf-core: shared foundation for kirchflow.
//!
//! Contains:
//! - units (uom SI types + constructors for the quantities networks use)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact IDs for topology objects and solver positions)
//! - error (shared error type)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{KfError, KfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
