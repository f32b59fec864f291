//! Fluid property errors.

use kf_core::KfError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, viscosity, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Query outside the tabulated range or region.
    #[error("Value out of range: {what}")]
    OutOfRange { what: String },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Backing table data absent or empty.
    #[error("Missing property data: {what}")]
    MissingData { what: &'static str },

    /// Inverse lookup did not converge.
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },
}

impl From<FluidError> for KfError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => KfError::Invariant {
                what: format!("Non-physical fluid value: {what}"),
            },
            FluidError::OutOfRange { what } => KfError::InvalidArg {
                what: format!("Fluid value out of range: {what}"),
            },
            FluidError::InvalidArg { what } => KfError::InvalidArg {
                what: format!("Invalid fluid argument: {what}"),
            },
            FluidError::MissingData { what } => KfError::NotFound {
                what: format!("fluid data: {what}"),
            },
            FluidError::ConvergenceFailed { what } => KfError::NotConverged {
                what: what.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "density" };
        assert!(err.to_string().contains("density"));

        let err = FluidError::OutOfRange {
            what: "p = 5 kPa".into(),
        };
        assert!(err.to_string().contains("5 kPa"));
    }

    #[test]
    fn error_to_kf_error() {
        let kf: KfError = FluidError::MissingData { what: "saturated" }.into();
        assert!(matches!(kf, KfError::NotFound { .. }));
    }
}
