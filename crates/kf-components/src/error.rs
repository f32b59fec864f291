//! Error types for component operations.

use kf_core::KfError;
use kf_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during element calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for KfError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => KfError::Invariant {
                what: format!("non-physical {what}"),
            },
            ComponentError::ConvergenceFailed { what } => KfError::NotConverged {
                what: what.to_string(),
            },
            ComponentError::InvalidArg { what } => KfError::InvalidArg { what },
            ComponentError::Fluid(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::NonPhysical { what: "diameter" };
        assert!(err.to_string().contains("diameter"));
    }

    #[test]
    fn error_conversion() {
        let comp_err = ComponentError::InvalidArg {
            what: "self edge a-a".into(),
        };
        let kf_err: KfError = comp_err.into();
        assert!(matches!(kf_err, KfError::InvalidArg { .. }));
    }
}
