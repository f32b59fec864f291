//! Error types for cycle analysis.

use kf_core::KfError;
use kf_fluids::FluidError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    #[error("Steam property lookup failed at {state}: {source}")]
    Property {
        state: &'static str,
        #[source]
        source: FluidError,
    },

    #[error("Invalid cycle: {what}")]
    Invalid { what: String },
}

pub type CycleResult<T> = Result<T, CycleError>;

impl From<CycleError> for KfError {
    fn from(e: CycleError) -> Self {
        match e {
            CycleError::Property { source, .. } => source.into(),
            CycleError::Invalid { what } => KfError::InvalidArg { what },
        }
    }
}
