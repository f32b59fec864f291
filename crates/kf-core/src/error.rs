use thiserror::Error;

pub type KfResult<T> = Result<T, KfError>;

#[derive(Error, Debug)]
pub enum KfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error("Did not converge: {what}")]
    NotConverged { what: String },
}
