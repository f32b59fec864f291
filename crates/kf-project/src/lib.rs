//! kf-project: network definition files, validation and conversion.
//!
//! A definition is a YAML (or JSON) document tagged `kind: circuit` or
//! `kind: pipes`. Loading always validates; `build` turns a definition
//! into a ready-to-solve network.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::{
    Network, SamplerOverride, build_circuit, build_network, build_pipes, transition_sampler,
};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_project};

use kf_core::KfError;
use kf_fluids::FluidError;
use kf_network::NetworkError;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ProjectError> for KfError {
    fn from(e: ProjectError) -> Self {
        match e {
            ProjectError::Network(n) => n.into(),
            ProjectError::Fluid(f) => f.into(),
            other => KfError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}

pub fn from_yaml_str(content: &str) -> ProjectResult<Project> {
    let project: Project = serde_yaml::from_str(content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a definition, choosing the format from the file extension
/// (`.json` is JSON, anything else is YAML).
pub fn load(path: &std::path::Path) -> ProjectResult<Project> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
