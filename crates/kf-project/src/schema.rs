//! Serde schema for network definition files.

use kf_network::SolveOptions;
use kf_network::scenarios::REFERENCE_ROUGHNESS_M;
use serde::{Deserialize, Serialize};

/// A network definition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    pub network: NetworkDef,
    /// Overrides for the initial guess and Newton settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolveOptions>,
}

impl Project {
    pub fn solve_options(&self) -> SolveOptions {
        self.solver.clone().unwrap_or_default()
    }
}

fn default_version() -> u32 {
    crate::validate::LATEST_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkDef {
    Circuit(CircuitDef),
    Pipes(PipeNetworkDef),
}

impl NetworkDef {
    pub fn kind(&self) -> &'static str {
        match self {
            NetworkDef::Circuit(_) => "circuit",
            NetworkDef::Pipes(_) => "pipes",
        }
    }
}

// ---------------------------------------------------------------------------
// Resistor circuits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitDef {
    #[serde(default)]
    pub resistors: Vec<ResistorDef>,
    #[serde(default)]
    pub sources: Vec<SourceDef>,
    #[serde(default)]
    pub loops: Vec<NodeLoopDef>,
    #[serde(default)]
    pub branches: Vec<BranchDef>,
    #[serde(default)]
    pub junctions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistorDef {
    pub a: String,
    pub b: String,
    pub ohms: f64,
}

/// Source raising the potential by `volts` walking `from -> to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDef {
    pub from: String,
    pub to: String,
    pub volts: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Closed loop through the listed nodes (last node connects back to the first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLoopDef {
    pub name: String,
    pub nodes: Vec<String>,
}

/// Named branch current and the resistor legs it drives, each walked
/// `[from, to]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDef {
    pub name: String,
    pub legs: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// Pipe networks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeNetworkDef {
    #[serde(default)]
    pub fluid: FluidDef,
    pub pipes: Vec<PipeDef>,
    #[serde(default)]
    pub loops: Vec<PipeLoopDef>,
    #[serde(default)]
    pub external_flows: Vec<ExternalFlowDef>,
    #[serde(default)]
    pub transition: TransitionDef,
}

/// Incompressible fluid constants; water when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidDef {
    #[serde(default = "default_viscosity")]
    pub viscosity_pa_s: f64,
    #[serde(default = "default_density")]
    pub density_kg_m3: f64,
}

impl Default for FluidDef {
    fn default() -> Self {
        Self {
            viscosity_pa_s: default_viscosity(),
            density_kg_m3: default_density(),
        }
    }
}

fn default_viscosity() -> f64 {
    0.00089
}

fn default_density() -> f64 {
    1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeDef {
    pub a: String,
    pub b: String,
    pub length_m: f64,
    pub diameter_mm: f64,
    #[serde(default = "default_roughness")]
    pub roughness_m: f64,
}

fn default_roughness() -> f64 {
    REFERENCE_ROUGHNESS_M
}

/// Loop as an ordered list of pipe names (`a-b`, either order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeLoopDef {
    pub name: String,
    pub pipes: Vec<String>,
}

/// Flow entering (positive) or leaving (negative) the network at a node [m^3/s].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalFlowDef {
    pub node: String,
    pub flow_m3s: f64,
}

/// How transitional-regime friction factors are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sampler", rename_all = "snake_case")]
pub enum TransitionDef {
    /// Normal draw around the interpolated mean; entropy-seeded when `seed` is absent.
    Normal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// Always the interpolated mean.
    Mean,
}

impl Default for TransitionDef {
    fn default() -> Self {
        TransitionDef::Normal { seed: None }
    }
}
