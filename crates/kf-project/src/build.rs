//! Conversion from validated definitions into solvable networks.

use kf_components::{MeanSampler, NormalSampler, TransitionSampler};
use kf_core::units::{kg_per_m3, m, mm, ohm, pa_s, volt};
use kf_fluids::Fluid;
use kf_network::{NetworkResult, PipeNetwork, ResistorNetwork, SolveOptions, SolveReport};
use tracing::debug;

use crate::ProjectResult;
use crate::schema::{CircuitDef, NetworkDef, PipeNetworkDef, Project, TransitionDef};

/// Command-line style override of the transition sampler a file asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerOverride {
    #[default]
    FromFile,
    Seeded(u64),
    Mean,
}

impl SamplerOverride {
    pub fn resolve(self, from_file: TransitionDef) -> TransitionDef {
        match self {
            SamplerOverride::FromFile => from_file,
            SamplerOverride::Seeded(seed) => TransitionDef::Normal { seed: Some(seed) },
            SamplerOverride::Mean => TransitionDef::Mean,
        }
    }
}

/// Either kind of network, ready to solve.
pub enum Network {
    Circuit(ResistorNetwork),
    Pipes(PipeNetwork),
}

impl Network {
    pub fn kind(&self) -> &'static str {
        match self {
            Network::Circuit(_) => "circuit",
            Network::Pipes(_) => "pipes",
        }
    }

    pub fn solve(&mut self, options: &SolveOptions) -> NetworkResult<SolveReport> {
        match self {
            Network::Circuit(c) => c.solve(options),
            Network::Pipes(p) => p.solve(options),
        }
    }
}

pub fn build_network(project: &Project, sampler: SamplerOverride) -> ProjectResult<Network> {
    debug!(name = %project.name, kind = project.network.kind(), "building network");
    Ok(match &project.network {
        NetworkDef::Circuit(def) => Network::Circuit(build_circuit(def)?),
        NetworkDef::Pipes(def) => Network::Pipes(build_pipes(def, sampler)?),
    })
}

pub fn build_circuit(def: &CircuitDef) -> ProjectResult<ResistorNetwork> {
    let mut b = ResistorNetwork::builder();
    for r in &def.resistors {
        b.add_resistor(&r.a, &r.b, ohm(r.ohms));
    }
    for s in &def.sources {
        b.add_source(&s.from, &s.to, volt(s.volts), s.kind.as_deref());
    }
    for l in &def.loops {
        let nodes: Vec<&str> = l.nodes.iter().map(String::as_str).collect();
        b.add_loop(&l.name, &nodes);
    }
    for br in &def.branches {
        let legs: Vec<(&str, &str)> = br
            .legs
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect();
        b.add_branch(&br.name, &legs);
    }
    for j in &def.junctions {
        b.add_junction(j);
    }
    Ok(b.build()?)
}

pub fn build_pipes(def: &PipeNetworkDef, sampler: SamplerOverride) -> ProjectResult<PipeNetwork> {
    let fluid = Fluid::new(
        pa_s(def.fluid.viscosity_pa_s),
        kg_per_m3(def.fluid.density_kg_m3),
    )?;
    let mut b = PipeNetwork::builder(fluid);
    for p in &def.pipes {
        b.add_pipe(
            &p.a,
            &p.b,
            m(p.length_m),
            mm(p.diameter_mm),
            m(p.roughness_m),
        )?;
    }
    for l in &def.loops {
        let pipes: Vec<&str> = l.pipes.iter().map(String::as_str).collect();
        b.add_loop(&l.name, &pipes);
    }
    for f in &def.external_flows {
        b.set_external_flow(&f.node, f.flow_m3s);
    }

    Ok(b.build()?.with_sampler(transition_sampler(sampler.resolve(def.transition))))
}

pub fn transition_sampler(def: TransitionDef) -> Box<dyn TransitionSampler> {
    match def {
        TransitionDef::Normal { seed: Some(seed) } => Box::new(NormalSampler::seeded(seed)),
        TransitionDef::Normal { seed: None } => Box::new(NormalSampler::from_entropy()),
        TransitionDef::Mean => Box::new(MeanSampler),
    }
}
