//! Pipe networks solved for steady flow rates.
//!
//! Unknowns are the pipe flows in pipe order. The residual holds one energy
//! balance per loop (net head loss) followed by one mass balance per node
//! (net inflow including the external flow). A connected network with
//! `pipes - nodes + 1` independent loops has exactly one redundant node row,
//! which the solver absorbs with least-squares steps.

use std::sync::Arc;

use kf_components::{FlowElement, NormalSampler, Pipe, TransitionSampler};
use kf_core::units::Length;
use kf_core::{Tolerances, nearly_equal};
use kf_fluids::Fluid;
use kf_graph::{Equation, ResidualLayout, Topology, TopologyBuilder};
use kf_solver::{NonlinearSystem, SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, info_span};

use crate::error::{NetworkError, NetworkResult};
use crate::options::{PIPE_INITIAL_GUESS, SolveOptions};
use crate::report::{Named, SolveReport};

/// Inflow and outflow at the boundary must agree to this tolerance.
const BALANCE_TOL: Tolerances = Tolerances {
    abs: 1e-12,
    rel: 1e-9,
};

/// A junction discovered from pipe endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeNode {
    pub name: String,
    /// Indices of incident pipes, in pipe order.
    pub pipes: Vec<usize>,
    /// Imposed inflow [m^3/s]; negative for a withdrawal.
    pub external_flow: f64,
}

/// Describes a pipe network before validation.
#[derive(Debug)]
pub struct PipeNetworkBuilder {
    fluid: Arc<Fluid>,
    pipes: Vec<Pipe>,
    loops: Vec<(String, Vec<String>)>,
    external: Vec<(String, f64)>,
}

impl PipeNetworkBuilder {
    pub fn new(fluid: Fluid) -> Self {
        Self {
            fluid: Arc::new(fluid),
            pipes: Vec::new(),
            loops: Vec::new(),
            external: Vec::new(),
        }
    }

    pub fn add_pipe(
        &mut self,
        a: &str,
        b: &str,
        length: Length,
        diameter: Length,
        roughness: Length,
    ) -> NetworkResult<&mut Self> {
        let pipe = Pipe::new(a, b, length, diameter, roughness, Arc::clone(&self.fluid))?;
        self.pipes.push(pipe);
        Ok(self)
    }

    /// Add a loop as an ordered list of pipe names (`a-b`, either order).
    pub fn add_loop(&mut self, name: &str, pipes: &[&str]) -> &mut Self {
        self.loops
            .push((name.into(), pipes.iter().map(|p| p.to_string()).collect()));
        self
    }

    pub fn set_external_flow(&mut self, node: &str, flow: f64) -> &mut Self {
        self.external.push((node.into(), flow));
        self
    }

    pub fn build(self) -> NetworkResult<PipeNetwork> {
        let mut graph = TopologyBuilder::new();
        for pipe in &self.pipes {
            graph.add_edge(pipe.start(), pipe.end())?;
        }
        for (name, pipe_names) in &self.loops {
            let edges = pipe_names
                .iter()
                .map(|p| {
                    p.split_once('-')
                        .and_then(|(a, b)| graph.find_edge(a.trim(), b.trim()))
                        .ok_or_else(|| NetworkError::not_found(format!("pipe {p} in loop {name}")))
                })
                .collect::<NetworkResult<Vec<_>>>()?;
            graph.add_loop_of_edges(name.as_str(), edges);
        }
        let topology = graph.build()?;

        let mut network = PipeNetwork {
            nodes: build_nodes(&topology),
            layout: ResidualLayout::all(&topology),
            fluid: self.fluid,
            pipes: self.pipes,
            topology,
            sampler: Box::new(NormalSampler::from_entropy()),
        };
        for (node, flow) in &self.external {
            network.set_external_flow(node, *flow)?;
        }
        Ok(network)
    }
}

/// One node per pipe endpoint, in first-seen order, each with its own
/// incident-pipe list.
pub fn build_nodes(topology: &Topology) -> Vec<PipeNode> {
    topology
        .nodes()
        .iter()
        .map(|n| PipeNode {
            name: n.name.clone(),
            pipes: topology.node_edges(n.id).iter().map(|e| e.slot()).collect(),
            external_flow: 0.0,
        })
        .collect()
}

/// A validated pipe network sharing one fluid.
///
/// The transitional friction sampler defaults to entropy-seeded normal
/// draws; install a seeded or mean sampler for reproducible runs.
pub struct PipeNetwork {
    fluid: Arc<Fluid>,
    pipes: Vec<Pipe>,
    topology: Topology,
    nodes: Vec<PipeNode>,
    layout: ResidualLayout,
    sampler: Box<dyn TransitionSampler>,
}

impl PipeNetwork {
    pub fn builder(fluid: Fluid) -> PipeNetworkBuilder {
        PipeNetworkBuilder::new(fluid)
    }

    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn nodes(&self) -> &[PipeNode] {
        &self.nodes
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn with_sampler(mut self, sampler: Box<dyn TransitionSampler>) -> Self {
        self.sampler = sampler;
        self
    }

    /// Look up a pipe by name, either orientation (`a-b` or `b-a`).
    pub fn pipe(&self, name: &str) -> NetworkResult<&Pipe> {
        self.topology
            .edge_by_name(name)
            .map(|e| &self.pipes[e.slot()])
            .ok_or_else(|| NetworkError::not_found(format!("pipe {name}")))
    }

    pub fn node(&self, name: &str) -> NetworkResult<&PipeNode> {
        self.nodes
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| NetworkError::not_found(format!("node {name}")))
    }

    pub fn set_external_flow(&mut self, node: &str, flow: f64) -> NetworkResult<()> {
        if !flow.is_finite() {
            return Err(NetworkError::invalid(format!(
                "external flow at {node} is not finite"
            )));
        }
        let entry = self
            .nodes
            .iter_mut()
            .find(|n| n.name == node)
            .ok_or_else(|| NetworkError::not_found(format!("node {node}")))?;
        entry.external_flow = flow;
        Ok(())
    }

    /// Check the network is solvable before iterating.
    ///
    /// External flows must balance, the pipes must connect every node, and
    /// the loops must be independent and numerous enough to fix every flow.
    pub fn validate(&self) -> NetworkResult<()> {
        let (inflow, outflow) = self.nodes.iter().fold((0.0, 0.0), |(i, o), n| {
            if n.external_flow >= 0.0 {
                (i + n.external_flow, o)
            } else {
                (i, o - n.external_flow)
            }
        });
        if !nearly_equal(inflow, outflow, BALANCE_TOL) {
            return Err(NetworkError::invalid(format!(
                "external flows sum to {}, expected zero",
                inflow - outflow
            )));
        }

        if !self.topology.is_connected() {
            return Err(NetworkError::invalid("pipes do not connect every node"));
        }

        let loops = self.topology.loops().len();
        if self.pipes.len() + 1 != self.nodes.len() + loops {
            return Err(NetworkError::invalid(format!(
                "{} pipes and {} nodes need {} independent loops, found {}",
                self.pipes.len(),
                self.nodes.len(),
                self.topology.cyclomatic_number(),
                loops
            )));
        }

        // Loop-pipe incidence must have full row rank.
        let mut incidence = DMatrix::zeros(loops, self.pipes.len());
        for (row, lp) in self.topology.loops().iter().enumerate() {
            for step in &lp.steps {
                incidence[(row, step.edge.slot())] = step.direction.sign();
            }
        }
        if loops > 0 && incidence.rank(1e-9) < loops {
            return Err(NetworkError::invalid("loops are not independent"));
        }
        Ok(())
    }

    /// Overwrite every pipe flow, in pipe order.
    pub fn set_flows(&mut self, flows: &[f64]) -> NetworkResult<()> {
        if flows.len() != self.pipes.len() {
            return Err(NetworkError::invalid(format!(
                "{} flows for {} pipes",
                flows.len(),
                self.pipes.len()
            )));
        }
        if let Some(i) = flows.iter().position(|q| !q.is_finite()) {
            return Err(NetworkError::invalid(format!(
                "non-finite flow for pipe {}",
                self.pipes[i].name()
            )));
        }
        for (pipe, &q) in self.pipes.iter_mut().zip(flows) {
            pipe.set_flow(q);
        }
        Ok(())
    }

    fn node_net_flow(&self, slot: usize) -> f64 {
        let node = &self.nodes[slot];
        node.external_flow
            + node
                .pipes
                .iter()
                .map(|&p| self.pipes[p].inflow_at(&node.name))
                .sum::<f64>()
    }

    fn loop_sum(&mut self, slot: usize) -> NetworkResult<f64> {
        let mut sum = 0.0;
        for step in &self.topology.loops()[slot].steps {
            sum += self.pipes[step.edge.slot()]
                .signed_head_loss(step.direction, self.sampler.as_mut())?;
        }
        Ok(sum)
    }

    /// Current flow in every pipe.
    pub fn pipe_flows(&self) -> Vec<Named> {
        self.pipes
            .iter()
            .map(|p| Named::new(p.name(), p.flow()))
            .collect()
    }

    /// Net inflow at every node, external flow included.
    pub fn net_node_flows(&self) -> Vec<Named> {
        (0..self.nodes.len())
            .map(|i| Named::new(self.nodes[i].name.as_str(), self.node_net_flow(i)))
            .collect()
    }

    pub fn loop_head_loss(&mut self, name: &str) -> NetworkResult<f64> {
        let id = self
            .topology
            .loop_by_name(name)
            .ok_or_else(|| NetworkError::not_found(format!("loop {name}")))?;
        self.loop_sum(id.slot())
    }

    /// Net head loss around every loop [m].
    ///
    /// Pipes in the transitional regime draw a fresh friction factor from the
    /// installed sampler, so with a random sampler these values scatter.
    pub fn loop_head_losses(&mut self) -> NetworkResult<Vec<Named>> {
        (0..self.topology.loops().len())
            .map(|i| {
                let sum = self.loop_sum(i)?;
                Ok(Named::new(self.topology.loops()[i].name.as_str(), sum))
            })
            .collect()
    }

    fn assemble(&mut self) -> NetworkResult<DVector<f64>> {
        let mut r = Vec::with_capacity(self.layout.len());
        for row in 0..self.layout.len() {
            let value = match self.layout.equation(row) {
                Some(Equation::Loop(id)) => self.loop_sum(id.slot())?,
                Some(Equation::Node(n)) => self.node_net_flow(n.slot()),
                None => 0.0,
            };
            r.push(value);
        }
        Ok(DVector::from_vec(r))
    }

    /// Solve for the pipe flows.
    ///
    /// On `NotConverged` the pipes keep the last iterate.
    pub fn solve(&mut self, options: &SolveOptions) -> NetworkResult<SolveReport> {
        self.validate()?;
        let _span = info_span!("pipe_network", pipes = self.pipes.len()).entered();
        let guess = options.initial_guess.unwrap_or(PIPE_INITIAL_GUESS);
        let x0 = DVector::from_element(self.pipes.len(), guess);
        let solution = kf_solver::solve(self, x0, &options.newton)?;
        debug!(iterations = solution.iterations, "pipe flows solved");

        Ok(SolveReport {
            unknowns: self.pipe_flows(),
            residuals: (0..self.layout.len())
                .map(|row| {
                    Named::new(
                        self.layout.describe(&self.topology, row),
                        solution.residual[row],
                    )
                })
                .collect(),
            residual_norm: solution.residual_norm,
            iterations: solution.iterations,
        })
    }
}

impl NonlinearSystem for PipeNetwork {
    fn unknowns(&self) -> usize {
        self.pipes.len()
    }

    fn equations(&self) -> usize {
        self.layout.len()
    }

    fn residual(&mut self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let eval = |e: NetworkError| SolverError::Evaluation {
            what: e.to_string(),
        };
        self.set_flows(x.as_slice()).map_err(eval)?;
        self.assemble().map_err(eval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kf_components::MeanSampler;
    use kf_core::units::{m, mm};

    fn triangle() -> PipeNetworkBuilder {
        let mut b = PipeNetwork::builder(Fluid::water());
        for (a, z) in [("a", "b"), ("b", "c"), ("a", "c")] {
            b.add_pipe(a, z, m(100.0), mm(200.0), m(0.00025)).unwrap();
        }
        b.add_loop("T", &["a-b", "b-c", "c-a"]);
        b
    }

    #[test]
    fn nodes_are_discovered_in_first_seen_order() {
        let net = triangle().build().unwrap();
        let names: Vec<&str> = net.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(net.node("a").unwrap().pipes, vec![0, 2]);
    }

    #[test]
    fn pipe_lookup_accepts_either_order() {
        let net = triangle().build().unwrap();
        assert_eq!(net.pipe("c-b").unwrap().name(), "b-c");
        assert!(net.pipe("a-z").is_err());
    }

    #[test]
    fn unbalanced_external_flows_rejected() {
        let mut b = triangle();
        b.set_external_flow("a", 1.0).set_external_flow("c", -0.5);
        let net = b.build().unwrap();
        assert!(matches!(net.validate(), Err(NetworkError::Invalid { .. })));
    }

    #[test]
    fn missing_loop_rejected() {
        let mut b = PipeNetwork::builder(Fluid::water());
        for (a, z) in [("a", "b"), ("b", "c"), ("a", "c")] {
            b.add_pipe(a, z, m(100.0), mm(200.0), m(0.00025)).unwrap();
        }
        let net = b.build().unwrap();
        assert!(net.validate().is_err());
    }

    #[test]
    fn symmetric_split_through_triangle() {
        let mut b = triangle();
        b.set_external_flow("a", 0.1).set_external_flow("c", -0.1);
        let mut net = b.build().unwrap().with_sampler(Box::new(MeanSampler));
        net.solve(&SolveOptions::default()).unwrap();

        // a-c carries more than the longer a-b-c path, and mass balances.
        let ac = net.pipe("a-c").unwrap().flow();
        let ab = net.pipe("a-b").unwrap().flow();
        assert!(ac > ab && ab > 0.0);
        assert!((ac + ab - 0.1).abs() < 1e-6);
        assert!((net.pipe("b-c").unwrap().flow() - ab).abs() < 1e-6);
    }
}
