//! Resistor networks solved by Kirchhoff's laws.
//!
//! Unknowns are *branch currents*: each branch drives one current through an
//! ordered set of directed resistor legs. The residual holds one KVL row per
//! loop followed by one KCL row per junction.

use kf_components::{FlowElement, Resistor, VoltageSource};
use kf_core::units::{Resistance, Voltage, amp, volt};
use kf_core::{EdgeId, NodeId};
use kf_graph::{Direction, Equation, ResidualLayout, Topology, TopologyBuilder};
use kf_solver::{NonlinearSystem, SolverError, SolverResult};
use nalgebra::DVector;
use tracing::{debug, info_span};

use crate::error::{NetworkError, NetworkResult};
use crate::options::{CIRCUIT_INITIAL_GUESS, SolveOptions};
use crate::report::{Named, SolveReport};

/// What occupies an edge of the circuit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Resistor(usize),
    Source(usize),
}

/// One unknown current and the resistor legs it drives.
#[derive(Debug, Clone)]
struct Branch {
    name: String,
    legs: Vec<(usize, Direction)>,
}

/// Describes a resistor network before validation.
#[derive(Debug, Default)]
pub struct ResistorNetworkBuilder {
    resistors: Vec<(String, String, Resistance)>,
    sources: Vec<(String, String, Voltage, Option<String>)>,
    loops: Vec<(String, Vec<String>)>,
    branches: Vec<(String, Vec<(String, String)>)>,
    junctions: Vec<String>,
}

impl ResistorNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_resistor(&mut self, a: &str, b: &str, resistance: Resistance) -> &mut Self {
        self.resistors.push((a.into(), b.into(), resistance));
        self
    }

    /// Add a source that raises the potential by `value` walking `from -> to`.
    pub fn add_source(
        &mut self,
        from: &str,
        to: &str,
        value: Voltage,
        kind: Option<&str>,
    ) -> &mut Self {
        self.sources
            .push((from.into(), to.into(), value, kind.map(str::to_string)));
        self
    }

    /// Add a loop through the named nodes, closed from the last back to the first.
    pub fn add_loop(&mut self, name: &str, nodes: &[&str]) -> &mut Self {
        self.loops
            .push((name.into(), nodes.iter().map(|n| n.to_string()).collect()));
        self
    }

    /// Add an unknown current flowing along each `(from, to)` leg.
    pub fn add_branch(&mut self, name: &str, legs: &[(&str, &str)]) -> &mut Self {
        self.branches.push((
            name.into(),
            legs.iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        ));
        self
    }

    /// Write a KCL equation at `node`.
    pub fn add_junction(&mut self, node: &str) -> &mut Self {
        self.junctions.push(node.into());
        self
    }

    pub fn build(&self) -> NetworkResult<ResistorNetwork> {
        let mut graph = TopologyBuilder::new();
        let mut slots = Vec::new();

        let mut resistors = Vec::with_capacity(self.resistors.len());
        for (a, b, r) in &self.resistors {
            graph.add_edge(a, b)?;
            slots.push(Slot::Resistor(resistors.len()));
            resistors.push(Resistor::new(a, b, *r)?);
        }

        let mut sources = Vec::with_capacity(self.sources.len());
        for (from, to, v, kind) in &self.sources {
            graph.add_edge(from, to)?;
            slots.push(Slot::Source(sources.len()));
            let source = VoltageSource::new(from, to, *v)?;
            sources.push(match kind {
                Some(k) => source.with_kind(k.as_str()),
                None => source,
            });
        }

        for (name, nodes) in &self.loops {
            let nodes: Vec<&str> = nodes.iter().map(String::as_str).collect();
            graph.add_loop_through_nodes(name.as_str(), &nodes);
        }
        let topology = graph.build()?;

        let mut driven = vec![0usize; resistors.len()];
        let mut branches = Vec::with_capacity(self.branches.len());
        for (name, legs) in &self.branches {
            let mut resolved = Vec::with_capacity(legs.len());
            for (from, to) in legs {
                let (edge, dir) = topology.edge_between(from, to).ok_or_else(|| {
                    NetworkError::not_found(format!("element {from}{to} in branch {name}"))
                })?;
                match slots[edge.slot()] {
                    Slot::Resistor(i) => {
                        driven[i] += 1;
                        resolved.push((i, dir));
                    }
                    Slot::Source(_) => {
                        return Err(NetworkError::invalid(format!(
                            "branch {name} drives source {}",
                            topology.edge_label(edge)
                        )));
                    }
                }
            }
            branches.push(Branch {
                name: name.clone(),
                legs: resolved,
            });
        }
        if let Some(i) = driven.iter().position(|&n| n != 1) {
            return Err(NetworkError::invalid(format!(
                "resistor {} is driven by {} branches, expected exactly one",
                resistors[i].name(),
                driven[i]
            )));
        }

        let mut junctions = Vec::with_capacity(self.junctions.len());
        for name in &self.junctions {
            let node = topology
                .node_by_name(name)
                .ok_or_else(|| NetworkError::not_found(format!("junction {name}")))?;
            if topology
                .node_edges(node)
                .iter()
                .any(|e| matches!(slots[e.slot()], Slot::Source(_)))
            {
                return Err(NetworkError::invalid(format!(
                    "junction {name} touches a voltage source"
                )));
            }
            junctions.push(node);
        }

        let equations = topology.loops().len() + junctions.len();
        if branches.len() != equations {
            return Err(NetworkError::invalid(format!(
                "{} branch currents but {} loop and junction equations",
                branches.len(),
                equations
            )));
        }

        let layout = ResidualLayout::loops_then_nodes(&topology, &junctions);
        Ok(ResistorNetwork {
            topology,
            slots,
            resistors,
            sources,
            branches,
            layout,
        })
    }
}

/// A validated resistor network.
///
/// Residual evaluation writes the candidate currents into the resistors, so
/// element state read during a solve reflects the latest trial point.
#[derive(Debug, Clone)]
pub struct ResistorNetwork {
    topology: Topology,
    slots: Vec<Slot>,
    resistors: Vec<Resistor>,
    sources: Vec<VoltageSource>,
    branches: Vec<Branch>,
    layout: ResidualLayout,
}

impl ResistorNetwork {
    pub fn builder() -> ResistorNetworkBuilder {
        ResistorNetworkBuilder::new()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn resistors(&self) -> &[Resistor] {
        &self.resistors
    }

    pub fn sources(&self) -> &[VoltageSource] {
        &self.sources
    }

    pub fn branch_names(&self) -> Vec<&str> {
        self.branches.iter().map(|b| b.name.as_str()).collect()
    }

    /// Look up a resistor by name, either orientation (`a-d` or `d-a`).
    pub fn resistor(&self, name: &str) -> NetworkResult<&Resistor> {
        let edge = self
            .topology
            .edge_by_name(name)
            .ok_or_else(|| NetworkError::not_found(format!("element {name}")))?;
        match self.slots[edge.slot()] {
            Slot::Resistor(i) => Ok(&self.resistors[i]),
            Slot::Source(_) => Err(NetworkError::not_found(format!("resistor {name}"))),
        }
    }

    /// Assign one current per branch and push it into every driven resistor.
    pub fn set_branch_currents(&mut self, currents: &[f64]) -> NetworkResult<()> {
        if currents.len() != self.branches.len() {
            return Err(NetworkError::invalid(format!(
                "{} currents for {} branches",
                currents.len(),
                self.branches.len()
            )));
        }
        if let Some(i) = currents.iter().position(|c| !c.is_finite()) {
            return Err(NetworkError::invalid(format!(
                "non-finite current for branch {}",
                self.branches[i].name
            )));
        }
        for (branch, &i) in self.branches.iter().zip(currents) {
            for &(r, dir) in &branch.legs {
                self.resistors[r].set_current(amp(dir.sign() * i))?;
            }
        }
        Ok(())
    }

    /// Current in each branch, read back from its first resistor.
    pub fn branch_currents(&self) -> Vec<Named> {
        self.branches
            .iter()
            .map(|b| {
                let value = b
                    .legs
                    .first()
                    .map_or(0.0, |&(r, dir)| dir.sign() * self.resistors[r].flow());
                Named::new(b.name.as_str(), value)
            })
            .collect()
    }

    fn edge_delta_v(&self, edge: EdgeId, dir: Direction) -> Voltage {
        match self.slots[edge.slot()] {
            Slot::Resistor(i) => self.resistors[i].delta_v_along(dir),
            Slot::Source(i) => self.sources[i].delta_v_along(dir),
        }
    }

    /// Potential change walking the element between `from` and `to`.
    ///
    /// Either orientation finds the element; the sign follows the walk.
    pub fn delta_v_along(&self, from: &str, to: &str) -> NetworkResult<Voltage> {
        let (edge, dir) = self
            .topology
            .edge_between(from, to)
            .ok_or_else(|| NetworkError::not_found(format!("element {from}{to}")))?;
        Ok(self.edge_delta_v(edge, dir))
    }

    /// Potential change for a two-node label such as `ad` or `a-d`.
    pub fn element_delta_v(&self, label: &str) -> NetworkResult<Voltage> {
        let (from, to) = split_label(label)
            .ok_or_else(|| NetworkError::invalid(format!("element label {label}")))?;
        self.delta_v_along(from, to)
    }

    /// Net potential change around one loop.
    pub fn loop_voltage_sum(&self, name: &str) -> NetworkResult<Voltage> {
        let id = self
            .topology
            .loop_by_name(name)
            .ok_or_else(|| NetworkError::not_found(format!("loop {name}")))?;
        Ok(self.loop_sum(id.slot()))
    }

    fn loop_sum(&self, slot: usize) -> Voltage {
        self.topology.loops()[slot]
            .steps
            .iter()
            .fold(volt(0.0), |acc, step| {
                acc + self.edge_delta_v(step.edge, step.direction)
            })
    }

    fn junction_sum(&self, node: NodeId) -> f64 {
        let name = self.topology.node_name(node);
        self.topology
            .node_edges(node)
            .iter()
            .filter_map(|e| match self.slots[e.slot()] {
                Slot::Resistor(i) => Some(self.resistors[i].inflow_at(name)),
                Slot::Source(_) => None,
            })
            .sum()
    }

    /// KVL sums for every loop, in loop order.
    pub fn loop_voltage_sums(&self) -> Vec<Named> {
        self.topology
            .loops()
            .iter()
            .map(|lp| Named::new(lp.name.as_str(), self.loop_sum(lp.id.slot()).value))
            .collect()
    }

    /// Net current into every junction.
    pub fn junction_currents(&self) -> Vec<Named> {
        self.layout
            .rows()
            .iter()
            .filter_map(|row| match *row {
                Equation::Node(n) => {
                    Some(Named::new(self.topology.node_name(n), self.junction_sum(n)))
                }
                Equation::Loop(_) => None,
            })
            .collect()
    }

    fn assemble(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.layout.len(),
            self.layout.rows().iter().map(|row| match *row {
                Equation::Loop(id) => self.loop_sum(id.slot()).value,
                Equation::Node(n) => self.junction_sum(n),
            }),
        )
    }

    /// Solve for the branch currents.
    ///
    /// On `NotConverged` the resistors keep the last iterate.
    pub fn solve(&mut self, options: &SolveOptions) -> NetworkResult<SolveReport> {
        let _span = info_span!("resistor_network", branches = self.branches.len()).entered();
        let guess = options.initial_guess.unwrap_or(CIRCUIT_INITIAL_GUESS);
        let x0 = DVector::from_element(self.branches.len(), guess);
        let solution = kf_solver::solve(self, x0, &options.newton)?;
        debug!(iterations = solution.iterations, "branch currents solved");

        Ok(SolveReport {
            unknowns: self.branch_currents(),
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

impl NonlinearSystem for ResistorNetwork {
    fn unknowns(&self) -> usize {
        self.branches.len()
    }

    fn equations(&self) -> usize {
        self.layout.len()
    }

    fn residual(&mut self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        self.set_branch_currents(x.as_slice())
            .map_err(|e| SolverError::Evaluation {
                what: e.to_string(),
            })?;
        Ok(self.assemble())
    }
}

fn split_label(label: &str) -> Option<(&str, &str)> {
    if let Some((a, b)) = label.split_once('-') {
        return Some((a.trim(), b.trim()));
    }
    let mut chars = label.char_indices().skip(1);
    let (mid, _) = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some((&label[..mid], &label[mid..]))
}
