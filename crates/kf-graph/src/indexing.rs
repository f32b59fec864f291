//! Stable residual row layout for network solvers.
//!
//! Maps each row of a residual vector to the conservation law it encodes:
//! loop equations first (in loop order), then node equations (in the order
//! given at construction). The layout is fixed for the lifetime of a solve.

use kf_core::{LoopId, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::Topology;

/// The conservation law behind one residual row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equation {
    /// Net drop around a loop.
    Loop(LoopId),
    /// Net flow into a node.
    Node(NodeId),
}

/// Row layout: every topology loop, followed by the selected nodes.
#[derive(Debug, Clone)]
pub struct ResidualLayout {
    rows: Vec<Equation>,

    /// Loop rows occupy `0..loop_rows`.
    loop_rows: usize,

    /// Reverse lookup: NodeId -> row. None for nodes without an equation.
    node_to_row: Vec<Option<usize>>,
}

impl ResidualLayout {
    /// Layout with one row per loop followed by one row per listed node.
    pub fn loops_then_nodes(topo: &Topology, nodes: &[NodeId]) -> Self {
        let mut rows = Vec::with_capacity(topo.loops().len() + nodes.len());
        let mut node_to_row = vec![None; topo.nodes().len()];

        rows.extend(topo.loops().iter().map(|lp| Equation::Loop(lp.id)));
        let loop_rows = rows.len();
        for &node in nodes {
            if let Some(slot) = node_to_row.get_mut(node.slot()) {
                *slot = Some(rows.len());
                rows.push(Equation::Node(node));
            }
        }

        Self {
            rows,
            loop_rows,
            node_to_row,
        }
    }

    /// Layout covering every loop and every node of the topology.
    pub fn all(topo: &Topology) -> Self {
        let nodes: Vec<NodeId> = topo.nodes().iter().map(|n| n.id).collect();
        Self::loops_then_nodes(topo, &nodes)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Equation] {
        &self.rows
    }

    pub fn equation(&self, row: usize) -> Option<Equation> {
        self.rows.get(row).copied()
    }

    pub fn loop_count(&self) -> usize {
        self.loop_rows
    }

    pub fn node_count(&self) -> usize {
        self.rows.len() - self.loop_rows
    }

    pub fn row_of_node(&self, id: NodeId) -> GraphResult<usize> {
        self.node_to_row
            .get(id.slot())
            .and_then(|&r| r)
            .ok_or(GraphError::IdNotFound { what: "NodeId" })
    }

    /// Human-readable label for a row, e.g. `loop A` or `node c`.
    pub fn describe(&self, topo: &Topology, row: usize) -> String {
        match self.equation(row) {
            Some(Equation::Loop(id)) => {
                format!("loop {}", topo.cycle(id).map_or("?", |l| l.name.as_str()))
            }
            Some(Equation::Node(id)) => format!("node {}", topo.node_name(id)),
            None => format!("row {row}"),
        }
    }
}
