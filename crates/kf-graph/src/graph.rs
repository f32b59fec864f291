//! Core topology data structures.

use kf_core::{EdgeId, LoopId, NodeId};

/// Which way a traversal walks an edge relative to its canonical orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Walking from the edge's start node to its end node.
    Forward,
    /// Walking from the edge's end node to its start node.
    Reverse,
}

impl Direction {
    /// +1 for forward, -1 for reverse.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Order a pair of node names canonically (lexicographically smaller first).
///
/// Edge identity is undirected: `(a, b)` and `(b, a)` map to the same pair.
pub fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Canonical display name of the edge joining two nodes, e.g. `a-b`.
pub fn edge_name(a: &str, b: &str) -> String {
    let (start, end) = canonical_pair(a, b);
    format!("{start}-{end}")
}

/// A named junction point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

/// An undirected connection between two nodes, stored in canonical order.
///
/// `start` always names the lexicographically smaller node. Physical flow
/// direction is carried by the sign of the element's state, never by the
/// label order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub name: String,
    pub start: NodeId,
    pub end: NodeId,
}

impl Edge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.start == node || self.end == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint at all.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.start {
            Some(self.end)
        } else if node == self.end {
            Some(self.start)
        } else {
            None
        }
    }

    /// Direction of a walk that leaves this edge's `node` endpoint.
    pub fn direction_from(&self, node: NodeId) -> Option<Direction> {
        if node == self.start {
            Some(Direction::Forward)
        } else if node == self.end {
            Some(Direction::Reverse)
        } else {
            None
        }
    }

    /// Sign of this edge's flow as seen arriving at `node`.
    ///
    /// Positive flow runs start to end, so it leaves the start node (-1) and
    /// arrives at the end node (+1). Nodes not on the edge see nothing (0).
    pub fn inflow_sign(&self, node: NodeId) -> f64 {
        if node == self.start {
            -1.0
        } else if node == self.end {
            1.0
        } else {
            0.0
        }
    }
}

/// One element of a loop traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopStep {
    pub edge: EdgeId,
    pub direction: Direction,
}

/// A closed traversal path. Step order defines the sign convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub id: LoopId,
    pub name: String,
    pub steps: Vec<LoopStep>,
}

/// A validated, immutable network topology.
///
/// Edge and node ids are dense, so `id.slot()` is a stable position in any
/// per-edge or per-node vector for the lifetime of the topology.
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) loops: Vec<Loop>,

    /// Node i's edges are in node_edges[node_edge_offsets[i]..node_edge_offsets[i+1]].
    pub(crate) node_edge_offsets: Vec<usize>,
    pub(crate) node_edges: Vec<EdgeId>,
}

impl Topology {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.slot())
    }

    pub fn cycle(&self, id: LoopId) -> Option<&Loop> {
        self.loops.get(id.slot())
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    pub fn loop_by_name(&self, name: &str) -> Option<LoopId> {
        self.loops.iter().find(|l| l.name == name).map(|l| l.id)
    }

    /// Resolve a directed hop `from -> to` to the edge occupying it.
    ///
    /// Either orientation resolves to the same edge; the returned direction
    /// says whether the hop follows the canonical orientation.
    pub fn edge_between(&self, from: &str, to: &str) -> Option<(EdgeId, Direction)> {
        let from_id = self.node_by_name(from)?;
        let to_id = self.node_by_name(to)?;
        self.node_edges(from_id).iter().find_map(|&eid| {
            let edge = &self.edges[eid.slot()];
            if edge.other_end(from_id) == Some(to_id) {
                edge.direction_from(from_id).map(|dir| (eid, dir))
            } else {
                None
            }
        })
    }

    /// Look up an edge by its display name, accepting `a-b` or `b-a`.
    pub fn edge_by_name(&self, name: &str) -> Option<EdgeId> {
        let (a, b) = name.split_once('-')?;
        self.edge_between(a.trim(), b.trim()).map(|(id, _)| id)
    }

    /// Edges incident to a node.
    pub fn node_edges(&self, node: NodeId) -> &[EdgeId] {
        let idx = node.slot();
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.node_edge_offsets[idx];
        let end = self.node_edge_offsets[idx + 1];
        &self.node_edges[start..end]
    }

    /// Name of a node, or `?` for an id from another topology.
    pub fn node_name(&self, id: NodeId) -> &str {
        self.node(id).map_or("?", |n| n.name.as_str())
    }

    /// Name of an edge, or `?` for an id from another topology.
    pub fn edge_label(&self, id: EdgeId) -> &str {
        self.edge(id).map_or("?", |e| e.name.as_str())
    }

    /// Whether every node can reach every other node.
    pub fn is_connected(&self) -> bool {
        crate::validate::component_count(self) <= 1
    }

    /// Number of independent loops a connected graph of this size admits
    /// (edges - nodes + 1).
    pub fn cyclomatic_number(&self) -> usize {
        let components = crate::validate::component_count(self);
        (self.edges.len() + components).saturating_sub(self.nodes.len())
    }
}
