//! Incremental topology builder.

use std::collections::HashMap;

use kf_core::{EdgeId, Id, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, Loop, Node, Topology, canonical_pair, edge_name};
use crate::validate;

/// How a loop was described before validation.
#[derive(Debug, Clone)]
enum LoopSpec {
    /// Ordered node names; the walk closes from the last node back to the first.
    Nodes(Vec<String>),
    /// Ordered edges; the walk starts at the first edge's start node.
    Edges(Vec<EdgeId>),
}

/// Builder for constructing a topology incrementally.
///
/// Use `add_node`, `add_edge` and the `add_loop_*` methods to describe the
/// network, then call `build()` to validate loops and freeze it.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    loops: Vec<(String, LoopSpec)>,
    node_lookup: HashMap<String, NodeId>,
    edge_lookup: HashMap<(NodeId, NodeId), EdgeId>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or return the existing id if the name is already known.
    pub fn add_node(&mut self, name: impl Into<String>) -> GraphResult<NodeId> {
        let name = name.into();
        if let Some(&id) = self.node_lookup.get(&name) {
            return Ok(id);
        }
        let id = next_id(self.nodes.len(), "nodes")?;
        self.node_lookup.insert(name.clone(), id);
        self.nodes.push(Node { id, name });
        Ok(id)
    }

    /// Add an undirected edge between two nodes, creating them as needed.
    ///
    /// The edge is stored with its endpoints in canonical order, so
    /// `add_edge("b", "a")` yields an edge named `a-b` starting at `a`.
    pub fn add_edge(&mut self, a: &str, b: &str) -> GraphResult<EdgeId> {
        if a == b {
            return Err(GraphError::SelfLoop { node: a.to_string() });
        }
        let (first, second) = canonical_pair(a, b);
        let start = self.add_node(first)?;
        let end = self.add_node(second)?;
        if self.edge_lookup.contains_key(&(start, end)) {
            return Err(GraphError::DuplicateEdge {
                name: edge_name(a, b),
            });
        }

        let id = next_id(self.edges.len(), "edges")?;
        self.edge_lookup.insert((start, end), id);
        self.edges.push(Edge {
            id,
            name: edge_name(a, b),
            start,
            end,
        });
        Ok(id)
    }

    /// Find an already-added edge joining two nodes, in either order.
    pub fn find_edge(&self, a: &str, b: &str) -> Option<EdgeId> {
        let (first, second) = canonical_pair(a, b);
        let start = self.node_lookup.get(first)?;
        let end = self.node_lookup.get(second)?;
        self.edge_lookup.get(&(*start, *end)).copied()
    }

    /// Declare a loop as an ordered list of node names.
    ///
    /// Consecutive names and the final (last, first) pair must each be joined
    /// by an edge. Checked at `build()`.
    pub fn add_loop_through_nodes(
        &mut self,
        name: impl Into<String>,
        nodes: &[&str],
    ) -> &mut Self {
        let nodes = nodes.iter().map(|n| n.to_string()).collect();
        self.loops.push((name.into(), LoopSpec::Nodes(nodes)));
        self
    }

    /// Declare a loop as an ordered list of edges.
    ///
    /// Consecutive edges must share an endpoint and the last edge must lead
    /// back to where the walk started. Checked at `build()`.
    pub fn add_loop_of_edges(
        &mut self,
        name: impl Into<String>,
        edges: Vec<EdgeId>,
    ) -> &mut Self {
        self.loops.push((name.into(), LoopSpec::Edges(edges)));
        self
    }

    /// Validate loops and build the immutable `Topology`.
    pub fn build(self) -> GraphResult<Topology> {
        let (node_edge_offsets, node_edges) = Self::build_adjacency(&self.nodes, &self.edges);

        let mut topo = Topology {
            nodes: self.nodes,
            edges: self.edges,
            loops: Vec::with_capacity(self.loops.len()),
            node_edge_offsets,
            node_edges,
        };

        for (i, (name, spec)) in self.loops.into_iter().enumerate() {
            if topo.loops.iter().any(|l| l.name == name) {
                return Err(GraphError::DuplicateLoop { name });
            }
            let steps = match spec {
                LoopSpec::Nodes(nodes) => validate::walk_nodes(&topo, &name, &nodes)?,
                LoopSpec::Edges(edges) => validate::walk_edges(&topo, &name, &edges)?,
            };
            topo.loops.push(Loop {
                id: next_id(i, "loops")?,
                name,
                steps,
            });
        }

        Ok(topo)
    }

    /// Build compact adjacency lists: for each node, collect its incident edges.
    fn build_adjacency(nodes: &[Node], edges: &[Edge]) -> (Vec<usize>, Vec<EdgeId>) {
        let mut node_to_edges: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
        for edge in edges {
            node_to_edges.entry(edge.start).or_default().push(edge.id);
            node_to_edges.entry(edge.end).or_default().push(edge.id);
        }

        // Sort each node's edge list for determinism
        for list in node_to_edges.values_mut() {
            list.sort_by_key(|e| e.index());
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0);

        for node in nodes {
            if let Some(list) = node_to_edges.get(&node.id) {
                flat.extend_from_slice(list);
            }
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}

fn next_id(len: usize, what: &'static str) -> GraphResult<Id> {
    Id::try_from_usize(len).map_err(|_| GraphError::TooMany { what })
}
