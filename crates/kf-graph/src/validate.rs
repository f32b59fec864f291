//! Loop traversal and connectivity validation.

use std::collections::VecDeque;

use kf_core::EdgeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{LoopStep, Topology};

const MIN_LOOP_LEN: usize = 3;

/// Resolve a loop given as ordered node names into traversal steps.
pub(crate) fn walk_nodes(topo: &Topology, name: &str, nodes: &[String]) -> GraphResult<Vec<LoopStep>> {
    if nodes.len() < MIN_LOOP_LEN {
        return Err(GraphError::LoopTooShort {
            name: name.to_string(),
            len: nodes.len(),
        });
    }
    for node in nodes {
        if topo.node_by_name(node).is_none() {
            return Err(GraphError::UnknownNode { name: node.clone() });
        }
    }

    let mut steps = Vec::with_capacity(nodes.len());
    for (i, from) in nodes.iter().enumerate() {
        let to = &nodes[(i + 1) % nodes.len()];
        let (edge, direction) =
            topo.edge_between(from, to)
                .ok_or_else(|| GraphError::NoEdge {
                    from: from.clone(),
                    to: to.clone(),
                })?;
        steps.push(LoopStep { edge, direction });
    }
    Ok(steps)
}

/// Resolve a loop given as ordered edges into traversal steps.
///
/// The walk keeps a current-node pointer starting at the first edge's start
/// node (or its end node, when only that end meets the second edge) and
/// advances it to each edge's far endpoint.
pub(crate) fn walk_edges(topo: &Topology, name: &str, edges: &[EdgeId]) -> GraphResult<Vec<LoopStep>> {
    if edges.len() < MIN_LOOP_LEN {
        return Err(GraphError::LoopTooShort {
            name: name.to_string(),
            len: edges.len(),
        });
    }
    let resolved = edges
        .iter()
        .map(|&id| topo.edge(id).ok_or(GraphError::IdNotFound { what: "EdgeId" }))
        .collect::<GraphResult<Vec<_>>>()?;

    let first = resolved[0];
    let second = resolved[1];
    let origin = if second.touches(first.end) {
        first.start
    } else {
        first.end
    };

    let mut steps = Vec::with_capacity(resolved.len());
    let mut at = origin;
    for edge in resolved {
        let direction = edge.direction_from(at).ok_or_else(|| GraphError::LoopBroken {
            name: name.to_string(),
            edge: edge.name.clone(),
            at: topo.node_name(at).to_string(),
        })?;
        steps.push(LoopStep {
            edge: edge.id,
            direction,
        });
        at = edge.other_end(at).unwrap_or(at);
    }

    if at != origin {
        return Err(GraphError::LoopNotClosed {
            name: name.to_string(),
        });
    }
    Ok(steps)
}

/// Number of connected components (breadth-first flood fill).
pub(crate) fn component_count(topo: &Topology) -> usize {
    let n = topo.nodes().len();
    let mut seen = vec![false; n];
    let mut count = 0;

    for root in topo.nodes() {
        if seen[root.id.slot()] {
            continue;
        }
        count += 1;
        seen[root.id.slot()] = true;
        let mut queue = VecDeque::from([root.id]);
        while let Some(node) = queue.pop_front() {
            for &eid in topo.node_edges(node) {
                let Some(next) = topo.edge(eid).and_then(|e| e.other_end(node)) else {
                    continue;
                };
                if !seen[next.slot()] {
                    seen[next.slot()] = true;
                    queue.push_back(next);
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use crate::builder::TopologyBuilder;
    use crate::error::GraphError;
    use crate::graph::Direction;

    fn square() -> TopologyBuilder {
        let mut b = TopologyBuilder::new();
        b.add_edge("a", "b").unwrap();
        b.add_edge("b", "c").unwrap();
        b.add_edge("c", "d").unwrap();
        b.add_edge("a", "d").unwrap();
        b
    }

    #[test]
    fn edge_loop_walks_pointer() {
        let mut b = square();
        let ab = b.find_edge("a", "b").unwrap();
        let bc = b.find_edge("b", "c").unwrap();
        let cd = b.find_edge("c", "d").unwrap();
        let ad = b.find_edge("a", "d").unwrap();
        b.add_loop_of_edges("sq", vec![ab, bc, cd, ad]);
        let topo = b.build().unwrap();

        let dirs: Vec<_> = topo.loops()[0].steps.iter().map(|s| s.direction).collect();
        assert_eq!(
            dirs,
            vec![
                Direction::Forward,
                Direction::Forward,
                Direction::Forward,
                Direction::Reverse
            ]
        );
    }

    #[test]
    fn edge_loop_may_start_from_end_node() {
        let mut b = square();
        let ab = b.find_edge("a", "b").unwrap();
        let bc = b.find_edge("b", "c").unwrap();
        let cd = b.find_edge("c", "d").unwrap();
        let ad = b.find_edge("a", "d").unwrap();
        // a-d walked d->a first, then a->b ...
        b.add_loop_of_edges("sq", vec![ad, ab, bc, cd]);
        let topo = b.build().unwrap();
        assert_eq!(topo.loops()[0].steps[0].direction, Direction::Reverse);
    }

    #[test]
    fn broken_edge_loop_rejected() {
        let mut b = square();
        b.add_edge("c", "e").unwrap();
        let ab = b.find_edge("a", "b").unwrap();
        let ce = b.find_edge("c", "e").unwrap();
        let ad = b.find_edge("a", "d").unwrap();
        b.add_loop_of_edges("bad", vec![ab, ce, ad]);
        assert!(matches!(b.build(), Err(GraphError::LoopBroken { .. })));
    }

    #[test]
    fn open_edge_path_rejected() {
        let mut b = square();
        let ab = b.find_edge("a", "b").unwrap();
        let bc = b.find_edge("b", "c").unwrap();
        let cd = b.find_edge("c", "d").unwrap();
        b.add_loop_of_edges("open", vec![ab, bc, cd]);
        assert!(matches!(b.build(), Err(GraphError::LoopNotClosed { .. })));
    }

    #[test]
    fn node_loop_missing_edge_rejected() {
        let mut b = square();
        b.add_loop_through_nodes("diag", &["a", "b", "d"]);
        assert!(matches!(b.build(), Err(GraphError::NoEdge { .. })));
    }

    #[test]
    fn short_loop_rejected() {
        let mut b = square();
        b.add_loop_through_nodes("tiny", &["a", "b"]);
        assert!(matches!(
            b.build(),
            Err(GraphError::LoopTooShort { len: 2, .. })
        ));
    }

    #[test]
    fn connectivity_and_cyclomatic_number() {
        let topo = square().build().unwrap();
        assert!(topo.is_connected());
        assert_eq!(topo.cyclomatic_number(), 1);

        let mut b = square();
        b.add_edge("x", "y").unwrap();
        let split = b.build().unwrap();
        assert!(!split.is_connected());
        assert_eq!(split.cyclomatic_number(), 1);
    }
}
