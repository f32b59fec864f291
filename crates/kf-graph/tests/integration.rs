//! Integration tests for kf-graph.

use kf_graph::{Direction, Equation, GraphError, ResidualLayout, TopologyBuilder};

/// The eight-node, ten-pipe grid from the pipe network assignment.
fn pipe_grid() -> TopologyBuilder {
    let mut b = TopologyBuilder::new();
    for (s, e) in [
        ("a", "b"),
        ("a", "c"),
        ("b", "e"),
        ("c", "d"),
        ("c", "f"),
        ("d", "e"),
        ("d", "g"),
        ("e", "h"),
        ("f", "g"),
        ("g", "h"),
    ] {
        b.add_edge(s, e).unwrap();
    }
    b
}

#[test]
fn pipe_grid_loops_validate() {
    let mut b = pipe_grid();
    let e = |b: &TopologyBuilder, x: &str, y: &str| b.find_edge(x, y).unwrap();
    let loop_a = vec![
        e(&b, "a", "b"),
        e(&b, "b", "e"),
        e(&b, "d", "e"),
        e(&b, "c", "d"),
        e(&b, "a", "c"),
    ];
    let loop_b = vec![e(&b, "c", "d"), e(&b, "d", "g"), e(&b, "f", "g"), e(&b, "c", "f")];
    let loop_c = vec![e(&b, "d", "e"), e(&b, "e", "h"), e(&b, "g", "h"), e(&b, "d", "g")];
    b.add_loop_of_edges("A", loop_a);
    b.add_loop_of_edges("B", loop_b);
    b.add_loop_of_edges("C", loop_c);
    let topo = b.build().unwrap();

    assert_eq!(topo.nodes().len(), 8);
    assert_eq!(topo.edges().len(), 10);
    assert!(topo.is_connected());
    assert_eq!(topo.cyclomatic_number(), 3);

    // Loop A: a->b, b->e, e->d, d->c, c->a
    let dirs: Vec<_> = topo.loops()[0].steps.iter().map(|s| s.direction).collect();
    assert_eq!(
        dirs,
        vec![
            Direction::Forward,
            Direction::Forward,
            Direction::Reverse,
            Direction::Reverse,
            Direction::Reverse
        ]
    );
}

#[test]
fn undirected_lookup_symmetry() {
    let topo = pipe_grid().build().unwrap();
    let (fwd, d1) = topo.edge_between("a", "b").unwrap();
    let (rev, d2) = topo.edge_between("b", "a").unwrap();
    assert_eq!(fwd, rev);
    assert_eq!(d1, d2.reversed());
    assert_eq!(topo.edge_by_name("b-a"), Some(fwd));
    assert_eq!(topo.edge_by_name("a-b"), Some(fwd));
    assert!(topo.edge_between("a", "h").is_none());
}

#[test]
fn layout_over_grid() {
    let mut b = pipe_grid();
    b.add_loop_through_nodes("B", &["c", "d", "g", "f"]);
    let topo = b.build().unwrap();
    let layout = ResidualLayout::all(&topo);
    assert_eq!(layout.len(), 9);
    assert_eq!(layout.rows()[0], Equation::Loop(topo.loop_by_name("B").unwrap()));
}

#[test]
fn duplicate_loop_names_rejected() {
    let mut b = pipe_grid();
    b.add_loop_through_nodes("B", &["c", "d", "g", "f"]);
    b.add_loop_through_nodes("B", &["d", "e", "h", "g"]);
    assert!(matches!(b.build(), Err(GraphError::DuplicateLoop { .. })));
}
