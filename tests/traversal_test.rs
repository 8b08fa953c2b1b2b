use relgraph::{
    breadth_first, depth_first, Control, EdgeKind, Graph, GraphError, Membership, ValueSet,
    Vertex, VisitFilter,
};
use std::rc::Rc;

#[derive(Debug)]
struct Task {
    name: &'static str,
    graphs: Membership<Task>,
}

impl Vertex for Task {
    type Edge = u32;
    fn membership(&self) -> &Membership<Task> {
        &self.graphs
    }
}

fn task(name: &'static str) -> Rc<Task> {
    Rc::new(Task {
        name,
        graphs: Membership::default(),
    })
}

fn set_of(values: &[&Rc<Task>]) -> ValueSet<Task> {
    values.iter().map(|v| Rc::clone(v)).collect()
}

#[test]
fn test_dfs_edge_classification_on_diamondless_dag() {
    // a -> b, a -> c, b -> c: exactly one tree edge a -> b, one more tree
    // edge (a -> c or b -> c depending on visit order), and the remaining
    // edge is forward-or-cross. Never back: there is no cycle.
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    let c = task("c");
    g.link(&a, &b, 0).unwrap();
    g.link(&a, &c, 0).unwrap();
    g.link(&b, &c, 0).unwrap();

    let mut kinds = Vec::new();
    g.each_dfs(&a, VisitFilter::ALL, |source, target, _, kind| {
        kinds.push((source.name, target.name, kind));
        Control::Continue
    });

    assert_eq!(kinds.len(), 3);
    assert_eq!(
        kinds
            .iter()
            .filter(|(_, _, k)| *k == EdgeKind::Tree)
            .count(),
        2
    );
    assert_eq!(
        kinds
            .iter()
            .filter(|(_, _, k)| *k == EdgeKind::ForwardOrCross)
            .count(),
        1
    );
    assert!(kinds.iter().any(|(s, t, k)| *s == "a" && *t == "b" && *k == EdgeKind::Tree));
}

#[test]
fn test_dfs_prune_cuts_exactly_one_subtree() {
    //  r -> x -> d1 -> d2
    //  r -> s -> t
    let g: Graph<Task> = Graph::new();
    let r = task("r");
    let x = task("x");
    let d1 = task("d1");
    let d2 = task("d2");
    let s = task("s");
    let t = task("t");
    g.link(&r, &x, 0).unwrap();
    g.link(&x, &d1, 0).unwrap();
    g.link(&d1, &d2, 0).unwrap();
    g.link(&r, &s, 0).unwrap();
    g.link(&s, &t, 0).unwrap();

    let mut discovered = Vec::new();
    g.each_dfs(&r, VisitFilter::TREE, |_, target, _, _| {
        discovered.push(target.name);
        if target.name == "x" {
            Control::Prune
        } else {
            Control::Continue
        }
    });

    // nothing reachable only through x is visited, siblings are
    assert!(discovered.contains(&"x"));
    assert!(discovered.contains(&"s"));
    assert!(discovered.contains(&"t"));
    assert!(!discovered.contains(&"d1"));
    assert!(!discovered.contains(&"d2"));
}

#[test]
fn test_dfs_from_absent_root_is_noop() {
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    g.link(&a, &b, 0).unwrap();

    let outsider = task("outsider");
    let mut calls = 0;
    let completed = g.each_dfs(&outsider, VisitFilter::ALL, |_, _, _, _| {
        calls += 1;
        Control::Continue
    });
    assert!(completed);
    assert_eq!(calls, 0);
}

#[test]
fn test_bfs_rejects_asymmetric_non_tree_request() {
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    g.insert(&a);

    for bad in [
        VisitFilter::BACK,
        VisitFilter::FORWARD_OR_CROSS,
        VisitFilter::TREE | VisitFilter::BACK,
    ] {
        let err = g
            .each_bfs(&a, bad, |_, _, _, _| Control::Continue)
            .unwrap_err();
        assert_eq!(err, GraphError::InvalidEdgeFilter);
    }

    // both halves together are fine
    assert!(g
        .each_bfs(&a, VisitFilter::NON_TREE, |_, _, _, _| Control::Continue)
        .is_ok());
    assert!(g
        .each_bfs(&a, VisitFilter::ALL, |_, _, _, _| Control::Continue)
        .is_ok());
}

#[test]
fn test_bfs_discovers_in_breadth_order() {
    // r -> a -> c, r -> b: a and b are both discovered before c
    let g: Graph<Task> = Graph::new();
    let r = task("r");
    let a = task("a");
    let b = task("b");
    let c = task("c");
    g.link(&r, &a, 0).unwrap();
    g.link(&r, &b, 0).unwrap();
    g.link(&a, &c, 0).unwrap();

    let mut order = Vec::new();
    g.each_bfs(&r, VisitFilter::TREE, |_, target, _, _| {
        order.push(target.name);
        Control::Continue
    })
    .unwrap();

    let pos = |name| order.iter().position(|n| *n == name).unwrap();
    assert!(pos("a") < pos("c"));
    assert!(pos("b") < pos("c"));
}

#[test]
fn test_traversal_against_views() {
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    let c = task("c");
    g.link(&a, &b, 1).unwrap();
    g.link(&b, &c, 2).unwrap();

    // free functions and views compose the same way the wrappers do
    let mut forward = Vec::new();
    depth_first(&g.forward(), &a, VisitFilter::TREE, |_, target, _, _| {
        forward.push(target.name);
        Control::Continue
    });
    assert_eq!(forward, vec!["b", "c"]);

    let mut backward = Vec::new();
    depth_first(&g.reverse(), &c, VisitFilter::TREE, |_, target, _, _| {
        backward.push(target.name);
        Control::Continue
    });
    assert_eq!(backward, vec!["b", "a"]);

    let mut undirected = Vec::new();
    breadth_first(&g.undirected(), &b, VisitFilter::TREE, |_, target, _, _| {
        undirected.push(target.name);
        Control::Continue
    })
    .unwrap();
    assert_eq!(undirected.len(), 2);
    assert!(undirected.contains(&"a"));
    assert!(undirected.contains(&"c"));
}

#[test]
fn test_visitor_may_mutate_current_edge() {
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    let c = task("c");
    g.link(&a, &b, 0).unwrap();
    g.link(&b, &c, 0).unwrap();

    g.each_dfs(&a, VisitFilter::TREE, |source, target, _, _| {
        g.unlink(source, target);
        Control::Continue
    });
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.vertex_count(), 3);
}

#[test]
fn test_nested_traversal_reentrancy() {
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    let c = task("c");
    g.link(&a, &b, 0).unwrap();
    g.link(&b, &c, 0).unwrap();

    // a nested traversal over the same graph must not disturb the outer
    // one: color state is per invocation
    let mut outer_edges = 0;
    g.each_dfs(&a, VisitFilter::TREE, |_, _, _, _| {
        outer_edges += 1;
        let mut inner_edges = 0;
        g.each_dfs(&a, VisitFilter::TREE, |_, _, _, _| {
            inner_edges += 1;
            Control::Continue
        });
        assert_eq!(inner_edges, 2);
        Control::Continue
    });
    assert_eq!(outer_edges, 2);
}

#[test]
fn test_components_partition_roundtrip() {
    // two chains and one isolated vertex
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    let c = task("c");
    let d = task("d");
    let lone = task("lone");
    g.link(&a, &b, 0).unwrap();
    g.link(&c, &d, 0).unwrap();
    g.insert(&lone);

    let components = g.components(None);
    assert_eq!(components.len(), 3);
    assert!(components.contains(&set_of(&[&a, &b])));
    assert!(components.contains(&set_of(&[&c, &d])));
    assert!(components.contains(&set_of(&[&lone])));

    // pairwise disjoint, union covers the whole vertex set
    let total: usize = components.iter().map(ValueSet::len).sum();
    assert_eq!(total, g.vertex_count());
    for (i, left) in components.iter().enumerate() {
        for right in &components[i + 1..] {
            assert!(!left.intersects(right));
        }
    }
}

#[test]
fn test_directed_components_of_chain() {
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    let c = task("c");
    g.link(&a, &b, 0).unwrap();
    g.link(&b, &c, 0).unwrap();

    // root finding seeds the expansion at a
    assert_eq!(g.directed_components(None), vec![set_of(&[&a, &b, &c])]);
    assert_eq!(
        g.reverse_directed_components(None),
        vec![set_of(&[&a, &b, &c])]
    );
}

#[test]
fn test_seeded_components_merge_and_totality() {
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    let c = task("c");
    let d = task("d");
    g.link(&a, &b, 0).unwrap();
    g.link(&c, &d, 0).unwrap();
    let outsider = task("outsider");

    let components = g.components(Some(&[
        Rc::clone(&a),
        Rc::clone(&b),
        Rc::clone(&outsider),
        Rc::clone(&c),
    ]));

    // a and b merge into one set; the absent seed is a singleton
    assert_eq!(components.len(), 3);
    assert_eq!(components[0], set_of(&[&a, &b]));
    assert_eq!(components[1], set_of(&[&outsider]));
    assert_eq!(components[2], set_of(&[&c, &d]));
}

#[test]
fn test_directed_seed_reachability_restriction() {
    let g: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    let c = task("c");
    g.link(&a, &b, 0).unwrap();
    g.link(&b, &c, 0).unwrap();

    assert_eq!(
        g.directed_components(Some(&[Rc::clone(&b)])),
        vec![set_of(&[&b, &c])]
    );
    assert_eq!(
        g.reverse_directed_components(Some(&[Rc::clone(&b)])),
        vec![set_of(&[&a, &b])]
    );
}

#[test]
fn test_components_on_shared_vertices_are_per_graph() {
    // the same values form different component structures per graph
    let g1: Graph<Task> = Graph::new();
    let g2: Graph<Task> = Graph::new();
    let a = task("a");
    let b = task("b");
    let c = task("c");

    g1.link(&a, &b, 0).unwrap();
    g1.insert(&c);
    g2.link(&b, &c, 0).unwrap();
    g2.insert(&a);

    let c1 = g1.components(None);
    assert_eq!(c1.len(), 2);
    assert!(c1.contains(&set_of(&[&a, &b])));
    assert!(c1.contains(&set_of(&[&c])));

    let c2 = g2.components(None);
    assert_eq!(c2.len(), 2);
    assert!(c2.contains(&set_of(&[&b, &c])));
    assert!(c2.contains(&set_of(&[&a])));
}

#[test]
fn test_stop_terminates_early() {
    let g: Graph<Task> = Graph::new();
    let chain: Vec<_> = (0..10).map(|_| task("n")).collect();
    for pair in chain.windows(2) {
        g.link(&pair[0], &pair[1], 0).unwrap();
    }

    let mut seen = 0;
    let completed = g.each_dfs(&chain[0], VisitFilter::TREE, |_, _, _, _| {
        seen += 1;
        if seen == 3 {
            Control::Stop
        } else {
            Control::Continue
        }
    });
    assert!(!completed);
    assert_eq!(seen, 3);

    let mut seen = 0;
    let completed = g
        .each_bfs(&chain[0], VisitFilter::TREE, |_, _, _, _| {
            seen += 1;
            Control::Stop
        })
        .unwrap();
    assert!(!completed);
    assert_eq!(seen, 1);
}
