//! Connected component analysis
//!
//! Three flavors over the same view-generic expansion: undirected
//! connectivity (every edge traversable both ways), forward reachability
//! and backward reachability. All of them come in a whole-graph form and a
//! seed-restricted form, and all return [`ValueSet`]s of vertex values.

use rustc_hash::FxHashSet;
use std::rc::Rc;

use crate::graph::membership::Vertex;
use crate::graph::store::Graph;
use crate::graph::types::VertexId;
use crate::graph::view::AdjacencyView;
use crate::set::ValueSet;

/// Connected components of `graph` under undirected reachability.
///
/// Without seeds, partitions the whole graph: every vertex lands in
/// exactly one component, isolated vertices in singleton components. With
/// seeds, returns only the components containing a seed; seeds sharing a
/// component produce one merged set, and a seed absent from the graph is
/// reported as its own singleton component, never dropped.
pub fn components<V: Vertex>(graph: &Graph<V>, seeds: Option<&[Rc<V>]>) -> Vec<ValueSet<V>> {
    collect(graph, &graph.undirected(), seeds, false)
}

/// Forward reachability sets of `graph`.
///
/// Follows edges in their stored direction only; this computes
/// reachability, not strong connectivity. Without seeds, expansion starts
/// from the view roots (vertices with no incoming edge), so vertices on
/// cycles unreachable from any root are not covered.
pub fn directed_components<V: Vertex>(graph: &Graph<V>, seeds: Option<&[Rc<V>]>) -> Vec<ValueSet<V>> {
    collect(graph, &graph.forward(), seeds, true)
}

/// Backward reachability sets: [`directed_components`] on the reverse
/// view.
pub fn reverse_directed_components<V: Vertex>(
    graph: &Graph<V>,
    seeds: Option<&[Rc<V>]>,
) -> Vec<ValueSet<V>> {
    collect(graph, &graph.reverse(), seeds, true)
}

fn collect<V, G>(
    graph: &Graph<V>,
    view: &G,
    seeds: Option<&[Rc<V>]>,
    from_roots: bool,
) -> Vec<ValueSet<V>>
where
    V: Vertex,
    G: AdjacencyView<V>,
{
    let mut visited: FxHashSet<VertexId> = FxHashSet::default();
    let mut result = Vec::new();

    match seeds {
        Some(seeds) => {
            for seed in seeds {
                match graph.descriptor_of(seed) {
                    None => {
                        // a seed outside the graph is its own component
                        let mut single = ValueSet::new();
                        single.insert(Rc::clone(seed));
                        result.push(single);
                    }
                    Some(v) => {
                        if visited.contains(&v) {
                            // already part of an earlier seed's component
                            continue;
                        }
                        result.push(expand(view, v, &mut visited));
                    }
                }
            }
        }
        None => {
            let ids = graph.vertex_ids();
            if from_roots {
                for v in ids {
                    if !visited.contains(&v) && view.in_edges(v).is_empty() {
                        result.push(expand(view, v, &mut visited));
                    }
                }
            } else {
                for v in ids {
                    if !visited.contains(&v) {
                        result.push(expand(view, v, &mut visited));
                    }
                }
            }
        }
    }
    result
}

// Reachability expansion from `start` under `view`, collecting the values
// of every newly discovered vertex.
fn expand<V, G>(view: &G, start: VertexId, visited: &mut FxHashSet<VertexId>) -> ValueSet<V>
where
    V: Vertex,
    G: AdjacencyView<V>,
{
    let graph = view.graph();
    let mut component = ValueSet::new();
    let mut stack = vec![start];
    visited.insert(start);

    while let Some(v) = stack.pop() {
        if let Some(value) = graph.value_by_id(v) {
            component.insert(value);
        }
        for edge in view.out_edges(v) {
            if visited.insert(edge.target) {
                stack.push(edge.target);
            }
        }
    }
    component
}
