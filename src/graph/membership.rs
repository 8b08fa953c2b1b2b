//! Vertex capability and the per-value membership index
//!
//! Any value can participate as a vertex in any number of graphs at once.
//! The value embeds a [`Membership`] index mapping each graph it belongs to
//! onto its slot handle in that graph; the index is what makes cross-graph
//! queries possible without the graphs knowing about each other.
//!
//! The index holds only non-owning back-references to graphs. A graph owns
//! its vertices (it keeps an `Rc` clone of every member value alive), a
//! vertex never keeps a graph alive.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::graph::store::{Graph, GraphInner};
use crate::graph::types::{GraphId, VertexId};
use crate::set::ValueSet;

/// Capability for values used as graph vertices.
///
/// Implementors embed a [`Membership`] field and pick the edge payload type
/// of their graph family:
///
/// ```
/// use relgraph::{Membership, Vertex};
///
/// struct Task {
///     graphs: Membership<Task>,
/// }
///
/// impl Vertex for Task {
///     type Edge = u32;
///     fn membership(&self) -> &Membership<Task> {
///         &self.graphs
///     }
/// }
/// ```
pub trait Vertex: Sized {
    /// Payload attached to every edge of graphs over this vertex type.
    type Edge;

    /// The membership index embedded in this value.
    fn membership(&self) -> &Membership<Self>;
}

pub(crate) struct Entry<V: Vertex> {
    pub(crate) graph: Weak<RefCell<GraphInner<V>>>,
    pub(crate) vertex: VertexId,
}

/// Per-value index of graph memberships: graph identity to slot handle.
///
/// Starts empty and allocation-free; entries are added when the value is
/// inserted into a graph and removed when it is removed, when the graph is
/// cleared, or when the graph itself is dropped.
pub struct Membership<V: Vertex> {
    entries: RefCell<IndexMap<GraphId, Entry<V>>>,
}

impl<V: Vertex> Membership<V> {
    pub fn new() -> Self {
        Membership {
            entries: RefCell::new(IndexMap::new()),
        }
    }

    /// Number of graphs the owning value currently belongs to.
    pub fn graph_count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// True iff the owning value participates in no graph.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Slot handle of the owning value in `graph`, if registered there.
    pub(crate) fn lookup(&self, graph: GraphId) -> Option<VertexId> {
        self.entries.borrow().get(&graph).map(|entry| entry.vertex)
    }

    pub(crate) fn register(
        &self,
        graph: GraphId,
        inner: Weak<RefCell<GraphInner<V>>>,
        vertex: VertexId,
    ) {
        self.entries.borrow_mut().insert(
            graph,
            Entry {
                graph: inner,
                vertex,
            },
        );
    }

    pub(crate) fn deregister(&self, graph: GraphId) -> Option<VertexId> {
        self.entries
            .borrow_mut()
            .shift_remove(&graph)
            .map(|entry| entry.vertex)
    }

    /// Stable copy of the current entries, for iteration that must survive
    /// the visitor deregistering the entry being visited.
    pub(crate) fn snapshot(&self) -> Vec<(GraphId, Weak<RefCell<GraphInner<V>>>, VertexId)> {
        self.entries
            .borrow()
            .iter()
            .map(|(id, entry)| (*id, entry.graph.clone(), entry.vertex))
            .collect()
    }
}

impl<V: Vertex> Default for Membership<V> {
    fn default() -> Self {
        Membership::new()
    }
}

impl<V: Vertex> fmt::Debug for Membership<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.borrow().keys()).finish()
    }
}

/// Cross-graph vertex queries, available on every [`Vertex`] implementor.
///
/// Each query either restricts itself to one graph (`Some(graph)`) or ranges
/// over every graph the vertex belongs to (`None`).
pub trait VertexExt: Vertex {
    /// Iterates over all graphs this value is part of.
    ///
    /// The visitor may remove the value from the graph currently being
    /// visited.
    fn each_graph(&self, mut f: impl FnMut(&Graph<Self>)) {
        for (_, weak, _) in self.membership().snapshot() {
            if let Some(inner) = weak.upgrade() {
                f(&Graph::from_inner(inner));
            }
        }
    }

    /// All graphs this value is part of.
    fn graphs(&self) -> Vec<Graph<Self>> {
        self.membership()
            .snapshot()
            .into_iter()
            .filter_map(|(_, weak, _)| weak.upgrade().map(Graph::from_inner))
            .collect()
    }

    /// Is `parent` a parent of this value, in `graph` or in any graph both
    /// belong to?
    fn has_parent(&self, parent: &Self, graph: Option<&Graph<Self>>) -> bool {
        match graph {
            Some(graph) => graph.linked(parent, self),
            None => self
                .membership()
                .snapshot()
                .into_iter()
                .any(|(id, weak, vertex)| {
                    let Some(inner) = weak.upgrade() else {
                        return false;
                    };
                    let Some(parent_id) = parent.membership().lookup(id) else {
                        return false;
                    };
                    let result = inner.borrow().has_edge(parent_id, vertex);
                    result
                }),
        }
    }

    /// Is `child` a child of this value, in `graph` or in any graph both
    /// belong to?
    fn has_child(&self, child: &Self, graph: Option<&Graph<Self>>) -> bool {
        child.has_parent(self, graph)
    }

    /// Is there an edge between this value and `other`, in either
    /// direction?
    fn related_to(&self, other: &Self, graph: Option<&Graph<Self>>) -> bool {
        self.has_parent(other, graph) || self.has_child(other, graph)
    }

    /// Iterates over the parents of this value, de-duplicated when ranging
    /// over all graphs.
    fn each_parent(&self, graph: Option<&Graph<Self>>, mut f: impl FnMut(&Rc<Self>)) {
        match graph {
            Some(graph) => {
                for value in graph.parents_of(self) {
                    f(&value);
                }
            }
            None => {
                let mut seen = ValueSet::new();
                for graph in self.graphs() {
                    for value in graph.parents_of(self) {
                        if seen.insert(Rc::clone(&value)) {
                            f(&value);
                        }
                    }
                }
            }
        }
    }

    /// Iterates over the children of this value, de-duplicated when ranging
    /// over all graphs.
    fn each_child(&self, graph: Option<&Graph<Self>>, mut f: impl FnMut(&Rc<Self>)) {
        match graph {
            Some(graph) => {
                for value in graph.children_of(self) {
                    f(&value);
                }
            }
            None => {
                let mut seen = ValueSet::new();
                for graph in self.graphs() {
                    for value in graph.children_of(self) {
                        if seen.insert(Rc::clone(&value)) {
                            f(&value);
                        }
                    }
                }
            }
        }
    }

    /// No incoming edge in `graph`, or in every graph this value belongs
    /// to. Vacuously true when the value is not in the queried graph, and
    /// when it belongs to no graph at all.
    fn is_root(&self, graph: Option<&Graph<Self>>) -> bool {
        match graph {
            Some(graph) => graph.is_root(self),
            None => self
                .membership()
                .snapshot()
                .into_iter()
                .all(|(_, weak, vertex)| match weak.upgrade() {
                    None => true,
                    Some(inner) => inner.borrow().in_degree(vertex) == 0,
                }),
        }
    }

    /// No outgoing edge in `graph`, or in every graph this value belongs
    /// to. Vacuous truth as for [`VertexExt::is_root`].
    fn is_leaf(&self, graph: Option<&Graph<Self>>) -> bool {
        match graph {
            Some(graph) => graph.is_leaf(self),
            None => self
                .membership()
                .snapshot()
                .into_iter()
                .all(|(_, weak, vertex)| match weak.upgrade() {
                    None => true,
                    Some(inner) => inner.borrow().out_degree(vertex) == 0,
                }),
        }
    }

    /// True iff no graph this value belongs to has an edge touching it.
    fn is_singleton(&self) -> bool {
        self.membership()
            .snapshot()
            .into_iter()
            .all(|(_, weak, vertex)| match weak.upgrade() {
                None => true,
                Some(inner) => {
                    let inner = inner.borrow();
                    inner.in_degree(vertex) == 0 && inner.out_degree(vertex) == 0
                }
            })
    }
}

impl<V: Vertex> VertexExt for V {}
