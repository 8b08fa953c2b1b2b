//! In-memory graph storage
//!
//! [`Graph`] owns the adjacency structure: a slot arena holding one entry
//! per member vertex, with set-based in/out adjacency (at most one edge per
//! ordered vertex pair) and the edge payload stored on the source side.
//! All public operations are keyed by vertex value, resolved through the
//! value's [`Membership`](crate::Membership) index; slot handles never
//! cross the API boundary.
//!
//! A `Graph` is a cheap-to-clone handle. Mutation never requires `&mut`:
//! the interior is single-threaded shared state, which is what lets a
//! visitor callback mutate the graph it is being called from. No interior
//! borrow is ever held across a visitor call.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::algo::components as component_analysis;
use crate::algo::search::{self, Control, EdgeKind, VisitFilter};
use crate::error::{GraphError, GraphResult};
use crate::graph::membership::Vertex;
use crate::graph::types::{GraphId, VertexId};
use crate::graph::view::{Forward, Reverse, Undirected};
use crate::set::ValueSet;

pub(crate) struct Slot<V: Vertex> {
    value: Rc<V>,
    /// Outgoing adjacency; the payload of edge (v, t) lives here under t.
    out: BTreeMap<VertexId, V::Edge>,
    inc: BTreeSet<VertexId>,
}

pub(crate) struct GraphInner<V: Vertex> {
    pub(crate) id: GraphId,
    name: Option<String>,
    slots: Vec<Option<Slot<V>>>,
    free: Vec<u32>,
}

impl<V: Vertex> GraphInner<V> {
    fn new(name: Option<String>) -> Self {
        GraphInner {
            id: GraphId::fresh(),
            name,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Human-readable graph label for diagnostics.
    pub(crate) fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.id.as_u64()),
        }
    }

    fn alloc(&mut self, value: Rc<V>) -> VertexId {
        let slot = Slot {
            value,
            out: BTreeMap::new(),
            inc: BTreeSet::new(),
        };
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(slot);
                VertexId(index)
            }
            None => {
                self.slots.push(Some(slot));
                VertexId((self.slots.len() - 1) as u32)
            }
        }
    }

    fn slot(&self, v: VertexId) -> Option<&Slot<V>> {
        self.slots.get(v.index()).and_then(|slot| slot.as_ref())
    }

    fn slot_mut(&mut self, v: VertexId) -> Option<&mut Slot<V>> {
        self.slots.get_mut(v.index()).and_then(|slot| slot.as_mut())
    }

    /// Remove every edge incident to `v`, in both directions.
    fn detach(&mut self, v: VertexId) {
        let (out, inc) = match self.slot_mut(v) {
            Some(slot) => (std::mem::take(&mut slot.out), std::mem::take(&mut slot.inc)),
            None => return,
        };
        for target in out.keys() {
            if let Some(slot) = self.slot_mut(*target) {
                slot.inc.remove(&v);
            }
        }
        for source in inc {
            if let Some(slot) = self.slot_mut(source) {
                slot.out.remove(&v);
            }
        }
    }

    pub(crate) fn has_edge(&self, source: VertexId, target: VertexId) -> bool {
        self.slot(source)
            .map_or(false, |slot| slot.out.contains_key(&target))
    }

    pub(crate) fn in_degree(&self, v: VertexId) -> usize {
        self.slot(v).map_or(0, |slot| slot.inc.len())
    }

    pub(crate) fn out_degree(&self, v: VertexId) -> usize {
        self.slot(v).map_or(0, |slot| slot.out.len())
    }

    fn vertex_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    fn edge_count(&self) -> usize {
        self.slots.iter().flatten().map(|slot| slot.out.len()).sum()
    }

    fn live_ids(&self) -> Vec<VertexId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|_| VertexId(index as u32)))
            .collect()
    }
}

impl<V: Vertex> Drop for GraphInner<V> {
    fn drop(&mut self) {
        // Proactive teardown: a discarded graph leaves no membership entry
        // behind, only inert ids.
        for slot in self.slots.iter().flatten() {
            slot.value.membership().deregister(self.id);
        }
    }
}

/// A directed graph over shared vertex values.
///
/// The graph keeps an `Rc` clone of every member value, so a value stays
/// alive at least as long as it has membership here. Vertex identity is
/// `Rc` pointer identity throughout.
pub struct Graph<V: Vertex> {
    inner: Rc<RefCell<GraphInner<V>>>,
}

impl<V: Vertex> Graph<V> {
    /// Create an empty, unnamed graph.
    pub fn new() -> Self {
        Graph {
            inner: Rc::new(RefCell::new(GraphInner::new(None))),
        }
    }

    /// Create an empty graph carrying a debug name.
    pub fn named(name: impl Into<String>) -> Self {
        Graph {
            inner: Rc::new(RefCell::new(GraphInner::new(Some(name.into())))),
        }
    }

    pub(crate) fn from_inner(inner: Rc<RefCell<GraphInner<V>>>) -> Self {
        Graph { inner }
    }

    pub fn id(&self) -> GraphId {
        self.inner.borrow().id
    }

    pub fn name(&self) -> Option<String> {
        self.inner.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.borrow_mut().name = Some(name.into());
    }

    fn label(&self) -> String {
        self.inner.borrow().label()
    }

    /// Add `value` as an unconnected vertex. Idempotent: returns true iff
    /// the value was not already a member.
    pub fn insert(&self, value: &Rc<V>) -> bool {
        let mut inner = self.inner.borrow_mut();
        if value.membership().lookup(inner.id).is_some() {
            return false;
        }
        let vertex = inner.alloc(Rc::clone(value));
        value
            .membership()
            .register(inner.id, Rc::downgrade(&self.inner), vertex);
        trace!(graph = %inner.label(), %vertex, "vertex inserted");
        true
    }

    /// Remove `value` and every edge touching it. Returns true iff the
    /// value was a member; removing an absent value is a no-op.
    pub fn remove(&self, value: &V) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(vertex) = value.membership().deregister(inner.id) else {
            return false;
        };
        inner.detach(vertex);
        if let Some(slot) = inner.slots.get_mut(vertex.index()) {
            *slot = None;
        }
        inner.free.push(vertex.0);
        trace!(graph = %inner.label(), %vertex, "vertex removed");
        true
    }

    pub fn contains(&self, value: &V) -> bool {
        value.membership().lookup(self.id()).is_some()
    }

    /// Add a directed edge from `source` to `target` carrying `payload`.
    ///
    /// Either endpoint not yet in the graph is inserted first; that
    /// insertion stands even when the link itself fails. Linking an
    /// already-linked pair fails with [`GraphError::DuplicateEdge`] and
    /// leaves the existing payload untouched.
    pub fn link(&self, source: &Rc<V>, target: &Rc<V>, payload: V::Edge) -> GraphResult<()> {
        self.insert(source);
        self.insert(target);

        let mut inner = self.inner.borrow_mut();
        let id = inner.id;
        let (Some(s), Some(t)) = (
            source.membership().lookup(id),
            target.membership().lookup(id),
        ) else {
            return Err(GraphError::VertexNotInGraph {
                graph: inner.label(),
            });
        };
        if inner.has_edge(s, t) {
            return Err(GraphError::DuplicateEdge {
                graph: inner.label(),
            });
        }
        if let Some(slot) = inner.slot_mut(s) {
            slot.out.insert(t, payload);
        }
        if let Some(slot) = inner.slot_mut(t) {
            slot.inc.insert(s);
        }
        trace!(graph = %inner.label(), source = %s, target = %t, "edge linked");
        Ok(())
    }

    /// Remove the edge from `source` to `target` if it exists. Returns
    /// true iff an edge was removed; absent endpoints or an absent edge
    /// are a no-op, not an error.
    pub fn unlink(&self, source: &V, target: &V) -> bool {
        let mut inner = self.inner.borrow_mut();
        let id = inner.id;
        let (Some(s), Some(t)) = (
            source.membership().lookup(id),
            target.membership().lookup(id),
        ) else {
            return false;
        };
        let removed = inner
            .slot_mut(s)
            .map_or(false, |slot| slot.out.remove(&t).is_some());
        if removed {
            if let Some(slot) = inner.slot_mut(t) {
                slot.inc.remove(&s);
            }
            trace!(graph = %inner.label(), source = %s, target = %t, "edge unlinked");
        }
        removed
    }

    pub fn linked(&self, source: &V, target: &V) -> bool {
        let inner = self.inner.borrow();
        let id = inner.id;
        match (
            source.membership().lookup(id),
            target.membership().lookup(id),
        ) {
            (Some(s), Some(t)) => inner.has_edge(s, t),
            _ => false,
        }
    }

    /// Payload of the edge from `source` to `target`.
    ///
    /// Fails with [`GraphError::VertexNotInGraph`] when an endpoint is not
    /// a member, and with [`GraphError::NoSuchEdge`] when both are members
    /// but not linked.
    pub fn edge_payload(&self, source: &V, target: &V) -> GraphResult<V::Edge>
    where
        V::Edge: Clone,
    {
        let inner = self.inner.borrow();
        let id = inner.id;
        let s = source
            .membership()
            .lookup(id)
            .ok_or_else(|| GraphError::VertexNotInGraph {
                graph: inner.label(),
            })?;
        let t = target
            .membership()
            .lookup(id)
            .ok_or_else(|| GraphError::VertexNotInGraph {
                graph: inner.label(),
            })?;
        inner
            .slot(s)
            .and_then(|slot| slot.out.get(&t))
            .cloned()
            .ok_or_else(|| GraphError::NoSuchEdge {
                graph: inner.label(),
            })
    }

    /// Replace the payload of the edge from `source` to `target`.
    ///
    /// Same failure split as [`Graph::edge_payload`].
    pub fn set_edge_payload(&self, source: &V, target: &V, payload: V::Edge) -> GraphResult<()> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.id;
        let label = inner.label();
        let s = source
            .membership()
            .lookup(id)
            .ok_or(GraphError::VertexNotInGraph {
                graph: label.clone(),
            })?;
        let t = target
            .membership()
            .lookup(id)
            .ok_or(GraphError::VertexNotInGraph {
                graph: label.clone(),
            })?;
        match inner.slot_mut(s).and_then(|slot| slot.out.get_mut(&t)) {
            Some(stored) => {
                *stored = payload;
                Ok(())
            }
            None => Err(GraphError::NoSuchEdge { graph: label }),
        }
    }

    /// Number of edges arriving at `value`; 0 when absent.
    pub fn in_degree(&self, value: &V) -> usize {
        let inner = self.inner.borrow();
        match value.membership().lookup(inner.id) {
            Some(v) => inner.in_degree(v),
            None => 0,
        }
    }

    /// Number of edges leaving `value`; 0 when absent.
    pub fn out_degree(&self, value: &V) -> usize {
        let inner = self.inner.borrow();
        match value.membership().lookup(inner.id) {
            Some(v) => inner.out_degree(v),
            None => 0,
        }
    }

    /// True iff `value` has no incoming edge here. Vacuously true when
    /// `value` is not a member.
    pub fn is_root(&self, value: &V) -> bool {
        self.in_degree(value) == 0
    }

    /// True iff `value` has no outgoing edge here. Vacuously true when
    /// `value` is not a member.
    pub fn is_leaf(&self, value: &V) -> bool {
        self.out_degree(value) == 0
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.borrow().vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.borrow().edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// All member values, in slot order.
    pub fn vertices(&self) -> Vec<Rc<V>> {
        self.inner
            .borrow()
            .slots
            .iter()
            .flatten()
            .map(|slot| Rc::clone(&slot.value))
            .collect()
    }

    /// Iterates over all member values.
    ///
    /// The visitor may remove the vertex currently being visited.
    pub fn each_vertex(&self, mut f: impl FnMut(&Rc<V>)) {
        for vertex in self.vertex_ids() {
            let value = self.value_by_id(vertex);
            if let Some(value) = value {
                f(&value);
            }
        }
    }

    /// Iterates over all edges as (source, target, payload).
    ///
    /// The visitor may unlink the edge currently being visited.
    pub fn each_edge(&self, mut f: impl FnMut(&Rc<V>, &Rc<V>, &V::Edge))
    where
        V::Edge: Clone,
    {
        for (s, t) in self.edge_pairs() {
            let entry = {
                let inner = self.inner.borrow();
                match (inner.slot(s), inner.slot(t)) {
                    (Some(source), Some(target)) => source.out.get(&t).map(|payload| {
                        (
                            Rc::clone(&source.value),
                            Rc::clone(&target.value),
                            payload.clone(),
                        )
                    }),
                    _ => None,
                }
            };
            if let Some((source, target, payload)) = entry {
                f(&source, &target, &payload);
            }
        }
    }

    /// Remove every vertex and edge, deregistering all members.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        let count = inner.vertex_count();
        for slot in inner.slots.iter().flatten() {
            slot.value.membership().deregister(inner.id);
        }
        inner.slots.clear();
        inner.free.clear();
        debug!(graph = %inner.label(), "cleared {} vertices", count);
    }

    /// Forward view: the identity reinterpretation of this graph.
    pub fn forward(&self) -> Forward<'_, V> {
        Forward::new(self)
    }

    /// Reverse view: every edge direction flipped, without copying.
    pub fn reverse(&self) -> Reverse<'_, V> {
        Reverse::new(self)
    }

    /// Undirected view: every edge traversable both ways, without copying.
    pub fn undirected(&self) -> Undirected<'_, V> {
        Undirected::new(self)
    }

    /// Depth-first traversal from `root` along edge direction, reporting
    /// the edge classes selected by `filter`. A `root` not in the graph is
    /// a no-op. Returns false iff the visitor stopped the traversal.
    pub fn each_dfs<F>(&self, root: &V, filter: VisitFilter, visitor: F) -> bool
    where
        V::Edge: Clone,
        F: FnMut(&Rc<V>, &Rc<V>, &V::Edge, EdgeKind) -> Control,
    {
        search::depth_first(&self.forward(), root, filter, visitor)
    }

    /// Depth-first traversal against edge direction.
    pub fn reverse_each_dfs<F>(&self, root: &V, filter: VisitFilter, visitor: F) -> bool
    where
        V::Edge: Clone,
        F: FnMut(&Rc<V>, &Rc<V>, &V::Edge, EdgeKind) -> Control,
    {
        search::depth_first(&self.reverse(), root, filter, visitor)
    }

    /// Breadth-first traversal from `root` along edge direction.
    ///
    /// Fails with [`GraphError::InvalidEdgeFilter`] when `filter` requests
    /// exactly one half of the non-tree edge category.
    pub fn each_bfs<F>(&self, root: &V, filter: VisitFilter, visitor: F) -> GraphResult<bool>
    where
        V::Edge: Clone,
        F: FnMut(&Rc<V>, &Rc<V>, &V::Edge, EdgeKind) -> Control,
    {
        search::breadth_first(&self.forward(), root, filter, visitor)
    }

    /// Breadth-first traversal against edge direction.
    pub fn reverse_each_bfs<F>(&self, root: &V, filter: VisitFilter, visitor: F) -> GraphResult<bool>
    where
        V::Edge: Clone,
        F: FnMut(&Rc<V>, &Rc<V>, &V::Edge, EdgeKind) -> Control,
    {
        search::breadth_first(&self.reverse(), root, filter, visitor)
    }

    /// Breadth-first traversal ignoring edge direction.
    pub fn undirected_each_bfs<F>(
        &self,
        root: &V,
        filter: VisitFilter,
        visitor: F,
    ) -> GraphResult<bool>
    where
        V::Edge: Clone,
        F: FnMut(&Rc<V>, &Rc<V>, &V::Edge, EdgeKind) -> Control,
    {
        search::breadth_first(&self.undirected(), root, filter, visitor)
    }

    /// Connected components under undirected reachability.
    /// See [`components`](crate::algo::components::components).
    pub fn components(&self, seeds: Option<&[Rc<V>]>) -> Vec<ValueSet<V>> {
        component_analysis::components(self, seeds)
    }

    /// Forward reachability sets.
    /// See [`directed_components`](crate::algo::components::directed_components).
    pub fn directed_components(&self, seeds: Option<&[Rc<V>]>) -> Vec<ValueSet<V>> {
        component_analysis::directed_components(self, seeds)
    }

    /// Backward reachability sets.
    pub fn reverse_directed_components(&self, seeds: Option<&[Rc<V>]>) -> Vec<ValueSet<V>> {
        component_analysis::reverse_directed_components(self, seeds)
    }

    // Slot-level accessors for the views and the traversal engines. All of
    // them return owned data so no interior borrow outlives the call.

    pub(crate) fn vertex_ids(&self) -> Vec<VertexId> {
        self.inner.borrow().live_ids()
    }

    pub(crate) fn descriptor_of(&self, value: &V) -> Option<VertexId> {
        value.membership().lookup(self.inner.borrow().id)
    }

    pub(crate) fn value_by_id(&self, v: VertexId) -> Option<Rc<V>> {
        self.inner
            .borrow()
            .slot(v)
            .map(|slot| Rc::clone(&slot.value))
    }

    pub(crate) fn out_ids(&self, v: VertexId) -> Vec<VertexId> {
        self.inner.borrow().slot(v).map_or_else(Vec::new, |slot| {
            slot.out.keys().copied().collect()
        })
    }

    pub(crate) fn in_ids(&self, v: VertexId) -> Vec<VertexId> {
        self.inner.borrow().slot(v).map_or_else(Vec::new, |slot| {
            slot.inc.iter().copied().collect()
        })
    }

    pub(crate) fn payload_by_id(&self, source: VertexId, target: VertexId) -> Option<V::Edge>
    where
        V::Edge: Clone,
    {
        self.inner
            .borrow()
            .slot(source)
            .and_then(|slot| slot.out.get(&target))
            .cloned()
    }

    pub(crate) fn edge_pairs(&self) -> Vec<(VertexId, VertexId)> {
        let inner = self.inner.borrow();
        let mut pairs = Vec::new();
        for (index, slot) in inner.slots.iter().enumerate() {
            if let Some(slot) = slot {
                let source = VertexId(index as u32);
                pairs.extend(slot.out.keys().map(|target| (source, *target)));
            }
        }
        pairs
    }

    pub(crate) fn parents_of(&self, value: &V) -> Vec<Rc<V>> {
        match self.descriptor_of(value) {
            None => Vec::new(),
            Some(v) => {
                let inner = self.inner.borrow();
                inner.slot(v).map_or_else(Vec::new, |slot| {
                    slot.inc
                        .iter()
                        .filter_map(|source| inner.slot(*source))
                        .map(|slot| Rc::clone(&slot.value))
                        .collect()
                })
            }
        }
    }

    pub(crate) fn children_of(&self, value: &V) -> Vec<Rc<V>> {
        match self.descriptor_of(value) {
            None => Vec::new(),
            Some(v) => {
                let inner = self.inner.borrow();
                inner.slot(v).map_or_else(Vec::new, |slot| {
                    slot.out
                        .keys()
                        .filter_map(|target| inner.slot(*target))
                        .map(|slot| Rc::clone(&slot.value))
                        .collect()
                })
            }
        }
    }
}

impl<V: Vertex> Default for Graph<V> {
    fn default() -> Self {
        Graph::new()
    }
}

impl<V: Vertex> Clone for Graph<V> {
    fn clone(&self) -> Self {
        Graph {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Handle equality: two handles are equal iff they refer to the same graph.
impl<V: Vertex> PartialEq for Graph<V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<V: Vertex> Eq for Graph<V> {}

impl<V: Vertex> fmt::Debug for Graph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Graph")
            .field("id", &inner.id)
            .field("name", &inner.name)
            .field("vertices", &inner.vertex_count())
            .field("edges", &inner.edge_count())
            .finish()
    }
}
