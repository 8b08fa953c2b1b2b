//! Read-only traversal views
//!
//! A view reinterprets the adjacency of one graph without copying any
//! storage: forward (identity), reverse (every edge flipped) and
//! undirected (every edge traversable both ways). The traversal drivers
//! and the component analyzer are generic over [`AdjacencyView`], so they
//! run unchanged on any of the three.

use crate::graph::membership::Vertex;
use crate::graph::store::Graph;
use crate::graph::types::VertexId;

/// An edge as seen through a view.
///
/// `source` and `target` are in view orientation. `flipped` records
/// whether the traversal runs against the storage direction; it is what
/// recovers the true endpoints (and the payload location) on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewEdge {
    pub source: VertexId,
    pub target: VertexId,
    pub flipped: bool,
}

impl ViewEdge {
    fn as_stored(source: VertexId, target: VertexId) -> Self {
        ViewEdge {
            source,
            target,
            flipped: false,
        }
    }

    fn as_flipped(source: VertexId, target: VertexId) -> Self {
        ViewEdge {
            source,
            target,
            flipped: true,
        }
    }

    /// The endpoints in storage orientation.
    pub fn stored(&self) -> (VertexId, VertexId) {
        if self.flipped {
            (self.target, self.source)
        } else {
            (self.source, self.target)
        }
    }
}

/// Uniform adjacency contract satisfied by all three views.
pub trait AdjacencyView<V: Vertex> {
    /// The graph this view reinterprets.
    fn graph(&self) -> &Graph<V>;

    /// Edges leaving `v` under this view's orientation.
    fn out_edges(&self, v: VertexId) -> Vec<ViewEdge>;

    /// Edges arriving at `v` under this view's orientation.
    fn in_edges(&self, v: VertexId) -> Vec<ViewEdge>;
}

/// The identity view: out-edges are forward, in-edges are backward.
pub struct Forward<'g, V: Vertex> {
    graph: &'g Graph<V>,
}

impl<'g, V: Vertex> Forward<'g, V> {
    pub(crate) fn new(graph: &'g Graph<V>) -> Self {
        Forward { graph }
    }
}

impl<V: Vertex> AdjacencyView<V> for Forward<'_, V> {
    fn graph(&self) -> &Graph<V> {
        self.graph
    }

    fn out_edges(&self, v: VertexId) -> Vec<ViewEdge> {
        self.graph
            .out_ids(v)
            .into_iter()
            .map(|target| ViewEdge::as_stored(v, target))
            .collect()
    }

    fn in_edges(&self, v: VertexId) -> Vec<ViewEdge> {
        self.graph
            .in_ids(v)
            .into_iter()
            .map(|source| ViewEdge::as_stored(source, v))
            .collect()
    }
}

/// Every edge direction logically flipped; swapped accessors, no storage.
pub struct Reverse<'g, V: Vertex> {
    graph: &'g Graph<V>,
}

impl<'g, V: Vertex> Reverse<'g, V> {
    pub(crate) fn new(graph: &'g Graph<V>) -> Self {
        Reverse { graph }
    }
}

impl<V: Vertex> AdjacencyView<V> for Reverse<'_, V> {
    fn graph(&self) -> &Graph<V> {
        self.graph
    }

    fn out_edges(&self, v: VertexId) -> Vec<ViewEdge> {
        self.graph
            .in_ids(v)
            .into_iter()
            .map(|target| ViewEdge::as_flipped(v, target))
            .collect()
    }

    fn in_edges(&self, v: VertexId) -> Vec<ViewEdge> {
        self.graph
            .out_ids(v)
            .into_iter()
            .map(|source| ViewEdge::as_flipped(source, v))
            .collect()
    }
}

/// Neighborhood is the union of stored out- and in-edges of each vertex;
/// full symmetric closure.
pub struct Undirected<'g, V: Vertex> {
    graph: &'g Graph<V>,
}

impl<'g, V: Vertex> Undirected<'g, V> {
    pub(crate) fn new(graph: &'g Graph<V>) -> Self {
        Undirected { graph }
    }
}

impl<V: Vertex> AdjacencyView<V> for Undirected<'_, V> {
    fn graph(&self) -> &Graph<V> {
        self.graph
    }

    fn out_edges(&self, v: VertexId) -> Vec<ViewEdge> {
        let mut edges: Vec<ViewEdge> = self
            .graph
            .out_ids(v)
            .into_iter()
            .map(|target| ViewEdge::as_stored(v, target))
            .collect();
        edges.extend(
            self.graph
                .in_ids(v)
                .into_iter()
                .map(|target| ViewEdge::as_flipped(v, target)),
        );
        edges
    }

    fn in_edges(&self, v: VertexId) -> Vec<ViewEdge> {
        let mut edges: Vec<ViewEdge> = self
            .graph
            .in_ids(v)
            .into_iter()
            .map(|source| ViewEdge::as_stored(source, v))
            .collect();
        edges.extend(
            self.graph
                .out_ids(v)
                .into_iter()
                .map(|source| ViewEdge::as_flipped(source, v)),
        );
        edges
    }
}
