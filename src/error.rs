//! Error taxonomy for graph operations.
//!
//! A single [`GraphError`] enum (via `thiserror`) covers every fallible
//! operation on a [`crate::Graph`]; [`GraphResult`] is the crate-wide alias.
//! Errors carry the graph's name where available so diagnostics can point at
//! the offending graph.

use thiserror::Error;

/// Errors returned by fallible graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// `link` was called for an edge that already exists. The payload is not
    /// overwritten; the caller must `unlink` or `set_edge_payload` instead.
    #[error("edge already exists in graph `{graph}`")]
    DuplicateEdge {
        /// Name of the graph the edge belongs to.
        graph: String,
    },

    /// An edge lookup found both endpoints registered but no edge between them.
    #[error("no such edge in graph `{graph}`")]
    NoSuchEdge {
        /// Name of the graph the lookup targeted.
        graph: String,
    },

    /// An operation referenced a vertex that is not a member of the graph.
    #[error("vertex is not a member of graph `{graph}`")]
    VertexNotInGraph {
        /// Name of the graph the vertex was expected to belong to.
        graph: String,
    },

    /// A BFS edge filter requested only half of the non-tree edge category,
    /// which breadth-first search cannot honor.
    #[error("invalid edge filter for breadth-first search")]
    InvalidEdgeFilter,
}

/// Convenience alias for results of fallible graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
