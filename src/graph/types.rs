//! Core identifier types for graphs and vertex slots

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a graph instance.
///
/// Allocated from a process-global counter, so two graphs never share an
/// id even across unrelated vertex families. The id of a discarded graph
/// is never reused, which makes it safe to keep as a plain map key inside
/// [`Membership`](crate::Membership) after the graph itself is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphId(u64);

impl GraphId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        GraphId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphId({})", self.0)
    }
}

/// Slot handle of a vertex inside one particular graph.
///
/// Only meaningful together with the graph that produced it; handles from
/// different graphs are never interchangeable. A handle is valid between
/// the insertion that produced it and the removal that invalidates it.
/// Removal strips it from the owning vertex's membership index and from
/// all adjacency in the same operation, so no stale handle survives
/// anywhere it could be dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub(crate) u32);

impl VertexId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_id_unique() {
        let a = GraphId::fresh();
        let b = GraphId::fresh();
        assert_ne!(a, b);
        assert!(a.as_u64() < b.as_u64());
    }

    #[test]
    fn test_display() {
        let id = VertexId(42);
        assert_eq!(format!("{}", id), "VertexId(42)");
    }

    #[test]
    fn test_vertex_id_ordering() {
        assert!(VertexId(1) < VertexId(2));
    }
}
