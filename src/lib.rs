//! Relgraph
//!
//! In-memory directed graphs over shared, externally-owned vertex values.
//! A value opts into being a vertex by implementing [`Vertex`] (embedding a
//! [`Membership`] index), after which it can participate in any number of
//! independent [`Graph`]s at the same time and answer cross-graph queries
//! (parents, children, roots, leaves) without the graphs knowing about each
//! other.
//!
//! # Architecture
//!
//! - [`graph`]: the storage ([`Graph`]), the vertex capability
//!   ([`Vertex`], [`Membership`], [`VertexExt`]) and the read-only
//!   traversal views ([`Forward`], [`Reverse`], [`Undirected`])
//! - [`algo`]: depth-/breadth-first traversal with edge classification and
//!   cooperative pruning, and connected-component analysis
//! - [`set`]: [`ValueSet`], the identity-ordered set used for component
//!   results and traversal de-duplication
//!
//! Graphs are single-threaded shared state: a [`Graph`] handle is cheap to
//! clone, mutation never needs `&mut`, and visitor callbacks may mutate
//! the graph they are called from (restricted to the element currently
//! being visited) or start nested traversals. The types are deliberately
//! neither `Send` nor `Sync`.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use relgraph::{Graph, Membership, Vertex, VertexExt};
//!
//! struct Task {
//!     name: &'static str,
//!     graphs: Membership<Task>,
//! }
//!
//! impl Vertex for Task {
//!     type Edge = u32;
//!     fn membership(&self) -> &Membership<Task> {
//!         &self.graphs
//!     }
//! }
//!
//! fn task(name: &'static str) -> Rc<Task> {
//!     Rc::new(Task { name, graphs: Membership::default() })
//! }
//!
//! let dependencies: Graph<Task> = Graph::named("dependencies");
//! let scheduling: Graph<Task> = Graph::named("scheduling");
//!
//! let build = task("build");
//! let test = task("test");
//!
//! // linking inserts absent endpoints on the fly
//! dependencies.link(&build, &test, 0)?;
//! scheduling.insert(&build);
//!
//! assert!(dependencies.linked(&build, &test));
//! assert!(test.has_parent(&build, None));
//! assert_eq!(build.graphs().len(), 2);
//! assert_eq!(test.name, "test");
//! # Ok::<(), relgraph::GraphError>(())
//! ```

pub mod algo;
pub mod error;
pub mod graph;
pub mod set;

// Re-export the public surface at the crate root
pub use algo::{
    breadth_first, components, depth_first, directed_components, reverse_directed_components,
    Control, EdgeKind, VisitFilter,
};
pub use error::{GraphError, GraphResult};
pub use graph::{
    AdjacencyView, Forward, Graph, GraphId, Membership, Reverse, Undirected, Vertex, VertexExt,
    VertexId, ViewEdge,
};
pub use set::ValueSet;
