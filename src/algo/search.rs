//! Depth-first and breadth-first traversal drivers
//!
//! Both drivers are generic over an [`AdjacencyView`], so the same code
//! runs forward, reverse and undirected. Vertex colors live in a map local
//! to each invocation; nested traversals started from inside a visitor
//! cannot interfere with the one that spawned them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{GraphError, GraphResult};
use crate::graph::membership::Vertex;
use crate::graph::types::VertexId;
use crate::graph::view::{AdjacencyView, ViewEdge};

/// Classification of an edge relative to the traversal forest.
///
/// Depth-first traversal distinguishes tree, back and forward-or-cross
/// edges (forward and cross cannot be told apart without extra
/// bookkeeping, and this crate does not attempt to). Breadth-first
/// traversal can only distinguish tree edges from the rest, reported as
/// [`EdgeKind::NonTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Leads to a vertex not yet discovered.
    Tree,
    /// Leads back to a vertex on the current DFS stack.
    Back,
    /// Leads to an already finished vertex.
    ForwardOrCross,
    /// BFS only: any edge that is not a tree edge.
    NonTree,
}

impl EdgeKind {
    pub fn bits(self) -> u8 {
        match self {
            EdgeKind::Tree => 0b001,
            EdgeKind::Back => 0b010,
            EdgeKind::ForwardOrCross => 0b100,
            EdgeKind::NonTree => 0b110,
        }
    }
}

/// Bitmask selecting which edge classes a traversal reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitFilter(u8);

impl VisitFilter {
    pub const TREE: VisitFilter = VisitFilter(0b001);
    pub const BACK: VisitFilter = VisitFilter(0b010);
    pub const FORWARD_OR_CROSS: VisitFilter = VisitFilter(0b100);
    pub const NON_TREE: VisitFilter = VisitFilter(0b110);
    pub const ALL: VisitFilter = VisitFilter(0b111);

    pub fn accepts(self, kind: EdgeKind) -> bool {
        self.0 & kind.bits() != 0
    }

    // BFS precondition: the two halves of the non-tree category can only
    // be requested together.
    pub(crate) fn splits_non_tree(self) -> bool {
        let non_tree = self.0 & Self::NON_TREE.0;
        non_tree != 0 && non_tree != Self::NON_TREE.0
    }
}

impl std::ops::BitOr for VisitFilter {
    type Output = VisitFilter;

    fn bitor(self, rhs: VisitFilter) -> VisitFilter {
        VisitFilter(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for VisitFilter {
    fn bitor_assign(&mut self, rhs: VisitFilter) {
        self.0 |= rhs.0;
    }
}

/// Verdict returned by a traversal visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Continue,
    /// Do not expand the subtree below the edge target. The target itself
    /// is still marked finished; siblings are unaffected.
    Prune,
    /// Abort the whole traversal.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Gray,
    Black,
}

// White is the absence of an entry.
type ColorMap = FxHashMap<VertexId, Color>;

/// Depth-first traversal of `view` from `root`.
///
/// Edges are classified at discovery time; the visitor runs for edges
/// whose class is selected by `filter`, receiving the endpoints in view
/// orientation, the edge payload and the class. A `root` absent from the
/// graph is a no-op. Returns false iff the visitor stopped the traversal.
pub fn depth_first<V, G, F>(view: &G, root: &V, filter: VisitFilter, mut visitor: F) -> bool
where
    V: Vertex,
    V::Edge: Clone,
    G: AdjacencyView<V>,
    F: FnMut(&Rc<V>, &Rc<V>, &V::Edge, EdgeKind) -> Control,
{
    let Some(root_id) = view.graph().descriptor_of(root) else {
        return true;
    };

    let mut colors = ColorMap::default();
    colors.insert(root_id, Color::Gray);
    let mut stack = vec![(root_id, view.out_edges(root_id).into_iter())];

    loop {
        let Some(frame) = stack.last_mut() else { break };
        let source = frame.0;
        let Some(edge) = frame.1.next() else {
            colors.insert(source, Color::Black);
            stack.pop();
            continue;
        };

        let kind = match colors.get(&edge.target) {
            None => EdgeKind::Tree,
            Some(Color::Gray) => EdgeKind::Back,
            Some(Color::Black) => EdgeKind::ForwardOrCross,
        };

        let verdict = deliver(view, edge, kind, filter, &mut visitor);
        if verdict == Control::Stop {
            return false;
        }
        if kind == EdgeKind::Tree {
            if verdict == Control::Prune {
                colors.insert(edge.target, Color::Black);
            } else {
                colors.insert(edge.target, Color::Gray);
                stack.push((edge.target, view.out_edges(edge.target).into_iter()));
            }
        }
    }
    true
}

/// Breadth-first traversal of `view` from `root`.
///
/// Edge classes collapse to tree and non-tree. Requesting exactly one of
/// back or forward-or-cross fails with [`GraphError::InvalidEdgeFilter`];
/// BFS cannot separate them. A `root` absent from the graph is a no-op.
/// Returns `Ok(false)` iff the visitor stopped the traversal.
pub fn breadth_first<V, G, F>(
    view: &G,
    root: &V,
    filter: VisitFilter,
    mut visitor: F,
) -> GraphResult<bool>
where
    V: Vertex,
    V::Edge: Clone,
    G: AdjacencyView<V>,
    F: FnMut(&Rc<V>, &Rc<V>, &V::Edge, EdgeKind) -> Control,
{
    if filter.splits_non_tree() {
        return Err(GraphError::InvalidEdgeFilter);
    }
    let Some(root_id) = view.graph().descriptor_of(root) else {
        return Ok(true);
    };

    let mut colors = ColorMap::default();
    colors.insert(root_id, Color::Gray);
    let mut queue = VecDeque::from([root_id]);

    while let Some(source) = queue.pop_front() {
        for edge in view.out_edges(source) {
            let kind = match colors.get(&edge.target) {
                None => EdgeKind::Tree,
                Some(_) => EdgeKind::NonTree,
            };

            let verdict = deliver(view, edge, kind, filter, &mut visitor);
            if verdict == Control::Stop {
                return Ok(false);
            }
            if kind == EdgeKind::Tree {
                if verdict == Control::Prune {
                    colors.insert(edge.target, Color::Black);
                } else {
                    colors.insert(edge.target, Color::Gray);
                    queue.push_back(edge.target);
                }
            }
        }
        colors.insert(source, Color::Black);
    }
    Ok(true)
}

// Invoke the visitor if the filter selects this class and the edge still
// exists; an edge removed by an earlier visitor call is silently skipped.
fn deliver<V, G, F>(
    view: &G,
    edge: ViewEdge,
    kind: EdgeKind,
    filter: VisitFilter,
    visitor: &mut F,
) -> Control
where
    V: Vertex,
    V::Edge: Clone,
    G: AdjacencyView<V>,
    F: FnMut(&Rc<V>, &Rc<V>, &V::Edge, EdgeKind) -> Control,
{
    if !filter.accepts(kind) {
        return Control::Continue;
    }
    let graph = view.graph();
    let (stored_source, stored_target) = edge.stored();
    match (
        graph.value_by_id(edge.source),
        graph.value_by_id(edge.target),
        graph.payload_by_id(stored_source, stored_target),
    ) {
        (Some(source), Some(target), Some(payload)) => visitor(&source, &target, &payload, kind),
        _ => Control::Continue,
    }
}
