//! # Traversal
//!
//! Depth-first, pre-order walk over `out` edges, the foundation for other
//! graph algorithms.
//!
//! - Each distinct node is handed to the visitor at most once per call, no
//!   matter how many roots or edges lead to it.
//! - Order is deterministic for a fixed edge order.
//! - Cycles terminate: a node is marked before its descendants are explored.
//! - `in` edges, id-only edges, and handles outside the graph are not followed.
//! - The first visitor error aborts the walk and is returned verbatim.

use crate::{Graph, Message, NodeId};
use std::collections::BTreeSet;

// =============================================================================
// MESSAGE SET
// =============================================================================

/// Nodes already seen during one traversal, keyed by handle identity.
///
/// Uses BTreeSet for deterministic iteration.
#[derive(Debug, Clone, Default)]
pub struct MessageSet {
    seen: BTreeSet<NodeId>,
}

impl MessageSet {
    /// Create a new empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a node as seen. Returns `true` if it was not seen before.
    ///
    /// This is the get-or-put step of a walk: a single lookup both records
    /// the node and tells the caller whether to explore it.
    pub fn add(&mut self, id: NodeId) -> bool {
        self.seen.insert(id)
    }

    #[must_use]
    pub fn has(&self, id: NodeId) -> bool {
        self.seen.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Seen nodes in handle order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.seen.iter().copied()
    }
}

// =============================================================================
// VISIT
// =============================================================================

/// Walk the graph depth-first from each root in order, calling `f` once per
/// reachable node.
///
/// Roots already reached from an earlier root are skipped.
pub fn visit<F, E>(graph: &Graph, roots: &[NodeId], mut f: F) -> Result<(), E>
where
    F: FnMut(NodeId, &Message) -> Result<(), E>,
{
    let mut seen = MessageSet::new();

    for &root in roots {
        if seen.has(root) {
            continue;
        }
        visit_from(graph, root, &mut seen, &mut f)?;
    }

    Ok(())
}

/// Walk the graph depth-first from a single node, sharing `seen` with the
/// caller so several walks can be chained without revisiting nodes.
///
/// An explicit stack replaces recursion so long threads cannot exhaust the
/// call stack. Children are pushed in reverse edge order and checked when
/// popped, which yields exactly the recursive pre-order.
pub fn visit_from<F, E>(
    graph: &Graph,
    root: NodeId,
    seen: &mut MessageSet,
    f: &mut F,
) -> Result<(), E>
where
    F: FnMut(NodeId, &Message) -> Result<(), E>,
{
    let mut stack = vec![root];

    while let Some(current) = stack.pop() {
        if seen.has(current) {
            continue;
        }
        let Some(message) = graph.get(current) else {
            continue;
        };

        seen.add(current);
        f(current, message)?;

        let children: Vec<NodeId> = graph.successors(current).collect();
        stack.extend(children.into_iter().rev().filter(|next| !seen.has(*next)));
    }

    Ok(())
}

/// The order in which [`visit`] would hand nodes to its visitor.
#[must_use]
pub fn visit_order(graph: &Graph, roots: &[NodeId]) -> Vec<NodeId> {
    let mut order = Vec::new();
    let result: Result<(), std::convert::Infallible> = visit(graph, roots, |id, _| {
        order.push(id);
        Ok(())
    });
    match result {
        Ok(()) => order,
        Err(never) => match never {},
    }
}

// =============================================================================
// TESTS
// =============================================================================
