//! # Hydration
//!
//! Messages read from the serialized form carry their `in`/`out` edges as
//! message ids only. Hydration turns every id-only edge whose id names a
//! message of the graph into a handle to that message (first match wins).
//!
//! Ids that name nothing are left unresolved and listed in the returned
//! [`HydrationReport`]; hydration itself never fails. Callers that want a
//! hard failure use [`HydrationReport::into_result`].

use crate::{ChatGraphError, Direction, Edge, Graph, NodeId};
use std::collections::BTreeMap;
use tracing::debug;

/// An edge that still names its target by id after hydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedEdge {
    /// The message owning the edge.
    pub node: NodeId,
    pub direction: Direction,
    /// Position of the edge in its adjacency list.
    pub position: usize,
    /// The id that matched no message.
    pub id: String,
}

/// Outcome of one hydration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    /// Edges converted from an id to a handle during this pass.
    pub resolved: usize,
    /// Edges whose id matched no message.
    pub unresolved: Vec<UnresolvedEdge>,
}

impl HydrationReport {
    /// True when every id-only edge found a target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Fail with [`ChatGraphError::UnresolvedEdges`] if any edge is left
    /// unresolved.
    pub fn into_result(self) -> Result<usize, ChatGraphError> {
        if self.unresolved.is_empty() {
            return Ok(self.resolved);
        }
        Err(ChatGraphError::UnresolvedEdges {
            count: self.unresolved.len(),
            ids: self.unresolved.into_iter().map(|edge| edge.id).collect(),
        })
    }
}

/// Hydrate the edges of `nodes` against every message of `graph`.
///
/// Already resolved edges are left untouched, so hydrating twice is a no-op.
pub fn hydrate(graph: &mut Graph, nodes: &[NodeId]) -> HydrationReport {
    let index = first_match_index(graph);
    let mut report = HydrationReport::default();

    for &node in nodes {
        let Some(message) = graph.get_mut(node) else {
            continue;
        };
        for direction in [Direction::In, Direction::Out] {
            for (position, edge) in message.edges_mut(direction).iter_mut().enumerate() {
                let Edge::Unresolved(id) = edge else {
                    continue;
                };
                match index.get(id.as_str()) {
                    Some(&target) => {
                        *edge = Edge::Resolved(target);
                        report.resolved += 1;
                    }
                    None => report.unresolved.push(UnresolvedEdge {
                        node,
                        direction,
                        position,
                        id: id.clone(),
                    }),
                }
            }
        }
    }

    debug!(
        resolved = report.resolved,
        unresolved = report.unresolved.len(),
        "hydrated {} message(s)",
        nodes.len()
    );

    report
}

/// Map every message id to its first handle.
fn first_match_index(graph: &Graph) -> BTreeMap<String, NodeId> {
    let mut index = BTreeMap::new();
    for (node, message) in graph.iter() {
        index.entry(message.id.clone()).or_insert(node);
    }
    index
}

// =============================================================================
// TESTS
// =============================================================================
