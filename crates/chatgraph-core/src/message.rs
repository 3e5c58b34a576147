//! # Message
//!
//! A single node of a conversation graph: an id, a role-tagged text, and two
//! ordered adjacency lists.
//!
//! What "in" and "out" mean is up to the application. In a plain chat thread a
//! question points "out" to its answer and the answer has the question "in".
//! Traversal only ever follows `out` edges.

use crate::{Direction, Edge, Role};
use std::fmt;

/// A chat message connected to other messages.
///
/// Edges are owned by the message but never own their targets: every message
/// of a chat lives in the chat's [`Graph`](crate::Graph) arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Identifier, unique within a graph. May be empty for ephemeral messages.
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Messages going "in" (←) to this one, e.g. referencing it.
    pub incoming: Vec<Edge>,
    /// Messages going "out" (→) from this one, e.g. referenced by it.
    pub outgoing: Vec<Edge>,
}

impl Message {
    /// Create a message with no edges.
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    #[must_use]
    pub fn system(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, Role::System, content)
    }

    #[must_use]
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, Role::User, content)
    }

    #[must_use]
    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, Role::Assistant, content)
    }

    /// Append an edge to the "in" list that names its target by id only.
    ///
    /// The edge stays unresolved until the owning chat is hydrated.
    pub fn add_in_id(&mut self, id: impl Into<String>) {
        self.incoming.push(Edge::Unresolved(id.into()));
    }

    /// Append an edge to the "out" list that names its target by id only.
    pub fn add_out_id(&mut self, id: impl Into<String>) {
        self.outgoing.push(Edge::Unresolved(id.into()));
    }

    /// Get one of the two adjacency lists.
    #[must_use]
    pub fn edges(&self, direction: Direction) -> &[Edge] {
        match direction {
            Direction::In => &self.incoming,
            Direction::Out => &self.outgoing,
        }
    }

    pub(crate) fn edges_mut(&mut self, direction: Direction) -> &mut Vec<Edge> {
        match direction {
            Direction::In => &mut self.incoming,
            Direction::Out => &mut self.outgoing,
        }
    }

    /// Check that no edge in either list still waits for hydration.
    ///
    /// Stricter than looking at `incoming` alone: an id-only `out` edge also
    /// makes the message unhydrated, since traversal would skip it.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.incoming
            .iter()
            .chain(&self.outgoing)
            .all(Edge::is_resolved)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.content)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;

    #[test]
    fn display_is_role_colon_content() {
        let msg = Message::user("1", "Who is Jon Snow's father?");
        assert_eq!(msg.to_string(), "user: Who is Jon Snow's father?");
    }

    #[test]
    fn id_only_edges_are_not_hydrated() {
        let mut msg = Message::assistant("2", "Rhaegar Targaryen.");
        assert!(msg.is_hydrated());

        msg.add_in_id("1");
        assert!(!msg.is_hydrated());
        assert_eq!(msg.edges(Direction::In), &[Edge::Unresolved("1".to_string())]);
        assert!(msg.edges(Direction::Out).is_empty());
    }

    #[test]
    fn id_only_out_edge_is_not_hydrated() {
        let mut msg = Message::user("1", "Who is Jon Snow's father?");
        msg.incoming.push(Edge::Resolved(NodeId(0)));
        msg.add_out_id("2");
        assert!(!msg.is_hydrated());
    }

    #[test]
    fn resolved_edges_count_as_hydrated() {
        let mut msg = Message::user("1", "hi");
        msg.outgoing.push(Edge::Resolved(NodeId(1)));
        msg.incoming.push(Edge::Resolved(NodeId(0)));
        assert!(msg.is_hydrated());
    }
}
