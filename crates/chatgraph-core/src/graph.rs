//! # Message Arena
//!
//! The single owner of every message in a chat.
//!
//! Messages are addressed by [`NodeId`] handles and edges are handles into the
//! same arena, so mutual `in`/`out` references never form ownership cycles.
//! Handles are never invalidated: the arena only grows.

use crate::{ChatGraphError, Direction, Edge, Message, Messages, NodeId};

/// Arena of messages, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Message>,
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the arena and return its handle.
    pub fn insert(&mut self, message: Message) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(message);
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Message> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Message> {
        self.nodes.get_mut(id.0)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all messages with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Message)> {
        self.nodes.iter().enumerate().map(|(i, m)| (NodeId(i), m))
    }

    /// Every handle of the arena as a collection, in insertion order.
    #[must_use]
    pub fn messages(&self) -> Messages {
        (0..self.nodes.len()).map(NodeId).collect()
    }

    /// Total number of edge slots across all `out` lists.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|m| m.outgoing.len()).sum()
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Append `target` to the "in" list of `node`.
    ///
    /// No de-duplication: repeated calls create parallel edges.
    pub fn add_in(&mut self, node: NodeId, target: NodeId) -> Result<(), ChatGraphError> {
        self.link(node, Direction::In, target)
    }

    /// Append `target` to the "out" list of `node`.
    pub fn add_out(&mut self, node: NodeId, target: NodeId) -> Result<(), ChatGraphError> {
        self.link(node, Direction::Out, target)
    }

    /// Append `target` to the "in" list of `node` and `node` to the "out"
    /// list of `target`, making the link traversable from both ends.
    pub fn add_in_out(&mut self, node: NodeId, target: NodeId) -> Result<(), ChatGraphError> {
        self.ensure(node)?;
        self.ensure(target)?;
        self.link(node, Direction::In, target)?;
        self.link(target, Direction::Out, node)
    }

    /// Append `target` to the "out" list of `node` and `node` to the "in"
    /// list of `target`.
    pub fn add_out_in(&mut self, node: NodeId, target: NodeId) -> Result<(), ChatGraphError> {
        self.ensure(node)?;
        self.ensure(target)?;
        self.link(node, Direction::Out, target)?;
        self.link(target, Direction::In, node)
    }

    fn link(
        &mut self,
        node: NodeId,
        direction: Direction,
        target: NodeId,
    ) -> Result<(), ChatGraphError> {
        self.ensure(target)?;
        let message = self
            .get_mut(node)
            .ok_or(ChatGraphError::NodeNotFound(node))?;
        message.edges_mut(direction).push(Edge::Resolved(target));
        Ok(())
    }

    fn ensure(&self, id: NodeId) -> Result<(), ChatGraphError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(ChatGraphError::NodeNotFound(id))
        }
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// The message id an edge points at.
    ///
    /// Returns `None` for a resolved edge whose handle is not in this graph.
    #[must_use]
    pub fn id_of<'a>(&'a self, edge: &'a Edge) -> Option<&'a str> {
        match edge {
            Edge::Unresolved(id) => Some(id.as_str()),
            Edge::Resolved(node) => self.get(*node).map(|m| m.id.as_str()),
        }
    }

    /// Message ids of a list of edges, in order. Used for the ID-only
    /// serialized form of `in`/`out`.
    #[must_use]
    pub fn ids_of(&self, edges: &[Edge]) -> Vec<String> {
        edges
            .iter()
            .filter_map(|edge| self.id_of(edge))
            .map(str::to_string)
            .collect()
    }

    /// First message whose id equals `id`.
    #[must_use]
    pub fn match_first_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes.iter().position(|m| m.id == id).map(NodeId)
    }

    /// Resolve each id to its first matching message, keeping the order of
    /// `ids`. Ids matching nothing are left out.
    #[must_use]
    pub fn get_messages<S: AsRef<str>>(&self, ids: &[S]) -> Messages {
        ids.iter()
            .filter_map(|id| self.match_first_by_id(id.as_ref()))
            .collect()
    }

    /// Resolved `out` targets of a node that exist in this graph, in edge
    /// order.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.get(node)
            .into_iter()
            .flat_map(|m| m.outgoing.iter().filter_map(Edge::resolved))
            .filter(|next| self.contains(*next))
    }
}

// =============================================================================
// TESTS
// =============================================================================
