//! # Message Collections
//!
//! An ordered view over messages of a [`Graph`]. A collection owns no
//! message: the same node may appear in any number of collections, and in
//! the same collection more than once.

use crate::hydrate::{self, HydrationReport};
use crate::search::{self, Matcher, SearchResult};
use crate::summarize::CompletionEntry;
use crate::visit;
use crate::{Graph, Message, NodeId};

/// An ordered sequence of message handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages(Vec<NodeId>);

impl Messages {
    /// Create a new empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: NodeId) {
        self.0.push(id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + '_ {
        self.0.iter().copied()
    }

    /// Iterate over the messages behind the handles, skipping handles that do
    /// not belong to `graph`.
    pub fn resolve<'g>(&'g self, graph: &'g Graph) -> impl Iterator<Item = &'g Message> + 'g {
        self.0.iter().filter_map(move |id| graph.get(*id))
    }

    /// Message ids, in collection order.
    #[must_use]
    pub fn ids(&self, graph: &Graph) -> Vec<String> {
        self.resolve(graph).map(|m| m.id.clone()).collect()
    }

    /// First message of this collection whose id equals `id`.
    #[must_use]
    pub fn match_first_by_id(&self, graph: &Graph, id: &str) -> Option<NodeId> {
        self.iter()
            .find(|node| graph.get(*node).is_some_and(|m| m.id == id))
    }

    /// Sub-collection of the messages matching `predicate`, order preserved.
    #[must_use]
    pub fn filter<P>(&self, graph: &Graph, mut predicate: P) -> Self
    where
        P: FnMut(&Message) -> bool,
    {
        self.iter()
            .filter(|node| graph.get(*node).is_some_and(&mut predicate))
            .collect()
    }

    /// The collection as role-tagged entries for a completion request.
    #[must_use]
    pub fn completion_entries(&self, graph: &Graph) -> Vec<CompletionEntry> {
        self.resolve(graph)
            .map(|m| CompletionEntry::new(m.role.clone(), m.content.clone()))
            .collect()
    }

    /// Depth-first walk from every message of this collection.
    ///
    /// See [`visit::visit`].
    pub fn visit<F, E>(&self, graph: &Graph, f: F) -> Result<(), E>
    where
        F: FnMut(NodeId, &Message) -> Result<(), E>,
    {
        visit::visit(graph, &self.0, f)
    }

    /// Case-insensitive substring search over this collection.
    ///
    /// `message_index` in each result is relative to this collection.
    #[must_use]
    pub fn search<'g>(&self, graph: &'g Graph, query: &str) -> Vec<SearchResult<'g>> {
        search::search(graph, &self.0, query)
    }

    /// Search with an explicitly configured matcher.
    #[must_use]
    pub fn search_with<'g>(
        &self,
        graph: &'g Graph,
        matcher: &Matcher,
        query: &str,
    ) -> Vec<SearchResult<'g>> {
        search::search_with(graph, &self.0, matcher, query)
    }

    /// Resolve the id-only edges of these messages against every message of
    /// `graph`.
    pub fn hydrate(&self, graph: &mut Graph) -> HydrationReport {
        hydrate::hydrate(graph, &self.0)
    }

    /// True when no message of this collection has an id-only edge left.
    #[must_use]
    pub fn is_hydrated(&self, graph: &Graph) -> bool {
        self.resolve(graph).all(Message::is_hydrated)
    }
}

impl From<Vec<NodeId>> for Messages {
    fn from(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }
}

impl FromIterator<NodeId> for Messages {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Messages {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

// =============================================================================
// TESTS
// =============================================================================
