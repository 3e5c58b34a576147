//! # Chat
//!
//! A named conversation graph. The chat's message arena is its flat message
//! collection. Traversal starts from the chat's roots: every message in
//! insertion order, unless a narrower root collection was set.

use crate::hydrate::HydrationReport;
use crate::search::{Matcher, SearchResult};
use crate::summarize::{self, Completer};
use crate::visit;
use crate::{ChatGraphError, Graph, Message, Messages, NodeId};

/// A "chat graph": a connected set of messages with an id and a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chat {
    pub id: String,
    pub name: String,
    pub graph: Graph,
    /// Traversal roots. `None` means every message, in insertion order.
    ///
    /// Not persisted: a loaded chat always starts from all of its messages.
    pub roots: Option<Messages>,
}

impl Chat {
    /// Create an empty chat.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            graph: Graph::new(),
            roots: None,
        }
    }

    /// Restrict traversal to `roots`.
    #[must_use]
    pub fn with_roots(mut self, roots: Messages) -> Self {
        self.roots = Some(roots);
        self
    }

    /// Where [`Chat::visit`] starts.
    #[must_use]
    pub fn roots(&self) -> Messages {
        self.roots.clone().unwrap_or_else(|| self.messages())
    }

    /// Add a message and return its handle.
    pub fn push(&mut self, message: Message) -> NodeId {
        self.graph.insert(message)
    }

    /// Every message of the chat, in insertion order.
    #[must_use]
    pub fn messages(&self) -> Messages {
        self.graph.messages()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Message> {
        self.graph.get(id)
    }

    /// First message with the given message id.
    #[must_use]
    pub fn get_message_by_id(&self, id: &str) -> Option<&Message> {
        self.graph
            .match_first_by_id(id)
            .and_then(|node| self.graph.get(node))
    }

    /// Messages for the given ids, in the order of `ids`.
    #[must_use]
    pub fn get_messages<S: AsRef<str>>(&self, ids: &[S]) -> Messages {
        self.graph.get_messages(ids)
    }

    /// Depth-first walk from the chat's roots.
    pub fn visit<F, E>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(NodeId, &Message) -> Result<(), E>,
    {
        visit::visit(&self.graph, self.roots().as_slice(), f)
    }

    /// The order in which [`Chat::visit`] reaches messages.
    #[must_use]
    pub fn visit_order(&self) -> Vec<NodeId> {
        visit::visit_order(&self.graph, self.roots().as_slice())
    }

    /// Case-insensitive search over every message of the chat.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchResult<'_>> {
        self.messages().search(&self.graph, query)
    }

    #[must_use]
    pub fn search_with(&self, matcher: &Matcher, query: &str) -> Vec<SearchResult<'_>> {
        self.messages().search_with(&self.graph, matcher, query)
    }

    /// Resolve every id-only edge of the chat against its own messages.
    ///
    /// Only needed after loading the serialized form, which stores edges as
    /// ids.
    pub fn hydrate_messages(&mut self) -> HydrationReport {
        let all = self.messages();
        all.hydrate(&mut self.graph)
    }

    /// True when no message has an id-only edge left, in either its `in` or
    /// its `out` list.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.messages().is_hydrated(&self.graph)
    }

    /// Summarize the whole chat with the default instruction prompt.
    pub async fn summarize<C: Completer>(
        &self,
        completer: &C,
        model: &str,
    ) -> Result<String, ChatGraphError> {
        let all = self.messages();
        summarize::summarize(&self.graph, all.as_slice(), completer, model).await
    }

    /// Summarize the whole chat with a caller-supplied instruction prompt.
    pub async fn summarize_with_prompt<C: Completer>(
        &self,
        completer: &C,
        model: &str,
        prompt: &str,
    ) -> Result<String, ChatGraphError> {
        let all = self.messages();
        summarize::summarize_with_prompt(&self.graph, all.as_slice(), completer, model, prompt)
            .await
    }
}

// =============================================================================
// TESTS
// =============================================================================
