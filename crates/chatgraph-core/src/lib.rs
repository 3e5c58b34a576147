//! # chatgraph-core
//!
//! Conversation graphs for language-model chats - THE LOGIC.
//!
//! A conversation is a directed graph of messages rather than a flat list,
//! so branching dialogue (several replies to one message, merged threads,
//! re-used context) can be represented, walked, searched, and condensed into
//! a summary for further requests.
//!
//! ## Architecture
//!
//! - Every message of a chat is owned by one [`Graph`] arena and addressed by
//!   a [`NodeId`]; `in`/`out` edges are handles into that arena.
//! - [`Messages`] is an ordered view of handles; the same message can appear
//!   in any number of views.
//! - Edges read from disk name their target by id ([`Edge::Unresolved`])
//!   until [`Chat::hydrate_messages`] resolves them.
//! - The completion service is reached only through [`Completer`]; this
//!   crate has no runtime and no network dependency.
//!
//! ## Example
//!
//! ```
//! use chatgraph_core::{Chat, Message};
//!
//! let mut chat = Chat::new("chat-1", "Westeros");
//! let q = chat.push(Message::user("1", "Who is Jon Snow's father?"));
//! let a = chat.push(Message::assistant("2", "Rhaegar Targaryen, his father."));
//! chat.graph.add_out_in(q, a).expect("both handles belong to the chat");
//!
//! assert_eq!(chat.visit_order(), vec![q, a]);
//! assert_eq!(chat.search("FATHER").len(), 2);
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod chat;
pub mod formats;
pub mod graph;
pub mod hydrate;
pub mod message;
pub mod messages;
pub mod primitives;
pub mod search;
pub mod summarize;
pub mod types;
pub mod visit;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{ChatGraphError, Direction, Edge, NodeId, Role};

// =============================================================================
// RE-EXPORTS: Graph Model
// =============================================================================

pub use chat::Chat;
pub use graph::Graph;
pub use message::Message;
pub use messages::Messages;

// =============================================================================
// RE-EXPORTS: Algorithms
// =============================================================================

pub use hydrate::{HydrationReport, UnresolvedEdge};
pub use search::{Matcher, Pattern, SearchResult, Span, search, search_with};
pub use summarize::{
    Completer, CompletionEntry, CompletionRequest, CompletionResponse, DEFAULT_SUMMARY_PROMPT,
    summarize, summarize_with_prompt, transcript,
};
pub use visit::{MessageSet, visit, visit_from, visit_order};

// =============================================================================
// RE-EXPORTS: Formats
// =============================================================================

pub use formats::{
    PersistenceHeader, SerializableChat, SerializableMessage, chat_from_bytes, chat_from_json,
    chat_from_slice, chat_to_bytes, chat_to_json, chat_to_json_pretty,
};
