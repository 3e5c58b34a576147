//! # Core Type Definitions
//!
//! This module contains the small value types shared by every part of the
//! conversation graph:
//! - Arena handles (`NodeId`)
//! - Message roles (`Role`)
//! - Edge slots (`Edge`, `Direction`)
//! - Error types (`ChatGraphError`)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// NODE HANDLE
// =============================================================================

/// Handle of a message inside a [`Graph`](crate::Graph) arena.
///
/// Node identity is the handle, never the message content: two messages with
/// identical text are still two distinct nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Get the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// ROLE
// =============================================================================

/// The author role of a message.
///
/// Serialized as the lowercase role name. Any role name a provider defines
/// beyond the three standard ones is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    System,
    User,
    Assistant,
    Other(String),
}

impl Role {
    /// Get the role as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "system" => Self::System,
            "user" => Self::User,
            "assistant" => Self::Assistant,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "system" | "user" | "assistant" => Self::from(s.as_str()),
            _ => Self::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// EDGES
// =============================================================================

/// One slot of a message's `in` or `out` adjacency list.
///
/// Edges read from the serialized form only carry the target's message id
/// until the chat is hydrated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Target known only by its message id.
    Unresolved(String),
    /// Target resolved to an arena handle.
    Resolved(NodeId),
}

impl Edge {
    /// The target handle, if this edge has been resolved.
    #[must_use]
    pub fn resolved(&self) -> Option<NodeId> {
        match self {
            Self::Resolved(id) => Some(*id),
            Self::Unresolved(_) => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl From<NodeId> for Edge {
    fn from(id: NodeId) -> Self {
        Self::Resolved(id)
    }
}

/// Which adjacency list of a message an edge lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Messages pointing to this one.
    In,
    /// Messages this one points to.
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => f.write_str("in"),
            Self::Out => f.write_str("out"),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the chatgraph core.
///
/// Every failure is a value returned to the immediate caller; the core never
/// panics on bad input.
#[derive(Debug, Error)]
pub enum ChatGraphError {
    /// A handle does not belong to the graph it was used with.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Hydration left edges whose ids match no message in the chat.
    #[error("{count} edge(s) left unresolved after hydration: {ids:?}")]
    UnresolvedEdges { count: usize, ids: Vec<String> },

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The serialized form could not be parsed.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// The completion service failed while summarizing.
    #[error("failed to create summary of {count} chat messages: {source}")]
    Summarize {
        count: usize,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The completion service answered without any choice.
    #[error("completion service returned no choices")]
    EmptyCompletion,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_standard_names() {
        assert_eq!(Role::from("system"), Role::System);
        assert_eq!(Role::from("user"), Role::User);
        assert_eq!(Role::from("assistant"), Role::Assistant);
        assert_eq!(Role::from("tool"), Role::Other("tool".to_string()));
    }

    #[test]
    fn role_wire_form_is_lowercase_name() {
        let json = serde_json::to_string(&Role::Assistant).expect("serialize");
        assert_eq!(json, "\"assistant\"");

        let role: Role = serde_json::from_str("\"function\"").expect("deserialize");
        assert_eq!(role, Role::Other("function".to_string()));
        assert_eq!(String::from(role), "function");
    }

    #[test]
    fn edge_resolution_accessors() {
        let resolved = Edge::from(NodeId(3));
        assert!(resolved.is_resolved());
        assert_eq!(resolved.resolved(), Some(NodeId(3)));

        let stub = Edge::Unresolved("m-1".to_string());
        assert!(!stub.is_resolved());
        assert_eq!(stub.resolved(), None);
    }

    #[test]
    fn summarize_error_names_message_count() {
        let err = ChatGraphError::Summarize {
            count: 4,
            source: "connection reset".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to create summary of 4 chat messages: connection reset"
        );
    }
}
