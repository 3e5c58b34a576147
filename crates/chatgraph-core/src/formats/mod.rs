//! # Formats
//!
//! The serialized form of a chat. Edges are written as lists of message ids,
//! never as nested messages, which bounds the output size and keeps cyclic
//! graphs finite.
//!
//! - `json` → human-readable form (`serde_json`)
//! - `persistence` → binary form (header + `postcard` payload)
//!
//! Reading either form yields id-only edges; call
//! [`Chat::hydrate_messages`](crate::Chat::hydrate_messages) before relying
//! on edge targets.

pub mod json;
pub mod persistence;

use crate::{Chat, Edge, Graph, Message, Role};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use json::{chat_from_json, chat_from_slice, chat_to_json, chat_to_json_pretty};
pub use persistence::{PersistenceHeader, chat_from_bytes, chat_to_bytes};

// =============================================================================
// SERIALIZABLE REPRESENTATION
// =============================================================================

/// A message with its edges reduced to id lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "in", default)]
    pub incoming: Vec<String>,
    #[serde(rename = "out", default)]
    pub outgoing: Vec<String>,
}

/// A chat as it is written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableChat {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub messages: Vec<SerializableMessage>,
}

impl From<&Chat> for SerializableChat {
    fn from(chat: &Chat) -> Self {
        let graph = &chat.graph;
        Self {
            id: chat.id.clone(),
            name: chat.name.clone(),
            messages: graph
                .iter()
                .map(|(_, m)| SerializableMessage {
                    id: m.id.clone(),
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                    incoming: graph.ids_of(&m.incoming),
                    outgoing: graph.ids_of(&m.outgoing),
                })
                .collect(),
        }
    }
}

impl From<SerializableChat> for Chat {
    fn from(sc: SerializableChat) -> Self {
        let mut graph = Graph::new();
        for sm in sc.messages {
            graph.insert(Message {
                id: sm.id,
                role: Role::from(sm.role),
                content: sm.content,
                incoming: sm.incoming.into_iter().map(Edge::Unresolved).collect(),
                outgoing: sm.outgoing.into_iter().map(Edge::Unresolved).collect(),
            });
        }
        Self {
            id: sc.id,
            name: sc.name,
            graph,
            roots: None,
        }
    }
}

impl Serialize for Chat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SerializableChat::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Chat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SerializableChat::deserialize(deserializer).map(Chat::from)
    }
}

// =============================================================================
// TESTS
// =============================================================================
