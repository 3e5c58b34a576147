//! # JSON Format
//!
//! `{"id", "name", "messages": [{"id", "role", "content", "in": [ids], "out": [ids]}]}`

use crate::{Chat, ChatGraphError};

/// Serialize a chat to compact JSON.
pub fn chat_to_json(chat: &Chat) -> Result<String, ChatGraphError> {
    serde_json::to_string(chat).map_err(|e| ChatGraphError::SerializationError(e.to_string()))
}

/// Serialize a chat to indented JSON.
pub fn chat_to_json_pretty(chat: &Chat) -> Result<String, ChatGraphError> {
    serde_json::to_string_pretty(chat)
        .map_err(|e| ChatGraphError::SerializationError(e.to_string()))
}

/// Parse a chat from JSON text. Edges come back unresolved.
pub fn chat_from_json(json: &str) -> Result<Chat, ChatGraphError> {
    serde_json::from_str(json).map_err(|e| ChatGraphError::DeserializationError(e.to_string()))
}

/// Parse a chat from JSON bytes. Edges come back unresolved.
pub fn chat_from_slice(bytes: &[u8]) -> Result<Chat, ChatGraphError> {
    serde_json::from_slice(bytes).map_err(|e| ChatGraphError::DeserializationError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
