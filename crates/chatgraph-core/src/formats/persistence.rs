//! # Binary Format
//!
//! Compact serialization for chats. File I/O lives in the app layer.
//!
//! Format: Header (5 bytes) + postcard-serialized [`SerializableChat`].
//! - 4 bytes: Magic ("CGRF")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded.

use super::SerializableChat;
use crate::primitives::{FORMAT_VERSION, HEADER_SIZE, MAGIC_BYTES, MAX_PERSISTENCE_PAYLOAD_SIZE};
use crate::{Chat, ChatGraphError};

// =============================================================================
// FILE HEADER
// =============================================================================

/// The header preceding every binary chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), ChatGraphError> {
        if &self.magic != MAGIC_BYTES {
            return Err(ChatGraphError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(ChatGraphError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChatGraphError> {
        let Some(header) = bytes.get(..HEADER_SIZE) else {
            return Err(ChatGraphError::DeserializationError(
                "Header too short".to_string(),
            ));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        Ok(Self {
            magic,
            version: header[4],
        })
    }

    /// Check whether `bytes` start with the chatgraph magic, regardless of
    /// version. Used to tell binary files from JSON.
    #[must_use]
    pub fn is_binary(bytes: &[u8]) -> bool {
        bytes.starts_with(MAGIC_BYTES)
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a chat to bytes (header + payload).
pub fn chat_to_bytes(chat: &Chat) -> Result<Vec<u8>, ChatGraphError> {
    let header = PersistenceHeader::new();
    let serializable = SerializableChat::from(chat);

    let payload = postcard::to_stdvec(&serializable)
        .map_err(|e| ChatGraphError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a chat from bytes. Edges come back unresolved.
pub fn chat_from_bytes(bytes: &[u8]) -> Result<Chat, ChatGraphError> {
    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(ChatGraphError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[HEADER_SIZE..];
    let serializable: SerializableChat = postcard::from_bytes(payload).map_err(|e| {
        ChatGraphError::DeserializationError(format!("Failed to decode chat data: {}", e))
    })?;

    Ok(Chat::from(serializable))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    fn sample() -> Chat {
        let mut chat = Chat::new("chat-1", "binary");
        let q = chat.push(Message::user("1", "Who is Jon Snow's mother?"));
        let a = chat.push(Message::assistant("2", "Lyanna Stark."));
        chat.graph.add_out_in(q, a).expect("link");
        chat
    }

    #[test]
    fn header_roundtrip() {
        let header = PersistenceHeader::new();
        let restored = PersistenceHeader::from_bytes(&header.to_bytes()).expect("parse header");
        assert_eq!(restored, header);
    }

    #[test]
    fn bytes_are_stable_across_reload() {
        let chat = sample();
        let bytes1 = chat_to_bytes(&chat).expect("first serialize");

        let mut restored = chat_from_bytes(&bytes1).expect("deserialize");
        assert!(PersistenceHeader::is_binary(&bytes1));
        assert!(restored.hydrate_messages().is_complete());

        let bytes2 = chat_to_bytes(&restored).expect("second serialize");
        assert_eq!(bytes1, bytes2, "save -> load -> save must produce identical bytes");
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = vec![0u8; 10];
        bytes[0..4].copy_from_slice(b"XXXX");
        assert!(chat_from_bytes(&bytes).is_err());
        assert!(!PersistenceHeader::is_binary(&bytes));
    }

    #[test]
    fn future_version_rejected() {
        let mut bytes = chat_to_bytes(&sample()).expect("serialize");
        bytes[4] = FORMAT_VERSION + 1;
        let result = chat_from_bytes(&bytes);
        assert!(matches!(result, Err(ChatGraphError::DeserializationError(_))));
    }

    #[test]
    fn truncated_input_rejected() {
        assert!(chat_from_bytes(b"CGR").is_err());

        let bytes = chat_to_bytes(&sample()).expect("serialize");
        assert!(chat_from_bytes(&bytes[..bytes.len() - 3]).is_err());
    }
}
