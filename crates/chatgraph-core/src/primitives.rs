//! # Primitives
//!
//! Fixed constants of the chatgraph formats.

/// Magic bytes for the chatgraph binary format header.
///
/// - File Header = Magic Bytes ("CGRF") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"CGRF";

/// Current binary format version.
///
/// Increment this when making breaking changes to the serialized layout.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the binary header (magic + version).
pub const HEADER_SIZE: usize = 5;

/// Maximum allowed size of a serialized chat, checked before decoding.
///
/// 256 MB is far beyond any realistic conversation.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 256 * 1024 * 1024;
