//! Error types for the protocol layer.

use crate::CommandKind;
use std::fmt;

/// Which tag table a registration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Server → client; the parse table.
    Inbound,
    /// Client → server; the serialize table.
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => f.write_str("inbound"),
            Direction::Outbound => f.write_str("outbound"),
        }
    }
}

/// Errors that can occur in the protocol layer.
///
/// The first three are runtime errors on the encode/decode paths. The
/// `Duplicate*` variants are configuration errors raised by
/// [`ProtocolBuilder::build`](crate::ProtocolBuilder::build), before any
/// connection exists.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// An incoming payload carried a tag with no registered message type.
    #[error("unknown inbound message tag {0}")]
    UnknownInboundTag(u32),

    /// A command was handed to `serialize` without being registered in
    /// the serialize table. Nothing is written to the transport.
    #[error("command {0} is not registered for serialization")]
    UnregisteredOutboundType(CommandKind),

    /// The payload could not be decoded against the registered schema:
    /// invalid JSON, a non-array envelope, a non-integer tag, or a
    /// missing/mistyped field.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The same tag was registered twice within one table. The same tag
    /// once per direction is legal.
    #[error("tag {tag} registered twice in the {direction} table")]
    DuplicateTag { direction: Direction, tag: u32 },

    /// The same command kind was registered twice; its serialize lookup
    /// would be ambiguous.
    #[error("command {0} registered twice for serialization")]
    DuplicateCommand(CommandKind),
}
