//! Wire protocol for Glaive.
//!
//! This crate defines the "language" the game client speaks with the
//! instance server:
//!
//! - **Types** ([`Message`], [`Command`], id newtypes) — the structured
//!   values that cross the wire.
//! - **Schemas** ([`Schema`]) — the declared field order of every message
//!   and command, as a first-class, testable artifact.
//! - **Codec** ([`Protocol`], [`ProtocolBuilder`]) — the tag registry that
//!   serializes commands and parses messages.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding,
//!   decoding, or building a registry.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and session
//! (connection lifecycle). It knows nothing about sockets or state
//! machines; it only converts between bytes and typed values.
//!
//! ```text
//! Transport (bytes) → Protocol (Message) → Dispatcher (subscribers)
//! ```
//!
//! # Wire format
//!
//! Every payload is a JSON array whose first element is an integer tag and
//! whose remaining elements are the fields of the tagged type, in schema
//! order:
//!
//! ```text
//! [6, 42]          → CharacterDied { character_id: 42 }
//! [2, 5.0, -3.5]   ← Move { x: 5.0, y: -3.5 }
//! ```
//!
//! The receiver can dispatch on the leading tag before looking at the
//! rest. Framing and integrity are the transport's concern; there is no
//! length prefix or checksum at this layer.

mod codec;
mod error;
mod schema;
mod types;

pub use codec::{instance_protocol, Protocol, ProtocolBuilder};
pub use error::{Direction, ProtocolError};
pub use schema::Schema;
pub use types::{
    CharacterId, Command, CommandKind, Message, MessageKind,
    ScenarioResolution, SkillId, WorldObjectId,
};
