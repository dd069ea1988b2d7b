//! # Glaive
//!
//! Network session layer for real-time game clients.
//!
//! Glaive connects a game client to an instance server and keeps the
//! rest of the client decoupled from the wire: a tagged JSON protocol
//! codec, a connection state machine over a pluggable transport, and
//! publish/subscribe fan-out of parsed messages and connection state.
//!
//! ```text
//! transport bytes → Protocol::parse → Message → MessageDispatcher → game logic
//! game logic → Connection::send_command → Protocol::serialize → transport bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glaive::prelude::*;
//!
//! # async fn run() -> Result<(), glaive::SessionError> {
//! let dispatcher = MessageDispatcher::new();
//! dispatcher.subscribe(MessageKind::CharacterDied, |message| {
//!     if let Message::CharacterDied { character_id } = message {
//!         println!("{character_id} died");
//!     }
//! });
//!
//! let transport = WebSocketTransport::new("ws://play.example.net:7000");
//! let connection = Connection::new(
//!     transport,
//!     Arc::new(instance_protocol()),
//!     dispatcher.clone(),
//! );
//! connection.connect("instance-1", "user-token").await?;
//! connection.send_command(&Command::Move { x: 5.0, y: 2.5 }).await?;
//! # Ok(())
//! # }
//! ```

pub use glaive_events::{
    state_channel, EventPublisher, EventStream, StateReader, StateWriter,
    SubscriptionId,
};
pub use glaive_protocol::{
    instance_protocol, CharacterId, Command, CommandKind, Direction,
    Message, MessageKind, Protocol, ProtocolBuilder, ProtocolError,
    ScenarioResolution, Schema, SkillId, WorldObjectId,
};
pub use glaive_session::{
    Connection, ConnectionState, MessageDispatcher, SessionError,
};
pub use glaive_transport::{
    ChannelHandle, ChannelPeer, ChannelTransport, Transport,
    TransportError, TransportHandle, WebSocketHandle, WebSocketTransport,
};

/// The names most clients need, in one import.
pub mod prelude {
    pub use glaive_events::{StateReader, SubscriptionId};
    pub use glaive_protocol::{
        instance_protocol, CharacterId, Command, Message, MessageKind,
        Protocol, SkillId, WorldObjectId,
    };
    pub use glaive_session::{
        Connection, ConnectionState, MessageDispatcher, SessionError,
    };
    pub use glaive_transport::{
        Transport, TransportHandle, WebSocketTransport,
    };
}
