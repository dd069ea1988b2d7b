//! Core wire types: identifiers, inbound messages, outbound commands.
//!
//! Messages travel server → client and are produced only by
//! [`Protocol::parse`](crate::Protocol::parse). Commands travel
//! client → server and are consumed by
//! [`Protocol::serialize`](crate::Protocol::serialize). The two
//! directions are independent: their tag spaces may overlap, and a type
//! exists in exactly one of them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a character (player-controlled or NPC).
///
/// Newtype over `u64`, like every id on this wire. `#[serde(transparent)]`
/// keeps the JSON representation a plain number: `CharacterId(42)` is `42`
/// on the wire, not `{"0": 42}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u64);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// A unique identifier for a skill definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub u64);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A unique identifier for an object placed on the world map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldObjectId(pub u64);

impl fmt::Display for WorldObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ScenarioResolution
// ---------------------------------------------------------------------------

/// How a scenario ended. Serialized as the bare variant name
/// (`"Victory"` / `"Defeat"`), matching the server's enum encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioResolution {
    Victory,
    Defeat,
}

// ---------------------------------------------------------------------------
// Inbound messages
// ---------------------------------------------------------------------------

/// Discriminant for inbound message types.
///
/// This is the dispatch key shared by the codec and the message
/// dispatcher: the codec maps a wire tag to a kind, and subscribers
/// register interest by kind. Keying on an explicit enum (rather than on
/// type identity) keeps dispatch decoupled from how messages are
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    CharacterSpawned,
    CharacterDied,
    CharacterMoved,
    SkillUsedOnCharacter,
    CharacterGotDamage,
    InitialData,
    ServerMessage,
    ScenarioEnd,
    SkillUsedOnWorldMap,
    WorldObjectCreated,
    SkillUsedOnWorldObject,
    WorldObjectRemoved,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema().name)
    }
}

/// A parsed server → client message.
///
/// One struct variant per [`MessageKind`]. Field order in each variant is
/// the wire order; the authoritative declaration lives in the kind's
/// [`Schema`](crate::Schema), which the codec and the tests both consume.
///
/// Game-state blobs the session layer never interprets (`character`,
/// `move`, `skillData`, the initial world snapshot, …) are carried as
/// opaque [`serde_json::Value`]s and handed to consumers untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A character entered the instance, with its current movement plan
    /// and skill-relevant stats.
    CharacterSpawned {
        character: Value,
        movement: Value,
        skill_data: Value,
    },

    /// A character died and is gone from the instance.
    CharacterDied { character_id: CharacterId },

    /// A character's movement plan changed.
    CharacterMoved {
        character_id: CharacterId,
        movement: Value,
    },

    /// A caster used a targeted skill on another character.
    SkillUsedOnCharacter {
        caster_id: CharacterId,
        skill_id: SkillId,
        target_id: CharacterId,
    },

    /// A character took damage.
    CharacterGotDamage {
        character_id: CharacterId,
        damage: f64,
    },

    /// The full world snapshot sent right after the connection opens.
    InitialData { state: Value, scenario: Value },

    /// A human-readable notice to display to the player.
    ServerMessage { message: String },

    /// The running scenario finished.
    ScenarioEnd { resolution: ScenarioResolution },

    /// A caster used a skill on a ground position.
    SkillUsedOnWorldMap {
        caster_id: CharacterId,
        skill_id: SkillId,
        x: f64,
        y: f64,
    },

    /// An object appeared on the world map.
    WorldObjectCreated { world_object: Value },

    /// A caster used a skill on a world object.
    SkillUsedOnWorldObject {
        caster_id: CharacterId,
        skill_id: SkillId,
        world_object_id: WorldObjectId,
    },

    /// An object was removed from the world map.
    WorldObjectRemoved { world_object_id: WorldObjectId },
}

impl Message {
    /// The discriminant used for dispatch.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::CharacterSpawned { .. } => MessageKind::CharacterSpawned,
            Message::CharacterDied { .. } => MessageKind::CharacterDied,
            Message::CharacterMoved { .. } => MessageKind::CharacterMoved,
            Message::SkillUsedOnCharacter { .. } => {
                MessageKind::SkillUsedOnCharacter
            }
            Message::CharacterGotDamage { .. } => {
                MessageKind::CharacterGotDamage
            }
            Message::InitialData { .. } => MessageKind::InitialData,
            Message::ServerMessage { .. } => MessageKind::ServerMessage,
            Message::ScenarioEnd { .. } => MessageKind::ScenarioEnd,
            Message::SkillUsedOnWorldMap { .. } => {
                MessageKind::SkillUsedOnWorldMap
            }
            Message::WorldObjectCreated { .. } => {
                MessageKind::WorldObjectCreated
            }
            Message::SkillUsedOnWorldObject { .. } => {
                MessageKind::SkillUsedOnWorldObject
            }
            Message::WorldObjectRemoved { .. } => {
                MessageKind::WorldObjectRemoved
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound commands
// ---------------------------------------------------------------------------

/// Discriminant for outbound command types. The serialize table is keyed
/// by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Move,
    UseSkillOnCharacter,
    UseSkillOnWorldMap,
    Backdoor,
    UseSkillOnWorldObject,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema().name)
    }
}

/// A client → server command, built by game logic and handed to
/// [`Protocol::serialize`](crate::Protocol::serialize).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Walk toward the given world position.
    Move { x: f64, y: f64 },

    /// Use a skill on a character.
    UseSkillOnCharacter {
        skill_id: SkillId,
        target_id: CharacterId,
    },

    /// Use a skill on a ground position.
    UseSkillOnWorldMap { skill_id: SkillId, x: f64, y: f64 },

    /// Dev-console escape hatch; the payload is interpreted server-side
    /// and only honored on development servers.
    Backdoor { command: Value },

    /// Use a skill on a world object.
    UseSkillOnWorldObject {
        skill_id: SkillId,
        world_object_id: WorldObjectId,
    },
}

impl Command {
    /// The discriminant used for serialize-table lookup.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Move { .. } => CommandKind::Move,
            Command::UseSkillOnCharacter { .. } => {
                CommandKind::UseSkillOnCharacter
            }
            Command::UseSkillOnWorldMap { .. } => {
                CommandKind::UseSkillOnWorldMap
            }
            Command::Backdoor { .. } => CommandKind::Backdoor,
            Command::UseSkillOnWorldObject { .. } => {
                CommandKind::UseSkillOnWorldObject
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_character_id_serializes_as_plain_number() {
        // `#[serde(transparent)]` means CharacterId(42) → `42`.
        let json = serde_json::to_string(&CharacterId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_character_id_deserializes_from_plain_number() {
        let id: CharacterId = serde_json::from_str("42").unwrap();
        assert_eq!(id, CharacterId(42));
    }

    #[test]
    fn test_id_display_prefixes() {
        assert_eq!(CharacterId(7).to_string(), "C-7");
        assert_eq!(SkillId(3).to_string(), "S-3");
        assert_eq!(WorldObjectId(9).to_string(), "O-9");
    }

    // =====================================================================
    // ScenarioResolution
    // =====================================================================

    #[test]
    fn test_resolution_serializes_as_variant_name() {
        let json = serde_json::to_string(&ScenarioResolution::Victory).unwrap();
        assert_eq!(json, "\"Victory\"");
        let json = serde_json::to_string(&ScenarioResolution::Defeat).unwrap();
        assert_eq!(json, "\"Defeat\"");
    }

    #[test]
    fn test_resolution_rejects_unknown_variant() {
        let result: Result<ScenarioResolution, _> =
            serde_json::from_str("\"Draw\"");
        assert!(result.is_err());
    }

    // =====================================================================
    // Kind mapping
    // =====================================================================

    #[test]
    fn test_message_kind_matches_variant() {
        let msg = Message::CharacterDied {
            character_id: CharacterId(1),
        };
        assert_eq!(msg.kind(), MessageKind::CharacterDied);

        let msg = Message::ServerMessage {
            message: "hello".into(),
        };
        assert_eq!(msg.kind(), MessageKind::ServerMessage);
    }

    #[test]
    fn test_command_kind_matches_variant() {
        let cmd = Command::Move { x: 1.0, y: 2.0 };
        assert_eq!(cmd.kind(), CommandKind::Move);

        let cmd = Command::UseSkillOnWorldObject {
            skill_id: SkillId(1),
            world_object_id: WorldObjectId(2),
        };
        assert_eq!(cmd.kind(), CommandKind::UseSkillOnWorldObject);
    }

    #[test]
    fn test_kind_display_uses_schema_name() {
        assert_eq!(MessageKind::CharacterDied.to_string(), "CharacterDied");
        assert_eq!(CommandKind::Backdoor.to_string(), "Backdoor");
    }
}
