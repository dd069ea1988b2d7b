//! The tag registry and codec: bytes ⇄ typed messages/commands.
//!
//! A [`Protocol`] is built once from two independent tag tables (one per
//! direction), is immutable afterwards, and can be shared read-only by
//! any number of connections. The builder fails fast on configuration
//! mistakes so a bad registry never reaches a live socket.
//!
//! The envelope is a positional JSON array, `[tag, field_0, ...]`, so the
//! codec walks [`serde_json::Value`]s directly instead of deriving serde
//! impls: a serde enum encoding cannot express an integer-tagged
//! positional array with per-direction tag tables.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::error::Direction;
use crate::{
    CharacterId, Command, CommandKind, Message, MessageKind, ProtocolError,
    Schema, SkillId, WorldObjectId,
};

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// An immutable codec mapping wire tags to message/command types.
///
/// ## Example
///
/// ```rust
/// use glaive_protocol::{Command, CommandKind, Message, MessageKind, Protocol};
///
/// let protocol = Protocol::builder()
///     .register_parsing_message_type(6, MessageKind::CharacterDied)
///     .register_serialization_message_type(2, CommandKind::Move)
///     .build()
///     .unwrap();
///
/// let message = protocol.parse(b"[6, 42]").unwrap();
/// assert!(matches!(
///     message,
///     Message::CharacterDied { character_id } if character_id.0 == 42
/// ));
///
/// let bytes = protocol.serialize(&Command::Move { x: 1.0, y: 2.0 }).unwrap();
/// assert_eq!(bytes, b"[2,1.0,2.0]");
/// ```
#[derive(Debug, Clone)]
pub struct Protocol {
    parse_table: HashMap<u32, MessageKind>,
    serialize_table: HashMap<CommandKind, u32>,
}

impl Protocol {
    /// Starts an empty registry.
    pub fn builder() -> ProtocolBuilder {
        ProtocolBuilder::default()
    }

    /// Decodes an incoming payload into a typed [`Message`].
    ///
    /// The leading array element is the tag; the rest bind positionally
    /// to the registered kind's schema. Fields beyond the declared arity
    /// are ignored; missing or mistyped fields are an error.
    ///
    /// # Errors
    /// - [`ProtocolError::MalformedPayload`] — not JSON, not an array,
    ///   empty, non-integer tag, or schema violation
    /// - [`ProtocolError::UnknownInboundTag`] — tag not in the parse table
    pub fn parse(&self, bytes: &[u8]) -> Result<Message, ProtocolError> {
        let envelope: Value = serde_json::from_slice(bytes).map_err(|e| {
            ProtocolError::MalformedPayload(format!("invalid JSON: {e}"))
        })?;
        let Value::Array(mut elements) = envelope else {
            return Err(ProtocolError::MalformedPayload(
                "envelope is not an array".into(),
            ));
        };
        if elements.is_empty() {
            return Err(ProtocolError::MalformedPayload(
                "envelope is empty".into(),
            ));
        }

        let tag_value = elements.remove(0);
        let tag = tag_value
            .as_u64()
            .and_then(|tag| u32::try_from(tag).ok())
            .ok_or_else(|| {
                ProtocolError::MalformedPayload(format!(
                    "envelope tag {tag_value} is not an unsigned integer"
                ))
            })?;

        let kind = self
            .parse_table
            .get(&tag)
            .copied()
            .ok_or(ProtocolError::UnknownInboundTag(tag))?;

        decode_message(kind, elements)
    }

    /// Encodes a [`Command`] into its wire payload.
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnregisteredOutboundType`] if the
    /// command's kind is not in the serialize table. Nothing is written
    /// anywhere on failure; the caller still owns the command.
    pub fn serialize(
        &self,
        command: &Command,
    ) -> Result<Vec<u8>, ProtocolError> {
        let kind = command.kind();
        let tag = self
            .serialize_table
            .get(&kind)
            .copied()
            .ok_or(ProtocolError::UnregisteredOutboundType(kind))?;

        let mut elements = vec![Value::from(tag)];
        elements.extend(wire_fields(command));
        serde_json::to_vec(&Value::Array(elements)).map_err(|e| {
            ProtocolError::MalformedPayload(format!("encode failed: {e}"))
        })
    }
}

// ---------------------------------------------------------------------------
// ProtocolBuilder
// ---------------------------------------------------------------------------

/// Incremental registry builder, finalized by [`build`](Self::build).
///
/// Registrations accumulate as written; all validation happens in
/// `build`, so a duplicate tag is reported as a configuration error
/// before any connection attempt.
#[derive(Debug, Default)]
pub struct ProtocolBuilder {
    parsing: Vec<(u32, MessageKind)>,
    serialization: Vec<(u32, CommandKind)>,
}

impl ProtocolBuilder {
    /// Registers an inbound tag → message type mapping.
    pub fn register_parsing_message_type(
        mut self,
        tag: u32,
        kind: MessageKind,
    ) -> Self {
        self.parsing.push((tag, kind));
        self
    }

    /// Registers an outbound command type → tag mapping.
    pub fn register_serialization_message_type(
        mut self,
        tag: u32,
        kind: CommandKind,
    ) -> Self {
        self.serialization.push((tag, kind));
        self
    }

    /// Finalizes the registry.
    ///
    /// # Errors
    /// - [`ProtocolError::DuplicateTag`] — a tag appears twice within one
    ///   table (the same tag once per direction is legal)
    /// - [`ProtocolError::DuplicateCommand`] — a command kind registered
    ///   under two tags
    pub fn build(self) -> Result<Protocol, ProtocolError> {
        let mut parse_table = HashMap::new();
        for (tag, kind) in self.parsing {
            if parse_table.insert(tag, kind).is_some() {
                return Err(ProtocolError::DuplicateTag {
                    direction: Direction::Inbound,
                    tag,
                });
            }
        }

        let mut serialize_table = HashMap::new();
        let mut outbound_tags = HashMap::new();
        for (tag, kind) in self.serialization {
            if outbound_tags.insert(tag, kind).is_some() {
                return Err(ProtocolError::DuplicateTag {
                    direction: Direction::Outbound,
                    tag,
                });
            }
            if serialize_table.insert(kind, tag).is_some() {
                return Err(ProtocolError::DuplicateCommand(kind));
            }
        }

        Ok(Protocol {
            parse_table,
            serialize_table,
        })
    }
}

/// The canonical instance-server registry: every message and command the
/// game client exchanges with an instance, under their assigned tags.
///
/// Tags 8 and 11 appear in both directions; the tables are independent,
/// so that is fine.
pub fn instance_protocol() -> Protocol {
    Protocol::builder()
        .register_parsing_message_type(5, MessageKind::CharacterSpawned)
        .register_parsing_message_type(6, MessageKind::CharacterDied)
        .register_parsing_message_type(7, MessageKind::CharacterMoved)
        .register_parsing_message_type(8, MessageKind::SkillUsedOnCharacter)
        .register_parsing_message_type(9, MessageKind::CharacterGotDamage)
        .register_parsing_message_type(11, MessageKind::InitialData)
        .register_parsing_message_type(12, MessageKind::ServerMessage)
        .register_parsing_message_type(19, MessageKind::ScenarioEnd)
        .register_parsing_message_type(21, MessageKind::SkillUsedOnWorldMap)
        .register_parsing_message_type(22, MessageKind::WorldObjectCreated)
        .register_parsing_message_type(23, MessageKind::SkillUsedOnWorldObject)
        .register_parsing_message_type(24, MessageKind::WorldObjectRemoved)
        .register_serialization_message_type(2, CommandKind::Move)
        .register_serialization_message_type(3, CommandKind::UseSkillOnCharacter)
        .register_serialization_message_type(4, CommandKind::UseSkillOnWorldMap)
        .register_serialization_message_type(8, CommandKind::Backdoor)
        .register_serialization_message_type(11, CommandKind::UseSkillOnWorldObject)
        .build()
        .expect("canonical registry is duplicate-free")
}

// ---------------------------------------------------------------------------
// Field decoding
// ---------------------------------------------------------------------------

fn field<'v>(
    fields: &'v mut [Value],
    schema: &'static Schema,
    index: usize,
) -> Result<&'v mut Value, ProtocolError> {
    if index < fields.len() {
        Ok(&mut fields[index])
    } else {
        Err(ProtocolError::MalformedPayload(format!(
            "{} is missing field `{}`",
            schema.name, schema.fields[index]
        )))
    }
}

fn id_field(
    fields: &mut [Value],
    schema: &'static Schema,
    index: usize,
) -> Result<u64, ProtocolError> {
    field(fields, schema, index)?.as_u64().ok_or_else(|| {
        ProtocolError::MalformedPayload(format!(
            "{} field `{}` is not an unsigned integer",
            schema.name, schema.fields[index]
        ))
    })
}

fn number_field(
    fields: &mut [Value],
    schema: &'static Schema,
    index: usize,
) -> Result<f64, ProtocolError> {
    field(fields, schema, index)?.as_f64().ok_or_else(|| {
        ProtocolError::MalformedPayload(format!(
            "{} field `{}` is not a number",
            schema.name, schema.fields[index]
        ))
    })
}

fn string_field(
    fields: &mut [Value],
    schema: &'static Schema,
    index: usize,
) -> Result<String, ProtocolError> {
    match field(fields, schema, index)?.take() {
        Value::String(text) => Ok(text),
        _ => Err(ProtocolError::MalformedPayload(format!(
            "{} field `{}` is not a string",
            schema.name, schema.fields[index]
        ))),
    }
}

/// Opaque game-state blob: any JSON value, handed through untouched.
fn opaque_field(
    fields: &mut [Value],
    schema: &'static Schema,
    index: usize,
) -> Result<Value, ProtocolError> {
    Ok(field(fields, schema, index)?.take())
}

fn resolution_field(
    fields: &mut [Value],
    schema: &'static Schema,
    index: usize,
) -> Result<crate::ScenarioResolution, ProtocolError> {
    let value = field(fields, schema, index)?.take();
    serde_json::from_value(value).map_err(|e| {
        ProtocolError::MalformedPayload(format!(
            "{} field `{}`: {e}",
            schema.name, schema.fields[index]
        ))
    })
}

/// Binds decoded envelope fields positionally to the kind's variant.
fn decode_message(
    kind: MessageKind,
    mut fields: Vec<Value>,
) -> Result<Message, ProtocolError> {
    let schema = kind.schema();
    let fields = fields.as_mut_slice();
    let message = match kind {
        MessageKind::CharacterSpawned => Message::CharacterSpawned {
            character: opaque_field(fields, schema, 0)?,
            movement: opaque_field(fields, schema, 1)?,
            skill_data: opaque_field(fields, schema, 2)?,
        },
        MessageKind::CharacterDied => Message::CharacterDied {
            character_id: CharacterId(id_field(fields, schema, 0)?),
        },
        MessageKind::CharacterMoved => Message::CharacterMoved {
            character_id: CharacterId(id_field(fields, schema, 0)?),
            movement: opaque_field(fields, schema, 1)?,
        },
        MessageKind::SkillUsedOnCharacter => Message::SkillUsedOnCharacter {
            caster_id: CharacterId(id_field(fields, schema, 0)?),
            skill_id: SkillId(id_field(fields, schema, 1)?),
            target_id: CharacterId(id_field(fields, schema, 2)?),
        },
        MessageKind::CharacterGotDamage => Message::CharacterGotDamage {
            character_id: CharacterId(id_field(fields, schema, 0)?),
            damage: number_field(fields, schema, 1)?,
        },
        MessageKind::InitialData => Message::InitialData {
            state: opaque_field(fields, schema, 0)?,
            scenario: opaque_field(fields, schema, 1)?,
        },
        MessageKind::ServerMessage => Message::ServerMessage {
            message: string_field(fields, schema, 0)?,
        },
        MessageKind::ScenarioEnd => Message::ScenarioEnd {
            resolution: resolution_field(fields, schema, 0)?,
        },
        MessageKind::SkillUsedOnWorldMap => Message::SkillUsedOnWorldMap {
            caster_id: CharacterId(id_field(fields, schema, 0)?),
            skill_id: SkillId(id_field(fields, schema, 1)?),
            x: number_field(fields, schema, 2)?,
            y: number_field(fields, schema, 3)?,
        },
        MessageKind::WorldObjectCreated => Message::WorldObjectCreated {
            world_object: opaque_field(fields, schema, 0)?,
        },
        MessageKind::SkillUsedOnWorldObject => {
            Message::SkillUsedOnWorldObject {
                caster_id: CharacterId(id_field(fields, schema, 0)?),
                skill_id: SkillId(id_field(fields, schema, 1)?),
                world_object_id: WorldObjectId(id_field(fields, schema, 2)?),
            }
        }
        MessageKind::WorldObjectRemoved => Message::WorldObjectRemoved {
            world_object_id: WorldObjectId(id_field(fields, schema, 0)?),
        },
    };
    Ok(message)
}

// ---------------------------------------------------------------------------
// Field encoding
// ---------------------------------------------------------------------------

/// A command's field values in its schema's declared order.
fn wire_fields(command: &Command) -> Vec<Value> {
    match command {
        Command::Move { x, y } => vec![json!(x), json!(y)],
        Command::UseSkillOnCharacter {
            skill_id,
            target_id,
        } => vec![json!(skill_id), json!(target_id)],
        Command::UseSkillOnWorldMap { skill_id, x, y } => {
            vec![json!(skill_id), json!(x), json!(y)]
        }
        Command::Backdoor { command } => vec![command.clone()],
        Command::UseSkillOnWorldObject {
            skill_id,
            world_object_id,
        } => vec![json!(skill_id), json!(world_object_id)],
    }
}

// =========================================================================
// Tests
// =========================================================================
