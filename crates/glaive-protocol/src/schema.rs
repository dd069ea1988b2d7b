//! Declared wire schemas: the field order of every message and command.
//!
//! The source of truth for what `[tag, field_0, field_1, ...]` means for
//! each type. The codec's encode path emits fields in this order and its
//! decode path binds positionally against it, so changing a schema here
//! changes the wire format, and the schema tests below pin the current
//! format down.

use crate::{CommandKind, MessageKind};

/// The declared wire shape of one message or command type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Wire-level type name (matches the enum variant).
    pub name: &'static str,
    /// Field names in wire order.
    pub fields: &'static [&'static str],
}

impl Schema {
    /// Number of required fields.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

impl MessageKind {
    /// The declared schema for this inbound kind.
    pub fn schema(self) -> &'static Schema {
        const CHARACTER_SPAWNED: Schema = Schema {
            name: "CharacterSpawned",
            fields: &["character", "move", "skillData"],
        };
        const CHARACTER_DIED: Schema = Schema {
            name: "CharacterDied",
            fields: &["characterId"],
        };
        const CHARACTER_MOVED: Schema = Schema {
            name: "CharacterMoved",
            fields: &["characterId", "move"],
        };
        const SKILL_USED_ON_CHARACTER: Schema = Schema {
            name: "SkillUsedOnCharacter",
            fields: &["casterId", "skillId", "targetId"],
        };
        const CHARACTER_GOT_DAMAGE: Schema = Schema {
            name: "CharacterGotDamage",
            fields: &["characterId", "damage"],
        };
        const INITIAL_DATA: Schema = Schema {
            name: "InitialData",
            fields: &["state", "scenario"],
        };
        const SERVER_MESSAGE: Schema = Schema {
            name: "ServerMessage",
            fields: &["message"],
        };
        const SCENARIO_END: Schema = Schema {
            name: "ScenarioEnd",
            fields: &["resolution"],
        };
        const SKILL_USED_ON_WORLD_MAP: Schema = Schema {
            name: "SkillUsedOnWorldMap",
            fields: &["casterId", "skillId", "x", "y"],
        };
        const WORLD_OBJECT_CREATED: Schema = Schema {
            name: "WorldObjectCreated",
            fields: &["worldObject"],
        };
        const SKILL_USED_ON_WORLD_OBJECT: Schema = Schema {
            name: "SkillUsedOnWorldObject",
            fields: &["casterId", "skillId", "worldObjectId"],
        };
        const WORLD_OBJECT_REMOVED: Schema = Schema {
            name: "WorldObjectRemoved",
            fields: &["worldObjectId"],
        };

        match self {
            MessageKind::CharacterSpawned => &CHARACTER_SPAWNED,
            MessageKind::CharacterDied => &CHARACTER_DIED,
            MessageKind::CharacterMoved => &CHARACTER_MOVED,
            MessageKind::SkillUsedOnCharacter => &SKILL_USED_ON_CHARACTER,
            MessageKind::CharacterGotDamage => &CHARACTER_GOT_DAMAGE,
            MessageKind::InitialData => &INITIAL_DATA,
            MessageKind::ServerMessage => &SERVER_MESSAGE,
            MessageKind::ScenarioEnd => &SCENARIO_END,
            MessageKind::SkillUsedOnWorldMap => &SKILL_USED_ON_WORLD_MAP,
            MessageKind::WorldObjectCreated => &WORLD_OBJECT_CREATED,
            MessageKind::SkillUsedOnWorldObject => {
                &SKILL_USED_ON_WORLD_OBJECT
            }
            MessageKind::WorldObjectRemoved => &WORLD_OBJECT_REMOVED,
        }
    }
}

impl CommandKind {
    /// The declared schema for this outbound kind.
    pub fn schema(self) -> &'static Schema {
        const MOVE: Schema = Schema {
            name: "Move",
            fields: &["x", "y"],
        };
        const USE_SKILL_ON_CHARACTER: Schema = Schema {
            name: "UseSkillOnCharacter",
            fields: &["skillId", "targetId"],
        };
        const USE_SKILL_ON_WORLD_MAP: Schema = Schema {
            name: "UseSkillOnWorldMap",
            fields: &["skillId", "x", "y"],
        };
        const BACKDOOR: Schema = Schema {
            name: "Backdoor",
            fields: &["command"],
        };
        const USE_SKILL_ON_WORLD_OBJECT: Schema = Schema {
            name: "UseSkillOnWorldObject",
            fields: &["skillId", "worldObjectId"],
        };

        match self {
            CommandKind::Move => &MOVE,
            CommandKind::UseSkillOnCharacter => &USE_SKILL_ON_CHARACTER,
            CommandKind::UseSkillOnWorldMap => &USE_SKILL_ON_WORLD_MAP,
            CommandKind::Backdoor => &BACKDOOR,
            CommandKind::UseSkillOnWorldObject => {
                &USE_SKILL_ON_WORLD_OBJECT
            }
        }
    }
}

// =========================================================================
// Tests — these pin the wire format; a failure here means the protocol
// changed shape.
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_schemas_declare_wire_field_order() {
        let cases: &[(MessageKind, &[&str])] = &[
            (
                MessageKind::CharacterSpawned,
                &["character", "move", "skillData"],
            ),
            (MessageKind::CharacterDied, &["characterId"]),
            (MessageKind::CharacterMoved, &["characterId", "move"]),
            (
                MessageKind::SkillUsedOnCharacter,
                &["casterId", "skillId", "targetId"],
            ),
            (
                MessageKind::CharacterGotDamage,
                &["characterId", "damage"],
            ),
            (MessageKind::InitialData, &["state", "scenario"]),
            (MessageKind::ServerMessage, &["message"]),
            (MessageKind::ScenarioEnd, &["resolution"]),
            (
                MessageKind::SkillUsedOnWorldMap,
                &["casterId", "skillId", "x", "y"],
            ),
            (MessageKind::WorldObjectCreated, &["worldObject"]),
            (
                MessageKind::SkillUsedOnWorldObject,
                &["casterId", "skillId", "worldObjectId"],
            ),
            (MessageKind::WorldObjectRemoved, &["worldObjectId"]),
        ];
        for (kind, fields) in cases {
            assert_eq!(kind.schema().fields, *fields, "schema of {kind}");
        }
    }

    #[test]
    fn test_command_schemas_declare_wire_field_order() {
        let cases: &[(CommandKind, &[&str])] = &[
            (CommandKind::Move, &["x", "y"]),
            (CommandKind::UseSkillOnCharacter, &["skillId", "targetId"]),
            (CommandKind::UseSkillOnWorldMap, &["skillId", "x", "y"]),
            (CommandKind::Backdoor, &["command"]),
            (
                CommandKind::UseSkillOnWorldObject,
                &["skillId", "worldObjectId"],
            ),
        ];
        for (kind, fields) in cases {
            assert_eq!(kind.schema().fields, *fields, "schema of {kind}");
        }
    }

    #[test]
    fn test_schema_name_matches_variant_name() {
        assert_eq!(MessageKind::CharacterDied.schema().name, "CharacterDied");
        assert_eq!(CommandKind::Move.schema().name, "Move");
    }

    #[test]
    fn test_arity() {
        assert_eq!(MessageKind::CharacterDied.schema().arity(), 1);
        assert_eq!(MessageKind::SkillUsedOnWorldMap.schema().arity(), 4);
        assert_eq!(CommandKind::Backdoor.schema().arity(), 1);
    }
}
