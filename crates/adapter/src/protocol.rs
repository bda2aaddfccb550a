//! Protocol module - JSON messages exchanged with the room relay
//!
//! Line-delimited JSON: one object per line, discriminated by `type`. The
//! relay forwards `snapshot`, `attack` and `gameover` from one player to the
//! others, stamping the sender's slot into `player`.

use serde::{Deserialize, Serialize};

use stackerz_core::GameSnapshot;

use crate::types::{PieceKind, Rotation};

// ============== Client -> Relay Messages ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        room: String,
        name: String,
        #[serde(default)]
        spectator: bool,
    },
    Snapshot(SnapshotMessage),
    Attack {
        amount: u32,
    },
    Gameover,
    Ping,
}

/// Board state as published to (and relayed from) other players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMessage {
    /// Sender slot, filled in by the relay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<u8>,
    pub grid: Vec<String>,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub lines: u32,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub piece: Option<PieceMessage>,
    #[serde(default)]
    pub next: Option<NextMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceMessage {
    #[serde(with = "kind_letter")]
    pub kind: PieceKind,
    #[serde(with = "rotation_index")]
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NextMessage {
    #[serde(with = "kind_letter")]
    pub kind: PieceKind,
    #[serde(with = "rotation_index")]
    pub rotation: Rotation,
}

impl From<&GameSnapshot> for SnapshotMessage {
    fn from(s: &GameSnapshot) -> Self {
        Self {
            player: None,
            grid: s.grid.clone(),
            score: s.score,
            lines: s.lines,
            game_over: s.game_over,
            piece: s.piece.map(|p| PieceMessage {
                kind: p.kind,
                rotation: p.rotation,
                x: p.x,
                y: p.y,
            }),
            next: s.next.map(|n| NextMessage {
                kind: n.kind,
                rotation: n.rotation,
            }),
        }
    }
}

// ============== Relay -> Client Messages ==============

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Joined,
    Waiting {
        #[serde(default)]
        count: u32,
    },
    Start {
        seed: i64,
        you: u8,
        #[serde(default)]
        opponents: Vec<OpponentInfo>,
        #[serde(default)]
        settings: RoomSettings,
    },
    Snapshot(SnapshotMessage),
    Attack {
        amount: u32,
    },
    /// `player` is missing when the relay does not stamp senders.
    Gameover {
        #[serde(default)]
        player: Option<u8>,
    },
    OpponentLeft {
        #[serde(default)]
        player: Option<u8>,
    },
    Error {
        #[serde(default)]
        message: String,
    },
    /// Any type this client does not handle (lobby, chat, ...).
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentInfo {
    pub slot: u8,
    #[serde(default)]
    pub name: String,
}

/// Room options chosen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSettings {
    #[serde(default = "one")]
    pub speed_multiplier: f64,
}

fn one() -> f64 {
    1.0
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
        }
    }
}

/// Parse one inbound line.
///
/// Unknown `type`s become [`ServerMessage::Unknown`]; malformed JSON and
/// known types with bad fields are errors.
pub fn parse_message(line: &str) -> Result<ServerMessage, serde_json::Error> {
    serde_json::from_str(line)
}

/// Serialize one outbound message without the trailing newline.
pub fn encode_message(msg: &ClientMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

mod kind_letter {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::PieceKind;

    pub fn serialize<S>(kind: &PieceKind, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(kind.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<PieceKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Owned: relayed messages are buffered before the tag is known.
        let s = String::deserialize(deserializer)?;
        PieceKind::from_str(&s).ok_or_else(|| {
            serde::de::Error::unknown_variant(&s, &["I", "O", "T", "S", "Z", "J", "L"])
        })
    }
}

/// Rotations travel as 0..=3, clockwise from spawn.
mod rotation_index {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::Rotation;

    pub fn serialize<S>(rotation: &Rotation, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(rotation.index())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Rotation, D::Error>
    where
        D: Deserializer<'de>,
    {
        let i = u8::deserialize(deserializer)?;
        if i > 3 {
            return Err(serde::de::Error::custom(format!(
                "rotation index {i} out of range"
            )));
        }
        Ok(Rotation::from_index(i))
    }
}
