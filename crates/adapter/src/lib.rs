//! Adapter crate - online play through a room relay over TCP
//!
//! The relay is a dumb forwarder: it groups clients into rooms, hands every
//! player the same seed when the host starts the match, and forwards each
//! player's `snapshot`, `attack` and `gameover` messages to everyone else in
//! the room. All game logic stays in the local engine.
//!
//! # Protocol Overview
//!
//! **Line-delimited JSON** over TCP, one object per line, discriminated by
//! `type`:
//!
//! 1. **Join**: client sends `join {room, name, spectator}`
//! 2. **Lobby**: relay answers `joined` / `waiting`
//! 3. **Start**: relay sends `start {seed, you, opponents}`; the client builds
//!    its engine from `seed`
//! 4. **Play**: client streams `snapshot` every 200ms of game time, `attack`
//!    whenever a lock sends garbage, and `gameover` once on top-out
//!
//! # Message Types
//!
//! ## Client → Relay
//!
//! - **join**, **snapshot**, **attack**, **gameover**, **ping**
//!
//! ## Relay → Client
//!
//! - **joined**, **waiting**, **start**, **snapshot** (with sender `player`),
//!   **attack**, **gameover**, **opponent_left**, **error**
//! - anything else parses as [`ServerMessage::Unknown`] and is ignored
//!
//! # Validation
//!
//! Relayed snapshots are checked (slot, row count, row width, cell alphabet)
//! before they replace an opponent view. Invalid ones are dropped and the
//! previous view is kept.
//!
//! # Configuration
//!
//! - `STACKERZ_RELAY_HOST` (default `127.0.0.1`)
//! - `STACKERZ_RELAY_PORT` (default `5050`)
//! - `STACKERZ_RELAY_ROOM` (default `default`)
//! - `STACKERZ_RELAY_NAME` (default `player`)

pub mod config;
pub mod protocol;
pub mod runtime;
pub mod session;

pub use stackerz_types as types;

pub use config::RelayConfig;
pub use protocol::{
    encode_message, parse_message, ClientMessage, NextMessage, OpponentInfo, PieceMessage,
    RoomSettings, ServerMessage, SnapshotMessage,
};
pub use runtime::{run_connection, RelayClient, RelayEvent};
pub use session::{OnlineSession, OpponentView, Outbound, SessionPhase, SnapshotError};
