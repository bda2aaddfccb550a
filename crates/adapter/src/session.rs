//! Online session: one local engine plus read-only views of the other players.
//!
//! The session is synchronous and knows nothing about sockets. Feed it inbound
//! [`ServerMessage`]s with [`OnlineSession::handle`], local commands with
//! [`OnlineSession::apply`], and call [`OnlineSession::tick`] every frame to
//! advance the engine and collect the messages to send.

use arrayvec::ArrayVec;
use thiserror::Error;

use stackerz_core::{Board, EngineConfig, GameState, GridError};

use crate::protocol::{
    ClientMessage, NextMessage, OpponentInfo, PieceMessage, RoomSettings, ServerMessage,
    SnapshotMessage,
};
use crate::types::Action;

/// Game time between published snapshots.
pub const SNAPSHOT_INTERVAL_MS: u32 = 200;

/// Relay rooms hold at most this many players.
pub const MAX_PLAYERS: usize = 4;

/// Messages produced by a single tick: attack, snapshot, gameover.
pub type Outbound = ArrayVec<ClientMessage, 3>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot carries no player slot and the sender is ambiguous")]
    MissingPlayer,
    #[error("player slot {0} is out of range")]
    SlotOutOfRange(u8),
    #[error("snapshot claims our own slot {0}")]
    OwnSlot(u8),
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
}

/// Last accepted state of another player.
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentView {
    pub name: String,
    pub board: Board,
    pub score: u64,
    pub lines: u32,
    pub game_over: bool,
    pub piece: Option<PieceMessage>,
    pub next: Option<NextMessage>,
    pub left: bool,
}

impl OpponentView {
    fn named(name: String) -> Self {
        Self {
            name,
            board: Board::new(),
            score: 0,
            lines: 0,
            game_over: false,
            piece: None,
            next: None,
            left: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Join sent, nothing heard yet.
    Joining,
    /// In a room, waiting for the host to start.
    Waiting,
    Playing,
    /// Local engine topped out and `gameover` was emitted.
    Finished,
}

#[derive(Debug, Clone)]
pub struct OnlineSession {
    base_config: EngineConfig,
    phase: SessionPhase,
    slot: Option<u8>,
    game: Option<GameState>,
    opponents: [Option<OpponentView>; MAX_PLAYERS],
    snapshot_ms: u32,
    last_error: Option<String>,
}

impl OnlineSession {
    pub fn new(base_config: EngineConfig) -> Self {
        Self {
            base_config,
            phase: SessionPhase::Joining,
            slot: None,
            game: None,
            opponents: Default::default(),
            snapshot_ms: 0,
            last_error: None,
        }
    }

    pub fn join_message(room: &str, name: &str) -> ClientMessage {
        ClientMessage::Join {
            room: room.to_string(),
            name: name.to_string(),
            spectator: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn slot(&self) -> Option<u8> {
        self.slot
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn opponent(&self, slot: u8) -> Option<&OpponentView> {
        self.opponents.get(slot as usize)?.as_ref()
    }

    pub fn opponents(&self) -> impl Iterator<Item = (u8, &OpponentView)> {
        self.opponents
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i as u8, v)))
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Dispatch one inbound message.
    pub fn handle(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::Joined => {
                tracing::debug!("joined room");
            }
            ServerMessage::Waiting { count } => {
                tracing::info!(count, "waiting for opponents");
                self.phase = SessionPhase::Waiting;
            }
            ServerMessage::Start {
                seed,
                you,
                opponents,
                settings,
            } => self.start(seed, you, &opponents, settings),
            ServerMessage::Snapshot(snapshot) => {
                if let Err(err) = self.apply_snapshot(snapshot) {
                    tracing::warn!(%err, "discarding opponent snapshot");
                }
            }
            ServerMessage::Attack { amount } => {
                if let Some(game) = self.game.as_mut() {
                    tracing::debug!(amount, "incoming garbage");
                    game.inject_garbage(amount);
                }
            }
            ServerMessage::Gameover { player } => match self.sender(player) {
                Some(slot) => {
                    if let Some(view) = self.opponent_mut(slot) {
                        view.game_over = true;
                        tracing::info!(player = slot, "opponent topped out");
                    }
                }
                None => tracing::debug!("ignoring gameover with no known sender"),
            },
            ServerMessage::OpponentLeft { player } => match self.sender(player) {
                Some(slot) => {
                    if let Some(view) = self.opponent_mut(slot) {
                        view.left = true;
                        tracing::info!(player = slot, "opponent left");
                    }
                }
                None => tracing::debug!("ignoring opponent_left with no known sender"),
            },
            ServerMessage::Error { message } => {
                tracing::warn!(%message, "relay error");
                self.last_error = Some(message);
            }
            ServerMessage::Unknown => {
                tracing::trace!("ignoring unknown relay message");
            }
        }
    }

    fn start(&mut self, seed: i64, you: u8, opponents: &[OpponentInfo], settings: RoomSettings) {
        let mut config = self.base_config;
        if settings.speed_multiplier.is_finite() && settings.speed_multiplier > 0.0 {
            config.speed_multiplier = settings.speed_multiplier;
        }

        self.opponents = Default::default();
        for info in opponents {
            if (info.slot as usize) < MAX_PLAYERS && info.slot != you {
                self.opponents[info.slot as usize] = Some(OpponentView::named(info.name.clone()));
            }
        }

        tracing::info!(seed, slot = you, opponents = opponents.len(), "match started");
        self.game = Some(GameState::with_config(seed, config));
        self.slot = Some(you);
        self.snapshot_ms = 0;
        self.phase = SessionPhase::Playing;
    }

    /// Sender slot of a relayed message. Unstamped messages belong to the
    /// only known opponent; with several opponents they cannot be attributed.
    fn sender(&self, player: Option<u8>) -> Option<u8> {
        player.or_else(|| {
            let mut known = self.opponents().map(|(slot, _)| slot);
            match (known.next(), known.next()) {
                (Some(slot), None) => Some(slot),
                _ => None,
            }
        })
    }

    fn opponent_mut(&mut self, slot: u8) -> Option<&mut OpponentView> {
        if Some(slot) == self.slot || slot as usize >= MAX_PLAYERS {
            return None;
        }
        let view = self.opponents[slot as usize].get_or_insert_with(|| {
            OpponentView::named(format!("Player {}", slot as usize + 1))
        });
        Some(view)
    }

    /// Validate a relayed snapshot and store it as that player's view.
    ///
    /// On error nothing is changed.
    pub fn apply_snapshot(&mut self, msg: SnapshotMessage) -> Result<(), SnapshotError> {
        let slot = self.sender(msg.player).ok_or(SnapshotError::MissingPlayer)?;
        if slot as usize >= MAX_PLAYERS {
            return Err(SnapshotError::SlotOutOfRange(slot));
        }
        if Some(slot) == self.slot {
            return Err(SnapshotError::OwnSlot(slot));
        }
        let board = Board::from_rows(&msg.grid)?;

        if let Some(view) = self.opponent_mut(slot) {
            view.board = board;
            view.score = msg.score;
            view.lines = msg.lines;
            view.game_over = msg.game_over;
            view.piece = msg.piece;
            view.next = msg.next;
        }
        Ok(())
    }

    /// Apply a local command. Ignored until the match starts.
    pub fn apply(&mut self, action: Action) -> bool {
        match self.game.as_mut() {
            Some(game) if self.phase == SessionPhase::Playing => game.apply_action(action),
            _ => false,
        }
    }

    /// Advance the local engine and collect what must be sent.
    ///
    /// Emits `attack` whenever the engine reports one, a `snapshot` every
    /// [`SNAPSHOT_INTERVAL_MS`] of game time, and `gameover` exactly once.
    pub fn tick(&mut self, dt_ms: u32) -> Outbound {
        let mut out = Outbound::new();
        if self.phase != SessionPhase::Playing {
            return out;
        }
        let Some(game) = self.game.as_mut() else {
            return out;
        };

        game.update(dt_ms);
        if game.last_attack() > 0 {
            out.push(ClientMessage::Attack {
                amount: game.last_attack(),
            });
        }

        self.snapshot_ms += dt_ms;
        if self.snapshot_ms >= SNAPSHOT_INTERVAL_MS {
            self.snapshot_ms = 0;
            out.push(ClientMessage::Snapshot(SnapshotMessage::from(
                &game.snapshot(),
            )));
        }

        if game.game_over() {
            tracing::info!(score = game.score(), lines = game.lines(), "topped out");
            self.phase = SessionPhase::Finished;
            out.push(ClientMessage::Gameover);
        }
        out
    }
}
