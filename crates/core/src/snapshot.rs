use crate::pieces::Piece;
use crate::types::{PieceKind, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NextSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
}

/// Read-only projection of an engine, shaped like the relay `snapshot` message.
///
/// `piece` and `next` are `None` once the game is over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// 20 rows of 10 cell characters, top to bottom.
    pub grid: Vec<String>,
    pub score: u64,
    pub lines: u32,
    pub game_over: bool,
    pub piece: Option<ActiveSnapshot>,
    pub next: Option<NextSnapshot>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over
    }
}
