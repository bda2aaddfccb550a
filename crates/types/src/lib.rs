//! Shared data structures and constants
//!
//! Everything here is plain data with no external dependencies, so the same
//! definitions are usable by the engine core, the bot, the replay tooling and
//! the relay adapter.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn anchor**: (3, 0), rotation 0
//!
//! # Timing Constants
//!
//! Timing values are integer milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep used by the drivers |
//! | `LOCK_DELAY_MS` | 500 | Grounded time before a piece locks |
//! | `SOFT_DROP_INTERVAL_MS` | 100 | Fall interval while soft drop is held |
//! | `BASE_FALL_MS` | 700 | Fall interval at level 1 |
//! | `FALL_STEP_MS` | 45 | Interval reduction per level |
//! | `MIN_FALL_MS` | 80 | Fastest normal fall interval |
//!
//! # Examples
//!
//! ```
//! use stackerz_types::{Action, Cell, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let kind = PieceKind::from_str("t").unwrap();
//! assert_eq!(kind, PieceKind::T);
//! assert_eq!(kind.digit(), '3');
//!
//! assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
//! assert_eq!(Action::from_str("softOn"), Some(Action::SoftOn));
//! assert_eq!(Cell::from_char('8'), Some(Cell::Garbage));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Spawn anchor column.
pub const SPAWN_X: i32 = 3;

/// Spawn anchor row.
pub const SPAWN_Y: i32 = 0;

/// Fixed timestep used by the headless drivers (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Grounded time before the active piece locks.
pub const LOCK_DELAY_MS: u32 = 500;

/// Fall interval while soft drop is held.
pub const SOFT_DROP_INTERVAL_MS: u32 = 100;

/// Fall interval at level 1.
pub const BASE_FALL_MS: u32 = 700;

/// Fall interval reduction per level above 1.
pub const FALL_STEP_MS: u32 = 45;

/// Floor of the normal fall interval.
pub const MIN_FALL_MS: u32 = 80;

/// Lines needed per score level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Elapsed time worth one display level when the time bonus is enabled.
pub const TIME_LEVEL_MS: u64 = 60_000;

/// Rotation kick offsets `(dx, dy)`, tried in this exact order.
pub const KICK_OFFSETS: [(i32, i32); 6] = [(0, 0), (-1, 0), (1, 0), (-2, 0), (2, 0), (0, -1)];

/// Base points for clearing N lines (index = lines).
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Base points for a T-spin clearing N lines (index = lines).
pub const TSPIN_SCORES: [u32; 4] = [0, 800, 1200, 1600];

/// Garbage lines sent for clearing N lines.
pub const LINE_ATTACK: [u32; 5] = [0, 0, 1, 2, 4];

/// Garbage lines sent for a T-spin clearing N lines.
pub const TSPIN_ATTACK: [u32; 4] = [0, 2, 4, 6];

/// Combo scoring base value (50 points per combo step)
pub const COMBO_BASE: u32 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// Base points added for emptying the board.
pub const PERFECT_CLEAR_BONUS: u32 = 2000;

/// Garbage lines added for emptying the board.
pub const PERFECT_CLEAR_ATTACK: u32 = 6;

/// The seven tetromino piece kinds
///
/// Declaration order is the bag refill order and defines the wire digits
/// (`I` = '1' through `L` = '7').
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in bag refill order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Index into [`PieceKind::ALL`] and per-kind tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use stackerz_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("L"), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "I" => Some(PieceKind::I),
            "O" => Some(PieceKind::O),
            "T" => Some(PieceKind::T),
            "S" => Some(PieceKind::S),
            "Z" => Some(PieceKind::Z),
            "J" => Some(PieceKind::J),
            "L" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Uppercase letter used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    /// Grid digit for a locked cell of this kind.
    pub const fn digit(self) -> char {
        (b'1' + self as u8) as char
    }

    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '1'..='7' => Some(Self::ALL[(c as u8 - b'1') as usize]),
            _ => None,
        }
    }
}

/// Rotation state, produced by successive clockwise quarter turns.
///
/// The cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use stackerz_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::East.rotate_cw(), Rotation::South);
    /// assert_eq!(Rotation::South.rotate_cw(), Rotation::West);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotation index 0..=3 as used by the snapshot format.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Rotation::index`], taken modulo 4.
    pub const fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Number of clockwise quarter turns needed to reach `target`.
    pub const fn cw_steps_to(self, target: Rotation) -> u8 {
        (target.index() + 4 - self.index()) % 4
    }
}

/// A cell on the game board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Locked block of the given kind.
    Block(PieceKind),
    /// Garbage row block received from an opponent.
    Garbage,
}

impl Cell {
    pub const fn is_filled(self) -> bool {
        !matches!(self, Cell::Empty)
    }

    /// Wire character: `.` empty, `1`..`7` kinds, `8` garbage.
    pub const fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Block(kind) => kind.digit(),
            Cell::Garbage => '8',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            '8' => Some(Cell::Garbage),
            _ => PieceKind::from_digit(c).map(Cell::Block),
        }
    }
}

/// Player commands as recorded in replays and accepted by the drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Rotate,
    Drop,
    SoftOn,
    SoftOff,
}

impl Action {
    /// Parse a replay action tag (exact match).
    ///
    /// ```
    /// use stackerz_types::Action;
    ///
    /// assert_eq!(Action::from_str("drop"), Some(Action::Drop));
    /// assert_eq!(Action::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Action::Left),
            "right" => Some(Action::Right),
            "rotate" => Some(Action::Rotate),
            "drop" => Some(Action::Drop),
            "softOn" => Some(Action::SoftOn),
            "softOff" => Some(Action::SoftOff),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Rotate => "rotate",
            Action::Drop => "drop",
            Action::SoftOn => "softOn",
            Action::SoftOff => "softOff",
        }
    }
}

/// Outcome of a single lock, emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub score_delta: u64,
    /// Garbage lines this lock sends to opponents.
    pub attack: u32,
    pub t_spin: bool,
    /// The back-to-back bonus was applied to this clear.
    pub back_to_back: bool,
    pub back_to_back_count: u32,
    /// Combo counter after this lock (-1 = no combo).
    pub combo: i32,
    pub perfect_clear: bool,
}
