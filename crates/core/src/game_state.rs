//! Game state module - the deterministic game engine
//!
//! Ties together the board, rotation table, RNG, bag and scoring. All
//! mutation goes through the command methods (`try_move`, `try_rotate`,
//! `hard_drop`, `set_soft_drop`, `inject_garbage`) and the fixed-step
//! [`GameState::update`]. Same seed plus same command/delta sequence gives a
//! bit-identical game.
//!
//! Piece lifecycle: Falling → Grounded (lock timer accumulates) → Locked →
//! next piece Falling, or GameOver when the spawn collides.

use crate::board::Board;
use crate::pieces::{try_rotate, Piece};
use crate::rng::{PieceBag, SeededRng};
use crate::scoring::{self, calculate_score};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
use crate::types::{Action, LockEvent, PieceKind, LOCK_DELAY_MS, SOFT_DROP_INTERVAL_MS};

/// Per-game tuning. Part of the determinism contract: replays must use the
/// same config they were recorded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub lock_delay_ms: u32,
    pub soft_drop_interval_ms: u32,
    /// Room speed multiplier; the normal fall interval is divided by it.
    pub speed_multiplier: f64,
    /// Add one display level per elapsed minute (affects fall speed only).
    pub time_level_bonus: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_delay_ms: LOCK_DELAY_MS,
            soft_drop_interval_ms: SOFT_DROP_INTERVAL_MS,
            speed_multiplier: 1.0,
            time_level_bonus: false,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    seed: i64,
    rng: SeededRng,
    bag: PieceBag,
    board: Board,
    current: Piece,
    next: Piece,
    score: u64,
    lines: u32,
    /// -1 when no combo is running.
    combo: i32,
    back_to_back: bool,
    back_to_back_count: u32,
    elapsed_ms: u64,
    piece_counts: [u32; 7],
    game_over: bool,
    fall_ms: u32,
    grounded_ms: u32,
    soft_drop: bool,
    last_move_was_rotate: bool,
    last_attack: u32,
    last_event: Option<LockEvent>,
}

impl GameState {
    /// Create a new game with the given RNG seed and default config
    pub fn new(seed: i64) -> Self {
        Self::with_config(seed, EngineConfig::default())
    }

    pub fn with_config(seed: i64, config: EngineConfig) -> Self {
        Self::with_board(seed, config, Board::new())
    }

    /// Start a game on a prepared board (puzzles, bot evaluation, tests).
    ///
    /// The next piece is drawn before the current one; that order is part of
    /// the seed contract.
    pub fn with_board(seed: i64, config: EngineConfig, board: Board) -> Self {
        let mut rng = SeededRng::new(seed);
        let mut bag = PieceBag::new();
        let next = Piece::new(bag.next_kind(&mut rng));
        let current_kind = bag.next_kind(&mut rng);

        let mut state = Self {
            config,
            seed,
            rng,
            bag,
            board,
            current: Piece::new(current_kind),
            next,
            score: 0,
            lines: 0,
            combo: -1,
            back_to_back: false,
            back_to_back_count: 0,
            elapsed_ms: 0,
            piece_counts: [0; 7],
            game_over: false,
            fall_ms: 0,
            grounded_ms: 0,
            soft_drop: false,
            last_move_was_rotate: false,
            last_attack: 0,
            last_event: None,
        };
        state.spawn(current_kind);
        state
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Level used for score multipliers: `1 + lines / 10`.
    pub fn score_level(&self) -> u32 {
        scoring::score_level(self.lines)
    }

    /// Level shown to players and used for gravity.
    pub fn display_level(&self) -> u32 {
        scoring::display_level(self.lines, self.elapsed_ms, self.config.time_level_bonus)
    }

    pub fn combo(&self) -> i32 {
        self.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn back_to_back_count(&self) -> u32 {
        self.back_to_back_count
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Spawn counts per kind, indexed by [`PieceKind::index`].
    pub fn piece_counts(&self) -> &[u32; 7] {
        &self.piece_counts
    }

    /// Total pieces spawned so far.
    pub fn pieces_spawned(&self) -> u32 {
        self.piece_counts.iter().sum()
    }

    pub fn soft_drop(&self) -> bool {
        self.soft_drop
    }

    /// Active piece, `None` once the game is over.
    pub fn current(&self) -> Option<&Piece> {
        (!self.game_over).then_some(&self.current)
    }

    /// Preview piece, `None` once the game is over.
    pub fn next(&self) -> Option<&Piece> {
        (!self.game_over).then_some(&self.next)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Garbage lines produced by the lock resolved in the last `update`.
    pub fn last_attack(&self) -> u32 {
        self.last_attack
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Check if the piece is resting on something
    pub fn is_grounded(&self) -> bool {
        !self.game_over && self.board.collides(&self.current, 0, 1)
    }

    /// Row the active piece would land on after a hard drop.
    pub fn ghost_y(&self) -> Option<i32> {
        if self.game_over {
            return None;
        }
        let mut dy = 0;
        while !self.board.collides(&self.current, 0, dy + 1) {
            dy += 1;
        }
        Some(self.current.y + dy)
    }

    /// Current fall interval in milliseconds.
    pub fn fall_interval_ms(&self) -> u32 {
        if self.soft_drop {
            return self.config.soft_drop_interval_ms.max(1);
        }
        scoring::scale_interval_ms(
            scoring::fall_interval_ms(self.display_level()),
            self.config.speed_multiplier,
        )
    }

    /// Place `kind` at the spawn anchor. Tops out if it collides there.
    fn spawn(&mut self, kind: PieceKind) {
        self.current = Piece::new(kind);
        self.last_move_was_rotate = false;
        self.grounded_ms = 0;
        self.piece_counts[kind.index()] += 1;
        if self.board.collides(&self.current, 0, 0) {
            self.game_over = true;
        }
    }

    /// Shift the active piece horizontally by `dx`.
    pub fn try_move(&mut self, dx: i32) -> bool {
        if self.game_over || self.board.collides(&self.current, dx, 0) {
            return false;
        }
        self.current.x += dx;
        self.grounded_ms = 0;
        self.last_move_was_rotate = false;
        true
    }

    /// Rotate clockwise, trying each kick offset in order.
    pub fn try_rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let board = &self.board;
        match try_rotate(&self.current, |p| !board.collides(p, 0, 0)) {
            Some(rotated) => {
                self.current = rotated;
                self.last_move_was_rotate = true;
                self.grounded_ms = 0;
                true
            }
            None => false,
        }
    }

    /// Drop to the landing row; the next `update` locks the piece.
    pub fn hard_drop(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        while !self.board.collides(&self.current, 0, 1) {
            self.current.y += 1;
        }
        self.grounded_ms = self.config.lock_delay_ms;
        true
    }

    pub fn set_soft_drop(&mut self, on: bool) -> bool {
        if self.game_over {
            return false;
        }
        self.soft_drop = on;
        true
    }

    /// Push garbage rows in from the bottom using the engine RNG.
    pub fn inject_garbage(&mut self, lines: u32) {
        if self.game_over || lines == 0 {
            return;
        }
        self.board.inject_garbage(lines, &mut self.rng);
    }

    /// Dispatch a typed command.
    pub fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Left => self.try_move(-1),
            Action::Right => self.try_move(1),
            Action::Rotate => self.try_rotate(),
            Action::Drop => self.hard_drop(),
            Action::SoftOn => self.set_soft_drop(true),
            Action::SoftOff => self.set_soft_drop(false),
        }
    }

    /// Advance gravity and lock timers by `dt_ms`.
    ///
    /// Resolves at most one lock per call.
    pub fn update(&mut self, dt_ms: u32) {
        if self.game_over {
            return;
        }
        self.last_attack = 0;
        self.elapsed_ms += dt_ms as u64;
        self.fall_ms = self.fall_ms.saturating_add(dt_ms);

        // Pending hard drop.
        if self.grounded_ms >= self.config.lock_delay_ms && self.is_grounded() {
            self.lock_current();
            return;
        }

        let interval = self.fall_interval_ms();
        while self.fall_ms >= interval {
            self.fall_ms -= interval;
            if !self.board.collides(&self.current, 0, 1) {
                self.current.y += 1;
                self.grounded_ms = 0;
            } else {
                self.grounded_ms = self.grounded_ms.saturating_add(interval);
                if self.grounded_ms >= self.config.lock_delay_ms {
                    self.lock_current();
                    break;
                }
            }
        }
    }

    /// Bake the active piece, clear rows, score, and spawn the next piece.
    fn lock_current(&mut self) {
        self.last_attack = 0;
        let piece = self.current;
        self.board.lock_piece(&piece);

        let t_spin = self.is_t_spin(&piece);
        let full = self.board.full_rows();
        let lines = full.len();
        if lines > 0 {
            self.combo += 1;
            self.board.clear_rows(&full);
        } else {
            self.combo = -1;
        }

        let result = calculate_score(
            lines,
            t_spin,
            self.combo,
            self.back_to_back,
            self.board.is_empty(),
        );
        if result.qualifies_for_b2b {
            if result.b2b_applied {
                self.back_to_back_count += 1;
            }
            self.back_to_back = true;
        } else if lines > 0 {
            self.back_to_back = false;
            self.back_to_back_count = 0;
        }

        self.lines += lines as u32;
        let score_delta = result.points(self.score_level());
        self.score += score_delta;
        self.last_attack = result.attack;

        self.last_event = Some(LockEvent {
            lines_cleared: lines as u32,
            score_delta,
            attack: result.attack,
            t_spin,
            back_to_back: result.b2b_applied,
            back_to_back_count: self.back_to_back_count,
            combo: self.combo,
            perfect_clear: result.perfect_clear,
        });

        self.spawn(self.next.kind);
        self.next = Piece::new(self.bag.next_kind(&mut self.rng));
    }

    /// T piece, last action a rotation, and at least 3 of the 4 corners
    /// around `(x + 2, y + 1)` blocked. Runs after the piece is baked.
    fn is_t_spin(&self, piece: &Piece) -> bool {
        if piece.kind != PieceKind::T || !self.last_move_was_rotate {
            return false;
        }
        let (cx, cy) = (piece.x + 2, piece.y + 1);
        let blocked = [(-1, -1), (1, -1), (-1, 1), (1, 1)]
            .iter()
            .filter(|&&(dx, dy)| !self.board.get(cx + dx, cy + dy).is_some_and(|c| !c.is_filled()))
            .count();
        blocked >= 3
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.board.to_row_strings(),
            score: self.score,
            lines: self.lines,
            game_over: self.game_over,
            piece: self.current().map(|p| ActiveSnapshot::from(*p)),
            next: self.next().map(|p| NextSnapshot {
                kind: p.kind,
                rotation: p.rotation,
            }),
        }
    }
}
