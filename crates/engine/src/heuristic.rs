//! Greedy placement search used by the bot.
//!
//! Every rotation and column is simulated by dropping the piece from row 0 on
//! a copy of the board. The resulting board is scored from four surface
//! features plus cleared lines, optionally adding the best follow-up score for
//! the preview piece.

use stackerz_core::{Board, Piece};

use crate::types::{PieceKind, Rotation, BOARD_WIDTH};

const W_AGGREGATE_HEIGHT: f64 = -0.55;
const W_HOLES: f64 = -1.35;
const W_BUMPINESS: f64 = -0.40;
const W_LINES: f64 = 1.30;
const W_MAX_HEIGHT: f64 = -0.12;

/// Columns tried per rotation; pieces can hang outside their 4x4 frame.
const X_RANGE: std::ops::Range<i32> = -2..BOARD_WIDTH as i32 + 2;

/// Target rotation and anchor column for the current piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub rotation: Rotation,
    pub x: i32,
}

impl Placement {
    /// Used when no placement is valid.
    pub const FALLBACK: Placement = Placement {
        rotation: Rotation::North,
        x: BOARD_WIDTH as i32 / 2 - 2,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardFeatures {
    pub aggregate_height: u32,
    pub holes: u32,
    pub bumpiness: u32,
    pub max_height: u32,
}

/// Drop `kind` at `(x, 0)` in `rotation`, lock it and clear rows.
///
/// Returns `None` if the piece collides at row 0.
pub fn simulate_lock(
    board: &Board,
    kind: PieceKind,
    rotation: Rotation,
    x: i32,
) -> Option<(Board, u32)> {
    let mut piece = Piece {
        kind,
        rotation,
        x,
        y: 0,
    };
    if board.collides(&piece, 0, 0) {
        return None;
    }
    while !board.collides(&piece, 0, 1) {
        piece.y += 1;
    }

    let mut out = board.clone();
    out.lock_piece(&piece);
    let full = out.full_rows();
    out.clear_rows(&full);
    Some((out, full.len() as u32))
}

pub fn board_features(board: &Board) -> BoardFeatures {
    let heights = board.column_heights();

    let mut holes = 0;
    for x in 0..BOARD_WIDTH {
        let mut seen_block = false;
        for row in board.rows() {
            if row[x].is_filled() {
                seen_block = true;
            } else if seen_block {
                holes += 1;
            }
        }
    }

    BoardFeatures {
        aggregate_height: heights.iter().sum(),
        holes,
        bumpiness: heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum(),
        max_height: heights.iter().copied().max().unwrap_or(0),
    }
}

/// Weighted board score; higher is better.
pub fn evaluate(board: &Board, lines_cleared: u32) -> f64 {
    let f = board_features(board);
    W_AGGREGATE_HEIGHT * f.aggregate_height as f64
        + W_HOLES * f.holes as f64
        + W_BUMPINESS * f.bumpiness as f64
        + W_LINES * lines_cleared as f64
        + W_MAX_HEIGHT * f.max_height as f64
}

fn placements() -> impl Iterator<Item = Placement> {
    (0..4u8).flat_map(|r| {
        X_RANGE.map(move |x| Placement {
            rotation: Rotation::from_index(r),
            x,
        })
    })
}

/// Best score reachable by `kind` on `board`, if any placement is valid.
fn best_score(board: &Board, kind: PieceKind) -> Option<f64> {
    placements()
        .filter_map(|p| simulate_lock(board, kind, p.rotation, p.x))
        .map(|(b, lines)| evaluate(&b, lines))
        .reduce(f64::max)
}

/// Pick the placement for `kind` with the highest score.
///
/// With a preview piece and a positive `lookahead_weight`, each candidate adds
/// `lookahead_weight` times the best score of the preview piece on the
/// resulting board. Ties keep the first candidate in rotation-major order.
pub fn best_move(
    board: &Board,
    kind: PieceKind,
    next: Option<PieceKind>,
    lookahead_weight: f64,
) -> Placement {
    let mut best: Option<(Placement, f64)> = None;

    for placement in placements() {
        let Some((after, lines)) = simulate_lock(board, kind, placement.rotation, placement.x)
        else {
            continue;
        };
        let mut score = evaluate(&after, lines);

        if let Some(next_kind) = next.filter(|_| lookahead_weight > 0.0) {
            if let Some(follow_up) = best_score(&after, next_kind) {
                score += lookahead_weight * follow_up;
            }
        }

        if best.map_or(true, |(_, s)| score > s) {
            best = Some((placement, score));
        }
    }

    best.map_or(Placement::FALLBACK, |(p, _)| p)
}
