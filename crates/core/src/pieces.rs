//! Pieces module - tetromino masks and the precomputed rotation table
//!
//! Each kind starts from a 4x4 base mask. Rotations 1-3 are successive
//! clockwise quarter turns of that mask (new row `c` is old column `c` read
//! bottom to top). The whole table is built at compile time and shared
//! read-only by every piece.

use crate::types::{PieceKind, Rotation, KICK_OFFSETS, SPAWN_X, SPAWN_Y};

/// Offset of a single mino relative to the piece anchor, `(col, row)`.
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets in row-major mask order
pub type PieceShape = [MinoOffset; 4];

type Mask = [[bool; 4]; 4];

const BASE_MASKS: [[&str; 4]; 7] = [
    ["....", "####", "....", "...."], // I
    [".##.", ".##.", "....", "...."], // O
    [".###", "..#.", "....", "...."], // T
    ["..##", ".##.", "....", "...."], // S
    [".##.", "..##", "....", "...."], // Z
    [".#..", ".###", "....", "...."], // J
    ["...#", ".###", "....", "...."], // L
];

const fn parse_mask(rows: [&str; 4]) -> Mask {
    let mut mask = [[false; 4]; 4];
    let mut r = 0;
    while r < 4 {
        let bytes = rows[r].as_bytes();
        let mut c = 0;
        while c < 4 {
            mask[r][c] = bytes[c] == b'#';
            c += 1;
        }
        r += 1;
    }
    mask
}

const fn rotate_mask_cw(mask: Mask) -> Mask {
    let mut out = [[false; 4]; 4];
    let mut r = 0;
    while r < 4 {
        let mut c = 0;
        while c < 4 {
            out[c][3 - r] = mask[r][c];
            c += 1;
        }
        r += 1;
    }
    out
}

const fn mask_cells(mask: Mask) -> PieceShape {
    let mut cells = [(0i8, 0i8); 4];
    let mut n = 0;
    let mut r = 0;
    while r < 4 {
        let mut c = 0;
        while c < 4 {
            if mask[r][c] {
                cells[n] = (c as i8, r as i8);
                n += 1;
            }
            c += 1;
        }
        r += 1;
    }
    cells
}

const fn build_shapes() -> [[PieceShape; 4]; 7] {
    let mut table = [[[(0i8, 0i8); 4]; 4]; 7];
    let mut k = 0;
    while k < 7 {
        let mut mask = parse_mask(BASE_MASKS[k]);
        let mut rot = 0;
        while rot < 4 {
            table[k][rot] = mask_cells(mask);
            mask = rotate_mask_cw(mask);
            rot += 1;
        }
        k += 1;
    }
    table
}

/// Every kind's four rotation states, indexed `[kind][rotation]`.
pub static SHAPES: [[PieceShape; 4]; 7] = build_shapes();

/// Get the shape (mino offsets) for a piece kind and rotation
#[inline]
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> &'static PieceShape {
    &SHAPES[kind.index()][rotation.index() as usize]
}

/// Active piece: kind, rotation and anchor of the 4x4 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// A piece at the spawn anchor in rotation 0.
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn shape(&self) -> &'static PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells covered by this piece.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape()
            .iter()
            .map(move |&(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }
}

/// Try a clockwise rotation against the kick list.
///
/// Returns the rotated piece for the first offset where `fits` accepts it.
pub fn try_rotate(piece: &Piece, fits: impl Fn(&Piece) -> bool) -> Option<Piece> {
    let rotation = piece.rotation.rotate_cw();
    KICK_OFFSETS.iter().find_map(|&(dx, dy)| {
        let candidate = Piece {
            rotation,
            x: piece.x + dx,
            y: piece.y + dy,
            ..*piece
        };
        fits(&candidate).then_some(candidate)
    })
}
