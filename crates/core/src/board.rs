//! Board module - manages the game grid
//!
//! The board is a 10x20 array of rows. Coordinates: (x, y) where x ranges
//! 0..9 (left to right) and y ranges 0..19 (top to bottom). Pieces may hang
//! above row 0; those cells never collide with grid contents and are dropped
//! when the piece locks.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::pieces::Piece;
use crate::rng::SeededRng;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// One board row.
pub type Row = [Cell; BOARD_WIDTH];

/// Rows reported full after a lock, top to bottom.
pub type FullRows = ArrayVec<usize, BOARD_HEIGHT>;

/// Rejection reasons for a textual grid received from outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("expected 20 rows, got {0}")]
    RowCount(usize),
    #[error("row {row} has {len} cells, expected 10")]
    RowWidth { row: usize, len: usize },
    #[error("row {row} contains invalid cell {ch:?}")]
    InvalidCell { row: usize, ch: char },
}

/// The game board - 20 rows of 10 cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            rows: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Parse a grid from its wire rows (`.`, `1`-`7`, `8`).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        if rows.len() != BOARD_HEIGHT {
            return Err(GridError::RowCount(rows.len()));
        }
        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != BOARD_WIDTH {
                return Err(GridError::RowWidth { row: y, len });
            }
            for (x, ch) in row.chars().enumerate() {
                board.rows[y][x] =
                    Cell::from_char(ch).ok_or(GridError::InvalidCell { row: y, ch })?;
            }
        }
        Ok(board)
    }

    /// Wire rows, top to bottom.
    pub fn to_row_strings(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect()
    }

    #[inline(always)]
    fn in_bounds(x: i32, y: i32) -> bool {
        x >= 0 && x < BOARD_WIDTH as i32 && y >= 0 && y < BOARD_HEIGHT as i32
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::in_bounds(x, y).then(|| self.rows[y as usize][x as usize])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if !Self::in_bounds(x, y) {
            return false;
        }
        self.rows[y as usize][x as usize] = cell;
        true
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(Cell::is_filled)
    }

    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.rows
    }

    /// Would `piece` shifted by (dx, dy) hit a wall, the floor or a block?
    pub fn collides(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        piece.cells().any(|(x, y)| {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || nx >= BOARD_WIDTH as i32 || ny >= BOARD_HEIGHT as i32 {
                return true;
            }
            ny >= 0 && self.rows[ny as usize][nx as usize].is_filled()
        })
    }

    /// Bake a piece into the grid. Cells outside the board are dropped.
    pub fn lock_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            self.set(x, y, Cell::Block(piece.kind));
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|c| c.is_filled()))
    }

    /// Indices of full rows, top to bottom.
    pub fn full_rows(&self) -> FullRows {
        (0..BOARD_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove the listed rows and insert as many empty rows at the top.
    ///
    /// Remaining rows keep their relative order. Uses a bottom-up two-pointer
    /// pass, so no allocation.
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        let mut write_y = BOARD_HEIGHT;
        for read_y in (0..BOARD_HEIGHT).rev() {
            if rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                self.rows[write_y] = self.rows[read_y];
            }
        }
        for row in &mut self.rows[..write_y] {
            *row = [Cell::Empty; BOARD_WIDTH];
        }
        write_y
    }

    /// Push `lines` garbage rows in from the bottom.
    ///
    /// Each row is full except one hole drawn from `rng`; the top row falls off.
    pub fn inject_garbage(&mut self, lines: u32, rng: &mut SeededRng) {
        for _ in 0..lines {
            let hole = rng.next_below(BOARD_WIDTH);
            self.rows.rotate_left(1);
            let mut row = [Cell::Garbage; BOARD_WIDTH];
            row[hole] = Cell::Empty;
            self.rows[BOARD_HEIGHT - 1] = row;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|c| !c.is_filled())
    }

    /// Column heights measured from the floor (0 for an empty column).
    pub fn column_heights(&self) -> [u32; BOARD_WIDTH] {
        let mut heights = [0u32; BOARD_WIDTH];
        for (x, h) in heights.iter_mut().enumerate() {
            if let Some(y) = (0..BOARD_HEIGHT).find(|&y| self.rows[y][x].is_filled()) {
                *h = (BOARD_HEIGHT - y) as u32;
            }
        }
        heights
    }

    /// Count locked blocks of a given kind (testing and stats).
    pub fn count_kind(&self, kind: PieceKind) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|&&c| c == Cell::Block(kind))
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rotation;

    fn filled_row(hole: Option<usize>) -> Row {
        let mut row = [Cell::Garbage; BOARD_WIDTH];
        if let Some(h) = hole {
            row[h] = Cell::Empty;
        }
        row
    }

    #[test]
    fn test_get_set_bounds() {
        let mut board = Board::new();
        assert!(board.set(0, 0, Cell::Block(PieceKind::I)));
        assert!(board.set(9, 19, Cell::Garbage));
        assert!(!board.set(10, 0, Cell::Garbage));
        assert!(!board.set(0, -1, Cell::Garbage));

        assert_eq!(board.get(0, 0), Some(Cell::Block(PieceKind::I)));
        assert_eq!(board.get(-1, 0), None);
        assert!(board.is_occupied(9, 19));
        assert!(!board.is_occupied(5, 5));
    }

    #[test]
    fn test_collides_walls_and_floor() {
        let board = Board::new();
        let mut piece = Piece::new(PieceKind::O);
        assert!(!board.collides(&piece, 0, 0));

        // O occupies columns x+1..x+2.
        piece.x = -1;
        assert!(!board.collides(&piece, 0, 0));
        assert!(board.collides(&piece, -1, 0));

        piece.x = 7;
        assert!(!board.collides(&piece, 0, 0));
        assert!(board.collides(&piece, 1, 0));

        piece.y = 18;
        assert!(!board.collides(&piece, 0, 0));
        assert!(board.collides(&piece, 0, 1));
    }

    #[test]
    fn test_cells_above_top_do_not_collide_with_grid() {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i32 {
            board.set(x, 0, Cell::Garbage);
        }
        let mut piece = Piece::new(PieceKind::I);
        piece.rotation = Rotation::East;
        piece.y = -4;
        assert!(!board.collides(&piece, 0, 0));
        assert!(board.collides(&piece, 0, 1));
    }

    #[test]
    fn test_lock_piece_drops_cells_above_board() {
        let mut board = Board::new();
        let mut piece = Piece::new(PieceKind::I);
        piece.rotation = Rotation::East;
        piece.y = -2;
        board.lock_piece(&piece);
        assert_eq!(board.count_kind(PieceKind::I), 2);
        assert!(board.is_occupied(5, 0));
        assert!(board.is_occupied(5, 1));
    }

    #[test]
    fn test_clear_rows_preserves_order() {
        let mut board = Board::new();
        board.set(0, 15, Cell::Block(PieceKind::T));
        board.rows[16] = filled_row(None);
        board.set(1, 17, Cell::Block(PieceKind::S));
        board.rows[18] = filled_row(None);
        board.rows[19] = filled_row(Some(4));

        let full = board.full_rows();
        assert_eq!(full.as_slice(), &[16, 18]);
        board.clear_rows(&full);

        assert_eq!(board.get(0, 17), Some(Cell::Block(PieceKind::T)));
        assert_eq!(board.get(1, 18), Some(Cell::Block(PieceKind::S)));
        assert_eq!(board.rows[19], filled_row(Some(4)));
        assert!(board.rows[..17].iter().flatten().all(|c| !c.is_filled()));
        assert!(board.full_rows().is_empty());
    }

    #[test]
    fn test_inject_garbage_shifts_up() {
        let mut board = Board::new();
        board.set(3, 0, Cell::Block(PieceKind::J));
        board.set(2, 19, Cell::Block(PieceKind::L));

        let mut rng = SeededRng::new(5);
        let mut shadow = SeededRng::new(5);
        board.inject_garbage(2, &mut rng);

        let hole_a = shadow.next_below(BOARD_WIDTH);
        let hole_b = shadow.next_below(BOARD_WIDTH);
        assert_eq!(board.rows[18], filled_row(Some(hole_a)));
        assert_eq!(board.rows[19], filled_row(Some(hole_b)));
        assert_eq!(board.get(2, 17), Some(Cell::Block(PieceKind::L)));
        // The top row's block was pushed off.
        assert_eq!(board.count_kind(PieceKind::J), 0);
    }

    #[test]
    fn test_from_rows_validation() {
        let mut rows = vec![".........."; BOARD_HEIGHT];
        rows[19] = "8888.88888";
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(board.get(4, 19), Some(Cell::Empty));
        assert_eq!(board.get(5, 19), Some(Cell::Garbage));
        assert_eq!(board.to_row_strings()[19], "8888.88888");

        assert_eq!(
            Board::from_rows(&rows[..19]),
            Err(GridError::RowCount(19))
        );

        rows[3] = ".........";
        assert_eq!(
            Board::from_rows(&rows),
            Err(GridError::RowWidth { row: 3, len: 9 })
        );

        rows[3] = "....x.....";
        assert_eq!(
            Board::from_rows(&rows),
            Err(GridError::InvalidCell { row: 3, ch: 'x' })
        );
    }

    #[test]
    fn test_column_heights() {
        let mut board = Board::new();
        board.set(0, 19, Cell::Garbage);
        board.set(1, 10, Cell::Garbage);
        let heights = board.column_heights();
        assert_eq!(heights[0], 1);
        assert_eq!(heights[1], 10);
        assert_eq!(heights[2], 0);
    }
}
