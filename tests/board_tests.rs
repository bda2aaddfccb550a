//! Board tests through the public API

use stackerz::core::{Board, GameState, GridError, Piece, SeededRng};
use stackerz::types::{Cell, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

fn fill_row(board: &mut Board, y: i32, cell: Cell) {
    for x in 0..BOARD_WIDTH as i32 {
        board.set(x, y, cell);
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert!(board.is_empty());
    for y in 0..BOARD_HEIGHT as i32 {
        for x in 0..BOARD_WIDTH as i32 {
            assert_eq!(board.get(x, y), Some(Cell::Empty));
        }
    }
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i32), None);
}

#[test]
fn test_row_strings_round_trip() {
    let mut board = Board::new();
    board.set(0, 19, Cell::Block(PieceKind::I));
    board.set(9, 19, Cell::Garbage);
    board.set(4, 0, Cell::Block(PieceKind::L));

    let rows = board.to_row_strings();
    assert_eq!(rows.len(), BOARD_HEIGHT);
    assert_eq!(rows[19], "1........8");
    assert_eq!(rows[0], "....7.....");
    assert_eq!(Board::from_rows(&rows).unwrap(), board);
}

#[test]
fn test_from_rows_rejects_bad_grids() {
    let rows = vec![".........."; 19];
    assert_eq!(Board::from_rows(&rows), Err(GridError::RowCount(19)));

    let mut rows = vec![".........."; 20];
    rows[5] = ".........";
    assert_eq!(
        Board::from_rows(&rows),
        Err(GridError::RowWidth { row: 5, len: 9 })
    );

    rows[5] = "....9.....";
    assert_eq!(
        Board::from_rows(&rows),
        Err(GridError::InvalidCell { row: 5, ch: '9' })
    );
}

#[test]
fn test_clear_rows_keeps_height_and_order() {
    let mut board = Board::new();
    fill_row(&mut board, 19, Cell::Garbage);
    board.set(2, 18, Cell::Block(PieceKind::S));
    fill_row(&mut board, 17, Cell::Garbage);
    board.set(7, 16, Cell::Block(PieceKind::Z));

    let full = board.full_rows();
    assert_eq!(full.as_slice(), &[17, 19]);
    board.clear_rows(&full);

    assert_eq!(board.rows().len(), BOARD_HEIGHT);
    assert_eq!(board.get(2, 19), Some(Cell::Block(PieceKind::S)));
    assert_eq!(board.get(7, 18), Some(Cell::Block(PieceKind::Z)));
    assert!(board.full_rows().is_empty());
    assert_eq!(board.column_heights().iter().sum::<u32>(), 2 + 1);
}

#[test]
fn test_lock_then_spawn_changes_only_piece_cells() {
    let mut state = GameState::new(2718);
    let before = state.board().clone();
    let piece = *state.current().unwrap();
    let landed = Piece {
        y: state.ghost_y().unwrap(),
        ..piece
    };

    state.hard_drop();
    state.update(16);

    let after = state.board();
    let cells: Vec<(i32, i32)> = landed.cells().collect();
    for y in 0..BOARD_HEIGHT as i32 {
        for x in 0..BOARD_WIDTH as i32 {
            if cells.contains(&(x, y)) {
                assert_eq!(after.get(x, y), Some(Cell::Block(piece.kind)));
            } else {
                assert_eq!(after.get(x, y), before.get(x, y), "cell ({x}, {y}) changed");
            }
        }
    }
}

#[test]
fn test_garbage_holes_follow_rng() {
    let mut a = Board::new();
    let mut b = Board::new();
    a.inject_garbage(6, &mut SeededRng::new(31337));
    b.inject_garbage(6, &mut SeededRng::new(31337));
    assert_eq!(a, b);

    let mut rng = SeededRng::new(31337);
    for y in 14..20 {
        let hole = rng.next_below(BOARD_WIDTH) as i32;
        assert_eq!(a.get(hole, y), Some(Cell::Empty));
        let filled = (0..BOARD_WIDTH as i32)
            .filter(|&x| a.is_occupied(x, y))
            .count();
        assert_eq!(filled, BOARD_WIDTH - 1);
    }
}

#[test]
fn test_collides_above_top_only_with_walls() {
    let mut board = Board::new();
    fill_row(&mut board, 0, Cell::Garbage);
    let piece = Piece {
        kind: PieceKind::I,
        rotation: Rotation::North,
        x: 3,
        y: -5,
    };
    // Row -4 is above the board: no grid collision.
    assert!(!board.collides(&piece, 0, 0));
    assert!(board.collides(&piece, 0, 4));
    assert!(board.collides(&piece, 7, 0));
}
