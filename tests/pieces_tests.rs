//! Rotation table and kick tests

use stackerz::core::pieces::{get_shape, try_rotate, SHAPES};
use stackerz::core::Piece;
use stackerz::types::{PieceKind, Rotation, KICK_OFFSETS};

// ============== Shape Tests ==============

#[test]
fn test_every_shape_has_four_distinct_cells_in_frame() {
    for kind in PieceKind::ALL {
        for r in 0..4u8 {
            let shape = get_shape(kind, Rotation::from_index(r));
            for (i, &(x, y)) in shape.iter().enumerate() {
                assert!((0..4).contains(&x) && (0..4).contains(&y));
                assert!(!shape[..i].contains(&(x, y)), "{kind:?} r{r} repeats a cell");
            }
        }
    }
}

#[test]
fn test_o_piece_rotation_stays_in_frame() {
    let north = get_shape(PieceKind::O, Rotation::North);
    assert_eq!(*north, [(1, 0), (2, 0), (1, 1), (2, 1)]);
    // Rotating the 4x4 mask moves the O around the frame.
    assert_eq!(*get_shape(PieceKind::O, Rotation::East), [(2, 1), (3, 1), (2, 2), (3, 2)]);
}

#[test]
fn test_i_piece_shapes() {
    assert_eq!(
        *get_shape(PieceKind::I, Rotation::North),
        [(0, 1), (1, 1), (2, 1), (3, 1)]
    );
    assert_eq!(
        *get_shape(PieceKind::I, Rotation::East),
        [(2, 0), (2, 1), (2, 2), (2, 3)]
    );
    assert_eq!(
        *get_shape(PieceKind::I, Rotation::South),
        [(0, 2), (1, 2), (2, 2), (3, 2)]
    );
    assert_eq!(
        *get_shape(PieceKind::I, Rotation::West),
        [(1, 0), (1, 1), (1, 2), (1, 3)]
    );
}

#[test]
fn test_table_is_indexed_by_kind_then_rotation() {
    assert_eq!(SHAPES.len(), 7);
    assert_eq!(
        &SHAPES[PieceKind::T.index()][Rotation::South.index() as usize],
        get_shape(PieceKind::T, Rotation::South)
    );
}

// ============== Kick Tests ==============

#[test]
fn test_kicks_tried_in_order() {
    let piece = Piece::new(PieceKind::T);
    for (n, &(dx, dy)) in KICK_OFFSETS.iter().enumerate() {
        // Only the n-th offset fits.
        let rotated = try_rotate(&piece, |p| (p.x - piece.x, p.y - piece.y) == KICK_OFFSETS[n]).unwrap();
        assert_eq!((rotated.x, rotated.y), (piece.x + dx, piece.y + dy));
        assert_eq!(rotated.rotation, Rotation::East);
    }
}

#[test]
fn test_rotate_fails_when_no_kick_fits() {
    let piece = Piece::new(PieceKind::J);
    assert_eq!(try_rotate(&piece, |_| false), None);
}

#[test]
fn test_kick_order_prefers_left() {
    let piece = Piece::new(PieceKind::L);
    let rotated = try_rotate(&piece, |p| p.x != piece.x).unwrap();
    assert_eq!(rotated.x, piece.x - 1);
    assert_eq!(rotated.y, piece.y);
}
