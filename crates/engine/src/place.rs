use arrayvec::ArrayVec;
use thiserror::Error;

use stackerz_core::GameState;

use crate::heuristic::Placement;
use crate::types::{Action, BOARD_WIDTH};

/// Enough for three rotations, a full-width shift and the drop.
pub type PlaceActions = ArrayVec<Action, 24>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("could not rotate to target rotation")]
    RotationBlocked,
    #[error("target x would place piece out of bounds")]
    XOutOfBounds,
    #[error("could not move to target x due to collision")]
    XBlocked,
    #[error("game is over")]
    NotPlayable,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::RotationBlocked | PlaceError::XOutOfBounds | PlaceError::XBlocked => {
                "invalid_place"
            }
        }
    }
}

/// Work out the command sequence that rotates, shifts and hard-drops the
/// active piece into `target`.
///
/// The sequence is checked against a scratch copy of `state`, so kicks that
/// shift the piece while rotating are accounted for.
pub fn plan_place(state: &GameState, target: Placement) -> Result<PlaceActions, PlaceError> {
    let Some(active) = state.current().copied() else {
        return Err(PlaceError::NotPlayable);
    };

    let mut scratch = state.clone();
    let mut actions = PlaceActions::new();

    for _ in 0..active.rotation.cw_steps_to(target.rotation) {
        if !scratch.try_rotate() {
            return Err(PlaceError::RotationBlocked);
        }
        actions.push(Action::Rotate);
    }

    let Some(rotated) = scratch.current().copied() else {
        return Err(PlaceError::NotPlayable);
    };

    // Validate x bounds based on the rotated shape.
    let (min_dx, max_dx) = rotated
        .shape()
        .iter()
        .fold((i8::MAX, i8::MIN), |(lo, hi), &(dx, _)| (lo.min(dx), hi.max(dx)));
    if target.x + (min_dx as i32) < 0 || target.x + (max_dx as i32) >= BOARD_WIDTH as i32 {
        return Err(PlaceError::XOutOfBounds);
    }

    let dx = target.x - rotated.x;
    let step = if dx > 0 { Action::Right } else { Action::Left };
    for _ in 0..dx.abs() {
        if !scratch.apply_action(step) {
            return Err(PlaceError::XBlocked);
        }
        actions.try_push(step).map_err(|_| PlaceError::XOutOfBounds)?;
    }

    actions
        .try_push(Action::Drop)
        .map_err(|_| PlaceError::XOutOfBounds)?;
    Ok(actions)
}

/// Rotate, shift and hard-drop the active piece into `target`.
///
/// Leaves `state` untouched on error. The piece locks on the next `update`.
pub fn apply_place(state: &mut GameState, target: Placement) -> Result<(), PlaceError> {
    for action in plan_place(state, target)? {
        state.apply_action(action);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Rotation};
    use stackerz_core::{Board, EngineConfig};

    #[test]
    fn place_rejected_when_game_over() {
        let mut board = Board::new();
        for x in 0..9 {
            board.set(x, 1, Cell::Garbage);
        }
        let mut gs = GameState::with_board(1, EngineConfig::default(), board);
        assert!(gs.game_over());

        let err = apply_place(
            &mut gs,
            Placement {
                rotation: Rotation::North,
                x: 3,
            },
        )
        .unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
        assert_eq!(err.code(), "not_playable");
    }

    #[test]
    fn place_rejected_when_x_out_of_bounds() {
        let mut gs = GameState::new(1);
        let before = gs.snapshot();

        let err = apply_place(
            &mut gs,
            Placement {
                rotation: Rotation::North,
                x: -50,
            },
        )
        .unwrap_err();
        assert_eq!(err, PlaceError::XOutOfBounds);
        assert_eq!(gs.snapshot(), before);
    }

    #[test]
    fn place_rejected_when_x_blocked_by_collision() {
        let mut board = Board::new();
        // A wall in column 1 from row 0 down blocks any leftward shift.
        for y in 0..20 {
            board.set(1, y, Cell::Garbage);
        }
        let mut gs = GameState::with_board(1, EngineConfig::default(), board);
        let active = *gs.current().unwrap();

        let shape = active.shape();
        let min_dx = shape.iter().map(|&(dx, _)| dx as i32).min().unwrap();
        // Target puts the leftmost mino in column 0, beyond the wall.
        let err = apply_place(
            &mut gs,
            Placement {
                rotation: active.rotation,
                x: -min_dx,
            },
        )
        .unwrap_err();
        assert_eq!(err, PlaceError::XBlocked);
    }

    #[test]
    fn place_rotates_shifts_and_drops() {
        let mut gs = GameState::new(3);
        let target = Placement {
            rotation: Rotation::East,
            x: 0,
        };
        let actions = plan_place(&gs, target).unwrap();
        assert_eq!(actions[0], Action::Rotate);
        assert_eq!(actions.last(), Some(&Action::Drop));

        apply_place(&mut gs, target).unwrap();
        let active = gs.current().unwrap();
        assert_eq!(active.rotation, Rotation::East);
        assert_eq!(active.x, 0);
        assert!(gs.is_grounded());

        let spawned = gs.pieces_spawned();
        gs.update(16);
        assert_eq!(gs.pieces_spawned(), spawned + 1);
    }
}
