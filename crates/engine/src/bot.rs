//! Bot controller: drives an engine it does not own.
//!
//! The controller only decides commands. The caller applies them (directly or
//! through a replay recorder) and keeps calling `update`, so bot games are
//! replayable like human ones.

use arrayvec::ArrayVec;
use stackerz_core::GameState;

use crate::heuristic::{best_move, Placement};
use crate::place::plan_place;
use crate::types::Action;

/// Commands produced for a single tick.
pub type PilotActions = ArrayVec<Action, 24>;

/// Anything that can steer one side of a match.
pub trait Pilot {
    /// Commands to apply before the engine advances by `dt_ms`.
    fn decide(&mut self, state: &GameState, dt_ms: u32) -> PilotActions;
}

/// Preset bot strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BotDifficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl BotDifficulty {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "normal" => Some(Self::Normal),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotConfig {
    /// Time between single steps toward the plan.
    pub action_interval_ms: u32,
    /// Weight of the preview piece's best follow-up score.
    pub lookahead_weight: f64,
    /// Rotate, shift and hard-drop in one tick instead of stepping.
    pub instant: bool,
}

impl BotConfig {
    pub fn for_difficulty(difficulty: BotDifficulty) -> Self {
        let (action_interval_ms, lookahead_weight) = match difficulty {
            BotDifficulty::Easy => (180, 0.12),
            BotDifficulty::Normal => (120, 0.35),
            BotDifficulty::Hard => (70, 0.60),
        };
        Self {
            action_interval_ms,
            lookahead_weight,
            instant: false,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::for_difficulty(BotDifficulty::default())
    }
}

#[derive(Debug, Clone)]
pub struct BotController {
    config: BotConfig,
    plan: Option<Placement>,
    /// `pieces_spawned` of the piece the plan was made for.
    planned_piece: u32,
    cooldown_ms: i64,
}

impl BotController {
    pub fn new(config: BotConfig) -> Self {
        Self {
            config,
            plan: None,
            planned_piece: 0,
            cooldown_ms: 0,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn plan(&self) -> Option<Placement> {
        self.plan
    }

    /// Replan whenever a new piece has spawned since the last plan.
    fn refresh_plan(&mut self, state: &GameState) -> Option<Placement> {
        let spawned = state.pieces_spawned();
        if self.plan.is_none() || self.planned_piece != spawned {
            let current = state.current()?;
            let next = state.next().map(|p| p.kind);
            let placement = best_move(
                state.board(),
                current.kind,
                next,
                self.config.lookahead_weight,
            );
            tracing::trace!(
                piece = ?current.kind,
                rotation = ?placement.rotation,
                x = placement.x,
                "bot planned placement"
            );
            self.plan = Some(placement);
            self.planned_piece = spawned;
            self.cooldown_ms = 0;
        }
        self.plan
    }

    /// One step toward the plan: rotate first, then shift, then let gravity
    /// finish the drop.
    fn step_toward(&self, state: &GameState, plan: Placement) -> Option<Action> {
        let current = state.current()?;
        if current.rotation != plan.rotation {
            Some(Action::Rotate)
        } else if current.x < plan.x {
            Some(Action::Right)
        } else if current.x > plan.x {
            Some(Action::Left)
        } else {
            None
        }
    }

    /// Convenience for drivers without a recorder: decide, apply, update.
    pub fn tick(&mut self, state: &mut GameState, dt_ms: u32) {
        for action in self.decide(state, dt_ms) {
            state.apply_action(action);
        }
        state.update(dt_ms);
    }
}

impl Default for BotController {
    fn default() -> Self {
        Self::new(BotConfig::default())
    }
}

impl Pilot for BotController {
    fn decide(&mut self, state: &GameState, dt_ms: u32) -> PilotActions {
        let mut out = PilotActions::new();
        if state.game_over() {
            return out;
        }
        let Some(plan) = self.refresh_plan(state) else {
            return out;
        };

        if self.config.instant {
            if state.is_grounded() {
                // Already dropped; waiting for the lock.
                return out;
            }
            match plan_place(state, plan) {
                Ok(actions) => out = actions,
                Err(err) => {
                    tracing::debug!(%err, "bot placement unreachable, dropping in place");
                    out.push(Action::Drop);
                }
            }
            return out;
        }

        self.cooldown_ms -= dt_ms as i64;
        if self.cooldown_ms <= 0 {
            self.cooldown_ms = self.config.action_interval_ms as i64;
            if let Some(action) = self.step_toward(state, plan) {
                out.push(action);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TICK_MS;

    #[test]
    fn test_difficulty_presets() {
        assert_eq!(BotConfig::default().action_interval_ms, 120);
        assert_eq!(
            BotConfig::for_difficulty(BotDifficulty::Hard).lookahead_weight,
            0.60
        );
        assert_eq!(BotDifficulty::from_str("EASY"), Some(BotDifficulty::Easy));
        assert_eq!(BotDifficulty::from_str("brutal"), None);
    }

    #[test]
    fn test_stepping_bot_acts_once_per_interval() {
        let mut state = GameState::new(17);
        let mut bot = BotController::default();

        // First tick acts immediately, the next ones wait for the cooldown.
        let first = bot.decide(&state, TICK_MS);
        assert!(first.len() <= 1);
        for a in &first {
            state.apply_action(*a);
        }
        for _ in 0..6 {
            assert!(bot.decide(&state, TICK_MS).is_empty());
        }
        assert!(bot.plan().is_some());
    }

    #[test]
    fn test_stepping_bot_reaches_plan_and_replans() {
        let mut state = GameState::new(23);
        let mut bot = BotController::default();

        let spawned = state.pieces_spawned();
        let mut ticks = 0;
        while state.pieces_spawned() == spawned {
            bot.tick(&mut state, TICK_MS);
            ticks += 1;
            assert!(ticks < 10_000);
        }
        let event = state.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 0);

        // Next decision plans for the new piece.
        bot.decide(&state, TICK_MS);
        assert_eq!(bot.planned_piece, state.pieces_spawned());
    }

    #[test]
    fn test_instant_bot_survives_many_pieces() {
        let mut state = GameState::new(2024);
        let mut bot = BotController::new(BotConfig {
            instant: true,
            ..BotConfig::default()
        });

        // One piece locks per tick; 150 pieces cannot fit without clears.
        for _ in 0..150 {
            bot.tick(&mut state, TICK_MS);
            if state.game_over() {
                break;
            }
        }
        assert!(state.pieces_spawned() > 100);
        assert!(state.lines() > 0);
        assert!(!state.game_over());
    }
}
