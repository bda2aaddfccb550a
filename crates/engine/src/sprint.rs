//! Sprint: clear a fixed number of lines as fast as possible.
//!
//! The tracker does not own the engine. Feed it the engine state and the same
//! delta after every `update`; its timer stops on the update that reaches the
//! line target.

use stackerz_core::GameState;

/// Standard sprint length.
pub const SPRINT_LINES: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SprintResult {
    /// Target reached after `time_ms` of game time.
    Cleared { time_ms: u64 },
    /// Topped out before the target.
    ToppedOut { lines: u32 },
}

#[derive(Debug, Clone)]
pub struct Sprint {
    target_lines: u32,
    time_ms: u64,
    result: Option<SprintResult>,
}

impl Sprint {
    pub fn new(target_lines: u32) -> Self {
        Self {
            target_lines,
            time_ms: 0,
            result: None,
        }
    }

    pub fn target_lines(&self) -> u32 {
        self.target_lines
    }

    /// Sprint timer; frozen once the sprint is over.
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    pub fn result(&self) -> Option<SprintResult> {
        self.result
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Lines still needed.
    pub fn remaining(&self, state: &GameState) -> u32 {
        self.target_lines.saturating_sub(state.lines())
    }

    /// Account for one `update(dt_ms)` of `state`.
    pub fn observe(&mut self, state: &GameState, dt_ms: u32) -> Option<SprintResult> {
        if self.result.is_some() {
            return self.result;
        }
        self.time_ms += dt_ms as u64;
        if state.lines() >= self.target_lines {
            tracing::info!(
                time_ms = self.time_ms,
                score = state.score(),
                "sprint cleared"
            );
            self.result = Some(SprintResult::Cleared {
                time_ms: self.time_ms,
            });
        } else if state.game_over() {
            tracing::info!(lines = state.lines(), target = self.target_lines, "sprint topped out");
            self.result = Some(SprintResult::ToppedOut {
                lines: state.lines(),
            });
        }
        self.result
    }
}

impl Default for Sprint {
    fn default() -> Self {
        Self::new(SPRINT_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{BotConfig, BotController};
    use crate::types::{Action, TICK_MS};

    #[test]
    fn test_timer_stops_at_target() {
        let mut state = GameState::new(2024);
        let mut bot = BotController::new(BotConfig {
            instant: true,
            ..BotConfig::default()
        });
        let mut sprint = Sprint::new(1);
        assert_eq!(sprint.remaining(&state), 1);

        let mut ticks = 0u64;
        while !sprint.is_finished() {
            bot.tick(&mut state, TICK_MS);
            sprint.observe(&state, TICK_MS);
            ticks += 1;
            assert!(ticks <= 150);
        }
        assert_eq!(
            sprint.result(),
            Some(SprintResult::Cleared {
                time_ms: ticks * TICK_MS as u64
            })
        );
        assert_eq!(sprint.remaining(&state), 0);

        bot.tick(&mut state, TICK_MS);
        sprint.observe(&state, TICK_MS);
        assert_eq!(sprint.time_ms(), ticks * TICK_MS as u64);
    }

    #[test]
    fn test_top_out_ends_sprint() {
        let mut state = GameState::new(8);
        let mut sprint = Sprint::default();
        assert_eq!(sprint.target_lines(), SPRINT_LINES);

        for _ in 0..2000 {
            state.apply_action(Action::Drop);
            state.update(TICK_MS);
            if sprint.observe(&state, TICK_MS).is_some() {
                break;
            }
        }
        assert!(state.game_over());
        assert_eq!(
            sprint.result(),
            Some(SprintResult::ToppedOut {
                lines: state.lines()
            })
        );
    }
}
