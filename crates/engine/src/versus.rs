//! Local two-player match.
//!
//! Each side owns its engine outright. After a side's `update`, whatever it
//! reported as `last_attack` is pushed into the other engine as garbage. The
//! match ends as soon as either side tops out.

use stackerz_core::GameState;

use crate::bot::{Pilot, PilotActions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    Winner(Side),
    /// Both sides topped out during the same step.
    Draw,
}

/// What happened during one [`VersusMatch::step`].
#[derive(Debug, Clone, Default)]
pub struct MatchStep {
    pub player_actions: PilotActions,
    pub opponent_actions: PilotActions,
    /// Garbage sent by the player this step.
    pub player_attack: u32,
    /// Garbage sent by the opponent this step.
    pub opponent_attack: u32,
}

pub struct VersusMatch<A: Pilot, B: Pilot> {
    player: GameState,
    opponent: GameState,
    player_pilot: A,
    opponent_pilot: B,
    /// Garbage received so far, indexed player then opponent.
    received: [u32; 2],
    elapsed_ms: u64,
}

impl<A: Pilot, B: Pilot> VersusMatch<A, B> {
    /// Both engines start from the same seed, so both see the same pieces.
    pub fn new(seed: i64, player_pilot: A, opponent_pilot: B) -> Self {
        Self::from_states(
            GameState::new(seed),
            GameState::new(seed),
            player_pilot,
            opponent_pilot,
        )
    }

    pub fn from_states(player: GameState, opponent: GameState, player_pilot: A, opponent_pilot: B) -> Self {
        Self {
            player,
            opponent,
            player_pilot,
            opponent_pilot,
            received: [0; 2],
            elapsed_ms: 0,
        }
    }

    pub fn state(&self, side: Side) -> &GameState {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn garbage_received(&self, side: Side) -> u32 {
        self.received[side as usize]
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        match (self.player.game_over(), self.opponent.game_over()) {
            (true, true) => Some(MatchOutcome::Draw),
            (true, false) => Some(MatchOutcome::Winner(Side::Opponent)),
            (false, true) => Some(MatchOutcome::Winner(Side::Player)),
            (false, false) => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    /// Advance both sides by `dt_ms`, player first.
    pub fn step(&mut self, dt_ms: u32) -> MatchStep {
        let mut step = MatchStep::default();
        if self.is_finished() {
            return step;
        }
        self.elapsed_ms += dt_ms as u64;

        step.player_actions = drive(&mut self.player, &mut self.player_pilot, dt_ms);
        step.player_attack = self.player.last_attack();
        if step.player_attack > 0 {
            self.opponent.inject_garbage(step.player_attack);
            self.received[Side::Opponent as usize] += step.player_attack;
        }

        step.opponent_actions = drive(&mut self.opponent, &mut self.opponent_pilot, dt_ms);
        step.opponent_attack = self.opponent.last_attack();
        if step.opponent_attack > 0 {
            self.player.inject_garbage(step.opponent_attack);
            self.received[Side::Player as usize] += step.opponent_attack;
        }

        if let Some(outcome) = self.outcome() {
            tracing::info!(
                ?outcome,
                elapsed_ms = self.elapsed_ms,
                player_score = self.player.score(),
                opponent_score = self.opponent.score(),
                "versus match finished"
            );
        }
        step
    }

    /// Step until the match ends or `limit_ms` of game time has passed.
    pub fn run_for(&mut self, dt_ms: u32, limit_ms: u64) -> Option<MatchOutcome> {
        while !self.is_finished() && self.elapsed_ms < limit_ms {
            self.step(dt_ms);
        }
        self.outcome()
    }
}

fn drive<P: Pilot>(state: &mut GameState, pilot: &mut P, dt_ms: u32) -> PilotActions {
    let actions = pilot.decide(state, dt_ms);
    for action in &actions {
        state.apply_action(*action);
    }
    state.update(dt_ms);
    actions
}
