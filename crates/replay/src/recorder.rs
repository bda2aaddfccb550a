use stackerz_core::{EngineConfig, GameState};

use crate::blob::{ReplayBlob, ReplayInput, ReplaySettings};
use crate::types::{Action, LockEvent, TICK_MS};

/// Collects `(clock, action)` pairs for one game.
///
/// The clock only moves through [`ReplayRecorder::advance`]. Inputs are
/// stamped with it, so it must see every delta of the recorded game.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayRecorder {
    seed: i64,
    settings: ReplaySettings,
    clock_ms: u64,
    inputs: Vec<ReplayInput>,
}

impl ReplayRecorder {
    pub fn new(seed: i64) -> Self {
        Self::with_settings(seed, ReplaySettings::default())
    }

    pub fn with_settings(seed: i64, settings: ReplaySettings) -> Self {
        Self {
            seed,
            settings,
            clock_ms: 0,
            inputs: Vec::new(),
        }
    }

    pub fn record(&mut self, action: Action) {
        self.inputs.push(ReplayInput {
            t: self.clock_ms,
            a: action,
        });
    }

    pub fn advance(&mut self, dt_ms: u32) {
        self.clock_ms += dt_ms as u64;
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn inputs(&self) -> &[ReplayInput] {
        &self.inputs
    }

    pub fn to_blob(&self) -> ReplayBlob {
        self.clone().into_blob()
    }

    /// The blob ends at the current clock.
    pub fn into_blob(self) -> ReplayBlob {
        let mut blob = ReplayBlob::new(self.seed, self.inputs);
        blob.end_ms = Some(self.clock_ms);
        blob.settings = self.settings;
        blob
    }
}

/// An engine whose every command and delta goes through a recorder.
///
/// The engine is stepped exactly the way [`ReplayPlayer`](crate::ReplayPlayer)
/// steps it: whole `TICK_MS` steps, plus one short step to land on the clock
/// whenever a command is applied. Any sequence of deltas therefore replays
/// bit for bit. The engine may trail the recorder clock by less than one step.
#[derive(Debug, Clone)]
pub struct RecordedGame {
    state: GameState,
    recorder: ReplayRecorder,
    engine_ms: u64,
    last_event: Option<LockEvent>,
}

impl RecordedGame {
    pub fn new(seed: i64) -> Self {
        Self::with_config(seed, EngineConfig::default())
    }

    /// Replays must be played back with the same config.
    pub fn with_config(seed: i64, config: EngineConfig) -> Self {
        Self {
            state: GameState::with_config(seed, config),
            recorder: ReplayRecorder::with_settings(seed, ReplaySettings::from_config(&config)),
            engine_ms: 0,
            last_event: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn recorder(&self) -> &ReplayRecorder {
        &self.recorder
    }

    /// Record and apply a command. Rejected commands are recorded too; they
    /// are rejected again on playback.
    pub fn apply(&mut self, action: Action) -> bool {
        let clock = self.recorder.clock_ms();
        if self.engine_ms < clock {
            self.step((clock - self.engine_ms) as u32);
        }
        if self.state.game_over() {
            return false;
        }
        self.recorder.record(action);
        self.state.apply_action(action)
    }

    pub fn update(&mut self, dt_ms: u32) {
        if self.state.game_over() {
            return;
        }
        self.recorder.advance(dt_ms);
        let clock = self.recorder.clock_ms();
        while self.engine_ms + TICK_MS as u64 <= clock && !self.state.game_over() {
            self.step(TICK_MS);
        }
    }

    fn step(&mut self, dt_ms: u32) {
        self.state.update(dt_ms);
        self.engine_ms += dt_ms as u64;
        if let Some(event) = self.state.take_last_event() {
            self.last_event = Some(event);
        }
    }

    /// Most recent lock event since the last call, if any. Not part of the
    /// replay.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn finish(self) -> (GameState, ReplayBlob) {
        tracing::debug!(
            seed = self.state.seed(),
            inputs = self.recorder.inputs().len(),
            clock_ms = self.recorder.clock_ms(),
            "replay recording finished"
        );
        (self.state, self.recorder.into_blob())
    }
}
