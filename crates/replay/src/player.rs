use stackerz_core::{EngineConfig, GameState};

use crate::blob::{ReplayBlob, ReplayError};
use crate::types::TICK_MS;

/// Playback speed of the replay clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReplaySpeed {
    #[default]
    X1,
    X2,
    X4,
    X8,
}

impl ReplaySpeed {
    pub fn factor(self) -> u32 {
        match self {
            ReplaySpeed::X1 => 1,
            ReplaySpeed::X2 => 2,
            ReplaySpeed::X4 => 4,
            ReplaySpeed::X8 => 8,
        }
    }

    pub fn from_factor(factor: u32) -> Option<Self> {
        match factor {
            1 => Some(ReplaySpeed::X1),
            2 => Some(ReplaySpeed::X2),
            4 => Some(ReplaySpeed::X4),
            8 => Some(ReplaySpeed::X8),
            _ => None,
        }
    }

    /// Next speed up, wrapping from 8x back to 1x.
    pub fn cycle(self) -> Self {
        match self {
            ReplaySpeed::X1 => ReplaySpeed::X2,
            ReplaySpeed::X2 => ReplaySpeed::X4,
            ReplaySpeed::X4 => ReplaySpeed::X8,
            ReplaySpeed::X8 => ReplaySpeed::X1,
        }
    }
}

/// Drives a fresh engine through a recorded blob.
///
/// The engine advances in `TICK_MS` steps, shortened only to land exactly on
/// an input's timestamp. Every input due at a timestamp is applied before the
/// engine moves past it. The replay clock may run ahead of the engine by less
/// than one step.
#[derive(Debug, Clone)]
pub struct ReplayPlayer {
    blob: ReplayBlob,
    state: GameState,
    cursor: usize,
    engine_ms: u64,
    clock_ms: u64,
    speed: ReplaySpeed,
}

impl ReplayPlayer {
    /// Play back with the engine settings stored in the blob.
    pub fn new(blob: ReplayBlob) -> Result<Self, ReplayError> {
        let config = blob.settings.engine_config();
        Self::with_config(blob, config)
    }

    /// Play back with `config` instead of the stored settings.
    pub fn with_config(blob: ReplayBlob, config: EngineConfig) -> Result<Self, ReplayError> {
        blob.validate()?;
        tracing::debug!(
            seed = blob.seed,
            inputs = blob.inputs.len(),
            duration_ms = blob.duration_ms(),
            "replay loaded"
        );
        Ok(Self {
            state: GameState::with_config(blob.seed, config),
            blob,
            cursor: 0,
            engine_ms: 0,
            clock_ms: 0,
            speed: ReplaySpeed::default(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Self::new(ReplayBlob::from_json(json)?)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn blob(&self) -> &ReplayBlob {
        &self.blob
    }

    pub fn speed(&self) -> ReplaySpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: ReplaySpeed) {
        self.speed = speed;
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Inputs applied so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// All inputs applied and the clock at the recorded end, or topped out.
    pub fn is_finished(&self) -> bool {
        self.state.game_over()
            || (self.cursor >= self.blob.inputs.len() && self.clock_ms >= self.blob.duration_ms())
    }

    /// Advance the replay clock by `real_dt_ms` scaled by the speed.
    pub fn tick(&mut self, real_dt_ms: u32) {
        let target = self.clock_ms + real_dt_ms as u64 * self.speed.factor() as u64;
        self.advance_to(target);
    }

    /// Move the replay clock forward to `target_ms`. Never rewinds.
    pub fn advance_to(&mut self, target_ms: u64) {
        self.apply_due();
        while self.engine_ms < target_ms && !self.state.game_over() {
            let mut step = TICK_MS as u64;
            if let Some(next) = self.blob.inputs.get(self.cursor) {
                step = step.min(next.t - self.engine_ms);
            }
            if self.engine_ms + step > target_ms {
                break;
            }
            self.state.update(step as u32);
            self.engine_ms += step;
            self.apply_due();
        }
        self.clock_ms = self.clock_ms.max(target_ms);
    }

    /// Apply every remaining input and play on to the recorded end clock.
    pub fn run_to_end(&mut self) {
        self.advance_to(self.blob.duration_ms());
        tracing::debug!(
            applied = self.cursor,
            score = self.state.score(),
            lines = self.state.lines(),
            game_over = self.state.game_over(),
            "replay finished"
        );
    }

    /// Inputs with `t <= engine_ms`, in order.
    fn apply_due(&mut self) {
        while let Some(input) = self.blob.inputs.get(self.cursor) {
            if input.t > self.engine_ms {
                break;
            }
            self.state.apply_action(input.a);
            self.cursor += 1;
        }
    }
}
