//! Replay recording and playback.
//!
//! A replay is a seed plus the commands applied to the engine, each stamped
//! with the game clock at the moment it was applied. Because the engine is
//! deterministic, feeding the same commands at the same clock values into a
//! freshly seeded engine rebuilds the game exactly. The blob also stores the
//! clock at which recording stopped and any non-default engine settings, so a
//! replay is self-contained.
//!
//! ```
//! use stackerz_replay::{RecordedGame, ReplayPlayer};
//! use stackerz_replay::types::Action;
//!
//! let mut live = RecordedGame::new(7);
//! live.apply(Action::Rotate);
//! live.apply(Action::Drop);
//! live.update(16);
//! live.update(700);
//! let (state, blob) = live.finish();
//!
//! let mut replay = ReplayPlayer::from_json(&blob.to_json().unwrap()).unwrap();
//! replay.run_to_end();
//! assert_eq!(replay.state().snapshot(), state.snapshot());
//! ```

pub mod blob;
pub mod player;
pub mod recorder;

pub use stackerz_types as types;

pub use blob::{ReplayBlob, ReplayError, ReplayInput, ReplaySettings, REPLAY_VERSION};
pub use player::{ReplayPlayer, ReplaySpeed};
pub use recorder::{RecordedGame, ReplayRecorder};
