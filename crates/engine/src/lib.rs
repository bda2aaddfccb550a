//! Drivers that sit on top of the core engine.
//!
//! - [`heuristic`]: board evaluation and greedy placement search
//! - [`place`]: turn a target placement into rotate/shift/drop commands
//! - [`bot`]: the [`Pilot`] trait and the heuristic bot controller
//! - [`versus`]: two engines exchanging garbage
//! - [`sprint`]: line-target timer for the sprint mode

pub mod bot;
pub mod heuristic;
pub mod place;
pub mod sprint;
pub mod versus;

pub use stackerz_types as types;

pub use bot::{BotConfig, BotController, BotDifficulty, Pilot, PilotActions};
pub use heuristic::{best_move, simulate_lock, Placement};
pub use place::{apply_place, plan_place, PlaceError};
pub use sprint::{Sprint, SprintResult, SPRINT_LINES};
pub use versus::{MatchOutcome, MatchStep, Side, VersusMatch};
