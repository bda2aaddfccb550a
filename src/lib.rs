//! Stackerz (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, integration
//! tests and benches can use `stackerz::{core, engine, replay, adapter, types}`.

pub use stackerz_adapter as adapter;
pub use stackerz_core as core;
pub use stackerz_engine as engine;
pub use stackerz_replay as replay;
pub use stackerz_types as types;
