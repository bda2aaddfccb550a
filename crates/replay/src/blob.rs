//! Replay blob: seed plus timestamped input tags, stored as JSON.
//!
//! ```json
//! {"seed":12345,"inputs":[{"t":0,"a":"left"},{"t":480,"a":"drop"}],"version":1,"endMs":960}
//! ```
//!
//! `endMs` is the game clock when recording stopped. `settings` is present
//! only when the game ran with a non-default engine config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stackerz_core::EngineConfig;

use crate::types::{Action, LOCK_DELAY_MS, SOFT_DROP_INTERVAL_MS};

pub const REPLAY_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("malformed replay: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported replay version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("input {index} at t={t} is earlier than the previous input at t={previous}")]
    OutOfOrder { index: usize, t: u64, previous: u64 },
    #[error("replay ends at t={end} before its last input at t={last}")]
    EndsBeforeLastInput { end: u64, last: u64 },
    #[error("speed multiplier must be positive and finite, got {0}")]
    InvalidSpeed(f64),
}

/// One recorded command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplayInput {
    /// Milliseconds of game time since the start.
    pub t: u64,
    #[serde(with = "action_tag")]
    pub a: Action,
}

/// Engine settings a replay must be played back with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySettings {
    #[serde(default = "default_speed")]
    pub speed_multiplier: f64,
    #[serde(default)]
    pub time_level_bonus: bool,
    #[serde(default = "default_lock_delay")]
    pub lock_delay_ms: u32,
    #[serde(default = "default_soft_drop")]
    pub soft_drop_interval_ms: u32,
}

impl ReplaySettings {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            speed_multiplier: config.speed_multiplier,
            time_level_bonus: config.time_level_bonus,
            lock_delay_ms: config.lock_delay_ms,
            soft_drop_interval_ms: config.soft_drop_interval_ms,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            speed_multiplier: self.speed_multiplier,
            time_level_bonus: self.time_level_bonus,
            lock_delay_ms: self.lock_delay_ms,
            soft_drop_interval_ms: self.soft_drop_interval_ms,
        }
    }

    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

fn default_speed() -> f64 {
    1.0
}

fn default_lock_delay() -> u32 {
    LOCK_DELAY_MS
}

fn default_soft_drop() -> u32 {
    SOFT_DROP_INTERVAL_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayBlob {
    pub seed: i64,
    pub inputs: Vec<ReplayInput>,
    #[serde(default = "default_version")]
    pub version: u32,
    /// Game clock when recording stopped. Older blobs end at their last input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "ReplaySettings::is_default")]
    pub settings: ReplaySettings,
}

fn default_version() -> u32 {
    REPLAY_VERSION
}

impl ReplayBlob {
    pub fn new(seed: i64, inputs: Vec<ReplayInput>) -> Self {
        Self {
            seed,
            inputs,
            version: REPLAY_VERSION,
            end_ms: None,
            settings: ReplaySettings::default(),
        }
    }

    /// Parse and validate. Nothing partially valid is ever returned.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let blob: ReplayBlob = serde_json::from_str(json)?;
        blob.validate()?;
        Ok(blob)
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.version != REPLAY_VERSION {
            return Err(ReplayError::UnsupportedVersion {
                found: self.version,
                expected: REPLAY_VERSION,
            });
        }
        for (index, pair) in self.inputs.windows(2).enumerate() {
            if pair[1].t < pair[0].t {
                return Err(ReplayError::OutOfOrder {
                    index: index + 1,
                    t: pair[1].t,
                    previous: pair[0].t,
                });
            }
        }
        let last = self.last_input_ms();
        if let Some(end) = self.end_ms {
            if end < last {
                return Err(ReplayError::EndsBeforeLastInput { end, last });
            }
        }
        let speed = self.settings.speed_multiplier;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ReplayError::InvalidSpeed(speed));
        }
        Ok(())
    }

    /// Timestamp of the last input, 0 for an empty replay.
    pub fn last_input_ms(&self) -> u64 {
        self.inputs.last().map_or(0, |i| i.t)
    }

    /// Game time covered by the replay: the recorded end clock, or the last
    /// input when no end was stored.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.unwrap_or(0).max(self.last_input_ms())
    }
}

/// Action tags are a closed set; anything else fails deserialization.
mod action_tag {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::Action;

    pub fn serialize<S>(action: &Action, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(action.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Action, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        Action::from_str(s).ok_or_else(|| {
            serde::de::Error::unknown_variant(
                s,
                &["left", "right", "rotate", "drop", "softOn", "softOff"],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_blob() {
        let blob = ReplayBlob::from_json(
            r#"{"seed":7,"inputs":[{"t":0,"a":"left"},{"t":0,"a":"softOn"},{"t":250,"a":"drop"}],"version":1}"#,
        )
        .unwrap();
        assert_eq!(blob.seed, 7);
        assert_eq!(blob.inputs.len(), 3);
        assert_eq!(blob.inputs[1].a, Action::SoftOn);
        assert_eq!(blob.duration_ms(), 250);
    }

    #[test]
    fn test_missing_version_defaults() {
        let blob = ReplayBlob::from_json(r#"{"seed":1,"inputs":[]}"#).unwrap();
        assert_eq!(blob.version, REPLAY_VERSION);
    }

    #[test]
    fn test_serialized_shape() {
        let blob = ReplayBlob::new(
            42,
            vec![ReplayInput {
                t: 16,
                a: Action::SoftOff,
            }],
        );
        assert_eq!(
            blob.to_json().unwrap(),
            r#"{"seed":42,"inputs":[{"t":16,"a":"softOff"}],"version":1}"#
        );
    }

    #[test]
    fn test_rejects_unknown_tag() {
        let err = ReplayBlob::from_json(r#"{"seed":1,"inputs":[{"t":0,"a":"hold"}],"version":1}"#)
            .unwrap_err();
        assert!(matches!(err, ReplayError::Malformed(_)));
    }

    #[test]
    fn test_rejects_non_integer_seed() {
        for json in [
            r#"{"seed":1.5,"inputs":[],"version":1}"#,
            r#"{"seed":"1","inputs":[],"version":1}"#,
            r#"{"inputs":[],"version":1}"#,
        ] {
            assert!(matches!(
                ReplayBlob::from_json(json),
                Err(ReplayError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let err = ReplayBlob::from_json(r#"{"seed":1,"inputs":[],"version":2}"#).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::UnsupportedVersion {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_end_clock_and_settings() {
        let blob = ReplayBlob::from_json(
            r#"{"seed":3,"inputs":[{"t":32,"a":"drop"}],"version":1,"endMs":5000,"settings":{"speedMultiplier":2.0}}"#,
        )
        .unwrap();
        assert_eq!(blob.last_input_ms(), 32);
        assert_eq!(blob.duration_ms(), 5000);
        let config = blob.settings.engine_config();
        assert_eq!(config.speed_multiplier, 2.0);
        assert!(!config.time_level_bonus);
        assert_eq!(config.lock_delay_ms, LOCK_DELAY_MS);

        let mut written = ReplayBlob::new(3, blob.inputs.clone());
        written.end_ms = Some(5000);
        written.settings.speed_multiplier = 2.0;
        let json = written.to_json().unwrap();
        assert!(json.contains(r#""endMs":5000"#));
        assert!(json.contains(r#""speedMultiplier":2.0"#));
        assert_eq!(ReplayBlob::from_json(&json).unwrap(), written);
    }

    #[test]
    fn test_rejects_end_before_last_input() {
        let err = ReplayBlob::from_json(
            r#"{"seed":1,"inputs":[{"t":100,"a":"left"}],"endMs":50}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReplayError::EndsBeforeLastInput { end: 50, last: 100 }
        ));
    }

    #[test]
    fn test_rejects_bad_speed() {
        let err = ReplayBlob::from_json(
            r#"{"seed":1,"inputs":[],"settings":{"speedMultiplier":0.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReplayError::InvalidSpeed(_)));
    }

    #[test]
    fn test_rejects_decreasing_timestamps() {
        let err = ReplayBlob::from_json(
            r#"{"seed":1,"inputs":[{"t":10,"a":"left"},{"t":10,"a":"right"},{"t":5,"a":"drop"}]}"#,
        )
        .unwrap_err();
        match err {
            ReplayError::OutOfOrder { index, t, previous } => {
                assert_eq!((index, t, previous), (2, 5, 10));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
