use std::env;

/// Where and how to reach the room relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub room: String,
    pub name: String,
    /// Inbound messages buffered before the reader waits on the game loop.
    pub max_pending: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5050,
            room: "default".to_string(),
            name: "player".to_string(),
            max_pending: 64,
        }
    }
}

impl RelayConfig {
    /// Read `STACKERZ_RELAY_*` variables, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
        };

        Self {
            host: text("STACKERZ_RELAY_HOST", defaults.host),
            port: lookup("STACKERZ_RELAY_PORT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.port),
            room: text("STACKERZ_RELAY_ROOM", defaults.room),
            name: text("STACKERZ_RELAY_NAME", defaults.name),
            max_pending: lookup("STACKERZ_RELAY_MAX_PENDING")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_pending),
        }
    }
}
