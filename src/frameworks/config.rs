use crate::use_cases::Role;
use std::{env, fmt, time::Duration};

// Runtime settings (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;
// The host plus one peer.
pub const MAX_PEERS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => write!(f, "invalid value '{value}' for {key}"),
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn session_role() -> Result<Role, ConfigError> {
    let raw = env::var("SESSION_ROLE").unwrap_or_default();
    raw.parse().map_err(|_| ConfigError::Invalid {
        key: "SESSION_ROLE",
        value: raw,
    })
}

pub fn host_bind_addr() -> String {
    env::var("HOST_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3001".to_string())
}

/// Session id a client dials.
pub fn host_id() -> Result<String, ConfigError> {
    env::var("HOST_ID")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing("HOST_ID"))
}

pub fn tick_rate_hz() -> u32 {
    env::var("TICK_RATE_HZ")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|hz| *hz > 0)
        .unwrap_or(60)
}

pub fn tick_interval() -> Duration {
    tick_interval_for(tick_rate_hz())
}

fn tick_interval_for(hz: u32) -> Duration {
    Duration::from_millis(u64::from(1000 / hz.clamp(1, 1000)))
}

pub fn dungeon_seed() -> Option<u64> {
    env::var("DUNGEON_SEED").ok().and_then(|v| v.trim().parse().ok())
}

pub fn connect_timeout() -> Duration {
    millis_or("CONNECT_TIMEOUT_MS", 5000)
}

pub fn loading_delay() -> Duration {
    millis_or("LOADING_DELAY_MS", 2000)
}

/// Floor whose trapdoor ends the run in victory; unset or 0 means endless.
pub fn final_floor() -> Option<u32> {
    env::var("FINAL_FLOOR")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|floor| *floor > 0)
}

fn millis_or(key: &str, default: u64) -> Duration {
    let millis = env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_rate_is_sixty_then_interval_matches_frame_time() {
        assert_eq!(tick_interval_for(60), Duration::from_millis(16));
    }

    #[test]
    fn when_rate_is_extreme_then_interval_stays_positive() {
        assert_eq!(tick_interval_for(0), Duration::from_millis(1000));
        assert_eq!(tick_interval_for(5000), Duration::from_millis(1));
    }

    #[test]
    fn when_config_error_is_shown_then_key_is_named() {
        let err = ConfigError::Invalid {
            key: "SESSION_ROLE",
            value: "boss".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value 'boss' for SESSION_ROLE");
        assert_eq!(ConfigError::Missing("HOST_ID").to_string(), "HOST_ID must be set");
    }
}
