//! Driver configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Base tick interval before the speed multiplier is applied
    pub tick_interval_ms: u64,
    /// Default speed multiplier when the CLI does not pass one
    pub speed: u8,
}

impl SimConfig {
    pub fn from_env() -> Self {
        Self {
            tick_interval_ms: env::var("GRIDFLEET_TICK_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
            speed: env::var("GRIDFLEET_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // Only meaningful when the vars are unset, which is the norm in CI
        if env::var("GRIDFLEET_TICK_MS").is_err() && env::var("GRIDFLEET_SPEED").is_err() {
            let config = SimConfig::from_env();
            assert_eq!(config.tick_interval_ms, 1000);
            assert_eq!(config.speed, 1);
        }
    }
}
