//! Engine configuration: an optional JSON file, then environment overrides.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

pub const ENV_TICK_RATE: &str = "MONEY_TYCOON_TICK_RATE";
pub const ENV_AUTOSAVE_TICKS: &str = "MONEY_TYCOON_AUTOSAVE_TICKS";
pub const ENV_SEED: &str = "MONEY_TYCOON_SEED";
pub const ENV_SAVE_PATH: &str = "MONEY_TYCOON_SAVE";
pub const ENV_CONFIG_PATH: &str = "MONEY_TYCOON_CONFIG";

pub const DEFAULT_SAVE_PATH: &str = "money_tycoon.save";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ticks_per_second must be positive")]
    ZeroTickRate,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Ticks per second. Passive income per tick is `money_per_second / ticks_per_second`.
    pub ticks_per_second: u32,
    /// Ticks between autosaves (10 ticks/sec × 30 sec = 300).
    pub autosave_interval_ticks: u32,
    /// Seed for crit rolls. `None` seeds from the clock.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 10,
            autosave_interval_ticks: 300,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with any `MONEY_TYCOON_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().with_overrides(lookup)
    }

    /// Config file named by `MONEY_TYCOON_CONFIG` (defaults when unset),
    /// then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match env::var_os(ENV_CONFIG_PATH) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|key| env::var(key).ok()))
    }

    /// Missing keys take their defaults. Unknown keys are an error.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        if config.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Apply `MONEY_TYCOON_*` variables, read through `lookup`, on top of `self`.
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = self;
        if let Some(rate) = parse_var::<u32>(&lookup, ENV_TICK_RATE) {
            if rate == 0 {
                warn!(var = ENV_TICK_RATE, "tick rate must be positive, ignoring override");
            } else {
                config.ticks_per_second = rate;
            }
        }
        if let Some(ticks) = parse_var::<u32>(&lookup, ENV_AUTOSAVE_TICKS) {
            config.autosave_interval_ticks = ticks;
        }
        if let Some(seed) = parse_var::<u64>(&lookup, ENV_SEED) {
            config.rng_seed = Some(seed);
        }
        config
    }

    /// Seconds of passive income credited per tick.
    pub fn seconds_per_tick(&self) -> f64 {
        1.0 / self.ticks_per_second.max(1) as f64
    }
}

/// Save file used by the terminal driver.
pub fn save_path_from_env() -> PathBuf {
    save_path_from_lookup(|key| env::var(key).ok())
}

pub fn save_path_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup(ENV_SAVE_PATH)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH))
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = key, value = %raw, "ignoring malformed environment variable");
            None
        }
    }
}
