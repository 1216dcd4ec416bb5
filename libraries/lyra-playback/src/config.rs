/// Playback engine configuration
use crate::error::{PlaybackError, Result};
use crate::types::RepeatMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix (`LYRA_FFT_SIZE`, `LYRA_BAR_COUNT`, ...)
pub const ENV_PREFIX: &str = "LYRA";

const MIN_FFT_SIZE: u32 = 32;
const MAX_FFT_SIZE: u32 = 32768;

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Analyzer FFT size; the sampler yields `fft_size / 2` bins (default: 256)
    pub fft_size: u32,

    /// Number of visualizer bars (default: 64)
    pub bar_count: usize,

    /// Volume applied to the first loaded track (default: 1.0)
    pub initial_volume: f64,

    /// Initial shuffle toggle (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: none)
    pub repeat: RepeatMode,

    /// Entries kept in the recently played list (default: 20)
    pub recent_capacity: usize,

    /// Buffered notifications per subscriber before it lags (default: 64)
    pub event_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            bar_count: 64,
            initial_volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::Off,
            recent_capacity: 20,
            event_capacity: 64,
        }
    }
}

impl PlaybackConfig {
    /// Load configuration from an optional TOML file and `LYRA_` environment
    /// variables, environment taking precedence
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`PlaybackConfig::load`] with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                settings = settings.add_source(config::File::from(path));
            } else {
                tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(PlaybackError::Config(format!(
                "fft_size must be a power of two between {MIN_FFT_SIZE} and {MAX_FFT_SIZE}, got {}",
                self.fft_size
            )));
        }

        if self.bar_count == 0 {
            return Err(PlaybackError::Config(
                "bar_count must be greater than zero".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(PlaybackError::Config(format!(
                "initial_volume must be within [0, 1], got {}",
                self.initial_volume
            )));
        }

        if self.recent_capacity == 0 {
            return Err(PlaybackError::Config(
                "recent_capacity must be greater than zero".to_string(),
            ));
        }

        if self.event_capacity == 0 {
            return Err(PlaybackError::Config(
                "event_capacity must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Number of frequency bins the analyzer produces
    pub fn bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }
}
