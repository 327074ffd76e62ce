//! Playback configuration
//!
//! Defaults cover the stock player. `load` layers an optional TOML file and
//! `GROOVE_`-prefixed environment variables on top, e.g.
//! `GROOVE_SHUFFLE_STRATEGY=overlay` or `GROOVE_TRACK_CACHE_CAPACITY=64`.

use crate::error::{PlaybackError, Result};
use crate::types::{RemovalPolicy, ShuffleStrategy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the player, loaders and transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How "next" picks under shuffle (default: Independent)
    #[serde(default)]
    pub shuffle_strategy: ShuffleStrategy,

    /// What loaders do to the queue on local removal (default: Resync)
    #[serde(default)]
    pub removal_policy: RemovalPolicy,

    /// Maximum number of track references kept for playback (default: 512)
    #[serde(default = "default_track_cache_capacity")]
    pub track_cache_capacity: usize,
}

fn default_track_cache_capacity() -> usize {
    512
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            shuffle_strategy: ShuffleStrategy::default(),
            removal_policy: RemovalPolicy::default(),
            track_cache_capacity: default_track_cache_capacity(),
        }
    }
}

impl PlaybackConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = file {
            if path.exists() {
                settings = settings.add_source(config::File::from(path));
            } else {
                tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("GROOVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: PlaybackConfig = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.track_cache_capacity == 0 {
            return Err(PlaybackError::Config(
                "track_cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, PoisonError};

    // Environment variables are process-wide; tests that load config take this
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.shuffle_strategy, ShuffleStrategy::Independent);
        assert_eq!(config.removal_policy, RemovalPolicy::Resync);
        assert_eq!(config.track_cache_capacity, 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = PlaybackConfig {
            track_cache_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PlaybackError::Config(_))));
    }

    #[test]
    fn load_reads_toml_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "shuffle_strategy = \"overlay\"\nremoval_policy = \"local_only\"\ntrack_cache_capacity = 8"
        )
        .unwrap();

        let config = PlaybackConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.shuffle_strategy, ShuffleStrategy::Overlay);
        assert_eq!(config.removal_policy, RemovalPolicy::LocalOnly);
        assert_eq!(config.track_cache_capacity, 8);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let config = PlaybackConfig::load(Some(Path::new("/nonexistent/groove.toml"))).unwrap();
        assert_eq!(config.track_cache_capacity, 512);
    }

    #[test]
    fn environment_overrides_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "shuffle_strategy = \"independent\"\ntrack_cache_capacity = 8").unwrap();

        std::env::set_var("GROOVE_SHUFFLE_STRATEGY", "overlay");
        std::env::set_var("GROOVE_TRACK_CACHE_CAPACITY", "64");
        let loaded = PlaybackConfig::load(Some(file.path()));
        std::env::remove_var("GROOVE_SHUFFLE_STRATEGY");
        std::env::remove_var("GROOVE_TRACK_CACHE_CAPACITY");

        let config = loaded.unwrap();
        assert_eq!(config.shuffle_strategy, ShuffleStrategy::Overlay);
        assert_eq!(config.track_cache_capacity, 64);
        assert_eq!(config.removal_policy, RemovalPolicy::Resync);
    }

    #[test]
    fn environment_zero_capacity_is_rejected() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        std::env::set_var("GROOVE_TRACK_CACHE_CAPACITY", "0");
        let loaded = PlaybackConfig::load(None);
        std::env::remove_var("GROOVE_TRACK_CACHE_CAPACITY");

        assert!(matches!(loaded, Err(PlaybackError::Config(_))));
    }
}
