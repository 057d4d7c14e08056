//! Startup settings
//!
//! Loaded once before the first session. Native builds read a JSON file named
//! by `SPACE_DEFENDER_SETTINGS`; the browser build reads LocalStorage.
//! Anything missing or unreadable falls back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::leaderboard::MAX_BOARD_ENTRIES;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; `None` picks one from the clock at startup
    pub seed: Option<u64>,
    /// Game balance
    pub tuning: Tuning,
    /// High score file (native only)
    pub high_score_path: String,
    /// Rows requested from the leaderboard
    pub leaderboard_limit: usize,
    /// Ticks the headless runner simulates before submitting
    pub max_ticks: u64,
    /// Initials/email used by the headless runner's submission
    pub player_initials: String,
    pub player_email: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            tuning: Tuning::default(),
            high_score_path: "space_defender_high_score.json".to_string(),
            leaderboard_limit: MAX_BOARD_ENTRIES,
            // 10 minutes of play
            max_ticks: 36_000,
            player_initials: "CPU".to_string(),
            player_email: "demo@example.com".to_string(),
        }
    }
}

impl Settings {
    /// Environment variable naming the settings file (native)
    pub const PATH_ENV: &'static str = "SPACE_DEFENDER_SETTINGS";

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "space_defender_settings";

    /// Parse settings and validate the embedded tuning
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    /// Seed to use, falling back to `fallback` (usually the clock)
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Load settings from the file named by `SPACE_DEFENDER_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(Self::PATH_ENV) {
            Ok(path) => Self::load_from(&path),
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from `path`; unreadable or invalid files give defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read settings {}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Invalid stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}
