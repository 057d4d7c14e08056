//! Local high-score persistence
//!
//! The simulation only needs get/set of a single integer. Backends:
//! - `MemoryStore`: in-process, for tests and headless runs
//! - `FileStore`: JSON file on native targets
//! - `LocalStorageStore`: browser LocalStorage on wasm32
//!
//! Write failures are logged and never interrupt the game.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Key-value access to the device's best score
pub trait HighScoreStore {
    fn high_score(&self) -> u64;
    fn set_high_score(&mut self, score: u64);
}

/// Versioned on-disk record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Record {
    version: u32,
    high_score: u64,
}

impl Record {
    const VERSION: u32 = 1;

    fn new(high_score: u64) -> Self {
        Self {
            version: Self::VERSION,
            high_score,
        }
    }
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u64,
    writes: usize,
}

impl MemoryStore {
    pub fn new(high_score: u64) -> Self {
        Self { high_score, writes: 0 }
    }

    /// Number of `set_high_score` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn high_score(&self) -> u64 {
        self.high_score
    }

    fn set_high_score(&mut self, score: u64) {
        self.high_score = score;
        self.writes += 1;
    }
}

/// JSON file store (native)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
    cached: u64,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Open the store, reading any existing record. A missing or unreadable
    /// file starts from zero.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let cached = match Self::read(&path) {
            Ok(score) => score,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("Ignoring high score file {}: {}", path.display(), e);
                0
            }
        };
        Self { path, cached }
    }

    fn read(path: &std::path::Path) -> Result<u64, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let record: Record = serde_json::from_str(&json)?;
        Ok(record.high_score)
    }

    fn write(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&Record::new(self.cached))?;
        // tmp → record
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn high_score(&self) -> u64 {
        self.cached
    }

    fn set_high_score(&mut self, score: u64) {
        self.cached = score;
        match self.write() {
            Ok(()) => log::info!("High score {} saved to {}", score, self.path.display()),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}

/// Browser LocalStorage store (wasm32)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore {
    cached: u64,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "space_defender_high_score";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }

    pub fn load() -> Self {
        let cached = Self::storage()
            .ok()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|json| serde_json::from_str::<Record>(&json).ok())
            .map(|r| r.high_score)
            .unwrap_or(0);
        log::info!("Loaded high score {}", cached);
        Self { cached }
    }

    fn write(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&Record::new(self.cached))?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn high_score(&self) -> u64 {
        self.cached
    }

    fn set_high_score(&mut self, score: u64) {
        self.cached = score;
        if let Err(e) = self.write() {
            log::warn!("Failed to save high score: {}", e);
        }
    }
}
