//! Score, lives and level tracking

use serde::{Deserialize, Serialize};

use super::spawn::Difficulty;
use crate::persistence::HighScoreStore;
use crate::tuning::Tuning;

/// Progression for one session plus the persisted best score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Never decreases within a session
    pub score: u64,
    /// Starts at 1, never decreases within a session
    pub level: u32,
    /// Clamped at 0; reaching 0 ends the session
    pub lives: u32,
    /// Best score seen on this device
    pub high_score: u64,
    /// Spawn interval parameter, shrinks on level-up
    pub base_spawn_interval: u32,
    /// Set once the current session beat the stored record
    pub record_broken: bool,
}

impl Progression {
    pub fn new(tuning: &Tuning, high_score: u64) -> Self {
        Self {
            score: 0,
            level: 1,
            lives: tuning.initial_lives,
            high_score,
            base_spawn_interval: tuning.base_spawn_interval,
            record_broken: false,
        }
    }

    /// Fresh session values; the high score carries over
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning, self.high_score);
    }

    /// Apply one tick's collision results. Returns true when lives hit zero.
    pub fn apply_delta(&mut self, score_delta: u32, lives_delta: i32) -> bool {
        self.score += score_delta as u64;
        if lives_delta != 0 {
            let lives = (self.lives as i64 + lives_delta as i64).max(0);
            self.lives = lives as u32;
        }
        self.is_depleted()
    }

    pub fn is_depleted(&self) -> bool {
        self.lives == 0
    }

    /// Raise the level once per threshold crossed. Returns true if it rose.
    pub fn check_level_up(&mut self, tuning: &Tuning) -> bool {
        let mut leveled = false;
        while self.score >= self.level as u64 * tuning.points_per_level {
            self.level += 1;
            self.base_spawn_interval = self
                .base_spawn_interval
                .saturating_sub(tuning.base_interval_step)
                .max(tuning.min_base_spawn_interval);
            leveled = true;
            log::info!(
                "Level up: {} (spawn base interval {})",
                self.level,
                self.base_spawn_interval
            );
        }
        leveled
    }

    /// Persist the score if it beat the stored best. Returns true when written.
    pub fn record_high_score(&mut self, store: &mut dyn HighScoreStore) -> bool {
        if self.score <= self.high_score {
            return false;
        }
        self.high_score = self.score;
        self.record_broken = true;
        store.set_high_score(self.high_score);
        true
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty {
            level: self.level,
            base_interval: self.base_spawn_interval,
        }
    }
}
