//! Space Defender - a fixed-tick arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, progression, session)
//! - `leaderboard`: Remote score board contract with offline/demo fallback
//! - `platform`: Input and render collaborator traits
//! - `persistence`: Local high-score storage
//! - `tuning`: Data-driven game balance
//! - `settings`: Startup configuration

pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, ServiceError, StoreError, TuningError, ValidationError};
pub use settings::Settings;
pub use sim::{Session, SessionPhase, TickInput};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical ticks per second (the simulation never scales by frame time)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Actor defaults
    pub const ACTOR_RADIUS: f32 = 15.0;
    pub const ACTOR_START_Y: f32 = ARENA_HEIGHT - 100.0;
    /// Velocity damping applied every tick
    pub const ACTOR_FRICTION: f32 = 0.9;
    pub const MAX_WEAPON_TIER: u8 = 3;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 3.0;
    pub const PROJECTILE_LIFETIME: u32 = 60;
    pub const ACTOR_SHOT_SPEED: f32 = 10.0;
    pub const HOSTILE_SHOT_SPEED: f32 = 5.0;

    /// Powerup pickup reach and drift
    pub const POWERUP_RADIUS: f32 = 15.0;
    pub const POWERUP_DRIFT: f32 = 1.0;
    /// Boss loot lands within this many units of the boss on each axis
    pub const BOSS_LOOT_SCATTER: f32 = 50.0;
    pub const BOSS_LOOT_COUNT: usize = 3;

    /// Spawn entry points
    pub const HOSTILE_ENTRY_Y: f32 = -20.0;
    pub const BOSS_ENTRY_Y: f32 = -50.0;
}

/// Convert whole seconds to logical ticks
#[inline]
pub fn seconds_to_ticks(seconds: f32) -> u32 {
    (seconds * consts::TICKS_PER_SECOND as f32).round() as u32
}

/// Two circles overlap when their centres are closer than the sum of their radii
#[inline]
pub fn circles_overlap(a: glam::Vec2, ra: f32, b: glam::Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_seconds_to_ticks() {
        assert_eq!(seconds_to_ticks(5.0), 300);
        assert_eq!(seconds_to_ticks(2.0), 120);
    }

    #[test]
    fn test_circles_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.9, 0.0), 5.0));
        // Touching exactly is not a hit
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }
}
