//! Data-driven game balance
//!
//! Every number a designer might want to tweak lives here. Values are in
//! logical ticks (60 per second) unless the field name says otherwise.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TuningError};
use crate::seconds_to_ticks;

/// Balance parameters for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lives at the start of a session
    pub initial_lives: u32,
    /// Starting value of the hostile spawn interval parameter
    pub base_spawn_interval: u32,
    /// The parameter never drops below this through level-ups
    pub min_base_spawn_interval: u32,
    /// Reduction of the parameter per level-up
    pub base_interval_step: u32,
    /// Effective interval never drops below this
    pub min_spawn_interval: u32,
    /// Effective interval shrinks this much per level
    pub interval_per_level: u32,
    /// Score needed per level (level N ends at N * points_per_level)
    pub points_per_level: u64,

    /// Boss timer threshold
    pub boss_spawn_ticks: u32,
    pub boss_health: i32,
    pub boss_radius: f32,
    pub boss_speed: f32,

    /// Chance a regular hostile drops a powerup
    pub powerup_drop_chance: f64,
    /// Duration of every timed buff
    pub buff_duration_secs: f32,

    /// Minimum time on the game-over screen before input returns to start
    pub game_over_cooldown_secs: f32,

    /// Actor thrust per tick, normal and boosted
    pub actor_speed: f32,
    pub boosted_actor_speed: f32,
    /// Ticks between shots, normal and boosted
    pub fire_cooldown: u32,
    pub boosted_fire_cooldown: u32,

    /// Per-tick firing chance
    pub boss_fire_chance: f64,
    pub hostile_fire_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            base_spawn_interval: 60,
            min_base_spawn_interval: 20,
            base_interval_step: 5,
            min_spawn_interval: 10,
            interval_per_level: 5,
            points_per_level: 100,

            boss_spawn_ticks: 1200,
            boss_health: 20,
            boss_radius: 40.0,
            boss_speed: 0.5,

            powerup_drop_chance: 0.2,
            buff_duration_secs: 5.0,

            game_over_cooldown_secs: 2.0,

            actor_speed: 5.0,
            boosted_actor_speed: 8.0,
            // 10 shots per second
            fire_cooldown: 6,
            // 15 shots per second
            boosted_fire_cooldown: 4,

            boss_fire_chance: 0.1,
            hostile_fire_chance: 0.005,
        }
    }
}

impl Tuning {
    /// Buff duration in ticks
    pub fn buff_ticks(&self) -> u64 {
        seconds_to_ticks(self.buff_duration_secs) as u64
    }

    /// Game-over cooldown in ticks
    pub fn game_over_cooldown_ticks(&self) -> u64 {
        seconds_to_ticks(self.game_over_cooldown_secs) as u64
    }

    /// Reject values that would stall or panic the tick loop
    pub fn validate(&self) -> Result<(), TuningError> {
        let probabilities = [
            ("powerup_drop_chance", self.powerup_drop_chance),
            ("boss_fire_chance", self.boss_fire_chance),
            ("hostile_fire_chance", self.hostile_fire_chance),
        ];
        for (field, value) in probabilities {
            // NaN fails the range check too
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::ProbabilityOutOfRange { field, value });
            }
        }
        if self.points_per_level == 0 {
            return Err(TuningError::ZeroPointsPerLevel);
        }
        Ok(())
    }

    /// Parse and validate tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_arcade_timings() {
        let tuning = Tuning::default();
        assert_eq!(tuning.buff_ticks(), 300);
        assert_eq!(tuning.game_over_cooldown_ticks(), 120);
        assert_eq!(tuning.base_spawn_interval, 60);
    }

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "initial_lives": 5 }"#).unwrap();
        assert_eq!(tuning.initial_lives, 5);
        assert_eq!(tuning.boss_spawn_ticks, 1200);
    }

    #[test]
    fn test_probabilities_must_be_in_unit_range() {
        for value in [1.5, -0.1, f64::NAN] {
            let tuning = Tuning {
                hostile_fire_chance: value,
                ..Tuning::default()
            };
            assert!(matches!(
                tuning.validate(),
                Err(TuningError::ProbabilityOutOfRange { field: "hostile_fire_chance", .. })
            ));
        }
        let err = Tuning::from_json(r#"{ "powerup_drop_chance": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Tuning(_)));
        assert!(Tuning::from_json(r#"{ "boss_fire_chance": 1.0 }"#).is_ok());
    }

    #[test]
    fn test_zero_points_per_level_rejected() {
        let err = Tuning::from_json(r#"{ "points_per_level": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Tuning(TuningError::ZeroPointsPerLevel)));
        assert_eq!(Tuning::default().validate(), Ok(()));
    }
}
