//! Hostile and boss spawn scheduling
//!
//! Two independent countdowns: the regular hostile timer, whose interval
//! shrinks with level, and the boss timer, which only runs while no boss is
//! alive. Higher levels also shift the kind table toward tougher hostiles.

use glam::Vec2;
use rand::Rng;

use super::state::HostileKind;
use crate::consts::*;
use crate::tuning::Tuning;

/// Difficulty parameters derived from progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty {
    pub level: u32,
    /// Base interval parameter (shrinks on level-up)
    pub base_interval: u32,
}

/// What the director wants inserted this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnEvent {
    Hostile { kind: HostileKind, pos: Vec2 },
    /// Boss arrival; UI shows the warning banner
    Boss { pos: Vec2 },
}

/// Effective ticks between regular spawns
pub fn spawn_interval(base_interval: u32, level: u32, tuning: &Tuning) -> u32 {
    base_interval
        .saturating_sub(level.saturating_mul(tuning.interval_per_level))
        .max(tuning.min_spawn_interval)
}

/// Probability masses for light, swift and heavy at `level`; always sums to 1
pub fn kind_weights(level: u32) -> [f64; 3] {
    let level = level as f64;
    let raw = [
        (0.6 - 0.05 * level).clamp(0.0, 1.0),
        (0.3 + 0.03 * level).clamp(0.0, 1.0),
        (0.1 + 0.02 * level).clamp(0.0, 1.0),
    ];
    let total: f64 = raw.iter().sum();
    raw.map(|w| w / total)
}

/// Pick a regular kind from the cumulative table with a roll in [0, 1)
pub fn pick_kind(level: u32, roll: f64) -> HostileKind {
    let weights = kind_weights(level);
    let mut cumulative = 0.0;
    for (kind, weight) in HostileKind::REGULAR.iter().zip(weights) {
        cumulative += weight;
        if roll < cumulative {
            return *kind;
        }
    }
    HostileKind::Heavy
}

/// Owns the spawn timers
#[derive(Debug, Clone, Default)]
pub struct SpawnDirector {
    hostile_timer: u32,
    boss_timer: u32,
}

impl SpawnDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn hostile_timer(&self) -> u32 {
        self.hostile_timer
    }

    pub fn boss_timer(&self) -> u32 {
        self.boss_timer
    }

    /// Advance both timers one tick and report anything due
    pub fn tick(
        &mut self,
        difficulty: Difficulty,
        boss_active: bool,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Vec<SpawnEvent> {
        let mut events = Vec::new();
        let mut boss_alive = boss_active;

        if !boss_alive {
            self.boss_timer += 1;
            if self.boss_timer >= tuning.boss_spawn_ticks {
                self.boss_timer = 0;
                boss_alive = true;
                log::info!("Boss incoming at level {}", difficulty.level);
                events.push(SpawnEvent::Boss {
                    pos: Vec2::new(ARENA_WIDTH / 2.0, BOSS_ENTRY_Y),
                });
            }
        }

        self.hostile_timer += 1;
        if self.hostile_timer >= spawn_interval(difficulty.base_interval, difficulty.level, tuning) {
            // Resets even when suppressed so the boss leaving doesn't cause a burst
            self.hostile_timer = 0;
            if !boss_alive {
                let kind = pick_kind(difficulty.level, rng.random::<f64>());
                let pos = Vec2::new(rng.random_range(0.0..ARENA_WIDTH), HOSTILE_ENTRY_Y);
                log::debug!("Spawning {} hostile at x={:.0}", kind.as_str(), pos.x);
                events.push(SpawnEvent::Hostile { kind, pos });
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn level_one() -> Difficulty {
        Difficulty {
            level: 1,
            base_interval: 60,
        }
    }

    #[test]
    fn test_spawn_interval_examples() {
        let tuning = Tuning::default();
        assert_eq!(spawn_interval(60, 1, &tuning), 55);
        assert_eq!(spawn_interval(60, 5, &tuning), 35);
        assert_eq!(spawn_interval(20, 40, &tuning), 10);
    }

    #[test]
    fn test_level_one_table() {
        let [light, swift, heavy] = kind_weights(1);
        assert!((light - 0.55).abs() < 1e-9);
        assert!((swift - 0.33).abs() < 1e-9);
        assert!((heavy - 0.12).abs() < 1e-9);
        assert_eq!(pick_kind(1, 0.0), HostileKind::Light);
        assert_eq!(pick_kind(1, 0.6), HostileKind::Swift);
        assert_eq!(pick_kind(1, 0.95), HostileKind::Heavy);
    }

    #[test]
    fn test_high_levels_drop_light_kind() {
        let [light, _, heavy] = kind_weights(15);
        assert_eq!(light, 0.0);
        assert!(heavy > kind_weights(1)[2]);
    }

    #[test]
    fn test_regular_spawn_cadence() {
        let tuning = Tuning::default();
        let mut director = SpawnDirector::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let spawned: usize = (0..110)
            .map(|_| director.tick(level_one(), false, &tuning, &mut rng).len())
            .sum();
        // Interval 55 at level 1
        assert_eq!(spawned, 2);
    }

    #[test]
    fn test_regular_spawns_suppressed_during_boss() {
        let tuning = Tuning::default();
        let mut director = SpawnDirector::new();
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..500 {
            assert!(director.tick(level_one(), true, &tuning, &mut rng).is_empty());
        }
        // Boss timer is frozen while the boss lives
        assert_eq!(director.boss_timer(), 0);
    }

    #[test]
    fn test_boss_wins_same_tick_tie() {
        let tuning = Tuning {
            boss_spawn_ticks: 55,
            ..Tuning::default()
        };
        let mut director = SpawnDirector::new();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..54 {
            assert!(director.tick(level_one(), false, &tuning, &mut rng).is_empty());
        }
        let events = director.tick(level_one(), false, &tuning, &mut rng);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SpawnEvent::Boss { .. }));
        // Hostile timer reset as though it fired
        assert_eq!(director.hostile_timer(), 0);
    }

    #[test]
    fn test_boss_spawns_once_per_threshold() {
        let tuning = Tuning::default();
        let mut director = SpawnDirector::new();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut boss_alive = false;
        let mut bosses = 0;
        for _ in 0..5000 {
            for event in director.tick(level_one(), boss_alive, &tuning, &mut rng) {
                if let SpawnEvent::Boss { .. } = event {
                    assert!(!boss_alive);
                    boss_alive = true;
                    bosses += 1;
                }
            }
        }
        assert_eq!(bosses, 1);
    }

    proptest! {
        #[test]
        fn prop_weights_sum_to_one(level in 1u32..500) {
            let weights = kind_weights(level);
            prop_assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            prop_assert!(weights.iter().all(|w| (0.0..=1.0).contains(w)));
        }

        #[test]
        fn prop_interval_floored_and_monotonic(base in 20u32..200, level in 1u32..100) {
            let tuning = Tuning::default();
            let here = spawn_interval(base, level, &tuning);
            prop_assert!(here >= tuning.min_spawn_interval);
            prop_assert!(spawn_interval(base, level + 1, &tuning) <= here);
        }
    }
}
