//! Collision detection and response
//!
//! Everything is a circle. Pairs are resolved in a fixed order each tick:
//! 1. actor vs hostiles
//! 2. actor shots vs hostiles
//! 3. hostile shots vs actor
//! 4. actor vs powerups
//!
//! Consumed entities are flagged dead immediately, so an entity resolves at
//! most one event per tick and later steps never see it. Ties go to the
//! earlier-inserted entity.

use glam::Vec2;
use rand::Rng;

use super::powerup::PowerupEffectEngine;
use super::state::{GameEvent, HostileKind, Owner, Powerup, PowerupKind};
use super::world::{EntityId, EntityKind, EntityWorld};
use crate::circles_overlap;
use crate::consts::{BOSS_LOOT_COUNT, BOSS_LOOT_SCATTER};
use crate::tuning::Tuning;

/// Lives lost to a regular hostile body or any hostile shot
pub const CONTACT_DAMAGE: u32 = 1;
/// Lives lost when ramming the boss
pub const BOSS_CONTACT_DAMAGE: u32 = 2;

/// Result of resolving one tick
#[derive(Debug, Clone, Default)]
pub struct CollisionOutcome {
    pub score_delta: u32,
    /// Zero or negative
    pub lives_delta: i32,
    /// Powerups to insert once resolution is done
    pub spawned_powerups: Vec<Powerup>,
    pub destroyed: Vec<(EntityKind, EntityId)>,
    pub events: Vec<GameEvent>,
}

impl CollisionOutcome {
    fn hurt_actor(&mut self, lives: u32) {
        self.lives_delta -= lives as i32;
        self.events.push(GameEvent::ActorHit { lives_lost: lives });
    }
}

/// Resolves all overlaps for one tick
pub struct CollisionResolver<'a> {
    pub tuning: &'a Tuning,
    pub effects: &'a PowerupEffectEngine,
}

impl<'a> CollisionResolver<'a> {
    pub fn new(tuning: &'a Tuning, effects: &'a PowerupEffectEngine) -> Self {
        Self { tuning, effects }
    }

    /// Resolve every overlapping pair in the world.
    ///
    /// With `actor_engaged` false (game over) the actor neither takes damage
    /// nor collects powerups; shots already in flight still hit hostiles.
    pub fn resolve(
        &self,
        world: &mut EntityWorld,
        actor_engaged: bool,
        now: u64,
        rng: &mut impl Rng,
    ) -> CollisionOutcome {
        let mut outcome = CollisionOutcome::default();

        if actor_engaged {
            self.actor_vs_hostiles(world, &mut outcome);
        }
        self.shots_vs_hostiles(world, &mut outcome, rng);
        if actor_engaged {
            self.shots_vs_actor(world, &mut outcome);
            self.actor_vs_powerups(world, &mut outcome, now);
        }

        outcome
    }

    fn actor_vs_hostiles(&self, world: &mut EntityWorld, outcome: &mut CollisionOutcome) {
        let actor = &world.actor;
        for mut entry in world.hostiles.entries_mut() {
            let hostile = &*entry.value;
            if !circles_overlap(actor.pos, actor.radius, hostile.pos, hostile.radius) {
                continue;
            }

            outcome.events.push(GameEvent::Explosion {
                pos: hostile.pos,
                radius: hostile.radius,
            });
            if hostile.is_boss() {
                // Ramming the boss removes it without points; the shield does not help
                log::info!("Actor rammed the boss");
                outcome.hurt_actor(BOSS_CONTACT_DAMAGE);
            } else if actor.shield_active() {
                outcome.events.push(GameEvent::ShieldAbsorbed);
            } else {
                outcome.hurt_actor(CONTACT_DAMAGE);
            }

            outcome.destroyed.push((EntityKind::Hostile, entry.id));
            entry.kill();
        }
    }

    fn shots_vs_hostiles(
        &self,
        world: &mut EntityWorld,
        outcome: &mut CollisionOutcome,
        rng: &mut impl Rng,
    ) {
        for mut target in world.hostiles.entries_mut() {
            for mut shot in world.projectiles.entries_mut() {
                if shot.value.owner != Owner::Actor {
                    continue;
                }
                let hostile = &mut *target.value;
                if !circles_overlap(shot.value.pos, shot.value.radius, hostile.pos, hostile.radius) {
                    continue;
                }

                hostile.health -= shot.value.damage;
                outcome.destroyed.push((EntityKind::Projectile, shot.id));
                shot.kill();

                if hostile.health <= 0 {
                    let (kind, pos, radius) = (hostile.kind, hostile.pos, hostile.radius);
                    let points = kind.points();
                    outcome.score_delta += points;
                    outcome.events.push(GameEvent::Explosion { pos, radius });
                    outcome.events.push(GameEvent::HostileDestroyed { kind, points });
                    outcome.spawned_powerups.extend(self.loot(kind, pos, rng));
                    outcome.destroyed.push((EntityKind::Hostile, target.id));
                    target.kill();
                    break;
                }
            }
        }
    }

    fn shots_vs_actor(&self, world: &mut EntityWorld, outcome: &mut CollisionOutcome) {
        let actor = &world.actor;
        for mut shot in world.projectiles.entries_mut() {
            if shot.value.owner != Owner::Hostile
                || !circles_overlap(actor.pos, actor.radius, shot.value.pos, shot.value.radius)
            {
                continue;
            }

            outcome.destroyed.push((EntityKind::Projectile, shot.id));
            shot.kill();
            if actor.shield_active() {
                outcome.events.push(GameEvent::ShieldAbsorbed);
            } else {
                outcome.hurt_actor(CONTACT_DAMAGE);
            }
        }
    }

    fn actor_vs_powerups(&self, world: &mut EntityWorld, outcome: &mut CollisionOutcome, now: u64) {
        let actor = &mut world.actor;
        for mut pickup in world.powerups.entries_mut() {
            if !circles_overlap(actor.pos, actor.radius, pickup.value.pos, pickup.value.radius) {
                continue;
            }

            let kind = pickup.value.kind;
            self.effects.apply(actor, kind, now);
            outcome.events.push(GameEvent::PowerupCollected { kind });
            outcome.destroyed.push((EntityKind::Powerup, pickup.id));
            pickup.kill();
        }
    }

    /// Drops for a destroyed hostile
    fn loot(&self, kind: HostileKind, pos: Vec2, rng: &mut impl Rng) -> Vec<Powerup> {
        if kind == HostileKind::Boss {
            (0..BOSS_LOOT_COUNT)
                .map(|_| {
                    let scatter = Vec2::new(
                        rng.random_range(-BOSS_LOOT_SCATTER..BOSS_LOOT_SCATTER),
                        rng.random_range(-BOSS_LOOT_SCATTER..BOSS_LOOT_SCATTER),
                    );
                    Powerup::new(PowerupKind::random(rng), pos + scatter)
                })
                .collect()
        } else if rng.random_bool(self.tuning.powerup_drop_chance) {
            vec![Powerup::new(PowerupKind::random(rng), pos)]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Hostile, Projectile};
    use crate::sim::world::Entity;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Fixture {
        tuning: Tuning,
        effects: PowerupEffectEngine,
        world: EntityWorld,
        rng: Pcg32,
    }

    impl Fixture {
        fn new() -> Self {
            let tuning = Tuning::default();
            Self {
                effects: PowerupEffectEngine::new(&tuning),
                world: EntityWorld::new(&tuning),
                tuning,
                rng: Pcg32::seed_from_u64(42),
            }
        }

        fn hostile(&mut self, kind: HostileKind, pos: Vec2) -> EntityId {
            let hostile = Hostile::new(kind, pos, &self.tuning, &mut self.rng);
            self.world.spawn(Entity::Hostile(hostile))
        }

        fn actor_shot(&mut self, pos: Vec2) -> EntityId {
            self.world
                .spawn(Entity::Projectile(Projectile::from_actor(pos, Vec2::ZERO)))
        }

        fn resolve(&mut self, engaged: bool) -> CollisionOutcome {
            let resolver = CollisionResolver::new(&self.tuning, &self.effects);
            resolver.resolve(&mut self.world, engaged, 0, &mut self.rng)
        }
    }

    #[test]
    fn test_actor_contact_costs_one_life() {
        let mut fx = Fixture::new();
        let pos = fx.world.actor.pos;
        let id = fx.hostile(HostileKind::Light, pos);

        let outcome = fx.resolve(true);
        assert_eq!(outcome.lives_delta, -1);
        assert_eq!(outcome.score_delta, 0);
        assert!(outcome.destroyed.contains(&(EntityKind::Hostile, id)));
        assert!(!fx.world.hostiles.is_alive(id));
    }

    #[test]
    fn test_boss_contact_costs_two_even_with_shield() {
        let mut fx = Fixture::new();
        fx.effects.apply(&mut fx.world.actor, PowerupKind::Shield, 0);
        let pos = fx.world.actor.pos;
        fx.hostile(HostileKind::Boss, pos);

        let outcome = fx.resolve(true);
        assert_eq!(outcome.lives_delta, -2);
        assert!(!fx.world.boss_active());
    }

    #[test]
    fn test_shield_blocks_regular_contact() {
        let mut fx = Fixture::new();
        fx.effects.apply(&mut fx.world.actor, PowerupKind::Shield, 0);
        let pos = fx.world.actor.pos;
        let id = fx.hostile(HostileKind::Heavy, pos);

        let outcome = fx.resolve(true);
        assert_eq!(outcome.lives_delta, 0);
        assert!(outcome.events.contains(&GameEvent::ShieldAbsorbed));
        assert!(!fx.world.hostiles.is_alive(id));
    }

    #[test]
    fn test_shot_kills_light_and_scores() {
        let mut fx = Fixture::new();
        let target = Vec2::new(200.0, 200.0);
        let hostile = fx.hostile(HostileKind::Light, target);
        let shot = fx.actor_shot(target);

        let outcome = fx.resolve(true);
        assert_eq!(outcome.score_delta, 10);
        assert!(!fx.world.hostiles.is_alive(hostile));
        assert!(!fx.world.projectiles.is_alive(shot));
    }

    #[test]
    fn test_heavy_takes_three_hits() {
        let mut fx = Fixture::new();
        let target = Vec2::new(200.0, 200.0);
        let hostile = fx.hostile(HostileKind::Heavy, target);
        for _ in 0..2 {
            fx.actor_shot(target);
        }

        let outcome = fx.resolve(true);
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(fx.world.hostiles.get(hostile).map(|h| h.health), Some(1));
        assert_eq!(fx.world.projectiles.len(), 0);

        fx.actor_shot(target);
        let outcome = fx.resolve(true);
        assert_eq!(outcome.score_delta, 25);
    }

    #[test]
    fn test_one_shot_cannot_score_twice() {
        let mut fx = Fixture::new();
        let target = Vec2::new(300.0, 200.0);
        let first = fx.hostile(HostileKind::Light, target);
        let second = fx.hostile(HostileKind::Light, target);
        fx.actor_shot(target);

        let outcome = fx.resolve(true);
        assert_eq!(outcome.score_delta, 10);
        // Insertion order breaks the tie
        assert!(!fx.world.hostiles.is_alive(first));
        assert!(fx.world.hostiles.is_alive(second));
    }

    #[test]
    fn test_surplus_shots_survive_the_kill() {
        let mut fx = Fixture::new();
        let target = Vec2::new(300.0, 200.0);
        fx.hostile(HostileKind::Swift, target);
        fx.actor_shot(target);
        let spare = fx.actor_shot(target);

        fx.resolve(true);
        assert!(fx.world.projectiles.is_alive(spare));
    }

    #[test]
    fn test_boss_always_drops_three() {
        let mut fx = Fixture::new();
        let target = Vec2::new(400.0, 150.0);
        fx.hostile(HostileKind::Boss, target);
        for _ in 0..fx.tuning.boss_health {
            fx.actor_shot(target);
        }

        let outcome = fx.resolve(true);
        assert_eq!(outcome.score_delta, 100);
        assert_eq!(outcome.spawned_powerups.len(), 3);
        for powerup in &outcome.spawned_powerups {
            let offset = powerup.pos - target;
            assert!(offset.x.abs() <= BOSS_LOOT_SCATTER && offset.y.abs() <= BOSS_LOOT_SCATTER);
        }
        assert!(!fx.world.boss_active());
    }

    #[test]
    fn test_light_drop_rate_near_twenty_percent() {
        let mut fx = Fixture::new();
        let target = Vec2::new(300.0, 200.0);
        let trials = 4000;
        let mut drops = 0;
        for _ in 0..trials {
            fx.hostile(HostileKind::Light, target);
            fx.actor_shot(target);
            let outcome = fx.resolve(true);
            assert!(outcome.spawned_powerups.len() <= 1);
            drops += outcome.spawned_powerups.len();
            fx.world.flush_removals();
        }
        let rate = drops as f64 / trials as f64;
        assert!((0.17..0.23).contains(&rate), "drop rate {rate}");
    }

    #[test]
    fn test_hostile_shot_hits_actor_once() {
        let mut fx = Fixture::new();
        let pos = fx.world.actor.pos;
        let shot = fx
            .world
            .spawn(Entity::Projectile(Projectile::from_hostile(pos, Vec2::ZERO, 2)));

        let outcome = fx.resolve(true);
        assert_eq!(outcome.lives_delta, -1);
        assert!(!fx.world.projectiles.is_alive(shot));
    }

    #[test]
    fn test_hostile_shots_ignore_hostiles() {
        let mut fx = Fixture::new();
        let target = Vec2::new(300.0, 200.0);
        let hostile = fx.hostile(HostileKind::Light, target);
        fx.world
            .spawn(Entity::Projectile(Projectile::from_hostile(target, Vec2::ZERO, 1)));

        let outcome = fx.resolve(true);
        assert_eq!(outcome.score_delta, 0);
        assert!(fx.world.hostiles.is_alive(hostile));
    }

    #[test]
    fn test_powerup_pickup_applies_effect() {
        let mut fx = Fixture::new();
        let pos = fx.world.actor.pos;
        fx.world
            .spawn(Entity::Powerup(Powerup::new(PowerupKind::WeaponUp, pos)));

        let outcome = fx.resolve(true);
        assert!(outcome.events.contains(&GameEvent::PowerupCollected { kind: PowerupKind::WeaponUp }));
        assert_eq!(fx.world.actor.weapon_tier, 2);
        assert!(fx.world.powerups.is_empty());
    }

    #[test]
    fn test_disengaged_actor_is_untouchable() {
        let mut fx = Fixture::new();
        let pos = fx.world.actor.pos;
        let hostile = fx.hostile(HostileKind::Light, pos);
        fx.world
            .spawn(Entity::Powerup(Powerup::new(PowerupKind::Shield, pos)));

        let outcome = fx.resolve(false);
        assert_eq!(outcome.lives_delta, 0);
        assert!(fx.world.hostiles.is_alive(hostile));
        assert_eq!(fx.world.powerups.len(), 1);
    }
}
