//! Timed actor buffs
//!
//! Every buff records an absolute expiry tick. Picking up the same kind again
//! restarts its timer instead of stacking duration.

use super::state::{Actor, GameEvent, PowerupKind};
use crate::consts::MAX_WEAPON_TIER;
use crate::tuning::Tuning;

/// Applies and expires buffs
#[derive(Debug, Clone)]
pub struct PowerupEffectEngine {
    duration: u64,
    base_speed: f32,
    boosted_speed: f32,
    base_fire_interval: u32,
    boosted_fire_interval: u32,
}

impl PowerupEffectEngine {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            duration: tuning.buff_ticks(),
            base_speed: tuning.actor_speed,
            boosted_speed: tuning.boosted_actor_speed,
            base_fire_interval: tuning.fire_cooldown,
            boosted_fire_interval: tuning.boosted_fire_cooldown,
        }
    }

    /// Grant a buff at tick `now`
    pub fn apply(&self, actor: &mut Actor, kind: PowerupKind, now: u64) {
        let expiry = Some(now + self.duration);
        match kind {
            PowerupKind::WeaponUp => {
                actor.weapon_tier = (actor.weapon_tier + 1).min(MAX_WEAPON_TIER);
                actor.buffs.weapon_expiry = expiry;
            }
            PowerupKind::Shield => {
                actor.buffs.shield_expiry = expiry;
            }
            PowerupKind::SpeedUp => {
                actor.speed = self.boosted_speed;
                actor.fire_interval = self.boosted_fire_interval;
                actor.fire_cooldown = actor.fire_cooldown.min(self.boosted_fire_interval);
                actor.buffs.speed_expiry = expiry;
            }
        }
        log::debug!("Applied {:?} until tick {}", kind, now + self.duration);
    }

    /// Expire buffs whose timers ran out; returns one event per expiry
    pub fn tick(&self, actor: &mut Actor, now: u64) -> Vec<GameEvent> {
        let mut expired = Vec::new();
        let due = |expiry: Option<u64>| expiry.is_some_and(|t| now >= t);

        if due(actor.buffs.weapon_expiry) {
            actor.buffs.weapon_expiry = None;
            actor.weapon_tier = 1;
            expired.push(GameEvent::BuffExpired { kind: PowerupKind::WeaponUp });
        }
        if due(actor.buffs.shield_expiry) {
            actor.buffs.shield_expiry = None;
            expired.push(GameEvent::BuffExpired { kind: PowerupKind::Shield });
        }
        if due(actor.buffs.speed_expiry) {
            actor.buffs.speed_expiry = None;
            actor.speed = self.base_speed;
            actor.fire_interval = self.base_fire_interval;
            expired.push(GameEvent::BuffExpired { kind: PowerupKind::SpeedUp });
        }

        expired
    }
}
