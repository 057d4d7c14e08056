//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed logical tick only
//! - Seeded RNG only
//! - Stable iteration order (insertion order per entity kind)
//! - No rendering or platform dependencies

pub mod collision;
pub mod powerup;
pub mod progression;
pub mod session;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{CollisionOutcome, CollisionResolver};
pub use powerup::PowerupEffectEngine;
pub use progression::Progression;
pub use session::{Session, SessionPhase};
pub use snapshot::Snapshot;
pub use spawn::{Difficulty, SpawnDirector, SpawnEvent, kind_weights, spawn_interval};
pub use state::{
    Actor, Buffs, GameEvent, Hostile, HostileKind, Owner, Powerup, PowerupKind, Projectile,
};
pub use tick::{Intent, TickInput};
pub use world::{Entity, EntityId, EntityKind, EntityRef, EntityWorld, Pool};
