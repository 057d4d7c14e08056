//! Entity storage with deferred removal
//!
//! Each entity kind lives in its own [`Pool`]: a vector of slots kept in
//! insertion order, each carrying a dead flag. Systems flag entities during
//! the tick and [`EntityWorld::flush_removals`] compacts every pool once at
//! the end, so no system ever sees a half-removed collection.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::state::{Actor, Hostile, HostileKind, Powerup, Projectile};
use crate::tuning::Tuning;

/// Stable entity identifier, unique across kinds within a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityId(pub u32);

/// Entity collections owned by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Hostile,
    Projectile,
    Powerup,
}

/// Anything that can be inserted into the world
#[derive(Debug, Clone)]
pub enum Entity {
    Hostile(Hostile),
    Projectile(Projectile),
    Powerup(Powerup),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Hostile(_) => EntityKind::Hostile,
            Entity::Projectile(_) => EntityKind::Projectile,
            Entity::Powerup(_) => EntityKind::Powerup,
        }
    }
}

/// Read-only view handed to `for_each_alive` callbacks
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Hostile(&'a Hostile),
    Projectile(&'a Projectile),
    Powerup(&'a Powerup),
}

#[derive(Debug, Clone)]
struct Slot<T> {
    id: EntityId,
    alive: bool,
    value: T,
}

/// Mutable handle to a live slot; `kill` flags it for the end-of-tick flush
pub struct Entry<'a, T> {
    pub id: EntityId,
    alive: &'a mut bool,
    pub value: &'a mut T,
}

impl<T> Entry<'_, T> {
    pub fn kill(&mut self) {
        *self.alive = false;
    }

    pub fn is_alive(&self) -> bool {
        *self.alive
    }
}

/// Insertion-ordered arena with dead flags
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Pool<T> {
    fn push(&mut self, id: EntityId, value: T) {
        debug_assert!(self.slots.last().is_none_or(|s| s.id < id));
        self.slots.push(Slot { id, alive: true, value });
    }

    // Ids are allocated monotonically, so slots are sorted by id
    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |s| s.id).ok()
    }

    /// Live entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots.iter().filter(|s| s.alive).map(|s| (s.id, &s.value))
    }

    /// Live entries in insertion order; entries killed mid-loop are skipped by later loops
    pub fn entries_mut(&mut self) -> impl Iterator<Item = Entry<'_, T>> {
        self.slots.iter_mut().filter(|s| s.alive).map(|s| Entry {
            id: s.id,
            alive: &mut s.alive,
            value: &mut s.value,
        })
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.index_of(id)
            .map(|i| &self.slots[i])
            .filter(|s| s.alive)
            .map(|s| &s.value)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Flag an entity dead; returns false if it was unknown or already dead
    pub fn mark(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(i) if self.slots[i].alive => {
                self.slots[i].alive = false;
                true
            }
            _ => false,
        }
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physically drop dead slots; returns how many were removed
    fn flush(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|s| s.alive);
        before - self.slots.len()
    }

    fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Owns the actor and every entity collection
#[derive(Debug, Clone)]
pub struct EntityWorld {
    pub actor: Actor,
    pub hostiles: Pool<Hostile>,
    pub projectiles: Pool<Projectile>,
    pub powerups: Pool<Powerup>,
    next_id: u32,
}

impl EntityWorld {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            actor: Actor::new(tuning),
            hostiles: Pool::default(),
            projectiles: Pool::default(),
            powerups: Pool::default(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert an entity; it is visible to every system that runs after this call
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.allocate_id();
        match entity {
            Entity::Hostile(hostile) => {
                debug_assert!(
                    !(hostile.is_boss() && self.boss_active()),
                    "second boss spawned while one is alive"
                );
                self.hostiles.push(id, hostile);
            }
            Entity::Projectile(projectile) => self.projectiles.push(id, projectile),
            Entity::Powerup(powerup) => self.powerups.push(id, powerup),
        }
        id
    }

    /// Visit live entities of one kind in insertion order
    pub fn for_each_alive(&self, kind: EntityKind, mut f: impl FnMut(EntityId, EntityRef<'_>)) {
        match kind {
            EntityKind::Hostile => self.hostiles.iter().for_each(|(id, h)| f(id, EntityRef::Hostile(h))),
            EntityKind::Projectile => self
                .projectiles
                .iter()
                .for_each(|(id, p)| f(id, EntityRef::Projectile(p))),
            EntityKind::Powerup => self.powerups.iter().for_each(|(id, p)| f(id, EntityRef::Powerup(p))),
        }
    }

    /// Flag an entity for removal at the end of the tick
    pub fn mark_for_removal(&mut self, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Hostile => self.hostiles.mark(id),
            EntityKind::Projectile => self.projectiles.mark(id),
            EntityKind::Powerup => self.powerups.mark(id),
        }
    }

    /// Compact every pool; call once per tick after all systems ran
    pub fn flush_removals(&mut self) -> usize {
        self.hostiles.flush() + self.projectiles.flush() + self.powerups.flush()
    }

    /// A live (not yet flagged) boss exists
    pub fn boss_active(&self) -> bool {
        self.hostiles.iter().any(|(_, h)| h.is_boss())
    }

    pub fn boss_count(&self) -> usize {
        self.hostiles.iter().filter(|(_, h)| h.is_boss()).count()
    }

    /// Empty every collection and put a fresh actor in place
    pub fn clear(&mut self, tuning: &Tuning) {
        self.actor = Actor::new(tuning);
        self.hostiles.clear();
        self.projectiles.clear();
        self.powerups.clear();
    }

    /// Advance every entity by one tick.
    ///
    /// `thrust` and `fire` are the actor's intents (`None`/false when input is
    /// ignored). Hostiles roll their own fire chance. New shots are inserted
    /// after the movement pass; expired or off-bounds entities are flagged.
    pub fn update(
        &mut self,
        thrust: Option<Vec2>,
        fire: bool,
        tick: u64,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) {
        let mut new_shots: Vec<Projectile> = Vec::new();

        let actor = &mut self.actor;
        actor.steer(thrust.unwrap_or(Vec2::ZERO));
        actor.fire_cooldown = actor.fire_cooldown.saturating_sub(1);
        if fire && actor.fire_cooldown == 0 {
            new_shots.extend(actor.volley());
            actor.fire_cooldown = actor.fire_interval;
        }

        for mut entry in self.hostiles.entries_mut() {
            let hostile = &mut *entry.value;
            hostile.advance(rng);
            if hostile.is_off_bounds() {
                log::debug!("{} hostile {:?} left the arena", hostile.kind.as_str(), entry.id);
                entry.kill();
                continue;
            }
            let chance = match hostile.kind {
                HostileKind::Boss => tuning.boss_fire_chance,
                HostileKind::Swift => 0.0,
                _ => tuning.hostile_fire_chance,
            };
            if chance > 0.0 && rng.random_bool(chance) {
                new_shots.extend(hostile.volley(tick));
            }
        }

        for mut entry in self.projectiles.entries_mut() {
            if !entry.value.advance() {
                entry.kill();
            }
        }

        for mut entry in self.powerups.entries_mut() {
            if !entry.value.advance() {
                entry.kill();
            }
        }

        for shot in new_shots {
            self.spawn(Entity::Projectile(shot));
        }
    }
}
