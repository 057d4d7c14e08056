//! Entity types and per-kind parameter tables
//!
//! Plain data plus the small movement rules each entity follows on its own.
//! Anything that touches more than one entity lives in the systems.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Timed buffs on the actor, stored as absolute expiry ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffs {
    pub weapon_expiry: Option<u64>,
    pub shield_expiry: Option<u64>,
    pub speed_expiry: Option<u64>,
}

/// The player-controlled ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Shot pattern, 1..=3
    pub weapon_tier: u8,
    pub buffs: Buffs,
    /// Thrust applied per held direction
    pub speed: f32,
    /// Ticks between shots
    pub fire_interval: u32,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
}

impl Actor {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(ARENA_WIDTH / 2.0, ACTOR_START_Y),
            vel: Vec2::ZERO,
            radius: ACTOR_RADIUS,
            weapon_tier: 1,
            buffs: Buffs::default(),
            speed: tuning.actor_speed,
            fire_interval: tuning.fire_cooldown,
            fire_cooldown: 0,
        }
    }

    pub fn shield_active(&self) -> bool {
        self.buffs.shield_expiry.is_some()
    }

    /// Apply thrust, friction and arena clamping for one tick
    pub fn steer(&mut self, thrust: Vec2) {
        self.vel += thrust * self.speed;
        self.vel *= ACTOR_FRICTION;
        self.pos += self.vel;

        self.pos.x = self.pos.x.clamp(self.radius, ARENA_WIDTH - self.radius);
        self.pos.y = self.pos.y.clamp(self.radius, ARENA_HEIGHT - self.radius);
    }

    /// Projectiles for one trigger pull at the current weapon tier
    pub fn volley(&self) -> Vec<Projectile> {
        let nose = self.pos - Vec2::new(0.0, self.radius);
        let wing_y = self.pos.y - self.radius * 2.0 / 3.0;
        let up = -ACTOR_SHOT_SPEED;
        match self.weapon_tier {
            1 => vec![Projectile::from_actor(nose, Vec2::new(0.0, up))],
            2 => vec![
                Projectile::from_actor(Vec2::new(self.pos.x - 10.0, wing_y), Vec2::new(0.0, up)),
                Projectile::from_actor(Vec2::new(self.pos.x + 10.0, wing_y), Vec2::new(0.0, up)),
            ],
            _ => vec![
                Projectile::from_actor(nose, Vec2::new(0.0, up)),
                Projectile::from_actor(Vec2::new(self.pos.x - 10.0, wing_y), Vec2::new(-1.0, up)),
                Projectile::from_actor(Vec2::new(self.pos.x + 10.0, wing_y), Vec2::new(1.0, up)),
            ],
        }
    }
}

/// Hostile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostileKind {
    Light,
    Swift,
    Heavy,
    Boss,
}

impl HostileKind {
    pub const REGULAR: [HostileKind; 3] = [HostileKind::Light, HostileKind::Swift, HostileKind::Heavy];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostileKind::Light => "light",
            HostileKind::Swift => "swift",
            HostileKind::Heavy => "heavy",
            HostileKind::Boss => "boss",
        }
    }

    /// Points awarded on destruction
    pub fn points(&self) -> u32 {
        match self {
            HostileKind::Light => 10,
            HostileKind::Swift => 15,
            HostileKind::Heavy => 25,
            HostileKind::Boss => 100,
        }
    }

    /// Base stats for the kind. Boss stats come from tuning.
    pub fn stats(&self, tuning: &Tuning) -> HostileStats {
        match self {
            HostileKind::Light => HostileStats { health: 1, radius: 15.0, speed: 1.5 },
            HostileKind::Swift => HostileStats { health: 1, radius: 12.5, speed: 3.0 },
            HostileKind::Heavy => HostileStats { health: 3, radius: 20.0, speed: 0.8 },
            HostileKind::Boss => HostileStats {
                health: tuning.boss_health,
                radius: tuning.boss_radius,
                speed: tuning.boss_speed,
            },
        }
    }

    /// Roll a fresh heading for this kind (not yet normalized)
    fn roll_heading(&self, rng: &mut impl Rng) -> Vec2 {
        match self {
            HostileKind::Light => Vec2::new(rng.random_range(-0.5..0.5), 1.0),
            HostileKind::Swift => Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(0.5..1.0)),
            HostileKind::Heavy => Vec2::new(rng.random_range(-0.2..0.2), rng.random_range(0.8..1.0)),
            HostileKind::Boss => Vec2::new(rng.random_range(-0.3..0.3), rng.random_range(0.2..0.4)),
        }
    }
}

/// Per-kind base stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostileStats {
    pub health: i32,
    pub radius: f32,
    pub speed: f32,
}

/// An adversary ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub kind: HostileKind,
    pub pos: Vec2,
    /// Unit heading
    pub heading: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub health: i32,
    /// Ticks since the last heading change
    pub steer_timer: u32,
    /// Ticks until the next heading change
    pub steer_interval: u32,
}

impl Hostile {
    pub fn new(kind: HostileKind, pos: Vec2, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let stats = kind.stats(tuning);
        Self {
            kind,
            pos,
            heading: Vec2::Y,
            speed: stats.speed,
            radius: stats.radius,
            health: stats.health,
            steer_timer: 0,
            steer_interval: rng.random_range(30..90),
        }
    }

    pub fn is_boss(&self) -> bool {
        self.kind == HostileKind::Boss
    }

    /// Advance one tick: occasional heading change, move, bounce off side walls
    pub fn advance(&mut self, rng: &mut impl Rng) {
        self.steer_timer += 1;
        if self.steer_timer >= self.steer_interval {
            self.heading = self.kind.roll_heading(rng).normalize_or(Vec2::Y);
            self.steer_timer = 0;
            self.steer_interval = rng.random_range(30..90);
        }

        self.pos += self.heading * self.speed;

        if self.pos.x < self.radius {
            self.pos.x = self.radius;
            self.heading.x = -self.heading.x;
        } else if self.pos.x > ARENA_WIDTH - self.radius {
            self.pos.x = ARENA_WIDTH - self.radius;
            self.heading.x = -self.heading.x;
        }
    }

    /// More than one diameter outside the arena
    pub fn is_off_bounds(&self) -> bool {
        let margin = self.radius * 2.0;
        self.pos.x < -margin
            || self.pos.x > ARENA_WIDTH + margin
            || self.pos.y < -margin
            || self.pos.y > ARENA_HEIGHT + margin
    }

    /// Shots fired when this hostile pulls the trigger at `tick`
    pub fn volley(&self, tick: u64) -> Vec<Projectile> {
        let muzzle = self.pos + Vec2::new(0.0, self.radius);
        match self.kind {
            HostileKind::Boss => {
                // Rotating six-way ring
                let spin = tick as f32 * 0.02;
                (0..6)
                    .map(|i| {
                        let angle = std::f32::consts::TAU / 6.0 * i as f32 + spin;
                        let vel = Vec2::new(angle.cos(), angle.sin()) * HOSTILE_SHOT_SPEED;
                        Projectile::from_hostile(self.pos, vel, 2)
                    })
                    .collect()
            }
            HostileKind::Heavy => (-1..=1)
                .map(|i| {
                    let offset = Vec2::new(i as f32 * 10.0, 0.0);
                    let vel = Vec2::new(i as f32 * 0.5, HOSTILE_SHOT_SPEED);
                    Projectile::from_hostile(muzzle + offset, vel, 1)
                })
                .collect(),
            HostileKind::Light => vec![Projectile::from_hostile(
                muzzle,
                Vec2::new(0.0, HOSTILE_SHOT_SPEED),
                1,
            )],
            HostileKind::Swift => Vec::new(),
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Actor,
    Hostile,
}

/// A shot in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: Owner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: i32,
    /// Ticks left before the shot fizzles
    pub lifetime: u32,
}

impl Projectile {
    pub fn from_actor(pos: Vec2, vel: Vec2) -> Self {
        Self {
            owner: Owner::Actor,
            pos,
            vel,
            radius: PROJECTILE_RADIUS,
            damage: 1,
            lifetime: PROJECTILE_LIFETIME,
        }
    }

    pub fn from_hostile(pos: Vec2, vel: Vec2, damage: i32) -> Self {
        Self {
            owner: Owner::Hostile,
            damage,
            ..Self::from_actor(pos, vel)
        }
    }

    /// Move one tick; returns false once the shot should be removed
    pub fn advance(&mut self) -> bool {
        self.pos += self.vel;
        self.lifetime = self.lifetime.saturating_sub(1);
        self.lifetime > 0 && in_arena(self.pos)
    }
}

/// Powerup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    WeaponUp,
    Shield,
    SpeedUp,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::WeaponUp, PowerupKind::Shield, PowerupKind::SpeedUp];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A drifting pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Powerup {
    pub fn new(kind: PowerupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::new(0.0, POWERUP_DRIFT),
            radius: POWERUP_RADIUS,
        }
    }

    /// Drift one tick; returns false once the pickup left the arena
    pub fn advance(&mut self) -> bool {
        self.pos += self.vel;
        in_arena(self.pos)
    }
}

fn in_arena(pos: Vec2) -> bool {
    (0.0..=ARENA_WIDTH).contains(&pos.x) && (0.0..=ARENA_HEIGHT).contains(&pos.y)
}

/// Things that happened during a tick, for UI/audio collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh game began (leaving START)
    SessionStarted { generation: u64 },
    HostileSpawned { kind: HostileKind },
    /// Show the boss warning banner
    BossIncoming,
    Explosion { pos: Vec2, radius: f32 },
    HostileDestroyed { kind: HostileKind, points: u32 },
    ActorHit { lives_lost: u32 },
    /// Contact absorbed by an active shield
    ShieldAbsorbed,
    PowerupCollected { kind: PowerupKind },
    BuffExpired { kind: PowerupKind },
    LevelUp { level: u32 },
    NewHighScore { score: u64 },
    GameOver { score: u64 },
    /// Back on the start screen
    ReturnedToStart,
}
