//! Read-only frame snapshot for render collaborators

use glam::Vec2;
use serde::Serialize;

use super::session::{Session, SessionPhase};
use super::state::{HostileKind, Owner, PowerupKind};
use super::world::EntityId;

#[derive(Debug, Clone, Serialize)]
pub struct ActorView {
    pub pos: Vec2,
    pub radius: f32,
    pub weapon_tier: u8,
    pub shield: bool,
    pub speed_boost: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostileView {
    pub id: EntityId,
    pub kind: HostileKind,
    pub pos: Vec2,
    pub radius: f32,
    pub health: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub owner: Owner,
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerupView {
    pub id: EntityId,
    pub kind: PowerupKind,
    pub pos: Vec2,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub generation: u64,
    pub tick: u64,
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub high_score: u64,
    /// Game-over screen may show "press any key"
    pub can_continue: bool,
    pub actor: ActorView,
    pub hostiles: Vec<HostileView>,
    pub projectiles: Vec<ProjectileView>,
    pub powerups: Vec<PowerupView>,
}

impl Snapshot {
    pub fn capture(session: &Session) -> Self {
        let world = session.world();
        let progression = session.progression();
        let actor = &world.actor;

        Self {
            phase: session.phase(),
            generation: session.generation(),
            tick: session.ticks(),
            score: progression.score,
            level: progression.level,
            lives: progression.lives,
            high_score: progression.high_score,
            can_continue: session.can_leave_game_over(),
            actor: ActorView {
                pos: actor.pos,
                radius: actor.radius,
                weapon_tier: actor.weapon_tier,
                shield: actor.shield_active(),
                speed_boost: actor.buffs.speed_expiry.is_some(),
            },
            hostiles: world
                .hostiles
                .iter()
                .map(|(id, h)| HostileView {
                    id,
                    kind: h.kind,
                    pos: h.pos,
                    radius: h.radius,
                    health: h.health,
                })
                .collect(),
            projectiles: world
                .projectiles
                .iter()
                .map(|(id, p)| ProjectileView {
                    id,
                    owner: p.owner,
                    pos: p.pos,
                    radius: p.radius,
                })
                .collect(),
            powerups: world
                .powerups
                .iter()
                .map(|(id, p)| PowerupView {
                    id,
                    kind: p.kind,
                    pos: p.pos,
                })
                .collect(),
        }
    }

    /// Boss still on screen (for the HUD health bar)
    pub fn boss(&self) -> Option<&HostileView> {
        self.hostiles.iter().find(|h| h.kind == HostileKind::Boss)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
