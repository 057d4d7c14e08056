//! Session state machine and the per-tick pipeline
//!
//! START waits for confirm, PLAYING runs every system, GAME_OVER keeps the
//! world moving with the actor switched off until a cooldown passes and any
//! intent arrives. Every fresh game bumps the generation token so late
//! leaderboard replies from an older game can be recognised and dropped.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionResolver;
use super::powerup::PowerupEffectEngine;
use super::progression::Progression;
use super::snapshot::Snapshot;
use super::spawn::{SpawnDirector, SpawnEvent};
use super::state::{GameEvent, Hostile, HostileKind};
use super::tick::TickInput;
use super::world::{Entity, EntityWorld};
use crate::persistence::HighScoreStore;
use crate::tuning::Tuning;

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title screen, waiting for confirm
    Start,
    /// Active gameplay
    Playing,
    /// Run ended; world still animates
    GameOver,
}

/// One player's game: world, systems and progression behind a single handle
pub struct Session {
    phase: SessionPhase,
    tuning: Tuning,
    world: EntityWorld,
    director: SpawnDirector,
    progression: Progression,
    effects: PowerupEffectEngine,
    store: Box<dyn HighScoreStore>,
    seed: u64,
    rng: Pcg32,
    /// Ticks since the current game started
    ticks: u64,
    game_over_tick: Option<u64>,
    generation: u64,
    events: Vec<GameEvent>,
}

impl Session {
    /// Unusable tuning is replaced by the defaults
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn HighScoreStore>) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Rejected tuning ({}), using defaults", e);
                Tuning::default()
            }
        };
        let high_score = store.high_score();
        Self {
            phase: SessionPhase::Start,
            world: EntityWorld::new(&tuning),
            director: SpawnDirector::new(),
            progression: Progression::new(&tuning, high_score),
            effects: PowerupEffectEngine::new(&tuning),
            tuning,
            store,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ticks: 0,
            game_over_tick: None,
            generation: 0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn world(&self) -> &EntityWorld {
        &self.world
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Generation token of the current game
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Tick at which the current game ended, if it has
    pub fn game_over_tick(&self) -> Option<u64> {
        self.game_over_tick
    }

    /// Whether the game-over cooldown has elapsed
    pub fn can_leave_game_over(&self) -> bool {
        self.game_over_tick
            .is_some_and(|t| self.ticks - t >= self.tuning.game_over_cooldown_ticks())
    }

    /// Read-only copy for render collaborators
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Advance one logical tick and return what happened
    pub fn tick(&mut self, input: &TickInput) -> &[GameEvent] {
        self.events.clear();

        match self.phase {
            SessionPhase::Start => {
                if input.confirm {
                    self.reset();
                    self.phase = SessionPhase::Playing;
                    log::info!("Game {} started", self.generation);
                    self.events.push(GameEvent::SessionStarted {
                        generation: self.generation,
                    });
                }
            }

            SessionPhase::Playing => {
                self.step(input, true);
                if self.progression.is_depleted() {
                    self.phase = SessionPhase::GameOver;
                    self.game_over_tick = Some(self.ticks);
                    log::info!(
                        "Game over: score {} level {} (best {})",
                        self.progression.score,
                        self.progression.level,
                        self.progression.high_score
                    );
                    self.events.push(GameEvent::GameOver {
                        score: self.progression.score,
                    });
                }
            }

            SessionPhase::GameOver => {
                self.step(&TickInput::default(), false);
                if self.can_leave_game_over() && input.any() {
                    self.reset();
                    self.phase = SessionPhase::Start;
                    self.events.push(GameEvent::ReturnedToStart);
                }
            }
        }

        &self.events
    }

    /// Fresh world, timers and progression; new generation
    fn reset(&mut self) {
        self.generation += 1;
        self.world.clear(&self.tuning);
        self.director.reset();
        self.progression.reset(&self.tuning);
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.generation));
        self.ticks = 0;
        self.game_over_tick = None;
    }

    /// Entity updates → spawns → collisions → progression → buff expiry → flush
    fn step(&mut self, input: &TickInput, engaged: bool) {
        self.ticks += 1;
        let now = self.ticks;

        let thrust = engaged.then(|| input.thrust());
        self.world
            .update(thrust, engaged && input.fire, now, &self.tuning, &mut self.rng);

        let spawns = self.director.tick(
            self.progression.difficulty(),
            self.world.boss_active(),
            &self.tuning,
            &mut self.rng,
        );
        for spawn in spawns {
            self.apply_spawn(spawn);
        }

        let resolver = CollisionResolver::new(&self.tuning, &self.effects);
        let outcome = resolver.resolve(&mut self.world, engaged, now, &mut self.rng);
        for powerup in outcome.spawned_powerups {
            self.world.spawn(Entity::Powerup(powerup));
        }
        self.events.extend(outcome.events);

        // Actor-less ticks never score or cost lives
        if engaged {
            self.progression
                .apply_delta(outcome.score_delta, outcome.lives_delta);
            if self.progression.check_level_up(&self.tuning) {
                self.events.push(GameEvent::LevelUp {
                    level: self.progression.level,
                });
            }
            let first_record = !self.progression.record_broken;
            if self.progression.record_high_score(self.store.as_mut()) && first_record {
                log::info!("New high score!");
                self.events.push(GameEvent::NewHighScore {
                    score: self.progression.score,
                });
            }
        }

        let expired = self.effects.tick(&mut self.world.actor, now);
        self.events.extend(expired);

        self.world.flush_removals();
    }

    fn apply_spawn(&mut self, spawn: SpawnEvent) {
        let (kind, pos) = match spawn {
            SpawnEvent::Hostile { kind, pos } => (kind, pos),
            SpawnEvent::Boss { pos } => {
                self.events.push(GameEvent::BossIncoming);
                (HostileKind::Boss, pos)
            }
        };
        let hostile = Hostile::new(kind, pos, &self.tuning, &mut self.rng);
        self.world.spawn(Entity::Hostile(hostile));
        self.events.push(GameEvent::HostileSpawned { kind });
    }
}
