//! Platform collaborators
//!
//! The simulation only sees [`TickInput`] going in and [`Snapshot`] coming
//! out. This module defines those two seams plus the headless
//! implementations used by the native binary and tests:
//! - `ScriptedInput`: replays a fixed list of inputs
//! - `Autopilot`: idle/demo AI that plays from the last drawn snapshot
//! - `LogRenderer`: writes HUD changes to the log

use std::collections::VecDeque;

use crate::consts::ARENA_WIDTH;
use crate::sim::{Owner, SessionPhase, Snapshot, TickInput};

/// Produces the intents held during the next tick
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// Consumes one read-only frame per tick; must not block the loop
pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot);
}

/// Replays queued inputs, then idles
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<TickInput>,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            queue: inputs.into_iter().collect(),
        }
    }

    /// Hold `input` for `ticks` ticks
    pub fn hold(mut self, input: TickInput, ticks: usize) -> Self {
        self.queue.extend(std::iter::repeat_n(input, ticks));
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> TickInput {
        self.queue.pop_front().unwrap_or_default()
    }
}

/// Horizontal distance at which the autopilot stops correcting
const TRACK_DEADZONE: f32 = 6.0;
/// Hostile shots closer than this (vertically) trigger a dodge
const DODGE_RANGE: f32 = 120.0;

/// Demo AI. Sees the world only through snapshots passed to `draw`.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    last: Option<Snapshot>,
    /// Release confirm between presses so the start screen sees a fresh press
    confirm_held: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    fn decide(&mut self, snapshot: &Snapshot) -> TickInput {
        match snapshot.phase {
            SessionPhase::Start => self.press_confirm(),
            SessionPhase::GameOver if snapshot.can_continue => self.press_confirm(),
            SessionPhase::GameOver => TickInput::default(),
            SessionPhase::Playing => {
                self.confirm_held = false;
                Self::play(snapshot)
            }
        }
    }

    fn press_confirm(&mut self) -> TickInput {
        self.confirm_held = !self.confirm_held;
        TickInput {
            confirm: self.confirm_held,
            ..TickInput::default()
        }
    }

    fn play(snapshot: &Snapshot) -> TickInput {
        let actor = &snapshot.actor;
        let mut input = TickInput {
            fire: true,
            ..TickInput::default()
        };

        // Incoming shot directly overhead: sidestep away from it
        let threat = snapshot
            .projectiles
            .iter()
            .filter(|p| p.owner == Owner::Hostile)
            .filter(|p| p.pos.y < actor.pos.y && actor.pos.y - p.pos.y < DODGE_RANGE)
            .filter(|p| (p.pos.x - actor.pos.x).abs() < actor.radius * 2.0)
            .min_by(|a, b| {
                (actor.pos.y - a.pos.y)
                    .partial_cmp(&(actor.pos.y - b.pos.y))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(shot) = threat {
            let go_left = shot.pos.x >= actor.pos.x && actor.pos.x > actor.radius * 2.0;
            if go_left || actor.pos.x > ARENA_WIDTH - actor.radius * 2.0 {
                input.move_left = true;
            } else {
                input.move_right = true;
            }
            return input;
        }

        // Otherwise line up under a pickup if one is low, else the lowest hostile
        let target_x = snapshot
            .powerups
            .iter()
            .filter(|p| p.pos.y > actor.pos.y - DODGE_RANGE)
            .map(|p| p.pos.x)
            .next()
            .or_else(|| {
                snapshot
                    .hostiles
                    .iter()
                    .max_by(|a, b| {
                        a.pos
                            .y
                            .partial_cmp(&b.pos.y)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|h| h.pos.x)
            });

        if let Some(x) = target_x {
            let dx = x - actor.pos.x;
            if dx < -TRACK_DEADZONE {
                input.move_left = true;
            } else if dx > TRACK_DEADZONE {
                input.move_right = true;
            }
        }
        input
    }
}

impl Renderer for Autopilot {
    fn draw(&mut self, snapshot: &Snapshot) {
        self.last = Some(snapshot.clone());
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self) -> TickInput {
        match self.last.take() {
            Some(snapshot) => self.decide(&snapshot),
            None => TickInput::default(),
        }
    }
}

/// Headless renderer: logs the HUD whenever it changes
#[derive(Debug, Default)]
pub struct LogRenderer {
    hud: Option<(SessionPhase, u64, u32, u32)>,
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        let hud = (
            snapshot.phase,
            snapshot.score,
            snapshot.level,
            snapshot.lives,
        );
        if self.hud != Some(hud) {
            log::debug!(
                "[{:?}] score {} level {} lives {} | {} hostiles, {} shots, {} powerups{}",
                snapshot.phase,
                snapshot.score,
                snapshot.level,
                snapshot.lives,
                snapshot.hostiles.len(),
                snapshot.projectiles.len(),
                snapshot.powerups.len(),
                match snapshot.boss() {
                    Some(boss) => format!(", boss hp {}", boss.health),
                    None => String::new(),
                }
            );
            self.hud = Some(hud);
        }
    }
}
