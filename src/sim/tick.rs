//! Per-tick input intents
//!
//! Input collaborators translate devices into these; no raw key codes reach
//! the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single discrete intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Fire,
    Confirm,
}

/// The set of intents held during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub fire: bool,
    pub confirm: bool,
}

impl TickInput {
    pub fn from_intents(intents: &[Intent]) -> Self {
        intents.iter().fold(Self::default(), |input, intent| input.with(*intent))
    }

    /// Copy with one more intent held
    pub fn with(mut self, intent: Intent) -> Self {
        match intent {
            Intent::MoveLeft => self.move_left = true,
            Intent::MoveRight => self.move_right = true,
            Intent::MoveUp => self.move_up = true,
            Intent::MoveDown => self.move_down = true,
            Intent::Fire => self.fire = true,
            Intent::Confirm => self.confirm = true,
        }
        self
    }

    /// Any intent at all (used to leave the game-over screen)
    pub fn any(&self) -> bool {
        self.move_left || self.move_right || self.move_up || self.move_down || self.fire || self.confirm
    }

    /// Thrust direction; opposite keys cancel, axes are not normalized
    pub fn thrust(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(
            axis(self.move_left, self.move_right),
            axis(self.move_up, self.move_down),
        )
    }
}
