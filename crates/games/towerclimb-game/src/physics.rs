use serde::{Deserialize, Serialize};

use towerclimb_core::geometry::Rect;

use crate::config::PhysicsConfig;

/// Horizontal intent for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDir {
    #[default]
    None,
    Left,
    Right,
}

impl MoveDir {
    /// Unit step along x: -1, 0 or +1.
    pub fn sign(self) -> i32 {
        match self {
            MoveDir::None => 0,
            MoveDir::Left => -1,
            MoveDir::Right => 1,
        }
    }
}

/// Decoded per-tick input, shared by keyboard play and agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    pub jump: bool,
    pub move_dir: MoveDir,
}

impl Intents {
    pub const IDLE: Intents = Intents {
        jump: false,
        move_dir: MoveDir::None,
    };

    pub fn new(jump: bool, move_dir: MoveDir) -> Self {
        Self { jump, move_dir }
    }
}

/// State of the climbing player. Velocity is in pixels per tick, positive
/// downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub rect: Rect,
    pub vy: i32,
    /// Resting on a floor. Recomputed by the vertical collision pass every
    /// tick.
    pub grounded: bool,
}

impl PlayerState {
    pub fn new(x: i32, y: i32, physics: &PhysicsConfig) -> Self {
        Self {
            rect: Rect::new(x, y, physics.player_width, physics.player_height),
            vy: 0,
            grounded: false,
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.vy < 0
    }
}

/// Apply one tick of input: an instantaneous horizontal shift, then a jump
/// if the player is standing on something. There is no mid-air jump.
pub fn apply_intents(player: &mut PlayerState, intents: Intents, physics: &PhysicsConfig) {
    player
        .rect
        .translate(intents.move_dir.sign() * physics.move_strength, 0);
    if intents.jump && player.grounded {
        player.vy = -physics.jump_velocity;
    }
}

/// Advance vertical motion by one tick.
///
/// A grounded player that is not moving up stays put with zero velocity.
/// Otherwise the player moves by the current velocity and only then gains
/// gravity, so each tick's displacement is the previous tick's velocity.
pub fn physics_update(player: &mut PlayerState, physics: &PhysicsConfig) {
    if player.grounded && player.vy >= 0 {
        player.vy = 0;
        return;
    }
    player.rect.translate(0, player.vy);
    player.vy = (player.vy + physics.gravity).min(physics.max_fall_velocity());
}
