//! The player-controlled sprite

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Movement tunables. Units are per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed while a direction is held
    pub speed: f32,
    /// Upward velocity applied on jump
    pub jump_power: f32,
    /// Downward acceleration
    pub gravity: f32,
    /// Horizontal velocity multiplier when no direction is held
    pub friction: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            jump_power: PLAYER_JUMP_POWER,
            gravity: PLAYER_GRAVITY,
            friction: PLAYER_FRICTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub tuning: PlayerTuning,
    /// Resting on a platform top this frame
    pub grounded: bool,
    /// Previous frame's `grounded` (landing edge detection)
    pub was_grounded: bool,
    /// Previous frame's wall contact (wall impact edge detection)
    pub had_horizontal_collision: bool,
}

impl Player {
    pub fn new(start: Vec2, tuning: PlayerTuning) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            tuning,
            grounded: false,
            was_grounded: false,
            had_horizontal_collision: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.tuning.width, self.tuning.height)
    }

    /// Put the player back at a spawn point with no momentum and no contacts.
    /// The jump check runs before collision resolution, so a stale `grounded`
    /// would allow a jump from mid-air on the first frame.
    pub fn respawn(&mut self, start: Vec2) {
        self.pos = start;
        self.vel = Vec2::ZERO;
        self.grounded = false;
        self.was_grounded = false;
        self.had_horizontal_collision = false;
    }
}
