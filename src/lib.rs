//! Crown Dash - a side-scrolling crown collecting platformer
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, collisions, particles, run state)
//! - `game`: Frame driver that owns a simulation and draws it
//! - `renderer`: Drawing surface, scene drawing and the WebGPU pipeline
//! - `platform`: Keyboard state and key-value storage backends
//! - `highscores`: Persisted best score with in-memory fallback
//! - `settings`: User preferences
//! - `ui`: HUD and overlay surface driven by game events

pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::Game;
pub use highscores::HighScores;
pub use settings::{SettingToggle, Settings};

/// Game configuration constants
pub mod consts {
    /// Visible area in screen units (the canvas backing size)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_JUMP_POWER: f32 = 12.0;
    pub const PLAYER_GRAVITY: f32 = 0.5;
    pub const PLAYER_FRICTION: f32 = 0.8;

    /// Speed above which the player leaves a trail
    pub const TRAIL_SPEED_THRESHOLD: f32 = 0.5;
    /// How far below the viewport the player may fall before losing a life
    pub const FALL_DEATH_MARGIN: f32 = 100.0;

    /// Lives at the start of a run
    pub const STARTING_LIVES: u32 = 3;
    /// Score per collected crown
    pub const COLLECTIBLE_REWARD: u64 = 5;
    /// Side of the square pickup box centered on a crown
    pub const COLLECTIBLE_BOX_SIZE: f32 = 30.0;

    /// Particle pool capacity
    pub const MAX_PARTICLES: usize = 500;
    /// Confetti is dropped once it is this far below the viewport
    pub const CONFETTI_CLEANUP_MARGIN: f32 = 50.0;

    /// Level transition screen display time (ms) before auto-advance
    pub const TRANSITION_DISPLAY_MS: f64 = 3000.0;
    /// Overlay fade-out duration (ms)
    pub const FADE_OUT_MS: f64 = 500.0;

    /// First level of every run
    pub const FIRST_LEVEL: u32 = 1;
}
