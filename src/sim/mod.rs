//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - One step per host frame, no wall-clock reads
//! - Seeded RNG only (particles)
//! - Host callbacks arrive as explicit events (timers)
//! - Drawing goes through the `renderer::Surface` trait

pub mod camera;
pub mod geometry;
pub mod level;
pub mod particles;
pub mod physics;
pub mod player;
pub mod state;
pub mod tick;
pub mod timer;

pub use camera::Camera;
pub use geometry::{Rect, overlaps};
pub use level::{ActiveLevel, Collectible, Level, LevelError, LevelSet};
pub use particles::{Particle, ParticlePool, Spin};
pub use physics::{StepOutcome, step_player};
pub use player::{Player, PlayerTuning};
pub use state::{GameEvent, GamePhase, GameState, Overlay, TransitionStage};
pub use tick::{TickInput, tick};
pub use timer::{TimerEvent, TimerId, TimerQueue};
