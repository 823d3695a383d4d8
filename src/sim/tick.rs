//! Per-frame simulation tick
//!
//! The gameplay half of a frame: player physics, camera, crowns, goal.
//! Only runs while the game is in [`GamePhase::Running`].

use super::physics::{StepOutcome, step_player};
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::platform::{Action, InputSource};

/// Held actions for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl TickInput {
    /// Snapshot the held actions of an input source
    pub fn from_source(source: &dyn InputSource) -> Self {
        Self {
            left: source.is_held(Action::Left),
            right: source.is_held(Action::Right),
            jump: source.is_held(Action::Jump),
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> StepOutcome {
    if state.phase != GamePhase::Running {
        return StepOutcome::default();
    }

    let outcome = step_player(
        &mut state.player,
        &state.level.platforms,
        input,
        state.level.width,
        VIEWPORT_HEIGHT,
        &mut state.particles,
    );
    if outcome.fell {
        state.lose_life();
    }

    state.camera.follow(&state.player, state.level.width, VIEWPORT_WIDTH);

    // A fall may have ended the game this frame
    if state.is_running() {
        state.check_collectibles();
        state.check_goal();
    }

    outcome
}
