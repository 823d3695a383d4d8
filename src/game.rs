//! Frame driver
//!
//! One call to [`Game::frame`] per host animation frame:
//! 1. deliver due timers
//! 2. advance particles (always, even when paused)
//! 3. draw the world, then particles on top
//! 4. simulate, only while running

use crate::highscores::HighScores;
use crate::renderer::{Surface, draw_world};
use crate::platform::KeyValueStore;
use crate::settings::{SettingToggle, Settings};
use crate::sim::{GameEvent, GameState, LevelError, LevelSet, StepOutcome, TickInput, tick};

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Rolling frame-rate estimate over the last [`FPS_WINDOW`] frames
#[derive(Debug, Clone)]
struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    fn record(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample is the next slot to be overwritten
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

/// Game instance holding all state
#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    settings: Settings,
    fps: FpsCounter,
}

impl Game {
    pub fn new(
        levels: LevelSet,
        high_scores: HighScores,
        settings: Settings,
        seed: u64,
    ) -> Result<Self, LevelError> {
        let mut state = GameState::new(levels, high_scores, seed)?;
        state.particles.set_enabled(settings.particles);
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            state,
            settings,
            fps: FpsCounter::default(),
        })
    }

    /// Run one frame at host time `now_ms`
    pub fn frame(
        &mut self,
        surface: &mut dyn Surface,
        input: &TickInput,
        now_ms: f64,
    ) -> StepOutcome {
        self.fps.record(now_ms);
        self.state.advance_timers(now_ms);

        self.state.particles.advance();

        draw_world(surface, &self.state);
        self.state.particles.render(surface, self.state.camera.x);

        if self.state.is_running() {
            tick(&mut self.state, input)
        } else {
            StepOutcome::default()
        }
    }

    /// Restart button (game over and final screens)
    pub fn restart(&mut self) {
        self.state.restart();
    }

    /// Continue button on the transition screen
    pub fn skip_transition(&mut self) {
        self.state.skip_transition();
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.particles.set_enabled(settings.particles);
        self.settings = settings;
    }

    /// Flip a setting, apply it and persist the result
    pub fn toggle_setting(&mut self, toggle: SettingToggle, store: &mut dyn KeyValueStore) {
        let mut settings = self.settings.clone();
        settings.toggle(toggle);
        settings.save(store);
        self.apply_settings(settings);
    }

    /// Frames per second over the last second or so; 0 until known
    pub fn fps(&self) -> u32 {
        self.fps.fps
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::platform::MemoryStore;
    use crate::renderer::testing::{DrawCall, RecordingSurface};
    use crate::sim::state::tests::{FAR_GOAL, START_GOAL, test_level};
    use crate::sim::{GamePhase, TransitionStage};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn game_with(levels: Vec<crate::sim::Level>) -> Game {
        Game::new(
            LevelSet::from_levels(levels).unwrap(),
            HighScores::new(Box::new(MemoryStore::new())),
            Settings::default(),
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_particles_advance_while_paused() {
        let mut game = game_with(vec![test_level(1, vec![], START_GOAL)]);
        let mut surface = RecordingSurface::default();

        // Reaching the only goal ends the run
        game.frame(&mut surface, &TickInput::default(), 0.0);
        assert_eq!(game.state.phase, GamePhase::LevelComplete);

        game.state.particles.emit_explosion(Vec2::new(300.0, 300.0));
        let before: Vec<f32> = game.state.particles.iter().map(|p| p.life).collect();
        let pos = game.state.player.pos;

        game.frame(&mut surface, &TickInput::default(), FRAME_MS);
        let after: Vec<f32> = game.state.particles.iter().map(|p| p.life).collect();
        assert_eq!(before.len(), after.len());
        assert!(before.iter().zip(&after).all(|(b, a)| a < b));
        assert_eq!(game.state.player.pos, pos);
    }

    #[test]
    fn test_particles_drawn_after_player() {
        let mut game = game_with(vec![test_level(1, vec![], FAR_GOAL)]);
        game.state.particles.emit_explosion(Vec2::new(300.0, 300.0));
        let mut surface = RecordingSurface::default();
        game.frame(&mut surface, &TickInput::default(), 0.0);

        let sprite = surface
            .calls
            .iter()
            .position(|c| matches!(c, DrawCall::Sprite(_)))
            .unwrap();
        assert!(matches!(surface.calls.first(), Some(DrawCall::Gradient(_))));
        assert!(sprite < surface.calls.len() - 1);
    }

    #[test]
    fn test_transition_runs_on_frame_clock() {
        let mut game = game_with(vec![
            test_level(1, vec![], START_GOAL),
            test_level(2, vec![], FAR_GOAL),
        ]);
        let mut surface = RecordingSurface::default();
        let idle = TickInput::default();

        game.frame(&mut surface, &idle, 1000.0);
        assert_eq!(
            game.state.phase,
            GamePhase::Transition(TransitionStage::Showing)
        );

        let mut now = 1000.0;
        while now < 4600.0 {
            now += FRAME_MS;
            game.frame(&mut surface, &idle, now);
        }
        assert_eq!(game.state.phase, GamePhase::Running);
        assert_eq!(game.state.current_level(), 2);
    }

    #[test]
    fn test_disabling_particles_stops_emission() {
        let mut game = game_with(vec![test_level(1, vec![], FAR_GOAL)]);
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        game.apply_settings(settings);
        assert!(!game.settings().particles);

        game.state.particles.clear();
        let mut surface = RecordingSurface::default();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for i in 0..30 {
            game.frame(&mut surface, &right, i as f64 * FRAME_MS);
        }
        assert!(game.state.particles.is_empty());
    }

    #[test]
    fn test_toggle_setting_applies_and_persists() {
        let mut game = game_with(vec![test_level(1, vec![], FAR_GOAL)]);
        let mut store = MemoryStore::new();

        game.toggle_setting(SettingToggle::Particles, &mut store);
        assert!(!game.settings().particles);
        assert!(!Settings::load(&store).particles);
        game.state.particles.clear();
        game.state.particles.emit_explosion(Vec2::new(300.0, 300.0));
        assert!(game.state.particles.is_empty());

        game.toggle_setting(SettingToggle::ShowFps, &mut store);
        let saved = Settings::load(&store);
        assert!(saved.show_fps);
        assert!(!saved.particles);
        assert_eq!(game.settings(), &saved);
    }

    #[test]
    fn test_fps_estimate() {
        let mut game = game_with(vec![test_level(1, vec![], FAR_GOAL)]);
        let mut surface = RecordingSurface::default();
        for i in 1..=120 {
            game.frame(&mut surface, &TickInput::default(), i as f64 * FRAME_MS);
        }
        assert_eq!(game.fps(), 60);
    }
}
