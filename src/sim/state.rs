//! Game state and the level/run state machine
//!
//! Everything a running game owns lives in [`GameState`]: the level table,
//! the active level copy, the player, score and lives, particles, timers and
//! the high score. Transitions push [`GameEvent`]s that the host drains to
//! update the HUD and overlays.

use super::camera::Camera;
use super::geometry::overlaps;
use super::level::{ActiveLevel, LevelError, LevelSet};
use super::particles::ParticlePool;
use super::player::{Player, PlayerTuning};
use super::timer::{TimerEvent, TimerId, TimerQueue};
use crate::consts::*;
use crate::highscores::HighScores;

/// Stage of the between-levels screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStage {
    /// Overlay visible, waiting for the display delay or a skip
    Showing,
    /// Overlay fading out; the next level loads when the fade ends
    FadingOut,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Out of lives, waiting for restart
    GameOver,
    /// Final level finished, waiting for restart
    LevelComplete,
    /// Between two levels
    Transition(TransitionStage),
}

/// Full-screen overlays the host can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    GameOver,
    LevelComplete,
    LevelTransition,
}

/// Notifications for the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u64),
    LivesChanged(u32),
    HighScoreChanged(u64),
    LevelLoaded(u32),
    ShowGameOver { score: u64 },
    ShowLevelComplete { score: u64 },
    ShowTransition { completed_level: u32, score: u64 },
    /// Start the overlay's fade-out animation
    FadeOverlay(Overlay),
    HideOverlay(Overlay),
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Score at the most recent level boundary; a lost life rolls back to it
    pub level_start_score: u64,
    pub player: Player,
    pub camera: Camera,
    /// The level being played (mutable copy of its template)
    pub level: ActiveLevel,
    pub levels: LevelSet,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticlePool,
    pub timers: TimerQueue,
    pub high_scores: HighScores,
    /// Best score as last shown on the HUD
    pub high_score: u64,
    /// Pending auto-advance of the transition screen
    transition_timer: Option<TimerId>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a fresh run on the first level
    pub fn new(levels: LevelSet, high_scores: HighScores, seed: u64) -> Result<Self, LevelError> {
        let first = levels.get(FIRST_LEVEL)?;
        let level = ActiveLevel::from_template(first);
        let player = Player::new(level.start, PlayerTuning::default());
        let high_score = high_scores.get_high_score();

        let mut state = Self {
            phase: GamePhase::Running,
            score: 0,
            lives: STARTING_LIVES,
            level_start_score: 0,
            player,
            camera: Camera::default(),
            level,
            levels,
            particles: ParticlePool::new(seed),
            timers: TimerQueue::new(),
            high_scores,
            high_score,
            transition_timer: None,
            events: Vec::new(),
        };
        state.events.extend([
            GameEvent::ScoreChanged(0),
            GameEvent::LivesChanged(STARTING_LIVES),
            GameEvent::HighScoreChanged(high_score),
            GameEvent::LevelLoaded(FIRST_LEVEL),
        ]);
        Ok(state)
    }

    pub fn current_level(&self) -> u32 {
        self.level.id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Make `id` the active level. With `carry_score` the current score
    /// becomes the new level start score. On error nothing changes.
    pub fn load_level(&mut self, id: u32, carry_score: bool) -> Result<(), LevelError> {
        let template = match self.levels.get(id) {
            Ok(template) => template,
            Err(e) => {
                log::error!("Cannot load level {}: {}", id, e);
                return Err(e);
            }
        };
        self.level = ActiveLevel::from_template(template);

        if carry_score {
            self.level_start_score = self.score;
        }
        self.player.respawn(self.level.start);
        self.particles.clear();
        self.camera.reset();

        log::info!("Level {} loaded", id);
        self.events.push(GameEvent::LevelLoaded(id));
        Ok(())
    }

    /// Take a life, ending the game when none remain
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LivesChanged(self.lives));

        if self.lives == 0 {
            self.game_over();
        } else {
            self.reset_run();
        }
    }

    /// Retry the current level: score rolls back, crowns come back
    pub fn reset_run(&mut self) {
        self.score = self.level_start_score;
        self.events.push(GameEvent::ScoreChanged(self.score));
        self.level.respawn_collectibles();
        self.player.respawn(self.level.start);
        self.particles.clear();
    }

    pub fn game_over(&mut self) {
        log::info!("Game over with score {}", self.score);
        self.phase = GamePhase::GameOver;
        self.record_high_score();
        self.events.push(GameEvent::ShowGameOver { score: self.score });
    }

    /// Persist the score if it is a new best. Returns true on a new best.
    fn record_high_score(&mut self) -> bool {
        if self.high_scores.update(self.score) {
            self.high_score = self.score;
            self.events.push(GameEvent::HighScoreChanged(self.score));
            true
        } else {
            false
        }
    }

    /// The player reached the goal
    pub fn complete_level(&mut self) {
        if !self.is_running() {
            return;
        }
        if self.record_high_score() {
            self.particles.emit_confetti(self.camera.x);
        }

        let completed = self.current_level();
        if self.levels.contains(completed + 1) {
            log::info!("Level {} complete, score {}", completed, self.score);
            self.phase = GamePhase::Transition(TransitionStage::Showing);
            self.transition_timer = Some(
                self.timers
                    .schedule(TRANSITION_DISPLAY_MS, TimerEvent::TransitionDisplayElapsed),
            );
            self.events.push(GameEvent::ShowTransition {
                completed_level: completed,
                score: self.score,
            });
        } else {
            log::info!("Final level complete, score {}", self.score);
            self.phase = GamePhase::LevelComplete;
            self.events.push(GameEvent::ShowLevelComplete { score: self.score });
        }
    }

    /// Leave the transition screen early
    pub fn skip_transition(&mut self) {
        match self.phase {
            GamePhase::Transition(TransitionStage::Showing) => self.begin_fade(),
            phase => log::debug!("Ignoring transition skip in {:?}", phase),
        }
    }

    fn begin_fade(&mut self) {
        if let Some(id) = self.transition_timer.take() {
            self.timers.cancel(id);
        }
        self.phase = GamePhase::Transition(TransitionStage::FadingOut);
        self.timers.schedule(FADE_OUT_MS, TimerEvent::FadeOutElapsed);
        self.events.push(GameEvent::FadeOverlay(Overlay::LevelTransition));
    }

    /// Deliver a fired timer
    pub fn on_timer(&mut self, event: TimerEvent) {
        match (event, self.phase) {
            (
                TimerEvent::TransitionDisplayElapsed,
                GamePhase::Transition(TransitionStage::Showing),
            ) => {
                self.transition_timer = None;
                self.begin_fade();
            }
            (TimerEvent::FadeOutElapsed, GamePhase::Transition(TransitionStage::FadingOut)) => {
                self.events.push(GameEvent::HideOverlay(Overlay::LevelTransition));
                let next = self.current_level() + 1;
                match self.load_level(next, true) {
                    Ok(()) => self.phase = GamePhase::Running,
                    Err(_) => {
                        self.phase = GamePhase::LevelComplete;
                        self.events.push(GameEvent::ShowLevelComplete { score: self.score });
                    }
                }
            }
            (event, phase) => log::debug!("Ignoring stale {:?} in {:?}", event, phase),
        }
    }

    /// Fire every timer due at `now_ms`
    pub fn advance_timers(&mut self, now_ms: f64) {
        for event in self.timers.advance_to(now_ms) {
            self.on_timer(event);
        }
    }

    /// New game from the first level
    pub fn restart(&mut self) {
        self.timers.clear();
        self.transition_timer = None;

        self.score = 0;
        self.level_start_score = 0;
        if self.load_level(FIRST_LEVEL, false).is_err() {
            return;
        }
        self.lives = STARTING_LIVES;
        self.phase = GamePhase::Running;

        log::info!("Game restarted");
        self.events.extend([
            GameEvent::ScoreChanged(0),
            GameEvent::LivesChanged(STARTING_LIVES),
            GameEvent::HideOverlay(Overlay::GameOver),
            GameEvent::HideOverlay(Overlay::LevelComplete),
            GameEvent::HideOverlay(Overlay::LevelTransition),
        ]);
    }

    /// Award every uncollected crown the player touches. Returns how many.
    pub fn check_collectibles(&mut self) -> u32 {
        let player = self.player.rect();
        let mut collected = 0;

        for collectible in &mut self.level.collectibles {
            if collectible.collected || !overlaps(&player, &collectible.hitbox()) {
                continue;
            }
            collectible.collected = true;
            self.score += COLLECTIBLE_REWARD;
            self.particles.emit_sparkle(collectible.pos);
            self.events.push(GameEvent::ScoreChanged(self.score));
            collected += 1;
        }

        collected
    }

    /// Complete the level if the player touches the goal
    pub fn check_goal(&mut self) -> bool {
        if self.is_running() && overlaps(&self.player.rect(), &self.level.goal) {
            self.complete_level();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use glam::Vec2;

    use super::*;
    use crate::platform::{KeyValueStore, MemoryStore};
    use crate::sim::geometry::Rect;
    use crate::sim::level::Level;
    use crate::sim::tick::{TickInput, tick};

    pub(crate) const FAR_GOAL: Rect = Rect::new(900.0, 450.0, 60.0, 100.0);
    /// Overlaps the default start position
    pub(crate) const START_GOAL: Rect = Rect::new(100.0, 100.0, 60.0, 100.0);

    pub(crate) fn test_level(id: u32, collectibles: Vec<Vec2>, goal: Rect) -> Level {
        Level {
            id,
            width: 1000.0,
            start: Vec2::new(100.0, 100.0),
            platforms: vec![Rect::new(0.0, 550.0, 1000.0, 50.0)],
            collectibles,
            goal,
        }
    }

    pub(crate) fn state_with(levels: Vec<Level>) -> GameState {
        let levels = LevelSet::from_levels(levels).unwrap();
        GameState::new(levels, HighScores::new(Box::new(MemoryStore::new())), 7).unwrap()
    }

    fn loaded_events(events: &[GameEvent], id: u32) -> usize {
        events
            .iter()
            .filter(|e| **e == GameEvent::LevelLoaded(id))
            .count()
    }

    #[test]
    fn test_new_state_starts_running() {
        let mut state = state_with(vec![test_level(1, vec![], FAR_GOAL)]);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.pos, Vec2::new(100.0, 100.0));
        assert!(state.drain_events().contains(&GameEvent::LivesChanged(3)));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_collectible_awarded_once() {
        let mut state = state_with(vec![test_level(1, vec![Vec2::new(200.0, 500.0)], FAR_GOAL)]);
        assert_eq!(state.level.collectibles[0].hitbox(), Rect::new(185.0, 485.0, 30.0, 30.0));

        state.player.pos = Vec2::new(160.0, 470.0);
        assert_eq!(state.check_collectibles(), 1);
        assert!(state.level.collectibles[0].collected);
        assert_eq!(state.score, 5);

        // Same frame re-check
        assert_eq!(state.check_collectibles(), 0);
        assert_eq!(state.score, 5);
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_lost_life_rolls_back_score() {
        let mut state = state_with(vec![test_level(1, vec![Vec2::new(200.0, 500.0)], FAR_GOAL)]);
        state.player.pos = Vec2::new(160.0, 470.0);
        state.check_collectibles();
        assert_eq!(state.score, 5);

        state.lose_life();
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, state.level_start_score);
        assert_eq!(state.score, 0);
        assert_eq!(state.level.remaining(), 1);
        assert_eq!(state.player.pos, state.level.start);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(state.particles.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_last_life_ends_game_and_saves_best() {
        let mut state = state_with(vec![test_level(1, vec![], FAR_GOAL)]);
        state.lives = 1;
        state.score = 30;

        state.lose_life();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert_eq!(state.high_scores.get_high_score(), 30);
        assert_eq!(state.high_score, 30);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ShowGameOver { score: 30 }));
        assert!(events.contains(&GameEvent::HighScoreChanged(30)));

        // Lives never go negative
        state.lose_life();
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_game_over_keeps_better_stored_score() {
        let mut store = MemoryStore::new();
        store.set(HighScores::STORAGE_KEY, "100").unwrap();
        let levels = LevelSet::from_levels(vec![test_level(1, vec![], FAR_GOAL)]).unwrap();
        let mut state = GameState::new(levels, HighScores::new(Box::new(store)), 1).unwrap();
        assert_eq!(state.high_score, 100);

        state.lives = 1;
        state.score = 40;
        state.lose_life();
        assert_eq!(state.high_scores.get_high_score(), 100);
        assert!(!state.drain_events().contains(&GameEvent::HighScoreChanged(40)));
    }

    #[test]
    fn test_final_level_completes_without_load() {
        let mut state = state_with(vec![test_level(1, vec![], START_GOAL)]);
        state.drain_events();

        assert!(state.check_goal());
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.timers.is_empty());

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ShowLevelComplete { score: 0 }));
        assert_eq!(loaded_events(&events, 2), 0);

        // Goal is only checked while running
        assert!(!state.check_goal());
    }

    #[test]
    fn test_transition_auto_advances() {
        let mut state = state_with(vec![
            test_level(1, vec![], START_GOAL),
            test_level(2, vec![], FAR_GOAL),
        ]);
        state.score = 15;
        state.advance_timers(1000.0);
        state.check_goal();
        assert_eq!(state.phase, GamePhase::Transition(TransitionStage::Showing));

        state.advance_timers(3999.0);
        assert_eq!(state.phase, GamePhase::Transition(TransitionStage::Showing));
        state.advance_timers(4000.0);
        assert_eq!(state.phase, GamePhase::Transition(TransitionStage::FadingOut));

        state.advance_timers(4499.0);
        assert_eq!(state.current_level(), 1);
        state.advance_timers(4500.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.current_level(), 2);
        assert_eq!(state.level_start_score, 15);
        assert_eq!(state.score, 15);
        assert_eq!(state.camera.x, 0.0);
    }

    #[test]
    fn test_skip_cancels_auto_advance() {
        let mut state = state_with(vec![
            test_level(1, vec![], START_GOAL),
            test_level(2, vec![], FAR_GOAL),
        ]);
        state.check_goal();
        state.drain_events();

        state.advance_timers(1000.0);
        state.skip_transition();
        assert_eq!(state.phase, GamePhase::Transition(TransitionStage::FadingOut));

        // A second skip during the fade is ignored
        state.skip_transition();
        assert_eq!(state.timers.len(), 1);

        state.advance_timers(1500.0);
        assert_eq!(state.current_level(), 2);
        assert_eq!(state.phase, GamePhase::Running);

        // The cancelled display timer never fires
        state.advance_timers(10_000.0);
        let events = state.drain_events();
        assert_eq!(loaded_events(&events, 2), 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_new_best_on_completion_fires_confetti() {
        let mut state = state_with(vec![test_level(1, vec![], START_GOAL)]);
        state.score = 25;
        state.particles.clear();
        state.complete_level();
        assert!(state.particles.len() >= 30);

        let mut state = state_with(vec![test_level(1, vec![], START_GOAL)]);
        state.particles.clear();
        state.complete_level();
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = state_with(vec![
            test_level(1, vec![], FAR_GOAL),
            test_level(2, vec![], FAR_GOAL),
        ]);
        state.load_level(2, true).unwrap();
        state.score = 50;
        state.lives = 1;
        state.lose_life();
        assert_eq!(state.phase, GamePhase::GameOver);

        state.restart();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.current_level(), 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level_start_score, 0);
        assert!(state.drain_events().contains(&GameEvent::HideOverlay(Overlay::GameOver)));
    }

    #[test]
    fn test_next_level_spawn_cannot_jump() {
        let mut state = state_with(vec![
            test_level(1, vec![], START_GOAL),
            test_level(2, vec![], FAR_GOAL),
        ]);
        // Reaching the goal while standing on the ground
        state.player.grounded = true;
        state.player.was_grounded = true;
        state.check_goal();
        state.skip_transition();
        state.advance_timers(FADE_OUT_MS);
        assert_eq!(state.current_level(), 2);
        assert!(!state.player.grounded);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump);
        assert!(state.player.vel.y > 0.0);
    }

    #[test]
    fn test_restart_during_transition_drops_timers() {
        let mut state = state_with(vec![
            test_level(1, vec![], START_GOAL),
            test_level(2, vec![], FAR_GOAL),
        ]);
        state.check_goal();
        state.restart();
        assert!(state.timers.is_empty());

        state.advance_timers(10_000.0);
        assert_eq!(state.current_level(), 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_unknown_level_leaves_state_intact() {
        let mut state = state_with(vec![test_level(1, vec![Vec2::new(200.0, 500.0)], FAR_GOAL)]);
        state.player.pos = Vec2::new(300.0, 200.0);
        state.score = 10;

        assert!(matches!(state.load_level(9, true), Err(LevelError::NotFound(9))));
        assert_eq!(state.current_level(), 1);
        assert_eq!(state.player.pos, Vec2::new(300.0, 200.0));
        assert_eq!(state.level_start_score, 0);
    }
}
