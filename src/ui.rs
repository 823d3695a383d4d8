//! HUD and overlay updates driven by [`GameEvent`]s
//!
//! The browser host implements [`Hud`] over DOM elements; the native demo
//! uses [`LogHud`].

use crate::sim::{GameEvent, Overlay};

/// Text readouts and full-screen overlays
pub trait Hud {
    fn set_score(&mut self, score: u64);

    fn set_high_score(&mut self, score: u64);

    fn set_lives(&mut self, lives: u32);

    fn set_fps(&mut self, _fps: u32) {}

    fn show_game_over(&mut self, score: u64);

    fn show_level_complete(&mut self, score: u64);

    fn show_transition(&mut self, completed_level: u32, score: u64);

    /// Start the overlay's fade-out; `hide_overlay` follows when it ends
    fn fade_overlay(&mut self, overlay: Overlay);

    fn hide_overlay(&mut self, overlay: Overlay);
}

/// Route each event to the matching HUD call, in order
pub fn apply_events(hud: &mut dyn Hud, events: &[GameEvent]) {
    for event in events {
        match *event {
            GameEvent::ScoreChanged(score) => hud.set_score(score),
            GameEvent::LivesChanged(lives) => hud.set_lives(lives),
            GameEvent::HighScoreChanged(score) => hud.set_high_score(score),
            GameEvent::LevelLoaded(id) => log::debug!("HUD: level {} loaded", id),
            GameEvent::ShowGameOver { score } => hud.show_game_over(score),
            GameEvent::ShowLevelComplete { score } => hud.show_level_complete(score),
            GameEvent::ShowTransition {
                completed_level,
                score,
            } => hud.show_transition(completed_level, score),
            GameEvent::FadeOverlay(overlay) => hud.fade_overlay(overlay),
            GameEvent::HideOverlay(overlay) => hud.hide_overlay(overlay),
        }
    }
}

/// HUD that writes every change to the log
#[derive(Debug, Default)]
pub struct LogHud {
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    /// Overlay currently on screen, if any
    pub overlay: Option<Overlay>,
}

impl Hud for LogHud {
    fn set_score(&mut self, score: u64) {
        self.score = score;
        log::debug!("Score: {}", score);
    }

    fn set_high_score(&mut self, score: u64) {
        self.high_score = score;
        log::info!("High score: {}", score);
    }

    fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
        log::info!("Lives: {}", lives);
    }

    fn show_game_over(&mut self, score: u64) {
        self.overlay = Some(Overlay::GameOver);
        log::info!("== GAME OVER == final score {}", score);
    }

    fn show_level_complete(&mut self, score: u64) {
        self.overlay = Some(Overlay::LevelComplete);
        log::info!("== ALL LEVELS COMPLETE == score {}", score);
    }

    fn show_transition(&mut self, completed_level: u32, score: u64) {
        self.overlay = Some(Overlay::LevelTransition);
        log::info!("== LEVEL {} COMPLETE == score {}", completed_level, score);
    }

    fn fade_overlay(&mut self, overlay: Overlay) {
        log::debug!("Fading {:?}", overlay);
    }

    fn hide_overlay(&mut self, overlay: Overlay) {
        if self.overlay == Some(overlay) {
            self.overlay = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_update_hud() {
        let mut hud = LogHud::default();
        apply_events(
            &mut hud,
            &[
                GameEvent::ScoreChanged(10),
                GameEvent::LivesChanged(2),
                GameEvent::HighScoreChanged(10),
                GameEvent::ShowTransition {
                    completed_level: 1,
                    score: 10,
                },
            ],
        );
        assert_eq!(hud.score, 10);
        assert_eq!(hud.lives, 2);
        assert_eq!(hud.high_score, 10);
        assert_eq!(hud.overlay, Some(Overlay::LevelTransition));

        apply_events(
            &mut hud,
            &[
                GameEvent::FadeOverlay(Overlay::LevelTransition),
                GameEvent::HideOverlay(Overlay::GameOver),
            ],
        );
        assert_eq!(hud.overlay, Some(Overlay::LevelTransition));

        apply_events(&mut hud, &[GameEvent::HideOverlay(Overlay::LevelTransition)]);
        assert_eq!(hud.overlay, None);
    }
}
