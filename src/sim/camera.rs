//! Side-scrolling camera

use super::player::Player;

/// Horizontal viewport offset into the level.
///
/// Recomputed from the player every frame; there is no easing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    /// Center the view on the player, clamped so it never shows past the level edges
    pub fn follow(&mut self, player: &Player, level_width: f32, viewport_width: f32) {
        let target = player.pos.x - viewport_width / 2.0 + player.tuning.width / 2.0;
        let max_x = (level_width - viewport_width).max(0.0);
        self.x = target.clamp(0.0, max_x);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::PlayerTuning;
    use glam::Vec2;

    fn player_at(x: f32) -> Player {
        Player::new(Vec2::new(x, 0.0), PlayerTuning::default())
    }

    #[test]
    fn test_follow_centers_player() {
        let mut camera = Camera::default();
        camera.follow(&player_at(1000.0), 3000.0, 800.0);
        assert_eq!(camera.x, 1000.0 - 400.0 + 24.0);
    }

    #[test]
    fn test_follow_clamps_to_level() {
        let mut camera = Camera::default();
        camera.follow(&player_at(10.0), 3000.0, 800.0);
        assert_eq!(camera.x, 0.0);

        camera.follow(&player_at(2950.0), 3000.0, 800.0);
        assert_eq!(camera.x, 2200.0);
    }

    #[test]
    fn test_level_narrower_than_viewport() {
        let mut camera = Camera::default();
        camera.follow(&player_at(400.0), 500.0, 800.0);
        assert_eq!(camera.x, 0.0);
    }
}
