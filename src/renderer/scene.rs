//! World drawing: background, level geometry, crowns, goal flag and player

use glam::Vec2;

use super::Surface;
use super::vertex::colors;
use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::{GameState, Rect};

const STAR_COUNT: u32 = 50;
const STAR_SIZE: f32 = 2.0;
/// Stars stay out of the bottom band where the ground usually sits
const STAR_BAND_MARGIN: f32 = 100.0;

/// Crown outline relative to its center
const CROWN: [(f32, f32); 9] = [
    (-12.0, 10.0),
    (-15.0, -5.0),
    (-10.0, 0.0),
    (-5.0, -10.0),
    (0.0, 0.0),
    (5.0, -10.0),
    (10.0, 0.0),
    (15.0, -5.0),
    (12.0, 10.0),
];
const CROWN_JEWELS: [(f32, f32); 3] = [(-5.0, -5.0), (0.0, -2.0), (5.0, -5.0)];
const JEWEL_RADIUS: f32 = 2.0;

const FLAG_POLE_WIDTH: f32 = 5.0;
/// Flag triangle relative to the goal's top-left corner
const FLAG: [(f32, f32); 3] = [(5.0, 0.0), (55.0, 25.0), (5.0, 50.0)];

/// Draw everything except particles, back to front
pub fn draw_world(surface: &mut dyn Surface, state: &GameState) {
    let camera_x = state.camera.x;

    draw_background(surface, state.level.width, camera_x);

    for platform in &state.level.platforms {
        let screen = platform.offset_x(-camera_x);
        surface.fill_rect(screen, colors::PLATFORM_FILL);
        surface.stroke_rect(screen, colors::PURPLE, 2.0);
    }

    for collectible in state.level.collectibles.iter().filter(|c| !c.collected) {
        draw_crown(
            surface,
            Vec2::new(collectible.pos.x - camera_x, collectible.pos.y),
        );
    }

    draw_goal(surface, state.level.goal.offset_x(-camera_x));

    surface.draw_sprite(state.player.rect().offset_x(-camera_x));
}

/// Sky gradient plus a fixed star pattern that scrolls with the level
pub fn draw_background(surface: &mut dyn Surface, level_width: f32, camera_x: f32) {
    surface.fill_gradient(
        Rect::new(0.0, 0.0, VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    );

    if level_width <= 0.0 {
        return;
    }
    for i in 0..STAR_COUNT {
        let x = (i * 157) as f32 % level_width;
        let y = (i * 73) as f32 % (VIEWPORT_HEIGHT - STAR_BAND_MARGIN);
        let screen_x = x - camera_x;

        if screen_x > -10.0 && screen_x < VIEWPORT_WIDTH + 10.0 {
            surface.fill_rect(Rect::new(screen_x, y, STAR_SIZE, STAR_SIZE), colors::STAR);
        }
    }
}

/// Crown centered at `center` (screen space)
pub fn draw_crown(surface: &mut dyn Surface, center: Vec2) {
    let outline = CROWN.map(|(x, y)| center + Vec2::new(x, y));
    surface.fill_polygon(&outline, colors::PURPLE);
    surface.stroke_polygon(&outline, colors::PURPLE_LIGHT, 2.0);

    for (x, y) in CROWN_JEWELS {
        surface.fill_circle(center + Vec2::new(x, y), JEWEL_RADIUS, colors::WHITE);
    }
}

/// Flag pole and pennant in the goal rectangle (screen space)
pub fn draw_goal(surface: &mut dyn Surface, goal: Rect) {
    surface.fill_rect(Rect::new(goal.x, goal.y, FLAG_POLE_WIDTH, goal.h), colors::GOLD);

    let flag = FLAG.map(|(x, y)| Vec2::new(goal.x + x, goal.y + y));
    surface.fill_polygon(&flag, colors::GOLD);
    surface.stroke_polygon(&flag, colors::ORANGE, 3.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::{DrawCall, RecordingSurface};
    use crate::sim::state::tests::{FAR_GOAL, state_with, test_level};

    fn star_count(calls: &[DrawCall]) -> usize {
        calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect(_, color) if *color == colors::STAR))
            .count()
    }

    #[test]
    fn test_draw_order() {
        let state = state_with(vec![test_level(1, vec![Vec2::new(200.0, 500.0)], FAR_GOAL)]);
        let mut surface = RecordingSurface::default();
        draw_world(&mut surface, &state);

        assert!(matches!(surface.calls.first(), Some(DrawCall::Gradient(_))));
        assert_eq!(
            surface.calls.last(),
            Some(&DrawCall::Sprite(Rect::new(100.0, 100.0, 48.0, 48.0)))
        );
        let jewels = surface
            .calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillCircle(..)))
            .count();
        assert_eq!(jewels, 3);
    }

    #[test]
    fn test_collected_crowns_are_hidden() {
        let mut state = state_with(vec![test_level(1, vec![Vec2::new(200.0, 500.0)], FAR_GOAL)]);
        state.level.collectibles[0].collected = true;
        let mut surface = RecordingSurface::default();
        draw_world(&mut surface, &state);
        assert!(
            !surface
                .calls
                .iter()
                .any(|c| matches!(c, DrawCall::FillCircle(..)))
        );
    }

    #[test]
    fn test_camera_offsets_world() {
        let mut state = state_with(vec![test_level(1, vec![], FAR_GOAL)]);
        state.camera.x = 150.0;
        let mut surface = RecordingSurface::default();
        draw_world(&mut surface, &state);

        // Ground platform starts at x=0 in the world
        assert!(surface.calls.contains(&DrawCall::FillRect(
            Rect::new(-150.0, 550.0, 1000.0, 50.0),
            colors::PLATFORM_FILL
        )));
        assert!(surface.calls.contains(&DrawCall::FillRect(
            Rect::new(FAR_GOAL.x - 150.0, FAR_GOAL.y, 5.0, FAR_GOAL.h),
            colors::GOLD
        )));
    }

    #[test]
    fn test_stars_culled_outside_view() {
        let mut surface = RecordingSurface::default();
        draw_background(&mut surface, 3000.0, 0.0);
        let near = star_count(&surface.calls);

        let mut surface = RecordingSurface::default();
        draw_background(&mut surface, 3000.0, 100_000.0);
        assert_eq!(star_count(&surface.calls), 0);
        assert!(near > 0 && near < STAR_COUNT as usize);
    }
}
