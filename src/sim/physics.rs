//! Player integration and axis-separated collision resolution
//!
//! Each frame moves the player along x, resolves against every platform, then
//! does the same along y. Impact effects are edge-triggered from the player's
//! previous-frame contact flags so resting on the ground or leaning on a wall
//! does not spam particles.

use glam::Vec2;

use super::geometry::{Rect, overlaps};
use super::particles::ParticlePool;
use super::player::Player;
use super::tick::TickInput;
use crate::consts::{FALL_DEATH_MARGIN, TRAIL_SPEED_THRESHOLD};

/// What happened to the player during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Fell below the visible area; the caller takes a life
    pub fell: bool,
    /// Trail particles were emitted
    pub trail: bool,
    /// First frame of contact with a wall
    pub wall_impact: bool,
    /// First frame standing on a platform
    pub landed: bool,
    /// Bumped the underside of a platform
    pub ceiling_hit: bool,
}

/// Advance the player by one frame against the level's platforms
pub fn step_player(
    player: &mut Player,
    platforms: &[Rect],
    input: &TickInput,
    level_width: f32,
    visible_height: f32,
    particles: &mut ParticlePool,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    let tuning = player.tuning;

    // Horizontal intent
    if input.left {
        player.vel.x = -tuning.speed;
    } else if input.right {
        player.vel.x = tuning.speed;
    } else {
        player.vel.x *= tuning.friction;
    }

    // Jump only from the ground
    if input.jump && player.grounded {
        player.vel.y = -tuning.jump_power;
        player.grounded = false;
    }

    player.vel.y += tuning.gravity;

    if player.vel.x.abs() > TRAIL_SPEED_THRESHOLD || player.vel.y.abs() > TRAIL_SPEED_THRESHOLD {
        particles.emit_trail(&player.rect(), player.vel);
        outcome.trail = true;
    }

    player.pos.x += player.vel.x;
    outcome.wall_impact = resolve_horizontal(player, platforms, particles);

    player.pos.y += player.vel.y;
    let (landed, ceiling_hit) = resolve_vertical(player, platforms, particles);
    outcome.landed = landed;
    outcome.ceiling_hit = ceiling_hit;

    if player.pos.y > visible_height + FALL_DEATH_MARGIN {
        outcome.fell = true;
    }

    let max_x = level_width - tuning.width;
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
    }
    if player.pos.x > max_x {
        player.pos.x = max_x;
    }

    outcome
}

/// Push the player out of any platform it moved into along x.
///
/// The direction is taken from the velocity on entry, so with several
/// overlapping platforms each one corrects in order and the last one wins.
/// Returns true when an impact effect fired (contact began this frame).
pub fn resolve_horizontal(
    player: &mut Player,
    platforms: &[Rect],
    particles: &mut ParticlePool,
) -> bool {
    let direction = player.vel.x;
    let mut hit = false;

    for platform in platforms {
        if !overlaps(&player.rect(), platform) {
            continue;
        }
        hit = true;
        if direction > 0.0 {
            player.pos.x = platform.x - player.tuning.width;
        } else if direction < 0.0 {
            player.pos.x = platform.right();
        }
        player.vel.x = 0.0;
    }

    let impact = hit && !player.had_horizontal_collision && direction != 0.0;
    if impact {
        let contact_x = if direction > 0.0 {
            player.pos.x + player.tuning.width
        } else {
            player.pos.x
        };
        let contact = Vec2::new(contact_x, player.pos.y + player.tuning.height / 2.0);
        particles.emit_explosion(contact);
    }

    player.had_horizontal_collision = hit;
    impact
}

/// Land on or bump against any platform the player moved into along y.
///
/// Returns `(landed, ceiling_hit)`. Landing fires only on the first grounded
/// frame; ceiling bumps fire on every frame they happen.
pub fn resolve_vertical(
    player: &mut Player,
    platforms: &[Rect],
    particles: &mut ParticlePool,
) -> (bool, bool) {
    let direction = player.vel.y;
    let mut ceiling = false;
    player.grounded = false;

    for platform in platforms {
        if !overlaps(&player.rect(), platform) {
            continue;
        }
        if direction > 0.0 {
            player.pos.y = platform.y - player.tuning.height;
            player.vel.y = 0.0;
            player.grounded = true;
        } else if direction < 0.0 {
            player.pos.y = platform.bottom();
            player.vel.y = 0.0;
            ceiling = true;
        }
    }

    let center_x = player.pos.x + player.tuning.width / 2.0;
    let landed = player.grounded && !player.was_grounded;
    if landed {
        particles.emit_explosion(Vec2::new(center_x, player.pos.y + player.tuning.height));
    }
    if ceiling {
        particles.emit_explosion(Vec2::new(center_x, player.pos.y));
    }

    player.was_grounded = player.grounded;
    (landed, ceiling)
}
