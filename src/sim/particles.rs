//! Particle engine: a bounded pool of short-lived visual effects
//!
//! Particles never affect gameplay. The pool keeps spawn order so the oldest
//! particle is evicted first once the cap is reached, and it keeps animating
//! while the run is paused behind an overlay.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::Rect;
use crate::consts::{CONFETTI_CLEANUP_MARGIN, MAX_PARTICLES, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::renderer::vertex::with_alpha;
use crate::renderer::{Color, Surface, colors};

/// Rotation state for spinning particles (sparkles, confetti)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Current angle (radians)
    pub angle: f32,
    /// Radians added per frame
    pub speed: f32,
}

/// A single visual particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Units per frame
    pub vel: Vec2,
    /// Remaining life, 1 at spawn; removed once it reaches 0
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
    /// Side of the drawn square
    pub size: f32,
    pub color: Color,
    pub spin: Option<Spin>,
    /// Removed once it falls below the visible area (confetti)
    pub ground_cleanup: bool,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, decay: f32, size: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            life: 1.0,
            decay,
            size,
            color,
            spin: None,
            ground_cleanup: false,
        }
    }

    pub fn with_spin(mut self, angle: f32, speed: f32) -> Self {
        self.spin = Some(Spin { angle, speed });
        self
    }

    pub fn with_ground_cleanup(mut self) -> Self {
        self.ground_cleanup = true;
        self
    }

    /// Advance one frame
    fn update(&mut self) {
        self.life -= self.decay;
        self.pos += self.vel;
        if let Some(spin) = &mut self.spin {
            spin.angle += spin.speed;
        }
    }

    fn is_alive(&self, visible_height: f32) -> bool {
        if self.life <= 0.0 {
            return false;
        }
        !(self.ground_cleanup && self.pos.y > visible_height + CONFETTI_CLEANUP_MARGIN)
    }

    /// Corners of the drawn square in screen space
    fn corners(&self, camera_x: f32) -> [Vec2; 4] {
        let center = Vec2::new(self.pos.x - camera_x, self.pos.y);
        let half = self.size / 2.0;
        let angle = self.spin.map(|s| s.angle).unwrap_or(0.0);
        let rot = Vec2::from_angle(angle);
        [
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]
        .map(|corner| center + rot.rotate(corner))
    }
}

/// Bounded FIFO pool of particles plus the emission recipes
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: VecDeque<Particle>,
    capacity: usize,
    /// Height of the visible area, for confetti cleanup
    visible_height: f32,
    /// Width of the visible area, for confetti spread
    visible_width: f32,
    /// Visual-only RNG, seeded so runs are reproducible
    rng: Pcg32,
    /// When false, emission is a no-op (user setting)
    enabled: bool,
}

impl ParticlePool {
    pub fn new(seed: u64) -> Self {
        Self::with_capacity(MAX_PARTICLES, seed)
    }

    pub fn with_capacity(capacity: usize, seed: u64) -> Self {
        Self {
            particles: VecDeque::with_capacity(capacity),
            capacity,
            visible_height: VIEWPORT_HEIGHT,
            visible_width: VIEWPORT_WIDTH,
            rng: Pcg32::seed_from_u64(seed),
            enabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles in spawn order (oldest first)
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Add a particle, evicting the oldest one when the pool is full
    pub fn emit(&mut self, particle: Particle) {
        if !self.enabled || self.capacity == 0 {
            return;
        }
        if self.particles.len() >= self.capacity {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Decay, move and spin every particle, then drop the dead ones
    pub fn advance(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.update();
        }
        let visible_height = self.visible_height;
        self.particles.retain(|p| p.is_alive(visible_height));
    }

    /// Draw every particle as a square, faded by its remaining life
    pub fn render(&self, surface: &mut dyn Surface, camera_x: f32) {
        for particle in &self.particles {
            let alpha = particle.life.clamp(0.0, 1.0);
            let color = with_alpha(particle.color, alpha);
            if particle.spin.is_some() {
                surface.fill_polygon(&particle.corners(camera_x), color);
            } else {
                let center = Vec2::new(particle.pos.x - camera_x, particle.pos.y);
                surface.fill_rect(Rect::centered(center, particle.size, particle.size), color);
            }
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Uniform value in `[-spread/2, spread/2)`
    fn jitter(&mut self, spread: f32) -> f32 {
        (self.rng.random::<f32>() - 0.5) * spread
    }

    fn pick(&mut self, palette: &[Color]) -> Color {
        palette[self.rng.random_range(0..palette.len())]
    }

    /// 1-2 particles drifting opposite the player's motion
    pub fn emit_trail(&mut self, player: &Rect, vel: Vec2) -> usize {
        let count = self.rng.random_range(1..=2);
        let center = player.center();
        for _ in 0..count {
            let pos = Vec2::new(
                center.x + self.jitter(player.w * 0.5),
                center.y + self.jitter(player.h * 0.5),
            );
            let drift = Vec2::new(
                -vel.x * 0.2 + self.jitter(0.5),
                -vel.y * 0.2 + self.jitter(0.5),
            );
            let decay = self.rng.random_range(0.02..0.03);
            let size = self.rng.random_range(3.0..6.0);
            self.emit(Particle::new(pos, drift, decay, size, colors::PURPLE));
        }
        count
    }

    /// 8-12 particles radiating from an impact point at even angular steps
    pub fn emit_explosion(&mut self, at: Vec2) -> usize {
        let count = self.rng.random_range(8..=12);
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32 + self.jitter(0.5);
            let speed = self.rng.random_range(2.0..5.0);
            let color = self.pick(&colors::EXPLOSION);
            let decay = self.rng.random_range(0.015..0.025);
            let size = self.rng.random_range(3.0..8.0);
            self.emit(Particle::new(at, Vec2::from_angle(angle) * speed, decay, size, color));
        }
        count
    }

    /// 5-8 spinning particles floating up from a pickup
    pub fn emit_sparkle(&mut self, at: Vec2) -> usize {
        let count = self.rng.random_range(5..=8);
        for _ in 0..count {
            let color = self.pick(&colors::SPARKLE);
            let pos = at + Vec2::new(self.jitter(20.0), self.jitter(20.0));
            let vel = Vec2::new(self.jitter(2.0), -2.0 - self.rng.random::<f32>() * 2.0);
            let decay = self.rng.random_range(0.02..0.03);
            let size = self.rng.random_range(4.0..8.0);
            let angle = self.rng.random::<f32>() * TAU;
            let spin = self.jitter(0.2);
            self.emit(Particle::new(pos, vel, decay, size, color).with_spin(angle, spin));
        }
        count
    }

    /// 30-50 long-lived confetti pieces falling from above the visible area
    pub fn emit_confetti(&mut self, camera_x: f32) -> usize {
        let count = self.rng.random_range(30..=50);
        for _ in 0..count {
            let color = self.pick(&colors::CONFETTI);
            let pos = Vec2::new(
                camera_x + self.rng.random::<f32>() * self.visible_width,
                -20.0 - self.rng.random::<f32>() * 50.0,
            );
            let vel = Vec2::new(self.jitter(3.0), 1.0 + self.rng.random::<f32>() * 2.0);
            let decay = self.rng.random_range(0.005..0.01);
            let size = self.rng.random_range(6.0..12.0);
            let angle = self.rng.random::<f32>() * TAU;
            let spin = self.jitter(0.15);
            self.emit(
                Particle::new(pos, vel, decay, size, color)
                    .with_spin(angle, spin)
                    .with_ground_cleanup(),
            );
        }
        count
    }
}
