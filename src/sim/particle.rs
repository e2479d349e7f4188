//! Burst particles spawned when a ring is destroyed
//!
//! Purely visual: particles never touch the physics arena or the rings.

use glam::Vec2;
use rand::Rng;

use super::ring::Ring;
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::settings::Rgb;

/// Appearance and size of a ring burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleStyle {
    /// Particles per destroyed ring
    pub count: usize,
    pub radius: f32,
    pub color: Rgb,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub lifetime: f32,
    pub radius: f32,
    pub color: Rgb,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.lifetime -= dt;
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }
}

/// Emit `style.count` particles along the ring's solid arc, flying outward
pub fn spawn_ring_burst(
    particles: &mut Vec<Particle>,
    ring: &Ring,
    style: &ParticleStyle,
    rng: &mut impl Rng,
) {
    let (start, end) = ring.solid_span();
    particles.reserve(style.count);

    for _ in 0..style.count {
        let angle = rng.random_range(start..=end);
        let speed = rng.random_range(PARTICLE_MIN_SPEED..=PARTICLE_MAX_SPEED);
        particles.push(Particle {
            pos: polar_to_cartesian(ring.radius, angle),
            vel: polar_to_cartesian(speed, angle),
            lifetime: PARTICLE_LIFETIME,
            radius: style.radius,
            color: style.color,
        });
    }
}

/// Advance every particle and drop the expired ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.update(dt);
    }
    particles.retain(Particle::is_alive);
}
