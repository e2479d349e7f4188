//! Rotating ring barriers
//!
//! A ring is a circle of fixed radius with a solid arc and a gap. The solid
//! arc runs from `arc_start` for `arc_length` radians in the ring's local
//! frame; the whole ring turns by `rotation` radians in world space.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::consts::*;
use crate::{angle_in_range, polar_to_cartesian, wrap_angle};

/// A rotating, partially open circular barrier
#[derive(Debug, Clone)]
pub struct Ring {
    /// Distance from the common center
    pub radius: f32,
    /// Start of the solid arc (local frame, radians)
    pub arc_start: f32,
    /// Angular extent of the solid arc, in (0, 2π)
    pub arc_length: f32,
    /// Accumulated rotation, kept in [0, 2π)
    pub rotation: f32,
    /// Signed rotation speed (radians/sec)
    pub angular_velocity: f32,
    /// False once destroyed; inactive rings neither collide nor draw
    pub active: bool,
    /// Polyline approximation of the solid arc in the local frame
    points: Vec<Vec2>,
}

impl Ring {
    pub fn new(
        radius: f32,
        arc_start: f32,
        arc_length: f32,
        angular_velocity: f32,
        segments: usize,
    ) -> Self {
        let segments = segments.max(1);
        let points = (0..=segments)
            .map(|i| {
                let a = arc_start + arc_length * i as f32 / segments as f32;
                polar_to_cartesian(radius, a)
            })
            .collect();

        Self {
            radius,
            arc_start,
            arc_length,
            rotation: 0.0,
            angular_velocity,
            active: true,
            points,
        }
    }

    /// A ring with random solid fraction, start angle and spin
    pub fn random(rng: &mut impl Rng, radius: f32, segments: usize) -> Self {
        let fraction = rng.random_range(ARC_FRACTION_MIN..=ARC_FRACTION_MAX);
        let arc_start = rng.random_range(0.0..TAU);
        let mut speed = rng.random_range(RING_SPEED_MIN..=RING_SPEED_MAX);
        if rng.random_bool(0.5) {
            speed = -speed;
        }
        Self::new(radius, arc_start, TAU * fraction, speed, segments)
    }

    #[inline]
    pub fn gap_length(&self) -> f32 {
        TAU - self.arc_length
    }

    /// Current world-space gap boundaries, each in [0, 2π)
    pub fn gap_angles(&self) -> (f32, f32) {
        let gap_start = wrap_angle(self.arc_start + self.arc_length + self.rotation);
        let gap_end = wrap_angle(self.arc_start + TAU + self.rotation);
        (gap_start, gap_end)
    }

    /// Whether a world-space angle currently falls in the gap
    pub fn gap_contains(&self, theta: f32) -> bool {
        let (start, end) = self.gap_angles();
        angle_in_range(theta, start, end)
    }

    /// World-space span of the solid arc, unwrapped (start < end)
    pub fn solid_span(&self) -> (f32, f32) {
        let start = self.arc_start + self.rotation;
        (start, start + self.arc_length)
    }

    /// Advance the rotation by one timestep
    pub fn step(&mut self, dt: f32) {
        self.rotation = wrap_angle(self.rotation + self.angular_velocity * dt);
    }

    /// Take the ring out of play. Returns false if it was already gone.
    pub fn destroy(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// Solid arc polyline in world space (relative to the ring center)
    pub fn world_points(&self) -> Vec<Vec2> {
        let rot = Vec2::from_angle(self.rotation);
        self.points.iter().map(|&p| rot.rotate(p)).collect()
    }

    /// Number of straight segments approximating the solid arc
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// How far each chord's midpoint sits inside the circle
    pub fn chord_sagitta(&self) -> f32 {
        let half_angle = self.arc_length / (2.0 * self.segment_count() as f32);
        self.radius * (1.0 - half_angle.cos())
    }
}

/// Rings ordered by increasing radius; index order is destruction order
#[derive(Debug, Clone)]
pub struct RingSet {
    rings: Vec<Ring>,
    base_radius: f32,
    spacing: f32,
}

impl RingSet {
    /// Build from explicit rings. Radii must be strictly increasing.
    pub fn new(rings: Vec<Ring>, base_radius: f32, spacing: f32) -> Self {
        debug_assert!(rings.windows(2).all(|w| w[0].radius < w[1].radius));
        Self {
            rings,
            base_radius,
            spacing,
        }
    }

    /// Generate `count` random rings at `base_radius + i * spacing`
    pub fn generate(
        rng: &mut impl Rng,
        count: usize,
        base_radius: f32,
        spacing: f32,
        segments: usize,
    ) -> Self {
        let rings = (0..count)
            .map(|i| Ring::random(rng, base_radius + i as f32 * spacing, segments))
            .collect();
        log::info!(
            "Generated {} rings: radius {} to {}",
            count,
            base_radius,
            base_radius + count.saturating_sub(1) as f32 * spacing
        );
        Self::new(rings, base_radius, spacing)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Radius of the outermost ring
    pub fn outer_radius(&self) -> f32 {
        self.base_radius + self.len().saturating_sub(1) as f32 * self.spacing
    }

    pub fn get(&self, index: usize) -> Option<&Ring> {
        self.rings.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Ring> {
        self.rings.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter()
    }

    /// Rings still in play
    pub fn active_count(&self) -> usize {
        self.rings.iter().filter(|r| r.active).count()
    }

    /// Rotate every ring
    pub fn step(&mut self, dt: f32) {
        for ring in &mut self.rings {
            ring.step(dt);
        }
    }
}
