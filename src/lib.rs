//! Ring Breach - balls bouncing inside concentric rotating rings
//!
//! Core modules:
//! - `sim`: Simulation core (rings, breach detection, particles, match state)
//! - `renderer`: Draw-call generation against an external canvas
//! - `audio`: Sound asset loading and fire-and-forget playback
//! - `platform`: Display sizing, frame pacing, input polling
//! - `app`: The fixed-timestep loop and end-of-round screen

pub mod app;
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Rgb, Settings};

use glam::Vec2;
use std::f32::consts::TAU;

/// Simulation configuration constants
pub mod consts {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Target frame rate for pacing
    pub const TARGET_FPS: u32 = 60;

    /// Velocity multiplier applied to every ball when the active ring is breached
    pub const RING_CLEAR_BOOST: f32 = 1.1;
    /// Hard cap on the ball population
    pub const MAX_BALLS: usize = 100;
    /// The active index must exceed the ring count by more than this to win
    pub const WIN_MARGIN: usize = 100;

    /// Solid fraction of each ring's circumference
    pub const ARC_FRACTION_MIN: f32 = 0.8;
    pub const ARC_FRACTION_MAX: f32 = 0.9;
    /// Ring rotation speed range (radians/sec, sign chosen at random)
    pub const RING_SPEED_MIN: f32 = FRAC_PI_4;
    pub const RING_SPEED_MAX: f32 = FRAC_PI_2;
    /// Collision radius of each ring segment
    pub const RING_THICKNESS: f32 = 2.0;

    /// Particle burst parameters
    pub const PARTICLE_LIFETIME: f32 = 1.0;
    pub const PARTICLE_MIN_SPEED: f32 = 50.0;
    pub const PARTICLE_MAX_SPEED: f32 = 150.0;

    /// Random jitter impulse per second applied to each ball
    pub const JITTER_IMPULSE: f32 = 100.0;

    /// Placement attempts for a ball spawned by a ball-ball contact
    pub const SPAWN_ATTEMPTS: u32 = 20;
    /// Minimum distance from both parents, in ball radii
    pub const SPAWN_CLEARANCE: f32 = 3.0;

    /// How long the end-of-round screen stays up (seconds)
    pub const END_SCREEN_SECONDS: f32 = 3.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Whether `angle` lies in the circular interval [start, end], inclusive.
///
/// All three values are wrapped into [0, 2π) first. When `start >= end` the
/// interval is taken to run through zero.
pub fn angle_in_range(angle: f32, start: f32, end: f32) -> bool {
    let angle = wrap_angle(angle);
    let start = wrap_angle(start);
    let end = wrap_angle(end);

    if start < end {
        angle >= start && angle <= end
    } else {
        angle >= start || angle <= end
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta), theta in [0, 2π)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), wrap_angle(pos.y.atan2(pos.x)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    /// Shortest circular distance between two angles
    fn circular_distance(a: f32, b: f32) -> f32 {
        let d = wrap_angle(a - b);
        d.min(TAU - d)
    }

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!((wrap_angle(5.0 * PI) - PI).abs() < 1e-4);
        assert!(wrap_angle(-1e-9) < TAU);
    }

    #[test]
    fn test_angle_in_range_no_wrap() {
        assert!(angle_in_range(1.0, 0.5, 1.5));
        assert!(!angle_in_range(1.6, 0.5, 1.5));
        assert!(!angle_in_range(0.4, 0.5, 1.5));
    }

    #[test]
    fn test_angle_in_range_wraparound() {
        assert!(angle_in_range(6.0, 5.5, 1.0));
        assert!(angle_in_range(0.5, 5.5, 1.0));
        assert!(!angle_in_range(3.0, 5.5, 1.0));
    }

    #[test]
    fn test_angle_in_range_inclusive_bounds() {
        assert!(angle_in_range(0.5, 0.5, 1.5));
        assert!(angle_in_range(1.5, 0.5, 1.5));
        assert!(angle_in_range(5.5, 5.5, 1.0));
        assert!(angle_in_range(1.0, 5.5, 1.0));
    }

    #[test]
    fn test_angle_in_range_unnormalized_inputs() {
        // Same interval as (5.5, 1.0), shifted by whole turns
        assert!(angle_in_range(6.0 - TAU, 5.5 + TAU, 1.0 - 2.0 * TAU));
        assert!(!angle_in_range(3.0 + TAU, 5.5 - TAU, 1.0 + TAU));
    }

    #[test]
    fn test_polar_roundtrip() {
        let p = polar_to_cartesian(10.0, 1.2);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 10.0).abs() < 1e-4);
        assert!((theta - 1.2).abs() < 1e-4);

        let (_, theta) = cartesian_to_polar(Vec2::new(0.0, -1.0));
        assert!((theta - 1.5 * PI).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_angle_in_range_periodic(
            angle in 0.0f32..TAU,
            start in 0.0f32..TAU,
            end in 0.0f32..TAU,
            ka in -3i32..=3,
            ks in -3i32..=3,
            ke in -3i32..=3,
        ) {
            // Rounding from whole-turn shifts can flip results right at a boundary
            prop_assume!(circular_distance(angle, start) > 1e-3);
            prop_assume!(circular_distance(angle, end) > 1e-3);
            prop_assume!(circular_distance(start, end) > 1e-3);

            let expected = angle_in_range(angle, start, end);
            let shifted = angle_in_range(
                angle + ka as f32 * TAU,
                start + ks as f32 * TAU,
                end + ke as f32 * TAU,
            );
            prop_assert_eq!(expected, shifted);
        }

        #[test]
        fn prop_angle_in_range_includes_endpoints(start in 0.0f32..TAU, end in 0.0f32..TAU) {
            prop_assume!(circular_distance(start, end) > 1e-3);
            prop_assert!(angle_in_range(start, start, end));
            prop_assert!(angle_in_range(end, start, end));
        }

        #[test]
        fn prop_angle_in_range_matches_plain_range(
            a in 0.0f32..TAU,
            s in 0.0f32..TAU,
            e in 0.0f32..TAU,
        ) {
            prop_assume!(s < e);
            prop_assert_eq!(angle_in_range(a, s, e), s <= a && a <= e);
        }
    }
}
