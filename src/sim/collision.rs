//! Narrow-phase collision tests for balls against ring segments and each other
//!
//! Ring arcs are approximated by straight segments with a small radius
//! (capsules). Every test reports a normal pointing toward the ball being
//! pushed, so resolution is `pos += normal * penetration`.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the other shape
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against a capsule segment from `a` to `b` with radius `thickness`
pub fn ball_segment_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    a: Vec2,
    b: Vec2,
    thickness: f32,
) -> CollisionResult {
    let line_vec = b - a;
    let ball_vec = ball_pos - a;
    let line_len_sq = line_vec.length_squared();

    let t = if line_len_sq < 0.0001 {
        0.0
    } else {
        (ball_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0)
    };
    let closest = a + line_vec * t;
    let offset = ball_pos - closest;
    let dist = offset.length();
    let reach = ball_radius + thickness;

    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        // Ball center is on the segment: push along the segment's perpendicular,
        // away from the origin the rings are centered on
        let perp = line_vec.perp().normalize_or_zero();
        if perp.dot(closest) < 0.0 { -perp } else { perp }
    };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: reach - dist,
    }
}

/// Check two balls against each other. The normal points from `b` toward `a`.
pub fn ball_ball_collision(
    pos_a: Vec2,
    radius_a: f32,
    pos_b: Vec2,
    radius_b: f32,
) -> CollisionResult {
    let offset = pos_a - pos_b;
    let dist = offset.length();
    let reach = radius_a + radius_b;

    if dist >= reach {
        return CollisionResult::miss();
    }

    // Coincident centers get an arbitrary but stable axis
    let normal = if dist > 1e-6 { offset / dist } else { Vec2::X };

    CollisionResult {
        hit: true,
        point: pos_b + normal * radius_b,
        normal,
        penetration: reach - dist,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
