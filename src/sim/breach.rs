//! Ring breach detection
//!
//! Run once per tick after the physics step. Two paths:
//!
//! 1. Skip: if any outward-moving ball's outer edge is already beyond one or
//!    more rings starting at the active index, all of those rings are
//!    destroyed without looking at gap angles, and the active index jumps to
//!    the furthest escape index (which may lie past the last ring).
//! 2. Precise breach: otherwise only the active ring is tested. The first
//!    outward-moving ball that reaches its radius inside the current gap
//!    destroys it and the active index advances by one.
//!
//! The skip path trades accuracy for progress: a ring can be taken out even
//! when the ball never lined up with its gap.

use super::ring::RingSet;
use super::state::{Ball, DestroyCause};
use crate::cartesian_to_polar;

/// What the detector did this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreachOutcome {
    None,
    /// Rings in `[from, min(to, N))` that were still active got destroyed
    Skipped {
        from: usize,
        to: usize,
        destroyed: Vec<usize>,
    },
    /// The active ring was breached through its gap
    Breached { ring: usize, ball: u32 },
}

impl BreachOutcome {
    /// Indices of rings destroyed this tick, in order
    pub fn destroyed(&self) -> &[usize] {
        match self {
            BreachOutcome::None => &[],
            BreachOutcome::Skipped { destroyed, .. } => destroyed,
            BreachOutcome::Breached { ring, .. } => std::slice::from_ref(ring),
        }
    }

    pub fn cause(&self) -> Option<DestroyCause> {
        match self {
            BreachOutcome::None => None,
            BreachOutcome::Skipped { .. } => Some(DestroyCause::Skip),
            BreachOutcome::Breached { .. } => Some(DestroyCause::Breach),
        }
    }

    /// Only a precise breach speeds the balls up
    pub fn boosts_balls(&self) -> bool {
        matches!(self, BreachOutcome::Breached { .. })
    }
}

/// Index of the outermost ring slot the ball's outer edge has reached, if the
/// ball is moving outward. Negative while still inside the first ring.
pub fn escape_index(ball: &Ball, base_radius: f32, spacing: f32) -> Option<i64> {
    let radial = ball.radial_speed()?;
    if radial <= 0.0 {
        return None;
    }
    Some(((ball.outer_edge() - base_radius) / spacing).floor() as i64)
}

/// Largest escape index over all outward-moving balls
pub fn max_escape_index(balls: &[Ball], base_radius: f32, spacing: f32) -> Option<i64> {
    balls
        .iter()
        .filter_map(|ball| escape_index(ball, base_radius, spacing))
        .max()
}

/// Run both detection paths, destroying rings and advancing `active_index`
pub fn detect_breaches(
    rings: &mut RingSet,
    balls: &[Ball],
    active_index: &mut usize,
) -> BreachOutcome {
    let from = *active_index;

    let max_escape = max_escape_index(balls, rings.base_radius(), rings.spacing());
    if let Some(to) = max_escape.filter(|&m| m > from as i64).map(|m| m as usize) {
        let destroyed: Vec<usize> = (from..to.min(rings.len()))
            .filter(|&i| rings.get_mut(i).is_some_and(|ring| ring.destroy()))
            .collect();
        *active_index = to;

        log::debug!(
            "Skip: active index {} -> {}, destroyed {:?}",
            from,
            to,
            destroyed
        );
        return BreachOutcome::Skipped { from, to, destroyed };
    }

    let Some(ring) = rings.get_mut(from) else {
        return BreachOutcome::None;
    };
    if !ring.active {
        return BreachOutcome::None;
    }

    let breacher = balls.iter().find(|ball| {
        let outward = ball.radial_speed().is_some_and(|v| v > 0.0);
        if !outward || ball.outer_edge() < ring.radius {
            return false;
        }
        let (_, theta) = cartesian_to_polar(ball.pos);
        ring.gap_contains(theta)
    });

    match breacher {
        Some(ball) => {
            ring.destroy();
            *active_index = from + 1;
            log::debug!("Breach: ring {} by ball#{}", from, ball.id);
            BreachOutcome::Breached {
                ring: from,
                ball: ball.id,
            }
        }
        None => BreachOutcome::None,
    }
}
