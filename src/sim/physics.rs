//! Rigid-body arena for balls bouncing against rings and each other
//!
//! Balls are unit-mass circles integrated with a fixed timestep; ring
//! segments are kinematic and never pushed back. Contacts are fully elastic.
//! Begin-of-contact events are reported once per touching pair, after the
//! step has finished moving bodies, so listeners may queue new bodies freely.

use std::collections::HashSet;
use std::fmt;

use glam::Vec2;

use super::collision::{
    CollisionResult, ball_ball_collision, ball_segment_collision, reflect_velocity,
};
use super::ring::RingSet;
use super::state::Ball;
use crate::consts::RING_THICKNESS;

/// Logical identity of a colliding shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Ball(u32),
    /// One straight segment of a ring's solid arc
    Ring { index: usize, segment: usize },
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Ball(id) => write!(f, "ball#{id}"),
            Body::Ring { index, segment } => write!(f, "ring#{index}/{segment}"),
        }
    }
}

/// A pair of bodies that started touching this step.
/// For ball-ring contacts `a` is always the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
}

impl Contact {
    fn new(a: Body, b: Body) -> Self {
        match (a, b) {
            (Body::Ring { .. }, Body::Ball(_)) => Self { a: b, b: a },
            (Body::Ball(x), Body::Ball(y)) if y < x => Self { a: b, b: a },
            _ => Self { a, b },
        }
    }
}

/// Collision geometry of one active ring for a single step
struct RingShape {
    index: usize,
    radius: f32,
    sagitta: f32,
    points: Vec<Vec2>,
}

/// Receives begin-of-contact notifications during [`Arena::step`]
pub trait ContactListener {
    fn begin_contact(&mut self, contact: Contact, arena: &Arena);
}

/// Ignores every contact
impl ContactListener for () {
    fn begin_contact(&mut self, _contact: Contact, _arena: &Arena) {}
}

/// The ball world
#[derive(Debug, Clone)]
pub struct Arena {
    balls: Vec<Ball>,
    /// Fraction of velocity kept per second
    damping: f32,
    /// Pairs touching at the end of the previous step
    touching: HashSet<Contact>,
    next_id: u32,
}

impl Arena {
    pub fn new(damping: f32) -> Self {
        Self {
            balls: Vec::new(),
            damping,
            touching: HashSet::new(),
            next_id: 1,
        }
    }

    /// Add a ball and return its id
    pub fn add_ball(&mut self, pos: Vec2, vel: Vec2, radius: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.balls.push(Ball::new(id, pos, vel, radius));
        id
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Multiply every ball's velocity by `factor`
    pub fn scale_velocities(&mut self, factor: f32) {
        for ball in &mut self.balls {
            ball.vel *= factor;
        }
    }

    /// Advance all balls by `dt`, resolve contacts against the active rings
    /// and between balls, then report newly begun contacts
    pub fn step<L: ContactListener>(&mut self, rings: &RingSet, dt: f32, listener: &mut L) {
        let retain = self.damping.powf(dt);
        for ball in &mut self.balls {
            ball.vel *= retain;
            ball.pos += ball.vel * dt;
        }

        let mut touching = HashSet::new();
        self.resolve_ring_contacts(rings, &mut touching);
        self.resolve_ball_contacts(&mut touching);

        let mut begun: Vec<Contact> = touching.difference(&self.touching).copied().collect();
        begun.sort();
        self.touching = touching;

        for contact in begun {
            log::trace!("contact begin: {} <-> {}", contact.a, contact.b);
            listener.begin_contact(contact, self);
        }
    }

    fn resolve_ring_contacts(&mut self, rings: &RingSet, touching: &mut HashSet<Contact>) {
        // World-space polylines for the rings still in play
        let shapes: Vec<RingShape> = rings
            .iter()
            .enumerate()
            .filter(|(_, ring)| ring.active)
            .map(|(index, ring)| RingShape {
                index,
                radius: ring.radius,
                sagitta: ring.chord_sagitta(),
                points: ring.world_points(),
            })
            .collect();

        for ball in &mut self.balls {
            let reach = ball.radius + RING_THICKNESS;
            for shape in &shapes {
                // Chord midpoints sit up to `sagitta` inside the circle
                let dist = ball.pos.length();
                if dist > shape.radius + reach || dist < shape.radius - shape.sagitta - reach {
                    continue;
                }

                let mut deepest = CollisionResult::miss();
                for (segment, seg) in shape.points.windows(2).enumerate() {
                    let hit = ball_segment_collision(
                        ball.pos,
                        ball.radius,
                        seg[0],
                        seg[1],
                        RING_THICKNESS,
                    );
                    if !hit.hit {
                        continue;
                    }
                    touching.insert(Contact::new(
                        Body::Ball(ball.id),
                        Body::Ring {
                            index: shape.index,
                            segment,
                        },
                    ));
                    if hit.penetration > deepest.penetration || !deepest.hit {
                        deepest = hit;
                    }
                }

                if deepest.hit {
                    ball.pos += deepest.normal * deepest.penetration;
                    if ball.vel.dot(deepest.normal) < 0.0 {
                        ball.vel = reflect_velocity(ball.vel, deepest.normal);
                    }
                }
            }
        }
    }

    fn resolve_ball_contacts(&mut self, touching: &mut HashSet<Contact>) {
        let n = self.balls.len();
        for j in 1..n {
            let (left, right) = self.balls.split_at_mut(j);
            let b = &mut right[0];
            for a in left.iter_mut() {
                let hit = ball_ball_collision(a.pos, a.radius, b.pos, b.radius);
                if !hit.hit {
                    continue;
                }

                let normal = hit.normal;
                a.pos += normal * (hit.penetration / 2.0);
                b.pos -= normal * (hit.penetration / 2.0);

                // Equal masses: exchange the velocity components along the normal
                let approach = (a.vel - b.vel).dot(normal);
                if approach < 0.0 {
                    a.vel -= normal * approach;
                    b.vel += normal * approach;
                }

                touching.insert(Contact::new(Body::Ball(a.id), Body::Ball(b.id)));
            }
        }
    }
}
