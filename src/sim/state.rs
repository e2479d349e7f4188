//! Simulation state and core types

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::particle::{Particle, ParticleStyle};
use super::physics::Arena;
use super::ring::RingSet;
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::settings::Settings;

/// A dynamic ball. Position and velocity are owned by the physics arena.
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { id, pos, vel, radius }
    }

    /// Unit-mass impulse
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse;
    }

    /// Speed along the outward radial direction, or None at the exact center
    pub fn radial_speed(&self) -> Option<f32> {
        let len = self.pos.length();
        if len > 0.0 {
            Some(self.vel.dot(self.pos / len))
        } else {
            None
        }
    }

    /// Distance from the center to the far edge of the ball
    #[inline]
    pub fn outer_edge(&self) -> f32 {
        self.pos.length() + self.radius
    }
}

/// Velocity of a freshly launched ball: fixed speed, random heading
pub fn launch_velocity(rng: &mut impl Rng, speed: f32) -> Vec2 {
    let angle = rng.random_range(0.0..TAU);
    polar_to_cartesian(speed, angle)
}

/// Match progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Running,
    Won,
    Lost,
}

/// How a ring left play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyCause {
    /// A ball passed outward through the gap
    Breach,
    /// A ball's outer edge was already beyond the ring
    Skip,
}

/// Side effects of a tick, consumed by audio and logging
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A ball began touching a ring segment
    RingHit { ball: u32, ring: usize },
    /// Two balls began touching
    BallHit { a: u32, b: u32 },
    BallSpawned { id: u32 },
    RingDestroyed { index: usize, cause: DestroyCause },
    BallsBoosted { factor: f32 },
    PhaseChanged(MatchPhase),
}

/// Counters and the win/loss state machine
#[derive(Debug, Clone)]
pub struct MatchState {
    pub hit_count: u64,
    /// Next ring eligible for breach testing; may run past the ring count
    pub active_index: usize,
    pub time_left: f32,
    pub phase: MatchPhase,
}

impl MatchState {
    pub fn new(countdown: f32) -> Self {
        Self {
            hit_count: 0,
            active_index: 0,
            time_left: countdown,
            phase: MatchPhase::Running,
        }
    }

    /// Rings left as shown on the HUD; negative once the index over-advances
    pub fn arcs_left(&self, ring_count: usize) -> i64 {
        ring_count as i64 - self.active_index as i64
    }

    /// Apply the transition rules. Terminal phases never change.
    ///
    /// Winning needs the active index to over-advance the ring count by more
    /// than [`WIN_MARGIN`]; clearing the last ring alone keeps the match going.
    pub fn evaluate(&mut self, ring_count: usize) -> MatchPhase {
        if self.phase != MatchPhase::Running {
            return self.phase;
        }

        if self.time_left <= 0.0 {
            self.phase = MatchPhase::Lost;
        } else if self.active_index >= ring_count
            && self.arcs_left(ring_count) < -(WIN_MARGIN as i64)
        {
            self.phase = MatchPhase::Won;
        }
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase != MatchPhase::Running
    }
}

/// World parameters derived from settings
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub ring_count: usize,
    pub base_radius: f32,
    /// Distance between neighbouring rings (equals the ball radius)
    pub ring_spacing: f32,
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub initial_balls: usize,
    pub ball_damping: f32,
    pub arc_segments: usize,
    pub countdown: f32,
    pub particles: ParticleStyle,
}

impl SimConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            ring_count: settings.ring_count,
            base_radius: settings.base_radius(),
            ring_spacing: settings.ball_radius,
            ball_radius: settings.ball_radius,
            ball_speed: settings.ball_speed,
            initial_balls: settings.initial_balls,
            ball_damping: settings.ball_damping,
            arc_segments: settings.arc_smoothness,
            countdown: settings.countdown,
            particles: ParticleStyle {
                count: settings.particle_count,
                radius: settings.particle_size,
                color: settings.particle_color,
            },
        }
    }
}

/// Everything the simulation core owns
#[derive(Debug)]
pub struct Simulation {
    pub config: SimConfig,
    pub rings: RingSet,
    pub arena: Arena,
    pub particles: Vec<Particle>,
    pub state: MatchState,
    pub rng: Pcg32,
    /// Events raised by the most recent tick
    pub events: Vec<SimEvent>,
}

impl Simulation {
    /// Generate the rings and place the initial balls evenly on the inner circle
    pub fn new(config: SimConfig, mut rng: Pcg32) -> Self {
        let rings = RingSet::generate(
            &mut rng,
            config.ring_count,
            config.base_radius,
            config.ring_spacing,
            config.arc_segments,
        );

        let mut arena = Arena::new(config.ball_damping);
        let n = config.initial_balls;
        for i in 0..n {
            let theta = TAU * i as f32 / n as f32;
            let pos = polar_to_cartesian(config.base_radius, theta);
            let vel = launch_velocity(&mut rng, config.ball_speed);
            arena.add_ball(pos, vel, config.ball_radius);
        }

        let state = MatchState::new(config.countdown);
        Self::from_parts(config, rings, arena, state, rng)
    }

    /// Assemble a simulation from prepared pieces (used by tests and tools)
    pub fn from_parts(
        config: SimConfig,
        rings: RingSet,
        arena: Arena,
        state: MatchState,
        rng: Pcg32,
    ) -> Self {
        Self {
            config,
            rings,
            arena,
            particles: Vec::new(),
            state,
            rng,
            events: Vec::new(),
        }
    }

    /// Radius of the region new balls are spawned into: the active ring, or
    /// the outermost ring once every ring has been passed
    pub fn spawn_radius(&self) -> f32 {
        match self.rings.get(self.state.active_index) {
            Some(ring) => ring.radius,
            None => self.rings.outer_radius(),
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }
}
