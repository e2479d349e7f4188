//! Simulation core
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Fixed timestep only
//! - Randomness comes from an injected, seedable generator
//! - Stable iteration order (by ball id, by ring index)

pub mod breach;
pub mod collision;
pub mod particle;
pub mod physics;
pub mod ring;
pub mod state;
pub mod tick;

pub use breach::{BreachOutcome, detect_breaches, escape_index, max_escape_index};
pub use collision::{CollisionResult, ball_ball_collision, ball_segment_collision, reflect_velocity};
pub use particle::{Particle, ParticleStyle, spawn_ring_burst, update_particles};
pub use physics::{Arena, Body, Contact, ContactListener};
pub use ring::{Ring, RingSet};
pub use state::{Ball, DestroyCause, MatchPhase, MatchState, SimConfig, SimEvent, Simulation};
pub use tick::{ContactContext, choose_spawn_point, tick};
