//! Fixed timestep simulation tick
//!
//! One tick: countdown, jitter impulses, ring rotation, physics step (with
//! contact handling), breach detection, particle update, match evaluation.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::breach::detect_breaches;
use super::particle::{spawn_ring_burst, update_particles};
use super::physics::{Arena, Body, Contact, ContactListener};
use super::state::{launch_velocity, MatchPhase, MatchState, SimEvent, Simulation};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Mutable context handed to the physics step for contact callbacks.
///
/// Counts hits, queues events, and defers ball spawns until the step returns.
pub struct ContactContext<'a> {
    pub state: &'a mut MatchState,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<SimEvent>,
    /// Spawn positions queued during this step
    pub spawns: Vec<Vec2>,
    /// Radius new balls are scattered within
    pub spawn_radius: f32,
    pub ball_radius: f32,
}

impl ContactListener for ContactContext<'_> {
    fn begin_contact(&mut self, contact: Contact, arena: &Arena) {
        match (contact.a, contact.b) {
            (Body::Ball(ball), Body::Ring { index: ring, .. }) => {
                self.state.hit_count += 1;
                self.events.push(SimEvent::RingHit { ball, ring });
            }
            (Body::Ball(a), Body::Ball(b)) => {
                if arena.len() + self.spawns.len() >= MAX_BALLS {
                    return;
                }
                self.state.hit_count += 1;
                self.events.push(SimEvent::BallHit { a, b });

                let (Some(pa), Some(pb)) = (arena.ball(a), arena.ball(b)) else {
                    return;
                };
                let pos = choose_spawn_point(
                    self.rng,
                    self.spawn_radius,
                    self.ball_radius,
                    [pa.pos, pb.pos],
                );
                self.spawns.push(pos);
            }
            _ => {}
        }
    }
}

/// Pick a spawn point in the band [R/2, R] around the center, preferring one
/// at least [`SPAWN_CLEARANCE`] ball radii from both parents. Falls back to
/// the last candidate once the attempts run out.
pub fn choose_spawn_point(
    rng: &mut impl Rng,
    enclosing_radius: f32,
    ball_radius: f32,
    parents: [Vec2; 2],
) -> Vec2 {
    let min_dist = SPAWN_CLEARANCE * ball_radius;
    let mut candidate = Vec2::ZERO;

    for _ in 0..SPAWN_ATTEMPTS {
        let theta = rng.random_range(0.0..TAU);
        let r = rng.random_range(enclosing_radius * 0.5..=enclosing_radius);
        candidate = polar_to_cartesian(r, theta);
        if parents.iter().all(|p| candidate.distance(*p) >= min_dist) {
            break;
        }
    }
    candidate
}

/// Advance the simulation by one fixed timestep
pub fn tick(sim: &mut Simulation, dt: f32) {
    sim.events.clear();
    if sim.state.is_over() {
        return;
    }

    sim.state.time_left -= dt;

    // Small random kick to every ball
    let strength = JITTER_IMPULSE * dt;
    for ball in sim.arena.balls_mut() {
        let angle = sim.rng.random_range(0.0..TAU);
        ball.apply_impulse(polar_to_cartesian(strength, angle));
    }

    sim.rings.step(dt);

    let spawn_radius = sim.spawn_radius();
    let mut ctx = ContactContext {
        state: &mut sim.state,
        rng: &mut sim.rng,
        events: &mut sim.events,
        spawns: Vec::new(),
        spawn_radius,
        ball_radius: sim.config.ball_radius,
    };
    sim.arena.step(&sim.rings, dt, &mut ctx);
    let spawns = ctx.spawns;

    for pos in spawns {
        let vel = launch_velocity(&mut sim.rng, sim.config.ball_speed);
        let id = sim.arena.add_ball(pos, vel, sim.config.ball_radius);
        sim.events.push(SimEvent::BallSpawned { id });
    }

    let outcome = detect_breaches(&mut sim.rings, sim.arena.balls(), &mut sim.state.active_index);
    if let Some(cause) = outcome.cause() {
        for &index in outcome.destroyed() {
            if let Some(ring) = sim.rings.get(index) {
                spawn_ring_burst(&mut sim.particles, ring, &sim.config.particles, &mut sim.rng);
            }
            log::info!("Ring {} destroyed ({:?})", index, cause);
            sim.events.push(SimEvent::RingDestroyed { index, cause });
        }
    }
    if outcome.boosts_balls() {
        sim.arena.scale_velocities(RING_CLEAR_BOOST);
        sim.events.push(SimEvent::BallsBoosted {
            factor: RING_CLEAR_BOOST,
        });
    }

    update_particles(&mut sim.particles, dt);

    let phase = sim.state.evaluate(sim.rings.len());
    if phase != MatchPhase::Running {
        log::info!(
            "Match over: {:?} (hits {}, active index {}, {:.1}s left)",
            phase,
            sim.state.hit_count,
            sim.state.active_index,
            sim.state.time_left
        );
        sim.events.push(SimEvent::PhaseChanged(phase));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::ring::{Ring, RingSet};
    use crate::sim::state::{DestroyCause, SimConfig};
    use rand::SeedableRng;
    use std::f32::consts::PI;

    fn config(ring_count: usize) -> SimConfig {
        let settings = Settings {
            ring_count,
            ball_radius: 6.0,
            base_multiplier: 10.0,
            initial_balls: 0,
            particle_count: 20,
            countdown: 10.0,
            ..Default::default()
        };
        SimConfig::from_settings(&settings)
    }

    /// Stationary rings at 60 + 6i, solid over [0, 3π/2]
    fn fixed_sim(ring_count: usize) -> Simulation {
        let cfg = config(ring_count);
        let rings = (0..ring_count)
            .map(|i| Ring::new(60.0 + 6.0 * i as f32, 0.0, 1.5 * PI, 0.0, 32))
            .collect();
        let rings = RingSet::new(rings, 60.0, 6.0);
        let arena = Arena::new(1.0);
        let state = MatchState::new(cfg.countdown);
        Simulation::from_parts(cfg, rings, arena, state, Pcg32::seed_from_u64(42))
    }

    #[test]
    fn test_countdown_loses() {
        let mut sim = fixed_sim(3);
        sim.state.time_left = 0.01;
        tick(&mut sim, SIM_DT);
        assert_eq!(sim.phase(), MatchPhase::Lost);
        assert!(sim.events.contains(&SimEvent::PhaseChanged(MatchPhase::Lost)));

        // No further updates once over
        let before = sim.state.time_left;
        tick(&mut sim, SIM_DT);
        assert_eq!(sim.state.time_left, before);
        assert!(sim.events.is_empty());
    }

    #[test]
    fn test_breach_spawns_particles_and_boosts() {
        let mut sim = fixed_sim(3);
        // Just inside ring 0 in the gap, heading out fast
        let pos = polar_to_cartesian(55.5, 1.75 * PI);
        let vel = polar_to_cartesian(120.0, 1.75 * PI);
        sim.arena.add_ball(pos, vel, 6.0);

        tick(&mut sim, SIM_DT);

        assert_eq!(sim.state.active_index, 1);
        assert!(!sim.rings.get(0).unwrap().active);
        assert_eq!(sim.particles.len(), 20);
        assert!(sim.events.contains(&SimEvent::RingDestroyed {
            index: 0,
            cause: DestroyCause::Breach
        }));
        assert!(sim.events.contains(&SimEvent::BallsBoosted { factor: RING_CLEAR_BOOST }));
        // 120 plus at most a jitter kick of 100 * dt, then boosted
        let speed = sim.arena.balls()[0].vel.length();
        assert!(speed > 118.0 * RING_CLEAR_BOOST);
    }

    #[test]
    fn test_skip_spawns_particles_per_ring_without_boost() {
        let mut sim = fixed_sim(4);
        // In every ring's gap, outer edge already past rings 0 and 1
        let pos = polar_to_cartesian(69.5, 1.75 * PI);
        let vel = polar_to_cartesian(30.0, 1.75 * PI);
        sim.arena.add_ball(pos, vel, 6.0);

        tick(&mut sim, SIM_DT);

        assert_eq!(sim.state.active_index, 2);
        let destroyed: Vec<usize> = sim
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::RingDestroyed { index, cause: DestroyCause::Skip } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(destroyed, vec![0, 1]);
        assert_eq!(sim.particles.len(), 40);
        assert!(!sim.events.iter().any(|e| matches!(e, SimEvent::BallsBoosted { .. })));
    }

    #[test]
    fn test_ball_contact_spawns_ball() {
        let mut sim = fixed_sim(2);
        sim.arena.add_ball(Vec2::new(-5.0, 0.0), Vec2::new(1.0, 0.0), 6.0);
        sim.arena.add_ball(Vec2::new(5.0, 0.0), Vec2::new(-1.0, 0.0), 6.0);

        tick(&mut sim, SIM_DT);

        assert_eq!(sim.arena.len(), 3);
        assert_eq!(sim.state.hit_count, 1);
        assert!(sim.events.iter().any(|e| matches!(e, SimEvent::BallSpawned { .. })));
        let spawned = &sim.arena.balls()[2];
        let r = spawned.pos.length();
        assert!(r >= 30.0 - 1.0 && r <= 60.0 + 1.0);
    }

    #[test]
    fn test_ring_joint_counts_both_segments() {
        let mut sim = fixed_sim(2);
        // Joint between segments 7 and 8 of ring 0 (32 segments over 3π/2)
        let joint = 8.0 * 1.5 * PI / 32.0;
        sim.arena.add_ball(polar_to_cartesian(53.0, joint), Vec2::ZERO, 6.0);

        tick(&mut sim, SIM_DT);

        assert_eq!(sim.state.hit_count, 2);
        let ring_hits = sim
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::RingHit { ring: 0, .. }))
            .count();
        assert_eq!(ring_hits, 2);
    }

    #[test]
    fn test_ball_population_is_capped() {
        let mut sim = fixed_sim(2);
        // Pack the center with overlapping balls
        for i in 0..MAX_BALLS {
            let angle = i as f32 * 0.37;
            sim.arena.add_ball(polar_to_cartesian(i as f32 * 0.2, angle), Vec2::ZERO, 6.0);
        }
        for _ in 0..10 {
            tick(&mut sim, SIM_DT);
            assert!(sim.arena.len() <= MAX_BALLS);
        }
    }

    #[test]
    fn test_cap_allows_exactly_one_more() {
        let mut sim = fixed_sim(2);
        for i in 0..MAX_BALLS - 5 {
            sim.arena.add_ball(polar_to_cartesian(40.0, i as f32 * 0.06), Vec2::ZERO, 1.0);
        }
        // Two overlapping pairs would ask for two spawns; only one fits
        sim.arena.add_ball(Vec2::new(-2.0, 0.0), Vec2::ZERO, 1.0);
        sim.arena.add_ball(Vec2::new(-2.0, 0.5), Vec2::ZERO, 1.0);
        sim.arena.add_ball(Vec2::new(2.0, 0.0), Vec2::ZERO, 1.0);
        sim.arena.add_ball(Vec2::new(2.0, 0.5), Vec2::ZERO, 1.0);
        assert_eq!(sim.arena.len(), MAX_BALLS - 1);

        tick(&mut sim, SIM_DT);
        assert_eq!(sim.arena.len(), MAX_BALLS);
        assert_eq!(sim.state.hit_count, 1);
    }

    #[test]
    fn test_spawn_point_clears_parents() {
        let mut rng = Pcg32::seed_from_u64(5);
        let parents = [Vec2::new(50.0, 0.0), Vec2::new(-50.0, 0.0)];
        for _ in 0..100 {
            let p = choose_spawn_point(&mut rng, 100.0, 6.0, parents);
            let r = p.length();
            assert!((50.0 - 1e-3..=100.0 + 1e-3).contains(&r));
        }
    }

    #[test]
    fn test_spawn_radius_tracks_active_ring() {
        let mut sim = fixed_sim(3);
        assert_eq!(sim.spawn_radius(), 60.0);
        sim.state.active_index = 2;
        assert_eq!(sim.spawn_radius(), 72.0);
        sim.state.active_index = 40;
        assert_eq!(sim.spawn_radius(), 72.0);
    }

    #[test]
    fn test_rings_rotate_each_tick() {
        let cfg = config(3);
        let sim_rings = RingSet::new(vec![Ring::new(60.0, 0.0, 5.0, 1.0, 8)], 60.0, 6.0);
        let mut sim = Simulation::from_parts(
            cfg,
            sim_rings,
            Arena::new(1.0),
            MatchState::new(10.0),
            Pcg32::seed_from_u64(1),
        );
        tick(&mut sim, 0.5);
        assert!((sim.rings.get(0).unwrap().rotation - 0.5).abs() < 1e-6);
    }
}
