//! Turns simulation state into draw calls

use glam::Vec2;

use super::canvas::{Canvas, TextAnchor};
use crate::platform::ScreenSize;
use crate::settings::{Rgb, Settings};
use crate::sim::{MatchPhase, Simulation};

/// Ring outline width in pixels
const ARC_LINE_WIDTH: f32 = 2.0;
/// HUD font size
const HUD_TEXT_SIZE: f32 = 30.0;
/// End screen font size
const END_TEXT_SIZE: f32 = 60.0;
/// The timer is right-aligned this far from the right edge
const TIMER_INSET: f32 = 220.0;

/// Colors used when drawing
#[derive(Debug, Clone, Copy)]
pub struct SceneStyle {
    pub background: Rgb,
    pub arc: Rgb,
    pub ball: Rgb,
    pub hud_text: Rgb,
}

impl SceneStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            background: settings.bg_color,
            arc: settings.arc_color,
            ball: settings.ball_color,
            hud_text: Rgb::WHITE,
        }
    }
}

/// The four HUD lines: hits, arcs left, time, ball color
pub fn hud_lines(sim: &Simulation, ball_color: Rgb) -> [String; 4] {
    let state = &sim.state;
    [
        format!("Hits: {}", state.hit_count),
        format!("Arcs Left: {}", state.arcs_left(sim.rings.len())),
        format!("Time: {} sec", state.time_left.max(0.0) as u32),
        format!("Ball Color: {}", ball_color),
    ]
}

/// Draw one full frame of the running simulation and present it
pub fn draw_simulation(
    canvas: &mut impl Canvas,
    sim: &Simulation,
    style: &SceneStyle,
    screen: ScreenSize,
) {
    let origin = screen.center();
    canvas.clear(style.background);

    for ring in sim.rings.iter().filter(|r| r.active) {
        let points: Vec<Vec2> = ring.world_points().into_iter().map(|p| origin + p).collect();
        canvas.draw_line_strip(&points, ARC_LINE_WIDTH, style.arc);
    }

    for ball in sim.arena.balls() {
        canvas.draw_circle(origin + ball.pos, ball.radius, style.ball);
    }

    for particle in sim.particles.iter().filter(|p| p.is_alive()) {
        canvas.draw_circle(origin + particle.pos, particle.radius, particle.color);
    }

    let [hits, arcs, time, color] = hud_lines(sim, style.ball);
    let text = style.hud_text;
    canvas.draw_text(&hits, Vec2::new(20.0, 20.0), HUD_TEXT_SIZE, text, TextAnchor::TopLeft);
    canvas.draw_text(&arcs, Vec2::new(20.0, 50.0), HUD_TEXT_SIZE, text, TextAnchor::TopLeft);
    canvas.draw_text(
        &time,
        Vec2::new(screen.width as f32 - TIMER_INSET, 20.0),
        HUD_TEXT_SIZE,
        text,
        TextAnchor::TopLeft,
    );
    canvas.draw_text(&color, Vec2::new(20.0, 80.0), HUD_TEXT_SIZE, text, TextAnchor::TopLeft);

    canvas.present();
}

/// Draw the end-of-round message: green when won, red otherwise
pub fn draw_end_screen(
    canvas: &mut impl Canvas,
    phase: MatchPhase,
    style: &SceneStyle,
    screen: ScreenSize,
) {
    let color = if phase == MatchPhase::Won { Rgb::GREEN } else { Rgb::RED };
    canvas.clear(style.background);
    canvas.draw_text("The End", screen.center(), END_TEXT_SIZE, color, TextAnchor::Center);
    canvas.present();
}
