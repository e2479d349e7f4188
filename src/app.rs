//! Simulation loop and end-of-round screen
//!
//! One simulation tick per frame at the fixed timestep, paced to the
//! target frame rate. The loop ends when the match is decided or the user
//! quits; the end screen then stays up for a few seconds.

use rand_pcg::Pcg32;
use thiserror::Error;

use crate::audio::{AudioManager, SoundOutput};
use crate::consts::{END_SCREEN_SECONDS, SIM_DT};
use crate::platform::{Display, DisplayError, FramePacer, InputEvent, InputSource};
use crate::renderer::{Canvas, SceneStyle, draw_end_screen, draw_simulation};
use crate::settings::{Settings, SettingsError};
use crate::sim::{MatchPhase, SimConfig, Simulation, tick};

/// Top-level failure
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    /// Closed before the match was decided
    Quit,
}

impl Outcome {
    fn from_phase(phase: MatchPhase) -> Self {
        match phase {
            MatchPhase::Won => Outcome::Won,
            MatchPhase::Lost => Outcome::Lost,
            MatchPhase::Running => Outcome::Quit,
        }
    }
}

/// Frames per FPS log line
const FPS_WINDOW: u64 = 60;

/// A simulation wired to its display, input and audio
pub struct App<C: Canvas, I: InputSource, O: SoundOutput> {
    sim: Simulation,
    display: Display,
    style: SceneStyle,
    canvas: C,
    input: I,
    audio: AudioManager<O>,
    pacer: FramePacer,
    frames: u64,
    window_time: f32,
}

impl<C: Canvas, I: InputSource, O: SoundOutput> App<C, I, O> {
    pub fn new(
        settings: &Settings,
        display: Display,
        rng: Pcg32,
        canvas: C,
        input: I,
        audio: AudioManager<O>,
        pacer: FramePacer,
    ) -> Self {
        let sim = Simulation::new(SimConfig::from_settings(settings), rng);
        Self {
            sim,
            display,
            style: SceneStyle::from_settings(settings),
            canvas,
            input,
            audio,
            pacer,
            frames: 0,
            window_time: 0.0,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn audio(&self) -> &AudioManager<O> {
        &self.audio
    }

    /// Simulation frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run the match, then the end screen
    pub fn run(&mut self) -> Outcome {
        let outcome = self.run_match();
        log::debug!(
            "Round ended: {:?} after {} frames, {} hits, active index {}",
            outcome,
            self.frames,
            self.sim.state.hit_count,
            self.sim.state.active_index
        );
        self.show_end_screen(outcome);
        outcome
    }

    fn quit_requested(&mut self) -> bool {
        self.input.poll().contains(&InputEvent::Quit)
    }

    fn run_match(&mut self) -> Outcome {
        loop {
            if self.quit_requested() {
                return Outcome::Quit;
            }

            tick(&mut self.sim, SIM_DT);
            self.audio.handle_events(&self.sim.events);
            draw_simulation(&mut self.canvas, &self.sim, &self.style, self.display.size);

            let dt = self.pacer.wait();
            self.track_frame(dt);

            if self.sim.state.is_over() {
                return Outcome::from_phase(self.sim.phase());
            }
        }
    }

    fn track_frame(&mut self, dt: f32) {
        self.frames += 1;
        self.window_time += dt;
        if self.frames % FPS_WINDOW == 0 {
            let fps = FPS_WINDOW as f32 / self.window_time.max(f32::EPSILON);
            log::debug!(
                "frame {}: {:.0} fps, {} balls, {} particles, time left {:.1}",
                self.frames,
                fps,
                self.sim.arena.len(),
                self.sim.particles.len(),
                self.sim.state.time_left
            );
            self.window_time = 0.0;
        }
    }

    fn show_end_screen(&mut self, outcome: Outcome) {
        self.display.leave_fullscreen();
        let phase = match outcome {
            Outcome::Won => MatchPhase::Won,
            Outcome::Lost | Outcome::Quit => MatchPhase::Lost,
        };

        let mut shown = 0.0;
        while shown < END_SCREEN_SECONDS {
            if self.quit_requested() {
                log::debug!("End screen closed early");
                return;
            }
            draw_end_screen(&mut self.canvas, phase, &self.style, self.display.size);
            shown += self.pacer.wait();
        }
    }
}
