//! Ring Breach entry point
//!
//! Parses the command line, sets up logging, display and audio, and runs
//! one round headlessly against the recording canvas.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use ring_breach::app::{App, AppError, Outcome};
use ring_breach::audio::{AudioManager, LogOutput};
use ring_breach::consts::TARGET_FPS;
use ring_breach::platform::{Display, FramePacer, NoInput, ScreenSize};
use ring_breach::renderer::RecordingCanvas;
use ring_breach::settings::{Rgb, Settings, SettingsError, parse_aspect_ratio};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON settings file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of rings
    #[arg(short = 'a', long = "arcs")]
    arcs: Option<usize>,

    /// Ball radius, also the spacing between rings
    #[arg(short = 'b', long = "ball_size")]
    ball_size: Option<f32>,

    /// Balls at startup
    #[arg(short = 'n', long = "initial_balls")]
    initial_balls: Option<usize>,

    /// Innermost ring radius as a multiple of the ball radius
    #[arg(short = 'm', long = "base_multiplier")]
    base_multiplier: Option<f32>,

    #[arg(long = "particle_size")]
    particle_size: Option<f32>,

    /// Particles per destroyed ring
    #[arg(long = "particle_count")]
    particle_count: Option<usize>,

    /// Ball color as "R,G,B"
    #[arg(long = "ball_color")]
    ball_color: Option<String>,

    /// Seconds before the round is lost
    #[arg(long = "countdown")]
    countdown: Option<f32>,

    /// Launch speed of new balls
    #[arg(short = 's', long = "ball_speed")]
    ball_speed: Option<f32>,

    /// Background color as "R,G,B"
    #[arg(long = "bg_color")]
    bg_color: Option<String>,

    /// Ring color as "R,G,B"
    #[arg(long = "arc_color")]
    arc_color: Option<String>,

    /// Particle color as "R,G,B"
    #[arg(long = "particle_color")]
    particle_color: Option<String>,

    /// Window aspect ratio, "W:H" or a number
    #[arg(long = "aspect_ratio")]
    aspect_ratio: Option<String>,

    /// Fraction of ball velocity kept per second
    #[arg(long = "ball_damping")]
    ball_damping: Option<f32>,

    /// Straight segments per ring
    #[arg(long = "arc_smoothness")]
    arc_smoothness: Option<usize>,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Available display resolution
    #[arg(long, default_value = "1920x1080")]
    screen: ScreenSize,

    /// Directory holding the sound files
    #[arg(long, default_value = "sounds")]
    sounds: PathBuf,

    /// Run frames back to back instead of at 60 fps
    #[arg(long)]
    unpaced: bool,
}

impl Args {
    /// Start from the config file (or defaults) and apply every flag given
    fn settings(&self) -> Result<Settings, SettingsError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(v) = self.arcs {
            settings.ring_count = v;
        }
        if let Some(v) = self.ball_size {
            settings.ball_radius = v;
        }
        if let Some(v) = self.initial_balls {
            settings.initial_balls = v;
        }
        if let Some(v) = self.base_multiplier {
            settings.base_multiplier = v;
        }
        if let Some(v) = self.particle_size {
            settings.particle_size = v;
        }
        if let Some(v) = self.particle_count {
            settings.particle_count = v;
        }
        if let Some(v) = &self.ball_color {
            settings.ball_color = Rgb::parse_lenient(v);
        }
        if let Some(v) = self.countdown {
            settings.countdown = v;
        }
        if let Some(v) = self.ball_speed {
            settings.ball_speed = v;
        }
        if let Some(v) = &self.bg_color {
            settings.bg_color = Rgb::parse_lenient(v);
        }
        if let Some(v) = &self.arc_color {
            settings.arc_color = Rgb::parse_lenient(v);
        }
        if let Some(v) = &self.particle_color {
            settings.particle_color = Rgb::parse_lenient(v);
        }
        if let Some(v) = &self.aspect_ratio {
            settings.aspect_ratio = parse_aspect_ratio(v)?;
        }
        if let Some(v) = self.ball_damping {
            settings.ball_damping = v;
        }
        if let Some(v) = self.arc_smoothness {
            settings.arc_smoothness = v;
        }

        Ok(settings.validate())
    }
}

fn run(args: Args) -> Result<Outcome, AppError> {
    let settings = args.settings()?;
    let display = Display::acquire(args.screen, settings.aspect_ratio)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "Ring Breach starting: {} rings, {} balls, countdown {}s, seed {}",
        settings.ring_count,
        settings.initial_balls,
        settings.countdown,
        seed
    );

    let audio_rng = Pcg32::seed_from_u64(seed.wrapping_add(1));
    let audio = AudioManager::from_dir(&args.sounds, LogOutput, audio_rng);
    let pacer = if args.unpaced {
        FramePacer::unpaced(TARGET_FPS)
    } else {
        FramePacer::new(TARGET_FPS)
    };

    let mut app = App::new(
        &settings,
        display,
        Pcg32::seed_from_u64(seed),
        RecordingCanvas::new(),
        NoInput,
        audio,
        pacer,
    );
    Ok(app.run())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(outcome) => {
            log::info!("Finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_flag_names() {
        let args = Args::try_parse_from([
            "ring-breach",
            "-a",
            "10",
            "--ball_size",
            "4",
            "-n",
            "3",
            "--ball_color",
            "1,2,3",
            "--bg_color",
            "nonsense",
            "--aspect_ratio",
            "4:3",
            "--countdown",
            "5",
        ])
        .unwrap();
        let settings = args.settings().unwrap();

        assert_eq!(settings.ring_count, 10);
        assert_eq!(settings.ball_radius, 4.0);
        assert_eq!(settings.initial_balls, 3);
        assert_eq!(settings.ball_color, Rgb(1, 2, 3));
        assert_eq!(settings.bg_color, Rgb::WHITE);
        assert!((settings.aspect_ratio - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(settings.countdown, 5.0);
        // Untouched values keep their defaults
        assert_eq!(settings.particle_count, 20);
        assert_eq!(args.screen, ScreenSize::new(1920, 1080));
    }

    #[test]
    fn test_bad_aspect_ratio_is_an_error() {
        let args = Args::try_parse_from(["ring-breach", "--aspect_ratio", "16:0"]).unwrap();
        assert!(args.settings().is_err());
    }

    #[test]
    fn test_bad_screen_rejected_by_parser() {
        assert!(Args::try_parse_from(["ring-breach", "--screen", "wide"]).is_err());
    }
}
