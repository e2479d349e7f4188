//! Simulation settings
//!
//! Defaults match the stock command line. A JSON file can supply any subset
//! of fields; command-line flags are applied on top by the binary.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid color '{0}': expected R,G,B with components 0-255")]
    Color(String),
    #[error("invalid aspect ratio '{0}': expected W:H or a positive number")]
    AspectRatio(String),
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// An RGB color, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);

    /// Parse `R,G,B`, falling back to white on malformed input
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|e| {
            log::warn!("{e}; using white");
            Rgb::WHITE
        })
    }

    /// Normalized RGBA for vertex colors
    pub fn to_rgba(self) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            1.0,
        ]
    }
}

impl FromStr for Rgb {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SettingsError::Color(s.to_string()))?;

        match parts.as_slice() {
            [r, g, b] => Ok(Rgb(*r, *g, *b)),
            _ => Err(SettingsError::Color(s.to_string())),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Parse an aspect ratio given as `W:H` (e.g. `16:9`) or as a plain number
pub fn parse_aspect_ratio(s: &str) -> Result<f32, SettingsError> {
    let invalid = || SettingsError::AspectRatio(s.to_string());

    let ratio = match s.split_once(':') {
        Some((w, h)) => {
            let w: f32 = w.trim().parse().map_err(|_| invalid())?;
            let h: f32 = h.trim().parse().map_err(|_| invalid())?;
            if h == 0.0 {
                return Err(invalid());
            }
            w / h
        }
        None => s.trim().parse().map_err(|_| invalid())?,
    };

    if ratio.is_finite() { Ok(ratio) } else { Err(invalid()) }
}

/// Full configuration surface of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of concentric rings
    pub ring_count: usize,
    /// Ball radius; also the spacing between rings
    pub ball_radius: f32,
    /// Balls placed at startup
    pub initial_balls: usize,
    /// Innermost ring radius as a multiple of the ball radius
    pub base_multiplier: f32,
    /// Particle radius
    pub particle_size: f32,
    /// Particles emitted per destroyed ring
    pub particle_count: usize,
    pub ball_color: Rgb,
    /// Countdown in seconds
    pub countdown: f32,
    /// Launch speed of new balls
    pub ball_speed: f32,
    pub bg_color: Rgb,
    pub arc_color: Rgb,
    pub particle_color: Rgb,
    /// Target window aspect ratio (width / height); <= 0 uses the full screen
    pub aspect_ratio: f32,
    /// Fraction of ball velocity kept per second
    pub ball_damping: f32,
    /// Straight segments per ring
    pub arc_smoothness: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ring_count: 100,
            ball_radius: 6.0,
            initial_balls: 2,
            base_multiplier: 50.0,
            particle_size: 2.0,
            particle_count: 20,
            ball_color: Rgb(255, 255, 0),
            countdown: 60.0,
            ball_speed: 150.0,
            bg_color: Rgb(20, 20, 30),
            arc_color: Rgb::WHITE,
            particle_color: Rgb::WHITE,
            aspect_ratio: 16.0 / 9.0,
            ball_damping: 0.99,
            arc_smoothness: 20,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Radius of the innermost ring
    pub fn base_radius(&self) -> f32 {
        self.ball_radius * self.base_multiplier
    }

    /// Clamp values that would make the simulation meaningless
    pub fn validate(mut self) -> Self {
        if self.ring_count == 0 {
            log::warn!("ring_count must be at least 1; using 1");
            self.ring_count = 1;
        }
        if !(self.ball_radius > 0.0) {
            log::warn!("ball_radius {} is not positive; using 6", self.ball_radius);
            self.ball_radius = 6.0;
        }
        if !(self.base_multiplier > 0.0) {
            log::warn!("base_multiplier {} is not positive; using 1", self.base_multiplier);
            self.base_multiplier = 1.0;
        }
        if self.arc_smoothness == 0 {
            log::warn!("arc_smoothness must be at least 1; using 1");
            self.arc_smoothness = 1;
        }
        if !(self.ball_damping > 0.0 && self.ball_damping <= 1.0) {
            let clamped = if self.ball_damping > 1.0 { 1.0 } else { 0.01 };
            log::warn!("ball_damping {} outside (0, 1]; using {clamped}", self.ball_damping);
            self.ball_damping = clamped;
        }
        if !(self.countdown >= 0.0) {
            log::warn!("countdown {} is negative; using 0", self.countdown);
            self.countdown = 0.0;
        }
        if self.ball_speed < 0.0 {
            log::warn!("ball_speed {} is negative; using its magnitude", self.ball_speed);
            self.ball_speed = self.ball_speed.abs();
        }
        if self.particle_size < 0.0 {
            log::warn!("particle_size {} is negative; using 0", self.particle_size);
            self.particle_size = 0.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!("255,255,0".parse::<Rgb>().unwrap(), Rgb(255, 255, 0));
        assert_eq!(" 20, 20 ,30 ".parse::<Rgb>().unwrap(), Rgb(20, 20, 30));
        assert!("255,255".parse::<Rgb>().is_err());
        assert!("red".parse::<Rgb>().is_err());
        assert!("256,0,0".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_parse_color_lenient_falls_back_to_white() {
        assert_eq!(Rgb::parse_lenient("nope"), Rgb::WHITE);
        assert_eq!(Rgb::parse_lenient("1,2,3"), Rgb(1, 2, 3));
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Rgb(255, 255, 0).to_string(), "(255, 255, 0)");
    }

    #[test]
    fn test_parse_aspect_ratio() {
        assert!((parse_aspect_ratio("16:9").unwrap() - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(parse_aspect_ratio("1:1").unwrap(), 1.0);
        assert_eq!(parse_aspect_ratio("1.5").unwrap(), 1.5);
        assert!(parse_aspect_ratio("16:0").is_err());
        assert!(parse_aspect_ratio("wide").is_err());
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.ring_count, 100);
        assert_eq!(s.base_radius(), 300.0);
        assert_eq!(s.arc_smoothness, 20);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"ring_count": 5, "ball_color": [1, 2, 3]}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.ring_count, 5);
        assert_eq!(s.ball_color, Rgb(1, 2, 3));
        assert_eq!(s.initial_balls, 2);
    }

    #[test]
    fn test_validate_clamps() {
        let s = Settings {
            ring_count: 0,
            arc_smoothness: 0,
            ball_damping: 1.5,
            countdown: -3.0,
            ..Default::default()
        }
        .validate();
        assert_eq!(s.ring_count, 1);
        assert_eq!(s.arc_smoothness, 1);
        assert_eq!(s.ball_damping, 1.0);
        assert_eq!(s.countdown, 0.0);
    }
}
