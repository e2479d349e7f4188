//! Display surface acquisition and aspect-ratio fitting

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("cannot acquire a display surface: resolution {0}x{1} is unusable")]
    NoSurface(u32, u32),
    #[error("invalid screen size '{0}': expected WIDTHxHEIGHT")]
    Parse(String),
}

/// Pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Center point, rounded down to whole pixels
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.width / 2) as f32, (self.height / 2) as f32)
    }
}

impl FromStr for ScreenSize {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || DisplayError::Parse(s.to_string());
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(parse_err)?;
        let width = w.trim().parse().map_err(|_| parse_err())?;
        let height = h.trim().parse().map_err(|_| parse_err())?;
        Ok(Self { width, height })
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Largest size with the given aspect ratio that fits the available area.
/// Uses the full height when possible; a non-positive ratio keeps the area as is.
pub fn fit_aspect(available: ScreenSize, aspect_ratio: f32) -> ScreenSize {
    if !(aspect_ratio > 0.0) {
        return available;
    }

    let width = (available.height as f32 * aspect_ratio) as u32;
    if width > available.width {
        ScreenSize::new(available.width, (available.width as f32 / aspect_ratio) as u32)
    } else {
        ScreenSize::new(width, available.height)
    }
}

/// The surface the simulation is presented on
#[derive(Debug, Clone)]
pub struct Display {
    pub size: ScreenSize,
    pub fullscreen: bool,
}

impl Display {
    /// Size a fullscreen surface for `aspect_ratio` within the available resolution
    pub fn acquire(available: ScreenSize, aspect_ratio: f32) -> Result<Self, DisplayError> {
        if available.width == 0 || available.height == 0 {
            return Err(DisplayError::NoSurface(available.width, available.height));
        }

        let size = fit_aspect(available, aspect_ratio);
        if size.width == 0 || size.height == 0 {
            return Err(DisplayError::NoSurface(size.width, size.height));
        }

        log::info!("Display {} (available {}, aspect {:.3})", size, available, aspect_ratio);
        Ok(Self {
            size,
            fullscreen: true,
        })
    }

    /// Switch to windowed mode at the same size (used for the end screen)
    pub fn leave_fullscreen(&mut self) {
        if self.fullscreen {
            log::debug!("Leaving fullscreen");
            self.fullscreen = false;
        }
    }
}
