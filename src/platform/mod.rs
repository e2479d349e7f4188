//! Platform abstraction layer
//!
//! Handles the pieces a host environment provides:
//! - Display surface sizing
//! - Input events
//! - Frame pacing

pub mod display;
pub mod input;
pub mod time;

pub use display::{Display, DisplayError, ScreenSize, fit_aspect};
pub use input::{InputEvent, InputSource, NoInput, ScriptedInput};
pub use time::FramePacer;
