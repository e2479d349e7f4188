//! Rendering module
//!
//! Draw calls go through the [`Canvas`] trait; the recording canvas
//! tessellates them into vertex buffers for an external backend.

pub mod canvas;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use canvas::{Canvas, Frame, RecordingCanvas, TextAnchor, TextItem};
pub use scene::{SceneStyle, draw_end_screen, draw_simulation, hud_lines};
pub use vertex::Vertex;
