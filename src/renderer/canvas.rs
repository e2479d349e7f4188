//! Drawing surface abstraction
//!
//! The simulation never talks to a windowing or GPU library directly; it
//! issues draw calls against a [`Canvas`]. [`RecordingCanvas`] tessellates
//! those calls into vertex buffers and keeps the last presented frame, which
//! is what a GPU backend uploads and what tests inspect.

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use crate::settings::Rgb;

/// How text is positioned relative to its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    Center,
}

/// The external drawing layer
pub trait Canvas {
    fn clear(&mut self, color: Rgb);
    fn draw_line_strip(&mut self, points: &[Vec2], width: f32, color: Rgb);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgb);
    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Rgb, anchor: TextAnchor);
    /// Finish the current frame
    fn present(&mut self);
}

/// A text draw call
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub color: Rgb,
    pub anchor: TextAnchor,
}

/// Everything drawn between two `present` calls
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub background: Option<Rgb>,
    pub vertices: Vec<Vertex>,
    pub texts: Vec<TextItem>,
    pub line_strips: usize,
    pub circles: usize,
}

impl Frame {
    /// Vertex data ready for a GPU buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        Vertex::as_bytes(&self.vertices)
    }

    /// First text item containing `needle`
    pub fn find_text(&self, needle: &str) -> Option<&TextItem> {
        self.texts.iter().find(|t| t.text.contains(needle))
    }
}

/// Canvas that records frames instead of displaying them
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    current: Frame,
    last: Option<Frame>,
    frames_presented: u64,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Rgb) {
        self.current = Frame {
            background: Some(color),
            ..Frame::default()
        };
    }

    fn draw_line_strip(&mut self, points: &[Vec2], width: f32, color: Rgb) {
        self.current
            .vertices
            .extend(shapes::line_strip(points, width, color.to_rgba()));
        self.current.line_strips += 1;
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.current
            .vertices
            .extend(shapes::circle(center, radius, color.to_rgba()));
        self.current.circles += 1;
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Rgb, anchor: TextAnchor) {
        self.current.texts.push(TextItem {
            text: text.to_string(),
            pos,
            size,
            color,
            anchor,
        });
    }

    fn present(&mut self) {
        let frame = std::mem::take(&mut self.current);
        log::trace!(
            "frame {}: {} strips, {} circles, {} vertices",
            self.frames_presented,
            frame.line_strips,
            frame.circles,
            frame.vertices.len()
        );
        self.last = Some(frame);
        self.frames_presented += 1;
    }
}
