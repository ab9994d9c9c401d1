//! In-memory canvas and fixed-width metrics.
//!
//! [`RecordingCanvas`] keeps every primitive it receives as a [`DrawOp`],
//! clipped against the active clip rectangle, so tests and the CLI can
//! inspect exactly what a frame painted. [`FixedMetrics`] measures text as
//! a monospace font would.

use serde::Serialize;

use crate::color::Rgb;
use crate::types::Alignment;

use super::backend::{Canvas, FontMetrics, Rect};

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Clip { rect: Rect },
    ResetClip,
    Fill { rect: Rect, color: Rgb },
    Stroke { rect: Rect, color: Rgb },
    Line { x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb },
    Text {
        rect: Rect,
        text: String,
        align: Alignment,
        font: String,
        color: Rgb,
    },
    Image { rect: Rect, name: String },
}

/// Canvas that records instead of painting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingCanvas {
    width: i32,
    height: i32,
    clip: Option<Rect>,
    frames: usize,
    ops: Vec<DrawOp>,
    /// Image names `image` reports as known
    #[serde(skip)]
    images: Vec<String>,
}

impl RecordingCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Register an image name so `image` draws it.
    pub fn with_image(mut self, name: &str) -> Self {
        self.images.push(name.to_string());
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Completed `begin_frame`/`end_frame` pairs.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Text strings drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Fills whose rectangle contains the point, in paint order.
    pub fn fills_at(&self, x: i32, y: i32) -> Vec<Rgb> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { rect, color } if rect.contains(x, y) => Some(*color),
                _ => None,
            })
            .collect()
    }

    /// Color a point ends up with after every fill.
    pub fn color_at(&self, x: i32, y: i32) -> Option<Rgb> {
        self.fills_at(x, y).last().copied()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Portion of `rect` inside the clip, `None` when fully clipped out.
    fn clipped(&self, rect: Rect) -> Option<Rect> {
        let bounds = Rect::new(0, 0, self.width, self.height);
        let rect = rect.intersect(&bounds)?;
        match self.clip {
            Some(clip) => rect.intersect(&clip),
            None => Some(rect),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn begin_frame(&mut self) {
        self.ops.clear();
        self.clip = None;
    }

    fn end_frame(&mut self) {
        self.clip = None;
        self.frames += 1;
    }

    fn set_clip(&mut self, rect: Rect) {
        self.clip = Some(rect);
        self.ops.push(DrawOp::Clip { rect });
    }

    fn reset_clip(&mut self) {
        self.clip = None;
        self.ops.push(DrawOp::ResetClip);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        if let Some(rect) = self.clipped(rect) {
            self.ops.push(DrawOp::Fill { rect, color });
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        if self.clipped(rect).is_some() {
            self.ops.push(DrawOp::Stroke { rect, color });
        }
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb) {
        let span = Rect::new(x1.min(x2), y1.min(y2), (x2 - x1).abs() + 1, (y2 - y1).abs() + 1);
        if self.clipped(span).is_some() {
            self.ops.push(DrawOp::Line { x1, y1, x2, y2, color });
        }
    }

    fn text(&mut self, rect: Rect, text: &str, align: Alignment, font: &str, color: Rgb) {
        if text.is_empty() || self.clipped(rect).is_none() {
            return;
        }
        self.ops.push(DrawOp::Text {
            rect,
            text: text.to_string(),
            align,
            font: font.to_string(),
            color,
        });
    }

    fn image(&mut self, rect: Rect, name: &str, _align: Alignment) -> bool {
        if !self.images.iter().any(|known| known == name) {
            return false;
        }
        if self.clipped(rect).is_some() {
            self.ops.push(DrawOp::Image {
                rect,
                name: name.to_string(),
            });
        }
        true
    }
}

/// Monospace metrics: every character is `char_width` wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedMetrics {
    pub char_width: i32,
    pub line_height: i32,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            char_width: 7,
            line_height: 14,
        }
    }
}

impl FontMetrics for FixedMetrics {
    fn char_size(&self, _font: &str) -> (i32, i32) {
        (self.char_width, self.line_height)
    }

    fn text_width(&self, _font: &str, text: &str) -> i32 {
        i32::try_from(text.chars().count())
            .unwrap_or(i32::MAX)
            .saturating_mul(self.char_width)
    }
}
