//! Drawing and font-metric traits the grid renders through.
//!
//! The grid never talks to a windowing system directly. A [`Canvas`]
//! implementation (browser Canvas 2D, the in-memory recorder used by tests
//! and the CLI) receives immediate-mode primitives; a [`FontMetrics`]
//! implementation answers text measurement queries for fitting.

use serde::Serialize;

use crate::color::Rgb;
use crate::types::Alignment;

/// Integer rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlapping part of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        let rect = Rect::new(x, y, r - x, b - y);
        (!rect.is_empty()).then_some(rect)
    }

    /// Shrink by `d` pixels on every side.
    pub fn inset(&self, d: i32) -> Rect {
        Rect::new(self.x + d, self.y + d, self.w - 2 * d, self.h - 2 * d)
    }
}

/// Immediate-mode drawing surface.
///
/// Coordinates are canvas pixels with the origin at the top-left corner.
pub trait Canvas {
    /// Current drawable size `(width, height)`.
    fn size(&self) -> (i32, i32);

    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {}

    /// Restrict subsequent drawing to `rect`.
    fn set_clip(&mut self, rect: Rect);

    fn reset_clip(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn stroke_rect(&mut self, rect: Rect, color: Rgb);

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb);

    /// Draw `text` inside `rect` honoring the alignment. Multi-line text uses `\n`.
    fn text(&mut self, rect: Rect, text: &str, align: Alignment, font: &str, color: Rgb);

    /// Draw a named image inside `rect`. Returns false when the name is unknown.
    fn image(&mut self, rect: Rect, name: &str, align: Alignment) -> bool;
}

/// Text measurement.
pub trait FontMetrics {
    /// Average character width and line height for `font`.
    fn char_size(&self, font: &str) -> (i32, i32);

    /// Width of a single line of text.
    fn text_width(&self, font: &str, text: &str) -> i32;

    /// Width and height of possibly multi-line text.
    fn text_size(&self, font: &str, text: &str) -> (i32, i32) {
        let (_, line_height) = self.char_size(font);
        let mut width = 0;
        let mut lines = 0;
        for line in text.split('\n') {
            width = width.max(self.text_width(font, line));
            lines += 1;
        }
        (width, line_height * lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(&Rect::new(5, 5, 10, 10)), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersect(&Rect::new(10, 0, 5, 5)), None);
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(2, 2, 3, 3);
        assert!(r.contains(2, 2));
        assert!(r.contains(4, 4));
        assert!(!r.contains(5, 4));
    }
}
