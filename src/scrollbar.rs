//! Flat, custom-drawn scrollbar.
//!
//! A scrollbar mirrors one axis: `max` is the scrollable extent, `page` the
//! visible extent and `pos` the scroll position, all in content pixels.
//! The strip is laid out as `[dec arrow][track with thumb][inc arrow]`.

use crate::color::{palette, Rgb};
use crate::render::{Canvas, Rect};
use crate::types::{Alignment, Axis};

/// Smallest thumb length in pixels.
pub const MIN_THUMB: i32 = 8;

/// Region of the scrollbar under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollbarPart {
    #[default]
    None,
    DecArrow,
    IncArrow,
    /// Track before the thumb
    PageDec,
    /// Track after the thumb
    PageInc,
    Thumb,
}

/// Scroll request produced by scrollbar interaction or keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollAction {
    LineDec,
    LineInc,
    PageDec,
    PageInc,
    Begin,
    End,
    /// Absolute scroll position in content pixels
    DragTo(i32),
}

#[derive(Debug, Clone)]
pub struct FlatScrollbar {
    axis: Axis,
    rect: Rect,
    visible: bool,
    show_arrows: bool,
    max: i32,
    page: i32,
    pos: i32,
    hot: ScrollbarPart,
    pressed: ScrollbarPart,
    /// Pointer coordinate along the strip and `pos` when the thumb drag began
    drag: Option<(i32, i32)>,
}

impl FlatScrollbar {
    /// Scrollbar driving `axis`: lines scroll vertically, columns horizontally.
    pub fn new(axis: Axis, show_arrows: bool) -> Self {
        Self {
            axis,
            rect: Rect::default(),
            visible: false,
            show_arrows,
            max: 0,
            page: 0,
            pos: 0,
            hot: ScrollbarPart::None,
            pressed: ScrollbarPart::None,
            drag: None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.hot = ScrollbarPart::None;
            self.pressed = ScrollbarPart::None;
            self.drag = None;
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn set_show_arrows(&mut self, show: bool) {
        self.show_arrows = show;
    }

    /// Update the range from the axis extents.
    pub fn set_range(&mut self, max: i32, page: i32, pos: i32) {
        self.max = max.max(0);
        self.page = page.max(0);
        self.pos = pos.clamp(0, (self.max - self.page).max(0));
    }

    pub fn range(&self) -> (i32, i32, i32) {
        (self.max, self.page, self.pos)
    }

    pub fn hot(&self) -> ScrollbarPart {
        self.hot
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn length(&self) -> i32 {
        match self.axis {
            Axis::Lin => self.rect.h,
            Axis::Col => self.rect.w,
        }
    }

    fn thickness(&self) -> i32 {
        match self.axis {
            Axis::Lin => self.rect.w,
            Axis::Col => self.rect.h,
        }
    }

    /// Arrow button length, 0 when hidden or when the strip is too short.
    fn arrow_size(&self) -> i32 {
        if !self.show_arrows {
            return 0;
        }
        let arrow = self.thickness();
        if self.length() < 2 * arrow + MIN_THUMB {
            0
        } else {
            arrow
        }
    }

    /// Track start and length along the strip.
    fn track(&self) -> (i32, i32) {
        let arrow = self.arrow_size();
        (arrow, (self.length() - 2 * arrow).max(0))
    }

    /// Thumb start (relative to the strip) and length.
    pub fn thumb(&self) -> (i32, i32) {
        let (start, track) = self.track();
        if self.max <= self.page || self.max <= 0 {
            return (start, track);
        }
        let size = i32::try_from(i64::from(track) * i64::from(self.page) / i64::from(self.max))
            .unwrap_or(track)
            .max(MIN_THUMB)
            .min(track);
        let range = self.max - self.page;
        let travel = track - size;
        let offset = i32::try_from(i64::from(self.pos) * i64::from(travel) / i64::from(range))
            .unwrap_or(0);
        (start + offset, size)
    }

    /// Position along the strip of a canvas point.
    fn along(&self, x: i32, y: i32) -> i32 {
        match self.axis {
            Axis::Lin => y - self.rect.y,
            Axis::Col => x - self.rect.x,
        }
    }

    pub fn hit_test(&self, x: i32, y: i32) -> ScrollbarPart {
        if !self.visible || !self.rect.contains(x, y) {
            return ScrollbarPart::None;
        }
        let p = self.along(x, y);
        let arrow = self.arrow_size();
        if p < arrow {
            return ScrollbarPart::DecArrow;
        }
        if p >= self.length() - arrow {
            return ScrollbarPart::IncArrow;
        }
        let (thumb_pos, thumb_size) = self.thumb();
        if p < thumb_pos {
            ScrollbarPart::PageDec
        } else if p >= thumb_pos + thumb_size {
            ScrollbarPart::PageInc
        } else {
            ScrollbarPart::Thumb
        }
    }

    /// Pointer pressed. A thumb press starts a drag and produces no action.
    pub fn press(&mut self, x: i32, y: i32) -> Option<ScrollAction> {
        let part = self.hit_test(x, y);
        self.pressed = part;
        match part {
            ScrollbarPart::None => None,
            ScrollbarPart::DecArrow => Some(ScrollAction::LineDec),
            ScrollbarPart::IncArrow => Some(ScrollAction::LineInc),
            ScrollbarPart::PageDec => Some(ScrollAction::PageDec),
            ScrollbarPart::PageInc => Some(ScrollAction::PageInc),
            ScrollbarPart::Thumb => {
                self.drag = Some((self.along(x, y), self.pos));
                None
            }
        }
    }

    /// Pointer moved during a thumb drag.
    pub fn drag_to(&mut self, x: i32, y: i32) -> Option<ScrollAction> {
        let (start, start_pos) = self.drag?;
        let (_, track) = self.track();
        let (_, thumb) = self.thumb();
        let travel = track - thumb;
        let range = self.max - self.page;
        if travel <= 0 || range <= 0 {
            return None;
        }
        let delta = self.along(x, y) - start;
        let delta_pos =
            i32::try_from(i64::from(delta) * i64::from(range) / i64::from(travel)).unwrap_or(0);
        let pos = (start_pos + delta_pos).clamp(0, range);
        (pos != self.pos).then_some(ScrollAction::DragTo(pos))
    }

    pub fn release(&mut self) {
        self.pressed = ScrollbarPart::None;
        self.drag = None;
    }

    /// Track the hovered part; returns true when it changed.
    pub fn set_hot(&mut self, x: i32, y: i32) -> bool {
        let hot = self.hit_test(x, y);
        let changed = hot != self.hot;
        self.hot = hot;
        changed
    }

    fn part_rect(&self, start: i32, len: i32) -> Rect {
        match self.axis {
            Axis::Lin => Rect::new(self.rect.x, self.rect.y + start, self.rect.w, len),
            Axis::Col => Rect::new(self.rect.x + start, self.rect.y, len, self.rect.h),
        }
    }

    fn arrow_glyph(&self, inc: bool) -> &'static str {
        match (self.axis, inc) {
            (Axis::Lin, false) => "\u{25B2}",
            (Axis::Lin, true) => "\u{25BC}",
            (Axis::Col, false) => "\u{25C0}",
            (Axis::Col, true) => "\u{25B6}",
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, font: &str) {
        if !self.visible || self.rect.is_empty() {
            return;
        }
        canvas.fill_rect(self.rect, palette::SCROLLBAR_TRACK);

        let arrow = self.arrow_size();
        if arrow > 0 {
            let arrow_color = |part| {
                if self.hot == part || self.pressed == part {
                    palette::SCROLLBAR_ARROW.darken(0.3)
                } else {
                    palette::SCROLLBAR_ARROW
                }
            };
            let dec = self.part_rect(0, arrow);
            let inc = self.part_rect(self.length() - arrow, arrow);
            canvas.text(
                dec,
                self.arrow_glyph(false),
                Alignment::default(),
                font,
                arrow_color(ScrollbarPart::DecArrow),
            );
            canvas.text(
                inc,
                self.arrow_glyph(true),
                Alignment::default(),
                font,
                arrow_color(ScrollbarPart::IncArrow),
            );
        }

        let (thumb_pos, thumb_size) = self.thumb();
        let thumb_color: Rgb = if self.hot == ScrollbarPart::Thumb || self.drag.is_some() {
            palette::SCROLLBAR_THUMB_HOT
        } else {
            palette::SCROLLBAR_THUMB
        };
        canvas.fill_rect(self.part_rect(thumb_pos, thumb_size).inset(2), thumb_color);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    /// Vertical strip 15 wide, 230 long: track 200 after two 15px arrows.
    fn vertical() -> FlatScrollbar {
        let mut sb = FlatScrollbar::new(Axis::Lin, true);
        sb.set_rect(Rect::new(385, 0, 15, 230));
        sb.set_visible(true);
        sb.set_range(1000, 200, 0);
        sb
    }

    #[test]
    fn test_thumb_geometry() {
        let mut sb = vertical();
        assert_eq!(sb.thumb(), (15, 40));
        sb.set_range(1000, 200, 800);
        assert_eq!(sb.thumb(), (15 + 160, 40));
        sb.set_range(1000, 200, 400);
        assert_eq!(sb.thumb(), (15 + 80, 40));
    }

    #[test]
    fn test_thumb_minimum_and_full() {
        let mut sb = vertical();
        sb.set_range(1_000_000, 10, 0);
        assert_eq!(sb.thumb().1, MIN_THUMB);
        sb.set_range(100, 200, 0);
        assert_eq!(sb.thumb(), (15, 200));
    }

    #[test]
    fn test_hit_test_parts() {
        let mut sb = vertical();
        sb.set_range(1000, 200, 400);
        assert_eq!(sb.hit_test(390, 5), ScrollbarPart::DecArrow);
        assert_eq!(sb.hit_test(390, 225), ScrollbarPart::IncArrow);
        assert_eq!(sb.hit_test(390, 50), ScrollbarPart::PageDec);
        assert_eq!(sb.hit_test(390, 100), ScrollbarPart::Thumb);
        assert_eq!(sb.hit_test(390, 200), ScrollbarPart::PageInc);
        assert_eq!(sb.hit_test(10, 100), ScrollbarPart::None);
    }

    #[test]
    fn test_press_actions() {
        let mut sb = vertical();
        assert_eq!(sb.press(390, 5), Some(ScrollAction::LineDec));
        assert_eq!(sb.press(390, 200), Some(ScrollAction::PageInc));
        assert_eq!(sb.press(390, 20), None);
        assert!(sb.is_dragging());
    }

    #[test]
    fn test_drag_maps_pixels_to_position() {
        let mut sb = vertical();
        sb.press(390, 20);
        // travel 160px for range 800: 1px = 5 units
        assert_eq!(sb.drag_to(390, 40), Some(ScrollAction::DragTo(100)));
        assert_eq!(sb.drag_to(390, 1000), Some(ScrollAction::DragTo(800)));
        sb.release();
        assert_eq!(sb.drag_to(390, 60), None);
    }

    #[test]
    fn test_short_strip_drops_arrows() {
        let mut sb = FlatScrollbar::new(Axis::Col, true);
        sb.set_rect(Rect::new(0, 100, 30, 15));
        sb.set_visible(true);
        sb.set_range(100, 50, 0);
        assert_eq!(sb.hit_test(1, 105), ScrollbarPart::Thumb);
    }
}
