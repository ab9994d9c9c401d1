//! Per-axis geometry: sizes, the scroll window and pixel hit testing.
//!
//! Lines and columns are each described by one [`AxisModel`]. Every
//! algorithm here is written once and driven for both axes.
//!
//! Pixel positions are measured from the leading edge of the title
//! (index 0). The scrollable area starts right after the fixed prefix.

use std::ops::Range;

use tracing::trace;

use crate::types::{AttrFlags, Axis};

/// Minimum capacity once an axis holds more than the title.
pub const MIN_ALLOCATED: usize = 5;

/// Pixel position and extent of one index along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSpan {
    /// Leading edge relative to the axis origin
    pub pos: i32,
    /// Visible extent (reduced by the scroll offset for the first visible index)
    pub size: i32,
    /// False when the index is scrolled out of the window
    pub visible: bool,
}

/// State of one axis (lines or columns)
#[derive(Debug, Clone)]
pub struct AxisModel {
    axis: Axis,
    /// Number of indices, title included (always >= 1)
    count: usize,
    /// Logical storage capacity
    allocated: usize,
    /// Leading indices that never scroll, title included
    fixed: usize,
    /// Pixel extent per index (0 = hidden)
    sizes: Vec<i32>,
    /// Override presence and mark bits per whole line/column
    flags: Vec<AttrFlags>,
    /// Size given to newly inserted indices
    default_size: i32,
    /// First visible scrollable index
    pub(crate) first: usize,
    /// Pixels of `first` scrolled past its leading edge
    pub(crate) first_offset: i32,
    /// Last visible scrollable index, or the last fixed index when the
    /// axis has nothing to scroll. Always below `count`.
    pub(crate) last: usize,
    /// Sum of the scrollable sizes
    total_size: i32,
    /// Canvas extent left for the scrollable indices
    current_size: i32,
    /// Index holding the focus (never the title)
    focus: usize,
}

impl AxisModel {
    /// Create an axis with `count` indices, title included.
    pub fn new(axis: Axis, count: usize, fixed: usize, title_size: i32, default_size: i32) -> Self {
        let count = count.max(1);
        let allocated = if count > 1 {
            count.max(MIN_ALLOCATED)
        } else {
            count
        };
        let mut sizes = Vec::with_capacity(allocated);
        sizes.push(title_size.max(0));
        sizes.resize(count, default_size.max(0));

        let mut model = Self {
            axis,
            count,
            allocated,
            fixed: 1,
            sizes,
            flags: vec![AttrFlags::empty(); count],
            default_size: default_size.max(0),
            first: 1,
            first_offset: 0,
            last: 1,
            total_size: 0,
            current_size: 0,
            focus: 1,
        };
        model.set_fixed(fixed);
        model.first = model.fixed;
        model.last = model.fixed.min(model.count - 1);
        model
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn allocated(&self) -> usize {
        self.allocated
    }

    pub fn fixed(&self) -> usize {
        self.fixed
    }

    /// Clamp and store the non-scrolling prefix, within `[1, count - 1]`.
    pub fn set_fixed(&mut self, fixed: usize) {
        let max = self.count.saturating_sub(1).max(1);
        self.fixed = fixed.clamp(1, max);
        if self.first < self.fixed {
            self.first = self.fixed;
            self.first_offset = 0;
        }
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn first_offset(&self) -> i32 {
        self.first_offset
    }

    pub fn last(&self) -> usize {
        self.last
    }

    pub fn total_size(&self) -> i32 {
        self.total_size
    }

    pub fn current_size(&self) -> i32 {
        self.current_size
    }

    pub fn default_size(&self) -> i32 {
        self.default_size
    }

    pub fn set_default_size(&mut self, size: i32) {
        self.default_size = size.max(0);
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Move the focus; titles and out-of-range indices are refused.
    pub fn set_focus(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.count {
            return false;
        }
        self.focus = index;
        true
    }

    pub(crate) fn clamp_focus(&mut self) {
        self.focus = self.focus.clamp(1, self.count.saturating_sub(1).max(1));
    }

    /// Pixel size of `index`, 0 when out of range.
    pub fn size(&self, index: usize) -> i32 {
        self.sizes.get(index).copied().unwrap_or(0)
    }

    pub fn set_size(&mut self, index: usize, size: i32) -> bool {
        match self.sizes.get_mut(index) {
            Some(slot) => {
                *slot = size.max(0);
                true
            }
            None => false,
        }
    }

    pub fn sizes(&self) -> &[i32] {
        &self.sizes
    }

    pub fn flags(&self, index: usize) -> AttrFlags {
        self.flags.get(index).copied().unwrap_or_default()
    }

    pub fn flags_mut(&mut self, index: usize) -> Option<&mut AttrFlags> {
        self.flags.get_mut(index)
    }

    pub(crate) fn clear_flag_everywhere(&mut self, flag: AttrFlags) {
        for f in &mut self.flags {
            f.remove(flag);
        }
    }

    /// Sum of the sizes in `range`.
    pub fn span_size(&self, range: Range<usize>) -> i32 {
        self.sizes.get(range).map_or(0, |s| s.iter().sum())
    }

    /// Extent of the non-scrolling prefix.
    pub fn fixed_size(&self) -> i32 {
        self.span_size(0..self.fixed)
    }

    /// Whether the axis has any scrollable index.
    pub fn has_scrollable(&self) -> bool {
        self.count > self.fixed
    }

    /// Scrollable indices currently inside the window.
    pub fn visible_range(&self) -> Range<usize> {
        if self.has_scrollable() {
            self.first..(self.last + 1).min(self.count)
        } else {
            self.fixed..self.fixed
        }
    }

    /// Next index after `index` with a non-zero size.
    pub fn next_shown(&self, index: usize) -> Option<usize> {
        ((index + 1)..self.count).find(|&i| self.size(i) > 0)
    }

    /// Previous scrollable-or-fixed index before `index` with a non-zero size, never the title.
    pub fn prev_shown(&self, index: usize) -> Option<usize> {
        (1..index.min(self.count)).rev().find(|&i| self.size(i) > 0)
    }

    // ========================================================================
    // Visible window
    // ========================================================================

    /// Recompute the extents and the visible window for a canvas extent.
    ///
    /// `canvas_extent` is the whole axis extent available to the grid, with
    /// the perpendicular scrollbar already subtracted.
    pub fn recompute_visible_window(&mut self, canvas_extent: i32) {
        self.calc_sizes(canvas_extent);
        self.update_scroll_pos();
    }

    fn calc_sizes(&mut self, canvas_extent: i32) {
        self.total_size = self.span_size(self.fixed..self.count);
        self.current_size = (canvas_extent - self.fixed_size()).max(0);

        if self.first >= self.count {
            self.first = self.count.saturating_sub(1).max(self.fixed);
            self.first_offset = 0;
        }
        if self.first < self.fixed {
            self.first = self.fixed;
            self.first_offset = 0;
        }
        if self.first_offset >= self.size(self.first) {
            self.first_offset = 0;
        }
    }

    /// Reconcile the window with the current scroll position.
    pub fn update_scroll_pos(&mut self) {
        if self.total_size <= self.current_size {
            self.first = self.fixed;
            self.first_offset = 0;
        } else {
            let pos = self.scroll_pos();
            if pos + self.current_size > self.total_size {
                self.adjust_first_from_scroll_pos(self.total_size - self.current_size);
            }
        }
        self.update_last();
        trace!(
            axis = %self.axis,
            first = self.first,
            offset = self.first_offset,
            last = self.last,
            "visible window"
        );
    }

    /// Scroll position in pixels: extent scrolled past the fixed prefix.
    pub fn scroll_pos(&self) -> i32 {
        if !self.has_scrollable() {
            return 0;
        }
        self.span_size(self.fixed..self.first) + self.first_offset
    }

    /// Largest valid scroll position.
    pub fn max_scroll_pos(&self) -> i32 {
        (self.total_size - self.current_size).max(0)
    }

    /// Place the window at `pos`, clamped to the valid range.
    pub fn set_scroll_pos(&mut self, pos: i32) {
        let pos = pos.clamp(0, self.max_scroll_pos());
        self.adjust_first_from_scroll_pos(pos);
        self.update_last();
    }

    /// Find `first`/`first_offset` for a scroll position.
    pub fn adjust_first_from_scroll_pos(&mut self, scroll_pos: i32) {
        if !self.has_scrollable() {
            self.first = self.fixed;
            self.first_offset = 0;
            return;
        }
        let mut sum = 0;
        for index in self.fixed..self.count {
            let size = self.size(index);
            if scroll_pos < sum + size {
                self.first = index;
                self.first_offset = scroll_pos - sum;
                return;
            }
            sum += size;
        }
        self.first = self.count - 1;
        self.first_offset = 0;
    }

    /// Find `first`/`first_offset` so that `last` ends the window.
    pub fn adjust_first_from_last(&mut self) {
        if !self.has_scrollable() {
            self.first = self.fixed;
            self.first_offset = 0;
            return;
        }
        let last = self.last.clamp(self.fixed, self.count - 1);
        let mut sum = 0;
        for index in (self.fixed..=last).rev() {
            sum += self.size(index);
            if sum >= self.current_size {
                self.first = index;
                self.first_offset = sum - self.current_size;
                return;
            }
        }
        self.first = self.fixed;
        self.first_offset = 0;
    }

    /// Walk forward from `first` until the window is filled.
    pub fn update_last(&mut self) {
        if !self.has_scrollable() {
            self.last = self.count - 1;
            return;
        }
        if self.current_size <= 0 {
            self.last = self.first;
            return;
        }
        let mut sum = -self.first_offset;
        for index in self.first..self.count {
            sum += self.size(index);
            if sum >= self.current_size {
                self.last = index;
                return;
            }
        }
        self.last = self.count - 1;
    }

    // ========================================================================
    // Visibility and hit testing
    // ========================================================================

    pub fn is_visible(&self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        index < self.fixed || (index >= self.first && index <= self.last)
    }

    /// Visible with its leading edge on screen.
    pub fn is_start_visible(&self, index: usize) -> bool {
        if !self.is_visible(index) {
            return false;
        }
        !(index == self.first && self.first_offset > 0 && index >= self.fixed)
    }

    /// Index under a pixel position, or None past the window.
    pub fn cell_from_pixel(&self, pixel: i32) -> Option<usize> {
        if pixel < 0 {
            return None;
        }
        let mut end = 0;
        for index in 0..self.fixed.min(self.count) {
            end += self.size(index);
            if pixel < end {
                return Some(index);
            }
        }
        for index in self.visible_range() {
            end += self.size(index);
            if index == self.first {
                end -= self.first_offset;
            }
            if pixel < end {
                return Some(index);
            }
        }
        None
    }

    /// Position and visible extent of `index`.
    pub fn pixel_from_cell(&self, index: usize) -> Option<AxisSpan> {
        if index >= self.count {
            return None;
        }
        if index < self.fixed {
            return Some(AxisSpan {
                pos: self.span_size(0..index),
                size: self.size(index),
                visible: true,
            });
        }
        let fixed_size = self.fixed_size();
        if index < self.first {
            return Some(AxisSpan {
                pos: fixed_size - self.span_size(index..self.first) - self.first_offset,
                size: self.size(index),
                visible: false,
            });
        }
        let (pos, size) = if index == self.first {
            (fixed_size, self.size(index) - self.first_offset)
        } else {
            (
                fixed_size + self.span_size(self.first..index) - self.first_offset,
                self.size(index),
            )
        };
        Some(AxisSpan {
            pos,
            size,
            visible: index <= self.last,
        })
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    /// Bring `index` into the window.
    pub fn scroll_to_visible(&mut self, index: usize) {
        if index < self.fixed || index >= self.count {
            return;
        }
        if index > self.first && index < self.last {
            return;
        }
        if index <= self.first {
            self.first = index;
            self.first_offset = 0;
            self.update_last();
        } else {
            self.last = index;
            self.adjust_first_from_last();
            self.update_last();
        }
    }

    /// Scroll one index forward or back.
    pub fn scroll_line(&mut self, forward: bool) {
        if !self.has_scrollable() {
            return;
        }
        if forward {
            if let Some(next) = self.next_shown(self.first) {
                self.first = next;
                self.first_offset = 0;
            }
        } else if self.first_offset > 0 {
            self.first_offset = 0;
        } else if let Some(prev) = self.prev_shown(self.first).filter(|&p| p >= self.fixed) {
            self.first = prev;
        }
        self.update_scroll_pos();
    }

    /// Scroll one window forward or back.
    pub fn scroll_page(&mut self, forward: bool) {
        if !self.has_scrollable() {
            return;
        }
        if forward {
            let target = if self.last > self.first {
                self.last
            } else {
                self.next_shown(self.first).unwrap_or(self.first)
            };
            self.first = target;
            self.first_offset = 0;
            self.update_scroll_pos();
        } else {
            let target = if self.first_offset > 0 {
                self.first
            } else {
                self.prev_shown(self.first)
                    .filter(|&p| p >= self.fixed)
                    .unwrap_or(self.fixed)
            };
            self.last = target;
            self.adjust_first_from_last();
            self.update_last();
        }
    }

    pub fn scroll_begin(&mut self) {
        self.first = self.fixed;
        self.first_offset = 0;
        self.update_last();
    }

    pub fn scroll_end(&mut self) {
        if !self.has_scrollable() {
            return;
        }
        self.last = self.count - 1;
        self.adjust_first_from_last();
        self.update_last();
    }

    // ========================================================================
    // Storage
    // ========================================================================

    fn ensure_allocated(&mut self, needed: usize) {
        if needed > self.allocated {
            self.allocated = needed.max(MIN_ALLOCATED);
            self.sizes.reserve_exact(self.allocated - self.sizes.len());
            self.flags.reserve_exact(self.allocated - self.flags.len());
        }
    }

    /// Open `n` indices at `base` with default size and no flags.
    pub(crate) fn insert(&mut self, base: usize, n: usize) {
        let base = base.min(self.count);
        self.ensure_allocated(self.count + n);
        let tail = self.sizes.split_off(base);
        self.sizes.extend(std::iter::repeat(self.default_size).take(n));
        self.sizes.extend(tail);
        let tail = self.flags.split_off(base);
        self.flags.extend(std::iter::repeat(AttrFlags::empty()).take(n));
        self.flags.extend(tail);
        self.count += n;

        if self.focus >= base {
            self.focus += n;
        }
        if self.first >= base && self.first >= self.fixed {
            self.first += n;
        }
        self.clamp_focus();
    }

    /// Drop indices `[base, base + n)`.
    pub(crate) fn remove(&mut self, base: usize, n: usize) {
        let end = base.saturating_add(n).min(self.count);
        if base >= end || base == 0 {
            return;
        }
        let removed = end - base;
        self.sizes.drain(base..end);
        self.flags.drain(base..end);
        self.count -= removed;

        if self.focus >= end {
            self.focus -= removed;
        } else if self.focus >= base {
            self.focus = base;
        }
        self.clamp_focus();

        if self.first >= end {
            self.first -= removed;
        } else if self.first >= base {
            self.first = base;
            self.first_offset = 0;
        }
        self.set_fixed(self.fixed);
        if self.first >= self.count {
            self.first = self.count.saturating_sub(1).max(self.fixed);
            self.first_offset = 0;
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    /// 10 indices, title 20px, data 20px
    fn lines() -> AxisModel {
        AxisModel::new(Axis::Lin, 10, 1, 20, 20)
    }

    #[test]
    fn test_window_of_five() {
        let mut a = lines();
        a.recompute_visible_window(120);
        assert_eq!(a.current_size(), 100);
        assert_eq!(a.total_size(), 180);
        assert_eq!((a.first(), a.first_offset(), a.last()), (1, 0, 5));
    }

    #[test]
    fn test_everything_fits() {
        let mut a = lines();
        a.first = 4;
        a.first_offset = 3;
        a.recompute_visible_window(1000);
        assert_eq!((a.first(), a.first_offset(), a.last()), (1, 0, 9));
    }

    #[test]
    fn test_scroll_pos_clamped_at_end() {
        let mut a = lines();
        a.recompute_visible_window(120);
        a.first = 8;
        a.update_scroll_pos();
        // max scroll pos = 180 - 100 = 80 -> first 5, offset 0
        assert_eq!((a.first(), a.first_offset()), (5, 0));
        assert_eq!(a.last(), 9);
        assert_eq!(a.scroll_pos(), 80);
    }

    #[test]
    fn test_adjust_first_from_scroll_pos() {
        let mut a = lines();
        a.recompute_visible_window(120);
        a.adjust_first_from_scroll_pos(45);
        assert_eq!((a.first(), a.first_offset()), (3, 5));
        a.adjust_first_from_scroll_pos(10_000);
        assert_eq!((a.first(), a.first_offset()), (9, 0));
    }

    #[test]
    fn test_adjust_first_from_last() {
        let mut a = lines();
        a.recompute_visible_window(110);
        a.last = 9;
        a.adjust_first_from_last();
        // 90px window: 9,8,7,6 = 80, + 5 = 100 -> offset 10
        assert_eq!((a.first(), a.first_offset()), (5, 10));
    }

    #[test]
    fn test_update_last_with_offset() {
        let mut a = lines();
        a.recompute_visible_window(120);
        a.first = 2;
        a.first_offset = 10;
        a.update_last();
        // 10 + 20 * 4 = 90 < 100, index 7 reaches 110
        assert_eq!(a.last(), 7);
    }

    #[test]
    fn test_cell_from_pixel_and_back() {
        let mut a = lines();
        a.recompute_visible_window(120);
        a.set_scroll_pos(30);
        assert_eq!((a.first(), a.first_offset()), (2, 10));
        assert_eq!(a.cell_from_pixel(0), Some(0));
        assert_eq!(a.cell_from_pixel(19), Some(0));
        assert_eq!(a.cell_from_pixel(20), Some(2));
        assert_eq!(a.cell_from_pixel(29), Some(2));
        assert_eq!(a.cell_from_pixel(30), Some(3));
        for index in a.visible_range() {
            let span = a.pixel_from_cell(index).unwrap();
            assert!(span.visible);
            assert_eq!(a.cell_from_pixel(span.pos + 1), Some(index));
        }
        assert_eq!(a.cell_from_pixel(5000), None);
    }

    #[test]
    fn test_recompute_twice_keeps_window() {
        let mut a = lines();
        a.set_size(3, 0);
        a.set_size(6, 55);
        for extent in [20, 45, 120, 300] {
            a.recompute_visible_window(extent);
            for pos in (0..=a.max_scroll_pos()).step_by(5) {
                a.set_scroll_pos(pos);
                a.recompute_visible_window(extent);
                let once = (a.first(), a.first_offset(), a.last());
                a.recompute_visible_window(extent);
                assert_eq!(
                    (a.first(), a.first_offset(), a.last()),
                    once,
                    "extent {extent} pos {pos}"
                );
            }
        }
    }

    #[test]
    fn test_pixel_from_cell_hidden_before_first() {
        let mut a = lines();
        a.recompute_visible_window(120);
        a.set_scroll_pos(40);
        let span = a.pixel_from_cell(1).unwrap();
        assert!(!span.visible);
        assert_eq!(span.pos, 20 - 40);
    }

    #[test]
    fn test_zero_size_is_skipped() {
        let mut a = lines();
        a.set_size(2, 0);
        a.recompute_visible_window(120);
        assert_eq!(a.cell_from_pixel(20), Some(1));
        assert_eq!(a.cell_from_pixel(40), Some(3));
        assert_eq!(a.next_shown(1), Some(3));
        assert_eq!(a.prev_shown(3), Some(1));
    }

    #[test]
    fn test_scroll_to_visible() {
        let mut a = lines();
        a.recompute_visible_window(120);
        a.scroll_to_visible(9);
        assert_eq!(a.last(), 9);
        assert_eq!(a.first(), 5);
        a.scroll_to_visible(2);
        assert_eq!((a.first(), a.first_offset()), (2, 0));
        // strictly inside: no change
        a.scroll_to_visible(4);
        assert_eq!(a.first(), 2);
    }

    #[test]
    fn test_scroll_line_and_page() {
        let mut a = lines();
        a.recompute_visible_window(120);
        a.scroll_line(true);
        assert_eq!(a.first(), 2);
        a.scroll_line(false);
        assert_eq!(a.first(), 1);
        a.scroll_page(true);
        assert_eq!(a.first(), 5);
        a.scroll_end();
        assert_eq!(a.last(), 9);
        a.scroll_begin();
        assert_eq!((a.first(), a.first_offset()), (1, 0));
    }

    #[test]
    fn test_insert_and_remove_storage() {
        let mut a = AxisModel::new(Axis::Col, 5, 1, 40, 80);
        a.set_size(3, 33);
        a.set_focus(4);
        a.insert(3, 2);
        assert_eq!(a.count(), 7);
        assert_eq!(a.size(5), 33);
        assert_eq!(a.size(3), 80);
        assert_eq!(a.focus(), 6);
        a.remove(3, 2);
        assert_eq!(a.count(), 5);
        assert_eq!(a.size(3), 33);
        assert_eq!(a.focus(), 4);
    }

    #[test]
    fn test_allocation_grows_exact() {
        let mut a = AxisModel::new(Axis::Lin, 1, 1, 20, 20);
        assert_eq!(a.allocated(), 1);
        a.insert(1, 1);
        assert_eq!(a.allocated(), MIN_ALLOCATED);
        a.insert(1, 10);
        assert_eq!(a.allocated(), 12);
    }

    #[test]
    fn test_title_only_axis() {
        let mut a = AxisModel::new(Axis::Lin, 1, 3, 20, 20);
        assert_eq!(a.fixed(), 1);
        a.recompute_visible_window(100);
        assert!(a.visible_range().is_empty());
        assert_eq!(a.last(), 0);
        assert!(!a.is_visible(1));
        assert_eq!(a.cell_from_pixel(5), Some(0));
        assert_eq!(a.cell_from_pixel(25), None);
    }
}
