//! Scrolling and scrollbar synchronization.

use tracing::{debug, trace};

use crate::error::Result;
use crate::scrollbar::ScrollAction;
use crate::types::Axis;

use super::Matrix;

impl Matrix {
    /// First scrollable line and column currently shown.
    pub fn origin(&self) -> (usize, usize) {
        (self.lines.first(), self.cols.first())
    }

    /// Apply a scroll action to one axis.
    ///
    /// Actions arriving while the scrollbar extents are being updated are
    /// dropped.
    pub fn scroll(&mut self, axis: Axis, action: ScrollAction) {
        if self.inside_scroll_update {
            trace!(%axis, ?action, "scroll during extent update ignored");
            return;
        }
        let before = self.origin();
        let model = self.axis_mut(axis);
        match action {
            ScrollAction::LineDec => model.scroll_line(false),
            ScrollAction::LineInc => model.scroll_line(true),
            ScrollAction::PageDec => model.scroll_page(false),
            ScrollAction::PageInc => model.scroll_page(true),
            ScrollAction::Begin => model.scroll_begin(),
            ScrollAction::End => model.scroll_end(),
            ScrollAction::DragTo(pos) => model.set_scroll_pos(pos),
        }
        debug!(%axis, ?action, pos = self.axis(axis).scroll_pos(), "scroll");
        self.after_scroll(before);
    }

    /// Scroll position in pixels (`POSX` / `POSY`).
    pub fn set_scroll_pos(&mut self, axis: Axis, pos: i32) {
        self.scroll(axis, ScrollAction::DragTo(pos));
    }

    /// Make `(lin, col)` the first scrollable line and column (`ORIGIN`).
    ///
    /// The window never scrolls past the end, so the origin may stop short.
    pub fn set_origin(&mut self, lin: usize, col: usize) -> Result<()> {
        self.check_cell(lin, col)?;
        let before = self.origin();
        for (axis, index) in [(Axis::Lin, lin), (Axis::Col, col)] {
            let model = self.axis_mut(axis);
            if index < model.fixed() {
                model.scroll_begin();
            } else {
                model.first = index;
                model.first_offset = 0;
                model.update_scroll_pos();
            }
        }
        self.after_scroll(before);
        Ok(())
    }

    /// Scroll both axes so the cell (the whole merge, when it fits) shows.
    pub fn scroll_cell_visible(&mut self, lin: usize, col: usize) {
        let before = self.origin();
        let (l1, c1, l2, c2) = match self.merges.find(lin, col) {
            Some(m) => (m.start_lin, m.start_col, m.end_lin, m.end_col),
            None => (lin, col, lin, col),
        };
        self.lines.scroll_to_visible(l2);
        self.lines.scroll_to_visible(l1);
        self.cols.scroll_to_visible(c2);
        self.cols.scroll_to_visible(c1);
        self.after_scroll(before);
    }

    /// Push extents to the scrollbars without re-entering [`Matrix::scroll`].
    pub(crate) fn sync_scrollbars(&mut self) {
        self.inside_scroll_update = true;
        for axis in Axis::BOTH {
            let model = self.axis(axis);
            let (max, page, pos) = (model.total_size(), model.current_size(), model.scroll_pos());
            self.scrollbar_mut(axis).set_range(max, page, pos);
        }
        self.inside_scroll_update = false;
    }

    fn after_scroll(&mut self, before: (usize, usize)) {
        self.sync_scrollbars();
        let (lin, col) = self.origin();
        if (lin, col) != before {
            if let Some(f) = &self.callbacks.scroll_top {
                f(lin, col);
            }
        }
        self.reposition_editor();
        self.request_redraw();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::{MatrixConfig, ScrollbarMode};

    fn grid() -> Matrix {
        let mut m = Matrix::new(MatrixConfig {
            num_lin: 9,
            num_col: 2,
            scrollbar: ScrollbarMode::Never,
            ..MatrixConfig::default()
        });
        // 20px title + five 20px lines
        m.resize(400, 120);
        m
    }

    #[test]
    fn test_line_and_page_actions() {
        let mut m = grid();
        assert_eq!(m.axis(Axis::Lin).last(), 5);
        m.scroll(Axis::Lin, ScrollAction::LineInc);
        assert_eq!(m.origin().0, 2);
        m.scroll(Axis::Lin, ScrollAction::End);
        assert_eq!(m.origin().0, 5);
        assert_eq!(m.axis(Axis::Lin).last(), 9);
        m.scroll(Axis::Lin, ScrollAction::Begin);
        assert_eq!(m.origin().0, 1);
    }

    #[test]
    fn test_drag_sets_pixel_position() {
        let mut m = grid();
        m.set_scroll_pos(Axis::Lin, 30);
        assert_eq!(m.origin().0, 2);
        assert_eq!(m.axis(Axis::Lin).first_offset(), 10);
        assert_eq!(m.scrollbar(Axis::Lin).range(), (180, 100, 30));
    }

    #[test]
    fn test_origin_stops_at_end() {
        let mut m = grid();
        m.set_origin(8, 1).unwrap();
        assert_eq!(m.origin(), (5, 1));
        assert!(m.set_origin(20, 1).is_err());
    }

    #[test]
    fn test_scroll_top_callback_only_on_change() {
        let mut m = grid();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        m.callbacks_mut().scroll_top = Some(Box::new(move |l, c| sink.borrow_mut().push((l, c))));
        m.scroll(Axis::Lin, ScrollAction::LineDec);
        m.scroll(Axis::Lin, ScrollAction::PageInc);
        assert_eq!(calls.borrow().as_slice(), &[(5, 1)]);
    }

    #[test]
    fn test_scroll_ignored_during_extent_update() {
        let mut m = grid();
        m.inside_scroll_update = true;
        m.scroll(Axis::Lin, ScrollAction::End);
        assert_eq!(m.origin().0, 1);
    }
}
