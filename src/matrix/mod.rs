//! The grid widget.
//!
//! [`Matrix`] owns both axis models, the cell store, the override side
//! table, merged ranges, the selection state, the edit overlay and the two
//! flat scrollbars. Behavior is split by concern:
//!
//! - `resolve`: attribute fallback chain and color attenuation
//! - `structure`: line/column insert and delete, clear operations
//! - `mark`: selection engine
//! - `edit`: in-place editor overlay
//! - `scroll`: scroll actions and scrollbar synchronization
//! - `events`: keyboard and mouse input
//! - `fit`: fit to text / fit to size
//! - `attrib`: toolkit attribute-name bridge

mod attrib;
mod callbacks;
mod edit;
mod events;
mod fit;
mod mark;
mod resolve;
mod scroll;
mod structure;

pub use attrib::parse_start_end;
pub use callbacks::{Callbacks, CellFn, Click};
pub use edit::{
    EditKind, EditSession, EditTransition, EditWidget, EditWidgetFactory, HeadlessEditFactory,
    HeadlessEditWidget,
};
pub use events::{Key, MouseButton};
pub use resolve::CellStyle;
pub use structure::ClearScope;

use serde::Serialize;
use tracing::debug;

use crate::attrs::AttrTable;
use crate::config::{MatrixConfig, ScrollbarMode};
use crate::error::{MatrixError, Result};
use crate::layout::{AxisModel, MergeTable};
use crate::numeric::NumericColumns;
use crate::render::{FixedMetrics, FontMetrics, Rect};
use crate::scrollbar::FlatScrollbar;
use crate::store::{CellStore, OwnedStore};
use crate::types::{Axis, SelectionState};

use edit::EditOverlay;

/// Transient pointer state between press and release.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PointerState {
    /// Button held over the cell area
    pub marking: bool,
    /// Scrollbar being dragged
    pub scrollbar: Option<Axis>,
    /// Cell under the last press
    pub pressed: Option<(usize, usize)>,
}

pub struct Matrix {
    pub(crate) config: MatrixConfig,
    pub(crate) lines: AxisModel,
    pub(crate) cols: AxisModel,
    pub(crate) store: Box<dyn CellStore>,
    pub(crate) attrs: AttrTable,
    pub(crate) merges: MergeTable,
    pub(crate) selection: SelectionState,
    pub(crate) numeric: NumericColumns,
    pub(crate) edit: EditOverlay,
    pub(crate) vscroll: FlatScrollbar,
    pub(crate) hscroll: FlatScrollbar,
    pub(crate) callbacks: Callbacks,
    pub(crate) metrics: Box<dyn FontMetrics>,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) needs_redraw: bool,
    /// A draw is in progress; redraw requests are deferred
    pub(crate) drawing: bool,
    pub(crate) redraw_deferred: bool,
    /// Scroll extents are being pushed to the scrollbars
    pub(crate) inside_scroll_update: bool,
    pub(crate) pointer: PointerState,
}

impl std::fmt::Debug for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matrix")
            .field("num_lin", &self.num_lin())
            .field("num_col", &self.num_col())
            .field("focus", &self.focus())
            .field("size", &(self.width, self.height))
            .finish_non_exhaustive()
    }
}

impl Matrix {
    /// Matrix that owns its cell values.
    pub fn new(config: MatrixConfig) -> Self {
        let store = OwnedStore::new(config.num_lin + 1, config.num_col + 1);
        Self::with_store(config, Box::new(store))
    }

    /// Matrix over a caller-chosen store (e.g. a [`CallbackStore`](crate::store::CallbackStore)).
    pub fn with_store(config: MatrixConfig, store: Box<dyn CellStore>) -> Self {
        let lines = AxisModel::new(
            Axis::Lin,
            config.num_lin + 1,
            config.num_lin_noscroll,
            config.title_height,
            config.height_def,
        );
        let cols = AxisModel::new(
            Axis::Col,
            config.num_col + 1,
            config.num_col_noscroll,
            config.title_width,
            config.width_def,
        );
        let selection = SelectionState::new(
            config.mark_mode,
            config.mark_multiple,
            config.mark_continuous,
        );
        let arrows = config.scrollbar_arrows;
        Self {
            config,
            lines,
            cols,
            store,
            attrs: AttrTable::default(),
            merges: MergeTable::new(),
            selection,
            numeric: NumericColumns::default(),
            edit: EditOverlay::default(),
            vscroll: FlatScrollbar::new(Axis::Lin, arrows),
            hscroll: FlatScrollbar::new(Axis::Col, arrows),
            callbacks: Callbacks::default(),
            metrics: Box::new(FixedMetrics::default()),
            width: 0,
            height: 0,
            needs_redraw: true,
            drawing: false,
            redraw_deferred: false,
            inside_scroll_update: false,
            pointer: PointerState::default(),
        }
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    pub fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    pub fn set_font_metrics(&mut self, metrics: Box<dyn FontMetrics>) {
        self.metrics = metrics;
    }

    pub fn set_edit_factory(&mut self, factory: Box<dyn EditWidgetFactory>) {
        self.edit.set_factory(factory);
    }

    pub fn numeric_mut(&mut self) -> &mut NumericColumns {
        &mut self.numeric
    }

    pub fn merges(&self) -> &MergeTable {
        &self.merges
    }

    pub fn axis(&self, axis: Axis) -> &AxisModel {
        match axis {
            Axis::Lin => &self.lines,
            Axis::Col => &self.cols,
        }
    }

    pub(crate) fn axis_mut(&mut self, axis: Axis) -> &mut AxisModel {
        match axis {
            Axis::Lin => &mut self.lines,
            Axis::Col => &mut self.cols,
        }
    }

    pub fn scrollbar(&self, axis: Axis) -> &FlatScrollbar {
        match axis {
            Axis::Lin => &self.vscroll,
            Axis::Col => &self.hscroll,
        }
    }

    pub(crate) fn scrollbar_mut(&mut self, axis: Axis) -> &mut FlatScrollbar {
        match axis {
            Axis::Lin => &mut self.vscroll,
            Axis::Col => &mut self.hscroll,
        }
    }

    /// Data lines, title excluded.
    pub fn num_lin(&self) -> usize {
        self.lines.count() - 1
    }

    /// Data columns, title excluded.
    pub fn num_col(&self) -> usize {
        self.cols.count() - 1
    }

    pub(crate) fn check_cell(&self, lin: usize, col: usize) -> Result<()> {
        if lin >= self.lines.count() {
            return Err(MatrixError::IndexOutOfRange {
                axis: Axis::Lin,
                index: lin,
            });
        }
        if col >= self.cols.count() {
            return Err(MatrixError::IndexOutOfRange {
                axis: Axis::Col,
                index: col,
            });
        }
        Ok(())
    }

    pub(crate) fn is_title(lin: usize, col: usize) -> bool {
        lin == 0 || col == 0
    }

    // ========================================================================
    // Redraw bookkeeping
    // ========================================================================

    /// Ask for a redraw; during a draw the request is deferred.
    pub fn request_redraw(&mut self) {
        if self.drawing {
            self.redraw_deferred = true;
        } else {
            self.needs_redraw = true;
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Raw stored value.
    pub fn value(&self, lin: usize, col: usize) -> Option<String> {
        if self.check_cell(lin, col).is_err() {
            return None;
        }
        self.store.value(lin, col)
    }

    pub fn set_value(&mut self, lin: usize, col: usize, value: Option<&str>) -> Result<()> {
        self.check_cell(lin, col)?;
        self.store.set_value(lin, col, value);
        self.request_redraw();
        Ok(())
    }

    /// Value as drawn: numeric columns are converted and formatted.
    pub fn display_value(&self, lin: usize, col: usize) -> Option<String> {
        let raw = self.value(lin, col)?;
        if lin == 0 || !self.numeric.is_numeric(col) {
            return Some(raw);
        }
        Some(self.numeric.display(
            col,
            &raw,
            &self.config.numeric_format_def,
            self.config.numeric_decimal_symbol,
        ))
    }

    /// Store text typed by the user, converting numeric columns.
    pub(crate) fn commit_value(&mut self, lin: usize, col: usize, text: &str) {
        let stored = if lin > 0 && self.numeric.is_numeric(col) {
            self.numeric
                .store_text(col, text, self.config.numeric_decimal_symbol)
        } else {
            text.to_string()
        };
        self.store.set_value(lin, col, Some(&stored));
        self.callbacks.value_changed(lin, col);
        self.request_redraw();
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus(&self) -> (usize, usize) {
        (self.lines.focus(), self.cols.focus())
    }

    /// Start cell of the merge containing `(lin, col)`, or the cell itself.
    pub fn merge_start(&self, lin: usize, col: usize) -> (usize, usize) {
        self.merges
            .find(lin, col)
            .map_or((lin, col), |m| (m.start_lin, m.start_col))
    }

    /// Move the focus. Returns Ok(false) when a callback or the editor kept it.
    pub fn set_focus(&mut self, lin: usize, col: usize) -> Result<bool> {
        self.check_cell(lin, col)?;
        if Self::is_title(lin, col) {
            return Err(MatrixError::InvalidRange(format!("{lin}:{col} is a title")));
        }
        let (lin, col) = self.merge_start(lin, col);
        let (old_lin, old_col) = self.focus();
        if (lin, col) == (old_lin, old_col) {
            self.scroll_cell_visible(lin, col);
            return Ok(true);
        }
        if self.is_editing() && self.edit_confirm().is_err() {
            return Ok(false);
        }
        if !self.callbacks.leave_allows(old_lin, old_col) {
            return Ok(false);
        }
        self.lines.set_focus(lin);
        self.cols.set_focus(col);
        debug!(lin, col, "focus");
        self.callbacks.enter(lin, col);
        self.scroll_cell_visible(lin, col);
        self.request_redraw();
        Ok(true)
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Canvas size changed.
    pub fn resize(&mut self, width: i32, height: i32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width.max(0);
        self.height = height.max(0);
        if let Some(f) = &self.callbacks.resize {
            f(self.width, self.height);
        }
        self.recompute_geometry();
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn full_extent(axis: &AxisModel) -> i32 {
        axis.span_size(0..axis.count())
    }

    /// Lay out scrollbars and recompute both visible windows.
    pub fn recompute_geometry(&mut self) {
        let sb = self.config.scrollbar_size.max(0);
        let (need_v, need_h) = match self.config.scrollbar {
            ScrollbarMode::Always => (true, true),
            ScrollbarMode::Never => (false, false),
            ScrollbarMode::Auto => {
                let lines_full = Self::full_extent(&self.lines);
                let cols_full = Self::full_extent(&self.cols);
                let mut v = lines_full > self.height;
                let mut h = cols_full > self.width;
                if v && !h {
                    h = cols_full > self.width - sb;
                }
                if h && !v {
                    v = lines_full > self.height - sb;
                }
                (v, h)
            }
        };
        let avail_w = (self.width - if need_v { sb } else { 0 }).max(0);
        let avail_h = (self.height - if need_h { sb } else { 0 }).max(0);

        self.lines.recompute_visible_window(avail_h);
        self.cols.recompute_visible_window(avail_w);

        self.vscroll.set_visible(need_v);
        self.vscroll.set_rect(Rect::new(avail_w, 0, sb, avail_h));
        self.hscroll.set_visible(need_h);
        self.hscroll.set_rect(Rect::new(0, avail_h, avail_w, sb));
        self.sync_scrollbars();
        self.reposition_editor();
        self.request_redraw();
    }

    /// Area left for cells once the scrollbars are placed.
    pub fn data_area(&self) -> Rect {
        let w = if self.vscroll.is_visible() {
            self.vscroll.rect().x
        } else {
            self.width
        };
        let h = if self.hscroll.is_visible() {
            self.hscroll.rect().y
        } else {
            self.height
        };
        Rect::new(0, 0, w, h)
    }

    /// Cell under a canvas point; merged cells map to their start cell.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if !self.data_area().contains(x, y) {
            return None;
        }
        let lin = self.lines.cell_from_pixel(y)?;
        let col = self.cols.cell_from_pixel(x)?;
        Some(self.merge_start(lin, col))
    }

    /// Leading edge and full length of `[start, end]` along an axis.
    fn axis_extent(axis: &AxisModel, start: usize, end: usize) -> Option<(i32, i32)> {
        let s = axis.pixel_from_cell(start)?;
        let e = axis.pixel_from_cell(end)?;
        let lead = if start == axis.first() && start >= axis.fixed() {
            s.pos - axis.first_offset()
        } else {
            s.pos
        };
        Some((lead, e.pos + e.size - lead))
    }

    /// Canvas rectangle of a cell (the whole range for merged cells) and
    /// whether any part of it is inside the visible window.
    pub fn cell_rect(&self, lin: usize, col: usize) -> Option<(Rect, bool)> {
        let (l1, c1, l2, c2) = match self.merges.find(lin, col) {
            Some(m) => (m.start_lin, m.start_col, m.end_lin, m.end_col),
            None => (lin, col, lin, col),
        };
        let (y, h) = Self::axis_extent(&self.lines, l1, l2)?;
        let (x, w) = Self::axis_extent(&self.cols, c1, c2)?;
        let visible = (l1..=l2).any(|l| self.lines.is_visible(l))
            && (c1..=c2).any(|c| self.cols.is_visible(c));
        Some((Rect::new(x, y, w, h), visible))
    }

    // ========================================================================
    // State export
    // ========================================================================

    pub fn snapshot(&self) -> MatrixSnapshot {
        let axis = |a: &AxisModel| AxisSnapshot {
            count: a.count(),
            fixed: a.fixed(),
            first: a.first(),
            first_offset: a.first_offset(),
            last: a.last(),
            scroll_pos: a.scroll_pos(),
            total_size: a.total_size(),
            visible_size: a.current_size(),
            sizes: a.sizes().to_vec(),
        };
        let values = (0..self.lines.count())
            .map(|l| {
                (0..self.cols.count())
                    .map(|c| self.display_value(l, c))
                    .collect()
            })
            .collect();
        MatrixSnapshot {
            num_lin: self.num_lin(),
            num_col: self.num_col(),
            focus: self.focus(),
            lines: axis(&self.lines),
            cols: axis(&self.cols),
            marked: self.marked_attr(),
            editing: self.edit_cell(),
            merges: self
                .merges
                .iter()
                .map(|(_, m)| m.to_attr_string())
                .collect(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisSnapshot {
    pub count: usize,
    pub fixed: usize,
    pub first: usize,
    pub first_offset: i32,
    pub last: usize,
    pub scroll_pos: i32,
    pub total_size: i32,
    pub visible_size: i32,
    pub sizes: Vec<i32>,
}

/// Serializable view of the matrix state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixSnapshot {
    pub num_lin: usize,
    pub num_col: usize,
    pub focus: (usize, usize),
    pub lines: AxisSnapshot,
    pub cols: AxisSnapshot,
    pub marked: Option<String>,
    pub editing: Option<(usize, usize)>,
    pub merges: Vec<String>,
    /// Displayed values, titles included
    pub values: Vec<Vec<Option<String>>>,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::MergedRange;

    fn grid() -> Matrix {
        let mut m = Matrix::new(MatrixConfig {
            num_lin: 20,
            num_col: 6,
            ..MatrixConfig::default()
        });
        m.resize(400, 200);
        m
    }

    #[test]
    fn test_scrollbars_follow_overflow() {
        let m = grid();
        // 21 lines x 20px = 420 > 200; 40 + 6 x 80 = 520 > 400
        assert!(m.scrollbar(Axis::Lin).is_visible());
        assert!(m.scrollbar(Axis::Col).is_visible());
        assert_eq!(m.data_area(), Rect::new(0, 0, 385, 185));
        assert_eq!(m.axis(Axis::Lin).current_size(), 165);
    }

    #[test]
    fn test_no_scrollbars_when_everything_fits() {
        let mut m = Matrix::new(MatrixConfig {
            num_lin: 3,
            num_col: 2,
            ..MatrixConfig::default()
        });
        m.resize(400, 400);
        assert!(!m.scrollbar(Axis::Lin).is_visible());
        assert!(!m.scrollbar(Axis::Col).is_visible());
        assert_eq!(m.data_area(), Rect::new(0, 0, 400, 400));
    }

    #[test]
    fn test_cell_at_and_rect_agree() {
        let m = grid();
        let (rect, visible) = m.cell_rect(2, 3).unwrap();
        assert!(visible);
        assert_eq!(rect, Rect::new(40 + 160, 40, 80, 20));
        assert_eq!(m.cell_at(rect.x + 1, rect.y + 1), Some((2, 3)));
        // Scrollbar strip is not a cell
        assert_eq!(m.cell_at(390, 10), None);
    }

    #[test]
    fn test_merged_cell_maps_to_start() {
        let mut m = grid();
        m.merge(MergedRange::new(2, 1, 3, 2)).unwrap();
        let (rect, _) = m.cell_rect(3, 2).unwrap();
        assert_eq!(rect, Rect::new(40, 40, 160, 40));
        assert_eq!(m.cell_at(190, 70), Some((2, 1)));
    }

    #[test]
    fn test_focus_rejects_titles_and_out_of_range() {
        let mut m = grid();
        assert!(m.set_focus(0, 1).is_err());
        assert!(matches!(
            m.set_focus(99, 1),
            Err(MatrixError::IndexOutOfRange { axis: Axis::Lin, .. })
        ));
        assert!(m.set_focus(15, 2).unwrap());
        assert_eq!(m.focus(), (15, 2));
        assert!(m.axis(Axis::Lin).is_visible(15));
    }

    #[test]
    fn test_redraw_deferred_while_drawing() {
        let mut m = grid();
        m.needs_redraw = false;
        m.drawing = true;
        m.request_redraw();
        assert!(!m.needs_redraw());
        assert!(m.redraw_deferred);
    }
}
