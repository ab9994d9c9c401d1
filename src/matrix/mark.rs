//! Selection engine.
//!
//! In `CELL` mode marks live in the cell store. In `LIN`, `COL` and
//! `LINCOL` modes they are the `MARKED` bit of the axis flags; `LINCOL`
//! keeps either marked lines or marked columns, never both.

use tracing::trace;

use crate::error::{MatrixError, Result};
use crate::types::{AttrFlags, Axis, MarkAnchor, MarkMode, Modifiers};

use super::Matrix;

/// What one click marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkItem {
    Cell(usize, usize),
    Line(usize),
    Column(usize),
}

impl MarkItem {
    fn full(self) -> Option<Axis> {
        match self {
            MarkItem::Cell(..) => None,
            MarkItem::Line(_) => Some(Axis::Lin),
            MarkItem::Column(_) => Some(Axis::Col),
        }
    }

    fn anchor(self) -> MarkAnchor {
        match self {
            MarkItem::Cell(l, c) => MarkAnchor::new(l, c, None),
            MarkItem::Line(l) => MarkAnchor::new(l, 0, Some(Axis::Lin)),
            MarkItem::Column(c) => MarkAnchor::new(0, c, Some(Axis::Col)),
        }
    }
}

impl Matrix {
    pub fn mark_mode(&self) -> MarkMode {
        self.selection.mode
    }

    /// Change the mark mode; existing marks are dropped.
    pub fn set_mark_mode(&mut self, mode: MarkMode) {
        self.clear_marks();
        self.selection.mode = mode;
        self.config.mark_mode = mode;
    }

    pub fn set_mark_multiple(&mut self, multiple: bool) {
        self.selection.multiple = multiple;
        self.config.mark_multiple = multiple;
    }

    pub fn set_mark_continuous(&mut self, continuous: bool) {
        self.selection.continuous = continuous;
        self.config.mark_continuous = continuous;
    }

    fn axis_marked(&self, axis: Axis, index: usize) -> bool {
        self.axis(axis).flags(index).contains(AttrFlags::MARKED)
    }

    fn any_axis_marked(&self, axis: Axis) -> bool {
        (1..self.axis(axis).count()).any(|i| self.axis_marked(axis, i))
    }

    /// Titles are never marked.
    pub fn is_marked(&self, lin: usize, col: usize) -> bool {
        if Self::is_title(lin, col) {
            return false;
        }
        match self.selection.mode {
            MarkMode::No => false,
            MarkMode::Cell => self.store.is_marked(lin, col),
            MarkMode::Lin => self.axis_marked(Axis::Lin, lin),
            MarkMode::Col => self.axis_marked(Axis::Col, col),
            MarkMode::LinCol => self.axis_marked(Axis::Lin, lin) || self.axis_marked(Axis::Col, col),
        }
    }

    fn set_axis_marked(&mut self, axis: Axis, index: usize, on: bool) {
        if on && self.selection.mode == MarkMode::LinCol {
            self.axis_mut(axis.other())
                .clear_flag_everywhere(AttrFlags::MARKED);
        }
        if let Some(flags) = self.axis_mut(axis).flags_mut(index) {
            flags.set(AttrFlags::MARKED, on);
        }
        trace!(%axis, index, on, "mark");
    }

    fn set_item_marked(&mut self, item: MarkItem, on: bool) {
        let num_lin = self.lines.count();
        let num_col = self.cols.count();
        match (self.selection.mode, item) {
            (MarkMode::No, _) => {}
            (MarkMode::Cell, MarkItem::Cell(l, c)) => {
                self.store.set_marked(l, c, on);
            }
            (MarkMode::Cell, MarkItem::Line(l)) => {
                for c in 1..num_col {
                    self.store.set_marked(l, c, on);
                }
            }
            (MarkMode::Cell, MarkItem::Column(c)) => {
                for l in 1..num_lin {
                    self.store.set_marked(l, c, on);
                }
            }
            (_, MarkItem::Line(l)) | (MarkMode::Lin, MarkItem::Cell(l, _)) => {
                self.set_axis_marked(Axis::Lin, l, on);
            }
            (_, MarkItem::Column(c)) | (MarkMode::Col, MarkItem::Cell(_, c)) => {
                self.set_axis_marked(Axis::Col, c, on);
            }
            (MarkMode::LinCol, MarkItem::Cell(..)) => {}
        }
        self.request_redraw();
    }

    fn item_marked(&self, item: MarkItem) -> bool {
        match item {
            MarkItem::Cell(l, c) => self.is_marked(l, c),
            MarkItem::Line(l) => match self.selection.mode {
                MarkMode::Cell => (1..self.cols.count()).all(|c| self.store.is_marked(l, c)),
                _ => self.axis_marked(Axis::Lin, l),
            },
            MarkItem::Column(c) => match self.selection.mode {
                MarkMode::Cell => (1..self.lines.count()).all(|l| self.store.is_marked(l, c)),
                _ => self.axis_marked(Axis::Col, c),
            },
        }
    }

    /// Item a click on `(lin, col)` marks in the current mode.
    pub(crate) fn mark_item_at(&self, lin: usize, col: usize) -> Option<MarkItem> {
        let mode = self.selection.mode;
        match (lin, col) {
            (0, 0) => None,
            (0, c) => mode.allows_cols().then_some(MarkItem::Column(c)),
            (l, 0) => mode.allows_lines().then_some(MarkItem::Line(l)),
            (l, c) => match mode {
                MarkMode::Cell => Some(MarkItem::Cell(l, c)),
                MarkMode::Lin => Some(MarkItem::Line(l)),
                MarkMode::Col => Some(MarkItem::Column(c)),
                MarkMode::No | MarkMode::LinCol => None,
            },
        }
    }

    fn mark_block(&mut self, anchor: MarkAnchor, on: bool) {
        let (l1, c1, l2, c2) = anchor.bounds();
        match anchor.full {
            Some(Axis::Lin) => (l1..=l2).for_each(|l| self.set_item_marked(MarkItem::Line(l), on)),
            Some(Axis::Col) => (c1..=c2).for_each(|c| self.set_item_marked(MarkItem::Column(c), on)),
            None => {
                for l in l1..=l2 {
                    for c in c1..=c2 {
                        self.set_item_marked(MarkItem::Cell(l, c), on);
                    }
                }
            }
        }
    }

    /// Click on `(lin, col)`: plain click marks only the clicked item,
    /// ctrl toggles it, shift extends the block from the anchor.
    pub(crate) fn mark_click(&mut self, lin: usize, col: usize, mods: Modifiers) {
        let Some(item) = self.mark_item_at(lin, col) else {
            return;
        };
        let multiple = self.selection.multiple;
        if mods.shift && multiple && self.selection.anchor.is_some() {
            self.mark_extend_to(lin, col);
            return;
        }
        if mods.ctrl && multiple && !self.selection.continuous {
            let on = !self.item_marked(item);
            self.set_item_marked(item, on);
        } else {
            self.clear_marks();
            self.set_item_marked(item, true);
        }
        self.selection.anchor = Some(item.anchor());
    }

    /// Move the block end to `(lin, col)`. Returns false when rejected.
    pub(crate) fn mark_extend_to(&mut self, lin: usize, col: usize) -> bool {
        if !self.selection.multiple {
            return false;
        }
        let Some(mut anchor) = self.selection.anchor else {
            return false;
        };
        let Some(item) = self.mark_item_at(lin, col) else {
            return false;
        };
        if item.full() != anchor.full {
            trace!(lin, col, "mark extension changes line/column kind");
            return false;
        }
        let target = item.anchor();
        if (target.lin, target.col) == (anchor.end_lin, anchor.end_col) {
            return true;
        }
        self.mark_block(anchor, false);
        anchor.end_lin = target.lin;
        anchor.end_col = target.col;
        self.mark_block(anchor, true);
        self.selection.anchor = Some(anchor);
        true
    }

    /// Mark or unmark one cell (`MARKL:C`).
    pub fn set_cell_marked(&mut self, lin: usize, col: usize, on: bool) -> Result<()> {
        self.check_cell(lin, col)?;
        if Self::is_title(lin, col) {
            return Err(MatrixError::InvalidRange(format!("{lin}:{col} is a title")));
        }
        let item = match self.selection.mode {
            MarkMode::No => return Err(MatrixError::Other("marking is disabled".into())),
            MarkMode::Cell => MarkItem::Cell(lin, col),
            MarkMode::Col => MarkItem::Column(col),
            MarkMode::Lin | MarkMode::LinCol => MarkItem::Line(lin),
        };
        self.set_item_marked(item, on);
        Ok(())
    }

    /// Unmark everything and drop the anchor.
    pub fn clear_marks(&mut self) {
        self.store.clear_marks();
        self.lines.clear_flag_everywhere(AttrFlags::MARKED);
        self.cols.clear_flag_everywhere(AttrFlags::MARKED);
        self.selection.anchor = None;
        self.request_redraw();
    }

    /// Every marked data cell, line by line.
    pub fn marked_cells(&self) -> Vec<(usize, usize)> {
        if self.selection.mode == MarkMode::No {
            return Vec::new();
        }
        (1..self.lines.count())
            .flat_map(|l| (1..self.cols.count()).map(move |c| (l, c)))
            .filter(|&(l, c)| self.is_marked(l, c))
            .collect()
    }

    fn axis_mark_string(&self, axis: Axis, prefix: char) -> String {
        std::iter::once(prefix)
            .chain((1..self.axis(axis).count()).map(|i| {
                if self.axis_marked(axis, i) {
                    '1'
                } else {
                    '0'
                }
            }))
            .collect()
    }

    /// `MARKED` value: `"L0110"` for lines, `"C01"` for columns, one
    /// character per cell in `CELL` mode. `None` when nothing is marked.
    pub fn marked_attr(&self) -> Option<String> {
        match self.selection.mode {
            MarkMode::No => None,
            MarkMode::Cell => {
                let cells: String = (1..self.lines.count())
                    .flat_map(|l| (1..self.cols.count()).map(move |c| (l, c)))
                    .map(|(l, c)| if self.store.is_marked(l, c) { '1' } else { '0' })
                    .collect();
                cells.contains('1').then_some(cells)
            }
            MarkMode::Lin => self
                .any_axis_marked(Axis::Lin)
                .then(|| self.axis_mark_string(Axis::Lin, 'L')),
            MarkMode::Col => self
                .any_axis_marked(Axis::Col)
                .then(|| self.axis_mark_string(Axis::Col, 'C')),
            MarkMode::LinCol => {
                if self.any_axis_marked(Axis::Col) {
                    Some(self.axis_mark_string(Axis::Col, 'C'))
                } else if self.any_axis_marked(Axis::Lin) {
                    Some(self.axis_mark_string(Axis::Lin, 'L'))
                } else {
                    None
                }
            }
        }
    }

    /// Replace all marks from a `MARKED` value; `None` clears.
    pub fn set_marked_attr(&mut self, value: Option<&str>) -> Result<()> {
        let Some(value) = value else {
            self.clear_marks();
            return Ok(());
        };
        let bad = || MatrixError::invalid_value("MARKED", value);
        let mode = self.selection.mode;
        let (items, bits): (Vec<MarkItem>, &str) = if mode == MarkMode::Cell {
            let cells = (1..self.lines.count())
                .flat_map(|l| (1..self.cols.count()).map(move |c| MarkItem::Cell(l, c)))
                .collect();
            (cells, value)
        } else {
            let mut chars = value.chars();
            let axis = match chars.next() {
                Some('L' | 'l') if mode.allows_lines() => Axis::Lin,
                Some('C' | 'c') if mode.allows_cols() => Axis::Col,
                _ => return Err(bad()),
            };
            let items = (1..self.axis(axis).count())
                .map(|i| match axis {
                    Axis::Lin => MarkItem::Line(i),
                    Axis::Col => MarkItem::Column(i),
                })
                .collect();
            (items, chars.as_str())
        };
        if bits.chars().count() != items.len() || bits.chars().any(|c| c != '0' && c != '1') {
            return Err(bad());
        }
        self.clear_marks();
        for (item, bit) in items.into_iter().zip(bits.chars()) {
            if bit == '1' {
                self.set_item_marked(item, true);
            }
        }
        Ok(())
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
    use super::*;
    use crate::config::MatrixConfig;

    fn grid(mode: MarkMode, multiple: bool) -> Matrix {
        Matrix::new(MatrixConfig {
            num_lin: 3,
            num_col: 3,
            mark_mode: mode,
            mark_multiple: multiple,
            ..MatrixConfig::default()
        })
    }

    #[test]
    fn test_plain_click_replaces_marks() {
        let mut m = grid(MarkMode::Cell, true);
        m.mark_click(1, 1, Modifiers::NONE);
        m.mark_click(2, 2, Modifiers::NONE);
        assert_eq!(m.marked_cells(), vec![(2, 2)]);
    }

    #[test]
    fn test_ctrl_toggles() {
        let mut m = grid(MarkMode::Cell, true);
        m.mark_click(1, 1, Modifiers::NONE);
        m.mark_click(2, 2, Modifiers::CTRL);
        assert_eq!(m.marked_cells(), vec![(1, 1), (2, 2)]);
        m.mark_click(1, 1, Modifiers::CTRL);
        assert_eq!(m.marked_cells(), vec![(2, 2)]);
    }

    #[test]
    fn test_shift_extends_block() {
        let mut m = grid(MarkMode::Cell, true);
        m.mark_click(1, 1, Modifiers::NONE);
        m.mark_click(2, 2, Modifiers::SHIFT);
        assert_eq!(m.marked_cells(), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
        // Shrinking unmarks the old block
        m.mark_click(1, 2, Modifiers::SHIFT);
        assert_eq!(m.marked_cells(), vec![(1, 1), (1, 2)]);
    }

    #[test]
    fn test_extension_rejects_kind_change() {
        let mut m = grid(MarkMode::Cell, true);
        m.mark_click(1, 0, Modifiers::NONE);
        assert!(!m.mark_extend_to(0, 2));
        assert!(m.mark_extend_to(2, 0));
        assert_eq!(m.marked_attr().as_deref(), Some("111111000"));
    }

    #[test]
    fn test_lincol_is_exclusive() {
        let mut m = grid(MarkMode::LinCol, true);
        m.mark_click(2, 0, Modifiers::NONE);
        assert_eq!(m.marked_attr().as_deref(), Some("L010"));
        m.mark_click(0, 3, Modifiers::CTRL);
        assert_eq!(m.marked_attr().as_deref(), Some("C001"));
        assert!(!m.is_marked(2, 1));
    }

    #[test]
    fn test_single_mode_ignores_modifiers() {
        let mut m = grid(MarkMode::Lin, false);
        m.mark_click(1, 2, Modifiers::NONE);
        m.mark_click(3, 2, Modifiers::CTRL);
        assert_eq!(m.marked_attr().as_deref(), Some("L001"));
    }

    #[test]
    fn test_marked_attr_roundtrip_and_validation() {
        let mut m = grid(MarkMode::Col, true);
        m.set_marked_attr(Some("C101")).unwrap();
        assert_eq!(m.marked_attr().as_deref(), Some("C101"));
        assert!(m.set_marked_attr(Some("C10")).is_err());
        assert!(m.set_marked_attr(Some("L101")).is_err());
        assert_eq!(m.marked_attr().as_deref(), Some("C101"));
        m.set_marked_attr(None).unwrap();
        assert_eq!(m.marked_attr(), None);
    }
}
