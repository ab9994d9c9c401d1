//! Structural edits: line/column insert and delete, counts, sizes,
//! merged ranges and clear operations.
//!
//! Every operation validates first and mutates second, so an `Err` leaves
//! the matrix untouched.

use tracing::debug;

use crate::attrs::Target;
use crate::error::{MatrixError, Result};
use crate::types::{AttrFlags, Axis, CellAttr, MergedRange};

use super::Matrix;

/// Which cells a clear operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Every cell, titles included
    All,
    /// Every non-title cell
    Contents,
    /// Marked cells only
    Marked,
    /// Inclusive rectangle `lin1:col1-lin2:col2`
    Range {
        lin1: usize,
        col1: usize,
        lin2: usize,
        col2: usize,
    },
}

impl ClearScope {
    /// Parse `ALL`, `CONTENTS`, `MARKED` or `L1:C1-L2:C2`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Some(Self::All),
            "CONTENTS" => Some(Self::Contents),
            "MARKED" => Some(Self::Marked),
            other => {
                let (from, to) = other.split_once('-')?;
                let (lin1, col1) = from.split_once(':')?;
                let (lin2, col2) = to.split_once(':')?;
                Some(Self::Range {
                    lin1: lin1.trim().parse().ok()?,
                    col1: col1.trim().parse().ok()?,
                    lin2: lin2.trim().parse().ok()?,
                    col2: col2.trim().parse().ok()?,
                })
            }
        }
    }
}

impl Matrix {
    /// Open `count` indices at `base` (`1..=count` of the axis).
    pub fn insert(&mut self, axis: Axis, base: usize, count: usize) -> Result<()> {
        let current = self.axis(axis).count();
        if count == 0 {
            return Err(MatrixError::InvalidCount(format!("insert of 0 {axis}s")));
        }
        if base == 0 || base > current {
            return Err(MatrixError::IndexOutOfRange { axis, index: base });
        }
        // Indices are laid out in i32 pixel space
        let fits = current
            .checked_add(count)
            .is_some_and(|total| i32::try_from(total).is_ok());
        if !fits {
            return Err(MatrixError::InvalidCount(format!("{count} {axis}s")));
        }
        self.edit_hide();
        self.axis_mut(axis).insert(base, count);
        self.store.insert(axis, base, count);
        self.attrs.insert(axis, base, count);
        self.merges.insert(axis, base, count);
        if axis == Axis::Col {
            self.numeric.insert(base, count);
        }
        self.selection.anchor = None;
        self.sync_config_counts();
        debug!(%axis, base, count, total = self.axis(axis).count(), "insert");
        self.recompute_geometry();
        Ok(())
    }

    /// Remove indices `[base, base + count)`.
    pub fn delete(&mut self, axis: Axis, base: usize, count: usize) -> Result<()> {
        let current = self.axis(axis).count();
        if count == 0 {
            return Err(MatrixError::InvalidCount(format!("delete of 0 {axis}s")));
        }
        if base == 0 || base >= current {
            return Err(MatrixError::IndexOutOfRange { axis, index: base });
        }
        if count > current - base {
            return Err(MatrixError::InvalidCount(format!(
                "{count} {axis}s from {base} exceed {}",
                current - 1
            )));
        }
        self.edit_hide();
        self.axis_mut(axis).remove(base, count);
        self.store.remove(axis, base, count);
        self.attrs.remove(axis, base, count);
        self.merges.remove(axis, base, count);
        if axis == Axis::Col {
            self.numeric.remove_range(base, count);
        }
        self.selection.anchor = None;
        self.sync_config_counts();
        debug!(%axis, base, count, total = self.axis(axis).count(), "delete");
        self.recompute_geometry();
        Ok(())
    }

    /// Grow or shrink to `count` data indices (title excluded).
    pub fn set_count(&mut self, axis: Axis, count: usize) -> Result<()> {
        let current = self.axis(axis).count() - 1;
        match count.cmp(&current) {
            std::cmp::Ordering::Greater => self.insert(axis, current + 1, count - current),
            std::cmp::Ordering::Less => self.delete(axis, count + 1, current - count),
            std::cmp::Ordering::Equal => Ok(()),
        }
    }

    fn sync_config_counts(&mut self) {
        self.config.num_lin = self.num_lin();
        self.config.num_col = self.num_col();
    }

    /// Scrollable-prefix size, title excluded (`NUMLIN_NOSCROLL`).
    pub fn set_noscroll(&mut self, axis: Axis, count: usize) {
        self.axis_mut(axis).set_fixed(count.saturating_add(1));
        let fixed = self.axis(axis).fixed();
        match axis {
            Axis::Lin => self.config.num_lin_noscroll = fixed,
            Axis::Col => self.config.num_col_noscroll = fixed,
        }
        self.recompute_geometry();
    }

    /// Pixel size of one index (`WIDTHn` / `HEIGHTn`); 0 hides it.
    pub fn set_size(&mut self, axis: Axis, index: usize, size: i32) -> Result<()> {
        if size < 0 {
            return Err(MatrixError::invalid_value("size", &size.to_string()));
        }
        if !self.axis_mut(axis).set_size(index, size) {
            return Err(MatrixError::IndexOutOfRange { axis, index });
        }
        self.recompute_geometry();
        Ok(())
    }

    // ========================================================================
    // Merged ranges
    // ========================================================================

    /// Merge a block of cells. Returns the slot the range took.
    pub fn merge(&mut self, range: MergedRange) -> Result<usize> {
        self.check_cell(range.end_lin, range.end_col)?;
        let slot = self.merges.merge(range)?;
        let (lin, col) = self.focus();
        if range.contains(lin, col) {
            self.lines.set_focus(range.start_lin);
            self.cols.set_focus(range.start_col);
        }
        self.edit_hide();
        self.request_redraw();
        Ok(slot)
    }

    /// Split the range containing a cell.
    pub fn merge_split(&mut self, lin: usize, col: usize) -> Result<MergedRange> {
        self.check_cell(lin, col)?;
        let range = self
            .merges
            .split(lin, col)
            .ok_or_else(|| MatrixError::InvalidRange(format!("{lin}:{col} is not merged")))?;
        self.request_redraw();
        Ok(range)
    }

    pub fn merged_at(&self, lin: usize, col: usize) -> Option<MergedRange> {
        self.merges.find(lin, col).copied()
    }

    // ========================================================================
    // Clear
    // ========================================================================

    fn scope_cells(&self, scope: ClearScope) -> Result<Vec<(usize, usize)>> {
        let lines = self.lines.count();
        let cols = self.cols.count();
        let cells = match scope {
            ClearScope::All => (0..lines)
                .flat_map(|l| (0..cols).map(move |c| (l, c)))
                .collect(),
            ClearScope::Contents => (1..lines)
                .flat_map(|l| (1..cols).map(move |c| (l, c)))
                .collect(),
            ClearScope::Marked => self.marked_cells(),
            ClearScope::Range {
                lin1,
                col1,
                lin2,
                col2,
            } => {
                if lin1 > lin2 || col1 > col2 {
                    return Err(MatrixError::InvalidRange(format!(
                        "{lin1}:{col1}-{lin2}:{col2}"
                    )));
                }
                self.check_cell(lin2, col2)?;
                (lin1..=lin2)
                    .flat_map(|l| (col1..=col2).map(move |c| (l, c)))
                    .collect()
            }
        };
        Ok(cells)
    }

    pub fn clear_values(&mut self, scope: ClearScope) -> Result<()> {
        let cells = self.scope_cells(scope)?;
        for (lin, col) in cells {
            self.store.set_value(lin, col, None);
        }
        debug!(?scope, "clear values");
        self.request_redraw();
        Ok(())
    }

    /// Drop overrides. `All` also drops line and column overrides.
    pub fn clear_attributes(&mut self, scope: ClearScope) -> Result<()> {
        let cells = self.scope_cells(scope)?;
        for (lin, col) in cells {
            self.clear_cell_attrs(lin, col);
        }
        if scope == ClearScope::All {
            let attr_flags = CellAttr::ALL
                .iter()
                .fold(AttrFlags::empty(), |acc, a| acc | a.flag());
            self.lines.clear_flag_everywhere(attr_flags);
            self.cols.clear_flag_everywhere(attr_flags);
            self.attrs
                .retain(|_, target| matches!(target, Target::Cell(..)));
        }
        debug!(?scope, "clear attributes");
        self.request_redraw();
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

    fn grid(lines: usize, cols: usize) -> Matrix {
        let mut m = Matrix::new(MatrixConfig {
            num_lin: lines,
            num_col: cols,
            ..MatrixConfig::default()
        });
        m.resize(300, 300);
        m
    }

    #[test]
    fn test_insert_shifts_values_and_focus() {
        let mut m = grid(4, 2);
        m.set_value(3, 1, Some("three")).unwrap();
        m.set_focus(4, 1).unwrap();
        m.insert(Axis::Lin, 3, 2).unwrap();
        assert_eq!(m.num_lin(), 6);
        assert_eq!(m.focus(), (6, 1));
        assert_eq!(m.value(5, 1).as_deref(), Some("three"));
        assert_eq!(m.value(3, 1), None);
        assert_eq!(m.config().num_lin, 6);
    }

    #[test]
    fn test_rejected_delete_keeps_state() {
        let mut m = grid(4, 2);
        m.set_value(4, 2, Some("x")).unwrap();
        assert!(m.delete(Axis::Lin, 3, 5).is_err());
        assert!(m.delete(Axis::Lin, 0, 1).is_err());
        assert!(m.delete(Axis::Lin, 2, 0).is_err());
        assert_eq!(m.num_lin(), 4);
        assert_eq!(m.value(4, 2).as_deref(), Some("x"));
    }

    #[test]
    fn test_insert_then_delete_restores() {
        let mut m = grid(5, 3);
        m.set_value(2, 2, Some("a")).unwrap();
        m.set_value(4, 3, Some("b")).unwrap();
        m.set_cell_attr(CellAttr::BgColor, Target::Cell(4, 3), Some("1 2 3"))
            .unwrap();
        m.insert(Axis::Col, 2, 2).unwrap();
        m.delete(Axis::Col, 2, 2).unwrap();
        assert_eq!(m.num_col(), 3);
        assert_eq!(m.value(2, 2).as_deref(), Some("a"));
        assert_eq!(m.value(4, 3).as_deref(), Some("b"));
        assert_eq!(m.cell_attr(CellAttr::BgColor, Target::Cell(4, 3)), Some("1 2 3"));
    }

    #[test]
    fn test_set_count_grows_and_shrinks() {
        let mut m = grid(3, 3);
        m.set_count(Axis::Col, 6).unwrap();
        assert_eq!(m.num_col(), 6);
        m.set_count(Axis::Col, 1).unwrap();
        assert_eq!(m.num_col(), 1);
        m.set_count(Axis::Col, 0).unwrap();
        assert_eq!(m.num_col(), 0);
    }

    #[test]
    fn test_merge_moves_focus_to_start() {
        let mut m = grid(5, 5);
        m.set_focus(3, 3).unwrap();
        m.merge(MergedRange::new(2, 2, 4, 4)).unwrap();
        assert_eq!(m.focus(), (2, 2));
        assert!(m.merge(MergedRange::new(1, 1, 9, 1)).is_err());
        let split = m.merge_split(4, 4).unwrap();
        assert_eq!(split.to_attr_string(), "2:2-4:4");
        assert!(m.merge_split(4, 4).is_err());
    }

    #[test]
    fn test_clear_scopes() {
        let mut m = grid(2, 2);
        for l in 0..3 {
            for c in 0..3 {
                m.set_value(l, c, Some("v")).unwrap();
            }
        }
        m.clear_values(ClearScope::Range {
            lin1: 1,
            col1: 1,
            lin2: 1,
            col2: 2,
        })
        .unwrap();
        assert_eq!(m.value(1, 2), None);
        assert_eq!(m.value(2, 2).as_deref(), Some("v"));
        m.clear_values(ClearScope::Contents).unwrap();
        assert_eq!(m.value(2, 2), None);
        assert_eq!(m.value(0, 1).as_deref(), Some("v"));
        m.clear_values(ClearScope::All).unwrap();
        assert_eq!(m.value(0, 1), None);
    }

    #[test]
    fn test_clear_all_attributes_drops_line_overrides() {
        let mut m = grid(2, 2);
        m.set_cell_attr(CellAttr::FgColor, Target::Line(1), Some("5 5 5"))
            .unwrap();
        m.clear_attributes(ClearScope::All).unwrap();
        assert_eq!(m.cell_attr(CellAttr::FgColor, Target::Line(1)), None);
        assert_eq!(m.resolve_fg(1, 1), m.config().txt_fg_color);
    }

    #[test]
    fn test_clear_scope_parse() {
        assert_eq!(ClearScope::parse("marked"), Some(ClearScope::Marked));
        assert_eq!(
            ClearScope::parse("1:2-3:4"),
            Some(ClearScope::Range {
                lin1: 1,
                col1: 2,
                lin2: 3,
                col2: 4
            })
        );
        assert_eq!(ClearScope::parse("1:2"), None);
    }
}
