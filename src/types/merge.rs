use serde::{Deserialize, Serialize};

use super::Axis;

/// A rectangular block of cells drawn and edited as one unit.
///
/// Bounds are inclusive. `active == false` marks a freed slot that the
/// merge table may reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRange {
    pub start_lin: usize,
    pub end_lin: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub active: bool,
}

impl MergedRange {
    pub fn new(start_lin: usize, start_col: usize, end_lin: usize, end_col: usize) -> Self {
        Self {
            start_lin,
            end_lin,
            start_col,
            end_col,
            active: true,
        }
    }

    pub fn contains(&self, lin: usize, col: usize) -> bool {
        lin >= self.start_lin && lin <= self.end_lin && col >= self.start_col && col <= self.end_col
    }

    /// True when the two rectangles share at least one cell.
    pub fn overlaps(&self, other: &MergedRange) -> bool {
        self.start_lin <= other.end_lin
            && other.start_lin <= self.end_lin
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }

    /// Inclusive `(start, end)` along one axis.
    pub fn span(&self, axis: Axis) -> (usize, usize) {
        match axis {
            Axis::Lin => (self.start_lin, self.end_lin),
            Axis::Col => (self.start_col, self.end_col),
        }
    }

    pub(crate) fn set_span(&mut self, axis: Axis, start: usize, end: usize) {
        match axis {
            Axis::Lin => {
                self.start_lin = start;
                self.end_lin = end;
            }
            Axis::Col => {
                self.start_col = start;
                self.end_col = end;
            }
        }
    }

    pub fn is_single_cell(&self) -> bool {
        self.start_lin == self.end_lin && self.start_col == self.end_col
    }

    /// `"L1:C1-L2:C2"` form used by the attribute bridge.
    pub fn to_attr_string(&self) -> String {
        format!(
            "{}:{}-{}:{}",
            self.start_lin, self.start_col, self.end_lin, self.end_col
        )
    }
}
