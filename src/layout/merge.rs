//! Merged-range table.
//!
//! Ranges live in a slot vector; splitting a range frees its slot
//! (`active = false`) and the next merge reuses it. Active ranges never
//! share a cell.

use tracing::debug;

use crate::error::{MatrixError, Result};
use crate::types::{Axis, MergedRange};

#[derive(Debug, Clone, Default)]
pub struct MergeTable {
    slots: Vec<MergedRange>,
}

impl MergeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a merged range and return its slot.
    ///
    /// Rejects inverted, single-cell, title-mixing and overlapping ranges.
    pub fn merge(&mut self, range: MergedRange) -> Result<usize> {
        if range.start_lin > range.end_lin || range.start_col > range.end_col {
            return Err(MatrixError::InvalidRange(range.to_attr_string()));
        }
        if range.is_single_cell() {
            return Err(MatrixError::MergeDegenerate);
        }
        if (range.start_lin == 0 && range.end_lin > 0) || (range.start_col == 0 && range.end_col > 0) {
            debug!(range = %range.to_attr_string(), "merge rejected: title mix");
            return Err(MatrixError::MergeTitleMix);
        }
        if let Some((slot, _)) = self.iter().find(|(_, r)| r.overlaps(&range)) {
            debug!(range = %range.to_attr_string(), slot, "merge rejected: overlap");
            return Err(MatrixError::MergeOverlap(slot));
        }

        let range = MergedRange {
            active: true,
            ..range
        };
        let slot = match self.slots.iter().position(|r| !r.active) {
            Some(free) => {
                if let Some(s) = self.slots.get_mut(free) {
                    *s = range;
                }
                free
            }
            None => {
                self.slots.push(range);
                self.slots.len() - 1
            }
        };
        debug!(range = %range.to_attr_string(), slot, "merged");
        Ok(slot)
    }

    /// Free the range containing `(lin, col)`.
    pub fn split(&mut self, lin: usize, col: usize) -> Option<MergedRange> {
        let range = self
            .slots
            .iter_mut()
            .find(|r| r.active && r.contains(lin, col))?;
        range.active = false;
        debug!(range = %range.to_attr_string(), "split");
        Some(*range)
    }

    /// Active range containing `(lin, col)`.
    pub fn find(&self, lin: usize, col: usize) -> Option<&MergedRange> {
        self.slots.iter().find(|r| r.active && r.contains(lin, col))
    }

    /// Active ranges with their slot numbers.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MergedRange)> {
        self.slots.iter().enumerate().filter(|(_, r)| r.active)
    }

    pub fn active_count(&self) -> usize {
        self.iter().count()
    }

    /// Slot count, free slots included.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Shift or stretch ranges for `n` indices opened at `base`.
    pub fn insert(&mut self, axis: Axis, base: usize, n: usize) {
        for range in self.slots.iter_mut().filter(|r| r.active) {
            let (start, end) = range.span(axis);
            if start >= base {
                range.set_span(axis, start + n, end + n);
            } else if end >= base {
                range.set_span(axis, start, end + n);
            }
        }
    }

    /// Shrink or drop ranges for indices `[base, base + n)` removed.
    ///
    /// A range loses its merge when every index it had on `axis` is
    /// removed, or when what remains is a single cell.
    pub fn remove(&mut self, axis: Axis, base: usize, n: usize) {
        let end_removed = base + n;
        for range in self.slots.iter_mut().filter(|r| r.active) {
            let (start, end) = range.span(axis);
            if start >= base && end < end_removed {
                range.active = false;
                debug!(range = %range.to_attr_string(), "merge dropped: fully removed");
                continue;
            }
            let new_start = if start < base {
                start
            } else if start >= end_removed {
                start - n
            } else {
                base
            };
            let new_end = if end < base {
                end
            } else if end >= end_removed {
                end - n
            } else {
                base - 1
            };
            range.set_span(axis, new_start, new_end);
            if range.is_single_cell() {
                range.active = false;
                debug!(range = %range.to_attr_string(), "merge dropped: single cell left");
            }
        }
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

    #[test]
    fn test_overlap_rejected_first_kept() {
        let mut t = MergeTable::new();
        t.merge(MergedRange::new(2, 1, 4, 1)).unwrap();
        let err = t.merge(MergedRange::new(3, 1, 5, 1)).unwrap_err();
        assert!(matches!(err, MatrixError::MergeOverlap(0)));
        assert_eq!(t.active_count(), 1);
        assert_eq!(*t.find(3, 1).unwrap(), MergedRange::new(2, 1, 4, 1));
    }

    #[test]
    fn test_degenerate_and_title_mix() {
        let mut t = MergeTable::new();
        assert!(matches!(
            t.merge(MergedRange::new(2, 2, 2, 2)),
            Err(MatrixError::MergeDegenerate)
        ));
        assert!(matches!(
            t.merge(MergedRange::new(0, 1, 2, 1)),
            Err(MatrixError::MergeTitleMix)
        ));
        // Title-only merges are allowed
        assert!(t.merge(MergedRange::new(0, 1, 0, 3)).is_ok());
    }

    #[test]
    fn test_split_frees_slot_for_reuse() {
        let mut t = MergeTable::new();
        t.merge(MergedRange::new(1, 1, 2, 2)).unwrap();
        t.merge(MergedRange::new(5, 5, 6, 6)).unwrap();
        assert!(t.split(2, 1).is_some());
        assert!(t.find(1, 1).is_none());
        let slot = t.merge(MergedRange::new(1, 1, 1, 3)).unwrap();
        assert_eq!(slot, 0);
        assert_eq!(t.capacity(), 2);
    }

    #[test]
    fn test_insert_shifts_and_stretches() {
        let mut t = MergeTable::new();
        t.merge(MergedRange::new(2, 1, 4, 1)).unwrap();
        t.merge(MergedRange::new(6, 1, 7, 1)).unwrap();
        t.insert(Axis::Lin, 3, 2);
        assert!(t.find(6, 1).is_some());
        assert_eq!(t.find(2, 1).unwrap().end_lin, 6);
        assert_eq!(t.find(8, 1).unwrap().start_lin, 8);
        assert_eq!(t.find(8, 1).unwrap().end_lin, 9);
    }

    #[test]
    fn test_remove_shrinks_straddling() {
        let mut t = MergeTable::new();
        t.merge(MergedRange::new(2, 1, 6, 2)).unwrap();
        t.remove(Axis::Lin, 3, 2);
        let r = t.find(2, 1).unwrap();
        assert_eq!((r.start_lin, r.end_lin), (2, 4));
    }

    #[test]
    fn test_remove_drops_fully_removed() {
        let mut t = MergeTable::new();
        t.merge(MergedRange::new(3, 1, 4, 3)).unwrap();
        t.remove(Axis::Lin, 2, 5);
        assert_eq!(t.active_count(), 0);
    }

    #[test]
    fn test_remove_to_single_cell_on_both_axes() {
        let mut t = MergeTable::new();
        t.merge(MergedRange::new(2, 2, 3, 3)).unwrap();
        // Columns first: 2x2 -> 2x1, still merged
        t.remove(Axis::Col, 3, 1);
        assert_eq!(*t.find(2, 2).unwrap(), MergedRange::new(2, 2, 3, 2));
        // Then lines: 2x1 -> 1x1, merge dropped
        t.remove(Axis::Lin, 2, 1);
        assert_eq!(t.active_count(), 0);

        // Same rectangle, lines first
        let mut t = MergeTable::new();
        t.merge(MergedRange::new(2, 2, 3, 3)).unwrap();
        t.remove(Axis::Lin, 3, 1);
        assert_eq!(*t.find(2, 3).unwrap(), MergedRange::new(2, 2, 2, 3));
        t.remove(Axis::Col, 2, 1);
        assert_eq!(t.active_count(), 0);
    }

    #[test]
    fn test_remove_shifts_following() {
        let mut t = MergeTable::new();
        t.merge(MergedRange::new(1, 6, 1, 8)).unwrap();
        t.remove(Axis::Col, 2, 3);
        let r = t.find(1, 3).unwrap();
        assert_eq!((r.start_col, r.end_col), (3, 5));
    }
}
