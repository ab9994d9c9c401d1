use super::CellStore;
use crate::types::{AttrFlags, Axis, Cell};

/// In-memory 2D cell array, `cells[lin][col]`, titles included.
///
/// Rows always have the same length; inserting columns grows every row
/// in lockstep.
#[derive(Debug, Clone, Default)]
pub struct OwnedStore {
    cells: Vec<Vec<Cell>>,
    num_col: usize,
}

impl OwnedStore {
    /// Store for `num_lin` x `num_col` cells, titles included.
    pub fn new(num_lin: usize, num_col: usize) -> Self {
        Self {
            cells: vec![vec![Cell::default(); num_col]; num_lin],
            num_col,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cells.len(), self.num_col)
    }

    fn cell(&self, lin: usize, col: usize) -> Option<&Cell> {
        self.cells.get(lin).and_then(|row| row.get(col))
    }

    fn cell_mut(&mut self, lin: usize, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(lin).and_then(|row| row.get_mut(col))
    }
}

impl CellStore for OwnedStore {
    fn value(&self, lin: usize, col: usize) -> Option<String> {
        self.cell(lin, col).and_then(|c| c.value.clone())
    }

    fn set_value(&mut self, lin: usize, col: usize, value: Option<&str>) {
        if let Some(cell) = self.cell_mut(lin, col) {
            cell.value = value.map(str::to_string);
        }
    }

    fn flags(&self, lin: usize, col: usize) -> AttrFlags {
        self.cell(lin, col).map(|c| c.flags).unwrap_or_default()
    }

    fn set_flags(&mut self, lin: usize, col: usize, flags: AttrFlags, on: bool) {
        if let Some(cell) = self.cell_mut(lin, col) {
            cell.flags.set(flags, on);
        }
    }

    fn is_marked(&self, lin: usize, col: usize) -> bool {
        self.flags(lin, col).contains(AttrFlags::MARKED)
    }

    fn set_marked(&mut self, lin: usize, col: usize, marked: bool) -> bool {
        match self.cell_mut(lin, col) {
            Some(cell) => {
                cell.flags.set(AttrFlags::MARKED, marked);
                marked
            }
            None => false,
        }
    }

    fn clear_marks(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.flags.remove(AttrFlags::MARKED);
        }
    }

    fn insert(&mut self, axis: Axis, base: usize, n: usize) {
        match axis {
            Axis::Lin => {
                let base = base.min(self.cells.len());
                let width = self.num_col;
                let tail = self.cells.split_off(base);
                self.cells
                    .extend(std::iter::repeat_with(|| vec![Cell::default(); width]).take(n));
                self.cells.extend(tail);
            }
            Axis::Col => {
                let base = base.min(self.num_col);
                for row in &mut self.cells {
                    let tail = row.split_off(base);
                    row.extend(std::iter::repeat(Cell::default()).take(n));
                    row.extend(tail);
                }
                self.num_col += n;
            }
        }
    }

    fn remove(&mut self, axis: Axis, base: usize, n: usize) {
        match axis {
            Axis::Lin => {
                let end = (base + n).min(self.cells.len());
                if base < end {
                    self.cells.drain(base..end);
                }
            }
            Axis::Col => {
                let end = (base + n).min(self.num_col);
                if base < end {
                    for row in &mut self.cells {
                        row.drain(base..end);
                    }
                    self.num_col -= end - base;
                }
            }
        }
    }
}
