use std::collections::HashSet;
use std::fmt;

use tracing::trace;

use super::CellStore;
use crate::types::{AttrFlags, Axis};

/// Fetches the value of a cell.
pub type ValueFn = Box<dyn Fn(usize, usize) -> Option<String>>;
/// Receives an edited value.
pub type ValueEditFn = Box<dyn Fn(usize, usize, Option<&str>)>;
/// Reports whether a cell is marked.
pub type MarkFn = Box<dyn Fn(usize, usize) -> bool>;
/// Told about a mark change; may return the state to store instead.
///
/// The handler has no access to the store, so it cannot mark cells itself
/// and is never re-entered.
pub type MarkEditFn = Box<dyn Fn(usize, usize, bool) -> Option<bool>>;

/// Values fetched from and stored through application callbacks.
///
/// Nothing is kept per cell except marks, which go to a hash table unless
/// the application answers mark queries itself.
#[derive(Default)]
pub struct CallbackStore {
    value: Option<ValueFn>,
    value_edit: Option<ValueEditFn>,
    mark: Option<MarkFn>,
    mark_edit: Option<MarkEditFn>,
    marks: HashSet<(usize, usize)>,
}

impl fmt::Debug for CallbackStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackStore")
            .field("value", &self.value.is_some())
            .field("value_edit", &self.value_edit.is_some())
            .field("mark", &self.mark.is_some())
            .field("mark_edit", &self.mark_edit.is_some())
            .field("marks", &self.marks.len())
            .finish()
    }
}

impl CallbackStore {
    pub fn new(value: ValueFn) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value_edit(mut self, f: ValueEditFn) -> Self {
        self.value_edit = Some(f);
        self
    }

    #[must_use]
    pub fn with_mark(mut self, f: MarkFn) -> Self {
        self.mark = Some(f);
        self
    }

    #[must_use]
    pub fn with_mark_edit(mut self, f: MarkEditFn) -> Self {
        self.mark_edit = Some(f);
        self
    }

    /// Marked cells kept in the local table.
    pub fn local_marks(&self) -> usize {
        self.marks.len()
    }

    fn shift_marks(&mut self, axis: Axis, map: impl Fn(usize) -> Option<usize>) {
        self.marks = self
            .marks
            .drain()
            .filter_map(|(lin, col)| match axis {
                Axis::Lin => map(lin).map(|l| (l, col)),
                Axis::Col => map(col).map(|c| (lin, c)),
            })
            .collect();
    }
}

impl CellStore for CallbackStore {
    fn value(&self, lin: usize, col: usize) -> Option<String> {
        self.value.as_ref().and_then(|f| f(lin, col))
    }

    fn set_value(&mut self, lin: usize, col: usize, value: Option<&str>) {
        if let Some(f) = &self.value_edit {
            f(lin, col, value);
        }
    }

    fn flags(&self, _lin: usize, _col: usize) -> AttrFlags {
        AttrFlags::empty()
    }

    fn set_flags(&mut self, _lin: usize, _col: usize, _flags: AttrFlags, _on: bool) {}

    fn overrides_unflagged(&self) -> bool {
        true
    }

    fn is_marked(&self, lin: usize, col: usize) -> bool {
        match &self.mark {
            Some(f) => f(lin, col),
            None => self.marks.contains(&(lin, col)),
        }
    }

    fn set_marked(&mut self, lin: usize, col: usize, marked: bool) -> bool {
        let stored = self
            .mark_edit
            .as_ref()
            .and_then(|f| f(lin, col, marked))
            .unwrap_or(marked);
        trace!(lin, col, marked = stored, "callback mark");
        if stored {
            self.marks.insert((lin, col));
        } else {
            self.marks.remove(&(lin, col));
        }
        stored
    }

    fn clear_marks(&mut self) {
        let marked: Vec<(usize, usize)> = self.marks.iter().copied().collect();
        for (lin, col) in marked {
            self.set_marked(lin, col, false);
        }
        self.marks.clear();
    }

    fn insert(&mut self, axis: Axis, base: usize, n: usize) {
        self.shift_marks(axis, |i| Some(if i >= base { i + n } else { i }));
    }

    fn remove(&mut self, axis: Axis, base: usize, n: usize) {
        self.shift_marks(axis, |i| {
            if i < base {
                Some(i)
            } else if i >= base + n {
                Some(i - n)
            } else {
                None
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_values_come_from_callback() {
        let store = CallbackStore::new(Box::new(|l, c| Some(format!("{l}:{c}"))));
        assert_eq!(store.value(3, 4).as_deref(), Some("3:4"));
        assert!(store.overrides_unflagged());
    }

    #[test]
    fn test_value_edit_forwarded() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut store = CallbackStore::new(Box::new(|_, _| None)).with_value_edit(Box::new(
            move |l, c, v| sink.borrow_mut().push((l, c, v.map(str::to_string))),
        ));
        store.set_value(1, 2, Some("new"));
        assert_eq!(log.borrow().as_slice(), &[(1, 2, Some("new".to_string()))]);
    }

    #[test]
    fn test_mark_edit_can_override() {
        let mut store = CallbackStore::new(Box::new(|_, _| None))
            .with_mark_edit(Box::new(|lin, _, _| (lin == 2).then_some(false)));
        assert!(store.set_marked(1, 1, true));
        assert!(!store.set_marked(2, 1, true));
        assert!(store.is_marked(1, 1));
        assert!(!store.is_marked(2, 1));
    }

    #[test]
    fn test_marks_shift_with_structure() {
        let mut store = CallbackStore::new(Box::new(|_, _| None));
        store.set_marked(3, 1, true);
        store.set_marked(5, 1, true);
        store.remove(Axis::Lin, 3, 1);
        assert!(!store.is_marked(3, 1));
        assert!(store.is_marked(4, 1));
        store.insert(Axis::Col, 1, 2);
        assert!(store.is_marked(4, 3));
        store.clear_marks();
        assert_eq!(store.local_marks(), 0);
    }
}
