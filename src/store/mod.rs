//! Cell value and per-cell flag storage.
//!
//! A matrix is built over one [`CellStore`] chosen at construction:
//! - [`OwnedStore`] keeps a 2D array of [`Cell`](crate::types::Cell)s
//! - [`CallbackStore`] keeps nothing and asks the application on demand

mod callback;
mod owned;

pub use callback::{CallbackStore, MarkEditFn, MarkFn, ValueEditFn, ValueFn};
pub use owned::OwnedStore;

use crate::types::{AttrFlags, Axis};

/// Storage interface shared by the owned and callback modes.
pub trait CellStore {
    /// Raw value of a cell.
    fn value(&self, lin: usize, col: usize) -> Option<String>;

    /// Store a value; `None` clears the cell.
    fn set_value(&mut self, lin: usize, col: usize, value: Option<&str>);

    /// Per-cell override presence bits (empty in callback mode).
    fn flags(&self, lin: usize, col: usize) -> AttrFlags;

    fn set_flags(&mut self, lin: usize, col: usize, flags: AttrFlags, on: bool);

    /// Per-cell overrides are kept regardless of flags.
    ///
    /// True in callback mode, where no per-cell flags exist.
    fn overrides_unflagged(&self) -> bool {
        false
    }

    fn is_marked(&self, lin: usize, col: usize) -> bool;

    /// Request a mark change; returns the state actually stored.
    fn set_marked(&mut self, lin: usize, col: usize, marked: bool) -> bool;

    /// Drop every per-cell mark.
    fn clear_marks(&mut self);

    /// Open `n` indices at `base` on `axis`.
    fn insert(&mut self, axis: Axis, base: usize, n: usize);

    /// Remove indices `[base, base + n)` on `axis`.
    fn remove(&mut self, axis: Axis, base: usize, n: usize);
}
