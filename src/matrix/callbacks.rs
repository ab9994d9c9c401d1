//! Application hooks.
//!
//! Every hook is optional. Hooks run synchronously on the caller's thread
//! while the matrix is borrowed, so they must not call back into it; use
//! shared state (`Rc<RefCell<..>>`) to record what they need.

use std::fmt;

use crate::color::Rgb;
use crate::render::{Canvas, Rect};
use crate::types::{CellType, Modifiers};

use super::edit::EditTransition;
use super::events::MouseButton;

/// Per-cell query hook.
pub type CellFn<T> = Box<dyn Fn(usize, usize) -> T>;

/// Pointer click on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub lin: usize,
    pub col: usize,
    pub button: MouseButton,
    pub mods: Modifiers,
    pub double: bool,
}

#[derive(Default)]
pub struct Callbacks {
    /// Font override, consulted before the attribute table
    pub font: Option<CellFn<Option<String>>>,
    /// Foreground override
    pub fg_color: Option<CellFn<Option<Rgb>>>,
    /// Background override
    pub bg_color: Option<CellFn<Option<Rgb>>>,
    /// Cell type override
    pub cell_type: Option<CellFn<Option<CellType>>>,
    /// Edit session transitions; returning false rejects a start or confirm
    pub edition: Option<Box<dyn Fn(usize, usize, EditTransition) -> bool>>,
    /// Items for a dropdown editor; `None` edits with the text widget
    pub dropdown: Option<CellFn<Option<Vec<String>>>>,
    /// Whether a cell shows the dropdown feedback button
    pub drop_check: Option<CellFn<bool>>,
    /// A toggle cell changed to the given state
    pub toggle_value: Option<Box<dyn Fn(usize, usize, bool)>>,
    /// Custom cell painter; returning true skips the default content
    pub draw: Option<Box<dyn Fn(usize, usize, Rect, &mut dyn Canvas) -> bool>>,
    /// Focus entered a cell
    pub enter_item: Option<Box<dyn Fn(usize, usize)>>,
    /// Focus is leaving a cell; returning false keeps it there
    pub leave_item: Option<CellFn<bool>>,
    /// Button press on a cell; returning false ignores the click
    pub click: Option<Box<dyn Fn(Click) -> bool>>,
    /// Button release on a cell
    pub release: Option<Box<dyn Fn(Click)>>,
    /// First visible line/column changed
    pub scroll_top: Option<Box<dyn Fn(usize, usize)>>,
    /// Canvas size changed
    pub resize: Option<Box<dyn Fn(i32, i32)>>,
    /// A value changed through interaction
    pub value_changed: Option<Box<dyn Fn(usize, usize)>>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("font", &self.font.is_some())
            .field("fg_color", &self.fg_color.is_some())
            .field("bg_color", &self.bg_color.is_some())
            .field("cell_type", &self.cell_type.is_some())
            .field("edition", &self.edition.is_some())
            .field("dropdown", &self.dropdown.is_some())
            .field("drop_check", &self.drop_check.is_some())
            .field("toggle_value", &self.toggle_value.is_some())
            .field("draw", &self.draw.is_some())
            .field("enter_item", &self.enter_item.is_some())
            .field("leave_item", &self.leave_item.is_some())
            .field("click", &self.click.is_some())
            .field("release", &self.release.is_some())
            .field("scroll_top", &self.scroll_top.is_some())
            .field("resize", &self.resize.is_some())
            .field("value_changed", &self.value_changed.is_some())
            .finish()
    }
}

impl Callbacks {
    pub(crate) fn edition_allows(&self, lin: usize, col: usize, transition: EditTransition) -> bool {
        self.edition.as_ref().map_or(true, |f| f(lin, col, transition))
    }

    pub(crate) fn leave_allows(&self, lin: usize, col: usize) -> bool {
        self.leave_item.as_ref().map_or(true, |f| f(lin, col))
    }

    pub(crate) fn enter(&self, lin: usize, col: usize) {
        if let Some(f) = &self.enter_item {
            f(lin, col);
        }
    }

    pub(crate) fn value_changed(&self, lin: usize, col: usize) {
        if let Some(f) = &self.value_changed {
            f(lin, col);
        }
    }

    pub(crate) fn dropdown_items(&self, lin: usize, col: usize) -> Option<Vec<String>> {
        self.dropdown.as_ref().and_then(|f| f(lin, col))
    }

    pub(crate) fn shows_drop_button(&self, lin: usize, col: usize) -> bool {
        self.drop_check.as_ref().is_some_and(|f| f(lin, col))
    }
}
