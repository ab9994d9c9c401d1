//! In-place editor overlay.
//!
//! One text widget and one dropdown widget are created lazily through an
//! [`EditWidgetFactory`] and reused for every session. At most one session
//! is active per matrix.

use tracing::debug;

use crate::error::{MatrixError, Result};
use crate::render::Rect;
use crate::types::CellType;

use super::resolve::CellStyle;
use super::Matrix;

/// Widget hosting an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Text,
    Dropdown,
}

/// Edit session transition reported to the edition callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTransition {
    /// Session about to start; false cancels it
    Start,
    /// Value about to be stored; false keeps the session open
    Confirm,
    Abort,
    /// Session dropped without storing (structure change, focus loss)
    Hide,
}

/// Child widget placed over the edited cell.
pub trait EditWidget {
    /// Place the widget over `rect` showing `value`.
    fn show(&mut self, rect: Rect, value: &str, style: &CellStyle);

    /// Choices of a dropdown widget. Text widgets ignore them.
    fn set_items(&mut self, items: &[String]);

    fn set_rect(&mut self, rect: Rect);

    fn hide(&mut self);

    /// Current text (for dropdowns, the selected item).
    fn value(&self) -> String;

    fn set_value(&mut self, value: &str);

    fn is_visible(&self) -> bool;
}

/// Creates the edit widgets on first use.
pub trait EditWidgetFactory {
    fn create(&self, kind: EditKind) -> Box<dyn EditWidget>;
}

/// Widget without a window; keeps text in memory.
#[derive(Debug, Clone, Default)]
pub struct HeadlessEditWidget {
    visible: bool,
    rect: Rect,
    value: String,
    items: Vec<String>,
}

impl HeadlessEditWidget {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl EditWidget for HeadlessEditWidget {
    fn show(&mut self, rect: Rect, value: &str, _style: &CellStyle) {
        self.rect = rect;
        self.value = value.to_string();
        self.visible = true;
    }

    fn set_items(&mut self, items: &[String]) {
        self.items = items.to_vec();
    }

    fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessEditFactory;

impl EditWidgetFactory for HeadlessEditFactory {
    fn create(&self, _kind: EditKind) -> Box<dyn EditWidget> {
        Box::new(HeadlessEditWidget::default())
    }
}

/// The cell being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub lin: usize,
    pub col: usize,
    pub kind: EditKind,
    /// Text placed in the widget when the session started
    pub original: String,
}

pub(crate) struct EditOverlay {
    factory: Box<dyn EditWidgetFactory>,
    text: Option<Box<dyn EditWidget>>,
    dropdown: Option<Box<dyn EditWidget>>,
    session: Option<EditSession>,
}

impl Default for EditOverlay {
    fn default() -> Self {
        Self {
            factory: Box::new(HeadlessEditFactory),
            text: None,
            dropdown: None,
            session: None,
        }
    }
}

impl EditOverlay {
    /// Replacing the factory drops widgets created by the old one.
    pub(crate) fn set_factory(&mut self, factory: Box<dyn EditWidgetFactory>) {
        if let Some(w) = self.active_widget() {
            w.hide();
        }
        self.factory = factory;
        self.text = None;
        self.dropdown = None;
        self.session = None;
    }

    fn widget(&mut self, kind: EditKind) -> &mut dyn EditWidget {
        let Self {
            factory,
            text,
            dropdown,
            ..
        } = self;
        let slot = match kind {
            EditKind::Text => text,
            EditKind::Dropdown => dropdown,
        };
        slot.get_or_insert_with(|| factory.create(kind)).as_mut()
    }

    fn active_widget(&mut self) -> Option<&mut dyn EditWidget> {
        let kind = self.session.as_ref()?.kind;
        Some(self.widget(kind))
    }

    pub(crate) fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }
}

impl Matrix {
    pub fn is_editing(&self) -> bool {
        self.edit.session.is_some()
    }

    /// Cell of the active edit session.
    pub fn edit_cell(&self) -> Option<(usize, usize)> {
        self.edit.session().map(|s| (s.lin, s.col))
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.session()
    }

    /// Widget of the active session.
    pub fn edit_widget_mut(&mut self) -> Option<&mut dyn EditWidget> {
        self.edit.active_widget()
    }

    /// Start editing the focus cell.
    pub fn edit_show(&mut self) -> Result<()> {
        self.edit_show_seeded(None)
    }

    /// Start editing with the widget text replaced by `seed` (typed character).
    pub(crate) fn edit_show_seeded(&mut self, seed: Option<&str>) -> Result<()> {
        let (lin, col) = self.focus();
        if self.config.readonly || Self::is_title(lin, col) {
            return Err(MatrixError::NotEditable(lin, col));
        }
        if self.edit_cell() == Some((lin, col)) {
            return Ok(());
        }
        let style = self.cell_style(lin, col);
        if style.kind == CellType::Toggle {
            return Err(MatrixError::NotEditable(lin, col));
        }
        if !self
            .callbacks
            .edition_allows(lin, col, EditTransition::Start)
        {
            debug!(lin, col, "edit start rejected");
            return Err(MatrixError::EditRejected);
        }
        self.edit_hide();
        self.scroll_cell_visible(lin, col);

        let items = self.callbacks.dropdown_items(lin, col);
        let kind = if items.is_some() {
            EditKind::Dropdown
        } else {
            EditKind::Text
        };
        let stored = self.store.value(lin, col).unwrap_or_default();
        let original = if self.numeric.is_numeric(col) {
            self.numeric
                .edit_text(col, &stored, self.config.numeric_decimal_symbol)
        } else {
            stored
        };
        let rect = self.editor_rect(lin, col);

        let widget = self.edit.widget(kind);
        if let Some(items) = &items {
            widget.set_items(items);
        }
        widget.show(rect, &original, &style);
        if let Some(seed) = seed {
            widget.set_value(seed);
        }
        debug!(lin, col, ?kind, "edit start");
        self.edit.session = Some(EditSession {
            lin,
            col,
            kind,
            original,
        });
        self.request_redraw();
        Ok(())
    }

    /// Store the edited text. A rejected confirm keeps the session open.
    pub fn edit_confirm(&mut self) -> Result<()> {
        let Some(session) = self.edit.session.clone() else {
            return Err(MatrixError::NoEditSession);
        };
        if !self
            .callbacks
            .edition_allows(session.lin, session.col, EditTransition::Confirm)
        {
            debug!(lin = session.lin, col = session.col, "edit confirm rejected");
            return Err(MatrixError::EditRejected);
        }
        let widget = self.edit.widget(session.kind);
        let text = widget.value();
        widget.hide();
        self.edit.session = None;
        debug!(lin = session.lin, col = session.col, "edit confirm");
        if text != session.original {
            self.commit_value(session.lin, session.col, &text);
        }
        self.request_redraw();
        Ok(())
    }

    /// Drop the session without storing.
    pub fn edit_abort(&mut self) -> Result<()> {
        let Some(session) = self.edit.session.take() else {
            return Err(MatrixError::NoEditSession);
        };
        self.callbacks
            .edition_allows(session.lin, session.col, EditTransition::Abort);
        self.edit.widget(session.kind).hide();
        debug!(lin = session.lin, col = session.col, "edit abort");
        self.request_redraw();
        Ok(())
    }

    /// Drop any session silently.
    pub(crate) fn edit_hide(&mut self) {
        if let Some(session) = self.edit.session.take() {
            self.callbacks
                .edition_allows(session.lin, session.col, EditTransition::Hide);
            self.edit.widget(session.kind).hide();
            debug!(lin = session.lin, col = session.col, "edit hide");
        }
    }

    /// Editor rectangle, clipped to the scrollable part of the data area.
    fn editor_rect(&self, lin: usize, col: usize) -> Rect {
        let Some((rect, true)) = self.cell_rect(lin, col) else {
            return Rect::default();
        };
        let area = self.data_area();
        let body = Rect::new(
            self.cols.fixed_size(),
            self.lines.fixed_size(),
            area.w - self.cols.fixed_size(),
            area.h - self.lines.fixed_size(),
        );
        let clip = if lin < self.lines.fixed() || col < self.cols.fixed() {
            area
        } else {
            body
        };
        rect.intersect(&clip).unwrap_or_default()
    }

    /// Follow the edited cell after a scroll or resize.
    pub(crate) fn reposition_editor(&mut self) {
        let Some((lin, col)) = self.edit_cell() else {
            return;
        };
        let rect = self.editor_rect(lin, col);
        if let Some(widget) = self.edit.active_widget() {
            widget.set_rect(rect);
        }
    }

    /// Flip a toggle cell between `"0"` and `"1"`. Returns the new state.
    pub fn toggle_value(&mut self, lin: usize, col: usize) -> Result<bool> {
        self.check_cell(lin, col)?;
        if self.config.readonly || Self::is_title(lin, col) {
            return Err(MatrixError::NotEditable(lin, col));
        }
        let on = self.store.value(lin, col).as_deref() != Some("1");
        self.store
            .set_value(lin, col, Some(if on { "1" } else { "0" }));
        if let Some(f) = &self.callbacks.toggle_value {
            f(lin, col, on);
        }
        self.callbacks.value_changed(lin, col);
        self.request_redraw();
        Ok(on)
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
    use crate::config::MatrixConfig;

    fn grid() -> Matrix {
        let mut m = Matrix::new(MatrixConfig {
            num_lin: 5,
            num_col: 3,
            ..MatrixConfig::default()
        });
        m.resize(400, 200);
        m.set_focus(2, 2).unwrap();
        m
    }

    #[test]
    fn test_confirm_stores_widget_text() {
        let mut m = grid();
        m.set_value(2, 2, Some("old")).unwrap();
        m.edit_show().unwrap();
        assert_eq!(m.edit_widget_mut().unwrap().value(), "old");
        m.edit_widget_mut().unwrap().set_value("new");
        m.edit_confirm().unwrap();
        assert!(!m.is_editing());
        assert_eq!(m.value(2, 2).as_deref(), Some("new"));
    }

    #[test]
    fn test_abort_keeps_value() {
        let mut m = grid();
        m.set_value(2, 2, Some("keep")).unwrap();
        m.edit_show().unwrap();
        m.edit_widget_mut().unwrap().set_value("typed");
        m.edit_abort().unwrap();
        assert_eq!(m.value(2, 2).as_deref(), Some("keep"));
        assert!(matches!(m.edit_abort(), Err(MatrixError::NoEditSession)));
    }

    #[test]
    fn test_rejected_confirm_keeps_session() {
        let mut m = grid();
        m.callbacks_mut().edition =
            Some(Box::new(|_, _, t| t != EditTransition::Confirm));
        m.edit_show().unwrap();
        m.edit_widget_mut().unwrap().set_value("x");
        assert!(matches!(m.edit_confirm(), Err(MatrixError::EditRejected)));
        assert_eq!(m.edit_cell(), Some((2, 2)));
        assert_eq!(m.value(2, 2), None);
    }

    #[test]
    fn test_readonly_and_toggle_not_editable() {
        let mut m = grid();
        m.config.readonly = true;
        assert!(matches!(m.edit_show(), Err(MatrixError::NotEditable(2, 2))));
        m.config.readonly = false;
        m.set_attribute("TYPE2:2", Some("TOGGLE")).unwrap();
        assert!(matches!(m.edit_show(), Err(MatrixError::NotEditable(2, 2))));
        assert!(m.toggle_value(2, 2).unwrap());
        assert_eq!(m.value(2, 2).as_deref(), Some("1"));
        assert!(!m.toggle_value(2, 2).unwrap());
    }

    #[test]
    fn test_dropdown_when_callback_gives_items() {
        let mut m = grid();
        m.callbacks_mut().dropdown =
            Some(Box::new(|_, c| (c == 2).then(|| vec!["a".into(), "b".into()])));
        m.edit_show().unwrap();
        assert_eq!(m.edit_session().unwrap().kind, EditKind::Dropdown);
        m.edit_widget_mut().unwrap().set_value("b");
        m.edit_confirm().unwrap();
        assert_eq!(m.value(2, 2).as_deref(), Some("b"));
    }

    #[test]
    fn test_value_changed_only_on_change() {
        let mut m = grid();
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        m.callbacks_mut().value_changed = Some(Box::new(move |_, _| *sink.borrow_mut() += 1));
        m.edit_show().unwrap();
        m.edit_confirm().unwrap();
        assert_eq!(*hits.borrow(), 0);
        m.edit_show().unwrap();
        m.edit_widget_mut().unwrap().set_value("v");
        m.edit_confirm().unwrap();
        assert_eq!(*hits.borrow(), 1);
    }
}
