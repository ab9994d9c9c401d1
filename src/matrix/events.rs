//! Keyboard and mouse input.
//!
//! Every handler returns `true` when the event was consumed.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::EditNext;
use crate::scrollbar::ScrollAction;
use crate::types::{Axis, CellType, Modifiers};

use super::callbacks::Click;
use super::Matrix;

/// Key relevant to the grid; other keys go to the edit widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Enter,
    Escape,
    F2,
    Delete,
    Space,
    /// Printable character
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl Matrix {
    // ========================================================================
    // Navigation
    // ========================================================================

    /// Next focusable cell from the focus along `axis`, skipping hidden
    /// indices and the inside of merged ranges.
    fn step(&self, axis: Axis, forward: bool) -> Option<(usize, usize)> {
        let (mut lin, mut col) = self.focus();
        let here = self.merge_start(lin, col);
        if forward {
            if let Some(m) = self.merges.find(lin, col) {
                match axis {
                    Axis::Lin => lin = m.end_lin,
                    Axis::Col => col = m.end_col,
                }
            }
        }
        loop {
            let model = self.axis(axis);
            let index = axis.pick(lin, col);
            let next = if forward {
                model.next_shown(index)?
            } else {
                model.prev_shown(index)?
            };
            match axis {
                Axis::Lin => lin = next,
                Axis::Col => col = next,
            }
            let target = self.merge_start(lin, col);
            if target != here {
                return Some(target);
            }
        }
    }

    /// First or last shown data index of an axis.
    fn edge(&self, axis: Axis, end: bool) -> Option<usize> {
        let model = self.axis(axis);
        if end {
            model.prev_shown(model.count())
        } else {
            model.next_shown(0)
        }
    }

    fn move_focus(&mut self, target: Option<(usize, usize)>, mods: Modifiers) -> bool {
        let Some((lin, col)) = target else {
            return true;
        };
        if mods.shift && self.selection.multiple {
            if self.selection.anchor.is_none() {
                let (fl, fc) = self.focus();
                self.mark_click(fl, fc, Modifiers::NONE);
            }
            if matches!(self.set_focus(lin, col), Ok(true)) {
                self.mark_extend_to(lin, col);
            }
        } else if let Err(err) = self.set_focus(lin, col) {
            trace!(lin, col, %err, "focus move ignored");
        }
        true
    }

    fn page_target(&self, forward: bool) -> Option<(usize, usize)> {
        let (lin, col) = self.focus();
        let page = self.lines.last().saturating_sub(self.lines.first()).max(1);
        let mut target = lin;
        for _ in 0..page {
            let next = if forward {
                self.lines.next_shown(target)
            } else {
                self.lines.prev_shown(target)
            };
            match next {
                Some(n) => target = n,
                None => break,
            }
        }
        Some(self.merge_start(target, col))
    }

    /// Tab order: along the line, wrapping to the next or previous line.
    fn tab_target(&self, back: bool) -> Option<(usize, usize)> {
        if let Some(target) = self.step(Axis::Col, !back) {
            return Some(target);
        }
        let (lin, _) = self.focus();
        let next_lin = if back {
            self.lines
                .prev_shown(lin)
                .or_else(|| self.edge(Axis::Lin, true))?
        } else {
            self.lines
                .next_shown(lin)
                .or_else(|| self.edge(Axis::Lin, false))?
        };
        let col = self.edge(Axis::Col, back)?;
        Some(self.merge_start(next_lin, col))
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn key_press(&mut self, key: Key, mods: Modifiers) -> bool {
        trace!(?key, ?mods, "key");
        if self.num_lin() == 0 || self.num_col() == 0 {
            return false;
        }
        if self.is_editing() {
            return self.key_while_editing(key, mods);
        }
        match key {
            Key::Up => self.move_focus(self.step(Axis::Lin, false), mods),
            Key::Down => self.move_focus(self.step(Axis::Lin, true), mods),
            Key::Left => self.move_focus(self.step(Axis::Col, false), mods),
            Key::Right => self.move_focus(self.step(Axis::Col, true), mods),
            Key::Home | Key::End => {
                let end = key == Key::End;
                let (lin, _) = self.focus();
                let lin = if mods.ctrl { self.edge(Axis::Lin, end) } else { Some(lin) };
                let target = lin
                    .zip(self.edge(Axis::Col, end))
                    .map(|(l, c)| self.merge_start(l, c));
                self.move_focus(target, mods)
            }
            Key::PageUp => self.move_focus(self.page_target(false), mods),
            Key::PageDown => self.move_focus(self.page_target(true), mods),
            Key::Tab => {
                let target = self.tab_target(mods.shift);
                self.move_focus(target, Modifiers::NONE)
            }
            Key::Enter | Key::F2 | Key::Space => {
                let (lin, col) = self.focus();
                if self.resolve_type(lin, col) == CellType::Toggle {
                    self.toggle_value(lin, col).is_ok()
                } else if key == Key::Space {
                    self.edit_show_seeded(Some(" ")).is_ok()
                } else {
                    self.edit_show().is_ok()
                }
            }
            Key::Delete => self.delete_key(),
            Key::Char(c) => {
                let mut seed = [0u8; 4];
                self.edit_show_seeded(Some(c.encode_utf8(&mut seed))).is_ok()
            }
            Key::Escape => false,
        }
    }

    fn key_while_editing(&mut self, key: Key, mods: Modifiers) -> bool {
        match key {
            Key::Escape => self.edit_abort().is_ok(),
            Key::Enter => {
                if self.edit_confirm().is_ok() {
                    let target = match self.config.edit_next {
                        EditNext::Lin => self.step(Axis::Lin, true),
                        EditNext::Col => self.step(Axis::Col, true),
                        EditNext::None => None,
                    };
                    self.move_focus(target, Modifiers::NONE);
                }
                true
            }
            Key::Tab => {
                if self.edit_confirm().is_ok() {
                    let target = self.tab_target(mods.shift);
                    self.move_focus(target, Modifiers::NONE);
                }
                true
            }
            Key::Up | Key::Down | Key::PageUp | Key::PageDown => {
                if self.edit_confirm().is_ok() {
                    self.key_press(key, Modifiers::NONE);
                }
                true
            }
            _ => false,
        }
    }

    /// Delete clears the marked cells, or the focus cell when none is marked.
    fn delete_key(&mut self) -> bool {
        if self.config.readonly {
            return false;
        }
        let mut cells = self.marked_cells();
        if cells.is_empty() {
            cells.push(self.focus());
        }
        for &(lin, col) in &cells {
            if self.store.value(lin, col).is_some() {
                self.store.set_value(lin, col, None);
                self.callbacks.value_changed(lin, col);
            }
        }
        self.request_redraw();
        true
    }

    // ========================================================================
    // Mouse
    // ========================================================================

    fn scrollbar_at(&self, x: i32, y: i32) -> Option<Axis> {
        Axis::BOTH.into_iter().find(|&axis| {
            let sb = self.scrollbar(axis);
            sb.is_visible() && sb.rect().contains(x, y)
        })
    }

    pub fn mouse_press(
        &mut self,
        x: i32,
        y: i32,
        button: MouseButton,
        mods: Modifiers,
        double: bool,
    ) -> bool {
        if let Some(axis) = self.scrollbar_at(x, y) {
            if button == MouseButton::Left {
                self.pointer.scrollbar = Some(axis);
                if let Some(action) = self.scrollbar_mut(axis).press(x, y) {
                    self.scroll(axis, action);
                }
                self.request_redraw();
            }
            return true;
        }
        let Some((lin, col)) = self.cell_at(x, y) else {
            return false;
        };
        if self.is_editing() && self.edit_cell() != Some((lin, col)) && self.edit_confirm().is_err() {
            return true;
        }
        let click = Click {
            lin,
            col,
            button,
            mods,
            double,
        };
        if let Some(f) = &self.callbacks.click {
            if !f(click) {
                return true;
            }
        }
        self.pointer.pressed = Some((lin, col));
        if button != MouseButton::Left {
            return true;
        }
        if Self::is_title(lin, col) {
            self.mark_click(lin, col, mods);
            self.pointer.marking = self.selection.anchor.is_some();
            return true;
        }
        if !matches!(self.set_focus(lin, col), Ok(true)) {
            return true;
        }
        self.mark_click(lin, col, mods);
        self.pointer.marking = self.selection.anchor.is_some();
        let started = if self.resolve_type(lin, col) == CellType::Toggle {
            self.toggle_value(lin, col).map(|_| ())
        } else if double {
            self.edit_show()
        } else {
            Ok(())
        };
        if let Err(err) = started {
            trace!(lin, col, %err, "click action refused");
        }
        true
    }

    pub fn mouse_move(&mut self, x: i32, y: i32) -> bool {
        if let Some(axis) = self.pointer.scrollbar {
            if let Some(ScrollAction::DragTo(pos)) = self.scrollbar_mut(axis).drag_to(x, y) {
                self.scroll(axis, ScrollAction::DragTo(pos));
            }
            return true;
        }
        let mut hot_changed = false;
        for axis in Axis::BOTH {
            if self.scrollbar(axis).is_visible() {
                hot_changed |= self.scrollbar_mut(axis).set_hot(x, y);
            }
        }
        if hot_changed {
            self.request_redraw();
        }
        if self.pointer.marking {
            if let Some((lin, col)) = self.cell_at(x, y) {
                return self.mark_extend_to(lin, col);
            }
        }
        hot_changed
    }

    pub fn mouse_release(&mut self, x: i32, y: i32, button: MouseButton) -> bool {
        if let Some(axis) = self.pointer.scrollbar.take() {
            self.scrollbar_mut(axis).release();
            self.request_redraw();
            return true;
        }
        self.pointer.marking = false;
        let pressed = self.pointer.pressed.take();
        let Some((lin, col)) = self.cell_at(x, y) else {
            return pressed.is_some();
        };
        if let Some(f) = &self.callbacks.release {
            f(Click {
                lin,
                col,
                button,
                mods: Modifiers::NONE,
                double: false,
            });
        }
        true
    }

    /// Wheel notches; positive scrolls forward. Shift scrolls columns.
    pub fn mouse_wheel(&mut self, notches: i32, mods: Modifiers) -> bool {
        let axis = if mods.shift { Axis::Col } else { Axis::Lin };
        let action = if notches > 0 {
            ScrollAction::LineInc
        } else {
            ScrollAction::LineDec
        };
        // Past the index count every further notch is a no-op
        let steps = usize::try_from(notches.unsigned_abs())
            .unwrap_or(usize::MAX)
            .min(self.axis(axis).count());
        for _ in 0..steps {
            self.scroll(axis, action);
        }
        notches != 0
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
    use crate::types::{MarkMode, MergedRange};

    fn grid() -> Matrix {
        let mut m = Matrix::new(MatrixConfig {
            num_lin: 4,
            num_col: 4,
            mark_mode: MarkMode::Cell,
            mark_multiple: true,
            ..MatrixConfig::default()
        });
        m.resize(500, 300);
        m
    }

    #[test]
    fn test_arrows_skip_hidden_and_merge_interior() {
        let mut m = grid();
        m.set_focus(1, 1).unwrap();
        m.set_size(Axis::Col, 2, 0).unwrap();
        m.key_press(Key::Right, Modifiers::NONE);
        assert_eq!(m.focus(), (1, 3));

        m.merge(MergedRange::new(2, 3, 3, 4)).unwrap();
        m.key_press(Key::Down, Modifiers::NONE);
        assert_eq!(m.focus(), (2, 3));
        m.key_press(Key::Down, Modifiers::NONE);
        assert_eq!(m.focus(), (4, 3));
    }

    #[test]
    fn test_tab_wraps() {
        let mut m = grid();
        m.set_focus(1, 4).unwrap();
        m.key_press(Key::Tab, Modifiers::NONE);
        assert_eq!(m.focus(), (2, 1));
        m.key_press(Key::Tab, Modifiers::SHIFT);
        assert_eq!(m.focus(), (1, 4));
        m.set_focus(4, 4).unwrap();
        m.key_press(Key::Tab, Modifiers::NONE);
        assert_eq!(m.focus(), (1, 1));
    }

    #[test]
    fn test_ctrl_home_end() {
        let mut m = grid();
        m.set_focus(2, 2).unwrap();
        m.key_press(Key::End, Modifiers::CTRL);
        assert_eq!(m.focus(), (4, 4));
        m.key_press(Key::Home, Modifiers::NONE);
        assert_eq!(m.focus(), (4, 1));
    }

    #[test]
    fn test_typing_then_enter_moves_down() {
        let mut m = grid();
        m.set_focus(1, 1).unwrap();
        assert!(m.key_press(Key::Char('7'), Modifiers::NONE));
        assert_eq!(m.edit_widget_mut().unwrap().value(), "7");
        m.key_press(Key::Enter, Modifiers::NONE);
        assert_eq!(m.value(1, 1).as_deref(), Some("7"));
        assert_eq!(m.focus(), (2, 1));
    }

    #[test]
    fn test_shift_arrows_extend_marks() {
        let mut m = grid();
        m.set_focus(1, 1).unwrap();
        m.key_press(Key::Right, Modifiers::SHIFT);
        m.key_press(Key::Down, Modifiers::SHIFT);
        assert_eq!(m.marked_cells(), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_delete_clears_marked_or_focus() {
        let mut m = grid();
        m.set_value(1, 1, Some("a")).unwrap();
        m.set_value(3, 3, Some("b")).unwrap();
        m.set_focus(1, 1).unwrap();
        m.key_press(Key::Delete, Modifiers::NONE);
        assert_eq!(m.value(1, 1), None);
        m.set_cell_marked(3, 3, true).unwrap();
        m.key_press(Key::Delete, Modifiers::NONE);
        assert_eq!(m.value(3, 3), None);
    }

    #[test]
    fn test_click_drag_marks_block() {
        let mut m = grid();
        // (1,1) starts at x=40, y=20
        assert!(m.mouse_press(45, 25, MouseButton::Left, Modifiers::NONE, false));
        m.mouse_move(125, 45);
        m.mouse_release(125, 45, MouseButton::Left);
        assert_eq!(m.focus(), (1, 1));
        assert_eq!(m.marked_cells(), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_double_click_edits_and_toggle_click_flips() {
        let mut m = grid();
        m.mouse_press(45, 25, MouseButton::Left, Modifiers::NONE, true);
        assert_eq!(m.edit_cell(), Some((1, 1)));
        m.key_press(Key::Escape, Modifiers::NONE);
        m.set_attribute("TYPE*:2", Some("TOGGLE")).unwrap();
        m.mouse_press(125, 25, MouseButton::Left, Modifiers::NONE, false);
        assert_eq!(m.value(1, 2).as_deref(), Some("1"));
    }

    #[test]
    fn test_refused_click_actions_keep_focus_move() {
        let mut m = grid();
        m.config.readonly = true;
        m.set_attribute("TYPE*:2", Some("TOGGLE")).unwrap();
        assert!(m.mouse_press(45, 25, MouseButton::Left, Modifiers::NONE, true));
        assert_eq!(m.edit_cell(), None);
        assert_eq!(m.focus(), (1, 1));
        assert!(m.mouse_press(125, 25, MouseButton::Left, Modifiers::NONE, false));
        assert_eq!(m.value(1, 2), None);
        assert_eq!(m.focus(), (1, 2));
    }
}
