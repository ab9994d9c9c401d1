//! In-place editing driven by keys, clicks and attributes.
//!
//! Matrices use the headless edit widgets, so the widget text is read and
//! written through `edit_widget_mut`.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{cell_center, config, fill_labels, grid, grid_with};
use test_case::test_case;
use xlmatrix::matrix::{EditKind, EditTransition, Key, MouseButton};
use xlmatrix::numeric::{Conversion, NumericColumn};
use xlmatrix::{Axis, EditNext, Matrix, MatrixConfig, MatrixError, Modifiers};

fn widget_text(m: &mut Matrix) -> String {
    m.edit_widget_mut().map(|w| w.value()).unwrap_or_default()
}

fn type_text(m: &mut Matrix, text: &str) {
    m.edit_widget_mut().unwrap().set_value(text);
}

// ============================================================================
// KEYBOARD
// ============================================================================

#[test]
fn test_typing_starts_seeded_editor() {
    let mut m = grid(3, 3, 400, 300);
    m.set_value(1, 1, Some("old")).unwrap();
    assert!(m.key_press(Key::Char('x'), Modifiers::NONE));
    assert_eq!(m.edit_cell(), Some((1, 1)));
    assert_eq!(widget_text(&mut m), "x");
}

#[test_case(EditNext::Lin, (2, 1) ; "next line")]
#[test_case(EditNext::Col, (1, 2) ; "next column")]
#[test_case(EditNext::None, (1, 1) ; "stay")]
fn test_enter_confirms_and_moves(next: EditNext, focus: (usize, usize)) {
    let mut m = grid_with(
        MatrixConfig {
            edit_next: next,
            ..config(3, 3)
        },
        400,
        300,
    );
    m.key_press(Key::Char('4'), Modifiers::NONE);
    type_text(&mut m, "42");
    m.key_press(Key::Enter, Modifiers::NONE);
    assert!(!m.is_editing());
    assert_eq!(m.value(1, 1).as_deref(), Some("42"));
    assert_eq!(m.focus(), focus);
}

#[test]
fn test_escape_aborts() {
    let mut m = grid(3, 3, 400, 300);
    m.set_value(1, 1, Some("keep")).unwrap();
    m.key_press(Key::F2, Modifiers::NONE);
    assert_eq!(widget_text(&mut m), "keep");
    type_text(&mut m, "changed");
    m.key_press(Key::Escape, Modifiers::NONE);
    assert!(!m.is_editing());
    assert_eq!(m.value(1, 1).as_deref(), Some("keep"));
    assert_eq!(m.focus(), (1, 1));
}

#[test]
fn test_tab_confirms_and_moves_right() {
    let mut m = grid(3, 3, 400, 300);
    m.key_press(Key::F2, Modifiers::NONE);
    type_text(&mut m, "a");
    m.key_press(Key::Tab, Modifiers::NONE);
    assert_eq!(m.value(1, 1).as_deref(), Some("a"));
    assert_eq!(m.focus(), (1, 2));
}

#[test]
fn test_arrow_up_confirms_and_moves() {
    let mut m = grid(3, 3, 400, 300);
    m.set_focus(2, 2).unwrap();
    m.key_press(Key::F2, Modifiers::NONE);
    type_text(&mut m, "b");
    m.key_press(Key::Up, Modifiers::NONE);
    assert_eq!(m.value(2, 2).as_deref(), Some("b"));
    assert_eq!(m.focus(), (1, 2));
}

#[test]
fn test_readonly_blocks_editing() {
    let mut m = grid_with(
        MatrixConfig {
            readonly: true,
            ..config(3, 3)
        },
        400,
        300,
    );
    assert!(!m.key_press(Key::Char('x'), Modifiers::NONE));
    assert!(matches!(m.edit_show(), Err(MatrixError::NotEditable(1, 1))));
    assert!(!m.is_editing());
}

// ============================================================================
// POINTER
// ============================================================================

#[test]
fn test_double_click_edits_clicked_cell() {
    let mut m = grid(3, 3, 400, 300);
    fill_labels(&mut m);
    let (x, y) = cell_center(2, 3);
    m.mouse_press(x, y, MouseButton::Left, Modifiers::NONE, true);
    assert_eq!(m.edit_cell(), Some((2, 3)));
    assert_eq!(widget_text(&mut m), "2:3");
    assert_eq!(m.snapshot().editing, Some((2, 3)));
}

#[test]
fn test_click_elsewhere_confirms() {
    let mut m = grid(3, 3, 400, 300);
    m.key_press(Key::F2, Modifiers::NONE);
    type_text(&mut m, "done");
    let (x, y) = cell_center(3, 3);
    m.mouse_press(x, y, MouseButton::Left, Modifiers::NONE, false);
    assert!(!m.is_editing());
    assert_eq!(m.value(1, 1).as_deref(), Some("done"));
    assert_eq!(m.focus(), (3, 3));
}

#[test]
fn test_toggle_cell_flips_instead_of_editing() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("TYPE*:2", Some("TOGGLE")).unwrap();
    m.set_focus(1, 2).unwrap();
    m.key_press(Key::Space, Modifiers::NONE);
    assert!(!m.is_editing());
    assert_eq!(m.value(1, 2).as_deref(), Some("1"));

    let (x, y) = cell_center(1, 2);
    m.mouse_press(x, y, MouseButton::Left, Modifiers::NONE, false);
    assert_eq!(m.value(1, 2).as_deref(), Some("0"));
}

// ============================================================================
// CALLBACKS
// ============================================================================

#[test]
fn test_edition_callback_can_refuse_start() {
    let mut m = grid(3, 3, 400, 300);
    m.callbacks_mut().edition = Some(Box::new(|_: usize, col: usize, t: EditTransition| !(col == 1 && t == EditTransition::Start)));
    m.key_press(Key::Char('x'), Modifiers::NONE);
    assert!(!m.is_editing());

    m.set_focus(1, 2).unwrap();
    m.key_press(Key::Char('x'), Modifiers::NONE);
    assert_eq!(m.edit_cell(), Some((1, 2)));
}

#[test]
fn test_transitions_reported_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut m = grid(3, 3, 400, 300);
    let log = Rc::clone(&seen);
    m.callbacks_mut().edition = Some(Box::new(move |_: usize, _: usize, t: EditTransition| {
        log.borrow_mut().push(t);
        true
    }));
    m.key_press(Key::F2, Modifiers::NONE);
    m.key_press(Key::Escape, Modifiers::NONE);
    m.key_press(Key::F2, Modifiers::NONE);
    m.key_press(Key::Enter, Modifiers::NONE);
    m.key_press(Key::F2, Modifiers::NONE);
    m.insert(Axis::Lin, 1, 1).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![
            EditTransition::Start,
            EditTransition::Abort,
            EditTransition::Start,
            EditTransition::Confirm,
            EditTransition::Start,
            EditTransition::Hide,
        ]
    );
    assert!(!m.is_editing());
}

#[test]
fn test_value_changed_fires_only_for_new_text() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let mut m = grid(3, 3, 400, 300);
    m.set_value(1, 1, Some("same")).unwrap();
    let log = Rc::clone(&changes);
    m.callbacks_mut().value_changed = Some(Box::new(move |l: usize, c: usize| log.borrow_mut().push((l, c))));

    m.key_press(Key::F2, Modifiers::NONE);
    m.key_press(Key::Enter, Modifiers::NONE);
    assert!(changes.borrow().is_empty());

    m.key_press(Key::Char('n'), Modifiers::NONE);
    m.key_press(Key::Enter, Modifiers::NONE);
    assert_eq!(*changes.borrow(), vec![(2, 1)]);
}

#[test]
fn test_dropdown_editor_for_listed_cells() {
    let mut m = grid(3, 3, 400, 300);
    m.callbacks_mut().dropdown = Some(Box::new(|_: usize, col: usize| {
        (col == 3).then(|| vec!["Red".to_string(), "Green".to_string()])
    }));
    m.set_focus(1, 3).unwrap();
    m.key_press(Key::F2, Modifiers::NONE);
    assert_eq!(m.edit_session().unwrap().kind, EditKind::Dropdown);
    type_text(&mut m, "Green");
    m.key_press(Key::Enter, Modifiers::NONE);
    assert_eq!(m.value(1, 3).as_deref(), Some("Green"));

    m.set_focus(1, 1).unwrap();
    m.key_press(Key::F2, Modifiers::NONE);
    assert_eq!(m.edit_session().unwrap().kind, EditKind::Text);
}

// ============================================================================
// ATTRIBUTES AND NUMERIC COLUMNS
// ============================================================================

#[test]
fn test_editmode_attribute() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("EDITMODE", Some("YES")).unwrap();
    assert_eq!(m.get_attribute("EDITMODE").unwrap().as_deref(), Some("YES"));
    assert_eq!(m.get_attribute("EDITCELL").unwrap().as_deref(), Some("1:1"));
    type_text(&mut m, "via attr");
    m.set_attribute("EDITMODE", Some("NO")).unwrap();
    assert_eq!(m.value(1, 1).as_deref(), Some("via attr"));
    assert!(m.set_attribute("EDITCELL", Some("2:2")).is_err());
}

#[test]
fn test_numeric_column_edits_shown_units() {
    let mut m = grid(3, 3, 400, 300);
    m.numeric_mut().set(
        1,
        NumericColumn {
            format: Some("%.1f".to_string()),
            convert: Some(Box::new(|v: f64, dir: Conversion| match dir {
                Conversion::ToDisplay => v * 100.0,
                Conversion::FromDisplay => v / 100.0,
            })),
        },
    );
    m.set_value(1, 1, Some("0.5")).unwrap();
    assert_eq!(m.display_value(1, 1).as_deref(), Some("50.0"));

    m.key_press(Key::F2, Modifiers::NONE);
    assert_eq!(widget_text(&mut m), "50");
    type_text(&mut m, "25");
    m.key_press(Key::Enter, Modifiers::NONE);
    assert_eq!(m.value(1, 1).as_deref(), Some("0.25"));
    assert_eq!(m.display_value(1, 1).as_deref(), Some("25.0"));
}

#[test]
fn test_numeric_decimal_symbol() {
    let mut m = grid_with(
        MatrixConfig {
            numeric_decimal_symbol: ',',
            ..config(3, 3)
        },
        400,
        300,
    );
    m.set_attribute("NUMERICFORMAT2", Some("%.2f")).unwrap();
    m.set_value(1, 2, Some("1.5")).unwrap();
    assert_eq!(m.display_value(1, 2).as_deref(), Some("1,50"));

    m.set_focus(1, 2).unwrap();
    m.key_press(Key::F2, Modifiers::NONE);
    type_text(&mut m, "2,5");
    m.key_press(Key::Enter, Modifiers::NONE);
    assert_eq!(m.value(1, 2).as_deref(), Some("2.5"));
}

#[test]
fn test_unparseable_numeric_text_stored_as_is() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("NUMERICFORMAT1", Some("%.2f")).unwrap();
    m.key_press(Key::Char('n'), Modifiers::NONE);
    type_text(&mut m, "n/a");
    m.key_press(Key::Enter, Modifiers::NONE);
    assert_eq!(m.value(1, 1).as_deref(), Some("n/a"));
    assert_eq!(m.display_value(1, 1).as_deref(), Some("n/a"));
}
