//! Marking through the pointer, the keyboard and the `MARKED` attribute.
//!
//! `MARKED` strings in `CELL` mode hold one character per data cell, line
//! by line; a 3x3 grid gives nine characters.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{cell_center, config, fill_labels, grid_with};
use test_case::test_case;
use xlmatrix::matrix::{Key, MouseButton};
use xlmatrix::{MarkMode, Matrix, MatrixConfig, Modifiers};

fn marking(mode: MarkMode, multiple: bool) -> Matrix {
    grid_with(
        MatrixConfig {
            mark_mode: mode,
            mark_multiple: multiple,
            ..config(3, 3)
        },
        400,
        300,
    )
}

fn click(m: &mut Matrix, lin: usize, col: usize, mods: Modifiers) {
    let (x, y) = cell_center(lin, col);
    m.mouse_press(x, y, MouseButton::Left, mods, false);
    m.mouse_release(x, y, MouseButton::Left);
}

fn drag(m: &mut Matrix, from: (usize, usize), to: (usize, usize)) {
    let (x1, y1) = cell_center(from.0, from.1);
    let (x2, y2) = cell_center(to.0, to.1);
    m.mouse_press(x1, y1, MouseButton::Left, Modifiers::NONE, false);
    m.mouse_move(x2, y2);
    m.mouse_release(x2, y2, MouseButton::Left);
}

fn marked(m: &Matrix) -> Option<String> {
    m.get_attribute("MARKED").unwrap()
}

// ============================================================================
// CELL MODE
// ============================================================================

#[test]
fn test_drag_marks_block() {
    let mut m = marking(MarkMode::Cell, true);
    drag(&mut m, (1, 1), (2, 2));
    assert_eq!(marked(&m).as_deref(), Some("110110000"));
    assert_eq!(m.marked_cells(), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
}

#[test]
fn test_drag_back_shrinks_block() {
    let mut m = marking(MarkMode::Cell, true);
    let (x1, y1) = cell_center(1, 1);
    let (x2, y2) = cell_center(3, 3);
    let (x3, y3) = cell_center(1, 2);
    m.mouse_press(x1, y1, MouseButton::Left, Modifiers::NONE, false);
    m.mouse_move(x2, y2);
    m.mouse_move(x3, y3);
    m.mouse_release(x3, y3, MouseButton::Left);
    assert_eq!(marked(&m).as_deref(), Some("110000000"));
}

#[test]
fn test_ctrl_click_toggles() {
    let mut m = marking(MarkMode::Cell, true);
    click(&mut m, 1, 1, Modifiers::NONE);
    click(&mut m, 3, 3, Modifiers::CTRL);
    assert_eq!(marked(&m).as_deref(), Some("100000001"));
    click(&mut m, 1, 1, Modifiers::CTRL);
    assert_eq!(marked(&m).as_deref(), Some("000000001"));
}

#[test]
fn test_shift_click_extends_from_anchor() {
    let mut m = marking(MarkMode::Cell, true);
    click(&mut m, 1, 1, Modifiers::NONE);
    click(&mut m, 2, 3, Modifiers::SHIFT);
    assert_eq!(marked(&m).as_deref(), Some("111111000"));
    assert_eq!(m.focus(), (2, 3));
}

#[test]
fn test_continuous_area_disables_ctrl_toggle() {
    let mut m = marking(MarkMode::Cell, true);
    m.set_attribute("MARKAREA", Some("CONTINUOUS")).unwrap();
    click(&mut m, 1, 1, Modifiers::NONE);
    click(&mut m, 3, 3, Modifiers::CTRL);
    assert_eq!(marked(&m).as_deref(), Some("000000001"));
}

#[test_case(Modifiers::SHIFT ; "shift")]
#[test_case(Modifiers::CTRL ; "ctrl")]
fn test_single_mark_ignores_modifiers(mods: Modifiers) {
    let mut m = marking(MarkMode::Cell, false);
    click(&mut m, 1, 1, Modifiers::NONE);
    click(&mut m, 2, 2, mods);
    assert_eq!(marked(&m).as_deref(), Some("000010000"));
}

#[test]
fn test_line_title_marks_whole_line_in_cell_mode() {
    let mut m = marking(MarkMode::Cell, true);
    click(&mut m, 2, 0, Modifiers::NONE);
    assert_eq!(marked(&m).as_deref(), Some("000111000"));
    // Titles themselves never report marked
    assert!(!m.is_marked(2, 0));
}

#[test]
fn test_shift_arrows_extend_marks() {
    let mut m = marking(MarkMode::Cell, true);
    click(&mut m, 1, 1, Modifiers::NONE);
    m.key_press(Key::Down, Modifiers::SHIFT);
    m.key_press(Key::Right, Modifiers::SHIFT);
    assert_eq!(m.focus(), (2, 2));
    assert_eq!(marked(&m).as_deref(), Some("110110000"));
}

// ============================================================================
// LINE / COLUMN MODES
// ============================================================================

#[test]
fn test_lin_mode_marks_lines() {
    let mut m = marking(MarkMode::Lin, true);
    click(&mut m, 2, 0, Modifiers::NONE);
    assert_eq!(marked(&m).as_deref(), Some("L010"));
    // A data cell marks its line too
    click(&mut m, 3, 2, Modifiers::NONE);
    assert_eq!(marked(&m).as_deref(), Some("L001"));
    assert!(m.is_marked(3, 1));
}

#[test]
fn test_col_mode_drag_over_titles() {
    let mut m = marking(MarkMode::Col, true);
    drag(&mut m, (0, 1), (0, 3));
    assert_eq!(marked(&m).as_deref(), Some("C111"));
}

#[test]
fn test_col_mode_ignores_line_titles() {
    let mut m = marking(MarkMode::Col, true);
    click(&mut m, 2, 0, Modifiers::NONE);
    assert_eq!(marked(&m), None);
}

#[test]
fn test_lincol_keeps_one_kind() {
    let mut m = marking(MarkMode::LinCol, true);
    click(&mut m, 1, 0, Modifiers::NONE);
    assert_eq!(marked(&m).as_deref(), Some("L100"));
    click(&mut m, 0, 2, Modifiers::CTRL);
    assert_eq!(marked(&m).as_deref(), Some("C010"));
    assert!(!m.is_marked(1, 1));
    assert!(m.is_marked(3, 2));
}

#[test]
fn test_lincol_data_click_moves_focus_only() {
    let mut m = marking(MarkMode::LinCol, true);
    click(&mut m, 2, 2, Modifiers::NONE);
    assert_eq!(m.focus(), (2, 2));
    assert_eq!(marked(&m), None);
}

#[test]
fn test_no_mode_never_marks() {
    let mut m = marking(MarkMode::No, true);
    click(&mut m, 0, 1, Modifiers::NONE);
    click(&mut m, 1, 1, Modifiers::NONE);
    assert_eq!(marked(&m), None);
    assert!(m.set_attribute("MARK1:1", Some("YES")).is_err());
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[test_case(MarkMode::Cell, "010000001" ; "cells")]
#[test_case(MarkMode::Lin, "L101" ; "lines")]
#[test_case(MarkMode::Col, "C011" ; "columns")]
fn test_marked_attribute_roundtrip(mode: MarkMode, value: &str) {
    let mut m = marking(mode, true);
    m.set_attribute("MARKED", Some(value)).unwrap();
    assert_eq!(marked(&m).as_deref(), Some(value));
    m.set_attribute("MARKED", None).unwrap();
    assert_eq!(marked(&m), None);
}

#[test_case(MarkMode::Cell, "0101" ; "cell string too short")]
#[test_case(MarkMode::Cell, "01000000x" ; "cell string bad char")]
#[test_case(MarkMode::Lin, "C101" ; "wrong prefix")]
#[test_case(MarkMode::Lin, "L1011" ; "line string too long")]
fn test_marked_attribute_rejected(mode: MarkMode, value: &str) {
    let mut m = marking(mode, true);
    m.set_attribute("MARKED", Some(match mode {
        MarkMode::Cell => "100000000",
        _ => "L100",
    }))
    .unwrap();
    assert!(m.set_attribute("MARKED", Some(value)).is_err());
    // Prior marks kept
    assert!(m.is_marked(1, 1));
}

#[test]
fn test_mark_cell_attribute() {
    let mut m = marking(MarkMode::Cell, true);
    m.set_attribute("MARK2:3", Some("YES")).unwrap();
    assert_eq!(m.get_attribute("MARK2:3").unwrap().as_deref(), Some("1"));
    assert_eq!(m.get_attribute("MARK1:1").unwrap().as_deref(), Some("0"));
    assert!(m.set_attribute("MARK0:1", Some("YES")).is_err());
}

#[test]
fn test_mark_mode_attribute() {
    let mut m = marking(MarkMode::No, false);
    m.set_attribute("MARKMODE", Some("lincol")).unwrap();
    m.set_attribute("MARKMULTIPLE", Some("YES")).unwrap();
    assert_eq!(m.get_attribute("MARKMODE").unwrap().as_deref(), Some("LINCOL"));
    assert_eq!(m.get_attribute("MARKMULTIPLE").unwrap().as_deref(), Some("YES"));
    assert!(m.set_attribute("MARKMODE", Some("DIAGONAL")).is_err());
}

#[test]
fn test_delete_key_clears_marked_values() {
    let mut m = marking(MarkMode::Cell, true);
    fill_labels(&mut m);
    drag(&mut m, (1, 1), (1, 2));
    m.key_press(Key::Delete, Modifiers::NONE);
    assert_eq!(m.value(1, 1), None);
    assert_eq!(m.value(1, 2), None);
    assert_eq!(m.value(1, 3).as_deref(), Some("1:3"));
}

#[test]
fn test_marked_cells_are_highlighted() {
    let mut m = marking(MarkMode::Cell, true);
    let plain = m.cell_style(1, 1);
    click(&mut m, 1, 1, Modifiers::NONE);
    let style = m.cell_style(1, 1);
    assert!(style.marked);
    assert_ne!(style.bg, plain.bg);
}
