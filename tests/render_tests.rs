//! Frames painted into a `RecordingCanvas` and flat scrollbar interaction.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{config, draw, fill_labels, grid, grid_with};
use test_case::test_case;
use xlmatrix::color::{palette, Rgb};
use xlmatrix::matrix::MouseButton;
use xlmatrix::render::DrawOp;
use xlmatrix::scrollbar::ScrollbarPart;
use xlmatrix::{
    Axis, Canvas, MarkMode, Matrix, MatrixConfig, Modifiers, RecordingCanvas, Rect, ScrollbarMode,
};

/// 20 lines on a 400x120 canvas: only the vertical bar is needed.
///
/// Strip at x 385..400 with 15px arrows, a 90px track and a 22px thumb
/// (100 of 400 content pixels shown).
fn scrolling() -> Matrix {
    grid_with(
        MatrixConfig {
            scrollbar: ScrollbarMode::Auto,
            ..config(20, 2)
        },
        400,
        120,
    )
}

fn press_release(m: &mut Matrix, x: i32, y: i32) {
    m.mouse_press(x, y, MouseButton::Left, Modifiers::NONE, false);
    m.mouse_release(x, y, MouseButton::Left);
}

// ============================================================================
// FRAMES
// ============================================================================

#[test]
fn test_visible_values_only() {
    let mut m = grid(20, 2, 400, 120);
    fill_labels(&mut m);
    let canvas = draw(&mut m);
    let texts = canvas.texts();
    assert!(texts.contains(&"1:1"));
    assert!(texts.contains(&"5:2"));
    assert!(!texts.contains(&"6:1"));
    assert_eq!(canvas.frames(), 1);
}

#[test]
fn test_hidden_line_not_painted() {
    let mut m = grid(3, 2, 400, 200);
    fill_labels(&mut m);
    m.set_attribute("HEIGHT2", Some("0")).unwrap();
    let canvas = draw(&mut m);
    assert!(!canvas.texts().contains(&"2:1"));
    // Line 3 moved up into line 2's slot
    assert!(canvas.texts().contains(&"3:1"));
}

#[test]
fn test_redraw_flag_cleared_by_draw() {
    let mut m = grid(3, 2, 400, 200);
    let _ = draw(&mut m);
    assert!(!m.needs_redraw());
    m.set_value(1, 1, Some("x")).unwrap();
    assert!(m.needs_redraw());
    let _ = draw(&mut m);
    assert!(!m.needs_redraw());
}

#[test]
fn test_marked_cell_painted_highlighted() {
    let mut m = grid_with(
        MatrixConfig {
            mark_mode: MarkMode::Cell,
            ..config(3, 3)
        },
        400,
        200,
    );
    press_release(&mut m, 80, 30);
    let canvas = draw(&mut m);
    let bg = m.cell_style(1, 1).bg;
    assert_ne!(bg, palette::TXT_BG);
    assert_eq!(canvas.color_at(80, 30), Some(bg));
    assert_eq!(canvas.color_at(160, 30), Some(palette::TXT_BG));
}

#[test_case("1", Some(palette::TXT_FG) ; "checked")]
#[test_case("0", Some(palette::TXT_BG) ; "unchecked")]
fn test_toggle_cell_check_box(value: &str, center: Option<Rgb>) {
    let mut m = grid(3, 3, 400, 200);
    m.set_attribute("TYPE*:1", Some("TOGGLE")).unwrap();
    m.set_value(1, 1, Some(value)).unwrap();
    let canvas = draw(&mut m);
    // 12px box centered in the content rect of cell (1,1)
    assert_eq!(canvas.color_at(79, 29), center);
}

#[test]
fn test_fill_cell_bar() {
    let mut m = grid(3, 3, 400, 200);
    m.set_attribute("TYPE1:1", Some("FILL")).unwrap();
    m.set_value(1, 1, Some("50")).unwrap();
    let canvas = draw(&mut m);
    // Bar spans x 44..115, half of it filled
    assert_eq!(canvas.color_at(50, 30), Some(palette::TXT_FG));
    assert_eq!(canvas.color_at(110, 30), Some(palette::TXT_BG));
}

#[test]
fn test_image_cell_uses_known_images() {
    let mut m = grid(3, 3, 400, 200);
    m.set_attribute("TYPE1:*", Some("IMAGE")).unwrap();
    m.set_value(1, 1, Some("logo")).unwrap();
    m.set_value(1, 2, Some("missing")).unwrap();
    let mut canvas = RecordingCanvas::new(400, 200).with_image("logo");
    m.draw(&mut canvas);
    let images: Vec<&str> = canvas
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Image { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(images, vec!["logo"]);
}

#[test]
fn test_drop_button_for_checked_cells() {
    let mut m = grid(3, 3, 400, 200);
    m.callbacks_mut().drop_check = Some(Box::new(|lin: usize, col: usize| (lin, col) == (2, 2)));
    let canvas = draw(&mut m);
    let buttons = canvas.texts().iter().filter(|t| **t == "\u{25BC}").count();
    assert_eq!(buttons, 1);
}

#[test]
fn test_draw_callback_sees_every_visible_cell() {
    let count = Rc::new(Cell::new(0));
    let mut m = grid(3, 3, 400, 200);
    let seen = Rc::clone(&count);
    m.callbacks_mut().draw = Some(Box::new(
        move |_: usize, _: usize, _: Rect, _: &mut dyn Canvas| {
            seen.set(seen.get() + 1);
            false
        },
    ));
    let _ = draw(&mut m);
    // 4 x 4 cells including titles
    assert_eq!(count.get(), 16);
}

#[test]
fn test_no_focus_rect_while_editing() {
    let mut m = grid(3, 3, 400, 200);
    let strokes = |c: &RecordingCanvas| {
        c.ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke { .. }))
            .count()
    };
    let before = strokes(&draw(&mut m));
    m.edit_show().unwrap();
    assert_eq!(strokes(&draw(&mut m)), before - 1);
}

// ============================================================================
// SCROLLBARS
// ============================================================================

#[test]
fn test_auto_shows_only_needed_bar() {
    let m = scrolling();
    assert!(m.scrollbar(Axis::Lin).is_visible());
    assert!(!m.scrollbar(Axis::Col).is_visible());
    assert_eq!(m.data_area(), Rect::new(0, 0, 385, 120));
    assert_eq!(m.scrollbar(Axis::Lin).range(), (400, 100, 0));
    assert_eq!(m.cell_at(390, 30), None);
}

#[test]
fn test_arrow_presses_scroll_lines() {
    let mut m = scrolling();
    press_release(&mut m, 392, 110);
    assert_eq!(m.origin(), (2, 1));
    assert_eq!(m.scrollbar(Axis::Lin).range().2, 20);
    press_release(&mut m, 392, 5);
    assert_eq!(m.origin(), (1, 1));
}

#[test]
fn test_track_press_pages() {
    let mut m = scrolling();
    press_release(&mut m, 392, 80);
    assert_eq!(m.origin(), (5, 1));
}

#[test]
fn test_thumb_drag_scrolls_proportionally() {
    let mut m = scrolling();
    m.mouse_press(392, 20, MouseButton::Left, Modifiers::NONE, false);
    assert!(m.scrollbar(Axis::Lin).is_dragging());
    // 34 of 68 travel pixels is half of the 300px range
    m.mouse_move(392, 54);
    let lines = m.axis(Axis::Lin);
    assert_eq!(lines.scroll_pos(), 150);
    assert_eq!((lines.first(), lines.first_offset()), (8, 10));
    m.mouse_release(392, 54, MouseButton::Left);
    assert!(!m.scrollbar(Axis::Lin).is_dragging());
    // Focus untouched by scrollbar clicks
    assert_eq!(m.focus(), (1, 1));
}

#[test]
fn test_hovered_thumb_is_highlighted() {
    let mut m = scrolling();
    let canvas = draw(&mut m);
    assert_eq!(canvas.color_at(392, 25), Some(palette::SCROLLBAR_THUMB));
    assert!(m.mouse_move(392, 25));
    assert_eq!(m.scrollbar(Axis::Lin).hot(), ScrollbarPart::Thumb);
    let canvas = draw(&mut m);
    assert_eq!(canvas.color_at(392, 25), Some(palette::SCROLLBAR_THUMB_HOT));
}

#[test]
fn test_always_draws_both_bars_and_corner() {
    let mut m = grid_with(
        MatrixConfig {
            scrollbar: ScrollbarMode::Always,
            ..config(3, 2)
        },
        400,
        120,
    );
    let canvas = draw(&mut m);
    let texts = canvas.texts();
    for glyph in ["\u{25B2}", "\u{25BC}", "\u{25C0}", "\u{25B6}"] {
        assert!(texts.contains(&glyph), "missing arrow {glyph}");
    }
    assert_eq!(canvas.color_at(392, 112), Some(palette::SCROLLBAR_TRACK));
    assert_eq!(m.data_area(), Rect::new(0, 0, 385, 105));
}

#[test]
fn test_scroll_top_callback() {
    let tops = Rc::new(Cell::new((0, 0)));
    let mut m = scrolling();
    let seen = Rc::clone(&tops);
    m.callbacks_mut().scroll_top = Some(Box::new(move |lin: usize, col: usize| seen.set((lin, col))));
    press_release(&mut m, 392, 110);
    assert_eq!(tops.get(), (2, 1));
}
