//! Visible window, scrolling and hit testing.
//!
//! Every grid here has 20px lines under a 20px title line and 80px columns
//! right of a 40px title column, with scrollbars disabled.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{cell_center, grid};
use test_case::test_case;
use xlmatrix::layout::AxisModel;
use xlmatrix::scrollbar::ScrollAction;
use xlmatrix::{Axis, Rect};

// ============================================================================
// VISIBLE WINDOW
// ============================================================================

#[test]
fn test_window_of_five_lines() {
    let mut lines = AxisModel::new(Axis::Lin, 10, 1, 20, 20);
    // 20px title + 100px of data
    lines.recompute_visible_window(120);
    assert_eq!(lines.first(), 1);
    assert_eq!(lines.last(), 5);
    assert_eq!(lines.current_size(), 100);
    assert_eq!(lines.total_size(), 180);
}

#[test_case(120, 5 ; "exact fit")]
#[test_case(130, 6 ; "partial last line")]
#[test_case(220, 9 ; "everything fits")]
#[test_case(20, 1 ; "only the title")]
fn test_last_visible_for_height(height: i32, last: usize) {
    let m = grid(9, 2, 400, height);
    let lines = m.axis(Axis::Lin);
    assert_eq!(lines.first(), 1);
    assert_eq!(lines.last(), last);
}

#[test]
fn test_columns_have_their_own_window() {
    // 40 + 3 x 80 = 280 visible of 40 + 10 x 80
    let m = grid(3, 10, 280, 200);
    assert_eq!(m.axis(Axis::Col).last(), 3);
    assert_eq!(m.axis(Axis::Lin).last(), 3);
    assert_eq!(m.origin(), (1, 1));
}

#[test]
fn test_recompute_is_idempotent() {
    for height in [20, 35, 60, 120, 130, 250, 500] {
        let mut m = grid(20, 2, 400, height);
        // One hidden line and one taller than most windows
        m.set_size(Axis::Lin, 4, 0).unwrap();
        m.set_size(Axis::Lin, 9, 75).unwrap();
        for pos in (0..=420).step_by(10) {
            m.set_scroll_pos(Axis::Lin, pos);
            m.recompute_geometry();
            let lines = m.axis(Axis::Lin);
            let once = (lines.first(), lines.first_offset(), lines.last());
            m.recompute_geometry();
            let lines = m.axis(Axis::Lin);
            assert_eq!(
                (lines.first(), lines.first_offset(), lines.last()),
                once,
                "height {height} pos {pos}"
            );
        }
    }
}

// ============================================================================
// SCROLLING
// ============================================================================

#[test_case(ScrollAction::LineInc, 2, 6 ; "line")]
#[test_case(ScrollAction::PageInc, 5, 9 ; "page")]
#[test_case(ScrollAction::End, 5, 9 ; "end")]
#[test_case(ScrollAction::DragTo(40), 3, 7 ; "drag to pixel")]
fn test_scroll_actions_move_window(action: ScrollAction, first: usize, last: usize) {
    let mut m = grid(9, 2, 400, 120);
    m.scroll(Axis::Lin, action);
    let lines = m.axis(Axis::Lin);
    assert_eq!((lines.first(), lines.last()), (first, last));
}

#[test]
fn test_scroll_never_passes_the_end() {
    let mut m = grid(9, 2, 400, 120);
    m.scroll(Axis::Lin, ScrollAction::DragTo(10_000));
    assert_eq!(m.axis(Axis::Lin).scroll_pos(), 80);
    assert_eq!(m.axis(Axis::Lin).first(), 5);

    m.scroll(Axis::Lin, ScrollAction::Begin);
    assert_eq!(m.axis(Axis::Lin).scroll_pos(), 0);
}

#[test]
fn test_partial_first_line_hit_testing() {
    let mut m = grid(9, 2, 400, 120);
    m.scroll(Axis::Lin, ScrollAction::DragTo(30));
    let lines = m.axis(Axis::Lin);
    assert_eq!((lines.first(), lines.first_offset()), (2, 10));
    // Only 10px of line 2 remain below the title
    assert_eq!(m.cell_at(60, 25), Some((2, 1)));
    assert_eq!(m.cell_at(60, 35), Some((3, 1)));
    // Title line does not scroll
    assert_eq!(m.cell_at(60, 5), Some((0, 1)));
}

#[test]
fn test_noscroll_lines_stay_put() {
    let mut m = grid(20, 2, 400, 120);
    m.set_noscroll(Axis::Lin, 1);
    m.scroll(Axis::Lin, ScrollAction::End);
    assert_eq!(m.cell_at(60, 30), Some((1, 1)));
    // 80px left for scrolling lines: 17..=20
    assert_eq!(m.axis(Axis::Lin).first(), 17);
    assert_eq!(m.cell_at(60, 45), Some((17, 1)));
}

#[test]
fn test_wheel_scrolls_lines_shift_wheel_columns() {
    let mut m = grid(9, 10, 280, 120);
    m.mouse_wheel(2, xlmatrix::Modifiers::NONE);
    assert_eq!(m.origin(), (3, 1));
    m.mouse_wheel(1, xlmatrix::Modifiers::SHIFT);
    assert_eq!(m.origin(), (3, 2));
    m.mouse_wheel(-1, xlmatrix::Modifiers::NONE);
    assert_eq!(m.origin(), (2, 2));
}

#[test]
fn test_wheel_with_huge_delta_stops_at_the_ends() {
    let mut m = grid(9, 2, 400, 120);
    assert!(m.mouse_wheel(i32::MAX, xlmatrix::Modifiers::NONE));
    assert_eq!(m.origin(), (5, 1));
    assert!(m.mouse_wheel(i32::MIN, xlmatrix::Modifiers::NONE));
    assert_eq!(m.origin(), (1, 1));
}

#[test]
fn test_focus_scrolls_into_view() {
    let mut m = grid(9, 2, 400, 120);
    m.set_focus(8, 1).unwrap();
    let lines = m.axis(Axis::Lin);
    assert_eq!(lines.last(), 8);
    assert!(lines.is_visible(8));
    assert_eq!(lines.first(), 4);
}

#[test]
fn test_origin_attribute() {
    let mut m = grid(9, 2, 400, 120);
    m.set_attribute("ORIGIN", Some("3:1")).unwrap();
    assert_eq!(m.get_attribute("ORIGIN").unwrap().as_deref(), Some("3:1"));
    // Origin stops where the last line fills the window
    m.set_attribute("ORIGIN", Some("9:1")).unwrap();
    assert_eq!(m.origin(), (5, 1));
}

// ============================================================================
// HIT TESTING
// ============================================================================

#[test]
fn test_hidden_column_is_skipped() {
    let mut m = grid(3, 3, 400, 200);
    m.set_attribute("WIDTH2", Some("0")).unwrap();
    // Column 3 starts right where column 1 ends
    assert_eq!(m.cell_at(125, 30), Some((1, 3)));
    assert_eq!(m.cell_rect(1, 3).unwrap().0, Rect::new(120, 20, 80, 20));
}

#[test]
fn test_cell_at_outside_grid_is_none() {
    let m = grid(3, 3, 400, 200);
    let (x, y) = cell_center(3, 3);
    assert_eq!(m.cell_at(x, y), Some((3, 3)));
    // Past the last line and column
    assert_eq!(m.cell_at(x, 150), None);
    assert_eq!(m.cell_at(350, y), None);
    assert_eq!(m.cell_at(-1, y), None);
}

#[test]
fn test_snapshot_reports_window() {
    let mut m = grid(9, 2, 400, 120);
    m.scroll(Axis::Lin, ScrollAction::LineInc);
    let json = serde_json::to_value(m.snapshot()).unwrap();
    assert_eq!(json["lines"]["first"], 2);
    assert_eq!(json["lines"]["last"], 6);
    assert_eq!(json["lines"]["scroll_pos"], 20);
    assert_eq!(json["num_lin"], 9);
    assert_eq!(json["focus"], serde_json::json!([1, 1]));
}
