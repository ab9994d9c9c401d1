//! Line/column insert and delete, merged ranges and clear operations.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{fill_labels, grid};
use test_case::test_case;
use xlmatrix::attrs::Target;
use xlmatrix::color::Rgb;
use xlmatrix::matrix::ClearScope;
use xlmatrix::{Axis, CellAttr, MatrixError, MergedRange};

// ============================================================================
// INSERT
// ============================================================================

#[test_case(3, 2, 4, 6 ; "focus after base moves down")]
#[test_case(4, 1, 4, 5 ; "focus at base moves down")]
#[test_case(5, 1, 4, 4 ; "focus before base stays")]
#[test_case(6, 3, 2, 2 ; "append keeps focus")]
fn test_insert_lines_focus(base: usize, count: usize, focus: usize, expected: usize) {
    let mut m = grid(5, 3, 400, 300);
    m.set_focus(focus, 1).unwrap();
    m.insert(Axis::Lin, base, count).unwrap();
    assert_eq!(m.num_lin(), 5 + count);
    assert_eq!(m.focus(), (expected, 1));
}

#[test]
fn test_insert_shifts_values() {
    let mut m = grid(3, 3, 400, 300);
    fill_labels(&mut m);
    m.insert(Axis::Lin, 2, 1).unwrap();
    assert_eq!(m.value(1, 1).as_deref(), Some("1:1"));
    assert_eq!(m.value(2, 1), None);
    assert_eq!(m.value(3, 1).as_deref(), Some("2:1"));
    assert_eq!(m.value(4, 3).as_deref(), Some("3:3"));

    m.insert(Axis::Col, 1, 2).unwrap();
    assert_eq!(m.num_col(), 5);
    assert_eq!(m.value(1, 1), None);
    assert_eq!(m.value(1, 3).as_deref(), Some("1:1"));
}

#[test]
fn test_addlin_opens_after_base() {
    let mut m = grid(3, 2, 400, 300);
    fill_labels(&mut m);
    m.set_attribute("ADDLIN", Some("2")).unwrap();
    assert_eq!(m.num_lin(), 4);
    assert_eq!(m.value(2, 1).as_deref(), Some("2:1"));
    assert_eq!(m.value(3, 1), None);
    assert_eq!(m.value(4, 1).as_deref(), Some("3:1"));

    // "0" inserts before the first line
    m.set_attribute("ADDCOL", Some("0-2")).unwrap();
    assert_eq!(m.num_col(), 4);
    assert_eq!(m.value(1, 3).as_deref(), Some("1:1"));
}

#[test]
fn test_insert_rejects_bad_arguments() {
    let mut m = grid(3, 2, 400, 300);
    assert!(matches!(
        m.insert(Axis::Lin, 1, 0),
        Err(MatrixError::InvalidCount(_))
    ));
    assert!(matches!(
        m.insert(Axis::Lin, 0, 1),
        Err(MatrixError::IndexOutOfRange { .. })
    ));
    assert!(m.insert(Axis::Lin, 5, 1).is_err());
    assert_eq!(m.num_lin(), 3);
}

#[test_case("ADDLIN", "18446744073709551615" ; "add base past usize")]
#[test_case("ADDLIN", "1-9223372036854775807" ; "add count past pixel space")]
#[test_case("DELLIN", "18446744073709551615" ; "delete base past usize")]
#[test_case("DELLIN", "1-18446744073709551615" ; "delete count past i64")]
#[test_case("NUMLIN", "18446744073709551615" ; "count past pixel space")]
fn test_huge_counts_rejected(name: &str, value: &str) {
    let mut m = grid(3, 2, 400, 300);
    fill_labels(&mut m);
    assert!(m.set_attribute(name, Some(value)).is_err());
    assert_eq!(m.num_lin(), 3);
    assert_eq!(m.value(3, 2).as_deref(), Some("3:2"));
}

#[test]
fn test_huge_typed_counts_rejected() {
    let mut m = grid(3, 2, 400, 300);
    assert!(matches!(
        m.insert(Axis::Lin, 1, usize::MAX),
        Err(MatrixError::InvalidCount(_))
    ));
    assert!(matches!(
        m.delete(Axis::Lin, 1, usize::MAX),
        Err(MatrixError::InvalidCount(_))
    ));
    assert!(m.set_count(Axis::Col, usize::MAX).is_err());
    assert_eq!((m.num_lin(), m.num_col()), (3, 2));
}

#[test]
fn test_noscroll_clamps_huge_count() {
    let mut m = grid(3, 2, 400, 300);
    m.set_attribute("NUMLIN_NOSCROLL", Some("18446744073709551615"))
        .unwrap();
    assert_eq!(m.axis(Axis::Lin).fixed(), 3);
    assert_eq!(
        m.get_attribute("NUMLIN_NOSCROLL").unwrap().as_deref(),
        Some("2")
    );
}

// ============================================================================
// DELETE
// ============================================================================

#[test_case(3, 2, 3, 2 ; "focus inside removed range")]
#[test_case(8, 2, 3, 5 ; "focus after removed range")]
#[test_case(1, 2, 3, 1 ; "focus before removed range")]
#[test_case(10, 9, 2, 8 ; "removed tail holds focus")]
fn test_delete_lines_focus(focus: usize, base: usize, count: usize, expected: usize) {
    let mut m = grid(10, 3, 400, 300);
    m.set_focus(focus, 1).unwrap();
    m.delete(Axis::Lin, base, count).unwrap();
    assert_eq!(m.num_lin(), 10 - count);
    assert_eq!(m.focus(), (expected, 1));
}

#[test]
fn test_delete_shifts_values_and_overrides() {
    let mut m = grid(4, 2, 400, 300);
    fill_labels(&mut m);
    m.set_attribute("BGCOLOR3:*", Some("255 0 0")).unwrap();
    m.set_attribute("DELLIN", Some("1")).unwrap();

    assert_eq!(m.value(1, 1).as_deref(), Some("2:1"));
    assert_eq!(
        m.cell_attr(CellAttr::BgColor, Target::Line(2)),
        Some("255 0 0")
    );
    assert_eq!(m.cell_attr(CellAttr::BgColor, Target::Line(3)), None);
    assert_eq!(m.resolve_bg(2, 1), Rgb::new(255, 0, 0));
}

#[test]
fn test_dellin_range() {
    let mut m = grid(5, 2, 400, 300);
    fill_labels(&mut m);
    m.set_attribute("DELLIN", Some("2-2")).unwrap();
    assert_eq!(m.num_lin(), 3);
    assert_eq!(m.value(2, 1).as_deref(), Some("4:1"));
}

#[test]
fn test_delete_rejects_and_keeps_state() {
    let mut m = grid(5, 2, 400, 300);
    fill_labels(&mut m);
    assert!(m.delete(Axis::Lin, 0, 1).is_err());
    assert!(matches!(
        m.delete(Axis::Lin, 4, 5),
        Err(MatrixError::InvalidCount(_))
    ));
    assert!(m.set_attribute("DELLIN", Some("9")).is_err());
    assert_eq!(m.num_lin(), 5);
    assert_eq!(m.value(5, 2).as_deref(), Some("5:2"));
}

#[test]
fn test_numeric_columns_follow_inserts() {
    let mut m = grid(2, 3, 400, 300);
    m.set_numeric_format(2, Some("%.1f")).unwrap();
    m.insert(Axis::Col, 1, 1).unwrap();
    assert_eq!(
        m.get_attribute("NUMERICFORMAT3").unwrap().as_deref(),
        Some("%.1f")
    );
    assert_eq!(m.get_attribute("NUMERICFORMAT2").unwrap(), None);
}

#[test]
fn test_numlin_grows_and_shrinks() {
    let mut m = grid(5, 2, 400, 300);
    fill_labels(&mut m);
    m.set_attribute("NUMLIN", Some("3")).unwrap();
    assert_eq!(m.get_attribute("NUMLIN").unwrap().as_deref(), Some("3"));
    m.set_attribute("NUMLIN", Some("5")).unwrap();
    assert_eq!(m.value(3, 1).as_deref(), Some("3:1"));
    assert_eq!(m.value(5, 1), None);
}

// ============================================================================
// MERGED RANGES
// ============================================================================

#[test]
fn test_overlapping_merge_rejected() {
    let mut m = grid(6, 3, 400, 300);
    m.merge(MergedRange::new(2, 1, 4, 1)).unwrap();
    assert!(matches!(
        m.merge(MergedRange::new(3, 1, 5, 1)),
        Err(MatrixError::MergeOverlap(_))
    ));
    assert_eq!(m.merged_at(3, 1), Some(MergedRange::new(2, 1, 4, 1)));
    assert_eq!(m.merged_at(5, 1), None);
    assert_eq!(m.snapshot().merges, vec!["2:1-4:1".to_string()]);
}

#[test]
fn test_merge_attribute_names() {
    let mut m = grid(6, 3, 400, 300);
    m.set_attribute("MERGE2:2", Some("3:3")).unwrap();
    assert_eq!(
        m.get_attribute("MERGED3:3").unwrap().as_deref(),
        Some("2:2-3:3")
    );
    m.set_attribute("MERGESPLIT3:2", None).unwrap();
    assert_eq!(m.get_attribute("MERGED3:3").unwrap(), None);
}

#[test_case(MergedRange::new(1, 1, 1, 1) ; "single cell")]
#[test_case(MergedRange::new(0, 1, 2, 1) ; "title and data")]
#[test_case(MergedRange::new(3, 1, 2, 1) ; "inverted")]
fn test_invalid_merges(range: MergedRange) {
    let mut m = grid(6, 3, 400, 300);
    assert!(m.merge(range).is_err());
    assert_eq!(m.merges().active_count(), 0);
}

#[test]
fn test_merge_stretches_and_shifts_on_insert() {
    let mut m = grid(6, 3, 400, 300);
    m.merge(MergedRange::new(2, 1, 3, 2)).unwrap();
    m.insert(Axis::Lin, 3, 1).unwrap();
    assert_eq!(m.snapshot().merges, vec!["2:1-4:2".to_string()]);
    m.insert(Axis::Lin, 1, 1).unwrap();
    assert_eq!(m.snapshot().merges, vec!["3:1-5:2".to_string()]);
}

#[test]
fn test_merge_shrinks_then_drops_across_both_axes() {
    let mut m = grid(6, 4, 400, 300);
    m.merge(MergedRange::new(2, 2, 3, 3)).unwrap();

    m.delete(Axis::Lin, 3, 1).unwrap();
    assert_eq!(m.merged_at(2, 2), Some(MergedRange::new(2, 2, 2, 3)));

    // One line and one column left: no longer a merge
    m.delete(Axis::Col, 3, 1).unwrap();
    assert_eq!(m.merged_at(2, 2), None);
    assert_eq!(m.merges().active_count(), 0);
}

#[test]
fn test_merge_dropped_when_all_lines_removed() {
    let mut m = grid(6, 4, 400, 300);
    m.merge(MergedRange::new(2, 2, 3, 3)).unwrap();
    m.merge(MergedRange::new(5, 1, 6, 1)).unwrap();
    m.delete(Axis::Lin, 2, 2).unwrap();
    assert_eq!(m.snapshot().merges, vec!["3:1-4:1".to_string()]);
}

#[test]
fn test_merge_moves_focus_to_start() {
    let mut m = grid(6, 3, 400, 300);
    m.set_focus(3, 2).unwrap();
    m.merge(MergedRange::new(2, 1, 4, 2)).unwrap();
    assert_eq!(m.focus(), (2, 1));
}

// ============================================================================
// CLEAR
// ============================================================================

#[test]
fn test_clear_value_range() {
    let mut m = grid(3, 3, 400, 300);
    fill_labels(&mut m);
    m.set_attribute("CLEARVALUE", Some("2:1-3:2")).unwrap();
    assert_eq!(m.value(1, 1).as_deref(), Some("1:1"));
    assert_eq!(m.value(2, 1), None);
    assert_eq!(m.value(3, 2), None);
    assert_eq!(m.value(3, 3).as_deref(), Some("3:3"));
}

#[test]
fn test_clear_contents_keeps_titles() {
    let mut m = grid(2, 2, 400, 300);
    fill_labels(&mut m);
    m.set_value(0, 1, Some("Name")).unwrap();
    m.clear_values(ClearScope::Contents).unwrap();
    assert_eq!(m.value(0, 1).as_deref(), Some("Name"));
    assert_eq!(m.value(1, 1), None);

    m.clear_values(ClearScope::All).unwrap();
    assert_eq!(m.value(0, 1), None);
}

#[test]
fn test_clear_attrib_all_drops_line_overrides() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("FGCOLOR2:*", Some("0 0 255")).unwrap();
    m.set_attribute("FGCOLOR1:1", Some("0 255 0")).unwrap();
    m.set_attribute("CLEARATTRIB", Some("CONTENTS")).unwrap();
    assert_eq!(m.cell_attr(CellAttr::FgColor, Target::Cell(1, 1)), None);
    assert!(m.cell_attr(CellAttr::FgColor, Target::Line(2)).is_some());

    m.set_attribute("CLEARATTRIB", Some("ALL")).unwrap();
    assert_eq!(m.cell_attr(CellAttr::FgColor, Target::Line(2)), None);
}

#[test]
fn test_bad_clear_range_rejected() {
    let mut m = grid(3, 3, 400, 300);
    assert!(m.set_attribute("CLEARVALUE", Some("3:3-1:1")).is_err());
    assert!(m.set_attribute("CLEARVALUE", Some("SOME")).is_err());
}
