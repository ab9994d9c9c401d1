//! Attribute resolution and the string attribute bridge.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{config, grid, grid_with};
use test_case::test_case;
use xlmatrix::color::{palette, Rgb};
use xlmatrix::{Alignment, CellType, HAlign, MatrixConfig, MatrixError, VAlign};

const RED: Rgb = Rgb::new(255, 0, 0);
const GREEN: Rgb = Rgb::new(0, 255, 0);
const BLUE: Rgb = Rgb::new(0, 0, 255);

// ============================================================================
// BACKGROUND FALLBACK
// ============================================================================

#[test]
fn test_title_bg_is_parent_darkened() {
    let m = grid_with(
        MatrixConfig {
            parent_bg_color: Some(Rgb::new(200, 100, 50)),
            ..config(3, 3)
        },
        400,
        300,
    );
    assert_eq!(m.resolve_bg(0, 0), Rgb::new(180, 90, 45));
    assert_eq!(m.resolve_bg(0, 2), Rgb::new(180, 90, 45));
    assert_eq!(m.resolve_bg(2, 0), Rgb::new(180, 90, 45));
}

#[test]
fn test_title_bg_without_parent_uses_dialog_bg() {
    let m = grid(3, 3, 400, 300);
    assert_eq!(m.resolve_bg(0, 0), palette::DLG_BG.scale(9, 10));
    assert_eq!(m.resolve_bg(1, 1), palette::TXT_BG);
}

#[test_case(true, true, true, RED ; "cell wins")]
#[test_case(false, true, true, GREEN ; "line before column")]
#[test_case(false, false, true, BLUE ; "column")]
#[test_case(false, false, false, palette::TXT_BG ; "default")]
fn test_bg_fallback_chain(cell: bool, line: bool, column: bool, expected: Rgb) {
    let mut m = grid(3, 3, 400, 300);
    if cell {
        m.set_attribute("BGCOLOR2:2", Some("255 0 0")).unwrap();
    }
    if line {
        m.set_attribute("BGCOLOR2:*", Some("0 255 0")).unwrap();
    }
    if column {
        m.set_attribute("BGCOLOR*:2", Some("0 0 255")).unwrap();
    }
    assert_eq!(m.resolve_bg(2, 2), expected);
}

#[test]
fn test_line_override_skips_title_column() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("BGCOLOR2:*", Some("0 255 0")).unwrap();
    m.set_attribute("BGCOLOR*:2", Some("0 0 255")).unwrap();
    assert_eq!(m.resolve_bg(2, 1), GREEN);
    assert_eq!(m.resolve_bg(2, 0), palette::DLG_BG.scale(9, 10));
    // Column override does not reach the title line
    assert_eq!(m.resolve_bg(0, 2), palette::DLG_BG.scale(9, 10));
}

#[test]
fn test_global_colors() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("BGCOLOR", Some("10 20 30")).unwrap();
    m.set_attribute("FGCOLOR", Some("#FF0000")).unwrap();
    assert_eq!(m.resolve_bg(1, 1), Rgb::new(10, 20, 30));
    assert_eq!(m.resolve_fg(1, 1), RED);
    assert_eq!(m.resolve_fg(0, 1), RED);
    assert_eq!(m.get_attribute("BGCOLOR").unwrap().as_deref(), Some("10 20 30"));
}

#[test]
fn test_bg_callback_first() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("BGCOLOR1:1", Some("255 0 0")).unwrap();
    m.callbacks_mut().bg_color = Some(Box::new(|lin: usize, _: usize| (lin == 1).then_some(BLUE)));
    assert_eq!(m.resolve_bg(1, 1), BLUE);
    assert_eq!(m.resolve_bg(2, 1), palette::TXT_BG);
}

// ============================================================================
// OTHER ATTRIBUTES
// ============================================================================

#[test]
fn test_font_fallback() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("FONT", Some("Courier, 12")).unwrap();
    m.set_attribute("FONT*:3", Some("Times, Bold 10")).unwrap();
    assert_eq!(m.resolve_font(1, 1), "Courier, 12");
    assert_eq!(m.resolve_font(1, 3), "Times, Bold 10");
}

#[test]
fn test_alignment_defaults_and_column_shorthand() {
    let mut m = grid(3, 3, 400, 300);
    assert_eq!(
        m.resolve_alignment(0, 1),
        Alignment::new(HAlign::Center, VAlign::Center)
    );
    assert_eq!(m.resolve_alignment(1, 0).horizontal, HAlign::Left);

    m.set_attribute("ALIGNMENT2", Some("ARIGHT")).unwrap();
    assert_eq!(m.resolve_alignment(1, 2).horizontal, HAlign::Right);
    assert_eq!(
        m.get_attribute("ALIGNMENT2").unwrap().as_deref(),
        Some("ARIGHT")
    );
    assert_eq!(
        m.get_attribute("ALIGNMENT3").unwrap().as_deref(),
        Some("ACENTER:ACENTER")
    );
}

#[test]
fn test_titles_are_always_text() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("TYPE1:*", Some("COLOR")).unwrap();
    m.set_attribute("TYPE*:1", Some("FILL")).unwrap();
    assert_eq!(m.resolve_type(1, 2), CellType::Color);
    assert_eq!(m.resolve_type(2, 1), CellType::Fill);
    assert_eq!(m.resolve_type(1, 0), CellType::Text);
    assert_eq!(m.resolve_type(0, 1), CellType::Text);
}

#[test]
fn test_frame_colors() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("FRAMEHORIZCOLOR1:1", Some("255 0 0")).unwrap();
    let style = m.cell_style(1, 1);
    assert_eq!(style.frame_horiz, RED);
    assert_eq!(style.frame_vert, palette::FRAME);
}

#[test]
fn test_inactive_attenuates() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("ACTIVE", Some("NO")).unwrap();
    let style = m.cell_style(1, 1);
    assert_eq!(style.fg, palette::TXT_FG.make_inactive(palette::TXT_BG));
    assert_eq!(style.bg, palette::TXT_BG.make_inactive(palette::DLG_BG));
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test_case("BGCOLOR1:1", "not a color" ; "bad color")]
#[test_case("TYPE1:1", "SPARKLINE" ; "bad type")]
#[test_case("ALIGNMENT1:1", "AMIDDLE" ; "bad alignment")]
#[test_case("WIDTH1", "wide" ; "bad size")]
#[test_case("MARKMULTIPLE", "MAYBE" ; "bad bool")]
#[test_case("NUMERICFORMAT1", "%99999999999999999999f" ; "format width overflow")]
#[test_case("NUMERICFORMAT1", "%.99999999999999999999f" ; "format precision overflow")]
#[test_case("NUMERICFORMATDEF", "%1000000.2f" ; "format width too large")]
fn test_invalid_values_rejected(name: &str, value: &str) {
    let mut m = grid(3, 3, 400, 300);
    assert!(matches!(
        m.set_attribute(name, Some(value)),
        Err(MatrixError::InvalidValue { .. })
    ));
}

#[test]
fn test_unset_override_falls_back() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("BGCOLOR1:1", Some("255 0 0")).unwrap();
    m.set_attribute("BGCOLOR1:1", None).unwrap();
    assert_eq!(m.resolve_bg(1, 1), palette::TXT_BG);
    assert_eq!(m.get_attribute("BGCOLOR1:1").unwrap(), None);
}

#[test]
fn test_unknown_and_out_of_range_names() {
    let mut m = grid(3, 3, 400, 300);
    assert!(matches!(
        m.set_attribute("SPARKLES", Some("1")),
        Err(MatrixError::UnknownAttribute(_))
    ));
    assert!(matches!(
        m.get_attribute("9:1"),
        Err(MatrixError::IndexOutOfRange { .. })
    ));
    assert!(m.set_attribute("BGCOLOR9:*", Some("1 2 3")).is_err());
    assert!(m.get_attribute("ADDLIN").is_err());
    assert!(m.set_attribute("DX", Some("10")).is_err());
}

#[test]
fn test_read_back_geometry_attributes() {
    let mut m = grid(9, 2, 400, 120);
    m.set_attribute("WIDTH1", Some("100")).unwrap();
    assert_eq!(m.get_attribute("WIDTH1").unwrap().as_deref(), Some("100"));
    assert_eq!(m.get_attribute("HEIGHTDEF").unwrap().as_deref(), Some("20"));
    assert_eq!(m.get_attribute("DY").unwrap().as_deref(), Some("100"));
    assert_eq!(m.get_attribute("YMAX").unwrap().as_deref(), Some("180"));
    assert_eq!(m.get_attribute("NUMLIN_VISIBLE").unwrap().as_deref(), Some("5"));
    m.set_attribute("POSY", Some("40")).unwrap();
    assert_eq!(m.get_attribute("ORIGIN").unwrap().as_deref(), Some("3:1"));
}

#[test]
fn test_value_attribute_follows_focus() {
    let mut m = grid(3, 3, 400, 300);
    m.set_attribute("FOCUSCELL", Some("2:3")).unwrap();
    m.set_attribute("VALUE", Some("here")).unwrap();
    assert_eq!(m.value(2, 3).as_deref(), Some("here"));
    assert_eq!(m.get_attribute("2:3").unwrap().as_deref(), Some("here"));
    assert!(m.set_attribute("FOCUSCELL", Some("0:1")).is_err());
}
