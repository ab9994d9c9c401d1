//! Typed configuration for a matrix instance.
//!
//! Toolkit-defined attributes that the hot paths read (sizes, mark mode,
//! default colors) live here as named fields. Free-form per-cell overrides
//! go to the string side table in [`crate::attrs`].

use serde::{Deserialize, Serialize};

use crate::color::{palette, Rgb};
use crate::error::Result;
use crate::types::MarkMode;

/// Where the focus goes after an edit is confirmed with Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EditNext {
    /// Next line, same column (default)
    #[default]
    Lin,
    /// Next column, same line
    Col,
    /// Stay on the edited cell
    None,
}

/// When the flat scrollbars are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScrollbarMode {
    /// Only when the axis does not fit (default)
    #[default]
    Auto,
    /// Always reserve the strip
    Always,
    /// Never shown; scrolling is keyboard/programmatic only
    Never,
}

/// Configuration for a matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Number of data lines (title line not included)
    pub num_lin: usize,
    /// Number of data columns (title column not included)
    pub num_col: usize,
    /// Non-scrolling leading lines, title included (>= 1)
    pub num_lin_noscroll: usize,
    /// Non-scrolling leading columns, title included (>= 1)
    pub num_col_noscroll: usize,
    /// Default data column width in pixels
    pub width_def: i32,
    /// Default data line height in pixels
    pub height_def: i32,
    /// Width of the title column (0 hides it)
    pub title_width: i32,
    /// Height of the title line (0 hides it)
    pub title_height: i32,

    pub mark_mode: MarkMode,
    pub mark_multiple: bool,
    /// Marks are always one contiguous block
    pub mark_continuous: bool,

    pub readonly: bool,
    pub edit_next: EditNext,
    /// Draw the focus feedback rectangle
    pub show_focus: bool,
    /// Widget is active (inactive attenuates every color)
    pub active: bool,

    pub scrollbar: ScrollbarMode,
    /// Thickness of the flat scrollbar strips
    pub scrollbar_size: i32,
    pub scrollbar_arrows: bool,

    /// Global background (overrides the system default for regular cells)
    pub bg_color: Option<Rgb>,
    /// Global foreground
    pub fg_color: Option<Rgb>,
    /// Background of the container the matrix sits in; titles inherit it
    pub parent_bg_color: Option<Rgb>,
    /// Frame line color
    pub frame_color: Rgb,
    /// Mark highlight color
    pub hl_color: Rgb,
    /// Weight of the highlight when blending marked cells (0-255)
    pub hl_color_alpha: u8,
    pub dlg_bg_color: Rgb,
    pub dlg_fg_color: Rgb,
    pub txt_bg_color: Rgb,
    pub txt_fg_color: Rgb,

    /// Global font
    pub font: String,
    /// printf-style format for numeric columns without their own format
    pub numeric_format_def: String,
    /// Decimal separator used when parsing and formatting numeric columns
    pub numeric_decimal_symbol: char,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            num_lin: 0,
            num_col: 0,
            num_lin_noscroll: 1,
            num_col_noscroll: 1,
            width_def: 80,
            height_def: 20,
            title_width: 40,
            title_height: 20,
            mark_mode: MarkMode::No,
            mark_multiple: false,
            mark_continuous: false,
            readonly: false,
            edit_next: EditNext::Lin,
            show_focus: true,
            active: true,
            scrollbar: ScrollbarMode::Auto,
            scrollbar_size: 15,
            scrollbar_arrows: true,
            bg_color: None,
            fg_color: None,
            parent_bg_color: None,
            frame_color: palette::FRAME,
            hl_color: palette::TXT_HL,
            hl_color_alpha: 128,
            dlg_bg_color: palette::DLG_BG,
            dlg_fg_color: palette::DLG_FG,
            txt_bg_color: palette::TXT_BG,
            txt_fg_color: palette::TXT_FG,
            font: "Sans, 10".to_string(),
            numeric_format_def: "%.2f".to_string(),
            numeric_decimal_symbol: '.',
        }
    }
}

impl MatrixConfig {
    /// Load a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = MatrixConfig::from_json(r#"{"num_lin": 12, "mark_mode": "CELL"}"#).unwrap();
        assert_eq!(cfg.num_lin, 12);
        assert_eq!(cfg.mark_mode, MarkMode::Cell);
        assert_eq!(cfg.width_def, 80);
        assert_eq!(cfg.frame_color, palette::FRAME);
    }

    #[test]
    fn test_colors_in_attr_form() {
        let cfg = MatrixConfig::from_json(r#"{"parent_bg_color": "10 20 30"}"#).unwrap();
        assert_eq!(cfg.parent_bg_color, Some(Rgb::new(10, 20, 30)));
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = MatrixConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::error::MatrixError::Config(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let cfg = MatrixConfig {
            num_col: 4,
            ..MatrixConfig::default()
        };
        let back = MatrixConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }
}
