//! Attribute resolution.
//!
//! Each overridable attribute is looked up in order: application callback,
//! cell override, line override (not for the title column), column override
//! (not for the title row), then the matrix-wide default. A value that does
//! not parse at one level falls through to the next.

use serde::Serialize;

use crate::attrs::Target;
use crate::color::Rgb;
use crate::error::{MatrixError, Result};
use crate::types::{Alignment, AttrFlags, Axis, CellAttr, CellType, HAlign, VAlign};

use super::Matrix;

/// Everything needed to paint one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellStyle {
    pub bg: Rgb,
    pub fg: Rgb,
    pub font: String,
    pub kind: CellType,
    pub alignment: Alignment,
    /// Color of the bottom frame line
    pub frame_horiz: Rgb,
    /// Color of the right frame line
    pub frame_vert: Rgb,
    pub marked: bool,
}

impl Matrix {
    /// First parseable override of `attr` for a cell.
    fn lookup<T>(
        &self,
        attr: CellAttr,
        lin: usize,
        col: usize,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let flag = attr.flag();
        let cell_flagged =
            self.store.overrides_unflagged() || self.store.flags(lin, col).contains(flag);
        let levels = [
            (cell_flagged, Target::Cell(lin, col)),
            (col != 0 && self.lines.flags(lin).contains(flag), Target::Line(lin)),
            (lin != 0 && self.cols.flags(col).contains(flag), Target::Column(col)),
        ];
        levels
            .into_iter()
            .filter(|(flagged, _)| *flagged)
            .find_map(|(_, target)| self.attrs.get(attr, target).and_then(&parse))
    }

    fn default_bg(&self, lin: usize, col: usize) -> Rgb {
        if Self::is_title(lin, col) {
            self.config
                .parent_bg_color
                .unwrap_or(self.config.dlg_bg_color)
                .scale(9, 10)
        } else {
            self.config.bg_color.unwrap_or(self.config.txt_bg_color)
        }
    }

    fn default_fg(&self, lin: usize, col: usize) -> Rgb {
        self.config.fg_color.unwrap_or(if Self::is_title(lin, col) {
            self.config.dlg_fg_color
        } else {
            self.config.txt_fg_color
        })
    }

    fn default_alignment(&self, lin: usize, col: usize) -> Alignment {
        if lin == 0 {
            Alignment::new(HAlign::Center, VAlign::Center)
        } else if col == 0 {
            Alignment::new(HAlign::Left, VAlign::Center)
        } else if self.numeric.is_numeric(col) {
            Alignment::new(HAlign::Right, VAlign::Center)
        } else {
            Alignment::default()
        }
    }

    /// Background before mark and inactive attenuation.
    pub fn resolve_bg(&self, lin: usize, col: usize) -> Rgb {
        self.callbacks
            .bg_color
            .as_ref()
            .and_then(|f| f(lin, col))
            .or_else(|| self.lookup(CellAttr::BgColor, lin, col, Rgb::parse))
            .unwrap_or_else(|| self.default_bg(lin, col))
    }

    /// Foreground before mark and inactive attenuation.
    pub fn resolve_fg(&self, lin: usize, col: usize) -> Rgb {
        self.callbacks
            .fg_color
            .as_ref()
            .and_then(|f| f(lin, col))
            .or_else(|| self.lookup(CellAttr::FgColor, lin, col, Rgb::parse))
            .unwrap_or_else(|| self.default_fg(lin, col))
    }

    pub fn resolve_font(&self, lin: usize, col: usize) -> String {
        self.callbacks
            .font
            .as_ref()
            .and_then(|f| f(lin, col))
            .or_else(|| {
                self.lookup(CellAttr::Font, lin, col, |s| {
                    let s = s.trim();
                    (!s.is_empty()).then(|| s.to_string())
                })
            })
            .unwrap_or_else(|| self.config.font.clone())
    }

    pub fn resolve_type(&self, lin: usize, col: usize) -> CellType {
        if Self::is_title(lin, col) {
            return CellType::Text;
        }
        self.callbacks
            .cell_type
            .as_ref()
            .and_then(|f| f(lin, col))
            .or_else(|| self.lookup(CellAttr::Type, lin, col, CellType::parse))
            .unwrap_or_default()
    }

    pub fn resolve_alignment(&self, lin: usize, col: usize) -> Alignment {
        self.lookup(CellAttr::Alignment, lin, col, Alignment::parse)
            .unwrap_or_else(|| self.default_alignment(lin, col))
    }

    /// Frame line color below (`Axis::Lin`) or right of (`Axis::Col`) a cell.
    pub fn resolve_frame(&self, lin: usize, col: usize, edge: Axis) -> Rgb {
        let attr = match edge {
            Axis::Lin => CellAttr::FrameHorizColor,
            Axis::Col => CellAttr::FrameVertColor,
        };
        self.lookup(attr, lin, col, Rgb::parse)
            .unwrap_or(self.config.frame_color)
    }

    /// Resolved style with mark and inactive attenuation applied.
    pub fn cell_style(&self, lin: usize, col: usize) -> CellStyle {
        let marked = self.is_marked(lin, col);
        let mut bg = self.resolve_bg(lin, col);
        let mut fg = self.resolve_fg(lin, col);
        if marked {
            let hl = self.config.hl_color;
            let alpha = self.config.hl_color_alpha;
            bg = bg.blend_toward(hl, alpha).scale(8, 10);
            fg = fg.blend_toward(hl, alpha).scale(8, 10);
        }
        if !self.config.active {
            fg = fg.make_inactive(bg);
            bg = bg.make_inactive(self.config.dlg_bg_color);
        }
        CellStyle {
            bg,
            fg,
            font: self.resolve_font(lin, col),
            kind: self.resolve_type(lin, col),
            alignment: self.resolve_alignment(lin, col),
            frame_horiz: self.resolve_frame(lin, col, Axis::Lin),
            frame_vert: self.resolve_frame(lin, col, Axis::Col),
            marked,
        }
    }

    /// Stored override of `attr` for exactly `target`.
    pub fn cell_attr(&self, attr: CellAttr, target: Target) -> Option<&str> {
        self.attrs.get(attr, target)
    }

    /// Set or clear an override, keeping the presence bits in step.
    pub fn set_cell_attr(&mut self, attr: CellAttr, target: Target, value: Option<&str>) -> Result<()> {
        let on = value.is_some();
        let flag = attr.flag();
        match target {
            Target::Cell(lin, col) => {
                self.check_cell(lin, col)?;
                self.store.set_flags(lin, col, flag, on);
            }
            Target::Line(lin) => {
                let flags = self.lines.flags_mut(lin).ok_or(MatrixError::IndexOutOfRange {
                    axis: Axis::Lin,
                    index: lin,
                })?;
                flags.set(flag, on);
            }
            Target::Column(col) => {
                let flags = self.cols.flags_mut(col).ok_or(MatrixError::IndexOutOfRange {
                    axis: Axis::Col,
                    index: col,
                })?;
                flags.set(flag, on);
            }
        }
        self.attrs.set(attr, target, value);
        self.request_redraw();
        Ok(())
    }

    /// Drop every override of a cell.
    pub(crate) fn clear_cell_attrs(&mut self, lin: usize, col: usize) {
        let all = CellAttr::ALL
            .iter()
            .fold(AttrFlags::empty(), |acc, a| acc | a.flag());
        self.store.set_flags(lin, col, all, false);
        self.attrs.clear_target(Target::Cell(lin, col));
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
    use crate::store::CallbackStore;

    fn grid() -> Matrix {
        Matrix::new(MatrixConfig {
            num_lin: 4,
            num_col: 4,
            ..MatrixConfig::default()
        })
    }

    #[test]
    fn test_title_bg_is_darkened_parent() {
        let mut m = grid();
        m.config.parent_bg_color = Some(Rgb::new(200, 100, 50));
        assert_eq!(m.resolve_bg(0, 0), Rgb::new(180, 90, 45));
        assert_eq!(m.resolve_bg(0, 2), Rgb::new(180, 90, 45));
    }

    #[test]
    fn test_fallback_order() {
        let mut m = grid();
        m.set_cell_attr(CellAttr::BgColor, Target::Column(2), Some("0 0 255"))
            .unwrap();
        assert_eq!(m.resolve_bg(3, 2), Rgb::new(0, 0, 255));
        m.set_cell_attr(CellAttr::BgColor, Target::Line(3), Some("0 255 0"))
            .unwrap();
        assert_eq!(m.resolve_bg(3, 2), Rgb::new(0, 255, 0));
        m.set_cell_attr(CellAttr::BgColor, Target::Cell(3, 2), Some("255 0 0"))
            .unwrap();
        assert_eq!(m.resolve_bg(3, 2), Rgb::new(255, 0, 0));

        m.set_cell_attr(CellAttr::BgColor, Target::Cell(3, 2), None)
            .unwrap();
        assert_eq!(m.resolve_bg(3, 2), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_line_override_skips_title_column() {
        let mut m = grid();
        m.set_cell_attr(CellAttr::FgColor, Target::Line(2), Some("1 2 3"))
            .unwrap();
        assert_eq!(m.resolve_fg(2, 1), Rgb::new(1, 2, 3));
        assert_eq!(m.resolve_fg(2, 0), m.config.dlg_fg_color);
    }

    #[test]
    fn test_invalid_override_falls_through() {
        let mut m = grid();
        m.set_cell_attr(CellAttr::BgColor, Target::Column(1), Some("9 9 9"))
            .unwrap();
        m.set_cell_attr(CellAttr::BgColor, Target::Cell(1, 1), Some("not a color"))
            .unwrap();
        assert_eq!(m.resolve_bg(1, 1), Rgb::new(9, 9, 9));
    }

    #[test]
    fn test_callback_wins() {
        let mut m = grid();
        m.set_cell_attr(CellAttr::Font, Target::Cell(1, 1), Some("Mono, 9"))
            .unwrap();
        m.callbacks_mut().font = Some(Box::new(|l, _| (l == 1).then(|| "Serif, 12".into())));
        assert_eq!(m.resolve_font(1, 1), "Serif, 12");
        assert_eq!(m.resolve_font(2, 1), m.config.font);
    }

    #[test]
    fn test_callback_store_reads_unflagged_cell_overrides() {
        let mut m = Matrix::with_store(
            MatrixConfig {
                num_lin: 2,
                num_col: 2,
                ..MatrixConfig::default()
            },
            Box::new(CallbackStore::new(Box::new(|_, _| None))),
        );
        m.attrs
            .set(CellAttr::Type, Target::Cell(1, 1), Some("COLOR"));
        assert_eq!(m.resolve_type(1, 1), CellType::Color);
    }

    #[test]
    fn test_marked_and_inactive_attenuation() {
        let mut m = grid();
        m.config.mark_mode = crate::types::MarkMode::Cell;
        m.selection.mode = crate::types::MarkMode::Cell;
        m.config.hl_color = Rgb::new(0, 0, 255);
        m.config.hl_color_alpha = 255;
        m.set_cell_marked(1, 1, true).unwrap();
        let style = m.cell_style(1, 1);
        assert!(style.marked);
        assert_eq!(style.bg, Rgb::new(0, 0, 204));

        m.config.active = false;
        let plain = m.cell_style(2, 2);
        assert_eq!(plain.bg, Rgb::WHITE.make_inactive(m.config.dlg_bg_color));
    }

    #[test]
    fn test_numeric_columns_align_right() {
        let mut m = grid();
        m.numeric_mut()
            .set(3, crate::numeric::NumericColumn::with_format("%.1f"));
        assert_eq!(m.resolve_alignment(1, 3).horizontal, HAlign::Right);
        assert_eq!(m.resolve_alignment(0, 3).horizontal, HAlign::Center);
    }
}
