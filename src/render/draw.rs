//! Immediate-mode drawing of a [`Matrix`] onto a [`Canvas`].
//!
//! The grid is painted as four clipped regions so scrolled cells never
//! bleed into the non-scrolling titles:
//!
//! ```text
//! +--------+-----------------+
//! | corner | column titles   |
//! +--------+-----------------+
//! | line   | body            |
//! | titles |                 |
//! +--------+-----------------+
//! ```
//!
//! Merged ranges are painted once per region from their start cell.

use std::collections::HashSet;
use std::ops::Range;

use tracing::trace;

use crate::color::{palette, Rgb};
use crate::layout::AxisModel;
use crate::matrix::{CellStyle, Matrix};
use crate::numeric::parse_number;
use crate::types::{Alignment, CellType, HAlign, VAlign};

use super::backend::{Canvas, Rect};

/// Horizontal inset of cell content.
const CONTENT_PAD: i32 = 2;
/// Largest side of a toggle check box.
const TOGGLE_BOX: i32 = 12;
/// Largest width of the dropdown feedback button.
const DROP_BUTTON: i32 = 16;

/// Indices painted for one part of an axis.
fn shown(axis: &AxisModel, fixed: bool) -> Range<usize> {
    if fixed {
        0..axis.fixed().min(axis.count())
    } else {
        axis.visible_range()
    }
}

/// Percentage of `width` for a Fill cell.
#[allow(clippy::cast_possible_truncation)]
fn fill_width(width: i32, percent: f64) -> i32 {
    let percent = percent.clamp(0.0, 100.0);
    (f64::from(width) * percent / 100.0).round() as i32
}

/// Square of side `side` placed inside `rect` per `align`.
fn aligned_square(rect: Rect, side: i32, align: Alignment) -> Rect {
    let x = match align.horizontal {
        HAlign::Left => rect.x,
        HAlign::Center => rect.x + (rect.w - side) / 2,
        HAlign::Right => rect.right() - side,
    };
    let y = match align.vertical {
        VAlign::Top => rect.y,
        VAlign::Center => rect.y + (rect.h - side) / 2,
        VAlign::Bottom => rect.bottom() - side,
    };
    Rect::new(x, y, side, side)
}

impl Matrix {
    /// Clip rectangle of the region holding fixed/scrollable lines and columns.
    fn region_clip(&self, fixed_lin: bool, fixed_col: bool) -> Option<Rect> {
        let area = self.data_area();
        let fw = self.cols.fixed_size();
        let fh = self.lines.fixed_size();
        let (x, w) = if fixed_col { (0, fw) } else { (fw, area.w - fw) };
        let (y, h) = if fixed_lin { (0, fh) } else { (fh, area.h - fh) };
        Rect::new(x, y, w, h).intersect(&area)
    }

    /// Paint the whole grid and both scrollbars.
    ///
    /// The canvas size is adopted first. Redraw requests arriving while the
    /// frame is painted are kept and reported by [`Matrix::needs_redraw`]
    /// afterwards.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        if self.drawing {
            return;
        }
        let (w, h) = canvas.size();
        self.resize(w, h);

        self.drawing = true;
        self.redraw_deferred = false;
        canvas.begin_frame();

        let area = self.data_area();
        let empty = self
            .config
            .parent_bg_color
            .unwrap_or(self.config.dlg_bg_color);
        canvas.fill_rect(area, empty);

        for (fixed_lin, fixed_col) in [(true, true), (true, false), (false, true), (false, false)] {
            let Some(clip) = self.region_clip(fixed_lin, fixed_col) else {
                continue;
            };
            canvas.set_clip(clip);
            self.draw_region(canvas, fixed_lin, fixed_col);
            canvas.reset_clip();
        }

        self.draw_focus(canvas);

        self.vscroll.draw(canvas, &self.config.font);
        self.hscroll.draw(canvas, &self.config.font);
        if self.vscroll.is_visible() && self.hscroll.is_visible() {
            let corner = Rect::new(
                self.vscroll.rect().x,
                self.hscroll.rect().y,
                self.vscroll.rect().w,
                self.hscroll.rect().h,
            );
            canvas.fill_rect(corner, palette::SCROLLBAR_TRACK);
        }

        canvas.end_frame();
        self.drawing = false;
        self.needs_redraw = std::mem::take(&mut self.redraw_deferred);
        trace!(width = w, height = h, "frame drawn");
    }

    fn draw_region(&self, canvas: &mut dyn Canvas, fixed_lin: bool, fixed_col: bool) {
        let mut merged_done = HashSet::new();
        for lin in shown(&self.lines, fixed_lin) {
            if self.lines.size(lin) == 0 {
                continue;
            }
            for col in shown(&self.cols, fixed_col) {
                if self.cols.size(col) == 0 {
                    continue;
                }
                let (lin, col) = match self.merges.find(lin, col) {
                    Some(m) => {
                        if !merged_done.insert((m.start_lin, m.start_col)) {
                            continue;
                        }
                        (m.start_lin, m.start_col)
                    }
                    None => (lin, col),
                };
                if let Some((rect, _)) = self.cell_rect(lin, col) {
                    self.draw_cell(canvas, lin, col, rect);
                }
            }
        }
    }

    fn draw_cell(&self, canvas: &mut dyn Canvas, lin: usize, col: usize, rect: Rect) {
        let style = self.cell_style(lin, col);
        canvas.fill_rect(rect, style.bg);

        let custom = self
            .callbacks
            .draw
            .as_ref()
            .is_some_and(|f| f(lin, col, rect, &mut *canvas));
        if !custom {
            let mut content = Rect::new(
                rect.x + CONTENT_PAD,
                rect.y,
                rect.w - 2 * CONTENT_PAD - 1,
                rect.h - 1,
            );
            if !Self::is_title(lin, col) && self.callbacks.shows_drop_button(lin, col) {
                let bw = DROP_BUTTON.min(rect.h - 1);
                let button = Rect::new(rect.right() - 1 - bw, rect.y, bw, rect.h - 1);
                canvas.fill_rect(button, self.config.dlg_bg_color);
                canvas.text(
                    button,
                    "\u{25BC}",
                    Alignment::default(),
                    &style.font,
                    style.fg,
                );
                content.w -= bw;
            }
            self.draw_content(canvas, lin, col, content, &style);
        }

        let (r, b) = (rect.right() - 1, rect.bottom() - 1);
        canvas.line(rect.x, b, r, b, style.frame_horiz);
        canvas.line(r, rect.y, r, b, style.frame_vert);
    }

    fn draw_content(
        &self,
        canvas: &mut dyn Canvas,
        lin: usize,
        col: usize,
        content: Rect,
        style: &CellStyle,
    ) {
        if content.is_empty() {
            return;
        }
        match style.kind {
            CellType::Text => {
                if let Some(text) = self.display_value(lin, col) {
                    canvas.text(content, &text, style.alignment, &style.font, style.fg);
                }
            }
            CellType::Color => {
                let color = self.value(lin, col).as_deref().and_then(Rgb::parse);
                if let Some(color) = color {
                    let swatch = content.inset(CONTENT_PAD);
                    canvas.fill_rect(swatch, color);
                    canvas.stroke_rect(swatch, style.fg);
                }
            }
            CellType::Fill => {
                let percent = self
                    .value(lin, col)
                    .and_then(|v| parse_number(&v, self.config.numeric_decimal_symbol));
                if let Some(percent) = percent {
                    let bar = content.inset(CONTENT_PAD);
                    let filled = Rect::new(bar.x, bar.y, fill_width(bar.w, percent), bar.h);
                    if !filled.is_empty() {
                        canvas.fill_rect(filled, style.fg);
                    }
                    canvas.stroke_rect(bar, style.fg);
                }
            }
            CellType::Image => {
                if let Some(name) = self.value(lin, col) {
                    if !canvas.image(content, &name, style.alignment) {
                        trace!(lin, col, name = %name, "unknown image");
                    }
                }
            }
            CellType::Toggle => {
                let side = TOGGLE_BOX.min(content.h - 2 * CONTENT_PAD).min(content.w);
                if side <= 0 {
                    return;
                }
                let check = aligned_square(content, side, style.alignment);
                canvas.stroke_rect(check, style.fg);
                let on = self
                    .value(lin, col)
                    .is_some_and(|v| v.trim().parse::<i64>().is_ok_and(|n| n != 0));
                if on {
                    canvas.fill_rect(check.inset(3), style.fg);
                }
            }
        }
    }

    fn draw_focus(&self, canvas: &mut dyn Canvas) {
        if !self.config.show_focus || self.is_editing() {
            return;
        }
        let (lin, col) = self.focus();
        if Self::is_title(lin, col) || !self.lines.is_visible(lin) || !self.cols.is_visible(col) {
            return;
        }
        let Some((rect, true)) = self.cell_rect(lin, col) else {
            return;
        };
        let region = self.region_clip(lin < self.lines.fixed(), col < self.cols.fixed());
        let Some(clip) = region else {
            return;
        };
        let bg = self.cell_style(lin, col).bg;
        let color = if bg.is_light() {
            palette::FOCUS
        } else {
            Rgb::WHITE
        };
        canvas.set_clip(clip);
        canvas.stroke_rect(rect.inset(1), color);
        canvas.reset_clip();
    }
}
