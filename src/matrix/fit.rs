//! Size fitting: to the text of one line/column, or to the canvas.

use tracing::debug;

use crate::error::{MatrixError, Result};
use crate::types::Axis;

use super::Matrix;

/// Horizontal padding added around fitted text.
const PAD_X: i32 = 8;
/// Vertical padding added around fitted text.
const PAD_Y: i32 = 4;

impl Matrix {
    /// Size one line or column to its largest text, titles included.
    pub fn fit_to_text(&mut self, axis: Axis, index: usize) -> Result<()> {
        if index >= self.axis(axis).count() {
            return Err(MatrixError::IndexOutOfRange { axis, index });
        }
        let others = self.axis(axis.other()).count();
        let mut size = 0;
        for other in 0..others {
            let (lin, col) = match axis {
                Axis::Lin => (index, other),
                Axis::Col => (other, index),
            };
            // Merged text spans several cells; it does not drive one index.
            if self.merges.find(lin, col).is_some() {
                continue;
            }
            let Some(text) = self.display_value(lin, col) else {
                continue;
            };
            let font = self.resolve_font(lin, col);
            let (w, h) = self.metrics.text_size(&font, &text);
            size = size.max(match axis {
                Axis::Lin => h + PAD_Y,
                Axis::Col => w + PAD_X,
            });
        }
        if size == 0 {
            let (cw, ch) = self.metrics.char_size(&self.config.font);
            size = match axis {
                Axis::Lin => ch + PAD_Y,
                Axis::Col => cw + PAD_X,
            };
        }
        debug!(%axis, index, size, "fit to text");
        self.set_size(axis, index, size)
    }

    /// Stretch or shrink the scrollable indices so the axis fills the canvas.
    pub fn fit_to_size(&mut self, lines: bool, cols: bool) {
        for (axis, wanted) in [(Axis::Lin, lines), (Axis::Col, cols)] {
            if !wanted {
                continue;
            }
            let extent = match axis {
                Axis::Lin => self.height,
                Axis::Col => self.width,
            };
            let model = self.axis_mut(axis);
            let available = extent - model.fixed_size();
            let shown: Vec<usize> = (model.fixed()..model.count())
                .filter(|&i| model.size(i) > 0)
                .collect();
            let total: i64 = shown.iter().map(|&i| i64::from(model.size(i))).sum();
            if available <= 0 || total == 0 {
                continue;
            }
            let mut remaining = available;
            for (n, &index) in shown.iter().enumerate() {
                let size = if n + 1 == shown.len() {
                    remaining
                } else {
                    let scaled = i64::from(model.size(index)) * i64::from(available) / total;
                    i32::try_from(scaled).unwrap_or(0).max(1)
                };
                remaining -= size;
                model.set_size(index, size.max(1));
            }
            debug!(%axis, available, "fit to size");
        }
        self.recompute_geometry();
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
    use crate::config::{MatrixConfig, ScrollbarMode};

    fn grid() -> Matrix {
        let mut m = Matrix::new(MatrixConfig {
            num_lin: 3,
            num_col: 3,
            scrollbar: ScrollbarMode::Never,
            ..MatrixConfig::default()
        });
        m.resize(340, 200);
        m
    }

    #[test]
    fn test_fit_to_text_uses_widest_value() {
        let mut m = grid();
        m.set_value(1, 2, Some("abc")).unwrap();
        m.set_value(3, 2, Some("abcdefghij")).unwrap();
        m.fit_to_text(Axis::Col, 2).unwrap();
        // FixedMetrics: 7px per char
        assert_eq!(m.axis(Axis::Col).size(2), 70 + PAD_X);
        assert!(m.fit_to_text(Axis::Col, 9).is_err());
    }

    #[test]
    fn test_fit_to_text_multiline_height() {
        let mut m = grid();
        m.set_value(2, 1, Some("a\nb\nc")).unwrap();
        m.fit_to_text(Axis::Lin, 2).unwrap();
        assert_eq!(m.axis(Axis::Lin).size(2), 3 * 14 + PAD_Y);
    }

    #[test]
    fn test_fit_to_size_fills_canvas() {
        let mut m = grid();
        m.set_size(Axis::Col, 1, 40).unwrap();
        m.fit_to_size(false, true);
        let cols = m.axis(Axis::Col);
        // 340 - 40 title = 300 over 40 + 80 + 80
        assert_eq!(cols.size(1), 60);
        assert_eq!(cols.size(2), 120);
        assert_eq!(cols.size(3), 120);
        assert_eq!(cols.span_size(1..4), 300);
    }
}
