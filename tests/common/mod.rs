//! Common test utilities.
//!
//! Grid builders with default sizes and no scrollbars, so pixel positions in
//! the tests can be worked out by hand: titles are 40px wide and 20px high,
//! data cells 80px wide and 20px high.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use xlmatrix::{Matrix, MatrixConfig, RecordingCanvas, ScrollbarMode};

pub const TITLE_W: i32 = 40;
pub const TITLE_H: i32 = 20;
pub const CELL_W: i32 = 80;
pub const CELL_H: i32 = 20;

// ============================================================================
// Builders
// ============================================================================

/// Base config for a `num_lin` x `num_col` grid without scrollbars.
#[must_use]
pub fn config(num_lin: usize, num_col: usize) -> MatrixConfig {
    MatrixConfig {
        num_lin,
        num_col,
        scrollbar: ScrollbarMode::Never,
        ..MatrixConfig::default()
    }
}

/// Grid laid out on a `width` x `height` canvas.
#[must_use]
pub fn grid(num_lin: usize, num_col: usize, width: i32, height: i32) -> Matrix {
    grid_with(config(num_lin, num_col), width, height)
}

#[must_use]
pub fn grid_with(config: MatrixConfig, width: i32, height: i32) -> Matrix {
    let mut m = Matrix::new(config);
    m.resize(width, height);
    m
}

/// Fill every data cell with `"lin:col"`.
pub fn fill_labels(m: &mut Matrix) {
    for lin in 1..=m.num_lin() {
        for col in 1..=m.num_col() {
            m.set_value(lin, col, Some(&format!("{lin}:{col}"))).unwrap();
        }
    }
}

// ============================================================================
// Pixel helpers
// ============================================================================

/// Center of a cell while both windows are at the origin.
#[must_use]
pub fn cell_center(lin: usize, col: usize) -> (i32, i32) {
    let lin = i32::try_from(lin).unwrap();
    let col = i32::try_from(col).unwrap();
    let x = if col == 0 {
        TITLE_W / 2
    } else {
        TITLE_W + (col - 1) * CELL_W + CELL_W / 2
    };
    let y = if lin == 0 {
        TITLE_H / 2
    } else {
        TITLE_H + (lin - 1) * CELL_H + CELL_H / 2
    };
    (x, y)
}

/// Draw one frame into a fresh canvas of the matrix size.
#[must_use]
pub fn draw(m: &mut Matrix) -> RecordingCanvas {
    let (w, h) = m.size();
    let mut canvas = RecordingCanvas::new(w, h);
    m.draw(&mut canvas);
    canvas
}
