//! xlmatrix - virtualized matrix (grid) control
//!
//! A spreadsheet-like grid widget drawn through a small immediate-mode
//! canvas interface:
//! - Independent visible windows per axis with non-scrolling leading lines/columns
//! - In-place editing through a text or dropdown overlay widget
//! - Merged cells, marks (cells, lines, columns), numeric columns
//! - Cell attribute overrides with cell, line, column and global fallback
//! - Custom-drawn flat scrollbars
//!
//! # Usage (Rust)
//!
//! ```
//! use xlmatrix::{Matrix, MatrixConfig, RecordingCanvas};
//!
//! let mut m = Matrix::new(MatrixConfig { num_lin: 10, num_col: 4, ..MatrixConfig::default() });
//! m.set_attribute("1:1", Some("Hello")).unwrap();
//! let mut canvas = RecordingCanvas::new(320, 200);
//! m.draw(&mut canvas);
//! assert!(canvas.texts().contains(&"Hello"));
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { XlMatrix } from 'xlmatrix';
//! await init();
//! const m = new XlMatrix(canvas, null, devicePixelRatio);
//! m.render();
//! ```

pub mod attrs;
pub mod color;
pub mod config;
pub mod error;
pub mod numeric;
pub mod scrollbar;
pub mod store;
pub mod types;

// Geometry, widget and drawing
pub mod layout;
pub mod matrix;
pub mod render;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use config::{EditNext, MatrixConfig, ScrollbarMode};
pub use error::{MatrixError, Result};
pub use matrix::{Matrix, MatrixSnapshot};
pub use render::{Canvas, FixedMetrics, FontMetrics, RecordingCanvas, Rect};

#[cfg(target_arch = "wasm32")]
pub use web::XlMatrix;

pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
