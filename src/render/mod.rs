//! Rendering: the drawing traits, the grid painter and an in-memory backend.
//!
//! This module provides:
//! - [`Canvas`] and [`FontMetrics`], the narrow surface every backend implements
//! - `Matrix::draw`, the clipped four-region painter
//! - [`RecordingCanvas`] and [`FixedMetrics`] for headless use (tests, CLI)
//!
//! The browser Canvas 2D backend lives in `crate::web`.

mod backend;
mod draw;
mod record;

pub use backend::{Canvas, FontMetrics, Rect};
pub use record::{DrawOp, FixedMetrics, RecordingCanvas};
