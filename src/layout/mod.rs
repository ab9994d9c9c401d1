//! Geometry engine for the grid.
//!
//! This module handles:
//! - Per-axis sizes, fixed prefixes and the visible scroll window
//! - Scroll position reconciliation with the scrollbars
//! - Pixel to cell and cell to pixel mapping
//! - Merged range bookkeeping

mod axis;
mod merge;

pub use axis::{AxisModel, AxisSpan, MIN_ALLOCATED};
pub use merge::MergeTable;
