//! Structured error types for xlmatrix.
//!
//! Every public matrix operation validates its arguments before touching any
//! state, so an `Err` always means "request ignored, prior state kept".

use crate::types::Axis;

/// All errors that can occur while driving a matrix.
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    /// Line or column index outside the current count.
    #[error("{axis} index {index} out of range")]
    IndexOutOfRange { axis: Axis, index: usize },

    /// Insert/delete count that is zero, negative or does not fit.
    #[error("Invalid count: {0}")]
    InvalidCount(String),

    /// Malformed or inverted range specification.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Merge request overlapping an already merged range.
    #[error("Merge overlaps existing range {0}")]
    MergeOverlap(usize),

    /// Merge request mixing title and non-title cells.
    #[error("Merge mixes title and non-title cells")]
    MergeTitleMix,

    /// Merge request covering a single cell.
    #[error("Merge range must cover more than one cell")]
    MergeDegenerate,

    /// Cell cannot be edited (read-only matrix, title cell, no focus).
    #[error("Cell {0}:{1} is not editable")]
    NotEditable(usize, usize),

    /// The edition callback refused the transition.
    #[error("Edit rejected by callback")]
    EditRejected,

    /// Confirm/abort without an active edit session.
    #[error("No active edit session")]
    NoEditSession,

    /// Attribute name not understood by the string bridge.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Attribute value could not be parsed.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    /// Configuration (de)serialization failure.
    #[error("Config: {0}")]
    Config(#[from] serde_json::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MatrixError>;

impl MatrixError {
    pub(crate) fn invalid_value(name: &str, value: &str) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<String> for MatrixError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for MatrixError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<MatrixError> for wasm_bindgen::JsValue {
    fn from(e: MatrixError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
