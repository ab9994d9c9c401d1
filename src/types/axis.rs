use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two grid dimensions.
///
/// Both axes are processed by the same algorithms; this selects which
/// `AxisModel` an operation reads or mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Rows ("lines").
    Lin,
    /// Columns.
    Col,
}

impl Axis {
    /// Both axes, lines first.
    pub const BOTH: [Axis; 2] = [Axis::Lin, Axis::Col];

    /// The perpendicular axis.
    pub fn other(self) -> Self {
        match self {
            Self::Lin => Self::Col,
            Self::Col => Self::Lin,
        }
    }

    /// Pick the component of a `(lin, col)` pair that belongs to this axis.
    pub fn pick(self, lin: usize, col: usize) -> usize {
        match self {
            Self::Lin => lin,
            Self::Col => col,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lin => f.write_str("line"),
            Self::Col => f.write_str("column"),
        }
    }
}
