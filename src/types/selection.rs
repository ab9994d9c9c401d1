use serde::{Deserialize, Serialize};

use super::Axis;

/// What a click marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarkMode {
    /// Marking disabled (default)
    #[default]
    No,
    /// Whole lines only
    Lin,
    /// Whole columns only
    Col,
    /// Whole lines or whole columns
    LinCol,
    /// Individual cells (titles still mark whole lines/columns)
    Cell,
}

impl MarkMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NO" | "NONE" => Some(Self::No),
            "LIN" => Some(Self::Lin),
            "COL" => Some(Self::Col),
            "LINCOL" => Some(Self::LinCol),
            "CELL" => Some(Self::Cell),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::No => "NO",
            Self::Lin => "LIN",
            Self::Col => "COL",
            Self::LinCol => "LINCOL",
            Self::Cell => "CELL",
        }
    }

    /// Whole lines can be marked (click on a line title).
    pub fn allows_lines(self) -> bool {
        matches!(self, Self::Lin | Self::LinCol | Self::Cell)
    }

    /// Whole columns can be marked (click on a column title).
    pub fn allows_cols(self) -> bool {
        matches!(self, Self::Col | Self::LinCol | Self::Cell)
    }
}

/// Keyboard modifiers held during a mouse or key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };
}

/// Anchor of a block selection in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkAnchor {
    pub lin: usize,
    pub col: usize,
    /// `Some(Lin)` when the anchor marked a whole line, `Some(Col)` a whole column.
    pub full: Option<Axis>,
    /// Current opposite corner of the block.
    pub end_lin: usize,
    pub end_col: usize,
}

impl MarkAnchor {
    pub fn new(lin: usize, col: usize, full: Option<Axis>) -> Self {
        Self {
            lin,
            col,
            full,
            end_lin: lin,
            end_col: col,
        }
    }

    /// Get normalized bounds `(lin1, col1, lin2, col2)`.
    pub fn bounds(&self) -> (usize, usize, usize, usize) {
        (
            self.lin.min(self.end_lin),
            self.col.min(self.end_col),
            self.lin.max(self.end_lin),
            self.col.max(self.end_col),
        )
    }
}

/// Mark configuration plus the transient drag anchor.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub mode: MarkMode,
    /// Marks always form one block; ctrl toggling is disabled.
    pub continuous: bool,
    /// More than one item may be marked at a time.
    pub multiple: bool,
    /// Valid only while a block selection is being dragged/extended.
    pub anchor: Option<MarkAnchor>,
}

impl SelectionState {
    pub fn new(mode: MarkMode, multiple: bool, continuous: bool) -> Self {
        Self {
            mode,
            continuous,
            multiple,
            anchor: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_bounds_normalized() {
        let mut anchor = MarkAnchor::new(5, 4, None);
        anchor.end_lin = 2;
        anchor.end_col = 7;
        assert_eq!(anchor.bounds(), (2, 4, 5, 7));
    }

    #[test]
    fn test_mark_mode_parse_roundtrip() {
        for mode in [
            MarkMode::No,
            MarkMode::Lin,
            MarkMode::Col,
            MarkMode::LinCol,
            MarkMode::Cell,
        ] {
            assert_eq!(MarkMode::parse(mode.as_str()), Some(mode));
        }
    }
}
